// a3mx: Reconstruct multiple sequence alignments from compressed A3M data.
//
// Copyright 2026 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//

//! a3mx is a library and a command-line client for:
//!
//!   - Extracting compressed A3M (ca3m) archives into plain text alignments.
//!   - Converting A3M alignment text into column-synchronized FASTA.
//!
//! ca3m archives store each aligned sequence as a run-length diff against a
//! shared consensus and reference the residues and FASTA headers by integer
//! keys in two external databases, typically a pair of
//! [ffindex](store::ffindex) sequence and header databases produced
//! alongside the archive.
//!
//! ## Usage
//!
//! ### Command line
//!
//! The a3mx CLI supports the following subcommands:
//!   - `a3mx extract` decompress ca3m archives to A3M or FASTA.
//!   - `a3mx convert` convert plain A3M text to FASTA.
//!
//! Note that `extract` needs access to the sequence and header ffindex
//! databases the archive was compressed against. The archive stores only
//! the alignment run lengths, so the residues and header text must come
//! from these databases.
//!
//! ### Rust API
//!
//! The API provides functions for operating on structs that implement
//! [Read] and/or [Write]. These are meant for use cases where an entire
//! stream should be processed.
//!
//! For use cases requiring access to a single record at a time, the
//! following structs are provided:
//!
//!   - [Extractor](extract::Extractor): takes a ca3m byte buffer and two [EntryStore]s and decodes the records into A3M entries.
//!   - [Msa](merge::Msa): ingests A3M records one at a time and renders them as column-synchronized FASTA.
//!
//! See documentation for the appropriate functions or structs for usage
//! examples.

use std::io::Read;
use std::io::Write;

pub mod cursor;
pub mod extract;
pub mod merge;
pub mod record;
pub mod store;

use extract::Extractor;
use extract::extract_a3m;
use merge::a3m_to_fasta;
use store::EntryStore;

type E = Box<dyn std::error::Error>;

/// Supported output formats for extraction.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    A3M,
    Fasta,
}

impl std::str::FromStr for Format {
    type Err = String; // Define an error type for parsing failures

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a3m" => Ok(Format::A3M),
            "fasta" => Ok(Format::Fasta),
            _ => Err(format!("'{}' is not a valid Format", s)),
        }
    }
}

/// Extract a ca3m byte buffer into plain text.
///
/// [Format::A3M] output starts with the archive prologue copied verbatim
/// and keeps the lowercase insertion notation. [Format::Fasta] output
/// drops the prologue and merges the insertion columns of all records into
/// fixed-width FASTA anchored on the first record.
///
/// ## Usage
///
/// ```rust
/// use a3mx::{Format, extract};
/// use a3mx::record::{RecordHeader, encode_record_header};
/// use a3mx::store::MemoryStore;
///
/// // Comment line and consensus block, terminated by ';'
/// let mut data: Vec<u8> = b"#ca3m archive\n>consensus\nACGT\n;".to_vec();
///
/// // One record aligning entry 3 over the full consensus
/// let header = RecordHeader { entry_id: 3, start_pos: 1, n_blocks: 1 };
/// data.append(&mut encode_record_header(&header).unwrap());
/// data.push(4); // four matches
/// data.push(0); // no indels
///
/// let sequences: MemoryStore = vec![(3_u32, b"ACGT\0".to_vec())].into_iter().collect();
/// let headers: MemoryStore = vec![(3_u32, b"sp|Q1 test protein\0".to_vec())].into_iter().collect();
///
/// let a3m = extract(&data, &sequences, &headers, Format::A3M).unwrap();
///
/// let mut expected: Vec<u8> = b"#ca3m archive\n>consensus\nACGT\n".to_vec();
/// expected.append(&mut b">sp|Q1 test protein\nACGT\n".to_vec());
/// assert_eq!(a3m, expected);
///
/// let fasta = extract(&data, &sequences, &headers, Format::Fasta).unwrap();
/// assert_eq!(fasta, b">sp|Q1 test protein\nACGT\n".to_vec());
/// ```
pub fn extract<S: EntryStore>(
    data: &[u8],
    sequences: &S,
    headers: &S,
    out_format: Format,
) -> Result<Vec<u8>, E> {
    match out_format {
        Format::A3M => extract_a3m(data, sequences, headers),
        Format::Fasta => {
            let mut extractor = Extractor::new(data, sequences, headers)?;
            let mut records: Vec<u8> = Vec::new();
            while let Some(entry) = extractor.next_entry()? {
                records.extend_from_slice(&entry);
            }
            a3m_to_fasta(&records)
        },
    }
}

/// Extract ca3m data from [Read] to plain text in [Write].
///
/// Can write any format supported by [Format].
///
/// ## Usage
///
/// ```rust
/// use a3mx::{Format, extract_from_read_to_write};
/// use a3mx::record::{RecordHeader, encode_record_header};
/// use a3mx::store::MemoryStore;
/// use std::io::Cursor;
///
/// let mut data: Vec<u8> = b">consensus\nMKVL\n;".to_vec();
/// let header = RecordHeader { entry_id: 0, start_pos: 1, n_blocks: 1 };
/// data.append(&mut encode_record_header(&header).unwrap());
/// data.push(4);
/// data.push(0);
///
/// let sequences: MemoryStore = vec![(0_u32, b"MKVL\0".to_vec())].into_iter().collect();
/// let headers: MemoryStore = vec![(0_u32, b"query\0".to_vec())].into_iter().collect();
///
/// let mut input: Cursor<Vec<u8>> = Cursor::new(data);
/// let mut output: Vec<u8> = Vec::new();
/// extract_from_read_to_write(&sequences, &headers, Format::A3M, &mut input, &mut output).unwrap();
///
/// assert_eq!(output, b">consensus\nMKVL\n>query\nMKVL\n".to_vec());
/// ```
pub fn extract_from_read_to_write<R: Read, W: Write, S: EntryStore>(
    sequences: &S,
    headers: &S,
    out_format: Format,
    conn_in: &mut R,
    conn_out: &mut W,
) -> Result<(), E> {
    let mut data: Vec<u8> = Vec::new();
    conn_in.read_to_end(&mut data)?;

    let out = extract(&data, sequences, headers, out_format)?;
    conn_out.write_all(&out)?;
    conn_out.flush()?;

    Ok(())
}

/// Convert A3M text from [Read] to FASTA in [Write].
///
/// ## Usage
///
/// ```rust
/// use a3mx::convert_from_read_to_write;
/// use std::io::Cursor;
///
/// // hit1 has an insertion after the first residue
/// let mut input_bytes: Vec<u8> = Vec::new();
/// input_bytes.append(&mut b">query desc\nACGT\n".to_vec());
/// input_bytes.append(&mut b">hit1 partial\nAcGT\n".to_vec());
/// let mut input: Cursor<Vec<u8>> = Cursor::new(input_bytes);
///
/// let mut output: Vec<u8> = Vec::new();
/// convert_from_read_to_write(&mut input, &mut output).unwrap();
///
/// let mut expected: Vec<u8> = Vec::new();
/// expected.append(&mut b">query desc\nACGT\n".to_vec());
/// expected.append(&mut b">hit1 partial\nAGT-\n".to_vec());
///
/// assert_eq!(output, expected);
/// ```
pub fn convert_from_read_to_write<R: Read, W: Write>(
    conn_in: &mut R,
    conn_out: &mut W,
) -> Result<(), E> {
    let mut data: Vec<u8> = Vec::new();
    conn_in.read_to_end(&mut data)?;

    let out = a3m_to_fasta(&data)?;
    conn_out.write_all(&out)?;
    conn_out.flush()?;

    Ok(())
}

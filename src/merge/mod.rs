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

//! Merging A3M alignment text into column-synchronized FASTA.
//!
//! A3M marks sequence-local insertions with lowercase letters or `.`, so
//! records aligned independently against the same query can disagree on
//! how many insertion columns exist at each position. [Msa] ingests the
//! records in order and reconciles their insertion columns into one
//! global coordinate system anchored on the first (query) record, after
//! which every record is addressable by the same column index.
//!
//! ## Usage
//!
//! ```rust
//! use a3mx::merge::Msa;
//!
//! let mut msa = Msa::new();
//! msa.add_sequence("query first", b"ACGT");
//! msa.add_sequence("hit1 partial", b"AcGT");
//!
//! // The insertion in hit1 widened the query to "A.CGT"; rendering drops
//! // the insertion column again and pads hit1 where it ran short.
//! let mut expected: Vec<u8> = Vec::new();
//! expected.append(&mut b">query first\nACGT\n".to_vec());
//! expected.append(&mut b">hit1 partial\nAGT-\n".to_vec());
//!
//! assert_eq!(msa.to_fasta(), expected);
//! ```

use std::io::Cursor;

use needletail::parse_fastx_reader;

type E = Box<dyn std::error::Error>;

/// Alignment state a residue byte codes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqState {
    Match,
    Insertion,
    Deletion,
}

pub fn state_of(residue: u8) -> SeqState {
    match residue {
        b'a'..=b'z' | b'.' => SeqState::Insertion,
        b'A'..=b'Z' => SeqState::Match,
        b'-' => SeqState::Deletion,
        _ => SeqState::Match,
    }
}

/// Translates one residue byte into its canonical A2M form.
///
/// Letters pass through, `-` and the `/` chain break code a deletion,
/// `.` stays an insertion marker. Everything else, `*` included, maps to
/// the NUL sentinel; translation never fails.
pub fn translate_a2m(residue: u8) -> u8 {
    match residue {
        b'a'..=b'z' | b'A'..=b'Z' => residue,
        b'-' | b'/' => b'-',
        b'.' => b'.',
        _ => 0,
    }
}

/// An in-progress multiple sequence alignment with unified insertion columns.
///
/// All entries are kept at the same length; ingesting a record either
/// shifts `.` markers into the record to match existing insertion columns,
/// or widens every previous entry when the record introduces a new one.
#[derive(Debug, Clone, Default)]
pub struct Msa {
    headers: Vec<String>,
    entries: Vec<Vec<u8>>,
    width: usize,
}

impl Msa {
    pub fn new() -> Self {
        Msa::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current number of alignment columns.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn entries(&self) -> &[Vec<u8>] {
        &self.entries
    }

    /// Adds one record, reconciling its insertion columns with the records
    /// added before it.
    ///
    /// Records with an empty sequence are skipped entirely and produce no
    /// output record.
    pub fn add_sequence(&mut self, header: &str, sequence: &[u8]) {
        if sequence.is_empty() {
            return;
        }

        let mut copy: Vec<u8> = sequence.iter().map(|x| translate_a2m(*x)).collect();

        // The first record fixes the initial width.
        if self.entries.is_empty() {
            self.width = copy.len();
            self.headers.push(header.to_string());
            self.entries.push(copy);
            return;
        }

        // Single left-to-right sweep; the loop bound grows whenever the
        // incoming record introduces a new insertion column, and every
        // widening only shifts columns to the right of `col`.
        let mut col = 0_usize;
        while col < self.width {
            let col_has_insert = self.entries.iter()
                .any(|entry| state_of(entry[col]) == SeqState::Insertion);

            if col >= copy.len() {
                copy.push(if col_has_insert { b'.' } else { b'-' });
                col += 1;
                continue;
            }

            let seq_has_insert = state_of(copy[col]) == SeqState::Insertion;
            if col_has_insert && !seq_has_insert {
                // Sync the new record to the existing insertion column
                copy.insert(col, b'.');
            } else if seq_has_insert && !col_has_insert {
                // New insertion column; widen every existing entry
                for entry in self.entries.iter_mut() {
                    entry.insert(col, b'.');
                }
                self.width += 1;
            }
            col += 1;
        }

        // Residues past the last query column have no coordinate in the
        // query-anchored frame
        copy.truncate(self.width);

        self.headers.push(header.to_string());
        self.entries.push(copy);
    }

    /// Renders the alignment as fixed-width FASTA anchored on the first
    /// record.
    ///
    /// Columns where the query carries a gap or an insertion marker are
    /// dropped. Within the surviving columns, insertion markers and the
    /// NUL sentinel render as gaps and everything else is upper-cased.
    pub fn to_fasta(&self) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        if self.entries.is_empty() {
            return out;
        }

        let query = &self.entries[0];
        for (header, entry) in self.headers.iter().zip(self.entries.iter()) {
            out.push(b'>');
            out.extend_from_slice(header.as_bytes());
            out.push(b'\n');
            for (residue, anchor) in entry.iter().zip(query.iter()) {
                if *anchor == b'.' || *anchor == b'-' {
                    continue;
                }
                if *residue == b'.' || *residue == 0 {
                    out.push(b'-');
                } else {
                    out.push(residue.to_ascii_uppercase());
                }
            }
            out.push(b'\n');
        }

        out
    }
}

/// Parses A3M text into records and merges them into a [Msa].
pub fn read_a3m(a3m: &[u8]) -> Result<Msa, E> {
    let mut msa = Msa::new();
    if a3m.iter().all(|x| x.is_ascii_whitespace()) {
        return Ok(msa);
    }

    let mut reader = parse_fastx_reader(Cursor::new(a3m.to_vec()))?;
    while let Some(record) = reader.next() {
        let record = record?;
        let id = String::from_utf8_lossy(record.id()).into_owned();

        let mut fields = id.splitn(2, char::is_whitespace);
        let name = fields.next().unwrap_or("");
        let comment = fields.next().unwrap_or("").trim_start();
        let header = if comment.is_empty() {
            name.to_string()
        } else {
            format!("{} {}", name, comment)
        };

        msa.add_sequence(&header, &record.seq());
    }

    Ok(msa)
}

/// Converts A3M text into column-synchronized FASTA.
///
/// Zero input records produce empty output.
pub fn a3m_to_fasta(a3m: &[u8]) -> Result<Vec<u8>, E> {
    Ok(read_a3m(a3m)?.to_fasta())
}

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

//! Decoder for compressed A3M (ca3m) archives.
//!
//! A ca3m archive stores each aligned sequence as a run-length diff
//! against a shared consensus: the archive begins with an optional
//! `#`-prefixed comment line and a consensus block (header line plus
//! consensus residue line) terminated by a `;` byte, followed by binary
//! records. Each record is a [RecordHeader] and `n_blocks` pairs of
//! (`u8` match count, `i8` indel count). Match runs copy residues
//! verbatim from the sequence store, positive indel counts copy that many
//! residues as lower-cased insertions, and non-positive counts emit gap
//! characters. Every decoded row is padded with gaps to the consensus
//! width, so the output is a valid fixed-width A3M alignment.
//!
//! Residues and header text live in two external [EntryStore]s keyed by
//! the record's `entry_id`; only the run lengths are stored inline.

use crate::cursor::ByteCursor;
use crate::cursor::TruncatedInput;
use crate::record::RECORD_HEADER_LEN;
use crate::record::read_record_header;
use crate::store::EntryStore;

type E = Box<dyn std::error::Error>;

/// Error for record keys with no corresponding store entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEntry {
    pub id: u32,
}

impl std::fmt::Display for UnknownEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "No entry stored under key {}", self.id)
    }
}

impl std::error::Error for UnknownEntry {}

/// Error for run lengths that point past the end of the stored sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceOverrun {
    pub id: u32,
}

impl std::fmt::Display for SequenceOverrun {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Record {} reads past the end of its stored sequence", self.id)
    }
}

impl std::error::Error for SequenceOverrun {}

/// Plain text prologue of a ca3m archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prologue {
    /// Comment line and consensus block exactly as stored.
    pub text: Vec<u8>,
    /// Number of residues on the consensus line. Every decoded entry is
    /// padded to this many alignment columns.
    pub consensus_length: usize,
}

/// Reads the comment line and consensus block, leaving the cursor on the
/// first record.
///
/// The comment line is only present when the first byte is `#`. Scanning
/// stops after the `;` byte that follows the consensus block; an input
/// that ends before the terminator is truncated.
pub fn read_prologue(
    cursor: &mut ByteCursor,
) -> Result<Prologue, E> {
    let mut text: Vec<u8> = Vec::new();
    let mut last = 0_u8;

    if cursor.peek() == Some(b'#') {
        text.extend_from_slice(cursor.take_through(b'\n')?);
        last = b'\n';
    }

    let mut consensus_length = 0_usize;
    let mut line = 0_usize;
    loop {
        let byte = match cursor.peek() {
            Some(byte) => byte,
            None => return Err(Box::new(TruncatedInput)),
        };
        if last == b'\n' && byte == b';' {
            cursor.take(1)?;
            break;
        }
        cursor.take(1)?;
        if byte == b'\n' {
            line += 1;
        } else if line == 1 {
            // Second line of the consensus block holds the residues
            consensus_length += 1;
        }
        text.push(byte);
        last = byte;
    }

    Ok(Prologue { text, consensus_length })
}

/// Decodes ca3m records one entry at a time.
///
/// Reads the [Prologue] on construction and then returns one decoded
/// record per [next_entry](Extractor::next_entry) call, resolving residues
/// and headers against the two stores. Also usable as an [Iterator] over
/// `Result<Vec<u8>, E>` items.
pub struct Extractor<'a, S: EntryStore> {
    cursor: ByteCursor<'a>,

    sequences: &'a S,
    headers: &'a S,

    prologue: Prologue,
}

impl<'a, S: EntryStore> Extractor<'a, S> {
    pub fn new(
        data: &'a [u8],
        sequences: &'a S,
        headers: &'a S,
    ) -> Result<Self, E> {
        let mut cursor = ByteCursor::new(data);
        let prologue = read_prologue(&mut cursor)?;

        Ok(Extractor { cursor, sequences, headers, prologue })
    }

    pub fn prologue(&self) -> &Prologue {
        &self.prologue
    }
}

impl<S: EntryStore> Extractor<'_, S> {
    /// Decodes the next record into its header line and alignment row.
    ///
    /// Returns None when fewer bytes than one record header remain.
    pub fn next_entry(
        &mut self,
    ) -> Result<Option<Vec<u8>>, E> {
        if self.cursor.remaining() < RECORD_HEADER_LEN {
            return Ok(None);
        }

        let header = read_record_header(&mut self.cursor)?;
        let sequence = self.sequences.get(header.entry_id)
            .ok_or(UnknownEntry { id: header.entry_id })?;
        let name = self.headers.get(header.entry_id)
            .ok_or(UnknownEntry { id: header.entry_id })?;

        let mut out: Vec<u8> = Vec::new();

        // Stored headers may or may not carry the FASTA prefix already
        if name.first() != Some(&b'>') {
            out.push(b'>');
        }
        // The last byte of a stored header is its terminator
        out.extend_from_slice(&name[..name.len().saturating_sub(1)]);
        out.push(b'\n');

        let mut pos = header.start_pos as usize;
        let mut width = 0_usize;
        for _ in 0..header.n_blocks {
            let n_matches = self.cursor.read_u8()? as usize;
            let n_indels = self.cursor.read_i8()?;

            if pos == 0 || pos - 1 + n_matches > sequence.len() {
                return Err(Box::new(SequenceOverrun { id: header.entry_id }));
            }
            out.extend_from_slice(&sequence[pos - 1..pos - 1 + n_matches]);
            pos += n_matches;
            width += n_matches;

            if n_indels > 0 {
                // Insertions are sequence-local: lower-cased and excluded
                // from the alignment width
                let n_insertions = n_indels as usize;
                if pos - 1 + n_insertions > sequence.len() {
                    return Err(Box::new(SequenceOverrun { id: header.entry_id }));
                }
                for residue in &sequence[pos - 1..pos - 1 + n_insertions] {
                    out.push(residue.to_ascii_lowercase());
                }
                pos += n_insertions;
            } else {
                // Deletions consume nothing from the sequence
                for _ in 0..n_indels.unsigned_abs() {
                    out.push(b'-');
                }
                width += n_indels.unsigned_abs() as usize;
            }
        }

        while width < self.prologue.consensus_length {
            out.push(b'-');
            width += 1;
        }
        out.push(b'\n');

        Ok(Some(out))
    }
}

impl<S: EntryStore> Iterator for Extractor<'_, S> {
    type Item = Result<Vec<u8>, E>;

    fn next(
        &mut self,
    ) -> Option<Result<Vec<u8>, E>> {
        self.next_entry().transpose()
    }
}

/// Decodes a full ca3m buffer into A3M text.
///
/// The output starts with the prologue copied verbatim, followed by one
/// `>`-prefixed header line and one residue line per record.
pub fn extract_a3m<S: EntryStore>(
    data: &[u8],
    sequences: &S,
    headers: &S,
) -> Result<Vec<u8>, E> {
    let mut extractor = Extractor::new(data, sequences, headers)?;

    let mut out = extractor.prologue().text.clone();
    while let Some(entry) = extractor.next_entry()? {
        out.extend_from_slice(&entry);
    }

    Ok(out)
}

// Tests
#[cfg(test)]
mod tests {
    use crate::record::RecordHeader;
    use crate::record::encode_record_header;
    use crate::store::MemoryStore;

    fn prologue_bytes() -> Vec<u8> {
        b"#ca3m test archive\n>consensus\nACGT\n;".to_vec()
    }

    fn record_bytes(entry_id: u32, start_pos: u16, blocks: &[(u8, i8)]) -> Vec<u8> {
        let header = RecordHeader { entry_id, start_pos, n_blocks: blocks.len() as u16 };
        let mut bytes = encode_record_header(&header).unwrap();
        for (n_matches, n_indels) in blocks {
            bytes.push(*n_matches);
            bytes.push(*n_indels as u8);
        }
        bytes
    }

    #[test]
    fn prologue_counts_consensus_residues() {
        use super::read_prologue;
        use crate::cursor::ByteCursor;

        let data = prologue_bytes();
        let mut cursor = ByteCursor::new(&data);

        let got = read_prologue(&mut cursor).unwrap();

        assert_eq!(got.text, b"#ca3m test archive\n>consensus\nACGT\n".to_vec());
        assert_eq!(got.consensus_length, 4);
        assert!(cursor.is_empty());
    }

    #[test]
    fn prologue_without_comment_line() {
        use super::read_prologue;
        use crate::cursor::ByteCursor;

        let data: Vec<u8> = b">consensus\nMKVLAT\n;".to_vec();
        let mut cursor = ByteCursor::new(&data);

        let got = read_prologue(&mut cursor).unwrap();

        assert_eq!(got.text, b">consensus\nMKVLAT\n".to_vec());
        assert_eq!(got.consensus_length, 6);
    }

    #[test]
    fn prologue_without_terminator_is_an_error() {
        use super::read_prologue;
        use crate::cursor::ByteCursor;
        use crate::cursor::TruncatedInput;

        let data: Vec<u8> = b">consensus\nACGT\n".to_vec();
        let mut cursor = ByteCursor::new(&data);

        let got = read_prologue(&mut cursor);

        assert!(got.err().unwrap().downcast_ref::<TruncatedInput>().is_some());
    }

    #[test]
    fn empty_input_is_an_error() {
        use super::read_prologue;
        use crate::cursor::ByteCursor;

        let data: Vec<u8> = Vec::new();
        let mut cursor = ByteCursor::new(&data);

        assert!(read_prologue(&mut cursor).is_err());
    }

    #[test]
    fn match_only_record_reproduces_consensus_width() {
        use super::extract_a3m;

        let mut sequences = MemoryStore::new();
        sequences.insert(0, b"ACGT\0".to_vec());
        let mut headers = MemoryStore::new();
        headers.insert(0, b"entry0 first\0".to_vec());

        let mut data = prologue_bytes();
        data.append(&mut record_bytes(0, 1, &[(2, 0), (2, 0)]));

        let got = extract_a3m(&data, &sequences, &headers).unwrap();
        let expected = b"#ca3m test archive\n>consensus\nACGT\n>entry0 first\nACGT\n".to_vec();

        assert_eq!(got, expected);
    }

    #[test]
    fn insertions_are_lowercased_and_not_counted() {
        use super::extract_a3m;

        let mut sequences = MemoryStore::new();
        sequences.insert(5, b"AXY\0".to_vec());
        let mut headers = MemoryStore::new();
        headers.insert(5, b"entry5 insertions\0".to_vec());

        // One match, two insertions; deletion padding fills the row to
        // the consensus width of 4.
        let mut data = prologue_bytes();
        data.append(&mut record_bytes(5, 1, &[(1, 2)]));

        let got = extract_a3m(&data, &sequences, &headers).unwrap();
        let expected = b"#ca3m test archive\n>consensus\nACGT\n>entry5 insertions\nAxy---\n".to_vec();

        assert_eq!(got, expected);
    }

    #[test]
    fn negative_indel_count_emits_gaps() {
        use super::extract_a3m;

        let mut sequences = MemoryStore::new();
        sequences.insert(1, b"AT\0".to_vec());
        let mut headers = MemoryStore::new();
        headers.insert(1, b"entry1 gapped\0".to_vec());

        let mut data = prologue_bytes();
        data.append(&mut record_bytes(1, 1, &[(1, -2), (1, 0)]));

        let got = extract_a3m(&data, &sequences, &headers).unwrap();
        let expected = b"#ca3m test archive\n>consensus\nACGT\n>entry1 gapped\nA--T\n".to_vec();

        assert_eq!(got, expected);
    }

    #[test]
    fn start_pos_offsets_into_the_sequence() {
        use super::extract_a3m;

        let mut sequences = MemoryStore::new();
        sequences.insert(2, b"XXACGT\0".to_vec());
        let mut headers = MemoryStore::new();
        headers.insert(2, b"entry2 offset\0".to_vec());

        let mut data = prologue_bytes();
        data.append(&mut record_bytes(2, 3, &[(4, 0)]));

        let got = extract_a3m(&data, &sequences, &headers).unwrap();
        let expected = b"#ca3m test archive\n>consensus\nACGT\n>entry2 offset\nACGT\n".to_vec();

        assert_eq!(got, expected);
    }

    #[test]
    fn stored_fasta_prefix_is_not_duplicated() {
        use super::extract_a3m;

        let mut sequences = MemoryStore::new();
        sequences.insert(0, b"ACGT\0".to_vec());
        let mut headers = MemoryStore::new();
        headers.insert(0, b">entry0 prefixed\0".to_vec());

        let mut data = prologue_bytes();
        data.append(&mut record_bytes(0, 1, &[(4, 0)]));

        let got = extract_a3m(&data, &sequences, &headers).unwrap();
        let expected = b"#ca3m test archive\n>consensus\nACGT\n>entry0 prefixed\nACGT\n".to_vec();

        assert_eq!(got, expected);
    }

    #[test]
    fn every_row_is_padded_to_the_consensus_width() {
        use super::Extractor;

        let mut sequences = MemoryStore::new();
        sequences.insert(0, b"ACGT\0".to_vec());
        sequences.insert(1, b"AC\0".to_vec());
        sequences.insert(2, b"AXYGT\0".to_vec());
        let mut headers = MemoryStore::new();
        headers.insert(0, b"e0\0".to_vec());
        headers.insert(1, b"e1\0".to_vec());
        headers.insert(2, b"e2\0".to_vec());

        let mut data = prologue_bytes();
        data.append(&mut record_bytes(0, 1, &[(4, 0)]));
        data.append(&mut record_bytes(1, 1, &[(2, 0)]));
        data.append(&mut record_bytes(2, 1, &[(1, 2), (2, -1)]));

        let mut extractor = Extractor::new(&data, &sequences, &headers).unwrap();
        while let Some(entry) = extractor.next_entry().unwrap() {
            let row = entry.split(|x| *x == b'\n').nth(1).unwrap().to_vec();
            let non_insertion = row.iter().filter(|x| !x.is_ascii_lowercase()).count();

            assert_eq!(non_insertion, 4);
        }
    }

    #[test]
    fn short_trailing_remnant_is_ignored() {
        use super::extract_a3m;

        let mut sequences = MemoryStore::new();
        sequences.insert(0, b"ACGT\0".to_vec());
        let mut headers = MemoryStore::new();
        headers.insert(0, b"e0\0".to_vec());

        let mut data = prologue_bytes();
        data.append(&mut record_bytes(0, 1, &[(4, 0)]));
        data.extend_from_slice(&[0, 0, 0]);

        let got = extract_a3m(&data, &sequences, &headers).unwrap();
        let expected = b"#ca3m test archive\n>consensus\nACGT\n>e0\nACGT\n".to_vec();

        assert_eq!(got, expected);
    }

    #[test]
    fn record_truncated_mid_blocks_is_an_error() {
        use super::extract_a3m;
        use crate::cursor::TruncatedInput;

        let mut sequences = MemoryStore::new();
        sequences.insert(0, b"ACGT\0".to_vec());
        let mut headers = MemoryStore::new();
        headers.insert(0, b"e0\0".to_vec());

        // Header declares two blocks but only one follows
        let mut data = prologue_bytes();
        data.append(&mut record_bytes(0, 1, &[(2, 0)]));
        let n_blocks_at = prologue_bytes().len() + 6;
        data[n_blocks_at] = 2;

        let got = extract_a3m(&data, &sequences, &headers);

        assert!(got.err().unwrap().downcast_ref::<TruncatedInput>().is_some());
    }

    #[test]
    fn unknown_entry_id_is_an_error() {
        use super::UnknownEntry;
        use super::extract_a3m;

        let sequences = MemoryStore::new();
        let headers = MemoryStore::new();

        let mut data = prologue_bytes();
        data.append(&mut record_bytes(99, 1, &[(4, 0)]));

        let got = extract_a3m(&data, &sequences, &headers);

        let err = got.err().unwrap();
        assert_eq!(err.downcast_ref::<UnknownEntry>(), Some(&UnknownEntry { id: 99 }));
    }

    #[test]
    fn match_run_past_sequence_end_is_an_error() {
        use super::SequenceOverrun;
        use super::extract_a3m;

        let mut sequences = MemoryStore::new();
        sequences.insert(0, b"AC".to_vec());
        let mut headers = MemoryStore::new();
        headers.insert(0, b"e0\0".to_vec());

        let mut data = prologue_bytes();
        data.append(&mut record_bytes(0, 1, &[(4, 0)]));

        let got = extract_a3m(&data, &sequences, &headers);

        let err = got.err().unwrap();
        assert_eq!(err.downcast_ref::<SequenceOverrun>(), Some(&SequenceOverrun { id: 0 }));
    }

    #[test]
    fn zero_start_pos_is_an_error() {
        use super::SequenceOverrun;
        use super::extract_a3m;

        let mut sequences = MemoryStore::new();
        sequences.insert(0, b"ACGT\0".to_vec());
        let mut headers = MemoryStore::new();
        headers.insert(0, b"e0\0".to_vec());

        let mut data = prologue_bytes();
        data.append(&mut record_bytes(0, 0, &[(4, 0)]));

        let got = extract_a3m(&data, &sequences, &headers);

        assert!(got.err().unwrap().downcast_ref::<SequenceOverrun>().is_some());
    }

    #[test]
    fn extractor_iterates_over_entries() {
        use super::Extractor;

        let mut sequences = MemoryStore::new();
        sequences.insert(0, b"ACGT\0".to_vec());
        sequences.insert(1, b"TGCA\0".to_vec());
        let mut headers = MemoryStore::new();
        headers.insert(0, b"e0\0".to_vec());
        headers.insert(1, b"e1\0".to_vec());

        let mut data = prologue_bytes();
        data.append(&mut record_bytes(0, 1, &[(4, 0)]));
        data.append(&mut record_bytes(1, 1, &[(4, 0)]));

        let extractor = Extractor::new(&data, &sequences, &headers).unwrap();
        let got: Vec<Vec<u8>> = extractor.map(|entry| entry.unwrap()).collect();
        let expected: Vec<Vec<u8>> = vec![b">e0\nACGT\n".to_vec(), b">e1\nTGCA\n".to_vec()];

        assert_eq!(got, expected);
    }
}

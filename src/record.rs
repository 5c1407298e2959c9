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
use bincode::{Encode, Decode};
use bincode::encode_into_std_write;
use bincode::decode_from_slice;

use crate::cursor::ByteCursor;

type E = Box<dyn std::error::Error>;

/// Size of an encoded [RecordHeader] in bytes.
pub const RECORD_HEADER_LEN: usize = 8;

/// Fixed-size header of one compressed alignment record.
///
/// The fields are stored little-endian and back-to-back; the
/// (match, indel) blocks follow immediately after, one `u8` match count
/// and one `i8` indel count per block. The field widths are part of the
/// wire format: match and deletion runs can be long, insertion runs
/// cannot, and the indel sign bit doubles as the insert/delete
/// discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct RecordHeader {
    /// Key of the entry in the sequence and header stores.
    pub entry_id: u32,
    /// 1-based offset of the first aligned residue in the stored sequence.
    pub start_pos: u16,
    /// Number of blocks that follow the header.
    pub n_blocks: u16,
}

pub fn encode_record_header(
    header: &RecordHeader,
) -> Result<Vec<u8>, E> {
    let mut bytes: Vec<u8> = Vec::new();
    let nbytes = encode_into_std_write(
        header,
        &mut bytes,
        bincode::config::standard().with_fixed_int_encoding(),
    )?;
    assert_eq!(nbytes, RECORD_HEADER_LEN);
    Ok(bytes)
}

pub fn decode_record_header(
    header_bytes: &[u8],
) -> Result<RecordHeader, E> {
    Ok(decode_from_slice(header_bytes, bincode::config::standard().with_fixed_int_encoding())?.0)
}

pub fn read_record_header(
    cursor: &mut ByteCursor,
) -> Result<RecordHeader, E> {
    let header_bytes = cursor.take(RECORD_HEADER_LEN)?;
    decode_record_header(header_bytes)
}

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

//! Read-only access to ffindex flat-file databases with integer keys.
//!
//! An ffindex database is a pair of files: a data file holding the
//! concatenated entries, each terminated by a NUL byte, and an index file
//! with one `name\toffset\tlength` line per entry. Compressed A3M archives
//! reference their sequence and header databases by integer names, so the
//! index names must parse as integers here.

use std::collections::HashMap;
use std::path::Path;

use crate::store::EntryStore;

type E = Box<dyn std::error::Error>;

/// Error for index lines that do not parse as `integer\toffset\tlength`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedIndex {
    pub line: usize,
}

impl std::fmt::Display for MalformedIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Invalid entry on line {} of the index file", self.line)
    }
}

impl std::error::Error for MalformedIndex {}

/// [EntryStore] over an ffindex data/index file pair.
pub struct FlatFileStore {
    data: Vec<u8>,
    index: HashMap<u32, (usize, usize)>,
}

impl FlatFileStore {
    /// Reads the data and index files into memory.
    pub fn open<P: AsRef<Path>>(
        data_path: P,
        index_path: P,
    ) -> Result<Self, E> {
        let data = std::fs::read(data_path)?;
        let contents = std::fs::read_to_string(index_path)?;

        let mut index: HashMap<u32, (usize, usize)> = HashMap::new();
        for (line_num, line) in contents.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split('\t');
            let id = fields.next().and_then(|x| x.parse::<u32>().ok());
            let offset = fields.next().and_then(|x| x.parse::<usize>().ok());
            let length = fields.next().and_then(|x| x.parse::<usize>().ok());
            match (id, offset, length) {
                (Some(id), Some(offset), Some(length)) => {
                    index.insert(id, (offset, length));
                },
                _ => return Err(Box::new(MalformedIndex { line: line_num + 1 })),
            }
        }

        Ok(FlatFileStore { data, index })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl EntryStore for FlatFileStore {
    fn get(&self, id: u32) -> Option<&[u8]> {
        let (offset, length) = *self.index.get(&id)?;
        self.data.get(offset..offset + length)
    }
}

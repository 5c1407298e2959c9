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

//! Lookup of sequence and header entries referenced by compressed records.
//!
//! Compressed A3M records do not store residues or FASTA headers inline;
//! each record carries an integer key that resolves against two external
//! databases, one holding the full sequences and one holding the header
//! text. [EntryStore] is the read-only capability the decoder needs from
//! both. [MemoryStore] backs the in-memory API and the tests,
//! [FlatFileStore](ffindex::FlatFileStore) reads ffindex databases on disk.

pub mod ffindex;

use std::collections::HashMap;

/// Read-only lookup of immutable byte entries by a non-negative integer key.
pub trait EntryStore {
    /// Returns the entry stored under `id`, or None if the key is unknown.
    fn get(&self, id: u32) -> Option<&[u8]>;
}

/// In-memory [EntryStore] backed by a hash map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<u32, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore { entries: HashMap::new() }
    }

    pub fn insert(&mut self, id: u32, entry: Vec<u8>) {
        self.entries.insert(id, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(u32, Vec<u8>)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (u32, Vec<u8>)>>(iter: I) -> Self {
        MemoryStore { entries: iter.into_iter().collect() }
    }
}

impl EntryStore for MemoryStore {
    fn get(&self, id: u32) -> Option<&[u8]> {
        self.entries.get(&id).map(|entry| entry.as_slice())
    }
}

//! Index (staging area)
//!
//! The index tracks which files should be included in the next commit, together with
//! the stat data recorded when they were staged.
//!
//! ## Index File Format
//!
//! The index file contains:
//! - Header: signature, version and entry count
//! - Entries: staged files in byte-wise path order, each padded to an 8-byte boundary
//! - Checksum: SHA-1 hash of everything before it
//!
//! ## Data Structures
//!
//! - `entries`: maps slash-separated paths to their index entries
//! - `children`: maps directory paths to the entries below them, so that a file
//!   replacing a directory (or the reverse) can evict the stale entries

use crate::areas::database::Database;
use crate::areas::lockfile::Lockfile;
use crate::areas::workspace::Workspace;
use crate::artifacts::index::checksum::{ChecksumReader, ChecksumWriter};
use crate::artifacts::index::index_entry::{ENTRY_BLOCK, ENTRY_FIXED_SIZE, IndexEntry};
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::{CHECKSUM_SIZE, HEADER_SIZE};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::error::{Error, Result};
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::ops::DerefMut;
use std::path::Path;
use tracing::debug;

/// Fixed fields, a one-byte path and its NUL
const MIN_ENTRY_SIZE: usize = ENTRY_FIXED_SIZE + 2;

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.git/index`)
    path: Box<Path>,
    /// Staged files mapped by path
    entries: BTreeMap<String, IndexEntry>,
    /// Directory path to the entries nested anywhere below it
    children: BTreeMap<String, BTreeSet<String>>,
    /// Modified since it was loaded
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            children: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.children.clear();
        self.changed = false;
    }

    /// Load the index from disk
    ///
    /// A missing index file is an empty index. Anything else must parse completely,
    /// a corrupt file is never treated as empty.
    ///
    /// # Locking
    ///
    /// Acquires a shared lock on the index file while reading.
    pub fn rehydrate(&mut self) -> Result<()> {
        self.clear();

        if !self.path.exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new().read(true).open(&self.path)?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        let mut data = Vec::new();
        lock.deref_mut().read_to_end(&mut data)?;

        for entry in Self::parse(&data)? {
            self.store_entry(entry);
        }

        Ok(())
    }

    /// Decode a complete index image, verifying its trailing checksum
    pub fn parse(data: &[u8]) -> Result<Vec<IndexEntry>> {
        if data.len() < HEADER_SIZE {
            return Err(Error::invalid_index(format!(
                "file is {} bytes, shorter than its header",
                data.len()
            )));
        }

        let mut reader = ChecksumReader::new(data);
        let header = IndexHeader::deserialize(reader.read(HEADER_SIZE)?)?;
        header.validate()?;

        // reject counts the data cannot possibly hold
        let available = data.len().saturating_sub(HEADER_SIZE + CHECKSUM_SIZE);
        if header.entries_count as usize > available / MIN_ENTRY_SIZE {
            return Err(Error::invalid_index(format!(
                "{} entries do not fit in {} bytes",
                header.entries_count,
                data.len()
            )));
        }

        let mut entries = Vec::with_capacity(header.entries_count as usize);
        for _ in 0..header.entries_count {
            entries.push(IndexEntry::parse(&mut reader)?);
        }

        reader.verify()?;

        Ok(entries)
    }

    /// Encode the index: header, padded entries in path order, checksum
    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut writer = ChecksumWriter::default();

        let header = IndexHeader::with_entries(self.entries.len() as u32);
        writer.write(&header.serialize()?);

        for entry in self.entries() {
            writer.write(&entry.serialize()?);
            writer.pad_to(ENTRY_BLOCK);
        }

        Ok(writer.finish())
    }

    /// Persist the index through `index.lock`
    pub fn write_updates(&mut self) -> Result<()> {
        let content = self.to_bytes()?;
        Lockfile::acquire(&self.path)?.commit(&content)?;
        self.changed = false;

        debug!(entries = self.entries.len(), bytes = content.len(), "index written");

        Ok(())
    }

    /// Stage a file from the workspace: store its blob and record its stat data
    ///
    /// `path` is relative to the workspace root.
    pub fn add_file(
        &mut self,
        workspace: &Workspace,
        database: &Database,
        path: &str,
    ) -> Result<ObjectId> {
        let content = workspace.read_file(path)?;
        let metadata = workspace.stat_file(path)?;
        let oid = database.put_blob(&content)?;

        self.add(IndexEntry::new(path.to_string(), oid, metadata));

        Ok(oid)
    }

    /// Insert or replace an entry, evicting entries it conflicts with
    pub fn add(&mut self, entry: IndexEntry) {
        self.discard_conflicts(&entry);
        self.store_entry(entry);
        self.changed = true;
    }

    /// Remove a path and everything staged below it; absent paths are ignored
    pub fn remove(&mut self, path: &str) -> bool {
        let removed_entry = self.remove_entry(path);
        let removed_children = self.remove_children(path);

        let removed = removed_entry || removed_children;
        self.changed |= removed;

        removed
    }

    /// A file `a/b` evicts a staged file `a`, a file `a` evicts everything under `a/`
    fn discard_conflicts(&mut self, entry: &IndexEntry) {
        for parent in entry.parent_dirs() {
            self.remove_entry(parent);
        }
        self.remove_children(&entry.name);
    }

    fn store_entry(&mut self, entry: IndexEntry) {
        for parent in entry.parent_dirs() {
            self.children
                .entry(parent.to_string())
                .or_default()
                .insert(entry.name.clone());
        }

        self.entries.insert(entry.name.clone(), entry);
    }

    fn remove_children(&mut self, path: &str) -> bool {
        match self.children.remove(path) {
            Some(children) => {
                for child in children {
                    self.remove_entry(&child);
                }
                true
            }
            None => false,
        }
    }

    fn remove_entry(&mut self, path: &str) -> bool {
        match self.entries.remove(path) {
            None => false,
            Some(entry) => {
                for parent in entry.parent_dirs() {
                    if let Some(children) = self.children.get_mut(parent) {
                        children.remove(path);
                        if children.is_empty() {
                            self.children.remove(parent);
                        }
                    }
                }

                true
            }
        }
    }
}

//! Tree object
//!
//! Trees represent directory snapshots. They contain entries for files (blobs) and
//! subdirectories (other trees), along with their names and modes.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! ## Tree Building
//!
//! [`Tree::build`] partitions the staged paths by depth: entries whose path ends at the
//! current depth become file members, the rest are grouped by their next path segment
//! and built recursively. Subtrees are stored before their parent so that every entry
//! refers to an object that already exists.
//!
//! Entries are kept in canonical Git order. Directory keys carry a trailing `/` so
//! that `dir` sorts as `dir/` against its siblings (`dir.txt` < `dir/` < `dir0`).

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::error::{Error, Result};
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    /// Entries keyed by sort name (directory names end with '/')
    entries: BTreeMap<String, DatabaseEntry>,
}

impl Tree {
    /// Build and persist the tree hierarchy for a flat list of index entries
    ///
    /// `store` is called once per tree, children before parents, and must return the
    /// id under which the tree was persisted.
    ///
    /// # Returns
    ///
    /// The id of the root tree
    pub fn build<F>(entries: &[&IndexEntry], store: &mut F) -> Result<ObjectId>
    where
        F: FnMut(&Tree) -> Result<ObjectId>,
    {
        Self::build_level(entries, 0, store)
    }

    fn build_level<F>(entries: &[&IndexEntry], depth: usize, store: &mut F) -> Result<ObjectId>
    where
        F: FnMut(&Tree) -> Result<ObjectId>,
    {
        let mut tree = Tree::default();
        let mut subdirectories: BTreeMap<&str, Vec<&IndexEntry>> = BTreeMap::new();

        for &entry in entries {
            let mut segments = entry.segments().skip(depth);
            let name = segments
                .next()
                .ok_or_else(|| Error::invalid_object(format!("path {} is too short", entry.name)))?;

            if segments.next().is_none() {
                tree.insert(name, DatabaseEntry::new(entry.oid, entry.metadata.mode));
            } else {
                subdirectories.entry(name).or_default().push(entry);
            }
        }

        for (name, children) in subdirectories {
            let oid = Self::build_level(&children, depth + 1, store)?;
            tree.insert(name, DatabaseEntry::new(oid, EntryMode::Directory));
        }

        store(&tree)
    }

    pub fn insert(&mut self, name: &str, entry: DatabaseEntry) {
        let key = if entry.is_tree() {
            format!("{name}/")
        } else {
            name.to_string()
        };

        self.entries.insert(key, entry);
    }

    pub fn get(&self, name: &str) -> Option<&DatabaseEntry> {
        self.entries
            .get(name)
            .or_else(|| self.entries.get(&format!("{name}/")))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in serialization order, with plain names
    pub fn entries(&self) -> impl Iterator<Item = (&str, &DatabaseEntry)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.trim_end_matches('/'), entry))
    }
}

impl Packable for Tree {
    fn serialize(&self) -> Result<Bytes> {
        let mut content = Vec::new();

        for (name, entry) in self.entries() {
            write!(content, "{} {}", entry.mode.as_str(), name)?;
            content.push(0);
            entry.oid.write_to(&mut content)?;
        }

        Ok(Bytes::from(content))
    }
}

impl Unpackable for Tree {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let mut tree = Tree::default();

        // Reuse scratch buffers to reduce allocs
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            // Read "mode " (space-delimited)
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(Error::invalid_object("unexpected EOF in tree entry mode"));
            }

            let mode_str = std::str::from_utf8(&mode_bytes)
                .map_err(|_| Error::invalid_object("tree entry mode is not UTF-8"))?;
            let mode = EntryMode::from_octal_str(mode_str)?;

            // Read "name\0"
            name_bytes.clear();
            reader.read_until(b'\0', &mut name_bytes)?;
            if name_bytes.pop() != Some(b'\0') {
                return Err(Error::invalid_object("unexpected EOF in tree entry name"));
            }
            let name = std::str::from_utf8(&name_bytes)
                .map_err(|_| Error::invalid_object("tree entry name is not UTF-8"))?
                .to_owned();

            let oid = ObjectId::read_from(&mut reader)
                .map_err(|_| Error::invalid_object("unexpected EOF in tree entry id"))?;

            tree.insert(&name, DatabaseEntry::new(oid, mode));
        }

        Ok(tree)
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries()
            .map(|(name, entry)| {
                format!(
                    "{:0>6} {} {}\t{}",
                    entry.mode.as_str(),
                    entry.mode.object_type(),
                    entry.oid,
                    name
                )
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}

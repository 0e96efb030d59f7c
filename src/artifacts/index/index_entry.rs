//! Index entry representation
//!
//! Each entry in the index represents a staged file with:
//! - Slash-separated path relative to the repository root
//! - Content hash (object ID of the blob)
//! - File metadata (mode, size, timestamps) and merge stage
//!
//! ## Entry Format
//!
//! ```text
//! ctime s | ctime ns | mtime s | mtime ns | dev | ino | mode | uid | gid | size   (u32 each)
//! oid (20 bytes) | flags (u16: stage << 12 | min(path length, 0x0FFF))
//! path bytes | NUL | zero padding to the next 8-byte boundary of the file offset
//! ```

use crate::artifacts::index::checksum::ChecksumReader;
use crate::artifacts::index::entry_mode::{EntryMode, FileMode};
use crate::artifacts::objects::object::Packable;
use crate::artifacts::objects::object_id::ObjectId;
use crate::error::{Error, Result};
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::fs::Metadata;
use std::io::Write;
use std::os::unix::prelude::MetadataExt;

/// Largest path length representable in the flags field; longer paths are NUL-scanned
pub const MAX_PATH_SIZE: usize = 0x0FFF;

/// Block size for entry alignment (8 bytes)
pub const ENTRY_BLOCK: usize = 8;

/// Size of the fixed-width part of an entry, up to and including the flags
pub const ENTRY_FIXED_SIZE: usize = 62;

const STAGE_SHIFT: u16 = 12;
const STAGE_MASK: u16 = 0x3000;
const PATH_LENGTH_MASK: u16 = 0x0FFF;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexEntry {
    /// Slash-separated path relative to the repository root
    pub name: String,
    /// Object id of the staged blob
    pub oid: ObjectId,
    pub metadata: EntryMetadata,
}

impl IndexEntry {
    /// Every ancestor directory, outermost first: `a/b/c` gives `["a", "a/b"]`
    pub fn parent_dirs(&self) -> Vec<&str> {
        self.name
            .match_indices('/')
            .map(|(separator, _)| &self.name[..separator])
            .collect()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.name.split('/')
    }

    fn flags(&self) -> u16 {
        let path_length = self.name.len().min(MAX_PATH_SIZE) as u16;
        ((self.metadata.stage as u16) << STAGE_SHIFT) & STAGE_MASK | path_length
    }

    /// Decode one entry starting at the reader's position, consuming its padding
    pub(crate) fn parse(reader: &mut ChecksumReader) -> Result<Self> {
        let bytes = reader.read(ENTRY_FIXED_SIZE)?;

        let ctime = byteorder::NetworkEndian::read_u32(&bytes[0..4]);
        let ctime_nsec = byteorder::NetworkEndian::read_u32(&bytes[4..8]);
        let mtime = byteorder::NetworkEndian::read_u32(&bytes[8..12]);
        let mtime_nsec = byteorder::NetworkEndian::read_u32(&bytes[12..16]);
        let dev = byteorder::NetworkEndian::read_u32(&bytes[16..20]);
        let ino = byteorder::NetworkEndian::read_u32(&bytes[20..24]);
        let mode = EntryMode::try_from(byteorder::NetworkEndian::read_u32(&bytes[24..28]))?;
        let uid = byteorder::NetworkEndian::read_u32(&bytes[28..32]);
        let gid = byteorder::NetworkEndian::read_u32(&bytes[32..36]);
        let size = byteorder::NetworkEndian::read_u32(&bytes[36..40]);
        let oid = ObjectId::read_from(&mut &bytes[40..60])?;
        let flags = byteorder::NetworkEndian::read_u16(&bytes[60..62]);

        let path_length = (flags & PATH_LENGTH_MASK) as usize;
        let name_bytes = if path_length < MAX_PATH_SIZE {
            let name_bytes = reader.read(path_length)?;
            if reader.read(1)?[0] != 0 {
                return Err(Error::invalid_index("path is not NUL-terminated"));
            }
            name_bytes
        } else {
            // the length saturated, trust the terminator instead
            reader.read_until_nul()?
        };

        let name = std::str::from_utf8(name_bytes)
            .map_err(|_| Error::invalid_index("path is not valid UTF-8"))?
            .to_string();
        if name.is_empty() {
            return Err(Error::invalid_index("empty path"));
        }

        reader.skip_padding(ENTRY_BLOCK)?;

        Ok(IndexEntry {
            name,
            oid,
            metadata: EntryMetadata {
                ctime,
                ctime_nsec,
                mtime,
                mtime_nsec,
                dev,
                ino,
                mode,
                uid,
                gid,
                size,
                stage: ((flags & STAGE_MASK) >> STAGE_SHIFT) as u8,
            },
        })
    }
}

impl PartialOrd for IndexEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name
            .as_bytes()
            .cmp(other.name.as_bytes())
            .then(self.metadata.stage.cmp(&other.metadata.stage))
    }
}

/// File metadata stored in index entries
///
/// Values are kept at the on-disk width (32 bits); wider filesystem values are
/// truncated the same way Git truncates them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    /// Change time (seconds since Unix epoch)
    pub ctime: u32,
    pub ctime_nsec: u32,
    /// Modification time (seconds since Unix epoch)
    pub mtime: u32,
    pub mtime_nsec: u32,
    pub dev: u32,
    pub ino: u32,
    pub mode: EntryMode,
    pub uid: u32,
    pub gid: u32,
    /// File size in bytes
    pub size: u32,
    /// Merge stage, 0 for normal entries
    pub stage: u8,
}

impl Packable for IndexEntry {
    /// Fixed fields, path and terminating NUL; alignment padding depends on the
    /// entry's offset in the file and is added by the index writer.
    fn serialize(&self) -> Result<Bytes> {
        let mut entry_bytes = Vec::with_capacity(ENTRY_FIXED_SIZE + self.name.len() + 1);
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.ctime)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.ctime_nsec)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.mtime)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.mtime_nsec)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.dev)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.ino)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.mode.as_u32())?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.uid)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.gid)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.size)?;
        self.oid.write_to(&mut entry_bytes)?;
        entry_bytes.write_u16::<byteorder::NetworkEndian>(self.flags())?;
        entry_bytes.write_all(self.name.as_bytes())?;
        entry_bytes.push(0);

        Ok(Bytes::from(entry_bytes))
    }
}

impl From<&Metadata> for EntryMetadata {
    fn from(metadata: &Metadata) -> Self {
        Self {
            ctime: metadata.ctime() as u32,
            ctime_nsec: metadata.ctime_nsec() as u32,
            mtime: metadata.mtime() as u32,
            mtime_nsec: metadata.mtime_nsec() as u32,
            dev: metadata.dev() as u32,
            ino: metadata.ino() as u32,
            mode: EntryMode::File(FileMode::Regular),
            uid: metadata.uid(),
            gid: metadata.gid(),
            size: metadata.size() as u32,
            stage: 0,
        }
    }
}

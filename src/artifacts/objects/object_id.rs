//! Object identifier (SHA-1 digest)
//!
//! An object id is the 20-byte SHA-1 of an object's framed content. It is rendered as
//! 40 lowercase hexadecimal characters.
//!
//! ## Storage
//!
//! Objects are stored in `.git/objects/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::{OBJECT_ID_LENGTH, OBJECT_ID_SIZE};
use crate::error::{Error, Result};
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId([u8; OBJECT_ID_SIZE]);

impl ObjectId {
    pub fn from_bytes(bytes: [u8; OBJECT_ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// Parse and validate an object id from its 40-character hex form
    pub fn try_parse(id: &str) -> Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(Error::InvalidObjectId(format!(
                "expected {} characters, got {}",
                OBJECT_ID_LENGTH,
                id.len()
            )));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidObjectId(id.to_string()));
        }

        let mut bytes = [0u8; OBJECT_ID_SIZE];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&id[2 * i..2 * i + 2], 16)
                .map_err(|_| Error::InvalidObjectId(id.to_string()))?;
        }

        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; OBJECT_ID_SIZE] {
        &self.0
    }

    /// Write the raw 20 bytes, as used inside tree objects and index entries
    pub fn write_to<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.0)
    }

    /// Read the raw 20 bytes back
    pub fn read_from<R: io::Read + ?Sized>(reader: &mut R) -> io::Result<Self> {
        let mut bytes = [0u8; OBJECT_ID_SIZE];
        reader.read_exact(&mut bytes)?;

        Ok(Self(bytes))
    }

    /// Splits the hash as `XX/YYYY...` where XX is the first 2 hex chars.
    pub fn to_path(&self) -> PathBuf {
        let hex = self.to_string();
        let (dir, file) = hex.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First 7 hex characters
    pub fn to_short_oid(&self) -> String {
        self.to_string()[..7].to_string()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_parse(s)
    }
}

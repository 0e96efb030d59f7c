use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::error::{Error, Result};
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexHeader {
    pub(crate) marker: [u8; 4],
    pub(crate) version: u32,
    pub(crate) entries_count: u32,
}

impl IndexHeader {
    pub(crate) fn with_entries(entries_count: u32) -> Self {
        IndexHeader {
            marker: *SIGNATURE,
            version: VERSION,
            entries_count,
        }
    }

    /// Reject anything that is not a version 2 `DIRC` header
    pub(crate) fn validate(&self) -> Result<()> {
        if &self.marker != SIGNATURE {
            return Err(Error::invalid_index("bad signature"));
        }

        if self.version != VERSION {
            return Err(Error::invalid_index(format!(
                "unsupported version {}",
                self.version
            )));
        }

        Ok(())
    }
}

impl Packable for IndexHeader {
    fn serialize(&self) -> Result<Bytes> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE);
        bytes.write_all(&self.marker)?;
        bytes.write_u32::<byteorder::NetworkEndian>(self.version)?;
        bytes.write_u32::<byteorder::NetworkEndian>(self.entries_count)?;

        Ok(Bytes::from(bytes))
    }
}

impl Unpackable for IndexHeader {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let mut bytes = [0u8; HEADER_SIZE];
        reader
            .read_exact(&mut bytes)
            .map_err(|_| Error::invalid_index("truncated header"))?;

        let mut marker = [0u8; 4];
        marker.copy_from_slice(&bytes[0..4]);
        let version = byteorder::NetworkEndian::read_u32(&bytes[4..8]);
        let entries_count = byteorder::NetworkEndian::read_u32(&bytes[8..12]);

        Ok(IndexHeader {
            marker,
            version,
            entries_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout_is_big_endian() {
        let bytes = IndexHeader::with_entries(3).serialize().unwrap();

        pretty_assertions::assert_eq!(
            bytes.as_ref(),
            b"DIRC\x00\x00\x00\x02\x00\x00\x00\x03".as_slice()
        );
    }

    #[test]
    fn rejects_other_versions() {
        let header = IndexHeader::new(*SIGNATURE, 3, 0);

        assert!(matches!(header.validate(), Err(Error::InvalidIndex(_))));
    }
}

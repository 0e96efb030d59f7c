//! Checksummed access to an index image
//!
//! Both halves hash every byte that passes through them so the trailing SHA-1 can be
//! produced (writer) or checked (reader) without a second pass.

use crate::artifacts::core::hasher::Hasher;
use crate::artifacts::index::CHECKSUM_SIZE;
use crate::error::{Error, Result};
use bytes::Bytes;

#[derive(Debug)]
pub struct ChecksumReader<'b> {
    data: &'b [u8],
    position: usize,
    hasher: Hasher,
}

impl<'b> ChecksumReader<'b> {
    pub(crate) fn new(data: &'b [u8]) -> Self {
        ChecksumReader {
            data,
            position: 0,
            hasher: Hasher::default(),
        }
    }

    /// Offset from the start of the index
    pub(crate) fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn read(&mut self, size: usize) -> Result<&'b [u8]> {
        let end = self
            .position
            .checked_add(size)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| Error::invalid_index("unexpected end of index"))?;

        let chunk = &self.data[self.position..end];
        self.hasher.update(chunk);
        self.position = end;

        Ok(chunk)
    }

    /// Read up to the next NUL, consuming it, and return the bytes before it
    pub(crate) fn read_until_nul(&mut self) -> Result<&'b [u8]> {
        let length = self.data[self.position..]
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Error::invalid_index("path is not NUL-terminated"))?;

        let chunk = self.read(length)?;
        self.read(1)?;

        Ok(chunk)
    }

    /// Consume zero bytes until the position is a multiple of `block`
    pub(crate) fn skip_padding(&mut self, block: usize) -> Result<()> {
        while self.position % block != 0 {
            if self.read(1)?[0] != 0 {
                return Err(Error::invalid_index("non-zero entry padding"));
            }
        }

        Ok(())
    }

    /// Compare the trailing checksum with the digest of everything read so far
    pub(crate) fn verify(self) -> Result<()> {
        let remaining = &self.data[self.position..];
        if remaining.len() != CHECKSUM_SIZE {
            return Err(Error::invalid_index(format!(
                "expected a {CHECKSUM_SIZE}-byte checksum, found {} trailing bytes",
                remaining.len()
            )));
        }

        let actual = self.hasher.finalize();
        if actual.as_bytes().as_slice() != remaining {
            return Err(Error::invalid_index("checksum does not match content"));
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ChecksumWriter {
    buffer: Vec<u8>,
    hasher: Hasher,
}

impl ChecksumWriter {
    pub(crate) fn write(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
        self.hasher.update(data);
    }

    pub(crate) fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Append zero bytes until the total length is a multiple of `block`
    pub(crate) fn pad_to(&mut self, block: usize) {
        let padding = (block - self.len() % block) % block;
        self.write(&vec![0u8; padding]);
    }

    /// Append the digest of everything written and hand back the finished image
    pub(crate) fn finish(mut self) -> Bytes {
        let checksum = self.hasher.finalize();
        self.buffer.extend_from_slice(checksum.as_bytes());

        Bytes::from(self.buffer)
    }
}

use crate::artifacts::objects::OBJECT_ID_SIZE;
use crate::artifacts::objects::object_id::ObjectId;
use sha1::{Digest, Sha1};

/// Digest of a complete byte sequence
pub fn digest(data: &[u8]) -> ObjectId {
    let mut hasher = Hasher::default();
    hasher.update(data);
    hasher.finalize()
}

/// Incremental digest, fed chunk by chunk
#[derive(Debug, Clone, Default)]
pub struct Hasher {
    inner: Sha1,
}

impl Hasher {
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    pub fn finalize(self) -> ObjectId {
        let mut bytes = [0u8; OBJECT_ID_SIZE];
        bytes.copy_from_slice(self.inner.finalize().as_slice());
        ObjectId::from_bytes(bytes)
    }
}

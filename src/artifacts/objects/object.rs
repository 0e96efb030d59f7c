use crate::artifacts::core::hasher;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::error::Result;
use bytes::Bytes;
use std::io::BufRead;

/// Binary encoding of a value (for objects: the payload without the frame header)
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn display(&self) -> String;

    /// Payload prefixed with its `<type> <size>\0` header
    fn framed(&self) -> Result<Bytes> {
        let content = self.serialize()?;
        Ok(frame(self.object_type(), &content))
    }

    fn object_id(&self) -> Result<ObjectId> {
        Ok(hasher::digest(&self.framed()?))
    }
}

pub fn frame(object_type: ObjectType, content: &[u8]) -> Bytes {
    let header = object_type.header(content.len());

    let mut framed = Vec::with_capacity(header.len() + content.len());
    framed.extend_from_slice(header.as_bytes());
    framed.extend_from_slice(content);

    Bytes::from(framed)
}

pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
}

impl ObjectBox {
    pub fn object_type(&self) -> ObjectType {
        match self {
            ObjectBox::Blob(_) => ObjectType::Blob,
            ObjectBox::Tree(_) => ObjectType::Tree,
            ObjectBox::Commit(_) => ObjectType::Commit,
        }
    }
}

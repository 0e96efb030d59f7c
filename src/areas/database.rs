//! Object database
//!
//! Content-addressable storage under `.git/objects`. Every object is framed with its
//! `<type> <size>\0` header, hashed, zlib-compressed and stored at
//! `objects/<first 2 hex>/<remaining 38 hex>`.
//!
//! Objects are written to a temporary file inside their bucket and renamed into
//! place, so an object file is either absent or complete.

use crate::artifacts::core::compression;
use crate::artifacts::core::hasher;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::error::{Error, Result};
use bytes::Bytes;
use fake::rand;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn put_blob(&self, content: &[u8]) -> Result<ObjectId> {
        self.write_object(ObjectType::Blob, content)
    }

    /// Store already serialized tree entries
    pub fn put_tree(&self, entries: &[u8]) -> Result<ObjectId> {
        self.write_object(ObjectType::Tree, entries)
    }

    /// Store already serialized commit text
    pub fn put_commit(&self, commit: &[u8]) -> Result<ObjectId> {
        self.write_object(ObjectType::Commit, commit)
    }

    pub fn store<O: Object + ?Sized>(&self, object: &O) -> Result<ObjectId> {
        let content = object.serialize()?;

        match object.object_type() {
            ObjectType::Blob => self.put_blob(&content),
            ObjectType::Tree => self.put_tree(&content),
            ObjectType::Commit => self.put_commit(&content),
        }
    }

    pub fn exists(&self, object_id: &ObjectId) -> bool {
        self.object_path(object_id).is_file()
    }

    /// Read an object back, validating its header
    ///
    /// # Returns
    ///
    /// The object type and its payload (without the header)
    pub fn load(&self, object_id: &ObjectId) -> Result<(ObjectType, Bytes)> {
        let object_path = self.object_path(object_id);

        let compressed = std::fs::read(&object_path).map_err(|error| match error.kind() {
            std::io::ErrorKind::NotFound => {
                Error::invalid_object(format!("object {object_id} not found"))
            }
            _ => Error::Io(error),
        })?;
        let content = compression::decompress(&compressed)?;

        let mut reader = Cursor::new(&content[..]);
        let (object_type, size) = ObjectType::parse_header(&mut reader)?;
        let payload = content.slice(reader.position() as usize..);

        if payload.len() != size {
            return Err(Error::invalid_object(format!(
                "object {object_id} declares {size} bytes but holds {}",
                payload.len()
            )));
        }

        Ok((object_type, payload))
    }

    pub fn parse_object(&self, object_id: &ObjectId) -> Result<ObjectBox> {
        let (object_type, payload) = self.load(object_id)?;
        let reader = Cursor::new(payload);

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Box::new(Blob::deserialize(reader)?))),
            ObjectType::Tree => Ok(ObjectBox::Tree(Box::new(Tree::deserialize(reader)?))),
            ObjectType::Commit => Ok(ObjectBox::Commit(Box::new(Commit::deserialize(reader)?))),
        }
    }

    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> Result<Option<Tree>> {
        match self.parse_object(object_id)? {
            ObjectBox::Tree(tree) => Ok(Some(*tree)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> Result<Option<Commit>> {
        match self.parse_object(object_id)? {
            ObjectBox::Commit(commit) => Ok(Some(*commit)),
            _ => Ok(None),
        }
    }

    fn object_path(&self, object_id: &ObjectId) -> PathBuf {
        self.path.join(object_id.to_path())
    }

    fn write_object(&self, object_type: ObjectType, content: &[u8]) -> Result<ObjectId> {
        let framed = frame(object_type, content);
        let object_id = hasher::digest(&framed);
        let object_path = self.object_path(&object_id);

        // identical content is already stored under the same name
        if object_path.exists() {
            return Ok(object_id);
        }

        let object_dir = object_path
            .parent()
            .ok_or_else(|| Error::invalid_object(format!("invalid object path {}", object_path.display())))?;
        std::fs::create_dir_all(object_dir)?;

        let compressed = compression::compress(&framed)?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)?;
        if let Err(error) = file.write_all(&compressed) {
            let _ = std::fs::remove_file(&temp_object_path);
            return Err(error.into());
        }
        drop(file);

        Self::persist(&temp_object_path, &object_path)?;

        debug!(oid = %object_id, kind = object_type.as_str(), size = content.len(), "object written");

        Ok(object_id)
    }

    /// Rename the temp file onto the object path, removing it if the rename fails
    fn persist(temp_object_path: &Path, object_path: &Path) -> Result<()> {
        if let Err(error) = std::fs::rename(temp_object_path, object_path) {
            let _ = std::fs::remove_file(temp_object_path);
            return Err(error.into());
        }

        Ok(())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}

//! Core primitives shared by the object store and the index
//!
//! - `hasher`: SHA-1 digests used as object identity and as the index checksum
//! - `compression`: zlib compression applied to every stored object

pub mod compression;
pub mod hasher;

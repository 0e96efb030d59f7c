//! Data structures and encodings
//!
//! - `branch`: Branch names and symbolic ref syntax
//! - `core`: Hashing and compression
//! - `database`: Entries of stored trees
//! - `index`: Index entries and the `DIRC` file codec
//! - `objects`: Object types (blob, tree, commit) and their ids

pub mod branch;
pub mod core;
pub mod database;
pub mod index;
pub mod objects;

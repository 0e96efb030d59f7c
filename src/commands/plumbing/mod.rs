//! Plumbing commands (low-level operations)
//!
//! ## Commands
//!
//! - `hash-object`: Compute a blob id and optionally store it
//! - `cat-file`: Print a stored object

pub mod cat_file;
pub mod hash_object;

//! Porcelain commands (user-facing operations)
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`: Stage files for commit
//! - `commit`: Snapshot the index and advance the branch
//! - `unstage`: Remove paths from the index (`rm --cached`)

pub mod add;
pub mod commit;
pub mod init;
pub mod unstage;

//! Branch names and the symbolic refs that point at them

pub mod branch_name;

/// Names Git refuses as branch names: leading dot or slash, `/.`, `..`, trailing
/// slash, `.lock` suffix, `@{`, control characters, space and `*:?[\~^`
pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";

/// Content of a symbolic ref file: `ref: <target>`
pub const SYMREF_REGEX: &str = r"^ref: (.+)$";

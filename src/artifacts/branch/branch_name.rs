use crate::artifacts::branch::INVALID_BRANCH_NAME_REGEX;
use crate::error::{Error, Result};

pub const REF_PREFIX: &str = "refs/heads/";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let invalid = |reason: String| Error::InvalidRef {
            name: name.clone(),
            reason,
        };

        if name.is_empty() {
            return Err(invalid("branch name cannot be empty".to_string()));
        }

        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .map_err(|error| invalid(error.to_string()))?;

        if re.is_match(&name) {
            Err(invalid("not a valid branch name".to_string()))
        } else {
            Ok(Self(name))
        }
    }

    /// Full ref name, `refs/heads/<name>`
    pub fn to_ref_name(&self) -> String {
        format!("{REF_PREFIX}{}", self.0)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! Repository configuration
//!
//! The commit identity and the branch name are taken from the environment, the same
//! variables Git itself honours. Anything unset falls back to a fixed default so that
//! a commit can always be produced.

use crate::artifacts::objects::commit::Author;
use chrono::{DateTime, FixedOffset};

/// Branch used when `CAIRN_BRANCH` is not set
pub const DEFAULT_BRANCH: &str = "master";

const DEFAULT_NAME: &str = "cairn";
const DEFAULT_EMAIL: &str = "cairn@localhost";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
    /// Fixed timestamp; `None` means "now" at commit time
    pub date: Option<DateTime<FixedOffset>>,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Identity {
            name: name.into(),
            email: email.into(),
            date: None,
        }
    }

    pub fn with_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.date = Some(date);
        self
    }

    /// Materialize the identity into a signature stamped with its date, or `now` when
    /// no date is configured
    pub fn to_author(&self, now: DateTime<FixedOffset>) -> Author {
        Author::new_with_timestamp(self.name.clone(), self.email.clone(), self.date.unwrap_or(now))
    }
}

impl Default for Identity {
    fn default() -> Self {
        Identity::new(DEFAULT_NAME, DEFAULT_EMAIL)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub branch: String,
    pub author: Identity,
    pub committer: Identity,
}

impl Config {
    pub fn new(branch: impl Into<String>, author: Identity, committer: Identity) -> Self {
        Config {
            branch: branch.into(),
            author,
            committer,
        }
    }

    /// Load the configuration from `GIT_AUTHOR_*`, `GIT_COMMITTER_*` and `CAIRN_BRANCH`.
    ///
    /// Committer fields fall back to the author's when unset.
    pub fn from_env() -> Self {
        let author = Identity {
            name: env_or("GIT_AUTHOR_NAME", DEFAULT_NAME),
            email: env_or("GIT_AUTHOR_EMAIL", DEFAULT_EMAIL),
            date: std::env::var("GIT_AUTHOR_DATE")
                .ok()
                .and_then(|date| parse_date(&date)),
        };
        let committer = Identity {
            name: std::env::var("GIT_COMMITTER_NAME").unwrap_or_else(|_| author.name.clone()),
            email: std::env::var("GIT_COMMITTER_EMAIL").unwrap_or_else(|_| author.email.clone()),
            date: std::env::var("GIT_COMMITTER_DATE")
                .ok()
                .and_then(|date| parse_date(&date))
                .or(author.date),
        };

        Config {
            branch: env_or("CAIRN_BRANCH", DEFAULT_BRANCH),
            author,
            committer,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(DEFAULT_BRANCH, Identity::default(), Identity::default())
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Accepts RFC 2822 dates and `2024-01-31 12:00:00 +0100`.
pub fn parse_date(date: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(date)
        .or_else(|_| DateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S %z"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Wed, 31 Jan 2024 12:00:00 +0100", 1706698800)]
    #[case("2024-01-31 12:00:00 +0100", 1706698800)]
    fn parses_supported_date_formats(#[case] input: &str, #[case] expected: i64) {
        let date = parse_date(input).expect("date should parse");
        pretty_assertions::assert_eq!(date.timestamp(), expected);
        pretty_assertions::assert_eq!(date.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn rejects_unknown_date_formats() {
        assert!(parse_date("yesterday").is_none());
    }

    #[test]
    fn fixed_identity_produces_stable_signature() {
        let date = parse_date("2024-01-31 12:00:00 +0100").unwrap();
        let identity = Identity::new("Ada", "ada@example.com").with_date(date);

        pretty_assertions::assert_eq!(
            identity.to_author(chrono::Local::now().fixed_offset()).display(),
            "Ada <ada@example.com> 1706698800 +0100"
        );
    }

    #[test]
    fn undated_identities_share_the_commit_time() {
        let now = parse_date("2024-01-31 12:00:00 +0100").unwrap();
        let config = Config::default();

        let author = config.author.to_author(now);
        let committer = config.committer.to_author(now);

        pretty_assertions::assert_eq!(author.timestamp(), now);
        pretty_assertions::assert_eq!(committer.timestamp(), author.timestamp());
    }
}

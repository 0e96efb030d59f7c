//! Commit object
//!
//! Commits record a snapshot: the root tree, the previous commit on the branch (absent
//! for the root commit), author and committer signatures, and a message.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::error::{Error, Result};
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use std::io::BufRead;

/// Author or committer signature
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: DateTime<FixedOffset>,
}

impl Author {
    pub fn new_with_timestamp(name: String, email: String, timestamp: DateTime<FixedOffset>) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// `Name <email> <unix seconds> <+hhmm>`
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }
}

impl TryFrom<&str> for Author {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::invalid_object(format!("invalid signature: {reason}"));

        // Format: "name <email> timestamp timezone"
        // Split from right to get timezone and timestamp first
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(invalid("missing fields"));
        }

        let offset = parse_offset(parts[0]).ok_or_else(|| invalid("bad timezone"))?;
        let timestamp = parts[1]
            .parse::<i64>()
            .map_err(|_| invalid("bad timestamp"))?;
        let name_email_part = parts[2];

        let email_start = name_email_part
            .find('<')
            .ok_or_else(|| invalid("missing '<'"))?;
        let email_end = name_email_part
            .rfind('>')
            .filter(|end| *end > email_start)
            .ok_or_else(|| invalid("missing '>'"))?;

        let timestamp = DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| invalid("timestamp out of range"))?
            .with_timezone(&offset);

        Ok(Author {
            name: name_email_part[..email_start].trim().to_string(),
            email: name_email_part[email_start + 1..email_end].to_string(),
            timestamp,
        })
    }
}

/// Parse `+hhmm` / `-hhmm`
fn parse_offset(timezone: &str) -> Option<FixedOffset> {
    let (sign, digits) = match timezone.strip_prefix('+') {
        Some(digits) => (1, digits),
        None => (-1, timezone.strip_prefix('-')?),
    };
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours = digits.get(..2)?.parse::<i32>().ok()?;
    let minutes = digits.get(2..)?.parse::<i32>().ok()?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Previous commit on the branch, `None` for the root commit
    parent: Option<ObjectId>,
    tree_oid: ObjectId,
    author: Author,
    committer: Author,
    /// Always ends with a newline
    message: String,
}

impl Commit {
    pub fn new(
        parent: Option<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        committer: Author,
        message: String,
    ) -> Self {
        let mut message = message;
        if !message.ends_with('\n') {
            message.push('\n');
        }

        Commit {
            parent,
            tree_oid,
            author,
            committer,
            message,
        }
    }

    /// First line of the message
    pub fn short_message(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn committer(&self) -> &Author {
        &self.committer
    }
}

impl Packable for Commit {
    fn serialize(&self) -> Result<Bytes> {
        Ok(Bytes::from(self.display()))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|_| Error::invalid_object("commit is not UTF-8"))?;

        let (headers, message) = content
            .split_once("\n\n")
            .ok_or_else(|| Error::invalid_object("commit has no message separator"))?;
        let mut lines = headers.lines().peekable();

        let tree_oid = lines
            .next()
            .and_then(|line| line.strip_prefix("tree "))
            .ok_or_else(|| Error::invalid_object("missing tree line"))?;
        let tree_oid = ObjectId::try_parse(tree_oid)?;

        let parent = match lines.peek().and_then(|line| line.strip_prefix("parent ")) {
            Some(parent) => {
                let parent = ObjectId::try_parse(parent)?;
                lines.next();
                Some(parent)
            }
            None => None,
        };

        let author = lines
            .next()
            .and_then(|line| line.strip_prefix("author "))
            .ok_or_else(|| Error::invalid_object("missing author line"))?;
        let committer = lines
            .next()
            .and_then(|line| line.strip_prefix("committer "))
            .ok_or_else(|| Error::invalid_object("missing committer line"))?;

        Ok(Commit::new(
            parent,
            tree_oid,
            Author::try_from(author)?,
            Author::try_from(committer)?,
            message.to_string(),
        ))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        let mut lines = vec![format!("tree {}", self.tree_oid)];
        if let Some(parent) = &self.parent {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines.push(String::new());
        lines.push(self.message.clone());

        lines.join("\n")
    }
}

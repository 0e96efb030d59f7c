use crate::artifacts::objects::object_type::ObjectType;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Eq, Ord, Default, PartialEq, PartialOrd, Hash)]
pub enum FileMode {
    #[default]
    Regular,
    Executable,
}

#[derive(Debug, Clone, Copy, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum EntryMode {
    File(FileMode),
    Directory,
}

impl Default for EntryMode {
    fn default() -> Self {
        EntryMode::File(FileMode::Regular)
    }
}

impl EntryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryMode::File(FileMode::Regular) => "100644",
            EntryMode::File(FileMode::Executable) => "100755",
            EntryMode::Directory => "40000",
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            EntryMode::File(FileMode::Regular) => 0o100644,
            EntryMode::File(FileMode::Executable) => 0o100755,
            EntryMode::Directory => 0o40000,
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, EntryMode::Directory)
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            EntryMode::File(_) => ObjectType::Blob,
            EntryMode::Directory => ObjectType::Tree,
        }
    }

    /// Parse the octal text used inside tree objects (`100644`, `40000`, ...)
    pub fn from_octal_str(mode: &str) -> Result<Self> {
        let mode = u32::from_str_radix(mode, 8)
            .map_err(|_| Error::invalid_object(format!("invalid entry mode {mode}")))?;

        EntryMode::try_from(mode).map_err(|_| Error::invalid_object(format!("unsupported entry mode {mode:o}")))
    }
}

impl TryFrom<u32> for EntryMode {
    type Error = Error;

    fn try_from(mode: u32) -> Result<Self> {
        match mode {
            0o100644 => Ok(EntryMode::File(FileMode::Regular)),
            0o100755 => Ok(EntryMode::File(FileMode::Executable)),
            0o40000 => Ok(EntryMode::Directory),
            other => Err(Error::invalid_index(format!("unsupported entry mode {other:o}"))),
        }
    }
}

impl From<FileMode> for EntryMode {
    fn from(mode: FileMode) -> Self {
        EntryMode::File(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("100644", EntryMode::File(FileMode::Regular))]
    #[case("100755", EntryMode::File(FileMode::Executable))]
    #[case("40000", EntryMode::Directory)]
    fn octal_text_round_trips(#[case] text: &str, #[case] mode: EntryMode) {
        pretty_assertions::assert_eq!(EntryMode::from_octal_str(text).unwrap(), mode);
        pretty_assertions::assert_eq!(mode.as_str(), text);
    }

    #[test]
    fn symlinks_are_not_supported() {
        assert!(EntryMode::from_octal_str("120000").is_err());
        assert!(EntryMode::try_from(0o120000).is_err());
    }
}

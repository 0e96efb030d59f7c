use crate::areas::repository::Repository;
use crate::artifacts::objects::object::{Object, ObjectBox};
use crate::artifacts::objects::object_id::ObjectId;
use crate::error::Result;
use std::io::Write;

impl Repository {
    /// Pretty-print a stored object (`cat-file -p`)
    ///
    /// Blobs are written byte for byte, trees as one `<mode> <type> <oid>\t<name>`
    /// line per entry and commits as their raw text.
    pub fn cat_file(&mut self, object_id: &str) -> Result<()> {
        self.ensure_initialized()?;
        let object_id = ObjectId::try_parse(object_id)?;

        match self.database().parse_object(&object_id)? {
            ObjectBox::Blob(blob) => self.writer().write_all(blob.content())?,
            ObjectBox::Tree(tree) => {
                if !tree.is_empty() {
                    writeln!(self.writer(), "{}", tree.display())?;
                }
            }
            ObjectBox::Commit(commit) => write!(self.writer(), "{}", commit.display())?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::areas::repository::Repository;
    use crate::config::Config;
    use crate::error::Error;
    use assert_fs::TempDir;
    use rstest::rstest;

    #[rstest]
    #[case("abc")]
    #[case("0123456789abcdef0123456789abcdef01234567")]
    fn unknown_or_malformed_ids_fail(#[case] oid: &str) {
        let temp_dir = TempDir::new().unwrap();
        let mut repository = Repository::new(temp_dir.path(), Box::new(std::io::sink()))
            .unwrap()
            .with_config(Config::default());
        repository.init().unwrap();

        let result = repository.cat_file(oid);

        assert!(matches!(
            result,
            Err(Error::InvalidObjectId(_)) | Err(Error::InvalidObject(_))
        ));
    }
}

use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use crate::error::ExportError;

/// Destination for finished export artifacts
pub trait DownloadSink {
    /// Hand `bytes` over under `name`. The sink owns the data afterwards.
    fn deliver(&self, name: &str, bytes: &[u8]) -> Result<(), ExportError>;
}

/// Writes artifacts into a directory.
///
/// Bytes are staged in a temporary file beside the target and renamed into
/// place, so a failed delivery never leaves a partial file behind.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, name: &str, bytes: &[u8]) -> Result<(), ExportError> {
        let target = self.path_for(name);
        // dropped, and so removed, on every early return below
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(bytes)?;
        staged.flush()?;

        staged
            .persist(&target)
            .map_err(|e| ExportError::Persist {
                path: target.display().to_string(),
                source: e.error,
            })?;

        log::info!("wrote {} ({} bytes)", target.display(), bytes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn delivers_into_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let sink = DirectorySink::new(dir.path());

        sink.deliver("listing.txt", b"Title:\nX\n").expect("delivered");

        assert_eq!(
            fs::read(dir.path().join("listing.txt")).expect("readable"),
            b"Title:\nX\n"
        );
        assert_eq!(fs::read_dir(dir.path()).expect("listable").count(), 1);
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let sink = DirectorySink::new(dir.path());

        sink.deliver("a.txt", b"old").expect("delivered");
        sink.deliver("a.txt", b"new").expect("delivered");

        assert_eq!(fs::read(sink.path_for("a.txt")).expect("readable"), b"new");
    }

    #[test]
    fn failed_delivery_leaves_nothing_behind() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::create_dir(dir.path().join("taken")).expect("subdir");
        let sink = DirectorySink::new(dir.path());

        // a directory occupies the target name
        assert!(sink.deliver("taken", b"data").is_err());

        let entries: Vec<_> = fs::read_dir(dir.path())
            .expect("listable")
            .filter_map(Result::ok)
            .map(|e| e.file_name())
            .collect();
        assert_eq!(entries, vec!["taken"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let sink = DirectorySink::new("/nonexistent/studio/out");
        assert!(matches!(
            sink.deliver("x.txt", b""),
            Err(ExportError::Io(_))
        ));
    }
}

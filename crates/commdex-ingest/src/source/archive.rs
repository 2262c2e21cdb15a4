//! Zip archive source: one serialized communication per entry

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use commdex_core::Communication;
use zip::ZipArchive;

use crate::error::{IngestError, IngestResult};

/// Upper bound on the buffer reserved from an entry's declared size
const MAX_PREALLOC: u64 = 1024 * 1024;

pub struct ArchiveSource {
    path: PathBuf,
    archive: ZipArchive<BufReader<File>>,
    next_entry: usize,
    skipped: u64,
}

impl ArchiveSource {
    /// Open the archive. A missing or unreadable container is fatal.
    pub fn open(path: &Path) -> IngestResult<Self> {
        let name = path.display().to_string();
        let file = File::open(path).map_err(|e| IngestError::source_read(&name, e))?;
        let archive = ZipArchive::new(BufReader::new(file))
            .map_err(|e| IngestError::source_read(&name, e))?;

        tracing::debug!("Opened archive {} with {} entries", name, archive.len());

        Ok(Self {
            path: path.to_path_buf(),
            archive,
            next_entry: 0,
            skipped: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn next(&mut self) -> IngestResult<Option<Communication>> {
        while self.next_entry < self.archive.len() {
            let index = self.next_entry;
            self.next_entry += 1;

            let (name, read) = {
                let mut entry = self
                    .archive
                    .by_index(index)
                    .map_err(|e| IngestError::source_read(self.path.display().to_string(), e))?;
                if entry.is_dir() {
                    continue;
                }

                let name = entry.name().to_string();
                let mut bytes = Vec::with_capacity(entry.size().min(MAX_PREALLOC) as usize);
                let read = entry.read_to_end(&mut bytes).map(|_| bytes);
                (name, read)
            };

            let bytes = match read {
                Ok(bytes) => bytes,
                Err(e) => {
                    self.skip(IngestError::source_item(name, e));
                    continue;
                }
            };

            match Communication::from_json(&bytes) {
                Ok(communication) => return Ok(Some(communication)),
                Err(e) => self.skip(IngestError::source_item(name, e)),
            }
        }

        Ok(None)
    }

    fn skip(&mut self, err: IngestError) {
        tracing::warn!("{}", err);
        self.skipped += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_archive(path: &Path, entries: &[(&str, &str)]) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        zip.add_directory("nested/", SimpleFileOptions::default())
            .unwrap();
        for (name, body) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_archive_yields_every_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comms.zip");
        write_archive(
            &path,
            &[
                ("a.json", r#"{"id": "a", "text": "alpha"}"#),
                ("b.json", r#"{"id": "b", "text": "beta"}"#),
            ],
        );

        let mut source = ArchiveSource::open(&path).unwrap();
        let mut ids = Vec::new();
        while let Some(comm) = source.next().unwrap() {
            ids.push(comm.id);
        }

        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(source.skipped(), 0);
    }

    #[test]
    fn test_archive_skips_undecodable_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comms.zip");
        write_archive(
            &path,
            &[
                ("a.json", r#"{"id": "a"}"#),
                ("broken.json", "not a communication"),
                ("c.json", r#"{"id": "c"}"#),
            ],
        );

        let mut source = ArchiveSource::open(&path).unwrap();
        assert_eq!(source.next().unwrap().unwrap().id, "a");
        assert_eq!(source.next().unwrap().unwrap().id, "c");
        assert!(source.next().unwrap().is_none());
        assert_eq!(source.skipped(), 1);
    }

    #[test]
    fn test_archive_entry_larger_than_prealloc() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comms.zip");
        let text = "word ".repeat(MAX_PREALLOC as usize / 2);
        let body = format!(r#"{{"id": "big", "text": "{}"}}"#, text);
        write_archive(&path, &[("big.json", body.as_str())]);

        let mut source = ArchiveSource::open(&path).unwrap();
        let comm = source.next().unwrap().unwrap();
        assert_eq!(comm.id, "big");
        assert_eq!(comm.text.as_deref(), Some(text.as_str()));
        assert!(source.next().unwrap().is_none());
    }

    #[test]
    fn test_archive_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = ArchiveSource::open(&dir.path().join("absent.zip"));
        assert!(matches!(result, Err(IngestError::SourceRead { .. })));
    }

    #[test]
    fn test_archive_not_a_zip_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.zip");
        std::fs::write(&path, "plain text").unwrap();
        let result = ArchiveSource::open(&path);
        assert!(matches!(result, Err(IngestError::SourceRead { .. })));
    }
}

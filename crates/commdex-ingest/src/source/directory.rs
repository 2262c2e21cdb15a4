//! Directory source: one serialized communication per file

use std::path::{Path, PathBuf};

use commdex_core::Communication;
use walkdir::WalkDir;

use crate::error::{IngestError, IngestResult};

pub struct DirectorySource {
    path: PathBuf,
    entries: walkdir::IntoIter,
    skipped: u64,
}

impl DirectorySource {
    /// Open the directory. Only its immediate regular files are read, in
    /// file name order.
    pub fn open(path: &Path) -> IngestResult<Self> {
        let name = path.display().to_string();
        if !path.is_dir() {
            return Err(IngestError::source_read(name, "not a directory"));
        }
        std::fs::read_dir(path).map_err(|e| IngestError::source_read(&name, e))?;

        let entries = WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter();

        Ok(Self {
            path: path.to_path_buf(),
            entries,
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
        while let Some(entry) = self.entries.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let item = e
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| self.path.display().to_string());
                    self.skip(IngestError::source_item(item, e));
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let item = entry.path().display().to_string();
            let bytes = match std::fs::read(entry.path()) {
                Ok(bytes) => bytes,
                Err(e) => {
                    self.skip(IngestError::source_item(item, e));
                    continue;
                }
            };

            match Communication::from_json(&bytes) {
                Ok(communication) => return Ok(Some(communication)),
                Err(e) => self.skip(IngestError::source_item(item, e)),
            }
        }

        Ok(None)
    }

    fn skip(&mut self, err: IngestError) {
        tracing::warn!("{}", err);
        self.skipped += 1;
    }
}

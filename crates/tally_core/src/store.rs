use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::document::Document;
use crate::error::{Result, TallyError};

/// Whole-document JSON persistence. Every save rewrites the file in place;
/// a crash halfway through a write can leave it truncated.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the document, or creates the file with [`Document::seeded`] when
    /// it does not exist yet.
    pub fn load(&self, today: NaiveDate) -> Result<Document> {
        self.load_or_seed(today, None)
    }

    /// Like [`JsonStore::load`], writing `seed` instead of the default
    /// document when the file is missing.
    pub fn load_or_seed(&self, today: NaiveDate, seed: Option<Document>) -> Result<Document> {
        if !self.path.exists() {
            let document = seed.unwrap_or_else(|| Document::seeded(today));
            info!(
                path = %self.path.display(),
                days = document.history.len(),
                "initializing data file"
            );
            self.save(&document)?;
            return Ok(document);
        }

        let raw = fs::read_to_string(&self.path).map_err(|source| TallyError::Read {
            path: self.path.clone(),
            source,
        })?;
        let document: Document =
            serde_json::from_str(&raw).map_err(|source| TallyError::Parse {
                path: self.path.clone(),
                source,
            })?;
        info!(
            path = %self.path.display(),
            tasks = document.tasks.len(),
            days = document.history.len(),
            "data file loaded"
        );
        Ok(document)
    }

    pub fn save(&self, document: &Document) -> Result<()> {
        let write_err = |source: io::Error| TallyError::Write {
            path: self.path.clone(),
            source,
        };

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        document
            .serialize(&mut serializer)
            .map_err(|err| write_err(io::Error::from(err)))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        fs::write(&self.path, buf).map_err(write_err)?;
        debug!(path = %self.path.display(), "data file saved");
        Ok(())
    }
}

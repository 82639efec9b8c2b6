use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use linguapedia_logging::lp_info;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::filename::article_filename;
use crate::page::ArticlePage;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the output directory exists and is writable; create it if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Writes rendered article pages into one directory.
///
/// Each write goes to a temp file in the same directory and is renamed over
/// the target, so a reader never sees a half-written page.
pub struct ArticleWriter {
    dir: PathBuf,
}

impl ArticleWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Saves the page under its deterministic filename and returns the path.
    pub fn save(&self, page: &ArticlePage) -> Result<PathBuf, PersistError> {
        let path = self.write(&article_filename(&page.route), &page.to_html_document())?;
        lp_info!("Saved {} to {}", page.route, path.display());
        Ok(path)
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

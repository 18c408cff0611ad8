//! Writing rendered documents to the output directory.
//!
//! Every document is written to a temporary file next to its destination and
//! then renamed over it, so a failed write never leaves a half-written resume
//! behind and an existing document is only replaced by a complete one.

use crate::error::{ResumeError, Result};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
    prefix: String,
    ext: String,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: "resume_".to_string(),
            ext: ".md".to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn with_ext(mut self, ext: &str) -> Self {
        if ext.is_empty() || ext.starts_with('.') {
            self.ext = ext.to_string();
        } else {
            self.ext = format!(".{}", ext);
        }
        self
    }

    pub fn path_for(&self, role: &str) -> PathBuf {
        self.dir.join(format!("{}{}{}", self.prefix, role, self.ext))
    }

    /// Writes the document for `role` and returns its path.
    pub fn write(&self, role: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path_for(role);
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(ResumeError::Io)?;
        }

        let mut temp = NamedTempFile::new_in(&self.dir).map_err(ResumeError::Io)?;
        temp.write_all(contents.as_bytes())
            .map_err(ResumeError::Io)?;
        temp.flush().map_err(ResumeError::Io)?;
        temp.persist(&path).map_err(|e| ResumeError::Io(e.error))?;

        debug!(path = %path.display(), bytes = contents.len(), "wrote document");
        Ok(path)
    }
}

/// Trims surrounding whitespace and ends the document with a single newline.
pub fn finalize_document(rendered: &str) -> String {
    let mut doc = rendered.trim().to_string();
    doc.push('\n');
    doc
}

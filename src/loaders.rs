//! Document loading
//!
//! Reads CSDL documents from the file system or from memory, enforcing the
//! configured size limit before any parsing starts.

use crate::error::{Error, Result};
use crate::limits::Limits;
use std::fs;
use std::path::{Path, PathBuf};

/// Where a document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// File system path
    Path(PathBuf),
    /// In-memory text with an identifier used in locations
    Text {
        /// Identifier reported in diagnostics
        name: String,
        /// The document text
        content: String,
    },
}

impl Source {
    /// The identifier that diagnostics use for this source
    pub fn name(&self) -> String {
        match self {
            Source::Path(p) => p.to_string_lossy().to_string(),
            Source::Text { name, .. } => name.clone(),
        }
    }
}

/// Document loader
#[derive(Debug, Default)]
pub struct Loader {
    /// Resource limits
    limits: Limits,
}

impl Loader {
    /// Create a new loader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Load a source as a string
    pub fn load(&self, source: &Source) -> Result<String> {
        match source {
            Source::Path(path) => self.load_path(path),
            Source::Text { content, .. } => {
                self.limits.check_document_size(content.len())?;
                Ok(content.clone())
            }
        }
    }

    /// Load a file as a string
    pub fn load_path(&self, path: &Path) -> Result<String> {
        let metadata = fs::metadata(path).map_err(|e| {
            Error::Resource(format!("Failed to read file '{}': {}", path.display(), e))
        })?;
        self.limits.check_document_size(metadata.len() as usize)?;

        let content = fs::read_to_string(path).map_err(|e| {
            Error::Resource(format!("Failed to read file '{}': {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "loaded document");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "<Schema/>").unwrap();

        let loader = Loader::new();
        let content = loader
            .load(&Source::Path(file.path().to_path_buf()))
            .unwrap();
        assert_eq!(content, "<Schema/>");
    }

    #[test]
    fn test_load_missing_file() {
        let loader = Loader::new();
        let result = loader.load(&Source::Path(PathBuf::from("/nonexistent/model.csdl")));
        assert!(matches!(result, Err(Error::Resource(_))));
    }

    #[test]
    fn test_size_limit() {
        let loader = Loader::new().with_limits(Limits {
            max_depth: 10,
            max_document_size: 4,
        });
        let source = Source::Text {
            name: "mem".to_string(),
            content: "<Schema/>".to_string(),
        };
        assert!(matches!(loader.load(&source), Err(Error::LimitExceeded(_))));
    }

    #[test]
    fn test_source_name() {
        let source = Source::Text {
            name: "inline".to_string(),
            content: String::new(),
        };
        assert_eq!(source.name(), "inline");
    }
}

//! Limits and constraints for CSDL processing
//!
//! Reading is single-pass and bounded: these limits cap document size and
//! element nesting so a hostile document cannot exhaust memory.

use crate::error::{Error, Result};

/// Resource limits applied while loading and parsing a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum element nesting depth
    pub max_depth: usize,

    /// Maximum document size in bytes
    pub max_document_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 256,
            max_document_size: 64 * 1024 * 1024, // 64 MB
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_depth: 64,
            max_document_size: 4 * 1024 * 1024, // 4 MB
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_depth: 4096,
            max_document_size: 1024 * 1024 * 1024, // 1 GB
        }
    }

    /// Check if nesting depth is within limits
    pub fn check_depth(&self, depth: usize) -> bool {
        depth <= self.max_depth
    }

    /// Check if a document size is within limits
    pub fn check_document_size(&self, size: usize) -> Result<()> {
        if size > self.max_document_size {
            Err(Error::LimitExceeded(format!(
                "document size {} bytes exceeds maximum {} bytes",
                size, self.max_document_size
            )))
        } else {
            Ok(())
        }
    }
}

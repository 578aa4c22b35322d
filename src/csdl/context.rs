//! Per-parse state shared by the CSDL finalizers

use crate::error::{DiagnosticSink, EdmError};
use crate::namespaces::Version;
use crate::xml::ParseContext;

/// Diagnostics and document version of one CSDL parse
#[derive(Debug, Default)]
pub struct CsdlParseContext {
    errors: Vec<EdmError>,
    namespace: String,
    version: Option<Version>,
}

impl CsdlParseContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Version of the document being read (4.0 until the root resolves)
    pub fn version(&self) -> Version {
        self.version.unwrap_or(Version::V4)
    }

    /// Whether the document uses the 4.0 grammar
    pub fn is_v4(&self) -> bool {
        self.version() >= Version::V4
    }

    /// Namespace of the document root
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Diagnostics reported so far
    pub fn errors(&self) -> &[EdmError] {
        &self.errors
    }

    /// Consume the context, returning its diagnostics
    pub fn into_errors(self) -> Vec<EdmError> {
        self.errors
    }
}

impl DiagnosticSink for CsdlParseContext {
    fn report(&mut self, error: EdmError) {
        tracing::trace!(code = %error.code, location = %error.location, "diagnostic");
        self.errors.push(error);
    }
}

impl ParseContext for CsdlParseContext {
    fn begin_document(&mut self, namespace: &str, version: Version) {
        self.namespace = namespace.to_string();
        self.version = Some(version);
    }
}

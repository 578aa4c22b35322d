//! CSDL reading
//!
//! [`CsdlReader`] drives the generic document parser with the CSDL grammar
//! and, on request, links the resulting [`CsdlSchema`] into an
//! [`EdmModel`].
//!
//! ```rust
//! use csdl::CsdlReader;
//!
//! let xml = r#"<Schema xmlns="http://docs.oasis-open.org/odata/ns/edm" Namespace="NS">
//!   <EntityType Name="Person"><Property Name="Id" Type="Edm.Int32"/></EntityType>
//! </Schema>"#;
//!
//! let result = CsdlReader::new().read_model(xml);
//! let model = result.model.unwrap();
//! assert!(model.find_type("NS.Person").is_some());
//! assert!(result.errors.is_empty());
//! ```

mod ast;
mod builder;
mod context;
mod grammar;
mod item;
mod readers;
pub mod type_names;

pub use ast::*;
pub use builder::build_model;
pub use context::CsdlParseContext;
pub use grammar::{CsdlGrammar, SCHEMA_ELEMENT};
pub use item::CsdlItem;
pub use readers::{
    is_valid_entity_set_path, is_valid_enum_member_path, split_member_path, ElementReader, MAX,
    VARIABLE,
};

use crate::edm::EdmModel;
use crate::error::{EdmError, Result};
use crate::limits::Limits;
use crate::loaders::{Loader, Source};
use crate::namespaces::Version;
use crate::xml::{ParserState, XmlDocumentParser};
use serde::Serialize;
use std::path::Path;

/// Settings for a [`CsdlReader`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsdlReaderSettings {
    /// Document identifier used in diagnostic locations
    pub document: String,
    /// Size and depth limits
    pub limits: Limits,
}

impl Default for CsdlReaderSettings {
    fn default() -> Self {
        Self {
            document: "<string>".to_string(),
            limits: Limits::default(),
        }
    }
}

/// Outcome of parsing a CSDL document
#[derive(Debug, Clone, Serialize)]
pub struct CsdlParseResult {
    /// The schema, absent when the document could not be read at all
    pub schema: Option<CsdlSchema>,
    /// Version selected by the root namespace
    pub version: Option<Version>,
    /// Every diagnostic, in document order
    pub errors: Vec<EdmError>,
}

impl CsdlParseResult {
    /// Whether a schema was produced without any diagnostics
    pub fn is_success(&self) -> bool {
        self.schema.is_some() && self.errors.is_empty()
    }
}

/// Outcome of reading a CSDL document into an EDM model
#[derive(Debug, Clone)]
pub struct ModelReadResult {
    /// The model, absent when the document could not be read at all
    pub model: Option<EdmModel>,
    /// Parse diagnostics followed by semantic diagnostics
    pub errors: Vec<EdmError>,
}

impl ModelReadResult {
    /// Whether a model was produced without any diagnostics
    pub fn is_success(&self) -> bool {
        self.model.is_some() && self.errors.is_empty()
    }
}

/// Reads CSDL documents
#[derive(Debug, Clone, Default)]
pub struct CsdlReader {
    settings: CsdlReaderSettings,
}

impl CsdlReader {
    /// Create a reader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader with the given settings
    pub fn with_settings(settings: CsdlReaderSettings) -> Self {
        Self { settings }
    }

    /// The reader's settings
    pub fn settings(&self) -> &CsdlReaderSettings {
        &self.settings
    }

    /// Parse a document held in memory
    pub fn parse_str(&self, source: &str) -> CsdlParseResult {
        self.parse_document(self.settings.document.as_str(), source)
    }

    /// Load and parse a document from disk
    ///
    /// Only loading can fail; document problems are reported as diagnostics.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<CsdlParseResult> {
        self.parse_source(&Source::Path(path.as_ref().to_path_buf()))
    }

    /// Load and parse a document from any [`Source`], applying the size limit
    ///
    /// Locations name the source rather than the configured document.
    pub fn parse_source(&self, source: &Source) -> Result<CsdlParseResult> {
        let content = self.loader().load(source)?;
        Ok(self.parse_document(&source.name(), &content))
    }

    /// Parse a document and build its model
    pub fn read_model(&self, source: &str) -> ModelReadResult {
        Self::link(self.parse_str(source))
    }

    /// Load a document from disk and build its model
    pub fn read_model_file(&self, path: impl AsRef<Path>) -> Result<ModelReadResult> {
        Ok(Self::link(self.parse_file(path)?))
    }

    fn loader(&self) -> Loader {
        Loader::new().with_limits(self.settings.limits.clone())
    }

    fn parse_document(&self, document: &str, source: &str) -> CsdlParseResult {
        let mut context = CsdlParseContext::new();
        let parsed = XmlDocumentParser::new(CsdlGrammar::instance(), document, source)
            .with_limits(self.settings.limits.clone())
            .parse(&mut context);

        let version = parsed.version;
        let schema = match parsed.state {
            ParserState::Completed => parsed.into_value().and_then(CsdlItem::into_schema),
            _ => None,
        };
        tracing::debug!(
            document,
            version = ?version,
            parsed = schema.is_some(),
            errors = context.errors().len(),
            "parsed CSDL document"
        );
        CsdlParseResult {
            schema,
            version,
            errors: context.into_errors(),
        }
    }

    fn link(result: CsdlParseResult) -> ModelReadResult {
        match result.schema {
            Some(schema) => {
                let model = build_model(schema, result.errors);
                ModelReadResult {
                    errors: model.errors(),
                    model: Some(model),
                }
            }
            None => ModelReadResult {
                model: None,
                errors: result.errors,
            },
        }
    }
}

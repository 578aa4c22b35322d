//! # edm-csdl
//!
//! An error-tolerant reader for CSDL, the XML serialization of the OData
//! Entity Data Model, covering CSDL 1.0 through 4.0.
//!
//! Reading happens in two stages:
//!
//! - [`xml`]: a generic, version-aware element-parser engine. A grammar is
//!   a registry of element parsers; the document parser walks the XML,
//!   selects the grammar for the root namespace and collects located
//!   diagnostics instead of stopping at the first problem.
//! - [`csdl`] and [`edm`]: the CSDL grammar built on that engine, and the
//!   linking step that turns a CSDL schema into an immutable EDM model in
//!   which unresolvable references and name collisions are represented by
//!   sentinel nodes.
//!
//! ## Example
//!
//! ```rust
//! use csdl::CsdlReader;
//!
//! let xml = r#"<Schema xmlns="http://schemas.microsoft.com/ado/2009/11/edm" Namespace="Shop">
//!   <EntityType Name="Order">
//!     <Key><PropertyRef Name="Id"/></Key>
//!     <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
//!     <Property Name="Customer" Type="Shop.Nobody"/>
//!   </EntityType>
//! </Schema>"#;
//!
//! let result = CsdlReader::new().read_model(xml);
//! let model = result.model.expect("document structure is valid");
//! assert_eq!(model.namespace(), "Shop");
//! assert_eq!(result.errors.len(), 1); // Shop.Nobody does not resolve
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;
pub mod messages;

// Utilities
pub mod locations;
pub mod names;
pub mod namespaces;

// Resource loading
pub mod loaders;

// Parser engine
pub mod xml;

// CSDL grammar and EDM model
pub mod csdl;
pub mod edm;

// Re-exports for convenience
pub use csdl::{CsdlParseResult, CsdlReader, CsdlReaderSettings, CsdlSchema, ModelReadResult};
pub use edm::EdmModel;
pub use error::{DiagnosticSink, EdmError, EdmErrorCode, Error, Result};
pub use limits::Limits;
pub use locations::Location;
pub use namespaces::Version;

/// Version of the edm-csdl library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

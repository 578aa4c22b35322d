//! Generic XML grammar engine
//!
//! Nothing in this module knows about CSDL. A grammar is a
//! [`ParserRegistry`] of element parsers plus a [`DocumentGrammar`]
//! implementation naming its root and namespaces; [`XmlDocumentParser`]
//! runs it over a document.

mod combinator;
mod document;
mod values;

pub use combinator::{ElementParser, Finalizer, ParserId, ParserRegistry};
pub use document::{
    DocumentGrammar, ParseContext, ParsedDocument, ParserState, XmlDocumentParser,
    ANNOTATION_ELEMENT,
};
pub use values::{
    XmlAnnotation, XmlAttributeInfo, XmlElementInfo, XmlElementValue, XmlElementValues,
};

//! Per-element parse data
//!
//! While a document is read, every open element accumulates an
//! [`XmlElementInfo`] (its name, location, attributes and foreign
//! annotations) and an [`XmlElementValues`] list holding the results its
//! children produced. Both carry "used" flags so the document parser can
//! report whatever the grammar never looked at once the element closes.

use crate::locations::Location;
use crate::namespaces::QName;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::Serialize;

static MISSING_ATTRIBUTE: Lazy<XmlAttributeInfo> = Lazy::new(|| XmlAttributeInfo {
    name: String::new(),
    value: String::new(),
    location: Location::unknown(),
    used: false,
    missing: true,
});

/// One attribute of an element in the grammar's own namespace
#[derive(Debug, Clone)]
pub struct XmlAttributeInfo {
    name: String,
    value: String,
    location: Location,
    used: bool,
    missing: bool,
}

impl XmlAttributeInfo {
    /// Create a present attribute
    pub fn new(name: impl Into<String>, value: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            location,
            used: false,
            missing: false,
        }
    }

    /// The shared stand-in for an absent attribute
    pub fn missing() -> &'static XmlAttributeInfo {
        &MISSING_ATTRIBUTE
    }

    /// Whether this is the absent-attribute stand-in
    pub fn is_missing(&self) -> bool {
        self.missing
    }

    /// Attribute local name (empty when missing)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw attribute value (empty when missing)
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Where the attribute appears
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Whether a reader has looked at this attribute
    pub fn is_used(&self) -> bool {
        self.used
    }
}

/// Content from a foreign namespace kept verbatim for round-tripping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XmlAnnotation {
    /// Qualified name of the attribute or element
    pub name: QName,
    /// Attribute value, or the raw outer XML of an element
    pub value: String,
    /// Whether this came from an attribute rather than an element
    pub is_attribute: bool,
    /// Where the annotation appears
    pub location: Location,
    #[serde(skip)]
    prefix: Option<String>,
}

impl XmlAnnotation {
    /// An annotation captured from a foreign attribute
    pub fn attribute(name: QName, value: impl Into<String>, location: Location) -> Self {
        Self {
            name,
            value: value.into(),
            is_attribute: true,
            location,
            prefix: None,
        }
    }

    /// An annotation captured from a foreign element's raw XML
    pub fn element(
        name: QName,
        prefix: Option<String>,
        raw_xml: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            name,
            value: raw_xml.into(),
            is_attribute: false,
            location,
            prefix,
        }
    }

    /// Parse an element annotation and hand its root node to `f`
    ///
    /// The raw XML is wrapped with a declaration for the element's own
    /// namespace, so prefixed annotations parse outside their document.
    /// Returns `None` for attribute annotations or XML that does not parse.
    pub fn with_element_tree<R>(
        &self,
        f: impl FnOnce(roxmltree::Node<'_, '_>) -> R,
    ) -> Option<R> {
        if self.is_attribute {
            return None;
        }
        let namespace = self.name.namespace.as_deref().unwrap_or("");
        let declaration = match &self.prefix {
            Some(prefix) => format!("xmlns:{}=\"{}\"", prefix, namespace),
            None => format!("xmlns=\"{}\"", namespace),
        };
        let wrapped = format!("<annotation-root {}>{}</annotation-root>", declaration, self.value);
        let doc = match roxmltree::Document::parse(&wrapped) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::trace!(
                    annotation = %self.name,
                    error = %err,
                    "annotation is not standalone XML"
                );
                return None;
            }
        };
        let node = doc.root_element().first_element_child()?;
        Some(f(node))
    }

    /// Concatenated text content of an element annotation
    pub fn element_text(&self) -> Option<String> {
        self.with_element_tree(|node| {
            node.descendants()
                .filter(|n| n.is_text())
                .filter_map(|n| n.text())
                .collect::<String>()
        })
    }
}

/// Name, location, attributes and annotations of one element
#[derive(Debug, Clone)]
pub struct XmlElementInfo {
    name: String,
    location: Location,
    attributes: IndexMap<String, XmlAttributeInfo>,
    annotations: Vec<XmlAnnotation>,
}

impl XmlElementInfo {
    /// Create an element info with no attributes
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
            attributes: IndexMap::new(),
            annotations: Vec::new(),
        }
    }

    /// Element local name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the element starts
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Add an owned attribute; a repeated name keeps the first occurrence
    pub fn add_attribute(&mut self, attribute: XmlAttributeInfo) {
        self.attributes
            .entry(attribute.name.clone())
            .or_insert(attribute);
    }

    /// Add a foreign-namespace annotation
    pub fn add_annotation(&mut self, annotation: XmlAnnotation) {
        self.annotations.push(annotation);
    }

    /// Read an attribute, marking it used
    ///
    /// Returns [`XmlAttributeInfo::missing`] when the attribute is absent.
    pub fn attribute(&mut self, name: &str) -> &XmlAttributeInfo {
        match self.attributes.get_mut(name) {
            Some(attribute) => {
                attribute.used = true;
                &*attribute
            }
            None => XmlAttributeInfo::missing(),
        }
    }

    /// Attributes no reader has looked at
    pub fn unused_attributes(&self) -> impl Iterator<Item = &XmlAttributeInfo> {
        self.attributes.values().filter(|a| !a.used)
    }

    /// Move the collected annotations out (for the element's finalizer)
    pub fn take_annotations(&mut self) -> Vec<XmlAnnotation> {
        std::mem::take(&mut self.annotations)
    }
}

#[derive(Debug, Clone)]
enum ValueContent<V> {
    Element(Option<V>),
    Text(String),
}

/// A child result: an element's finalized value or coalesced text
#[derive(Debug, Clone)]
pub struct XmlElementValue<V> {
    name: String,
    location: Location,
    content: ValueContent<V>,
    used: bool,
}

impl<V> XmlElementValue<V> {
    /// Wrap a finalizer result
    pub fn element(name: impl Into<String>, location: Location, value: Option<V>) -> Self {
        Self {
            name: name.into(),
            location,
            content: ValueContent::Element(value),
            used: false,
        }
    }

    /// Wrap coalesced character data
    pub fn text(location: Location, text: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            location,
            content: ValueContent::Text(text.into()),
            used: false,
        }
    }

    /// Element name (empty for text)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the element or the first text fragment starts
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Whether this is character data
    pub fn is_text(&self) -> bool {
        matches!(self.content, ValueContent::Text(_))
    }

    /// Whether the element's finalizer produced something
    pub fn has_value(&self) -> bool {
        match &self.content {
            ValueContent::Element(value) => value.is_some(),
            ValueContent::Text(_) => true,
        }
    }

    /// Whether the parent's finalizer used this value
    pub fn is_used(&self) -> bool {
        self.used
    }

    /// Look at the text without marking it used
    pub fn peek_text(&self) -> Option<&str> {
        match &self.content {
            ValueContent::Text(text) => Some(text),
            ValueContent::Element(_) => None,
        }
    }

    /// Move the value out, marking this child used
    pub fn take_value(&mut self) -> Option<V> {
        match &mut self.content {
            ValueContent::Element(value) => {
                self.used = true;
                value.take()
            }
            ValueContent::Text(_) => None,
        }
    }

    /// Move the text out, marking this child used
    pub fn take_text(&mut self) -> Option<String> {
        match &mut self.content {
            ValueContent::Text(text) => {
                self.used = true;
                Some(std::mem::take(text))
            }
            ValueContent::Element(_) => None,
        }
    }

    /// Consume the wrapper, returning the finalized value
    pub fn into_value(self) -> Option<V> {
        match self.content {
            ValueContent::Element(value) => value,
            ValueContent::Text(_) => None,
        }
    }
}

/// Ordered child results of one element
#[derive(Debug, Clone)]
pub struct XmlElementValues<V> {
    values: Vec<XmlElementValue<V>>,
}

impl<V> Default for XmlElementValues<V> {
    fn default() -> Self {
        Self { values: Vec::new() }
    }
}

impl<V> XmlElementValues<V> {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child result
    pub fn push(&mut self, value: XmlElementValue<V>) {
        self.values.push(value);
    }

    /// Number of child results
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no child results
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all children
    pub fn iter(&self) -> impl Iterator<Item = &XmlElementValue<V>> {
        self.values.iter()
    }

    /// Take the first element child named `name`; later ones stay unused
    pub fn take_first(&mut self, name: &str) -> Option<V> {
        self.values
            .iter_mut()
            .find(|v| !v.is_text() && v.name == name)
            .and_then(|v| v.take_value())
    }

    /// Take every element child named `name`
    pub fn take_all(&mut self, name: &str) -> Vec<V> {
        self.values
            .iter_mut()
            .filter(|v| !v.is_text() && v.name == name)
            .filter_map(|v| v.take_value())
            .collect()
    }

    /// Take the first text child; later text stays unused
    pub fn take_first_text(&mut self) -> Option<String> {
        self.values
            .iter_mut()
            .find(|v| v.is_text())
            .and_then(|v| v.take_text())
    }

    /// Take and concatenate every text child
    pub fn take_all_text(&mut self) -> Option<String> {
        let mut text: Option<String> = None;
        for value in self.values.iter_mut().filter(|v| v.is_text()) {
            if let Some(fragment) = value.take_text() {
                text.get_or_insert_with(String::new).push_str(&fragment);
            }
        }
        text
    }
}

//! Element parser combinators
//!
//! An [`ElementParser`] is a named rule for one element kind: a finalizer
//! that turns the element's info and its children's results into one value,
//! plus a table of the child element names it accepts.
//!
//! Grammars such as CSDL are mutually recursive (a type reference can wrap
//! a collection type that wraps a type reference), so parsers live in a
//! [`ParserRegistry`] arena and refer to each other by [`ParserId`]. A
//! grammar is built in two phases: create every parser with an empty child
//! table, then wire children with [`ParserRegistry::add_child_parser`]. Back
//! edges are just ids, so cycles need no special handling.

use super::values::{XmlElementInfo, XmlElementValue, XmlElementValues};
use std::collections::HashMap;
use std::fmt;

/// Turns an element's info and child results into the element's value
///
/// Returning `None` means the element contributes nothing to its parent.
pub type Finalizer<V, C> =
    Box<dyn Fn(&mut C, &mut XmlElementInfo, &mut XmlElementValues<V>) -> Option<V> + Send + Sync>;

/// Handle of a parser inside a [`ParserRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParserId(usize);

/// A named parsing rule for one element kind
pub struct ElementParser<V, C> {
    name: String,
    children: HashMap<String, ParserId>,
    finalizer: Finalizer<V, C>,
}

impl<V, C> ElementParser<V, C> {
    /// Element name this parser handles
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the child elements this parser accepts
    pub fn child_names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(|k| k.as_str())
    }
}

impl<V, C> fmt::Debug for ElementParser<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut children: Vec<_> = self.children.keys().collect();
        children.sort();
        f.debug_struct("ElementParser")
            .field("name", &self.name)
            .field("children", &children)
            .finish()
    }
}

/// Arena of element parsers forming a (possibly cyclic) grammar graph
pub struct ParserRegistry<V, C> {
    parsers: Vec<ElementParser<V, C>>,
}

impl<V, C> Default for ParserRegistry<V, C> {
    fn default() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }
}

impl<V, C> fmt::Debug for ParserRegistry<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.parsers.iter()).finish()
    }
}

impl<V, C> ParserRegistry<V, C> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of parsers in the registry
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    /// Whether the registry holds no parsers
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Create a parser with an empty child table
    pub fn add_parser<F>(&mut self, name: impl Into<String>, finalizer: F) -> ParserId
    where
        F: Fn(&mut C, &mut XmlElementInfo, &mut XmlElementValues<V>) -> Option<V>
            + Send
            + Sync
            + 'static,
    {
        let id = ParserId(self.parsers.len());
        self.parsers.push(ElementParser {
            name: name.into(),
            children: HashMap::new(),
            finalizer: Box::new(finalizer),
        });
        id
    }

    /// Accept `child` (under its own element name) inside `parent`
    pub fn add_child_parser(&mut self, parent: ParserId, child: ParserId) {
        let name = self.parsers[child.0].name.clone();
        self.parsers[parent.0].children.insert(name, child);
    }

    /// Accept every parser in `children` inside `parent`
    pub fn add_child_parsers(&mut self, parent: ParserId, children: &[ParserId]) {
        for child in children {
            self.add_child_parser(parent, *child);
        }
    }

    /// Look up a parser
    pub fn parser(&self, id: ParserId) -> &ElementParser<V, C> {
        &self.parsers[id.0]
    }

    /// Find the parser accepting child element `name` inside `parent`
    ///
    /// `None` means the element is unexpected here; the caller decides
    /// whether that is reported.
    pub fn try_get_child_parser(&self, parent: ParserId, name: &str) -> Option<ParserId> {
        self.parsers[parent.0].children.get(name).copied()
    }

    /// Run a parser's finalizer and wrap the result
    pub fn parse(
        &self,
        id: ParserId,
        context: &mut C,
        info: &mut XmlElementInfo,
        children: &mut XmlElementValues<V>,
    ) -> XmlElementValue<V> {
        let parser = &self.parsers[id.0];
        let value = (parser.finalizer)(context, info, children);
        XmlElementValue::element(info.name().to_string(), info.location().clone(), value)
    }
}

//! Document parser
//!
//! [`XmlDocumentParser`] drives a forward-only, namespace-aware reader
//! through nested element scopes. One [`ParserScope`] exists per open
//! element; child elements are matched against the current scope's parser,
//! adjacent text fragments are coalesced, and every attribute, child or
//! text fragment the grammar never used is reported once its element
//! closes.
//!
//! The parser is a small state machine:
//!
//! ```text
//! BeforeRoot -> AtRoot -> Parsing -> Completed
//!      \           \          \----> Failed
//!       \-----------\---------------> Failed
//! ```
//!
//! Only document-structure problems (empty document, unsupported root
//! namespace, unexpected root element, malformed XML) move it to `Failed`.
//! Everything else is reported to the context and parsing continues.

use super::combinator::{ParserId, ParserRegistry};
use super::values::{
    XmlAnnotation, XmlAttributeInfo, XmlElementInfo, XmlElementValue, XmlElementValues,
};
use crate::error::{DiagnosticSink, EdmError, EdmErrorCode};
use crate::limits::Limits;
use crate::locations::{LineIndex, Location};
use crate::messages;
use crate::namespaces::{QName, Version, XML_NAMESPACE};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use std::sync::Arc;

/// Element name that is silently skipped wherever it is not expected
pub const ANNOTATION_ELEMENT: &str = "Annotation";

/// Receives diagnostics and document-level events during a parse
pub trait ParseContext: DiagnosticSink {
    /// Called once the root namespace has resolved to a version
    fn begin_document(&mut self, _namespace: &str, _version: Version) {}
}

impl ParseContext for Vec<EdmError> {}

/// A concrete grammar driven by [`XmlDocumentParser`]
pub trait DocumentGrammar {
    /// Value produced by the grammar's finalizers
    type Value;
    /// State shared by the finalizers of one parse
    type Context: ParseContext;

    /// Supported namespaces and the version each one selects
    fn namespace_versions(&self) -> &[(&'static str, Version)];

    /// The parsers of this grammar
    fn registry(&self) -> &ParserRegistry<Self::Value, Self::Context>;

    /// The parser for a root element of the given version
    fn root_parser(&self, version: Version, name: &str) -> Option<ParserId>;

    /// Root element name, used in diagnostics
    fn root_element_name(&self) -> &str;

    /// Whether a foreign namespace still belongs to the grammar
    ///
    /// Elements and attributes in owned namespaces are grammar errors;
    /// anything in other namespaces is kept as an annotation.
    fn is_owned_namespace(&self, namespace: &str) -> bool;
}

/// Phase of a document parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// No root element seen yet
    BeforeRoot,
    /// Root element found and its namespace resolved
    AtRoot,
    /// Inside the root element
    Parsing,
    /// The root element closed and the document ended
    Completed,
    /// A document-structure error stopped the parse
    Failed,
}

/// The stack frame of one open element
#[derive(Debug)]
struct ParserScope<V> {
    parser: ParserId,
    info: XmlElementInfo,
    children: XmlElementValues<V>,
}

impl<V> ParserScope<V> {
    fn new(parser: ParserId, info: XmlElementInfo) -> Self {
        Self {
            parser,
            info,
            children: XmlElementValues::new(),
        }
    }
}

/// Outcome of [`XmlDocumentParser::parse`]
#[derive(Debug)]
pub struct ParsedDocument<V> {
    /// Final parser state (`Completed` or `Failed`)
    pub state: ParserState,
    /// Namespace of the root element, once resolved
    pub namespace: Option<String>,
    /// Version selected by the root namespace
    pub version: Option<Version>,
    /// The root element's value
    pub result: Option<XmlElementValue<V>>,
}

impl<V> ParsedDocument<V> {
    /// The root value, if the parse produced one
    pub fn into_value(self) -> Option<V> {
        self.result.and_then(XmlElementValue::into_value)
    }
}

#[derive(Debug)]
struct PendingText {
    position: usize,
    text: String,
}

type Step<T> = std::result::Result<T, EdmError>;

/// Forward single-pass parser over one XML document
pub struct XmlDocumentParser<'a, G: DocumentGrammar> {
    grammar: &'a G,
    source: &'a str,
    reader: NsReader<&'a [u8]>,
    lines: LineIndex,
    limits: Limits,
    state: ParserState,
    namespace: String,
    version: Option<Version>,
    scopes: Vec<ParserScope<G::Value>>,
    pending_text: Option<PendingText>,
    result: Option<XmlElementValue<G::Value>>,
}

impl<'a, G: DocumentGrammar> XmlDocumentParser<'a, G> {
    /// Create a parser for `source`; `document` names it in locations
    pub fn new(grammar: &'a G, document: impl Into<Arc<str>>, source: &'a str) -> Self {
        let mut reader = NsReader::from_str(source);
        reader
            .trim_text(false)
            .expand_empty_elements(false)
            .check_end_names(true)
            .check_comments(true);
        Self {
            grammar,
            source,
            reader,
            lines: LineIndex::new(document, source),
            limits: Limits::default(),
            state: ParserState::BeforeRoot,
            namespace: String::new(),
            version: None,
            scopes: Vec::new(),
            pending_text: None,
            result: None,
        }
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Current state
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Run the parse to completion
    pub fn parse(mut self, context: &mut G::Context) -> ParsedDocument<G::Value> {
        match self.run(context) {
            Ok(()) => self.state = ParserState::Completed,
            Err(error) => {
                tracing::debug!(
                    code = %error.code,
                    location = %error.location,
                    "document parse failed"
                );
                context.report(error);
                self.state = ParserState::Failed;
                self.result = None;
            }
        }
        ParsedDocument {
            state: self.state,
            namespace: if self.namespace.is_empty() {
                None
            } else {
                Some(self.namespace)
            },
            version: self.version,
            result: self.result,
        }
    }

    fn run(&mut self, context: &mut G::Context) -> Step<()> {
        let grammar = self.grammar;
        let (position, namespace, start, empty) = self.find_root(context)?;
        self.state = ParserState::AtRoot;

        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let location = self.location(position);
        let expected: Vec<&str> = grammar.namespace_versions().iter().map(|(ns, _)| *ns).collect();

        let namespace = namespace.ok_or_else(|| {
            EdmError::new(
                location.clone(),
                EdmErrorCode::UnexpectedXmlElement,
                messages::unexpected_root_no_namespace(&expected),
            )
        })?;
        let version = grammar
            .namespace_versions()
            .iter()
            .find(|(ns, _)| *ns == namespace)
            .map(|(_, version)| *version)
            .ok_or_else(|| {
                EdmError::new(
                    location.clone(),
                    EdmErrorCode::UnexpectedXmlElement,
                    messages::unexpected_root_namespace(&namespace, &expected),
                )
            })?;
        let parser = grammar.root_parser(version, &name).ok_or_else(|| {
            EdmError::new(
                location.clone(),
                EdmErrorCode::UnexpectedXmlElement,
                messages::unexpected_root_element(&name, grammar.root_element_name()),
            )
        })?;

        tracing::debug!(%namespace, %version, root = %name, "resolved document root");
        self.namespace = namespace;
        self.version = Some(version);
        context.begin_document(&self.namespace, version);

        let info = self.read_element_info(context, &start, name, position)?;
        self.scopes.push(ParserScope::new(parser, info));
        self.state = ParserState::Parsing;
        if empty {
            self.end_element(context);
        }

        while !self.scopes.is_empty() {
            self.step(context)?;
        }
        self.check_trailing_content(context);
        Ok(())
    }

    fn find_root(
        &mut self,
        context: &mut G::Context,
    ) -> Step<(usize, Option<String>, BytesStart<'a>, bool)> {
        loop {
            let (position, namespace, event) = self.next_event()?;
            match event {
                Event::Start(start) => return Ok((position, namespace, start, false)),
                Event::Empty(start) => return Ok((position, namespace, start, true)),
                Event::Eof => {
                    return Err(EdmError::new(
                        self.location(position),
                        EdmErrorCode::EmptyFile,
                        messages::empty_file(),
                    ))
                }
                Event::DocType(_) => return Err(self.dtd_error(position)),
                Event::Text(text) if !is_blank(&text) => {
                    self.report_node(context, position, "Text")
                }
                Event::CData(_) => self.report_node(context, position, "CDATA"),
                Event::End(_) => self.report_node(context, position, "EndElement"),
                _ => {}
            }
        }
    }

    fn step(&mut self, context: &mut G::Context) -> Step<()> {
        let (position, namespace, event) = self.next_event()?;
        match event {
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| self.xml_error(position, &e.to_string()))?;
                self.append_text(position, &text);
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data).into_owned();
                self.append_text(position, &text);
            }
            // Ignored nodes do not interrupt text coalescing.
            Event::Comment(_) | Event::PI(_) | Event::Decl(_) => {}
            Event::DocType(_) => return Err(self.dtd_error(position)),
            Event::Start(start) => {
                self.flush_text(context);
                self.start_element(context, position, namespace, start, false)?;
            }
            Event::Empty(start) => {
                self.flush_text(context);
                self.start_element(context, position, namespace, start, true)?;
            }
            Event::End(_) => {
                self.flush_text(context);
                self.end_element(context);
            }
            Event::Eof => return Err(self.xml_error(position, "unexpected end of document")),
        }
        Ok(())
    }

    fn start_element(
        &mut self,
        context: &mut G::Context,
        position: usize,
        namespace: Option<String>,
        start: BytesStart<'a>,
        empty: bool,
    ) -> Step<()> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let depth = self.scopes.len() + 1;
        if !self.limits.check_depth(depth) {
            return Err(EdmError::new(
                self.location(position),
                EdmErrorCode::XmlError,
                messages::depth_exceeded(depth, self.limits.max_depth),
            ));
        }
        let Some(parent) = self.scopes.last().map(|scope| scope.parser) else {
            return Ok(());
        };

        if namespace.as_deref() == Some(self.namespace.as_str()) {
            if let Some(parser) = self.grammar.registry().try_get_child_parser(parent, &name) {
                let info = self.read_element_info(context, &start, name, position)?;
                self.scopes.push(ParserScope::new(parser, info));
                if empty {
                    self.end_element(context);
                }
            } else {
                self.report_unexpected_element(context, position, &name);
                if !empty {
                    self.skip_subtree()?;
                }
            }
            return Ok(());
        }

        let namespace = match namespace {
            Some(ns) if !self.grammar.is_owned_namespace(&ns) => ns,
            _ => {
                self.report_unexpected_element(context, position, &name);
                if !empty {
                    self.skip_subtree()?;
                }
                return Ok(());
            }
        };

        let prefix = start
            .name()
            .prefix()
            .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned());
        let end = if empty {
            self.reader.buffer_position()
        } else {
            self.skip_subtree()?
        };
        let raw = self.source.get(position..end).unwrap_or_default().to_string();
        let location = self.location(position);
        tracing::trace!(%namespace, element = %name, %location, "captured annotation element");
        if let Some(scope) = self.scopes.last_mut() {
            scope.info.add_annotation(XmlAnnotation::element(
                QName::namespaced(namespace, name),
                prefix,
                raw,
                location,
            ));
        }
        Ok(())
    }

    fn end_element(&mut self, context: &mut G::Context) {
        let Some(scope) = self.scopes.pop() else {
            return;
        };
        let ParserScope {
            parser,
            mut info,
            mut children,
        } = scope;

        let value = self
            .grammar
            .registry()
            .parse(parser, context, &mut info, &mut children);

        for attribute in info.unused_attributes() {
            context.report_error(
                attribute.location().clone(),
                EdmErrorCode::UnexpectedXmlAttribute,
                messages::unexpected_xml_attribute(attribute.name()),
            );
        }

        // Whether the finalizer took none of the text or only part of it,
        // the first fragment it left behind is the one reported.
        if let Some(text) = children.iter().find(|c| c.is_text() && !c.is_used()) {
            context.report_error(
                text.location().clone(),
                EdmErrorCode::TextNotAllowed,
                messages::text_not_allowed(text.peek_text().unwrap_or_default()),
            );
        }

        for child in children.iter().filter(|c| !c.is_text() && !c.is_used()) {
            context.report_error(
                child.location().clone(),
                EdmErrorCode::UnexpectedXmlElement,
                messages::unused_element(child.name()),
            );
        }

        if value.has_value() {
            match self.scopes.last_mut() {
                Some(parent) => parent.children.push(value),
                None => self.result = Some(value),
            }
        }
    }

    fn read_element_info(
        &mut self,
        context: &mut G::Context,
        start: &BytesStart<'a>,
        name: String,
        position: usize,
    ) -> Step<XmlElementInfo> {
        let mut info = XmlElementInfo::new(name, self.location(position));
        let tag_end = self.reader.buffer_position();
        let tag_text = self.source.get(position..tag_end).unwrap_or_default();

        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| self.xml_error(position, &e.to_string()))?;
            if attribute.key.as_namespace_binding().is_some() {
                continue;
            }
            let raw_key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let (resolved, local) = self.reader.resolve_attribute(attribute.key);
            let namespace = match owned_namespace(resolved) {
                Ok(namespace) => namespace,
                Err(prefix) if prefix == "xml" => Some(XML_NAMESPACE.to_string()),
                Err(prefix) => {
                    return Err(self.xml_error(
                        position,
                        &format!("undeclared namespace prefix '{}'", prefix),
                    ))
                }
            };
            let local = String::from_utf8_lossy(local.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|e| self.xml_error(position, &e.to_string()))?
                .into_owned();
            let location = self.location(position + attribute_offset(tag_text, &raw_key));

            match namespace {
                None => info.add_attribute(XmlAttributeInfo::new(local, value, location)),
                Some(ns) if ns == self.namespace => {
                    info.add_attribute(XmlAttributeInfo::new(local, value, location))
                }
                Some(ns) if self.grammar.is_owned_namespace(&ns) => context.report_error(
                    location,
                    EdmErrorCode::UnexpectedXmlAttribute,
                    messages::unexpected_xml_attribute(&raw_key),
                ),
                Some(ns) => info.add_annotation(XmlAnnotation::attribute(
                    QName::namespaced(ns, local),
                    value,
                    location,
                )),
            }
        }
        Ok(info)
    }

    /// Skip the rest of the element whose start tag was just read
    fn skip_subtree(&mut self) -> Step<usize> {
        let mut depth = 1usize;
        while depth > 0 {
            let (position, _, event) = self.next_event()?;
            match event {
                Event::Start(_) => depth += 1,
                Event::End(_) => depth -= 1,
                Event::Eof => return Err(self.xml_error(position, "unexpected end of document")),
                _ => {}
            }
        }
        Ok(self.reader.buffer_position())
    }

    fn check_trailing_content(&mut self, context: &mut G::Context) {
        loop {
            let (position, _, event) = match self.next_event() {
                Ok(next) => next,
                Err(error) => {
                    context.report(error);
                    return;
                }
            };
            match event {
                Event::Eof => return,
                Event::Text(text) if is_blank(&text) => {}
                Event::Comment(_) | Event::PI(_) => {}
                _ => {
                    context.report_error(
                        self.location(position),
                        EdmErrorCode::UnexpectedXmlNodeType,
                        messages::extra_root_content(),
                    );
                    return;
                }
            }
        }
    }

    fn append_text(&mut self, position: usize, text: &str) {
        if let Some(pending) = self.pending_text.as_mut() {
            pending.text.push_str(text);
        } else {
            self.pending_text = Some(PendingText {
                position,
                text: text.to_string(),
            });
        }
    }

    fn flush_text(&mut self, context: &mut G::Context) {
        let Some(pending) = self.pending_text.take() else {
            return;
        };
        if pending.text.trim().is_empty() {
            return;
        }
        let location = self.location(pending.position);
        match self.scopes.last_mut() {
            Some(scope) => scope
                .children
                .push(XmlElementValue::text(location, pending.text)),
            None => context.report_error(
                location,
                EdmErrorCode::UnexpectedXmlNodeType,
                messages::unexpected_node_type("Text"),
            ),
        }
    }

    fn next_event(&mut self) -> Step<(usize, Option<String>, Event<'a>)> {
        let before = self.reader.buffer_position();
        let read = self
            .reader
            .read_resolved_event()
            .map(|(resolved, event)| (owned_namespace(resolved), event));
        match read {
            Ok((Ok(namespace), event)) => {
                let position = match event {
                    Event::Start(_) | Event::Empty(_) | Event::End(_) => self.tag_start(before),
                    _ => before,
                };
                Ok((position, namespace, event))
            }
            Ok((Err(prefix), _)) => Err(self.xml_error(
                self.tag_start(before),
                &format!("undeclared namespace prefix '{}'", prefix),
            )),
            Err(error) => Err(self.xml_error(self.reader.buffer_position(), &error.to_string())),
        }
    }

    /// The reader may or may not have consumed the `<` of the next tag when
    /// it stops after a text node; normalize to the `<` itself.
    fn tag_start(&self, position: usize) -> usize {
        let bytes = self.source.as_bytes();
        if bytes.get(position) == Some(&b'<') {
            position
        } else if position > 0 && bytes.get(position - 1) == Some(&b'<') {
            position - 1
        } else {
            position
        }
    }

    fn report_unexpected_element(&self, context: &mut G::Context, position: usize, name: &str) {
        if name == ANNOTATION_ELEMENT {
            tracing::trace!(element = name, "skipping annotation element");
            return;
        }
        context.report_error(
            self.location(position),
            EdmErrorCode::UnexpectedXmlElement,
            messages::unexpected_xml_element(name),
        );
    }

    fn report_node(&self, context: &mut G::Context, position: usize, kind: &str) {
        context.report_error(
            self.location(position),
            EdmErrorCode::UnexpectedXmlNodeType,
            messages::unexpected_node_type(kind),
        );
    }

    fn location(&self, position: usize) -> Location {
        self.lines.location(self.source, position)
    }

    fn xml_error(&self, position: usize, detail: &str) -> EdmError {
        EdmError::new(
            self.location(position),
            EdmErrorCode::XmlError,
            messages::xml_error(detail),
        )
    }

    fn dtd_error(&self, position: usize) -> EdmError {
        EdmError::new(
            self.location(position),
            EdmErrorCode::XmlError,
            messages::dtd_prohibited(),
        )
    }
}

fn owned_namespace(resolved: ResolveResult<'_>) -> std::result::Result<Option<String>, String> {
    match resolved {
        ResolveResult::Bound(ns) => {
            let ns = String::from_utf8_lossy(ns.as_ref()).into_owned();
            Ok(if ns.is_empty() { None } else { Some(ns) })
        }
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(String::from_utf8_lossy(&prefix).into_owned()),
    }
}

fn is_blank(text: &BytesText<'_>) -> bool {
    text.iter().all(|b| b.is_ascii_whitespace())
}

/// Byte offset of attribute `key` inside a raw start tag
fn attribute_offset(tag: &str, key: &str) -> usize {
    let mut from = 0;
    while let Some(found) = tag.get(from..).and_then(|rest| rest.find(key)) {
        let at = from + found;
        let preceded_by_space = tag[..at]
            .chars()
            .next_back()
            .map_or(false, char::is_whitespace);
        let followed_by_equals = tag[at + key.len()..].trim_start().starts_with('=');
        if preceded_by_space && followed_by_equals {
            return at;
        }
        from = at + key.len();
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NS: &str = "urn:test:grammar";
    const OLD_NS: &str = "urn:test:grammar:old";

    /// A tiny grammar: `<Root><Item Name=".."/><Note>text</Note></Root>`,
    /// where `Group` nests recursively and `Pair` takes exactly one `Item`.
    #[derive(Debug, Clone, PartialEq)]
    enum Node {
        Root(Vec<Node>),
        Item(String),
        Note(String),
        Group(Vec<Node>),
        Pair(Box<Node>),
    }

    struct TestGrammar {
        registry: ParserRegistry<Node, Vec<EdmError>>,
        root: ParserId,
    }

    fn collect(children: &mut XmlElementValues<Node>) -> Vec<Node> {
        let mut nodes = children.take_all("Item");
        nodes.extend(children.take_all("Note"));
        nodes.extend(children.take_all("Group"));
        nodes.extend(children.take_all("Pair"));
        nodes
    }

    impl TestGrammar {
        fn new() -> Self {
            let mut registry: ParserRegistry<Node, Vec<EdmError>> = ParserRegistry::new();
            let root = registry.add_parser("Root", |_, _, children| {
                Some(Node::Root(collect(children)))
            });
            let item = registry.add_parser("Item", |_, info, _| {
                Some(Node::Item(info.attribute("Name").value().to_string()))
            });
            let note = registry.add_parser("Note", |_, _, children| {
                Some(Node::Note(children.take_first_text().unwrap_or_default()))
            });
            let group = registry.add_parser("Group", |_, _, children| {
                Some(Node::Group(collect(children)))
            });
            let pair = registry.add_parser("Pair", |_, _, children| {
                children.take_first("Item").map(|item| Node::Pair(Box::new(item)))
            });
            registry.add_child_parsers(root, &[item, note, group, pair]);
            registry.add_child_parsers(group, &[item, group]);
            registry.add_child_parser(pair, item);
            Self { registry, root }
        }
    }

    impl DocumentGrammar for TestGrammar {
        type Value = Node;
        type Context = Vec<EdmError>;

        fn namespace_versions(&self) -> &[(&'static str, Version)] {
            &[(OLD_NS, Version::V1), (NS, Version::V2)]
        }

        fn registry(&self) -> &ParserRegistry<Node, Vec<EdmError>> {
            &self.registry
        }

        fn root_parser(&self, _version: Version, name: &str) -> Option<ParserId> {
            (name == "Root").then_some(self.root)
        }

        fn root_element_name(&self) -> &str {
            "Root"
        }

        fn is_owned_namespace(&self, namespace: &str) -> bool {
            namespace == NS || namespace == OLD_NS
        }
    }

    fn parse(xml: &str) -> (ParsedDocument<Node>, Vec<EdmError>) {
        let grammar = TestGrammar::new();
        let mut errors = Vec::new();
        let parsed = XmlDocumentParser::new(&grammar, "test.xml", xml).parse(&mut errors);
        (parsed, errors)
    }

    fn codes(errors: &[EdmError]) -> Vec<EdmErrorCode> {
        errors.iter().map(|e| e.code).collect()
    }

    #[test]
    fn test_minimal_document_for_each_version() {
        for (ns, version) in [(OLD_NS, Version::V1), (NS, Version::V2)] {
            let xml = format!(r#"<Root xmlns="{}"><Item Name="a"/></Root>"#, ns);
            let (parsed, errors) = parse(&xml);
            assert_eq!(parsed.state, ParserState::Completed);
            assert_eq!(parsed.version, Some(version));
            assert!(errors.is_empty(), "{:?}", errors);
            assert_eq!(
                parsed.into_value(),
                Some(Node::Root(vec![Node::Item("a".to_string())]))
            );
        }
    }

    #[test]
    fn test_self_closing_root() {
        let (parsed, errors) = parse(&format!(r#"<Root xmlns="{}"/>"#, NS));
        assert_eq!(parsed.state, ParserState::Completed);
        assert!(errors.is_empty());
        assert_eq!(parsed.into_value(), Some(Node::Root(vec![])));
    }

    #[test]
    fn test_empty_document() {
        let (parsed, errors) = parse("<?xml version=\"1.0\"?>\n<!-- nothing -->\n");
        assert_eq!(parsed.state, ParserState::Failed);
        assert!(parsed.result.is_none());
        assert_eq!(codes(&errors), vec![EdmErrorCode::EmptyFile]);
    }

    #[test]
    fn test_wrong_root_namespace() {
        let (parsed, errors) = parse(r#"<Root xmlns="urn:other"/>"#);
        assert_eq!(parsed.state, ParserState::Failed);
        assert_eq!(codes(&errors), vec![EdmErrorCode::UnexpectedXmlElement]);
        assert!(errors[0].message.contains(NS));
        assert!(errors[0].message.contains(OLD_NS));
    }

    #[test]
    fn test_root_without_namespace() {
        let (parsed, errors) = parse("<Root/>");
        assert_eq!(parsed.state, ParserState::Failed);
        assert_eq!(codes(&errors), vec![EdmErrorCode::UnexpectedXmlElement]);
    }

    #[test]
    fn test_wrong_root_element() {
        let (parsed, errors) = parse(&format!(r#"<Item xmlns="{}"/>"#, NS));
        assert_eq!(parsed.state, ParserState::Failed);
        assert_eq!(codes(&errors), vec![EdmErrorCode::UnexpectedXmlElement]);
        assert!(errors[0].message.contains("'Root'"));
    }

    #[test]
    fn test_unexpected_attribute_keeps_recognized_value() {
        let xml = format!(r#"<Root xmlns="{}"><Item Name="a" Bogus="b"/></Root>"#, NS);
        let (parsed, errors) = parse(&xml);
        assert_eq!(codes(&errors), vec![EdmErrorCode::UnexpectedXmlAttribute]);
        assert!(errors[0].message.contains("Bogus"));
        let expected_column = xml.find("Bogus").map(|i| i + 1);
        assert_eq!(Some(errors[0].location.column), expected_column);
        assert_eq!(
            parsed.into_value(),
            Some(Node::Root(vec![Node::Item("a".to_string())]))
        );
    }

    #[test]
    fn test_unexpected_element_is_skipped() {
        let xml = format!(
            r#"<Root xmlns="{}"><Nope><Item Name="x"/></Nope><Item Name="a"/></Root>"#,
            NS
        );
        let (parsed, errors) = parse(&xml);
        assert_eq!(codes(&errors), vec![EdmErrorCode::UnexpectedXmlElement]);
        assert_eq!(
            parsed.into_value(),
            Some(Node::Root(vec![Node::Item("a".to_string())]))
        );
    }

    #[test]
    fn test_annotation_element_is_ignored_silently() {
        let xml = format!(
            r#"<Root xmlns="{}"><Annotation Term="x"><Item/></Annotation></Root>"#,
            NS
        );
        let (parsed, errors) = parse(&xml);
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(parsed.state, ParserState::Completed);
    }

    #[test]
    fn test_owned_foreign_namespace_is_an_error() {
        let xml = format!(
            r#"<Root xmlns="{}" xmlns:o="{}"><o:Item Name="x"/></Root>"#,
            NS, OLD_NS
        );
        let (_, errors) = parse(&xml);
        assert_eq!(codes(&errors), vec![EdmErrorCode::UnexpectedXmlElement]);
    }

    #[test]
    fn test_owned_foreign_attribute_is_an_error() {
        let xml = format!(
            r#"<Root xmlns="{}" xmlns:o="{}"><Item Name="a" o:Name="b"/></Root>"#,
            NS, OLD_NS
        );
        let (_, errors) = parse(&xml);
        assert_eq!(codes(&errors), vec![EdmErrorCode::UnexpectedXmlAttribute]);
    }

    #[test]
    fn test_text_coalesces_across_comments_and_cdata() {
        let xml = format!(
            r#"<Root xmlns="{}"><Note>one <!-- c --> two <![CDATA[three]]></Note></Root>"#,
            NS
        );
        let (parsed, errors) = parse(&xml);
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(
            parsed.into_value(),
            Some(Node::Root(vec![Node::Note("one  two three".to_string())]))
        );
    }

    #[test]
    fn test_text_not_allowed() {
        let xml = format!("<Root xmlns=\"{}\">\n  <Item Name=\"a\">stray</Item>\n</Root>", NS);
        let (_, errors) = parse(&xml);
        assert_eq!(codes(&errors), vec![EdmErrorCode::TextNotAllowed]);
        assert_eq!(errors[0].location.line, 2);
        assert_eq!(errors[0].location.column, 18);
    }

    #[test]
    fn test_partially_consumed_text_reports_remainder() {
        let xml = format!(r#"<Root xmlns="{}"><Note>a<Item Name="x"/>b</Note></Root>"#, NS);
        let (_, errors) = parse(&xml);
        // Item is not a child of Note; the second fragment was never used.
        assert_eq!(
            codes(&errors),
            vec![EdmErrorCode::UnexpectedXmlElement, EdmErrorCode::TextNotAllowed]
        );
        assert!(errors[1].message.contains("'b'"));
    }

    #[test]
    fn test_duplicate_child_is_unused() {
        let xml = format!(
            r#"<Root xmlns="{}"><Pair><Item Name="first"/><Item Name="second"/></Pair></Root>"#,
            NS
        );
        let (parsed, errors) = parse(&xml);
        assert_eq!(codes(&errors), vec![EdmErrorCode::UnexpectedXmlElement]);
        assert!(errors[0].message.contains("not used"));
        assert_eq!(
            parsed.into_value(),
            Some(Node::Root(vec![Node::Pair(Box::new(Node::Item(
                "first".to_string()
            )))]))
        );
    }

    #[test]
    fn test_recursive_grammar() {
        let xml = format!(
            r#"<Root xmlns="{}"><Group><Group><Item Name="deep"/></Group></Group></Root>"#,
            NS
        );
        let (parsed, errors) = parse(&xml);
        assert!(errors.is_empty());
        assert_eq!(
            parsed.into_value(),
            Some(Node::Root(vec![Node::Group(vec![Node::Group(vec![
                Node::Item("deep".to_string())
            ])])]))
        );
    }

    #[test]
    fn test_trailing_content_after_root() {
        let xml = format!(r#"<Root xmlns="{}"/><Root xmlns="{}"/>"#, NS, NS);
        let (parsed, errors) = parse(&xml);
        assert_eq!(parsed.state, ParserState::Completed);
        assert_eq!(codes(&errors), vec![EdmErrorCode::UnexpectedXmlNodeType]);
        assert!(parsed.result.is_some());
    }

    #[test]
    fn test_malformed_xml_fails() {
        let xml = format!(r#"<Root xmlns="{}"><Item Name="a"></Root>"#, NS);
        let (parsed, errors) = parse(&xml);
        assert_eq!(parsed.state, ParserState::Failed);
        assert!(parsed.result.is_none());
        assert_eq!(errors.last().map(|e| e.code), Some(EdmErrorCode::XmlError));
    }

    #[test]
    fn test_depth_limit() {
        let grammar = TestGrammar::new();
        let mut errors = Vec::new();
        let xml = format!(
            r#"<Root xmlns="{}"><Group><Group><Group/></Group></Group></Root>"#,
            NS
        );
        let parsed = XmlDocumentParser::new(&grammar, "deep.xml", &xml)
            .with_limits(Limits {
                max_depth: 3,
                max_document_size: 1024,
            })
            .parse(&mut errors);
        assert_eq!(parsed.state, ParserState::Failed);
        assert_eq!(codes(&errors), vec![EdmErrorCode::XmlError]);
    }

    #[test]
    fn test_attribute_offset() {
        let tag = r#"<Item Name="a" xName="b" Type = "c">"#;
        assert_eq!(attribute_offset(tag, "Name"), 6);
        assert_eq!(attribute_offset(tag, "Type"), 25);
        assert_eq!(attribute_offset(tag, "Missing"), 0);
    }
}

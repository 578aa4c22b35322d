//! Diagnostic message texts
//!
//! One formatting function per message. Parsers and the model builder pick
//! the [`EdmErrorCode`](crate::error::EdmErrorCode) and take the text from
//! here so wording stays consistent across the crate.

/// The document has no root element.
pub fn empty_file() -> String {
    "The document is empty or contains no root element.".to_string()
}

/// The root element is in a namespace no grammar version supports.
pub fn unexpected_root_namespace(namespace: &str, expected: &[&str]) -> String {
    format!(
        "The root element is in namespace '{}', which is not supported. Supported namespaces are: {}.",
        namespace,
        quoted_list(expected)
    )
}

/// The root element carries no namespace at all.
pub fn unexpected_root_no_namespace(expected: &[&str]) -> String {
    format!(
        "The root element has no namespace. Supported namespaces are: {}.",
        quoted_list(expected)
    )
}

/// The root element name is not a grammar root.
pub fn unexpected_root_element(name: &str, expected: &str) -> String {
    format!(
        "The root element '{}' is not expected. The root element must be '{}'.",
        name, expected
    )
}

/// An element is not allowed at its position.
pub fn unexpected_xml_element(name: &str) -> String {
    format!("The element '{}' was unexpected for the root element or its parent.", name)
}

/// An element parsed fine but its parent never used it.
pub fn unused_element(name: &str) -> String {
    format!("The element '{}' is not used; it may be a duplicate.", name)
}

/// An attribute is not allowed on its element.
pub fn unexpected_xml_attribute(name: &str) -> String {
    format!("The attribute '{}' was not expected in the given context.", name)
}

/// A node kind is not allowed at its position.
pub fn unexpected_node_type(kind: &str) -> String {
    format!("The XML node of type '{}' was not expected.", kind)
}

/// Content follows the end of the root element.
pub fn extra_root_content() -> String {
    "Content is not allowed after the end of the root element.".to_string()
}

/// Character data where the grammar forbids it.
pub fn text_not_allowed(text: &str) -> String {
    format!("Text '{}' is not allowed here.", abbreviate(text.trim()))
}

/// The underlying XML reader failed.
pub fn xml_error(detail: &str) -> String {
    format!("The XML is not well formed: {}", detail)
}

/// Element nesting exceeds the configured limit.
pub fn depth_exceeded(depth: usize, max: usize) -> String {
    format!("Element nesting depth {} exceeds the maximum of {}.", depth, max)
}

/// A DOCTYPE declaration was found.
pub fn dtd_prohibited() -> String {
    "DTD processing is prohibited in CSDL documents.".to_string()
}

/// A required attribute is absent.
pub fn missing_attribute(name: &str) -> String {
    format!("The required attribute '{}' is missing.", name)
}

/// A required child element is absent.
pub fn missing_element(parent: &str, name: &str) -> String {
    format!("The element '{}' requires a child element '{}'.", parent, name)
}

/// Value texts for the attribute readers.
pub fn invalid_value(kind: &str, value: &str) -> String {
    format!("The value '{}' is not a valid {}.", value, kind)
}

/// A type name breaks the collection/reference wrapper grammar.
pub fn invalid_type_name(value: &str) -> String {
    format!("The type name '{}' is invalid.", value)
}

/// A dotted name is malformed.
pub fn invalid_qualified_name(value: &str) -> String {
    format!("The qualified name '{}' is invalid.", value)
}

/// A simple identifier is malformed.
pub fn invalid_name(value: &str) -> String {
    format!("The name '{}' is not a valid simple identifier.", value)
}

/// An entity set path is malformed.
pub fn invalid_entity_set_path(value: &str) -> String {
    format!(
        "The entity set path '{}' is invalid; expected 'ContainerQualifiedName/EntitySetName'.",
        value
    )
}

/// An enum member path is malformed.
pub fn invalid_enum_member_path(value: &str) -> String {
    format!(
        "The enum member path '{}' is invalid; expected 'EnumTypeQualifiedName/MemberName'.",
        value
    )
}

/// A name resolves to several candidates.
pub fn ambiguous_binding(name: &str) -> String {
    format!("The name '{}' is ambiguous.", name)
}

/// A member name is reused inside one declaring element.
pub fn already_defined(name: &str, owner: &str) -> String {
    format!("An element named '{}' is already defined in '{}'.", name, owner)
}

/// Entity container extends chain loops back on itself.
pub fn cyclic_entity_container(name: &str) -> String {
    format!("The entity container '{}' is invalid because its extends hierarchy is cyclic.", name)
}

/// A type name does not resolve.
pub fn unresolved_type(name: &str) -> String {
    format!("The type '{}' could not be found.", name)
}

/// A primitive type name does not resolve.
pub fn unresolved_primitive_type(name: &str) -> String {
    format!("The primitive type '{}' could not be found.", name)
}

/// An entity container name does not resolve.
pub fn unresolved_entity_container(name: &str) -> String {
    format!("The entity container '{}' could not be found.", name)
}

/// A navigation property's relationship does not resolve.
pub fn unresolved_navigation(property: &str, relationship: &str, role: &str) -> String {
    format!(
        "The navigation property '{}' refers to role '{}' of association '{}', which could not be found.",
        property, role, relationship
    )
}

/// A spatial reference is inconsistent.
pub fn bad_spatial_reference(name: &str) -> String {
    format!("The spatial type reference '{}' is invalid.", name)
}

/// Enum member value does not fit.
pub fn enum_member_out_of_range(member: &str, underlying: &str) -> String {
    format!(
        "The value of enum member '{}' is out of range for the underlying type '{}'.",
        member, underlying
    )
}

/// Enum underlying type is not integral.
pub fn invalid_enum_underlying_type(enum_name: &str, underlying: &str) -> String {
    format!(
        "The underlying type '{}' of enum type '{}' must be an integral primitive type.",
        underlying, enum_name
    )
}

fn quoted_list(items: &[&str]) -> String {
    items
        .iter()
        .map(|s| format!("'{}'", s))
        .collect::<Vec<_>>()
        .join(", ")
}

fn abbreviate(text: &str) -> String {
    const MAX: usize = 40;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX).collect();
        format!("{}...", head)
    }
}

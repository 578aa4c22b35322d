//! EDM types, type references and properties

use super::bad::{BadCollectionType, BadEnumMember, BadProperty, BadType};
use super::primitives::EdmPrimitiveTypeKind;
use super::{EdmCheckable, EdmNamedElement, HasTypeKind};
use crate::csdl::{ConcurrencyMode, MaxLength, OnDeleteAction};
use crate::error::EdmError;
use crate::locations::Location;
use crate::names::qualify;
use serde::Serialize;
use std::sync::Arc;

/// Kind of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EdmTypeKind {
    /// Unknown (bad types that never resolved)
    None,
    /// Built-in primitive
    Primitive,
    /// Entity type
    Entity,
    /// Complex type
    Complex,
    /// Enum type
    Enum,
    /// Type definition
    TypeDefinition,
    /// Collection
    Collection,
    /// Entity reference
    EntityReference,
}

/// Index of a schema type inside its model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaTypeId(pub(crate) usize);

impl SchemaTypeId {
    /// Position in [`EdmModel::schema_types`](super::EdmModel::schema_types)
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A resolved schema type and its kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaTypeRef {
    /// Arena index
    pub id: SchemaTypeId,
    /// Kind of the referenced type
    pub kind: EdmTypeKind,
}

/// The definition a type reference points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdmType {
    /// A built-in primitive
    Primitive(EdmPrimitiveTypeKind),
    /// A type declared in the schema
    Schema(SchemaTypeRef),
    /// A collection of the element reference
    Collection(Box<EdmTypeReference>),
    /// A reference to an entity type
    EntityReference(SchemaTypeRef),
    /// A type that could not be built
    Bad(Arc<BadType>),
    /// A collection whose element type could not be built
    BadCollection(Arc<BadCollectionType>),
}

impl HasTypeKind for EdmType {
    fn type_kind(&self) -> EdmTypeKind {
        match self {
            EdmType::Primitive(_) => EdmTypeKind::Primitive,
            EdmType::Schema(schema) => schema.kind,
            EdmType::Collection(_) => EdmTypeKind::Collection,
            EdmType::EntityReference(_) => EdmTypeKind::EntityReference,
            EdmType::Bad(bad) => bad.type_kind(),
            EdmType::BadCollection(bad) => bad.type_kind(),
        }
    }
}

impl EdmCheckable for EdmType {
    fn errors(&self) -> Vec<EdmError> {
        match self {
            EdmType::Collection(element) => element.errors(),
            EdmType::Bad(bad) => bad.errors(),
            EdmType::BadCollection(bad) => bad.errors(),
            EdmType::Primitive(_) | EdmType::Schema(_) | EdmType::EntityReference(_) => Vec::new(),
        }
    }
}

/// Facets of a type reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EdmFacets {
    /// Maximum length
    pub max_length: Option<MaxLength>,
    /// Fixed length
    pub fixed_length: Option<bool>,
    /// Unicode
    pub unicode: Option<bool>,
    /// Precision
    pub precision: Option<u32>,
    /// Scale (`None` also for `variable`)
    pub scale: Option<u32>,
    /// SRID (defaulted for spatial types, `None` for `variable`)
    pub srid: Option<i32>,
}

/// A use of a type: definition plus nullability and facets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdmTypeReference {
    /// Referenced definition
    pub definition: EdmType,
    /// Nullable
    pub nullable: bool,
    /// Facets
    pub facets: EdmFacets,
}

impl EdmTypeReference {
    /// A reference without facets
    pub fn new(definition: EdmType, nullable: bool) -> Self {
        Self {
            definition,
            nullable,
            facets: EdmFacets::default(),
        }
    }

    /// A reference to a primitive type
    pub fn primitive(kind: EdmPrimitiveTypeKind, nullable: bool) -> Self {
        let mut reference = Self::new(EdmType::Primitive(kind), nullable);
        reference.facets.srid = kind.default_srid();
        reference
    }

    /// A non-nullable collection of `element`
    pub fn collection(element: EdmTypeReference) -> Self {
        Self::new(EdmType::Collection(Box::new(element)), false)
    }

    /// The primitive kind, if this references one
    pub fn primitive_kind(&self) -> Option<EdmPrimitiveTypeKind> {
        match self.definition {
            EdmType::Primitive(kind) => Some(kind),
            _ => None,
        }
    }

    /// The schema type, if this references one
    pub fn schema_type(&self) -> Option<SchemaTypeRef> {
        match self.definition {
            EdmType::Schema(schema) | EdmType::EntityReference(schema) => Some(schema),
            _ => None,
        }
    }

    /// Element reference of a collection (bad collections included)
    pub fn element_type(&self) -> Option<&EdmTypeReference> {
        match &self.definition {
            EdmType::Collection(element) => Some(element),
            EdmType::BadCollection(bad) => Some(bad.element_type()),
            _ => None,
        }
    }
}

impl HasTypeKind for EdmTypeReference {
    fn type_kind(&self) -> EdmTypeKind {
        self.definition.type_kind()
    }
}

impl EdmCheckable for EdmTypeReference {
    fn errors(&self) -> Vec<EdmError> {
        self.definition.errors()
    }
}

/// A structural (non-navigation) property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdmStructuralProperty {
    /// Property name
    pub name: String,
    /// Property type
    pub type_ref: EdmTypeReference,
    /// Default value as written
    pub default_value: Option<String>,
    /// Concurrency mode
    pub concurrency_mode: ConcurrencyMode,
    /// Source location
    pub location: Location,
}

/// A navigation property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdmNavigationProperty {
    /// Property name
    pub name: String,
    /// Entity type or collection of entity type
    pub type_ref: EdmTypeReference,
    /// Partner navigation property
    pub partner: Option<String>,
    /// Whether the target is contained
    pub contains_target: bool,
    /// Delete behavior
    pub on_delete: Option<OnDeleteAction>,
    /// `(dependent property, principal property)` pairs
    pub constraints: Vec<(String, String)>,
    /// Source location
    pub location: Location,
}

/// A property of a structured type
#[derive(Debug, Clone)]
pub enum EdmProperty {
    /// Structural property
    Structural(EdmStructuralProperty),
    /// Navigation property
    Navigation(EdmNavigationProperty),
    /// Property that could not be built
    Bad(Arc<BadProperty>),
}

impl EdmProperty {
    /// The property's type
    pub fn type_ref(&self) -> &EdmTypeReference {
        match self {
            EdmProperty::Structural(p) => &p.type_ref,
            EdmProperty::Navigation(p) => &p.type_ref,
            EdmProperty::Bad(p) => p.type_ref(),
        }
    }

    /// Default value as written
    pub fn default_value(&self) -> Option<&str> {
        match self {
            EdmProperty::Structural(p) => p.default_value.as_deref(),
            EdmProperty::Navigation(_) => None,
            EdmProperty::Bad(p) => p.default_value(),
        }
    }

    /// Concurrency mode
    pub fn concurrency_mode(&self) -> ConcurrencyMode {
        match self {
            EdmProperty::Structural(p) => p.concurrency_mode,
            EdmProperty::Navigation(_) => ConcurrencyMode::None,
            EdmProperty::Bad(p) => p.concurrency_mode(),
        }
    }

    /// Whether this is a navigation property
    pub fn is_navigation(&self) -> bool {
        matches!(self, EdmProperty::Navigation(_))
    }

    /// Source location
    pub fn location(&self) -> &Location {
        match self {
            EdmProperty::Structural(p) => &p.location,
            EdmProperty::Navigation(p) => &p.location,
            EdmProperty::Bad(p) => p.location(),
        }
    }
}

impl EdmNamedElement for EdmProperty {
    fn name(&self) -> &str {
        match self {
            EdmProperty::Structural(p) => &p.name,
            EdmProperty::Navigation(p) => &p.name,
            EdmProperty::Bad(p) => p.name(),
        }
    }
}

impl EdmCheckable for EdmProperty {
    fn errors(&self) -> Vec<EdmError> {
        match self {
            EdmProperty::Bad(p) => p.errors(),
            _ => Vec::new(),
        }
    }
}

/// Entity or complex type
#[derive(Debug, Clone)]
pub struct EdmStructuredType {
    /// `Entity` or `Complex`
    pub kind: EdmTypeKind,
    /// Type name
    pub name: String,
    /// Declaring namespace
    pub namespace: String,
    /// Base type
    pub base_type: Option<EdmTypeReference>,
    /// Abstract
    pub is_abstract: bool,
    /// Open type
    pub is_open: bool,
    /// Media entity (entity types only)
    pub has_stream: bool,
    /// Key property names (entity types only)
    pub key: Vec<String>,
    /// Declared properties in document order
    pub properties: Vec<EdmProperty>,
    /// Source location
    pub location: Location,
}

impl EdmStructuredType {
    /// Find a declared property
    pub fn find_property(&self, name: &str) -> Option<&EdmProperty> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Navigation properties
    pub fn navigation_properties(&self) -> impl Iterator<Item = &EdmNavigationProperty> {
        self.properties.iter().filter_map(|p| match p {
            EdmProperty::Navigation(nav) => Some(nav),
            _ => None,
        })
    }
}

/// A valid enum member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMemberInfo {
    /// Member name
    pub name: String,
    /// Explicit or assigned value
    pub value: i64,
    /// Source location
    pub location: Location,
}

/// An enum member or its sentinel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdmEnumMember {
    /// Valid member
    Valid(EnumMemberInfo),
    /// Member that could not be built
    Bad(Arc<BadEnumMember>),
}

impl EdmEnumMember {
    /// Member value (zero for bad members)
    pub fn value(&self) -> i64 {
        match self {
            EdmEnumMember::Valid(member) => member.value,
            EdmEnumMember::Bad(member) => member.value(),
        }
    }
}

impl EdmNamedElement for EdmEnumMember {
    fn name(&self) -> &str {
        match self {
            EdmEnumMember::Valid(member) => &member.name,
            EdmEnumMember::Bad(member) => member.name(),
        }
    }
}

impl EdmCheckable for EdmEnumMember {
    fn errors(&self) -> Vec<EdmError> {
        match self {
            EdmEnumMember::Valid(_) => Vec::new(),
            EdmEnumMember::Bad(member) => member.errors(),
        }
    }
}

/// Enum type
#[derive(Debug, Clone)]
pub struct EdmEnumType {
    /// Type name
    pub name: String,
    /// Declaring namespace
    pub namespace: String,
    /// Integral underlying type
    pub underlying_type: EdmPrimitiveTypeKind,
    /// Flags enum
    pub is_flags: bool,
    /// Members in document order
    pub members: Vec<EdmEnumMember>,
    /// Source location
    pub location: Location,
}

impl EdmEnumType {
    /// Find a member by name
    pub fn find_member(&self, name: &str) -> Option<&EdmEnumMember> {
        self.members.iter().find(|m| m.name() == name)
    }
}

/// Type definition (a named, faceted primitive)
#[derive(Debug, Clone)]
pub struct EdmTypeDefinition {
    /// Type name
    pub name: String,
    /// Declaring namespace
    pub namespace: String,
    /// Underlying primitive with facets
    pub underlying_type: EdmTypeReference,
    /// Source location
    pub location: Location,
}

/// A type declared in a schema
#[derive(Debug, Clone)]
pub enum SchemaType {
    /// Entity or complex type
    Structured(EdmStructuredType),
    /// Enum type
    Enum(EdmEnumType),
    /// Type definition
    Definition(EdmTypeDefinition),
}

impl SchemaType {
    /// Declaring namespace
    pub fn namespace(&self) -> &str {
        match self {
            SchemaType::Structured(t) => &t.namespace,
            SchemaType::Enum(t) => &t.namespace,
            SchemaType::Definition(t) => &t.namespace,
        }
    }

    /// `Namespace.Name`
    pub fn qualified_name(&self) -> String {
        qualify(self.namespace(), self.name())
    }

    /// Source location
    pub fn location(&self) -> &Location {
        match self {
            SchemaType::Structured(t) => &t.location,
            SchemaType::Enum(t) => &t.location,
            SchemaType::Definition(t) => &t.location,
        }
    }

    /// The entity or complex type, if this is one
    pub fn as_structured(&self) -> Option<&EdmStructuredType> {
        match self {
            SchemaType::Structured(t) => Some(t),
            _ => None,
        }
    }

    /// The enum type, if this is one
    pub fn as_enum(&self) -> Option<&EdmEnumType> {
        match self {
            SchemaType::Enum(t) => Some(t),
            _ => None,
        }
    }
}

impl EdmNamedElement for SchemaType {
    fn name(&self) -> &str {
        match self {
            SchemaType::Structured(t) => &t.name,
            SchemaType::Enum(t) => &t.name,
            SchemaType::Definition(t) => &t.name,
        }
    }
}

impl HasTypeKind for SchemaType {
    fn type_kind(&self) -> EdmTypeKind {
        match self {
            SchemaType::Structured(t) => t.kind,
            SchemaType::Enum(_) => EdmTypeKind::Enum,
            SchemaType::Definition(_) => EdmTypeKind::TypeDefinition,
        }
    }
}

impl EdmCheckable for SchemaType {
    fn errors(&self) -> Vec<EdmError> {
        match self {
            SchemaType::Structured(t) => t.properties.iter().flat_map(|p| p.errors()).collect(),
            SchemaType::Enum(t) => t.members.iter().flat_map(|m| m.errors()).collect(),
            SchemaType::Definition(t) => t.underlying_type.errors(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_reference_defaults_srid() {
        let point = EdmTypeReference::primitive(EdmPrimitiveTypeKind::GeographyPoint, true);
        assert_eq!(point.facets.srid, Some(4326));
        assert_eq!(point.type_kind(), EdmTypeKind::Primitive);
        assert!(!point.is_bad());

        let text = EdmTypeReference::primitive(EdmPrimitiveTypeKind::String, false);
        assert_eq!(text.facets.srid, None);
    }

    #[test]
    fn test_collection_errors_come_from_element() {
        let bad = EdmTypeReference::bad(BadType::unresolved("NS.Nope", &Location::unknown()));
        let collection = EdmTypeReference::collection(bad);
        assert_eq!(collection.type_kind(), EdmTypeKind::Collection);
        assert_eq!(collection.errors().len(), 1);
        assert!(collection.element_type().is_some());
    }

    #[test]
    fn test_bad_property_behaves_like_a_property() {
        let property = EdmProperty::Bad(Arc::new(BadProperty::already_defined(
            "Name",
            "NS.Person",
            &Location::unknown(),
        )));
        assert_eq!(property.name(), "Name");
        assert!(property.is_bad());
        assert!(property.type_ref().is_bad());
        assert_eq!(property.default_value(), None);
        assert!(!property.is_navigation());
    }
}

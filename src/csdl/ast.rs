//! CSDL document tree
//!
//! The values the CSDL grammar produces: one struct per CSDL element kind,
//! each carrying its source [`Location`] and any foreign-namespace
//! [`XmlAnnotation`]s. Names are kept exactly as written; alias and type
//! resolution happen later when the EDM model is built.

use crate::locations::Location;
use crate::namespaces::Version;
use crate::xml::XmlAnnotation;
use serde::Serialize;
use std::fmt;

/// `MaxLength` facet value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MaxLength {
    /// The literal `max`
    Max,
    /// An explicit length
    Value(u32),
}

/// Association end cardinality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Multiplicity {
    /// `0..1`
    ZeroOrOne,
    /// `1`
    One,
    /// `*`
    Many,
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Multiplicity::ZeroOrOne => "0..1",
            Multiplicity::One => "1",
            Multiplicity::Many => "*",
        };
        f.write_str(text)
    }
}

/// `OnDelete/@Action`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OnDeleteAction {
    /// No action
    None,
    /// Delete dependents
    Cascade,
    /// Set dependent keys to null
    SetNull,
    /// Set dependent keys to their defaults
    SetDefault,
}

/// `Property/@ConcurrencyMode`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ConcurrencyMode {
    /// Not a concurrency token
    #[default]
    None,
    /// Participates in optimistic concurrency checks
    Fixed,
}

/// `Parameter/@Mode`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParameterMode {
    /// Input parameter
    In,
    /// Output parameter
    Out,
    /// Input and output parameter
    InOut,
}

/// Function or action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperationKind {
    /// Side-effect free operation
    Function,
    /// Operation that may have side effects
    Action,
}

/// Facets shared by properties, parameters, return types and type definitions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CsdlFacets {
    /// `MaxLength`
    pub max_length: Option<MaxLength>,
    /// `FixedLength`
    pub fixed_length: Option<bool>,
    /// `Unicode`
    pub unicode: Option<bool>,
    /// `Precision`
    pub precision: Option<u32>,
    /// `Scale`; `Some(None)` is the literal `variable`
    pub scale: Option<Option<u32>>,
    /// `SRID`; `Some(None)` is the literal `variable`
    pub srid: Option<Option<i32>>,
}

/// Shape of a type reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CsdlTypeKind {
    /// A plain (possibly alias-qualified) type name
    Named(String),
    /// `Collection(T)` or a `CollectionType` element
    Collection(Box<CsdlTypeReference>),
    /// `Ref(T)` or a `ReferenceType` element
    EntityReference(String),
}

/// A reference to a type together with its facets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlTypeReference {
    /// What is referenced
    pub kind: CsdlTypeKind,
    /// `Nullable` (defaults to true)
    pub nullable: bool,
    /// Length, precision and spatial facets
    pub facets: CsdlFacets,
    /// Where the reference was written
    pub location: Location,
}

impl CsdlTypeReference {
    /// A nullable reference to a named type without facets
    pub fn named(name: impl Into<String>, location: Location) -> Self {
        Self {
            kind: CsdlTypeKind::Named(name.into()),
            nullable: true,
            facets: CsdlFacets::default(),
            location,
        }
    }

    /// The type name as it would be written in an attribute
    pub fn display_name(&self) -> String {
        match &self.kind {
            CsdlTypeKind::Named(name) => name.clone(),
            CsdlTypeKind::Collection(element) => format!("Collection({})", element.display_name()),
            CsdlTypeKind::EntityReference(name) => format!("Ref({})", name),
        }
    }
}

/// `Documentation` (versions before 4.0)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CsdlDocumentation {
    /// `Summary` text
    pub summary: Option<String>,
    /// `LongDescription` text
    pub long_description: Option<String>,
}

/// `Using`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlUsing {
    /// Referenced namespace
    pub namespace: String,
    /// Local alias for the namespace
    pub alias: Option<String>,
    /// Source location
    pub location: Location,
}

/// `Property`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlProperty {
    /// Property name
    pub name: String,
    /// Declared type
    pub type_ref: CsdlTypeReference,
    /// `DefaultValue`
    pub default_value: Option<String>,
    /// `ConcurrencyMode`
    pub concurrency_mode: ConcurrencyMode,
    /// `Documentation`
    pub documentation: Option<CsdlDocumentation>,
    /// Foreign annotations
    pub annotations: Vec<XmlAnnotation>,
    /// Source location
    pub location: Location,
}

/// `ReferentialConstraint` under a 4.0 navigation property
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlPropertyConstraint {
    /// Dependent property
    pub property: String,
    /// Principal property
    pub referenced_property: String,
    /// Source location
    pub location: Location,
}

/// How a navigation property names its target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CsdlNavigationTarget {
    /// Versions before 4.0: an association and its roles
    Association {
        /// Qualified association name
        relationship: String,
        /// Role of the target end
        to_role: String,
        /// Role of the declaring end
        from_role: String,
    },
    /// Version 4.0: an entity type or collection of one
    Typed {
        /// Target type
        type_ref: CsdlTypeReference,
        /// Partner navigation property
        partner: Option<String>,
        /// `ContainsTarget`
        contains_target: bool,
        /// `OnDelete` child
        on_delete: Option<OnDeleteAction>,
        /// `ReferentialConstraint` children
        constraints: Vec<CsdlPropertyConstraint>,
    },
}

/// `NavigationProperty`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlNavigationProperty {
    /// Property name
    pub name: String,
    /// Target description
    pub target: CsdlNavigationTarget,
    /// `Documentation`
    pub documentation: Option<CsdlDocumentation>,
    /// Foreign annotations
    pub annotations: Vec<XmlAnnotation>,
    /// Source location
    pub location: Location,
}

/// `EntityType`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlEntityType {
    /// Type name
    pub name: String,
    /// `BaseType`
    pub base_type: Option<String>,
    /// `Abstract`
    pub is_abstract: bool,
    /// `OpenType`
    pub is_open: bool,
    /// `HasStream`
    pub has_stream: bool,
    /// `Key/PropertyRef/@Name` values
    pub key: Vec<String>,
    /// Structural properties
    pub properties: Vec<CsdlProperty>,
    /// Navigation properties
    pub navigation_properties: Vec<CsdlNavigationProperty>,
    /// `Documentation`
    pub documentation: Option<CsdlDocumentation>,
    /// Foreign annotations
    pub annotations: Vec<XmlAnnotation>,
    /// Source location
    pub location: Location,
}

/// `ComplexType`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlComplexType {
    /// Type name
    pub name: String,
    /// `BaseType`
    pub base_type: Option<String>,
    /// `Abstract`
    pub is_abstract: bool,
    /// `OpenType`
    pub is_open: bool,
    /// Structural properties
    pub properties: Vec<CsdlProperty>,
    /// Navigation properties (4.0 only)
    pub navigation_properties: Vec<CsdlNavigationProperty>,
    /// `Documentation`
    pub documentation: Option<CsdlDocumentation>,
    /// Foreign annotations
    pub annotations: Vec<XmlAnnotation>,
    /// Source location
    pub location: Location,
}

/// `Member`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlEnumMember {
    /// Member name
    pub name: String,
    /// Explicit value
    pub value: Option<i64>,
    /// Foreign annotations
    pub annotations: Vec<XmlAnnotation>,
    /// Source location
    pub location: Location,
}

/// `EnumType`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlEnumType {
    /// Type name
    pub name: String,
    /// `UnderlyingType`
    pub underlying_type: Option<String>,
    /// `IsFlags`
    pub is_flags: bool,
    /// Members in document order
    pub members: Vec<CsdlEnumMember>,
    /// `Documentation`
    pub documentation: Option<CsdlDocumentation>,
    /// Foreign annotations
    pub annotations: Vec<XmlAnnotation>,
    /// Source location
    pub location: Location,
}

/// `TypeDefinition` (4.0)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlTypeDefinition {
    /// Type name
    pub name: String,
    /// `UnderlyingType`
    pub underlying_type: String,
    /// Facets applied to the underlying type
    pub facets: CsdlFacets,
    /// Foreign annotations
    pub annotations: Vec<XmlAnnotation>,
    /// Source location
    pub location: Location,
}

/// `Association/End`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlAssociationEnd {
    /// `Role`
    pub role: String,
    /// Entity type of this end
    pub type_name: String,
    /// `Multiplicity`
    pub multiplicity: Multiplicity,
    /// `OnDelete` child
    pub on_delete: Option<OnDeleteAction>,
    /// `Documentation` child
    pub documentation: Option<CsdlDocumentation>,
    /// Source location
    pub location: Location,
}

/// `Principal` or `Dependent`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlConstraintRole {
    /// `Role`
    pub role: String,
    /// `PropertyRef/@Name` values
    pub properties: Vec<String>,
    /// Source location
    pub location: Location,
}

/// `Association/ReferentialConstraint`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlReferentialConstraint {
    /// The principal role
    pub principal: CsdlConstraintRole,
    /// The dependent role
    pub dependent: CsdlConstraintRole,
    /// Source location
    pub location: Location,
}

/// `Association` (versions before 4.0)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlAssociation {
    /// Association name
    pub name: String,
    /// The two ends
    pub ends: Vec<CsdlAssociationEnd>,
    /// Optional constraint
    pub referential_constraint: Option<CsdlReferentialConstraint>,
    /// `Documentation` child
    pub documentation: Option<CsdlDocumentation>,
    /// Foreign annotations
    pub annotations: Vec<XmlAnnotation>,
    /// Source location
    pub location: Location,
}

/// `Parameter`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlParameter {
    /// Parameter name
    pub name: String,
    /// Parameter type
    pub type_ref: CsdlTypeReference,
    /// `Mode` (versions before 4.0)
    pub mode: Option<ParameterMode>,
    /// `Documentation` child
    pub documentation: Option<CsdlDocumentation>,
    /// Foreign annotations
    pub annotations: Vec<XmlAnnotation>,
    /// Source location
    pub location: Location,
}

/// `Function` or `Action`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlOperation {
    /// Function or action
    pub kind: OperationKind,
    /// Operation name
    pub name: String,
    /// Parameters in declaration order
    pub parameters: Vec<CsdlParameter>,
    /// Return type
    pub return_type: Option<CsdlTypeReference>,
    /// `IsBound`
    pub is_bound: bool,
    /// `IsComposable`
    pub is_composable: bool,
    /// `EntitySetPath`
    pub entity_set_path: Option<String>,
    /// `DefiningExpression` text (versions before 4.0)
    pub defining_expression: Option<String>,
    /// `Documentation`
    pub documentation: Option<CsdlDocumentation>,
    /// Foreign annotations
    pub annotations: Vec<XmlAnnotation>,
    /// Source location
    pub location: Location,
}

/// `NavigationPropertyBinding` (4.0)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlNavigationPropertyBinding {
    /// Navigation property path
    pub path: String,
    /// Target entity set or singleton
    pub target: String,
    /// Source location
    pub location: Location,
}

/// `EntitySet`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlEntitySet {
    /// Set name
    pub name: String,
    /// Qualified entity type name
    pub entity_type: String,
    /// Navigation bindings (4.0)
    pub navigation_bindings: Vec<CsdlNavigationPropertyBinding>,
    /// `Documentation`
    pub documentation: Option<CsdlDocumentation>,
    /// Foreign annotations
    pub annotations: Vec<XmlAnnotation>,
    /// Source location
    pub location: Location,
}

/// `Singleton` (4.0)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlSingleton {
    /// Singleton name
    pub name: String,
    /// Qualified entity type name
    pub type_name: String,
    /// Navigation bindings
    pub navigation_bindings: Vec<CsdlNavigationPropertyBinding>,
    /// Foreign annotations
    pub annotations: Vec<XmlAnnotation>,
    /// Source location
    pub location: Location,
}

/// `FunctionImport` or `ActionImport`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlOperationImport {
    /// Function or action import
    pub kind: OperationKind,
    /// Import name
    pub name: String,
    /// Imported operation (4.0 `Function`/`Action`)
    pub operation: Option<String>,
    /// Entity set the results belong to
    pub entity_set: Option<String>,
    /// Return type (versions before 4.0)
    pub return_type: Option<CsdlTypeReference>,
    /// Parameters (versions before 4.0)
    pub parameters: Vec<CsdlParameter>,
    /// `IsSideEffecting` (versions before 4.0)
    pub is_side_effecting: Option<bool>,
    /// `IsBindable` (versions before 4.0)
    pub is_bindable: bool,
    /// `IsComposable` (versions before 4.0)
    pub is_composable: bool,
    /// `IncludeInServiceDocument` (4.0)
    pub include_in_service_document: bool,
    /// `Documentation`
    pub documentation: Option<CsdlDocumentation>,
    /// Foreign annotations
    pub annotations: Vec<XmlAnnotation>,
    /// Source location
    pub location: Location,
}

/// `AssociationSet/End`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlAssociationSetEnd {
    /// `Role`
    pub role: String,
    /// `EntitySet`
    pub entity_set: String,
    /// `Documentation` child
    pub documentation: Option<CsdlDocumentation>,
    /// Source location
    pub location: Location,
}

/// `AssociationSet` (versions before 4.0)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlAssociationSet {
    /// Set name
    pub name: String,
    /// Qualified association name
    pub association: String,
    /// Ends
    pub ends: Vec<CsdlAssociationSetEnd>,
    /// `Documentation` child
    pub documentation: Option<CsdlDocumentation>,
    /// Source location
    pub location: Location,
}

/// `EntityContainer`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlEntityContainer {
    /// Container name
    pub name: String,
    /// `Extends`
    pub extends: Option<String>,
    /// Entity sets
    pub entity_sets: Vec<CsdlEntitySet>,
    /// Singletons (4.0)
    pub singletons: Vec<CsdlSingleton>,
    /// Function and action imports
    pub operation_imports: Vec<CsdlOperationImport>,
    /// Association sets (versions before 4.0)
    pub association_sets: Vec<CsdlAssociationSet>,
    /// `Documentation`
    pub documentation: Option<CsdlDocumentation>,
    /// Foreign annotations
    pub annotations: Vec<XmlAnnotation>,
    /// Source location
    pub location: Location,
}

/// `Schema`, the document root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsdlSchema {
    /// Version selected by the root namespace
    pub version: Version,
    /// `Namespace`
    pub namespace: String,
    /// `Alias`
    pub alias: Option<String>,
    /// `Using` declarations
    pub usings: Vec<CsdlUsing>,
    /// Entity types
    pub entity_types: Vec<CsdlEntityType>,
    /// Complex types
    pub complex_types: Vec<CsdlComplexType>,
    /// Enum types
    pub enum_types: Vec<CsdlEnumType>,
    /// Type definitions
    pub type_definitions: Vec<CsdlTypeDefinition>,
    /// Associations
    pub associations: Vec<CsdlAssociation>,
    /// Functions and actions
    pub operations: Vec<CsdlOperation>,
    /// Entity containers
    pub entity_containers: Vec<CsdlEntityContainer>,
    /// `Documentation`
    pub documentation: Option<CsdlDocumentation>,
    /// Foreign annotations
    pub annotations: Vec<XmlAnnotation>,
    /// Source location
    pub location: Location,
}

//! Values flowing between CSDL element parsers
//!
//! Every CSDL finalizer produces one [`CsdlItem`]; parent finalizers pull
//! the variants they expect out of their children by element name.

use super::ast::*;
use crate::xml::XmlElementValues;

/// Result of one CSDL element
#[derive(Debug, Clone, PartialEq)]
pub enum CsdlItem {
    /// `Schema`
    Schema(Box<CsdlSchema>),
    /// `Using`
    Using(CsdlUsing),
    /// `Documentation`
    Documentation(CsdlDocumentation),
    /// Text of `Summary`, `LongDescription` or `DefiningExpression`
    Text(String),
    /// `EntityType`
    EntityType(CsdlEntityType),
    /// `ComplexType`
    ComplexType(CsdlComplexType),
    /// `EnumType`
    EnumType(CsdlEnumType),
    /// `TypeDefinition`
    TypeDefinition(CsdlTypeDefinition),
    /// `Key`
    Key(Vec<String>),
    /// `PropertyRef`
    PropertyRef(String),
    /// `Property`
    Property(CsdlProperty),
    /// `NavigationProperty`
    NavigationProperty(CsdlNavigationProperty),
    /// `Member`
    Member(CsdlEnumMember),
    /// `OnDelete`
    OnDelete(OnDeleteAction),
    /// `ReferentialConstraint` of a 4.0 navigation property
    PropertyConstraint(CsdlPropertyConstraint),
    /// `Association`
    Association(CsdlAssociation),
    /// `Association/End`
    AssociationEnd(CsdlAssociationEnd),
    /// `Principal` or `Dependent`
    ConstraintRole(CsdlConstraintRole),
    /// `Association/ReferentialConstraint`
    ReferentialConstraint(CsdlReferentialConstraint),
    /// `Function` or `Action`
    Operation(CsdlOperation),
    /// `Parameter`
    Parameter(CsdlParameter),
    /// `ReturnType`, `CollectionType`, `ReferenceType` or `TypeRef`
    TypeReference(CsdlTypeReference),
    /// `EntityContainer`
    EntityContainer(CsdlEntityContainer),
    /// `EntitySet`
    EntitySet(CsdlEntitySet),
    /// `NavigationPropertyBinding`
    NavigationPropertyBinding(CsdlNavigationPropertyBinding),
    /// `Singleton`
    Singleton(CsdlSingleton),
    /// `FunctionImport` or `ActionImport`
    OperationImport(CsdlOperationImport),
    /// `AssociationSet`
    AssociationSet(CsdlAssociationSet),
    /// `AssociationSet/End`
    AssociationSetEnd(CsdlAssociationSetEnd),
}

macro_rules! item_accessors {
    ($($method:ident => $variant:ident($ty:ty)),* $(,)?) => {
        impl CsdlItem {
            $(
                #[doc = concat!("The `", stringify!($variant), "` payload, if this is one")]
                pub fn $method(self) -> Option<$ty> {
                    match self {
                        CsdlItem::$variant(value) => Some(value),
                        _ => None,
                    }
                }
            )*
        }
    };
}

item_accessors! {
    into_using => Using(CsdlUsing),
    into_documentation => Documentation(CsdlDocumentation),
    into_text => Text(String),
    into_entity_type => EntityType(CsdlEntityType),
    into_complex_type => ComplexType(CsdlComplexType),
    into_enum_type => EnumType(CsdlEnumType),
    into_type_definition => TypeDefinition(CsdlTypeDefinition),
    into_key => Key(Vec<String>),
    into_property_ref => PropertyRef(String),
    into_property => Property(CsdlProperty),
    into_navigation_property => NavigationProperty(CsdlNavigationProperty),
    into_member => Member(CsdlEnumMember),
    into_on_delete => OnDelete(OnDeleteAction),
    into_property_constraint => PropertyConstraint(CsdlPropertyConstraint),
    into_association => Association(CsdlAssociation),
    into_association_end => AssociationEnd(CsdlAssociationEnd),
    into_constraint_role => ConstraintRole(CsdlConstraintRole),
    into_referential_constraint => ReferentialConstraint(CsdlReferentialConstraint),
    into_operation => Operation(CsdlOperation),
    into_parameter => Parameter(CsdlParameter),
    into_type_reference => TypeReference(CsdlTypeReference),
    into_entity_container => EntityContainer(CsdlEntityContainer),
    into_entity_set => EntitySet(CsdlEntitySet),
    into_navigation_property_binding => NavigationPropertyBinding(CsdlNavigationPropertyBinding),
    into_singleton => Singleton(CsdlSingleton),
    into_operation_import => OperationImport(CsdlOperationImport),
    into_association_set => AssociationSet(CsdlAssociationSet),
    into_association_set_end => AssociationSetEnd(CsdlAssociationSetEnd),
}

impl CsdlItem {
    /// The `Schema` payload, if this is one
    pub fn into_schema(self) -> Option<CsdlSchema> {
        match self {
            CsdlItem::Schema(schema) => Some(*schema),
            _ => None,
        }
    }
}

/// Typed access to CSDL child results
pub(crate) trait CsdlChildren {
    /// Take the first child named `name` and convert it
    fn first<T>(&mut self, name: &str, convert: fn(CsdlItem) -> Option<T>) -> Option<T>;

    /// Take every child named `name` and convert them
    fn all<T>(&mut self, name: &str, convert: fn(CsdlItem) -> Option<T>) -> Vec<T>;
}

impl CsdlChildren for XmlElementValues<CsdlItem> {
    fn first<T>(&mut self, name: &str, convert: fn(CsdlItem) -> Option<T>) -> Option<T> {
        self.take_first(name).and_then(convert)
    }

    fn all<T>(&mut self, name: &str, convert: fn(CsdlItem) -> Option<T>) -> Vec<T> {
        self.take_all(name).into_iter().filter_map(convert).collect()
    }
}

//! Sentinel nodes for invalid definitions
//!
//! A sentinel stands in for a node the builder could not produce. It
//! carries at least one error, answers every query of its family with a
//! neutral default, and is never mutated after construction. The one
//! value that has to reflect the failure (a bad property's type, a bad
//! collection's element type) is computed on first access.

use super::ambiguous::Binding;
use super::containers::EdmEntitySet;
use super::types::{EdmType, EdmTypeKind, EdmTypeReference};
use super::{EdmCheckable, EdmNamedElement, HasTypeKind};
use crate::csdl::ConcurrencyMode;
use crate::error::{EdmError, EdmErrorCode};
use crate::locations::Location;
use crate::messages;
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// A type that could not be resolved or is inconsistent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadType {
    name: String,
    kind: EdmTypeKind,
    errors: Vec<EdmError>,
}

impl BadType {
    /// Create a bad type from its errors
    pub fn new(name: impl Into<String>, kind: EdmTypeKind, errors: Vec<EdmError>) -> Self {
        Self {
            name: name.into(),
            kind,
            errors,
        }
    }

    /// A schema type name that does not resolve
    pub fn unresolved(name: &str, location: &Location) -> Self {
        Self::new(
            name,
            EdmTypeKind::None,
            vec![EdmError::new(
                location.clone(),
                EdmErrorCode::BadUnresolvedType,
                messages::unresolved_type(name),
            )],
        )
    }

    /// An `Edm.` name that is not a primitive type
    pub fn unresolved_primitive(name: &str, location: &Location) -> Self {
        Self::new(
            name,
            EdmTypeKind::Primitive,
            vec![EdmError::new(
                location.clone(),
                EdmErrorCode::BadUnresolvedPrimitiveType,
                messages::unresolved_primitive_type(name),
            )],
        )
    }

    /// A primitive reference whose spatial facets do not fit its type
    pub fn spatial(name: &str, location: &Location) -> Self {
        Self::new(
            name,
            EdmTypeKind::Primitive,
            vec![EdmError::new(
                location.clone(),
                EdmErrorCode::BadSpatialTypeReference,
                messages::bad_spatial_reference(name),
            )],
        )
    }

    /// The name as written
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Errors explaining why the type is bad
    pub fn errors_ref(&self) -> &[EdmError] {
        &self.errors
    }
}

impl HasTypeKind for BadType {
    fn type_kind(&self) -> EdmTypeKind {
        self.kind
    }
}

impl EdmCheckable for BadType {
    fn errors(&self) -> Vec<EdmError> {
        self.errors.clone()
    }
}

/// A collection whose element type is bad
#[derive(Debug)]
pub struct BadCollectionType {
    element_name: String,
    errors: Vec<EdmError>,
    element_type: OnceCell<EdmTypeReference>,
}

impl BadCollectionType {
    /// Create a bad collection around the element's errors
    pub fn new(element_name: impl Into<String>, errors: Vec<EdmError>) -> Self {
        Self {
            element_name: element_name.into(),
            errors,
            element_type: OnceCell::new(),
        }
    }

    /// The element type: a bad type carrying the same errors
    pub fn element_type(&self) -> &EdmTypeReference {
        self.element_type.get_or_init(|| {
            EdmTypeReference::bad(BadType::new(
                self.element_name.clone(),
                EdmTypeKind::None,
                self.errors.clone(),
            ))
        })
    }

    /// Name of the element type as written
    pub fn element_name(&self) -> &str {
        &self.element_name
    }
}

impl PartialEq for BadCollectionType {
    fn eq(&self, other: &Self) -> bool {
        self.element_name == other.element_name && self.errors == other.errors
    }
}

impl Eq for BadCollectionType {}

impl HasTypeKind for BadCollectionType {
    fn type_kind(&self) -> EdmTypeKind {
        EdmTypeKind::Collection
    }
}

impl EdmCheckable for BadCollectionType {
    fn errors(&self) -> Vec<EdmError> {
        self.errors.clone()
    }
}

/// A property that could not be built
#[derive(Debug)]
pub struct BadProperty {
    name: String,
    declaring_type: String,
    errors: Vec<EdmError>,
    location: Location,
    type_ref: OnceCell<EdmTypeReference>,
}

impl BadProperty {
    /// Create a bad property from its errors
    pub fn new(
        name: impl Into<String>,
        declaring_type: impl Into<String>,
        errors: Vec<EdmError>,
        location: Location,
    ) -> Self {
        Self {
            name: name.into(),
            declaring_type: declaring_type.into(),
            errors,
            location,
            type_ref: OnceCell::new(),
        }
    }

    /// A property whose name is already taken in its declaring type
    pub fn already_defined(name: &str, declaring_type: &str, location: &Location) -> Self {
        let error = EdmError::new(
            location.clone(),
            EdmErrorCode::AlreadyDefined,
            messages::already_defined(name, declaring_type),
        );
        Self::new(name, declaring_type, vec![error], location.clone())
    }

    /// A navigation property whose association or role does not resolve
    pub fn unresolved_navigation(
        name: &str,
        declaring_type: &str,
        relationship: &str,
        role: &str,
        location: &Location,
    ) -> Self {
        let error = EdmError::new(
            location.clone(),
            EdmErrorCode::BadUnresolvedNavigationPropertyPath,
            messages::unresolved_navigation(name, relationship, role),
        );
        Self::new(name, declaring_type, vec![error], location.clone())
    }

    /// Qualified name of the declaring type
    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    /// Where the property was declared
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// A bad type reference carrying this property's errors
    pub fn type_ref(&self) -> &EdmTypeReference {
        self.type_ref.get_or_init(|| {
            EdmTypeReference::bad(BadType::new(
                self.name.clone(),
                EdmTypeKind::None,
                self.errors.clone(),
            ))
        })
    }

    /// Always `None`
    pub fn default_value(&self) -> Option<&str> {
        None
    }

    /// Always [`ConcurrencyMode::None`]
    pub fn concurrency_mode(&self) -> ConcurrencyMode {
        ConcurrencyMode::None
    }
}

impl EdmNamedElement for BadProperty {
    fn name(&self) -> &str {
        &self.name
    }
}

impl EdmCheckable for BadProperty {
    fn errors(&self) -> Vec<EdmError> {
        self.errors.clone()
    }
}

/// An enum member that could not be built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadEnumMember {
    name: String,
    errors: Vec<EdmError>,
    location: Location,
}

impl BadEnumMember {
    /// Create a bad enum member from its errors
    pub fn new(name: impl Into<String>, errors: Vec<EdmError>, location: Location) -> Self {
        Self {
            name: name.into(),
            errors,
            location,
        }
    }

    /// A member whose value does not fit the underlying type
    pub fn out_of_range(name: &str, underlying: &str, location: &Location) -> Self {
        let error = EdmError::new(
            location.clone(),
            EdmErrorCode::EnumMemberValueOutOfRange,
            messages::enum_member_out_of_range(name, underlying),
        );
        Self::new(name, vec![error], location.clone())
    }

    /// Always zero
    pub fn value(&self) -> i64 {
        0
    }

    /// Where the member was declared
    pub fn location(&self) -> &Location {
        &self.location
    }
}

impl EdmNamedElement for BadEnumMember {
    fn name(&self) -> &str {
        &self.name
    }
}

impl EdmCheckable for BadEnumMember {
    fn errors(&self) -> Vec<EdmError> {
        self.errors.clone()
    }
}

/// An entity container that could not be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadEntityContainer {
    name: String,
    errors: Vec<EdmError>,
}

impl BadEntityContainer {
    /// Create a bad container from its errors
    pub fn new(name: impl Into<String>, errors: Vec<EdmError>) -> Self {
        Self {
            name: name.into(),
            errors,
        }
    }

    /// An `Extends` target that does not resolve
    pub fn unresolved(name: &str, location: &Location) -> Self {
        Self::new(
            name,
            vec![EdmError::new(
                location.clone(),
                EdmErrorCode::BadUnresolvedEntityContainer,
                messages::unresolved_entity_container(name),
            )],
        )
    }

    /// A container whose extends chain leads back to itself
    pub fn cyclic(name: &str, location: &Location) -> Self {
        Self::new(
            name,
            vec![EdmError::new(
                location.clone(),
                EdmErrorCode::BadCyclicEntityContainer,
                messages::cyclic_entity_container(name),
            )],
        )
    }

    /// Whether this sentinel marks an extends cycle
    pub fn is_cyclic(&self) -> bool {
        self.errors
            .iter()
            .any(|e| e.code == EdmErrorCode::BadCyclicEntityContainer)
    }

    /// A bad container has no entity sets
    pub fn find_entity_set(&self, _name: &str) -> Option<&Binding<EdmEntitySet>> {
        None
    }
}

impl EdmNamedElement for BadEntityContainer {
    fn name(&self) -> &str {
        &self.name
    }
}

impl EdmCheckable for BadEntityContainer {
    fn errors(&self) -> Vec<EdmError> {
        self.errors.clone()
    }
}

impl EdmTypeReference {
    /// A nullable reference to a bad type
    pub fn bad(bad: BadType) -> Self {
        Self::new(EdmType::Bad(Arc::new(bad)), true)
    }
}

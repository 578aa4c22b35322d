//! Entity Data Model graph
//!
//! The linked, immutable model built from a CSDL schema. Every node family
//! has a valid form and a bad (sentinel) form behind one enum, so callers
//! match both arms instead of checking for absent values. Name collisions
//! are represented by [`Binding::Ambiguous`].

mod ambiguous;
mod bad;
mod containers;
mod model;
mod operations;
mod primitives;
mod types;

pub use ambiguous::{AmbiguousBinding, Binding, BindingRegistry};
pub use bad::{BadCollectionType, BadEntityContainer, BadEnumMember, BadProperty, BadType};
pub use containers::{
    ContainerId, EdmAssociationSet, EdmEntityContainer, EdmEntitySet, EdmNavigationBinding,
    EdmOperationImport, EdmSingleton, ExtendsTarget,
};
pub use model::EdmModel;
pub use operations::{EdmOperation, EdmOperationParameter, OperationBinding};
pub use primitives::{
    EdmCoreModel, EdmPrimitiveTypeKind, EDM_NAMESPACE, GEOGRAPHY_DEFAULT_SRID,
    GEOMETRY_DEFAULT_SRID,
};
pub use types::{
    EdmEnumMember, EdmEnumType, EdmFacets, EdmNavigationProperty, EdmProperty,
    EdmStructuralProperty, EdmStructuredType, EdmType, EdmTypeDefinition, EdmTypeKind,
    EdmTypeReference, EnumMemberInfo, SchemaType, SchemaTypeId, SchemaTypeRef,
};

use crate::error::EdmError;

/// A model element with a name
pub trait EdmNamedElement {
    /// The element's (unqualified) name
    fn name(&self) -> &str;
}

/// A model element that can tell what kind of type it is
pub trait HasTypeKind {
    /// The type kind
    fn type_kind(&self) -> EdmTypeKind;
}

/// A model element that may carry errors
pub trait EdmCheckable {
    /// Errors attached to this element; empty for valid elements
    fn errors(&self) -> Vec<EdmError>;

    /// Whether this element is a sentinel
    fn is_bad(&self) -> bool {
        !self.errors().is_empty()
    }
}

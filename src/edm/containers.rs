//! Entity containers and their members

use super::ambiguous::{Binding, BindingRegistry};
use super::bad::BadEntityContainer;
use super::operations::EdmOperationParameter;
use super::types::EdmTypeReference;
use super::{EdmCheckable, EdmNamedElement};
use crate::csdl::OperationKind;
use crate::error::EdmError;
use crate::locations::Location;
use crate::names::qualify;
use std::sync::Arc;

/// Index of a container inside its model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(pub(crate) usize);

impl ContainerId {
    /// Position in [`EdmModel::entity_containers`](super::EdmModel::entity_containers)
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A navigation property binding of an entity set or singleton
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdmNavigationBinding {
    /// Navigation property path
    pub path: String,
    /// Target entity set
    pub target: String,
}

/// An entity set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdmEntitySet {
    /// Set name
    pub name: String,
    /// Entity type of the members
    pub entity_type: EdmTypeReference,
    /// Navigation bindings
    pub navigation_bindings: Vec<EdmNavigationBinding>,
    /// Source location
    pub location: Location,
}

/// A singleton
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdmSingleton {
    /// Singleton name
    pub name: String,
    /// Entity type
    pub entity_type: EdmTypeReference,
    /// Navigation bindings
    pub navigation_bindings: Vec<EdmNavigationBinding>,
    /// Source location
    pub location: Location,
}

/// A function import, action import or legacy function import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdmOperationImport {
    /// Function or action
    pub kind: OperationKind,
    /// Import name
    pub name: String,
    /// Imported operation (v4)
    pub operation: Option<String>,
    /// Entity set of the result
    pub entity_set: Option<String>,
    /// Return type (legacy imports)
    pub return_type: Option<EdmTypeReference>,
    /// Parameters (legacy imports)
    pub parameters: Vec<EdmOperationParameter>,
    /// Source location
    pub location: Location,
}

/// A legacy association set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdmAssociationSet {
    /// Set name
    pub name: String,
    /// Qualified association name
    pub association: String,
    /// `(role, entity set)` pairs
    pub ends: Vec<(String, String)>,
}

/// The container named by `Extends`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtendsTarget {
    /// Resolved container
    Container(ContainerId),
    /// Unresolved or cyclic
    Bad(Arc<BadEntityContainer>),
}

impl EdmCheckable for ExtendsTarget {
    fn errors(&self) -> Vec<EdmError> {
        match self {
            ExtendsTarget::Container(_) => Vec::new(),
            ExtendsTarget::Bad(bad) => bad.errors(),
        }
    }
}

/// An entity container
#[derive(Debug, Clone)]
pub struct EdmEntityContainer {
    /// Container name
    pub name: String,
    /// Declaring namespace
    pub namespace: String,
    /// Extended container
    pub extends: Option<ExtendsTarget>,
    /// Entity sets by name
    pub entity_sets: BindingRegistry<EdmEntitySet>,
    /// Singletons by name
    pub singletons: BindingRegistry<EdmSingleton>,
    /// Operation imports by name
    pub operation_imports: BindingRegistry<EdmOperationImport>,
    /// Association sets by name
    pub association_sets: BindingRegistry<EdmAssociationSet>,
    /// Source location
    pub location: Location,
}

impl EdmEntityContainer {
    /// `Namespace.Name`
    pub fn qualified_name(&self) -> String {
        qualify(&self.namespace, &self.name)
    }

    /// An entity set declared directly in this container
    pub fn find_entity_set(&self, name: &str) -> Option<&Binding<EdmEntitySet>> {
        self.entity_sets.get(name)
    }

    /// A singleton declared directly in this container
    pub fn find_singleton(&self, name: &str) -> Option<&Binding<EdmSingleton>> {
        self.singletons.get(name)
    }

    /// An operation import declared directly in this container
    pub fn find_operation_import(&self, name: &str) -> Option<&Binding<EdmOperationImport>> {
        self.operation_imports.get(name)
    }

    /// Whether `Extends` failed to resolve or forms a cycle
    pub fn has_bad_extends(&self) -> bool {
        matches!(self.extends, Some(ExtendsTarget::Bad(_)))
    }
}

impl EdmNamedElement for EdmEntityContainer {
    fn name(&self) -> &str {
        &self.name
    }
}

impl EdmCheckable for EdmEntityContainer {
    fn errors(&self) -> Vec<EdmError> {
        let mut errors: Vec<EdmError> = self.extends.iter().flat_map(|e| e.errors()).collect();
        errors.extend(self.entity_sets.values().flat_map(|b| b.errors()));
        errors.extend(self.singletons.values().flat_map(|b| b.errors()));
        errors.extend(self.operation_imports.values().flat_map(|b| b.errors()));
        errors.extend(self.association_sets.values().flat_map(|b| b.errors()));
        errors
    }
}

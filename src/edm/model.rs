//! The built model and its lookups

use super::ambiguous::{Binding, BindingRegistry};
use super::containers::{ContainerId, EdmEntityContainer, EdmEntitySet, ExtendsTarget};
use super::operations::{EdmOperation, OperationBinding};
use super::types::{SchemaType, SchemaTypeId};
use super::EdmNamedElement;
use crate::error::EdmError;
use crate::namespaces::Version;
use crate::xml::XmlAnnotation;
use std::collections::HashSet;
use std::sync::Arc;

/// A linked EDM model built from one CSDL schema
///
/// Immutable once built. Schema types and containers live in arenas and
/// are addressed by [`SchemaTypeId`] and [`ContainerId`]; names map to ids
/// through [`BindingRegistry`]s, so a collision shows up as an ambiguous
/// binding rather than a lost definition.
#[derive(Debug, Clone)]
pub struct EdmModel {
    pub(crate) namespace: String,
    pub(crate) alias: Option<String>,
    pub(crate) version: Version,
    pub(crate) types: Vec<SchemaType>,
    pub(crate) type_bindings: BindingRegistry<SchemaTypeId>,
    pub(crate) operations: BindingRegistry<Arc<EdmOperation>>,
    pub(crate) containers: Vec<EdmEntityContainer>,
    pub(crate) container_bindings: BindingRegistry<ContainerId>,
    pub(crate) annotations: Vec<XmlAnnotation>,
    pub(crate) parse_errors: Vec<EdmError>,
    pub(crate) semantic_errors: Vec<EdmError>,
}

impl EdmModel {
    /// Schema namespace
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Schema alias
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// CSDL version of the source document
    pub fn version(&self) -> Version {
        self.version
    }

    /// Every declared type in declaration order (by kind)
    pub fn schema_types(&self) -> &[SchemaType] {
        &self.types
    }

    /// A type by id
    pub fn schema_type(&self, id: SchemaTypeId) -> Option<&SchemaType> {
        self.types.get(id.index())
    }

    /// Replace a leading schema alias with the namespace
    pub fn normalize(&self, name: &str) -> String {
        if let Some(alias) = &self.alias {
            if let Some(rest) = name.strip_prefix(alias.as_str()) {
                if let Some(local) = rest.strip_prefix('.') {
                    return format!("{}.{}", self.namespace, local);
                }
            }
        }
        name.to_string()
    }

    /// The binding of a qualified (or alias-qualified) type name
    pub fn find_type_binding(&self, name: &str) -> Option<&Binding<SchemaTypeId>> {
        self.type_bindings.get(&self.normalize(name))
    }

    /// A uniquely named type
    pub fn find_type(&self, name: &str) -> Option<&SchemaType> {
        let binding = self.find_type_binding(name)?;
        self.schema_type(*binding.unique()?)
    }

    /// Every operation binding, keyed by qualified name
    pub fn operations(&self) -> impl Iterator<Item = (&str, &OperationBinding)> {
        self.operations.iter()
    }

    /// The binding of a qualified operation name
    ///
    /// Several operations sharing the name form one ambiguous binding.
    pub fn find_operation(&self, name: &str) -> Option<&OperationBinding> {
        self.operations.get(&self.normalize(name))
    }

    /// Every operation declared under a qualified name, in document order
    pub fn find_operations(&self, name: &str) -> &[Arc<EdmOperation>] {
        self.find_operation(name)
            .map(|binding| binding.candidates())
            .unwrap_or_default()
    }

    /// Every container in declaration order
    pub fn entity_containers(&self) -> &[EdmEntityContainer] {
        &self.containers
    }

    /// A container by id
    pub fn container(&self, id: ContainerId) -> Option<&EdmEntityContainer> {
        self.containers.get(id.index())
    }

    /// A uniquely named container, by simple or qualified name
    pub fn find_entity_container(&self, name: &str) -> Option<&EdmEntityContainer> {
        let binding = self
            .container_bindings
            .get(&self.normalize(name))
            .or_else(|| self.container_bindings.get(&format!("{}.{}", self.namespace, name)))?;
        self.container(*binding.unique()?)
    }

    /// An entity set of `container` or of a container it extends
    pub fn find_entity_set(&self, container: &str, name: &str) -> Option<&Binding<EdmEntitySet>> {
        let mut current = self.find_entity_container(container)?;
        let mut visited = HashSet::new();
        loop {
            if let Some(found) = current.find_entity_set(name) {
                return Some(found);
            }
            if !visited.insert(current.qualified_name()) {
                return None;
            }
            match &current.extends {
                Some(ExtendsTarget::Container(id)) => current = self.container(*id)?,
                Some(ExtendsTarget::Bad(bad)) => return bad.find_entity_set(name),
                None => return None,
            }
        }
    }

    /// Foreign annotations on the schema element
    pub fn annotations(&self) -> &[XmlAnnotation] {
        &self.annotations
    }

    /// Parse diagnostics followed by semantic diagnostics
    pub fn errors(&self) -> Vec<EdmError> {
        let mut errors = self.parse_errors.clone();
        errors.extend(self.semantic_errors.iter().cloned());
        errors
    }

    /// Diagnostics reported while parsing the document
    pub fn parse_errors(&self) -> &[EdmError] {
        &self.parse_errors
    }

    /// Diagnostics found while linking the model
    pub fn semantic_errors(&self) -> &[EdmError] {
        &self.semantic_errors
    }

    /// Whether the model has no diagnostics at all
    pub fn is_valid(&self) -> bool {
        self.parse_errors.is_empty() && self.semantic_errors.is_empty()
    }

    /// Names of the declared types, qualified
    pub fn type_names(&self) -> Vec<String> {
        self.types.iter().map(|t| t.qualified_name()).collect()
    }

    /// Name of every container, in declaration order
    pub fn container_names(&self) -> Vec<&str> {
        self.containers.iter().map(|c| c.name()).collect()
    }
}

//! Linking a CSDL schema into an EDM model
//!
//! Runs after a successful parse. Names are alias-normalized and resolved
//! against the schema's own declarations and the core `Edm` namespace.
//! Nothing here fails: anything that does not resolve becomes a sentinel
//! whose errors are appended to the model's semantic diagnostics.

use super::ast::*;
use super::readers::is_valid_enum_member_path;
use crate::edm::{
    BadCollectionType, BadEntityContainer, BadEnumMember, BadProperty, BadType, BindingRegistry,
    ContainerId, EdmAssociationSet, EdmCheckable, EdmCoreModel, EdmEntityContainer, EdmEntitySet,
    EdmEnumMember, EdmEnumType, EdmFacets, EdmModel, EdmNavigationBinding, EdmNavigationProperty,
    EdmOperation, EdmOperationImport, EdmOperationParameter, EdmPrimitiveTypeKind, EdmProperty,
    EdmSingleton, EdmStructuralProperty, EdmStructuredType, EdmType, EdmTypeDefinition,
    EdmTypeKind, EdmTypeReference, EnumMemberInfo, ExtendsTarget, HasTypeKind, SchemaType,
    SchemaTypeId, SchemaTypeRef, EDM_NAMESPACE,
};
use crate::error::{EdmError, EdmErrorCode};
use crate::locations::Location;
use crate::messages;
use crate::names::{qualify, split_qualified_name};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Build the EDM model for `schema`
///
/// `parse_errors` are the diagnostics of the parse that produced the schema;
/// they stay in front of the semantic diagnostics in [`EdmModel::errors`].
pub fn build_model(schema: CsdlSchema, parse_errors: Vec<EdmError>) -> EdmModel {
    let (types, operations, containers, container_bindings, type_bindings, semantic_errors) = {
        let mut builder = ModelBuilder::new(&schema);
        builder.declare_types();
        let types = builder.build_types();
        let operations = builder.build_operations();
        let (containers, container_bindings) = builder.build_containers();
        (
            types,
            operations,
            containers,
            container_bindings,
            builder.type_bindings,
            builder.errors,
        )
    };

    debug!(
        namespace = %schema.namespace,
        types = types.len(),
        operations = operations.len(),
        containers = containers.len(),
        errors = semantic_errors.len(),
        "built EDM model"
    );

    EdmModel {
        namespace: schema.namespace,
        alias: schema.alias,
        version: schema.version,
        types,
        type_bindings,
        operations,
        containers,
        container_bindings,
        annotations: schema.annotations,
        parse_errors,
        semantic_errors,
    }
}

struct ModelBuilder<'s> {
    schema: &'s CsdlSchema,
    aliases: HashMap<&'s str, &'s str>,
    type_index: HashMap<String, SchemaTypeRef>,
    type_bindings: BindingRegistry<SchemaTypeId>,
    errors: Vec<EdmError>,
}

impl<'s> ModelBuilder<'s> {
    fn new(schema: &'s CsdlSchema) -> Self {
        let mut aliases = HashMap::new();
        if let Some(alias) = &schema.alias {
            aliases.insert(alias.as_str(), schema.namespace.as_str());
        }
        for using in &schema.usings {
            if let Some(alias) = &using.alias {
                aliases.insert(alias.as_str(), using.namespace.as_str());
            }
        }
        Self {
            schema,
            aliases,
            type_index: HashMap::new(),
            type_bindings: BindingRegistry::new(),
            errors: Vec::new(),
        }
    }

    fn normalize(&self, name: &str) -> String {
        match split_qualified_name(name) {
            (Some(prefix), local) => match self.aliases.get(prefix) {
                Some(namespace) => qualify(namespace, local),
                None => name.to_string(),
            },
            (None, _) => name.to_string(),
        }
    }

    fn qualified(&self, name: &str) -> String {
        qualify(&self.schema.namespace, name)
    }

    fn record(&mut self, errors: Vec<EdmError>) {
        for error in errors {
            debug!(code = %error.code, location = %error.location, "{}", error.message);
            self.errors.push(error);
        }
    }

    fn bad_type(&mut self, bad: BadType) -> EdmTypeReference {
        self.record(bad.errors());
        EdmTypeReference::bad(bad)
    }

    // Types

    fn declare_types(&mut self) {
        let schema = self.schema;
        let declared = schema
            .entity_types
            .iter()
            .map(|t| (&t.name, EdmTypeKind::Entity, &t.location))
            .chain(
                schema
                    .complex_types
                    .iter()
                    .map(|t| (&t.name, EdmTypeKind::Complex, &t.location)),
            )
            .chain(
                schema
                    .enum_types
                    .iter()
                    .map(|t| (&t.name, EdmTypeKind::Enum, &t.location)),
            )
            .chain(
                schema
                    .type_definitions
                    .iter()
                    .map(|t| (&t.name, EdmTypeKind::TypeDefinition, &t.location)),
            );

        for (index, (name, kind, location)) in declared.enumerate() {
            let qualified = self.qualified(name);
            let reference = SchemaTypeRef {
                id: SchemaTypeId(index),
                kind,
            };
            if let Some(error) =
                self.type_bindings
                    .insert(qualified.clone(), &qualified, reference.id, location)
            {
                self.record(vec![error]);
            }
            self.type_index.entry(qualified).or_insert(reference);
        }
    }

    fn build_types(&mut self) -> Vec<SchemaType> {
        let schema = self.schema;
        let mut types = Vec::new();
        for entity_type in &schema.entity_types {
            types.push(SchemaType::Structured(self.build_entity_type(entity_type)));
        }
        for complex_type in &schema.complex_types {
            types.push(SchemaType::Structured(self.build_complex_type(complex_type)));
        }
        for enum_type in &schema.enum_types {
            types.push(SchemaType::Enum(self.build_enum_type(enum_type)));
        }
        for definition in &schema.type_definitions {
            types.push(SchemaType::Definition(self.build_type_definition(definition)));
        }
        types
    }

    fn build_entity_type(&mut self, entity_type: &CsdlEntityType) -> EdmStructuredType {
        let qualified = self.qualified(&entity_type.name);
        let base_type = entity_type
            .base_type
            .as_ref()
            .map(|base| self.resolve_base_type(base, EdmTypeKind::Entity, &entity_type.location));
        let properties = self.build_properties(
            &qualified,
            &entity_type.properties,
            &entity_type.navigation_properties,
        );
        EdmStructuredType {
            kind: EdmTypeKind::Entity,
            name: entity_type.name.clone(),
            namespace: self.schema.namespace.clone(),
            base_type,
            is_abstract: entity_type.is_abstract,
            is_open: entity_type.is_open,
            has_stream: entity_type.has_stream,
            key: entity_type.key.clone(),
            properties,
            location: entity_type.location.clone(),
        }
    }

    fn build_complex_type(&mut self, complex_type: &CsdlComplexType) -> EdmStructuredType {
        let qualified = self.qualified(&complex_type.name);
        let base_type = complex_type
            .base_type
            .as_ref()
            .map(|base| self.resolve_base_type(base, EdmTypeKind::Complex, &complex_type.location));
        let properties = self.build_properties(
            &qualified,
            &complex_type.properties,
            &complex_type.navigation_properties,
        );
        EdmStructuredType {
            kind: EdmTypeKind::Complex,
            name: complex_type.name.clone(),
            namespace: self.schema.namespace.clone(),
            base_type,
            is_abstract: complex_type.is_abstract,
            is_open: complex_type.is_open,
            has_stream: false,
            key: Vec::new(),
            properties,
            location: complex_type.location.clone(),
        }
    }

    fn resolve_base_type(
        &mut self,
        name: &str,
        kind: EdmTypeKind,
        location: &Location,
    ) -> EdmTypeReference {
        match self.type_index.get(&self.normalize(name)).copied() {
            Some(reference) if reference.kind == kind => {
                EdmTypeReference::new(EdmType::Schema(reference), false)
            }
            _ => self.bad_type(BadType::unresolved(name, location)),
        }
    }

    fn build_properties(
        &mut self,
        declaring_type: &str,
        properties: &[CsdlProperty],
        navigation_properties: &[CsdlNavigationProperty],
    ) -> Vec<EdmProperty> {
        let mut seen = HashSet::new();
        let mut built = Vec::with_capacity(properties.len() + navigation_properties.len());
        for property in properties {
            if seen.insert(property.name.as_str()) {
                built.push(EdmProperty::Structural(self.build_structural_property(property)));
            } else {
                built.push(self.already_defined(
                    &property.name,
                    declaring_type,
                    &property.location,
                ));
            }
        }
        for navigation in navigation_properties {
            if seen.insert(navigation.name.as_str()) {
                built.push(self.build_navigation_property(navigation, declaring_type));
            } else {
                built.push(self.already_defined(
                    &navigation.name,
                    declaring_type,
                    &navigation.location,
                ));
            }
        }
        built
    }

    fn already_defined(
        &mut self,
        name: &str,
        declaring_type: &str,
        location: &Location,
    ) -> EdmProperty {
        let bad = BadProperty::already_defined(name, declaring_type, location);
        self.record(bad.errors());
        EdmProperty::Bad(Arc::new(bad))
    }

    fn build_structural_property(&mut self, property: &CsdlProperty) -> EdmStructuralProperty {
        let type_ref = self.resolve_type(&property.type_ref);
        if let Some(default) = &property.default_value {
            if type_ref.type_kind() == EdmTypeKind::Enum
                && default.contains('/')
                && !is_valid_enum_member_path(default)
            {
                self.record(vec![EdmError::new(
                    property.location.clone(),
                    EdmErrorCode::InvalidEnumMemberPath,
                    messages::invalid_enum_member_path(default),
                )]);
            }
        }
        EdmStructuralProperty {
            name: property.name.clone(),
            type_ref,
            default_value: property.default_value.clone(),
            concurrency_mode: property.concurrency_mode,
            location: property.location.clone(),
        }
    }

    fn build_navigation_property(
        &mut self,
        navigation: &CsdlNavigationProperty,
        declaring_type: &str,
    ) -> EdmProperty {
        match &navigation.target {
            CsdlNavigationTarget::Association {
                relationship,
                to_role,
                from_role,
            } => self.build_association_navigation(
                navigation,
                declaring_type,
                relationship,
                to_role,
                from_role,
            ),
            CsdlNavigationTarget::Typed {
                type_ref,
                partner,
                contains_target,
                on_delete,
                constraints,
            } => EdmProperty::Navigation(EdmNavigationProperty {
                name: navigation.name.clone(),
                type_ref: self.resolve_type(type_ref),
                partner: partner.clone(),
                contains_target: *contains_target,
                on_delete: *on_delete,
                constraints: constraints
                    .iter()
                    .map(|c| (c.property.clone(), c.referenced_property.clone()))
                    .collect(),
                location: navigation.location.clone(),
            }),
        }
    }

    fn build_association_navigation(
        &mut self,
        navigation: &CsdlNavigationProperty,
        declaring_type: &str,
        relationship: &str,
        to_role: &str,
        from_role: &str,
    ) -> EdmProperty {
        let schema = self.schema;
        let association_name = self.normalize(relationship);
        let association = schema
            .associations
            .iter()
            .find(|a| self.qualified(&a.name) == association_name);
        let ends = association.map(|a| {
            let end = move |role: &str| a.ends.iter().find(|e| e.role == role);
            (end(to_role), end(from_role))
        });

        let (association, to_end, from_end) = match (association, ends) {
            (Some(association), Some((Some(to_end), Some(from_end)))) => {
                (association, to_end, from_end)
            }
            (_, ends) => {
                let missing_role = match ends {
                    Some((Some(_), None)) => from_role,
                    _ => to_role,
                };
                let bad = BadProperty::unresolved_navigation(
                    &navigation.name,
                    declaring_type,
                    relationship,
                    missing_role,
                    &navigation.location,
                );
                self.record(bad.errors());
                return EdmProperty::Bad(Arc::new(bad));
            }
        };

        let target =
            CsdlTypeReference::named(to_end.type_name.clone(), navigation.location.clone());
        let mut element = self.resolve_type(&target);
        let type_ref = match to_end.multiplicity {
            Multiplicity::Many => {
                element.nullable = false;
                self.wrap_collection(element, &to_end.type_name, false)
            }
            Multiplicity::ZeroOrOne => {
                element.nullable = true;
                element
            }
            Multiplicity::One => {
                element.nullable = false;
                element
            }
        };

        let constraints: Vec<(String, String)> = association
            .referential_constraint
            .as_ref()
            .filter(|c| c.dependent.role == from_role)
            .map(|c| {
                c.dependent
                    .properties
                    .iter()
                    .cloned()
                    .zip(c.principal.properties.iter().cloned())
                    .collect()
            })
            .unwrap_or_default();

        let partner = schema
            .entity_types
            .iter()
            .flat_map(|t| &t.navigation_properties)
            .find(|other| match &other.target {
                CsdlNavigationTarget::Association {
                    relationship: other_relationship,
                    to_role: other_to,
                    from_role: other_from,
                } => {
                    other_from == to_role
                        && other_to == from_role
                        && self.normalize(other_relationship) == association_name
                }
                CsdlNavigationTarget::Typed { .. } => false,
            })
            .map(|other| other.name.clone());

        EdmProperty::Navigation(EdmNavigationProperty {
            name: navigation.name.clone(),
            type_ref,
            partner,
            contains_target: false,
            on_delete: from_end.on_delete,
            constraints,
            location: navigation.location.clone(),
        })
    }

    fn build_enum_type(&mut self, enum_type: &CsdlEnumType) -> EdmEnumType {
        let qualified = self.qualified(&enum_type.name);
        let underlying_type = self.enum_underlying_type(enum_type, &qualified);
        let (min, max) = underlying_type
            .integral_range()
            .unwrap_or((i32::MIN as i64, i32::MAX as i64));

        let mut seen = HashSet::new();
        // None once an implicit value would pass i64::MAX
        let mut next = Some(0i64);
        let mut members = Vec::with_capacity(enum_type.members.len());
        for member in &enum_type.members {
            let value = member.value.or(next);
            next = value.and_then(|v| v.checked_add(1));

            let built = if !seen.insert(member.name.as_str()) {
                let error = EdmError::new(
                    member.location.clone(),
                    EdmErrorCode::AlreadyDefined,
                    messages::already_defined(&member.name, &qualified),
                );
                EdmEnumMember::Bad(Arc::new(BadEnumMember::new(
                    member.name.clone(),
                    vec![error],
                    member.location.clone(),
                )))
            } else if let Some(value) = value.filter(|v| (min..=max).contains(v)) {
                EdmEnumMember::Valid(EnumMemberInfo {
                    name: member.name.clone(),
                    value,
                    location: member.location.clone(),
                })
            } else {
                EdmEnumMember::Bad(Arc::new(BadEnumMember::out_of_range(
                    &member.name,
                    &underlying_type.qualified_name(),
                    &member.location,
                )))
            };
            self.record(built.errors());
            members.push(built);
        }

        EdmEnumType {
            name: enum_type.name.clone(),
            namespace: self.schema.namespace.clone(),
            underlying_type,
            is_flags: enum_type.is_flags,
            members,
            location: enum_type.location.clone(),
        }
    }

    fn enum_underlying_type(
        &mut self,
        enum_type: &CsdlEnumType,
        qualified: &str,
    ) -> EdmPrimitiveTypeKind {
        let Some(name) = &enum_type.underlying_type else {
            return EdmPrimitiveTypeKind::Int32;
        };
        let kind = EdmCoreModel::instance().primitive_kind(&self.normalize(name));
        match kind {
            Some(kind) if kind.integral_range().is_some() => kind,
            _ => {
                self.record(vec![EdmError::new(
                    enum_type.location.clone(),
                    EdmErrorCode::InvalidEnumUnderlyingType,
                    messages::invalid_enum_underlying_type(qualified, name),
                )]);
                EdmPrimitiveTypeKind::Int32
            }
        }
    }

    fn build_type_definition(&mut self, definition: &CsdlTypeDefinition) -> EdmTypeDefinition {
        let underlying_type = self.resolve_named(
            &definition.underlying_type,
            true,
            &definition.facets,
            &definition.location,
        );
        EdmTypeDefinition {
            name: definition.name.clone(),
            namespace: self.schema.namespace.clone(),
            underlying_type,
            location: definition.location.clone(),
        }
    }

    // Type references

    fn resolve_type(&mut self, reference: &CsdlTypeReference) -> EdmTypeReference {
        match &reference.kind {
            CsdlTypeKind::Named(name) => self.resolve_named(
                name,
                reference.nullable,
                &reference.facets,
                &reference.location,
            ),
            CsdlTypeKind::Collection(element) => {
                // Facets written on a `Collection(T)` attribute describe the element
                let element_ref = if element.facets == CsdlFacets::default() {
                    let mut inherited = (**element).clone();
                    inherited.facets = reference.facets.clone();
                    self.resolve_type(&inherited)
                } else {
                    self.resolve_type(element)
                };
                self.wrap_collection(element_ref, &element.display_name(), reference.nullable)
            }
            CsdlTypeKind::EntityReference(name) => {
                match self.type_index.get(&self.normalize(name)).copied() {
                    Some(target) if target.kind == EdmTypeKind::Entity => EdmTypeReference::new(
                        EdmType::EntityReference(target),
                        reference.nullable,
                    ),
                    _ => self.bad_type(BadType::unresolved(name, &reference.location)),
                }
            }
        }
    }

    // Errors of a bad element were recorded when it was resolved
    fn wrap_collection(
        &mut self,
        element: EdmTypeReference,
        element_name: &str,
        nullable: bool,
    ) -> EdmTypeReference {
        if element.is_bad() {
            let bad = BadCollectionType::new(element_name, element.errors());
            EdmTypeReference::new(EdmType::BadCollection(Arc::new(bad)), nullable)
        } else {
            EdmTypeReference::new(EdmType::Collection(Box::new(element)), nullable)
        }
    }

    fn resolve_named(
        &mut self,
        name: &str,
        nullable: bool,
        facets: &CsdlFacets,
        location: &Location,
    ) -> EdmTypeReference {
        let normalized = self.normalize(name);
        if let Some(kind) = EdmCoreModel::instance().primitive_kind(&normalized) {
            if facets.srid.is_some() && !kind.is_spatial() {
                return self.bad_type(BadType::spatial(name, location));
            }
            let mut reference = EdmTypeReference::new(EdmType::Primitive(kind), nullable);
            reference.facets = EdmFacets {
                max_length: facets.max_length,
                fixed_length: facets.fixed_length,
                unicode: facets.unicode,
                precision: facets.precision,
                scale: facets.scale.flatten(),
                srid: facets.srid.unwrap_or_else(|| kind.default_srid()),
            };
            return reference;
        }
        if split_qualified_name(&normalized).0 == Some(EDM_NAMESPACE) {
            return self.bad_type(BadType::unresolved_primitive(name, location));
        }
        match self.type_index.get(&normalized).copied() {
            Some(reference) => EdmTypeReference::new(EdmType::Schema(reference), nullable),
            None => self.bad_type(BadType::unresolved(name, location)),
        }
    }

    fn resolve_entity_type(&mut self, name: &str, location: &Location) -> EdmTypeReference {
        match self.type_index.get(&self.normalize(name)).copied() {
            Some(reference) if reference.kind == EdmTypeKind::Entity => {
                EdmTypeReference::new(EdmType::Schema(reference), false)
            }
            _ => self.bad_type(BadType::unresolved(name, location)),
        }
    }

    // Operations

    fn build_parameters(&mut self, parameters: &[CsdlParameter]) -> Vec<EdmOperationParameter> {
        parameters
            .iter()
            .map(|parameter| EdmOperationParameter {
                name: parameter.name.clone(),
                type_ref: self.resolve_type(&parameter.type_ref),
                mode: parameter.mode,
            })
            .collect()
    }

    fn build_operations(&mut self) -> BindingRegistry<Arc<EdmOperation>> {
        let schema = self.schema;
        let mut registry = BindingRegistry::new();
        for operation in &schema.operations {
            let qualified = self.qualified(&operation.name);
            let parameters = self.build_parameters(&operation.parameters);
            let return_type = operation
                .return_type
                .as_ref()
                .map(|reference| self.resolve_type(reference));
            let built = EdmOperation {
                kind: operation.kind,
                name: operation.name.clone(),
                namespace: schema.namespace.clone(),
                parameters,
                return_type,
                is_bound: operation.is_bound,
                is_composable: operation.is_composable,
                entity_set_path: operation.entity_set_path.clone(),
                defining_expression: operation.defining_expression.clone(),
                location: operation.location.clone(),
            };
            if let Some(error) =
                registry.insert(qualified.clone(), &qualified, Arc::new(built), &operation.location)
            {
                self.record(vec![error]);
            }
        }
        registry
    }

    // Containers

    fn build_containers(&mut self) -> (Vec<EdmEntityContainer>, BindingRegistry<ContainerId>) {
        let schema = self.schema;
        let mut bindings = BindingRegistry::new();
        for (index, container) in schema.entity_containers.iter().enumerate() {
            let qualified = self.qualified(&container.name);
            if let Some(error) = bindings.insert(
                qualified.clone(),
                &qualified,
                ContainerId(index),
                &container.location,
            ) {
                self.record(vec![error]);
            }
        }

        let mut containers: Vec<EdmEntityContainer> = schema
            .entity_containers
            .iter()
            .map(|container| self.build_container(container))
            .collect();

        let resolved: Vec<Option<ExtendsTarget>> = schema
            .entity_containers
            .iter()
            .map(|container| {
                container
                    .extends
                    .as_ref()
                    .map(|name| self.resolve_extends(name, &container.location, &bindings))
            })
            .collect();

        let in_cycle: Vec<bool> = {
            let next = |index: usize| match &resolved[index] {
                Some(ExtendsTarget::Container(id)) => Some(id.index()),
                _ => None,
            };
            (0..resolved.len())
                .map(|start| {
                    let mut current = next(start);
                    for _ in 0..resolved.len() {
                        match current {
                            Some(index) if index == start => return true,
                            Some(index) => current = next(index),
                            None => return false,
                        }
                    }
                    false
                })
                .collect()
        };

        for (index, target) in resolved.into_iter().enumerate() {
            let target = if in_cycle[index] {
                let source = &schema.entity_containers[index];
                let bad =
                    BadEntityContainer::cyclic(&self.qualified(&source.name), &source.location);
                self.record(bad.errors());
                Some(ExtendsTarget::Bad(Arc::new(bad)))
            } else {
                target
            };
            containers[index].extends = target;
        }

        (containers, bindings)
    }

    fn resolve_extends(
        &mut self,
        name: &str,
        location: &Location,
        bindings: &BindingRegistry<ContainerId>,
    ) -> ExtendsTarget {
        let binding = bindings
            .get(&self.normalize(name))
            .or_else(|| bindings.get(&self.qualified(name)));
        match binding {
            Some(binding) => ExtendsTarget::Container(*binding.first()),
            None => {
                let bad = BadEntityContainer::unresolved(name, location);
                self.record(bad.errors());
                ExtendsTarget::Bad(Arc::new(bad))
            }
        }
    }

    fn build_container(&mut self, container: &CsdlEntityContainer) -> EdmEntityContainer {
        let mut entity_sets = BindingRegistry::new();
        for set in &container.entity_sets {
            let built = EdmEntitySet {
                name: set.name.clone(),
                entity_type: self.resolve_entity_type(&set.entity_type, &set.location),
                navigation_bindings: navigation_bindings(&set.navigation_bindings),
                location: set.location.clone(),
            };
            if let Some(error) =
                entity_sets.insert(set.name.clone(), &set.name, built, &set.location)
            {
                self.record(vec![error]);
            }
        }

        let mut singletons = BindingRegistry::new();
        for singleton in &container.singletons {
            let built = EdmSingleton {
                name: singleton.name.clone(),
                entity_type: self.resolve_entity_type(&singleton.type_name, &singleton.location),
                navigation_bindings: navigation_bindings(&singleton.navigation_bindings),
                location: singleton.location.clone(),
            };
            if let Some(error) = singletons.insert(
                singleton.name.clone(),
                &singleton.name,
                built,
                &singleton.location,
            ) {
                self.record(vec![error]);
            }
        }

        let mut operation_imports = BindingRegistry::new();
        for import in &container.operation_imports {
            let return_type = import
                .return_type
                .as_ref()
                .map(|reference| self.resolve_type(reference));
            let built = EdmOperationImport {
                kind: import.kind,
                name: import.name.clone(),
                operation: import.operation.as_ref().map(|name| self.normalize(name)),
                entity_set: import.entity_set.clone(),
                return_type,
                parameters: self.build_parameters(&import.parameters),
                location: import.location.clone(),
            };
            if let Some(error) =
                operation_imports.insert(import.name.clone(), &import.name, built, &import.location)
            {
                self.record(vec![error]);
            }
        }

        let mut association_sets = BindingRegistry::new();
        for set in &container.association_sets {
            let built = EdmAssociationSet {
                name: set.name.clone(),
                association: self.normalize(&set.association),
                ends: set
                    .ends
                    .iter()
                    .map(|end| (end.role.clone(), end.entity_set.clone()))
                    .collect(),
            };
            if let Some(error) =
                association_sets.insert(set.name.clone(), &set.name, built, &set.location)
            {
                self.record(vec![error]);
            }
        }

        EdmEntityContainer {
            name: container.name.clone(),
            namespace: self.schema.namespace.clone(),
            extends: None,
            entity_sets,
            singletons,
            operation_imports,
            association_sets,
            location: container.location.clone(),
        }
    }
}

fn navigation_bindings(bindings: &[CsdlNavigationPropertyBinding]) -> Vec<EdmNavigationBinding> {
    bindings
        .iter()
        .map(|binding| EdmNavigationBinding {
            path: binding.path.clone(),
            target: binding.target.clone(),
        })
        .collect()
}

//! The CSDL grammar
//!
//! One [`ParserRegistry`] holds the productions of every supported
//! version. Versions 1.0 to 3.0 share one `Schema` root and 4.0 has its
//! own; leaf productions that never changed between versions are shared
//! by both roots. Finalizers that behave differently per version ask the
//! parse context which version is being read.

use super::ast::*;
use super::context::CsdlParseContext;
use super::item::{CsdlChildren, CsdlItem};
use super::readers::ElementReader;
use crate::error::EdmErrorCode;
use crate::messages;
use crate::namespaces::{is_csdl_namespace, Version, CSDL_NAMESPACE_VERSIONS};
use crate::xml::{DocumentGrammar, ParserId, ParserRegistry, XmlElementInfo, XmlElementValues};
use once_cell::sync::Lazy;

/// Name of the root element in every version
pub const SCHEMA_ELEMENT: &str = "Schema";

type Children = XmlElementValues<CsdlItem>;

static GRAMMAR: Lazy<CsdlGrammar> = Lazy::new(CsdlGrammar::build);

/// The CSDL productions for all supported versions
#[derive(Debug)]
pub struct CsdlGrammar {
    registry: ParserRegistry<CsdlItem, CsdlParseContext>,
    legacy_schema: ParserId,
    schema: ParserId,
}

impl CsdlGrammar {
    /// The process-wide grammar
    pub fn instance() -> &'static CsdlGrammar {
        &GRAMMAR
    }

    /// Root parser for versions 1.0 to 3.0
    pub fn legacy_schema(&self) -> ParserId {
        self.legacy_schema
    }

    /// Root parser for version 4.0
    pub fn schema(&self) -> ParserId {
        self.schema
    }

    fn build() -> Self {
        let mut registry = ParserRegistry::new();

        // Shared leaves
        let summary = registry.add_parser("Summary", finish_text);
        let long_description = registry.add_parser("LongDescription", finish_text);
        let documentation = registry.add_parser("Documentation", finish_documentation);
        registry.add_child_parsers(documentation, &[summary, long_description]);
        let property_ref = registry.add_parser("PropertyRef", finish_property_ref);
        let key = registry.add_parser("Key", finish_key);
        registry.add_child_parser(key, property_ref);
        let member = registry.add_parser("Member", finish_member);
        let on_delete = registry.add_parser("OnDelete", finish_on_delete);

        let legacy_schema = build_legacy(
            &mut registry,
            documentation,
            property_ref,
            key,
            member,
            on_delete,
        );
        let schema = build_v4(&mut registry, key, member, on_delete);

        tracing::debug!(parsers = registry.len(), "built CSDL grammar");
        Self {
            registry,
            legacy_schema,
            schema,
        }
    }
}

fn build_legacy(
    registry: &mut ParserRegistry<CsdlItem, CsdlParseContext>,
    documentation: ParserId,
    property_ref: ParserId,
    key: ParserId,
    member: ParserId,
    on_delete: ParserId,
) -> ParserId {
    let schema = registry.add_parser(SCHEMA_ELEMENT, finish_schema);
    let using = registry.add_parser("Using", finish_using);

    let property = registry.add_parser("Property", finish_property);
    let navigation = registry.add_parser("NavigationProperty", finish_navigation_property);
    let entity_type = registry.add_parser("EntityType", finish_entity_type);
    let complex_type = registry.add_parser("ComplexType", finish_complex_type);
    let enum_type = registry.add_parser("EnumType", finish_enum_type);
    registry.add_child_parser(property, documentation);
    registry.add_child_parser(navigation, documentation);
    registry.add_child_parsers(entity_type, &[key, property, navigation, documentation]);
    registry.add_child_parsers(complex_type, &[property, documentation]);
    registry.add_child_parsers(enum_type, &[member, documentation]);

    let association = registry.add_parser("Association", finish_association);
    let end = registry.add_parser("End", finish_association_end);
    let constraint = registry.add_parser("ReferentialConstraint", finish_referential_constraint);
    let principal = registry.add_parser("Principal", finish_constraint_role);
    let dependent = registry.add_parser("Dependent", finish_constraint_role);
    registry.add_child_parsers(end, &[on_delete, documentation]);
    registry.add_child_parser(principal, property_ref);
    registry.add_child_parser(dependent, property_ref);
    registry.add_child_parsers(constraint, &[principal, dependent]);
    registry.add_child_parsers(association, &[end, constraint, documentation]);

    // CollectionType nests itself and the other type elements.
    let collection_type = registry.add_parser("CollectionType", finish_collection_type);
    let reference_type = registry.add_parser("ReferenceType", finish_reference_type);
    let type_ref = registry.add_parser("TypeRef", finish_type_ref);
    let type_elements = [collection_type, reference_type, type_ref];
    registry.add_child_parsers(collection_type, &type_elements);

    let parameter = registry.add_parser("Parameter", finish_parameter);
    let return_type = registry.add_parser("ReturnType", finish_return_type);
    let defining_expression = registry.add_parser("DefiningExpression", finish_text);
    let function = registry.add_parser("Function", finish_function);
    registry.add_child_parsers(parameter, &type_elements);
    registry.add_child_parser(parameter, documentation);
    registry.add_child_parsers(return_type, &type_elements);
    registry.add_child_parsers(
        function,
        &[parameter, return_type, defining_expression, documentation],
    );

    let container = registry.add_parser("EntityContainer", finish_entity_container);
    let entity_set = registry.add_parser("EntitySet", finish_entity_set);
    let function_import = registry.add_parser("FunctionImport", finish_function_import);
    let association_set = registry.add_parser("AssociationSet", finish_association_set);
    let set_end = registry.add_parser("End", finish_association_set_end);
    registry.add_child_parser(entity_set, documentation);
    registry.add_child_parsers(function_import, &[parameter, documentation]);
    registry.add_child_parsers(association_set, &[set_end, documentation]);
    registry.add_child_parser(set_end, documentation);
    registry.add_child_parsers(
        container,
        &[entity_set, function_import, association_set, documentation],
    );

    registry.add_child_parsers(
        schema,
        &[
            using,
            entity_type,
            complex_type,
            enum_type,
            association,
            function,
            container,
            documentation,
        ],
    );
    schema
}

fn build_v4(
    registry: &mut ParserRegistry<CsdlItem, CsdlParseContext>,
    key: ParserId,
    member: ParserId,
    on_delete: ParserId,
) -> ParserId {
    let schema = registry.add_parser(SCHEMA_ELEMENT, finish_schema);

    let property = registry.add_parser("Property", finish_property);
    let constraint = registry.add_parser("ReferentialConstraint", finish_property_constraint);
    let navigation = registry.add_parser("NavigationProperty", finish_navigation_property);
    registry.add_child_parsers(navigation, &[on_delete, constraint]);
    let entity_type = registry.add_parser("EntityType", finish_entity_type);
    let complex_type = registry.add_parser("ComplexType", finish_complex_type);
    let enum_type = registry.add_parser("EnumType", finish_enum_type);
    let type_definition = registry.add_parser("TypeDefinition", finish_type_definition);
    registry.add_child_parsers(entity_type, &[key, property, navigation]);
    registry.add_child_parsers(complex_type, &[property, navigation]);
    registry.add_child_parser(enum_type, member);

    let parameter = registry.add_parser("Parameter", finish_parameter);
    let return_type = registry.add_parser("ReturnType", finish_return_type);
    let function = registry.add_parser("Function", finish_function);
    let action = registry.add_parser("Action", finish_action);
    registry.add_child_parsers(function, &[parameter, return_type]);
    registry.add_child_parsers(action, &[parameter, return_type]);

    let container = registry.add_parser("EntityContainer", finish_entity_container);
    let entity_set = registry.add_parser("EntitySet", finish_entity_set);
    let binding = registry.add_parser("NavigationPropertyBinding", finish_navigation_binding);
    let singleton = registry.add_parser("Singleton", finish_singleton);
    let function_import = registry.add_parser("FunctionImport", finish_function_import);
    let action_import = registry.add_parser("ActionImport", finish_action_import);
    registry.add_child_parser(entity_set, binding);
    registry.add_child_parser(singleton, binding);
    registry.add_child_parsers(container, &[entity_set, singleton, function_import, action_import]);

    registry.add_child_parsers(
        schema,
        &[entity_type, complex_type, enum_type, type_definition, function, action, container],
    );
    schema
}

impl DocumentGrammar for CsdlGrammar {
    type Value = CsdlItem;
    type Context = CsdlParseContext;

    fn namespace_versions(&self) -> &[(&'static str, Version)] {
        CSDL_NAMESPACE_VERSIONS
    }

    fn registry(&self) -> &ParserRegistry<CsdlItem, CsdlParseContext> {
        &self.registry
    }

    fn root_parser(&self, version: Version, name: &str) -> Option<ParserId> {
        if name != SCHEMA_ELEMENT {
            return None;
        }
        Some(if version >= Version::V4 {
            self.schema
        } else {
            self.legacy_schema
        })
    }

    fn root_element_name(&self) -> &str {
        SCHEMA_ELEMENT
    }

    fn is_owned_namespace(&self, namespace: &str) -> bool {
        is_csdl_namespace(namespace)
    }
}

// Finalizers

fn finish_schema(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    let namespace = reader.required_qualified_name("Namespace");
    let alias = reader.optional_name("Alias");
    let mut operations = children.all("Function", CsdlItem::into_operation);
    operations.extend(children.all("Action", CsdlItem::into_operation));
    Some(CsdlItem::Schema(Box::new(CsdlSchema {
        version: reader.version(),
        namespace,
        alias,
        usings: children.all("Using", CsdlItem::into_using),
        entity_types: children.all("EntityType", CsdlItem::into_entity_type),
        complex_types: children.all("ComplexType", CsdlItem::into_complex_type),
        enum_types: children.all("EnumType", CsdlItem::into_enum_type),
        type_definitions: children.all("TypeDefinition", CsdlItem::into_type_definition),
        associations: children.all("Association", CsdlItem::into_association),
        operations,
        entity_containers: children.all("EntityContainer", CsdlItem::into_entity_container),
        documentation: children.first("Documentation", CsdlItem::into_documentation),
        annotations: reader.take_annotations(),
        location: reader.location(),
    })))
}

fn finish_text(
    _: &mut CsdlParseContext,
    _: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    Some(CsdlItem::Text(children.take_all_text().unwrap_or_default()))
}

fn finish_documentation(
    _: &mut CsdlParseContext,
    _: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    Some(CsdlItem::Documentation(CsdlDocumentation {
        summary: children.first("Summary", CsdlItem::into_text),
        long_description: children.first("LongDescription", CsdlItem::into_text),
    }))
}

fn finish_using(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    _: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    Some(CsdlItem::Using(CsdlUsing {
        namespace: reader.required_qualified_name("Namespace"),
        alias: Some(reader.required_name("Alias")),
        location: reader.location(),
    }))
}

fn finish_property_ref(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    _: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    Some(CsdlItem::PropertyRef(reader.required_string("Name")))
}

fn finish_key(
    _: &mut CsdlParseContext,
    _: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    Some(CsdlItem::Key(children.all("PropertyRef", CsdlItem::into_property_ref)))
}

fn finish_entity_type(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    Some(CsdlItem::EntityType(CsdlEntityType {
        name: reader.required_name("Name"),
        base_type: reader.optional_qualified_name("BaseType"),
        is_abstract: reader.bool_or("Abstract", false),
        is_open: reader.bool_or("OpenType", false),
        has_stream: reader.bool_or("HasStream", false),
        key: children.first("Key", CsdlItem::into_key).unwrap_or_default(),
        properties: children.all("Property", CsdlItem::into_property),
        navigation_properties: children.all(
            "NavigationProperty",
            CsdlItem::into_navigation_property,
        ),
        documentation: children.first("Documentation", CsdlItem::into_documentation),
        annotations: reader.take_annotations(),
        location: reader.location(),
    }))
}

fn finish_complex_type(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    Some(CsdlItem::ComplexType(CsdlComplexType {
        name: reader.required_name("Name"),
        base_type: reader.optional_qualified_name("BaseType"),
        is_abstract: reader.bool_or("Abstract", false),
        is_open: reader.bool_or("OpenType", false),
        properties: children.all("Property", CsdlItem::into_property),
        navigation_properties: children.all(
            "NavigationProperty",
            CsdlItem::into_navigation_property,
        ),
        documentation: children.first("Documentation", CsdlItem::into_documentation),
        annotations: reader.take_annotations(),
        location: reader.location(),
    }))
}

fn finish_property(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    let name = reader.required_name("Name");
    let kind = reader.required_type("Type");
    Some(CsdlItem::Property(CsdlProperty {
        name,
        type_ref: reader.type_reference(kind),
        default_value: reader.optional_string("DefaultValue"),
        concurrency_mode: reader.concurrency_mode("ConcurrencyMode"),
        documentation: children.first("Documentation", CsdlItem::into_documentation),
        annotations: reader.take_annotations(),
        location: reader.location(),
    }))
}

fn finish_navigation_property(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    let name = reader.required_name("Name");
    let target = if reader.is_v4() {
        let kind = reader.required_type("Type");
        let nullable = reader.bool_or("Nullable", true);
        CsdlNavigationTarget::Typed {
            type_ref: CsdlTypeReference {
                kind,
                nullable,
                facets: CsdlFacets::default(),
                location: reader.location(),
            },
            partner: reader.optional_string("Partner"),
            contains_target: reader.bool_or("ContainsTarget", false),
            on_delete: children.first("OnDelete", CsdlItem::into_on_delete),
            constraints: children.all("ReferentialConstraint", CsdlItem::into_property_constraint),
        }
    } else {
        CsdlNavigationTarget::Association {
            relationship: reader.required_qualified_name("Relationship"),
            to_role: reader.required_name("ToRole"),
            from_role: reader.required_name("FromRole"),
        }
    };
    Some(CsdlItem::NavigationProperty(CsdlNavigationProperty {
        name,
        target,
        documentation: children.first("Documentation", CsdlItem::into_documentation),
        annotations: reader.take_annotations(),
        location: reader.location(),
    }))
}

fn finish_on_delete(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    _: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    Some(CsdlItem::OnDelete(reader.required_on_delete("Action")))
}

fn finish_property_constraint(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    _: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    Some(CsdlItem::PropertyConstraint(CsdlPropertyConstraint {
        property: reader.required_string("Property"),
        referenced_property: reader.required_string("ReferencedProperty"),
        location: reader.location(),
    }))
}

fn finish_enum_type(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    Some(CsdlItem::EnumType(CsdlEnumType {
        name: reader.required_name("Name"),
        underlying_type: reader.optional_qualified_name("UnderlyingType"),
        is_flags: reader.bool_or("IsFlags", false),
        members: children.all("Member", CsdlItem::into_member),
        documentation: children.first("Documentation", CsdlItem::into_documentation),
        annotations: reader.take_annotations(),
        location: reader.location(),
    }))
}

fn finish_member(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    _: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    Some(CsdlItem::Member(CsdlEnumMember {
        name: reader.required_name("Name"),
        value: reader.optional_long("Value"),
        annotations: reader.take_annotations(),
        location: reader.location(),
    }))
}

fn finish_type_definition(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    _: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    Some(CsdlItem::TypeDefinition(CsdlTypeDefinition {
        name: reader.required_name("Name"),
        underlying_type: reader.required_qualified_name("UnderlyingType"),
        facets: reader.facets(),
        annotations: reader.take_annotations(),
        location: reader.location(),
    }))
}

fn finish_association(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    let name = reader.required_name("Name");
    let ends = children.all("End", CsdlItem::into_association_end);
    if ends.len() < 2 {
        reader.report(
            EdmErrorCode::MissingElement,
            messages::missing_element("Association", "End"),
        );
    }
    Some(CsdlItem::Association(CsdlAssociation {
        name,
        ends,
        referential_constraint: children.first(
            "ReferentialConstraint",
            CsdlItem::into_referential_constraint,
        ),
        documentation: children.first("Documentation", CsdlItem::into_documentation),
        annotations: reader.take_annotations(),
        location: reader.location(),
    }))
}

fn finish_association_end(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    Some(CsdlItem::AssociationEnd(CsdlAssociationEnd {
        type_name: reader.required_qualified_name("Type"),
        role: reader.required_name("Role"),
        multiplicity: reader.required_multiplicity("Multiplicity"),
        on_delete: children.first("OnDelete", CsdlItem::into_on_delete),
        documentation: children.first("Documentation", CsdlItem::into_documentation),
        location: reader.location(),
    }))
}

fn finish_constraint_role(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    Some(CsdlItem::ConstraintRole(CsdlConstraintRole {
        role: reader.required_name("Role"),
        properties: children.all("PropertyRef", CsdlItem::into_property_ref),
        location: reader.location(),
    }))
}

fn finish_referential_constraint(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    let principal = children.first("Principal", CsdlItem::into_constraint_role);
    let dependent = children.first("Dependent", CsdlItem::into_constraint_role);
    if principal.is_none() {
        reader.report(
            EdmErrorCode::MissingElement,
            messages::missing_element("ReferentialConstraint", "Principal"),
        );
    }
    if dependent.is_none() {
        reader.report(
            EdmErrorCode::MissingElement,
            messages::missing_element("ReferentialConstraint", "Dependent"),
        );
    }
    Some(CsdlItem::ReferentialConstraint(CsdlReferentialConstraint {
        principal: principal?,
        dependent: dependent?,
        location: reader.location(),
    }))
}

/// Take a nested `CollectionType`, `ReferenceType` or `TypeRef`
fn take_type_element(children: &mut Children) -> Option<CsdlTypeReference> {
    ["CollectionType", "ReferenceType", "TypeRef"]
        .into_iter()
        .find_map(|name| children.first(name, CsdlItem::into_type_reference))
}

/// A type given by a `Type` attribute or, before 4.0, by a nested type element
fn attribute_or_element_type(
    reader: &mut ElementReader<'_>,
    children: &mut Children,
) -> CsdlTypeReference {
    if reader.is_v4() {
        let kind = reader.required_type("Type");
        return reader.type_reference(kind);
    }
    if let Some(kind) = reader.optional_type("Type") {
        return reader.type_reference(kind);
    }
    take_type_element(children).unwrap_or_else(|| {
        reader.report(EdmErrorCode::MissingAttribute, messages::missing_attribute("Type"));
        CsdlTypeReference::named("", reader.location())
    })
}

fn finish_collection_type(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    let element = match reader.optional_type("ElementType") {
        Some(kind) => reader.type_reference(kind),
        None => take_type_element(children).unwrap_or_else(|| {
            reader.report(
                EdmErrorCode::MissingAttribute,
                messages::missing_attribute("ElementType"),
            );
            CsdlTypeReference::named("", reader.location())
        }),
    };
    Some(CsdlItem::TypeReference(CsdlTypeReference {
        kind: CsdlTypeKind::Collection(Box::new(element)),
        nullable: true,
        facets: CsdlFacets::default(),
        location: reader.location(),
    }))
}

fn finish_reference_type(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    _: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    let target = reader.required_qualified_name("Type");
    Some(CsdlItem::TypeReference(CsdlTypeReference {
        kind: CsdlTypeKind::EntityReference(target),
        nullable: true,
        facets: CsdlFacets::default(),
        location: reader.location(),
    }))
}

fn finish_type_ref(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    _: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    let kind = reader.required_type("Type");
    Some(CsdlItem::TypeReference(reader.type_reference(kind)))
}

fn finish_parameter(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    let name = reader.required_name("Name");
    let type_ref = attribute_or_element_type(&mut reader, children);
    let mode = if reader.is_v4() {
        None
    } else {
        reader.optional_parameter_mode("Mode")
    };
    Some(CsdlItem::Parameter(CsdlParameter {
        name,
        type_ref,
        mode,
        documentation: children.first("Documentation", CsdlItem::into_documentation),
        annotations: reader.take_annotations(),
        location: reader.location(),
    }))
}

fn finish_return_type(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    Some(CsdlItem::TypeReference(attribute_or_element_type(&mut reader, children)))
}

fn finish_operation(
    kind: OperationKind,
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    let name = reader.required_name("Name");
    let (is_bound, entity_set_path, return_type, defining_expression) = if reader.is_v4() {
        (
            reader.bool_or("IsBound", false),
            reader.optional_string("EntitySetPath"),
            children.first("ReturnType", CsdlItem::into_type_reference),
            None,
        )
    } else {
        let attribute = reader.optional_type("ReturnType").map(|kind| CsdlTypeReference {
            kind,
            nullable: true,
            facets: CsdlFacets::default(),
            location: reader.location(),
        });
        let return_type =
            attribute.or_else(|| children.first("ReturnType", CsdlItem::into_type_reference));
        (
            false,
            None,
            return_type,
            children.first("DefiningExpression", CsdlItem::into_text),
        )
    };
    let is_composable = kind == OperationKind::Function && reader.bool_or("IsComposable", false);
    Some(CsdlItem::Operation(CsdlOperation {
        kind,
        name,
        parameters: children.all("Parameter", CsdlItem::into_parameter),
        return_type,
        is_bound,
        is_composable,
        entity_set_path,
        defining_expression,
        documentation: children.first("Documentation", CsdlItem::into_documentation),
        annotations: reader.take_annotations(),
        location: reader.location(),
    }))
}

fn finish_function(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    finish_operation(OperationKind::Function, ctx, info, children)
}

fn finish_action(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    finish_operation(OperationKind::Action, ctx, info, children)
}

fn finish_entity_container(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    let mut operation_imports = children.all("FunctionImport", CsdlItem::into_operation_import);
    operation_imports.extend(children.all("ActionImport", CsdlItem::into_operation_import));
    Some(CsdlItem::EntityContainer(CsdlEntityContainer {
        name: reader.required_name("Name"),
        extends: reader.optional_string("Extends"),
        entity_sets: children.all("EntitySet", CsdlItem::into_entity_set),
        singletons: children.all("Singleton", CsdlItem::into_singleton),
        operation_imports,
        association_sets: children.all("AssociationSet", CsdlItem::into_association_set),
        documentation: children.first("Documentation", CsdlItem::into_documentation),
        annotations: reader.take_annotations(),
        location: reader.location(),
    }))
}

fn finish_entity_set(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    Some(CsdlItem::EntitySet(CsdlEntitySet {
        name: reader.required_name("Name"),
        entity_type: reader.required_qualified_name("EntityType"),
        navigation_bindings: children.all(
            "NavigationPropertyBinding",
            CsdlItem::into_navigation_property_binding,
        ),
        documentation: children.first("Documentation", CsdlItem::into_documentation),
        annotations: reader.take_annotations(),
        location: reader.location(),
    }))
}

fn finish_navigation_binding(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    _: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    Some(CsdlItem::NavigationPropertyBinding(CsdlNavigationPropertyBinding {
        path: reader.required_string("Path"),
        target: reader.required_string("Target"),
        location: reader.location(),
    }))
}

fn finish_singleton(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    Some(CsdlItem::Singleton(CsdlSingleton {
        name: reader.required_name("Name"),
        type_name: reader.required_qualified_name("Type"),
        navigation_bindings: children.all(
            "NavigationPropertyBinding",
            CsdlItem::into_navigation_property_binding,
        ),
        annotations: reader.take_annotations(),
        location: reader.location(),
    }))
}

fn finish_function_import(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    let name = reader.required_name("Name");
    let mut import = CsdlOperationImport {
        kind: OperationKind::Function,
        name,
        operation: None,
        entity_set: None,
        return_type: None,
        parameters: Vec::new(),
        is_side_effecting: None,
        is_bindable: false,
        is_composable: false,
        include_in_service_document: false,
        documentation: None,
        annotations: Vec::new(),
        location: reader.location(),
    };
    if reader.is_v4() {
        import.operation = Some(reader.required_qualified_name("Function"));
        import.entity_set = reader.optional_entity_set_path("EntitySet");
        import.include_in_service_document = reader.bool_or("IncludeInServiceDocument", false);
    } else {
        import.return_type = reader.optional_type("ReturnType").map(|kind| CsdlTypeReference {
            kind,
            nullable: true,
            facets: CsdlFacets::default(),
            location: reader.location(),
        });
        import.entity_set = reader.optional_entity_set_path("EntitySet");
        import.is_side_effecting = reader.optional_bool("IsSideEffecting");
        import.is_bindable = reader.bool_or("IsBindable", false);
        import.is_composable = reader.bool_or("IsComposable", false);
        import.parameters = children.all("Parameter", CsdlItem::into_parameter);
        import.documentation = children.first("Documentation", CsdlItem::into_documentation);
    }
    import.annotations = reader.take_annotations();
    Some(CsdlItem::OperationImport(import))
}

fn finish_action_import(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    _: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    Some(CsdlItem::OperationImport(CsdlOperationImport {
        kind: OperationKind::Action,
        name: reader.required_name("Name"),
        operation: Some(reader.required_qualified_name("Action")),
        entity_set: reader.optional_entity_set_path("EntitySet"),
        return_type: None,
        parameters: Vec::new(),
        is_side_effecting: None,
        is_bindable: false,
        is_composable: false,
        include_in_service_document: false,
        documentation: None,
        annotations: reader.take_annotations(),
        location: reader.location(),
    }))
}

fn finish_association_set(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    Some(CsdlItem::AssociationSet(CsdlAssociationSet {
        name: reader.required_name("Name"),
        association: reader.required_qualified_name("Association"),
        ends: children.all("End", CsdlItem::into_association_set_end),
        documentation: children.first("Documentation", CsdlItem::into_documentation),
        location: reader.location(),
    }))
}

fn finish_association_set_end(
    ctx: &mut CsdlParseContext,
    info: &mut XmlElementInfo,
    children: &mut Children,
) -> Option<CsdlItem> {
    let mut reader = ElementReader::begin(ctx, info);
    Some(CsdlItem::AssociationSetEnd(CsdlAssociationSetEnd {
        role: reader.required_name("Role"),
        entity_set: reader.required_name("EntitySet"),
        documentation: children.first("Documentation", CsdlItem::into_documentation),
        location: reader.location(),
    }))
}

//! CSDL parsing integration tests
//!
//! These tests run whole documents through the reader and check the
//! resulting CSDL tree and diagnostics.

use csdl::csdl::{CsdlNavigationTarget, CsdlTypeKind, MaxLength, Multiplicity, OperationKind};
use csdl::namespaces::{csdl_namespace, Version};
use csdl::{CsdlParseResult, CsdlReader, EdmErrorCode};
use pretty_assertions::assert_eq;

const V4_NS: &str = "http://docs.oasis-open.org/odata/ns/edm";
const V3_NS: &str = "http://schemas.microsoft.com/ado/2009/11/edm";

fn parse(xml: &str) -> CsdlParseResult {
    CsdlReader::new().parse_str(xml)
}

fn codes(result: &CsdlParseResult) -> Vec<EdmErrorCode> {
    result.errors.iter().map(|e| e.code).collect()
}

fn v4(body: &str) -> String {
    format!(r#"<Schema xmlns="{}" Namespace="NS">{}</Schema>"#, V4_NS, body)
}

fn v3(body: &str) -> String {
    format!(r#"<Schema xmlns="{}" Namespace="NS">{}</Schema>"#, V3_NS, body)
}

// ============================================================================
// Document structure
// ============================================================================

#[test]
fn test_minimal_document_for_every_version() {
    for version in [
        Version::V1,
        Version::V1_1,
        Version::V1_2,
        Version::V2,
        Version::V3,
        Version::V4,
    ] {
        let namespace = csdl_namespace(version).unwrap();
        let xml = format!(r#"<Schema xmlns="{}" Namespace="NS"/>"#, namespace);
        let result = parse(&xml);
        assert!(result.errors.is_empty(), "{}: {:?}", version, result.errors);
        assert_eq!(result.version, Some(version));
        let schema = result.schema.unwrap();
        assert_eq!(schema.version, version);
        assert_eq!(schema.namespace, "NS");
    }
}

#[test]
fn test_unknown_namespace_is_fatal() {
    let result = parse(r#"<Schema xmlns="urn:not-csdl" Namespace="NS"/>"#);
    assert!(result.schema.is_none());
    assert_eq!(result.version, None);
    assert_eq!(codes(&result), vec![EdmErrorCode::UnexpectedXmlElement]);
}

#[test]
fn test_missing_namespace_attribute() {
    let result = parse(&format!(r#"<Schema xmlns="{}"/>"#, V4_NS));
    let schema = result.schema.unwrap();
    assert_eq!(schema.namespace, "");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].code, EdmErrorCode::MissingAttribute);
    assert!(result.errors[0].message.contains("'Namespace'"));
    assert_eq!(result.errors[0].location.line, 1);
    assert_eq!(result.errors[0].location.column, 1);
}

#[test]
fn test_unexpected_attribute_is_reported_and_ignored() {
    let result = parse(&v4(r#"<EntityType Name="Person" Color="blue"/>"#));
    assert_eq!(codes(&result), vec![EdmErrorCode::UnexpectedXmlAttribute]);
    assert!(result.errors[0].message.contains("'Color'"));
    assert_eq!(result.schema.unwrap().entity_types[0].name, "Person");
}

#[test]
fn test_version_specific_element_is_unexpected() {
    // Association does not exist in 4.0
    let result = parse(&v4(r#"<Association Name="A"/>"#));
    assert_eq!(codes(&result), vec![EdmErrorCode::UnexpectedXmlElement]);
    assert!(result.schema.unwrap().associations.is_empty());

    // TypeDefinition does not exist before 4.0
    let result = parse(&v3(r#"<TypeDefinition Name="T" UnderlyingType="Edm.String"/>"#));
    assert_eq!(codes(&result), vec![EdmErrorCode::UnexpectedXmlElement]);
}

#[test]
fn test_text_inside_element_only_content() {
    let result = parse(&v4("\n  <EntityType Name=\"P\">stray</EntityType>"));
    assert_eq!(codes(&result), vec![EdmErrorCode::TextNotAllowed]);
    assert_eq!(result.errors[0].location.line, 2);
}

// ============================================================================
// Type names and facets
// ============================================================================

#[test]
fn test_type_name_grammar() {
    let xml = v4(r#"<ComplexType Name="C">
        <Property Name="A" Type="Edm.String" MaxLength="max"/>
        <Property Name="B" Type="Collection(Edm.Int32)"/>
        <Property Name="C" Type="Collection(Collection(Edm.Int32))"/>
        <Property Name="D" Type="Collection( Edm.Int32)"/>
        <Property Name="E" Type="Edm.Decimal" Precision="10" Scale="variable"/>
    </ComplexType>"#);
    let result = parse(&xml);
    assert_eq!(
        codes(&result),
        vec![EdmErrorCode::InvalidTypeName, EdmErrorCode::InvalidTypeName]
    );

    let schema = result.schema.unwrap();
    let properties = &schema.complex_types[0].properties;
    assert_eq!(properties[0].type_ref.facets.max_length, Some(MaxLength::Max));
    match &properties[1].type_ref.kind {
        CsdlTypeKind::Collection(element) => {
            assert_eq!(element.kind, CsdlTypeKind::Named("Edm.Int32".to_string()))
        }
        other => panic!("expected collection, got {:?}", other),
    }
    assert_eq!(properties[4].type_ref.facets.precision, Some(10));
    assert_eq!(properties[4].type_ref.facets.scale, Some(None));
}

#[test]
fn test_invalid_facet_values() {
    let xml = v4(r#"<ComplexType Name="C">
        <Property Name="A" Type="Edm.String" MaxLength="lots" Nullable="maybe"/>
    </ComplexType>"#);
    let result = parse(&xml);
    let mut found = codes(&result);
    found.sort_by_key(|c| format!("{:?}", c));
    assert_eq!(
        found,
        vec![EdmErrorCode::InvalidBoolean, EdmErrorCode::InvalidMaxLength]
    );
    let property = &result.schema.unwrap().complex_types[0].properties[0];
    assert!(property.type_ref.nullable);
    assert_eq!(property.type_ref.facets.max_length, None);
}

#[test]
fn test_legacy_nested_collection_type() {
    let xml = v3(r#"<Function Name="Lists">
        <ReturnType>
            <CollectionType>
                <CollectionType ElementType="Edm.String"/>
            </CollectionType>
        </ReturnType>
    </Function>"#);
    let result = parse(&xml);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let schema = result.schema.unwrap();
    let return_type = schema.operations[0].return_type.as_ref().unwrap();
    assert_eq!(return_type.display_name(), "Collection(Collection(Edm.String))");
}

// ============================================================================
// Grammar details
// ============================================================================

#[test]
fn test_documentation_text() {
    let xml = v3(r#"<EntityType Name="P">
        <Documentation>
            <Summary>A person</Summary>
            <LongDescription>Someone <!-- note --> we know</LongDescription>
        </Documentation>
    </EntityType>"#);
    let result = parse(&xml);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let documentation = result.schema.unwrap().entity_types[0]
        .documentation
        .clone()
        .unwrap();
    assert_eq!(documentation.summary.as_deref(), Some("A person"));
    assert_eq!(documentation.long_description.as_deref(), Some("Someone  we know"));
}

#[test]
fn test_documentation_kept_on_legacy_elements() {
    let summary =
        |text: &str| format!("<Documentation><Summary>{}</Summary></Documentation>", text);
    let xml = v3(&format!(
        r#"<Association Name="Owns">{}
            <End Type="NS.Person" Role="Owner" Multiplicity="1">{}</End>
            <End Type="NS.Car" Role="Car" Multiplicity="*"/>
        </Association>
        <Function Name="Age" ReturnType="Edm.Int32">
            <Parameter Name="p" Type="NS.Person">{}</Parameter>
        </Function>
        <EntityContainer Name="C">
            <AssociationSet Name="Owns" Association="NS.Owns">{}
                <End Role="Owner" EntitySet="People">{}</End>
            </AssociationSet>
        </EntityContainer>"#,
        summary("association"),
        summary("end"),
        summary("parameter"),
        summary("set"),
        summary("set end")
    ));
    let result = parse(&xml);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let schema = result.schema.unwrap();

    let text = |documentation: &Option<csdl::csdl::CsdlDocumentation>| {
        documentation.as_ref().and_then(|d| d.summary.clone())
    };
    let association = &schema.associations[0];
    assert_eq!(text(&association.documentation).as_deref(), Some("association"));
    assert_eq!(text(&association.ends[0].documentation).as_deref(), Some("end"));
    assert_eq!(association.ends[1].documentation, None);
    assert_eq!(
        text(&schema.operations[0].parameters[0].documentation).as_deref(),
        Some("parameter")
    );
    let set = &schema.entity_containers[0].association_sets[0];
    assert_eq!(text(&set.documentation).as_deref(), Some("set"));
    assert_eq!(text(&set.ends[0].documentation).as_deref(), Some("set end"));
}

#[test]
fn test_duplicate_principal_is_unused() {
    let xml = v3(r#"<Association Name="Owns">
        <End Type="NS.Person" Role="Owner" Multiplicity="1"/>
        <End Type="NS.Car" Role="Car" Multiplicity="*"><OnDelete Action="Cascade"/></End>
        <ReferentialConstraint>
            <Principal Role="Owner"><PropertyRef Name="Id"/></Principal>
            <Principal Role="Car"><PropertyRef Name="Id"/></Principal>
            <Dependent Role="Car"><PropertyRef Name="OwnerId"/></Dependent>
        </ReferentialConstraint>
    </Association>"#);
    let result = parse(&xml);
    assert_eq!(codes(&result), vec![EdmErrorCode::UnexpectedXmlElement]);
    assert!(result.errors[0].message.contains("'Principal'"));

    let schema = result.schema.unwrap();
    let association = &schema.associations[0];
    assert_eq!(association.ends[1].multiplicity, Multiplicity::Many);
    let constraint = association.referential_constraint.as_ref().unwrap();
    assert_eq!(constraint.principal.role, "Owner");
    assert_eq!(constraint.dependent.properties, vec!["OwnerId".to_string()]);
}

#[test]
fn test_missing_dependent_drops_the_constraint() {
    let xml = v3(r#"<Association Name="Owns">
        <End Type="NS.Person" Role="Owner" Multiplicity="1"/>
        <End Type="NS.Car" Role="Car" Multiplicity="*"/>
        <ReferentialConstraint>
            <Principal Role="Owner"><PropertyRef Name="Id"/></Principal>
        </ReferentialConstraint>
    </Association>"#);
    let result = parse(&xml);
    assert_eq!(codes(&result), vec![EdmErrorCode::MissingElement]);
    assert!(result.schema.unwrap().associations[0].referential_constraint.is_none());
}

#[test]
fn test_navigation_property_per_version() {
    let legacy = parse(&v3(
        r#"<EntityType Name="P"><NavigationProperty Name="Cars" Relationship="NS.Owns" ToRole="Car" FromRole="Owner"/></EntityType>"#,
    ));
    assert!(legacy.errors.is_empty(), "{:?}", legacy.errors);
    let schema = legacy.schema.unwrap();
    assert!(matches!(
        &schema.entity_types[0].navigation_properties[0].target,
        CsdlNavigationTarget::Association { to_role, .. } if to_role == "Car"
    ));

    let modern = parse(&v4(
        r#"<EntityType Name="P"><NavigationProperty Name="Cars" Type="Collection(NS.Car)" Partner="Owner">
            <ReferentialConstraint Property="Id" ReferencedProperty="OwnerId"/>
        </NavigationProperty></EntityType>"#,
    ));
    assert!(modern.errors.is_empty(), "{:?}", modern.errors);
    let schema = modern.schema.unwrap();
    match &schema.entity_types[0].navigation_properties[0].target {
        CsdlNavigationTarget::Typed {
            partner,
            constraints,
            ..
        } => {
            assert_eq!(partner.as_deref(), Some("Owner"));
            assert_eq!(constraints[0].referenced_property, "OwnerId");
        }
        other => panic!("expected typed target, got {:?}", other),
    }
}

#[test]
fn test_operations_and_imports() {
    let xml = v4(r#"
        <Function Name="Top" IsComposable="true">
            <Parameter Name="count" Type="Edm.Int32" Nullable="false"/>
            <ReturnType Type="Collection(NS.Person)"/>
        </Function>
        <Action Name="Reset" IsBound="true">
            <Parameter Name="target" Type="NS.Person"/>
        </Action>
        <EntityContainer Name="Default">
            <EntitySet Name="People" EntityType="NS.Person">
                <NavigationPropertyBinding Path="Friends" Target="People"/>
            </EntitySet>
            <Singleton Name="Me" Type="NS.Person"/>
            <FunctionImport Name="Top" Function="NS.Top" EntitySet="People"/>
            <ActionImport Name="Reset" Action="NS.Reset"/>
        </EntityContainer>"#);
    let result = parse(&xml);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let schema = result.schema.unwrap();

    assert_eq!(schema.operations.len(), 2);
    assert_eq!(schema.operations[0].kind, OperationKind::Function);
    assert!(schema.operations[0].is_composable);
    assert!(!schema.operations[0].parameters[0].type_ref.nullable);
    assert_eq!(schema.operations[1].kind, OperationKind::Action);
    assert!(schema.operations[1].is_bound);

    let container = &schema.entity_containers[0];
    assert_eq!(container.entity_sets[0].navigation_bindings[0].target, "People");
    assert_eq!(container.singletons[0].type_name, "NS.Person");
    assert_eq!(container.operation_imports.len(), 2);
    assert_eq!(container.operation_imports[1].operation.as_deref(), Some("NS.Reset"));
}

#[test]
fn test_invalid_entity_set_path() {
    let xml = v4(r#"<EntityContainer Name="C">
        <FunctionImport Name="F" Function="NS.F" EntitySet="NoDots/People"/>
    </EntityContainer>"#);
    let result = parse(&xml);
    assert_eq!(codes(&result), vec![EdmErrorCode::InvalidEntitySetPath]);
}

// ============================================================================
// Annotations
// ============================================================================

#[test]
fn test_foreign_annotations_are_kept() {
    let xml = format!(
        r#"<Schema xmlns="{}" xmlns:ext="urn:ext" Namespace="NS" ext:owner="team">
    <EntityType Name="P">
        <ext:Note lang="en">Hello <ext:b>world</ext:b></ext:Note>
    </EntityType>
</Schema>"#,
        V4_NS
    );
    let result = parse(&xml);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let schema = result.schema.unwrap();

    assert_eq!(schema.annotations.len(), 1);
    let attribute = &schema.annotations[0];
    assert!(attribute.is_attribute);
    assert_eq!(attribute.name.namespace.as_deref(), Some("urn:ext"));
    assert_eq!(attribute.name.local_name, "owner");
    assert_eq!(attribute.value, "team");

    let element = &schema.entity_types[0].annotations[0];
    assert!(!element.is_attribute);
    assert_eq!(element.name.local_name, "Note");
    assert_eq!(element.location.line, 3);
    assert_eq!(
        element.value,
        r#"<ext:Note lang="en">Hello <ext:b>world</ext:b></ext:Note>"#
    );
    assert_eq!(element.element_text().as_deref(), Some("Hello world"));
    let lang = element.with_element_tree(|node| node.attribute("lang").map(str::to_string));
    assert_eq!(lang, Some(Some("en".to_string())));
}

#[test]
fn test_self_closing_annotation_is_verbatim() {
    let xml = format!(
        r#"<Schema xmlns="{}" xmlns:ext="urn:ext" Namespace="NS">
    <ComplexType Name="Address">
        <Property Name="Street" Type="Edm.String"><ext:Flag level="2"  kind='x'/></Property>
        <ext:Marker/>
    </ComplexType>
</Schema>"#,
        V4_NS
    );
    let result = parse(&xml);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let complex = &result.schema.unwrap().complex_types[0];

    let flag = &complex.properties[0].annotations[0];
    assert!(!flag.is_attribute);
    assert_eq!(flag.name.local_name, "Flag");
    assert_eq!(flag.value, r#"<ext:Flag level="2"  kind='x'/>"#);
    let level = flag.with_element_tree(|node| node.attribute("level").map(str::to_string));
    assert_eq!(level, Some(Some("2".to_string())));

    let marker = &complex.annotations[0];
    assert_eq!(marker.value, "<ext:Marker/>");
    assert_eq!(marker.location.line, 4);
}

#[test]
fn test_other_csdl_namespace_is_not_an_annotation() {
    let xml = format!(
        r#"<Schema xmlns="{}" xmlns:old="{}" Namespace="NS"><old:EntityType Name="P"/></Schema>"#,
        V4_NS, V3_NS
    );
    let result = parse(&xml);
    assert_eq!(codes(&result), vec![EdmErrorCode::UnexpectedXmlElement]);
    let schema = result.schema.unwrap();
    assert!(schema.entity_types.is_empty());
    assert!(schema.annotations.is_empty());
}

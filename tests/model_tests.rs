//! EDM model integration tests
//!
//! Documents are read all the way to a linked model; the tests check
//! name resolution, sentinels and ambiguous bindings.

use csdl::csdl::OnDeleteAction;
use csdl::edm::{
    EdmCheckable, EdmModel, EdmNamedElement, EdmPrimitiveTypeKind, EdmProperty, EdmType,
    EdmTypeKind, ExtendsTarget, HasTypeKind,
};
use csdl::{CsdlReader, EdmErrorCode, ModelReadResult};
use pretty_assertions::assert_eq;

const V4_NS: &str = "http://docs.oasis-open.org/odata/ns/edm";
const V3_NS: &str = "http://schemas.microsoft.com/ado/2009/11/edm";

fn read(namespace: &str, body: &str) -> ModelReadResult {
    let xml = format!(
        r#"<Schema xmlns="{}" Namespace="Shop" Alias="S">{}</Schema>"#,
        namespace, body
    );
    CsdlReader::new().read_model(&xml)
}

fn model(result: &ModelReadResult) -> &EdmModel {
    result.model.as_ref().expect("document should produce a model")
}

fn codes(result: &ModelReadResult) -> Vec<EdmErrorCode> {
    result.errors.iter().map(|e| e.code).collect()
}

const LEGACY_SHOP: &str = r#"
    <Using Namespace="Common.Types" Alias="C"/>
    <EntityType Name="Customer">
        <Key><PropertyRef Name="Id"/></Key>
        <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
        <NavigationProperty Name="Orders" Relationship="S.CustomerOrders" ToRole="Order" FromRole="Customer"/>
    </EntityType>
    <EntityType Name="Order">
        <Key><PropertyRef Name="Id"/></Key>
        <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
        <Property Name="CustomerId" Type="Edm.Int32" Nullable="false"/>
        <NavigationProperty Name="Customer" Relationship="Shop.CustomerOrders" ToRole="Customer" FromRole="Order"/>
        <NavigationProperty Name="Lost" Relationship="Shop.CustomerOrders" ToRole="Nobody" FromRole="Order"/>
    </EntityType>
    <Association Name="CustomerOrders">
        <End Type="Shop.Customer" Role="Customer" Multiplicity="1"/>
        <End Type="Shop.Order" Role="Order" Multiplicity="*"><OnDelete Action="Cascade"/></End>
        <ReferentialConstraint>
            <Principal Role="Customer"><PropertyRef Name="Id"/></Principal>
            <Dependent Role="Order"><PropertyRef Name="CustomerId"/></Dependent>
        </ReferentialConstraint>
    </Association>
    <EntityContainer Name="Base">
        <EntitySet Name="Customers" EntityType="S.Customer"/>
    </EntityContainer>
    <EntityContainer Name="Store" Extends="Base">
        <EntitySet Name="Orders" EntityType="Shop.Order"/>
        <AssociationSet Name="CustomerOrders" Association="Shop.CustomerOrders">
            <End Role="Customer" EntitySet="Customers"/>
            <End Role="Order" EntitySet="Orders"/>
        </AssociationSet>
    </EntityContainer>"#;

// ============================================================================
// Legacy associations
// ============================================================================

#[test]
fn test_legacy_navigation_resolves_through_association() {
    let result = read(V3_NS, LEGACY_SHOP);
    let model = model(&result);
    assert_eq!(codes(&result), vec![EdmErrorCode::BadUnresolvedNavigationPropertyPath]);

    let customer = model.find_type("Shop.Customer").unwrap().as_structured().unwrap();
    let orders = match customer.find_property("Orders").unwrap() {
        EdmProperty::Navigation(nav) => nav,
        other => panic!("expected navigation property, got {:?}", other),
    };
    assert_eq!(orders.type_ref.type_kind(), EdmTypeKind::Collection);
    assert_eq!(
        orders.type_ref.element_type().unwrap().type_kind(),
        EdmTypeKind::Entity
    );
    assert_eq!(orders.partner.as_deref(), Some("Customer"));
    assert!(orders.constraints.is_empty());

    let order = model.find_type("S.Order").unwrap().as_structured().unwrap();
    match order.find_property("Customer").unwrap() {
        EdmProperty::Navigation(nav) => {
            assert!(!nav.type_ref.nullable);
            assert_eq!(nav.on_delete, Some(OnDeleteAction::Cascade));
            assert_eq!(
                nav.constraints,
                vec![("CustomerId".to_string(), "Id".to_string())]
            );
        }
        other => panic!("expected navigation property, got {:?}", other),
    }

    let lost = order.find_property("Lost").unwrap();
    assert!(lost.is_bad());
    assert!(lost.type_ref().is_bad());
    assert!(result.errors[0].message.contains("Nobody"));
}

#[test]
fn test_entity_set_lookup_walks_extends() {
    let result = read(V3_NS, LEGACY_SHOP);
    let model = model(&result);

    let store = model.find_entity_container("Shop.Store").unwrap();
    assert!(matches!(store.extends, Some(ExtendsTarget::Container(_))));
    assert!(store.find_entity_set("Customers").is_none());

    let customers = model.find_entity_set("Store", "Customers").unwrap();
    assert_eq!(customers.first().name, "Customers");
    assert!(model.find_entity_set("Store", "Nothing").is_none());

    let association_set = store.association_sets.get("CustomerOrders").unwrap();
    assert_eq!(association_set.first().association, "Shop.CustomerOrders");
}

// ============================================================================
// Sentinels
// ============================================================================

#[test]
fn test_cyclic_entity_containers() {
    let result = read(
        V4_NS,
        r#"<EntityType Name="Item"><Key><PropertyRef Name="Id"/></Key><Property Name="Id" Type="Edm.Int32"/></EntityType>
        <EntityContainer Name="A" Extends="Shop.B"><EntitySet Name="Items" EntityType="Shop.Item"/></EntityContainer>
        <EntityContainer Name="B" Extends="Shop.A"/>"#,
    );
    let model = model(&result);
    assert_eq!(
        codes(&result),
        vec![
            EdmErrorCode::BadCyclicEntityContainer,
            EdmErrorCode::BadCyclicEntityContainer
        ]
    );

    for name in ["A", "B"] {
        let container = model.find_entity_container(name).unwrap();
        match &container.extends {
            Some(ExtendsTarget::Bad(bad)) => {
                assert!(bad.is_cyclic());
                assert!(bad.find_entity_set("Items").is_none());
            }
            other => panic!("expected cyclic sentinel, got {:?}", other),
        }
    }
    // Declared sets stay reachable; the lookup does not loop
    assert!(model.find_entity_set("A", "Items").is_some());
    assert!(model.find_entity_set("B", "Items").is_none());
}

#[test]
fn test_entity_set_of_unknown_type_is_bad() {
    let result = read(
        V4_NS,
        r#"<ComplexType Name="Address"/>
        <EntityContainer Name="C">
            <EntitySet Name="Ghosts" EntityType="Shop.Ghost"/>
            <EntitySet Name="Addresses" EntityType="Shop.Address"/>
        </EntityContainer>"#,
    );
    let model = model(&result);
    assert_eq!(
        codes(&result),
        vec![EdmErrorCode::BadUnresolvedType, EdmErrorCode::BadUnresolvedType]
    );
    let container = model.find_entity_container("C").unwrap();
    let ghosts = container.find_entity_set("Ghosts").unwrap().first();
    assert!(ghosts.entity_type.is_bad());
    assert_eq!(ghosts.entity_type.type_kind(), EdmTypeKind::None);
}

#[test]
fn test_spatial_and_primitive_references() {
    let result = read(
        V4_NS,
        r#"<ComplexType Name="Place">
            <Property Name="Point" Type="Edm.GeometryPoint"/>
            <Property Name="Area" Type="Edm.GeographyPolygon" SRID="variable"/>
            <Property Name="Label" Type="Edm.String" SRID="4326"/>
            <Property Name="Size" Type="Edm.Huge"/>
            <Property Name="Tags" Type="Collection(Shop.Tag)"/>
        </ComplexType>"#,
    );
    let model = model(&result);
    assert_eq!(
        codes(&result),
        vec![
            EdmErrorCode::BadSpatialTypeReference,
            EdmErrorCode::BadUnresolvedPrimitiveType,
            EdmErrorCode::BadUnresolvedType,
        ]
    );

    let place = model.find_type("Shop.Place").unwrap().as_structured().unwrap();
    let point = place.find_property("Point").unwrap().type_ref();
    assert_eq!(point.primitive_kind(), Some(EdmPrimitiveTypeKind::GeometryPoint));
    assert_eq!(point.facets.srid, Some(0));
    assert_eq!(place.find_property("Area").unwrap().type_ref().facets.srid, None);

    let tags = place.find_property("Tags").unwrap().type_ref();
    assert!(matches!(tags.definition, EdmType::BadCollection(_)));
    assert_eq!(tags.type_kind(), EdmTypeKind::Collection);
}

#[test]
fn test_enum_members_and_default_paths() {
    let result = read(
        V4_NS,
        r#"<EnumType Name="Color" UnderlyingType="Edm.SByte">
            <Member Name="Red"/>
            <Member Name="Green" Value="5"/>
            <Member Name="Blue"/>
            <Member Name="Ultra" Value="200"/>
            <Member Name="Red"/>
        </EnumType>
        <ComplexType Name="Paint">
            <Property Name="Good" Type="Shop.Color" DefaultValue="Shop.Color/Red"/>
            <Property Name="Bad" Type="Shop.Color" DefaultValue="Color/Red/Extra"/>
            <Property Name="Plain" Type="Shop.Color" DefaultValue="Red"/>
        </ComplexType>"#,
    );
    let model = model(&result);
    assert_eq!(
        codes(&result),
        vec![
            EdmErrorCode::InvalidEnumMemberPath,
            EdmErrorCode::EnumMemberValueOutOfRange,
            EdmErrorCode::AlreadyDefined,
        ]
    );

    let color = model.find_type("Shop.Color").unwrap().as_enum().unwrap();
    let values: Vec<(String, i64)> = color
        .members
        .iter()
        .map(|m| (m.name().to_string(), m.value()))
        .collect();
    assert_eq!(
        values,
        vec![
            ("Red".to_string(), 0),
            ("Green".to_string(), 5),
            ("Blue".to_string(), 6),
            ("Ultra".to_string(), 0),
            ("Red".to_string(), 0),
        ]
    );
    assert!(color.members[3].is_bad());
    assert!(color.members[4].is_bad());
}

// ============================================================================
// Ambiguous bindings
// ============================================================================

#[test]
fn test_same_named_functions_are_ambiguous() {
    let result = read(
        V4_NS,
        r#"<Function Name="F"><Parameter Name="x" Type="Edm.Int32"/><ReturnType Type="Edm.Int32"/></Function>
        <Function Name="F"><Parameter Name="x" Type="Edm.String"/><ReturnType Type="Edm.String"/></Function>
        <Function Name="G"><ReturnType Type="Edm.Boolean"/></Function>"#,
    );
    let model = model(&result);
    assert_eq!(codes(&result), vec![EdmErrorCode::BadAmbiguousElementBinding]);

    let keys: Vec<&str> = model.operations().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["Shop.F", "Shop.G"]);

    let ambiguous = model.find_operation("S.F").unwrap();
    assert!(ambiguous.is_ambiguous());
    assert!(ambiguous.return_type().is_none());
    assert_eq!(ambiguous.name(), "F");
    assert_eq!(ambiguous.errors().len(), 1);

    let candidates = model.find_operations("Shop.F");
    let parameter_types: Vec<_> = candidates
        .iter()
        .map(|operation| operation.parameters[0].type_ref.primitive_kind())
        .collect();
    assert_eq!(
        parameter_types,
        vec![
            Some(EdmPrimitiveTypeKind::Int32),
            Some(EdmPrimitiveTypeKind::String)
        ]
    );

    let unique = model.find_operation("Shop.G").unwrap();
    assert!(!unique.is_ambiguous());
    assert_eq!(
        unique.return_type().and_then(|r| r.primitive_kind()),
        Some(EdmPrimitiveTypeKind::Boolean)
    );
    assert!(model.find_operations("Shop.Nothing").is_empty());
}

#[test]
fn test_third_colliding_operation_joins_the_same_binding() {
    let function = |return_type: &str| {
        format!(
            r#"<Function Name="Count" ReturnType="{}"><Parameter Name="x" Type="Edm.String"/></Function>"#,
            return_type
        )
    };
    let body = format!(
        "{}{}{}",
        function("Edm.Int32"),
        function("Edm.Int64"),
        function("Edm.Int16")
    );
    let result = read(V3_NS, &body);
    let model = model(&result);
    assert_eq!(
        codes(&result),
        vec![
            EdmErrorCode::BadAmbiguousElementBinding,
            EdmErrorCode::BadAmbiguousElementBinding
        ]
    );

    assert_eq!(model.operations().count(), 1);
    let ambiguous = model.find_operation("S.Count").unwrap();
    assert_eq!(ambiguous.candidates().len(), 3);
    assert_eq!(ambiguous.errors().len(), 2);
    assert!(ambiguous.return_type().is_none());
    assert_eq!(ambiguous.parameters().len(), 1);
}

#[test]
fn test_duplicate_entity_sets_are_ambiguous() {
    let result = read(
        V4_NS,
        r#"<EntityType Name="P"/>
        <EntityContainer Name="C">
            <EntitySet Name="People" EntityType="Shop.P"/>
            <EntitySet Name="People" EntityType="Shop.P"/>
        </EntityContainer>"#,
    );
    let model = model(&result);
    assert_eq!(codes(&result), vec![EdmErrorCode::BadAmbiguousElementBinding]);
    let people = model.find_entity_set("Shop.C", "People").unwrap();
    assert!(people.is_ambiguous());
    assert!(people.is_bad());
}

// ============================================================================
// Diagnostics ordering
// ============================================================================

#[test]
fn test_parse_errors_precede_semantic_errors() {
    let result = read(
        V4_NS,
        r#"<ComplexType Name="C">
            <Property Name="A" Type="Shop.Missing"/>
            <Property Name="B" Type="Edm.String" Color="red"/>
        </ComplexType>"#,
    );
    let model = model(&result);
    assert_eq!(
        codes(&result),
        vec![
            EdmErrorCode::UnexpectedXmlAttribute,
            EdmErrorCode::BadUnresolvedType
        ]
    );
    assert_eq!(model.parse_errors().len(), 1);
    assert_eq!(model.semantic_errors().len(), 1);
    assert_eq!(model.errors(), result.errors);
}

#[test]
fn test_fatal_document_has_no_model() {
    let result = CsdlReader::new().read_model(r#"<Schema xmlns="urn:unknown"/>"#);
    assert!(result.model.is_none());
    assert_eq!(codes(&result), vec![EdmErrorCode::UnexpectedXmlElement]);
}

#[test]
fn test_valid_document_round_trip() {
    let result = read(
        V4_NS,
        r#"<TypeDefinition Name="Money" UnderlyingType="Edm.Decimal" Precision="18" Scale="2"/>
        <EntityType Name="Product">
            <Key><PropertyRef Name="Id"/></Key>
            <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
            <Property Name="Price" Type="S.Money"/>
        </EntityType>
        <EntityContainer Name="Catalog">
            <EntitySet Name="Products" EntityType="S.Product"/>
            <Singleton Name="Featured" Type="Shop.Product"/>
        </EntityContainer>"#,
    );
    assert!(result.is_success(), "{:?}", result.errors);
    let model = model(&result);
    assert_eq!(model.alias(), Some("S"));
    assert_eq!(model.type_names(), vec!["Shop.Product", "Shop.Money"]);

    let product = model.find_type("Shop.Product").unwrap().as_structured().unwrap();
    assert_eq!(product.key, vec!["Id".to_string()]);
    let price = product.find_property("Price").unwrap().type_ref();
    assert_eq!(price.type_kind(), EdmTypeKind::TypeDefinition);

    let catalog = model.find_entity_container("Catalog").unwrap();
    assert!(catalog.find_singleton("Featured").is_some());
}

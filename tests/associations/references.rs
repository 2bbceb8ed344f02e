//! Integration tests for many-to-one references

use metabind::binder::{Binder, BindingServices, ClassCatalog, ClassDescriptor, MemberType};
use metabind::foundation::{CascadeStyle, ErrorKind, FetchStyle, FetchTiming};
use metabind::source::{
    EntityHierarchy, EntitySource, IdentifierSource, RootEntitySource, SingularAttributeSource,
    ToOneAttributeSource,
};

fn root(entity: EntitySource) -> EntityHierarchy {
    EntityHierarchy::single(RootEntitySource::new(
        entity,
        IdentifierSource::simple(SingularAttributeSource::new("id").with_type("long")),
    ))
}

// =============================================================================
// Target Resolution
// =============================================================================

#[test]
fn forward_reference_binds_target_on_demand() {
    let order = EntitySource::new("Order")
        .with_attribute(
            ToOneAttributeSource::new("customer", "Customer").with_column("customer_id"),
        );
    let customer = EntitySource::new("Customer")
        .with_attribute(SingularAttributeSource::new("name").with_type("string"));

    let metadata = Binder::new().bind(&[root(order), root(customer)]).unwrap();

    assert_eq!(metadata.entity_count(), 2);
    let order = metadata.entity_binding("Order").unwrap();
    let customer_id = metadata.entity_id("Customer").unwrap();
    let association = metadata.attribute(order.attribute("customer").unwrap()).unwrap();
    let many_to_one = association.as_many_to_one().unwrap();
    assert_eq!(many_to_one.referenced_entity, Some(customer_id));

    let identifier = metadata
        .hierarchy_of(customer_id)
        .unwrap()
        .identifier_attribute()
        .unwrap();
    assert_eq!(many_to_one.referenced_attribute, Some(identifier));
    let target = metadata.attribute(identifier).unwrap();
    assert_eq!(target.referencing_associations(), &[association.id()]);
}

#[test]
fn mutual_references_terminate() {
    let husband = EntitySource::new("Husband")
        .with_attribute(ToOneAttributeSource::new("wife", "Wife").with_column("wife_id"));
    let wife = EntitySource::new("Wife")
        .with_attribute(ToOneAttributeSource::new("husband", "Husband").with_column("husband_id"));

    let metadata = Binder::new().bind(&[root(husband), root(wife)]).unwrap();

    assert_eq!(metadata.entity_count(), 2);
    let husband_id = metadata.entity_id("Husband").unwrap();
    let wife = metadata.entity_binding("Wife").unwrap();
    let back = metadata.attribute(wife.attribute("husband").unwrap()).unwrap();
    assert_eq!(back.as_many_to_one().unwrap().referenced_entity, Some(husband_id));
}

#[test]
fn self_reference_resolves_to_own_identifier() {
    let employee = EntitySource::new("Employee")
        .with_attribute(ToOneAttributeSource::new("manager", "Employee").with_column("manager_id"));

    let metadata = Binder::new().bind(&[root(employee)]).unwrap();

    let id = metadata.entity_id("Employee").unwrap();
    let employee = metadata.entity(id).unwrap();
    let manager = metadata.attribute(employee.attribute("manager").unwrap()).unwrap();
    assert_eq!(manager.as_many_to_one().unwrap().referenced_entity, Some(id));
    let table = metadata.database().table(employee.primary_table()).unwrap();
    assert!(table.columns().any(|c| c.name.text() == "manager_id"));
}

#[test]
fn reference_to_subclass_binds_its_hierarchy() {
    let vehicle = EntitySource::new("Vehicle").with_subclass(EntitySource::new("Truck"));
    let hierarchy = EntityHierarchy::new(
        RootEntitySource::new(
            vehicle,
            IdentifierSource::simple(SingularAttributeSource::new("id").with_type("long")),
        ),
        metabind::foundation::InheritanceType::SingleTable,
    );
    let shipment = EntitySource::new("Shipment")
        .with_attribute(ToOneAttributeSource::new("truck", "Truck").with_column("truck_id"));

    let metadata = Binder::new().bind(&[root(shipment), hierarchy]).unwrap();

    let truck = metadata.entity_id("Truck").unwrap();
    let vehicle = metadata.entity_id("Vehicle").unwrap();
    assert_eq!(metadata.entity(truck).unwrap().super_entity(), Some(vehicle));
    let shipment = metadata.entity_binding("Shipment").unwrap();
    let association = metadata.attribute(shipment.attribute("truck").unwrap()).unwrap();
    let identifier = metadata.hierarchy_of(vehicle).unwrap().identifier_attribute();
    assert_eq!(association.as_many_to_one().unwrap().referenced_attribute, identifier);
}

#[test]
fn unknown_target_entity_fails() {
    let order = EntitySource::new("Order")
        .with_attribute(ToOneAttributeSource::new("customer", "Customer"));

    let err = Binder::new().bind(&[root(order)]).unwrap_err();

    assert!(matches!(err.kind, ErrorKind::UnknownEntity(ref name) if name == "Customer"));
}

// =============================================================================
// Inferred Targets
// =============================================================================

#[test]
fn target_is_inferred_from_declared_class() {
    let catalog = ClassCatalog::new().with_class(
        "shop.Order",
        ClassDescriptor::new().with_accessor("customer", MemberType::simple("shop.Customer")),
    );
    let order = EntitySource::new("Order")
        .with_class("shop.Order")
        .with_attribute(ToOneAttributeSource::inferred("customer"));
    let customer = EntitySource::new("Client").with_class("shop.Customer");

    let metadata = Binder::new()
        .with_services(BindingServices::new().with_introspector(catalog))
        .bind(&[root(order), root(customer)])
        .unwrap();

    let order = metadata.entity_binding("Order").unwrap();
    let association = metadata.attribute(order.attribute("customer").unwrap()).unwrap();
    let many_to_one = association.as_many_to_one().unwrap();
    assert_eq!(many_to_one.referenced_entity_name, "Client");
    assert_eq!(many_to_one.referenced_entity, metadata.entity_id("Client"));
}

#[test]
fn uninferable_target_fails() {
    let order = EntitySource::new("Order")
        .with_class("shop.Order")
        .with_attribute(ToOneAttributeSource::inferred("customer"));

    let err = Binder::new().bind(&[root(order)]).unwrap_err();

    assert!(matches!(
        err.kind,
        ErrorKind::UnresolvedAssociationTarget(ref path) if path == "Order.customer"
    ));
}

// =============================================================================
// Association Settings
// =============================================================================

#[test]
fn association_settings_are_copied() {
    let order = EntitySource::new("Order").with_attribute(
        ToOneAttributeSource::new("customer", "Customer")
            .with_column("customer_id")
            .with_cascade(CascadeStyle::Persist)
            .with_fetch(FetchTiming::Immediate, FetchStyle::Join),
    );
    let customer = EntitySource::new("Customer");

    let metadata = Binder::new().bind(&[root(order), root(customer)]).unwrap();

    let order = metadata.entity_binding("Order").unwrap();
    let association = metadata.attribute(order.attribute("customer").unwrap()).unwrap();
    let many_to_one = association.as_many_to_one().unwrap();
    assert_eq!(many_to_one.cascade_styles, vec![CascadeStyle::Persist]);
    assert_eq!(many_to_one.fetch_timing, FetchTiming::Immediate);
    assert_eq!(many_to_one.fetch_style, FetchStyle::Join);
    assert_eq!(association.values().len(), 1);
}

// =============================================================================
// Property References
// =============================================================================

#[test]
fn property_reference_targets_named_attribute() {
    let order = EntitySource::new("Order").with_attribute(
        ToOneAttributeSource::new("customer", "Customer")
            .with_column("customer_code")
            .with_property_ref("code"),
    );
    let customer = EntitySource::new("Customer")
        .with_attribute(SingularAttributeSource::new("code").with_type("string"));

    let metadata = Binder::new().bind(&[root(order), root(customer)]).unwrap();

    let customer = metadata.entity_binding("Customer").unwrap();
    let code = customer.attribute("code").unwrap();
    let order = metadata.entity_binding("Order").unwrap();
    let association = metadata.attribute(order.attribute("customer").unwrap()).unwrap();
    let many_to_one = association.as_many_to_one().unwrap();
    assert!(many_to_one.is_property_reference());
    assert_eq!(many_to_one.referenced_attribute, Some(code));
    assert_eq!(
        metadata.attribute(code).unwrap().referencing_associations(),
        &[association.id()]
    );
}

#[test]
fn property_reference_to_unbound_attribute_is_completed_later() {
    // Order binds Customer while Order itself is mid-binding; Customer's
    // reference to Order.number is completed once the session finishes.
    let order = EntitySource::new("Order")
        .with_attribute(
            ToOneAttributeSource::new("customer", "Customer").with_column("customer_id"),
        )
        .with_attribute(SingularAttributeSource::new("number").with_type("string"));
    let customer = EntitySource::new("Customer").with_attribute(
        ToOneAttributeSource::new("last_order", "Order")
            .with_column("last_order_number")
            .with_property_ref("number"),
    );

    let metadata = Binder::new().bind(&[root(order), root(customer)]).unwrap();

    let order = metadata.entity_binding("Order").unwrap();
    let number = order.attribute("number").unwrap();
    let customer = metadata.entity_binding("Customer").unwrap();
    let last_order = metadata.attribute(customer.attribute("last_order").unwrap()).unwrap();
    assert_eq!(last_order.as_many_to_one().unwrap().referenced_attribute, Some(number));
    assert_eq!(
        metadata.attribute(number).unwrap().referencing_associations(),
        &[last_order.id()]
    );
}

#[test]
fn missing_property_reference_fails_when_binding_finishes() {
    let order = EntitySource::new("Order").with_attribute(
        ToOneAttributeSource::new("customer", "Customer").with_property_ref("code"),
    );
    let customer = EntitySource::new("Customer");

    let err = Binder::new().bind(&[root(order), root(customer)]).unwrap_err();

    assert!(matches!(
        err.kind,
        ErrorKind::UnknownAttribute { ref entity, ref attribute }
            if entity == "Customer" && attribute == "code"
    ));
}

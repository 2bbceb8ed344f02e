//! Integration tests for entity settings, meta attributes, and idempotence

use metabind::binder::{Binder, BinderOptions};
use metabind::foundation::{
    AccessType, Caching, EntityMode, MetaAttributeSource, OptimisticLockStyle,
};
use metabind::source::{
    EntityHierarchy, EntitySource, IdentifierSource, RootEntitySource, SingularAttributeSource,
};

fn root(entity: EntitySource) -> RootEntitySource {
    RootEntitySource::new(
        entity,
        IdentifierSource::simple(SingularAttributeSource::new("id").with_type("long")),
    )
}

// =============================================================================
// Entity Settings
// =============================================================================

#[test]
fn entity_settings_are_copied() {
    let mut entity = EntitySource::new("Order")
        .with_class("shop.Order")
        .dynamic()
        .with_batch_size(25)
        .synchronized_with("order_lines");
    entity.select_before_update = true;
    entity.is_abstract = true;
    entity.jpa_entity_name = Some("PurchaseOrder".to_string());

    let metadata = Binder::new()
        .bind(&[EntityHierarchy::single(root(entity))])
        .unwrap();

    let order = metadata.entity_binding("Order").unwrap();
    assert_eq!(order.class_name(), Some("shop.Order"));
    assert_eq!(order.jpa_entity_name.as_deref(), Some("PurchaseOrder"));
    assert!(order.dynamic_insert);
    assert!(order.dynamic_update);
    assert_eq!(order.batch_size, Some(25));
    assert!(order.select_before_update);
    assert!(order.is_abstract);
    assert_eq!(order.synchronized_table_names, vec!["order_lines".to_string()]);
}

#[test]
fn lazy_entities_proxy_their_own_class() {
    let metadata = Binder::new()
        .bind(&[EntityHierarchy::single(root(
            EntitySource::new("Order").with_class("shop.Order"),
        ))])
        .unwrap();

    let order = metadata.entity_binding("Order").unwrap();
    assert!(order.lazy);
    assert_eq!(order.proxy_interface_name.as_deref(), Some("shop.Order"));
}

#[test]
fn explicit_proxy_wins() {
    let mut entity = EntitySource::new("Order").with_class("shop.Order");
    entity.lazy = false;
    entity.proxy = Some("shop.OrderProxy".to_string());

    let metadata = Binder::new()
        .bind(&[EntityHierarchy::single(root(entity))])
        .unwrap();

    let order = metadata.entity_binding("Order").unwrap();
    assert!(order.lazy);
    assert_eq!(order.proxy_interface_name.as_deref(), Some("shop.OrderProxy"));
}

#[test]
fn map_mode_entities_have_no_class() {
    let entity = EntitySource::new("Order").with_class("shop.Order");
    let metadata = Binder::new()
        .bind(&[EntityHierarchy::single(
            root(entity).with_entity_mode(EntityMode::Map),
        )])
        .unwrap();

    let order = metadata.entity_binding("Order").unwrap();
    assert_eq!(order.class_name(), None);
    assert_eq!(order.proxy_interface_name, None);
    assert!(order.lazy);
    assert_eq!(order.primary_table_name(), "Order");
}

#[test]
fn hierarchy_settings_are_recorded() {
    let caching = Caching::new(AccessType::ReadWrite).with_region("orders");
    let root = root(EntitySource::new("Order"))
        .with_caching(caching.clone())
        .with_optimistic_lock(OptimisticLockStyle::Dirty)
        .with_where("deleted = 0")
        .immutable()
        .explicit_polymorphism();

    let metadata = Binder::new().bind(&[EntityHierarchy::single(root)]).unwrap();

    let details = metadata
        .hierarchy_of(metadata.entity_id("Order").unwrap())
        .unwrap();
    assert_eq!(details.root_entity_name, "Order");
    assert_eq!(details.caching, Some(caching));
    assert_eq!(details.optimistic_lock_style, OptimisticLockStyle::Dirty);
    assert_eq!(details.where_filter.as_deref(), Some("deleted = 0"));
    assert!(!details.mutable);
    assert!(details.explicit_polymorphism);
}

// =============================================================================
// Attribute Settings
// =============================================================================

#[test]
fn property_accessor_defaults_from_options() {
    let entity = EntitySource::new("Order")
        .with_attribute(SingularAttributeSource::new("total").with_type("double"))
        .with_attribute(
            SingularAttributeSource::new("notes")
                .with_type("text")
                .with_accessor("field"),
        );

    let metadata = Binder::new()
        .with_options(BinderOptions::new().with_default_property_accessor("direct"))
        .bind(&[EntityHierarchy::single(root(entity))])
        .unwrap();

    let order = metadata.entity_binding("Order").unwrap();
    let total = metadata.attribute(order.attribute("total").unwrap()).unwrap();
    let notes = metadata.attribute(order.attribute("notes").unwrap()).unwrap();
    assert_eq!(total.property_accessor_name.as_deref(), Some("direct"));
    assert_eq!(notes.property_accessor_name.as_deref(), Some("field"));
}

#[test]
fn virtual_attributes_get_domain_slots() {
    let entity = EntitySource::new("Order").with_attribute(
        SingularAttributeSource::new("_checksum")
            .with_type("long")
            .virtual_attribute(),
    );

    let metadata = Binder::new()
        .bind(&[EntityHierarchy::single(root(entity))])
        .unwrap();

    let order = metadata.entity_binding("Order").unwrap();
    let slot = order.entity().attribute("_checksum").unwrap();
    assert!(slot.virtual_attribute);
}

// =============================================================================
// Meta Attributes
// =============================================================================

#[test]
fn meta_attributes_inherit_down_the_hierarchy() {
    let entity = EntitySource::new("Order")
        .with_meta(MetaAttributeSource::new("author", "sales"))
        .with_meta(MetaAttributeSource::new("scope", "entity-only").not_inheritable())
        .with_attribute(
            SingularAttributeSource::new("total")
                .with_type("double")
                .with_meta(MetaAttributeSource::new("author", "billing"))
                .with_meta(MetaAttributeSource::new("format", "0.00").not_inheritable()),
        )
        .with_attribute(SingularAttributeSource::new("notes").with_type("text"));
    let options = BinderOptions::new()
        .with_global_meta(MetaAttributeSource::new("generated", "true"))
        .with_global_meta(MetaAttributeSource::new("hidden", "x").not_inheritable());

    let metadata = Binder::new()
        .with_options(options)
        .bind(&[EntityHierarchy::single(root(entity))])
        .unwrap();

    let order = metadata.entity_binding("Order").unwrap();
    assert_eq!(order.meta.get("generated").and_then(|m| m.value()), Some("true"));
    assert!(order.meta.get("hidden").is_none());
    assert!(order.meta.get("scope").is_none());
    assert_eq!(order.meta.local("author").and_then(|m| m.value()), Some("sales"));

    let total = metadata.attribute(order.attribute("total").unwrap()).unwrap();
    assert_eq!(total.meta.get("author").and_then(|m| m.value()), Some("billing"));
    assert_eq!(total.meta.local("format").and_then(|m| m.value()), Some("0.00"));
    assert_eq!(total.meta.get("generated").and_then(|m| m.value()), Some("true"));

    let notes = metadata.attribute(order.attribute("notes").unwrap()).unwrap();
    assert_eq!(notes.meta.get("author").and_then(|m| m.value()), Some("sales"));
    assert!(notes.meta.local("author").is_none());
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn binding_twice_produces_the_same_shape() {
    let entity = EntitySource::new("Order")
        .with_class("shop.Order")
        .with_attribute(SingularAttributeSource::new("total").with_type("double"));
    let hierarchies = vec![EntityHierarchy::single(root(entity))];
    let binder = Binder::new();

    let first = binder.bind(&hierarchies).unwrap();
    let second = binder.bind(&hierarchies).unwrap();

    assert_eq!(first.entity_count(), second.entity_count());
    assert_eq!(first.database().table_count(), second.database().table_count());
    let columns = |m: &metabind::Metadata| {
        m.database()
            .tables()
            .flat_map(|t| t.columns().map(|c| c.name.text().to_string()).collect::<Vec<_>>())
            .collect::<Vec<_>>()
    };
    assert_eq!(columns(&first), columns(&second));
}

#[test]
fn hierarchy_listed_twice_binds_once() {
    let hierarchy = EntityHierarchy::single(root(
        EntitySource::new("Order")
            .with_attribute(SingularAttributeSource::new("total").with_type("double")),
    ));

    let metadata = Binder::new()
        .bind(&[hierarchy.clone(), hierarchy])
        .unwrap();

    assert_eq!(metadata.entity_count(), 1);
    assert_eq!(metadata.hierarchies().count(), 1);
    let order = metadata.entity_binding("Order").unwrap();
    let table = metadata.database().table(order.primary_table()).unwrap();
    assert_eq!(table.column_count(), 2);
}

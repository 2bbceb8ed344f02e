//! Integration tests for collection tables and collection-level settings

use metabind::Binder;
use metabind::binding::CollectionNature;
use metabind::foundation::{CustomSql, FetchStyle, FetchTiming, PropertyGeneration};
use metabind::source::{
    BasicPluralElementSource, ComponentAttributeSource, EntityHierarchy, EntitySource,
    IdentifierSource, PluralAttributeElementSource, PluralAttributeNature, PluralAttributeSource,
    RootEntitySource, SingularAttributeSource,
};

fn root(entity: EntitySource) -> EntityHierarchy {
    EntityHierarchy::single(RootEntitySource::new(
        entity,
        IdentifierSource::simple(SingularAttributeSource::new("id").with_type("long")),
    ))
}

fn tags() -> PluralAttributeSource {
    PluralAttributeSource::basic_set(
        "tags",
        BasicPluralElementSource::default().with_type("string"),
    )
}

#[test]
fn collection_is_registered_by_role() {
    let order = EntitySource::new("Order").with_attribute(tags());

    let metadata = Binder::new().bind(&[root(order)]).unwrap();

    assert_eq!(metadata.collection_count(), 1);
    let binding = metadata.collection("Order.tags").unwrap();
    assert_eq!(binding.path(), "Order.tags");
    let plural = binding.as_plural().unwrap();
    assert_eq!(plural.nature, CollectionNature::Set);
    assert_eq!(binding.type_descriptor.declared_type_name.as_deref(), Some("set"));

    let order = metadata.entity_binding("Order").unwrap();
    let slot = order.entity().attribute("tags").unwrap();
    assert_eq!(slot.kind, metabind::binding::DomainAttributeKind::Plural);
}

#[test]
fn implicit_collection_table_is_named_after_owner_and_role() {
    let order = EntitySource::new("Order")
        .with_table(metabind::source::TableSource::named("orders"))
        .with_attribute(tags());

    let metadata = Binder::new().bind(&[root(order)]).unwrap();

    let plural = metadata.collection("Order.tags").unwrap().as_plural().unwrap();
    let table = metadata
        .database()
        .table(plural.collection_table.unwrap())
        .unwrap();
    assert_eq!(table.name().text(), "orders_tags");
}

#[test]
fn explicit_collection_table_settings() {
    let order = EntitySource::new("Order").with_attribute(
        tags()
            .with_table("order_tags")
            .with_schema("sales")
            .with_table_comment("tags per order")
            .with_table_check("length(elt) > 0"),
    );

    let metadata = Binder::new().bind(&[root(order)]).unwrap();

    let plural = metadata.collection("Order.tags").unwrap().as_plural().unwrap();
    let table = metadata
        .database()
        .table(plural.collection_table.unwrap())
        .unwrap();
    assert_eq!(table.name().text(), "order_tags");
    assert_eq!(table.schema().schema.as_ref().map(|s| s.text()), Some("sales"));
    assert_eq!(table.comments, vec!["tags per order".to_string()]);
    assert_eq!(table.check_constraints, vec!["length(elt) > 0".to_string()]);
}

#[test]
fn collection_settings_are_copied() {
    let order = EntitySource::new("Order").with_attribute(
        PluralAttributeSource::basic_bag("notes", BasicPluralElementSource::default())
            .with_fetch(FetchTiming::Extra, FetchStyle::Subselect)
            .with_persister("shop.NotesPersister")
            .with_custom_insert(CustomSql::new("insert into notes values (?, ?)"))
            .with_custom_delete_all(CustomSql::new("delete from notes where id = ?"))
            .with_where("archived = 0")
            .ordered_by("elt asc"),
    );

    let metadata = Binder::new().bind(&[root(order)]).unwrap();

    let plural = metadata.collection("Order.notes").unwrap().as_plural().unwrap();
    assert_eq!(plural.nature, CollectionNature::Bag);
    assert_eq!(plural.fetch_timing, FetchTiming::Extra);
    assert_eq!(plural.fetch_style, FetchStyle::Subselect);
    assert_eq!(plural.custom_persister_class_name.as_deref(), Some("shop.NotesPersister"));
    assert!(plural.custom_sql_insert.is_some());
    assert!(plural.custom_sql_delete_all.is_some());
    assert_eq!(plural.where_filter.as_deref(), Some("archived = 0"));
    assert!(!plural.sorted);
    assert_eq!(plural.order_by.as_deref(), Some("elt asc"));
}

#[test]
fn sorting_wins_over_ordering() {
    let order = EntitySource::new("Order")
        .with_attribute(tags().ordered_by("elt").sorted_by("shop.TagComparator"));

    let metadata = Binder::new().bind(&[root(order)]).unwrap();

    let plural = metadata.collection("Order.tags").unwrap().as_plural().unwrap();
    assert!(plural.sorted);
    assert_eq!(plural.comparator_name.as_deref(), Some("shop.TagComparator"));
    assert_eq!(plural.order_by, None);
}

#[test]
fn collections_inside_components_use_component_path() {
    let order = EntitySource::new("Order").with_attribute(
        ComponentAttributeSource::new("details").with_attribute(tags()),
    );

    let metadata = Binder::new().bind(&[root(order)]).unwrap();

    assert!(metadata.collection("Order.details.tags").is_some());
    let plural = metadata
        .collection("Order.details.tags")
        .unwrap()
        .as_plural()
        .unwrap();
    let table = metadata
        .database()
        .table(plural.collection_table.unwrap())
        .unwrap();
    assert_eq!(table.name().text(), "Order_tags");
}

// =============================================================================
// Unsupported Natures
// =============================================================================

#[test]
fn lists_and_maps_are_not_yet_implemented() {
    for nature in [PluralAttributeNature::List, PluralAttributeNature::Map] {
        let order = EntitySource::new("Order").with_attribute(PluralAttributeSource::new(
            "lines",
            nature,
            PluralAttributeElementSource::Basic(BasicPluralElementSource::default()),
        ));

        let err = Binder::new().bind(&[root(order)]).unwrap_err();

        assert!(err.is_not_yet_implemented(), "{nature:?}");
        let context = err.context.as_ref().unwrap();
        assert_eq!(context.stack.last().map(String::as_str), Some("attribute lines"));
    }
}

#[test]
fn unsupported_element_natures_are_not_yet_implemented() {
    let elements = [
        PluralAttributeElementSource::Component(ComponentAttributeSource::new("line")),
        PluralAttributeElementSource::OneToMany {
            referenced_entity_name: "Line".to_string(),
        },
        PluralAttributeElementSource::ManyToMany {
            referenced_entity_name: "Line".to_string(),
            value_sources: Vec::new(),
        },
        PluralAttributeElementSource::ManyToAny,
    ];
    for element in elements {
        let order = EntitySource::new("Order").with_attribute(PluralAttributeSource::new(
            "lines",
            PluralAttributeNature::Set,
            element,
        ));

        let err = Binder::new().bind(&[root(order)]).unwrap_err();

        assert!(err.is_not_yet_implemented());
    }
}

#[test]
fn collection_attributes_do_not_affect_singular_ones() {
    let order = EntitySource::new("Order")
        .with_attribute(
            SingularAttributeSource::new("created")
                .with_type("timestamp")
                .with_generation(PropertyGeneration::Insert),
        )
        .with_attribute(tags());

    let metadata = Binder::new().bind(&[root(order)]).unwrap();

    let order = metadata.entity_binding("Order").unwrap();
    let table = metadata.database().table(order.primary_table()).unwrap();
    let names: Vec<_> = table.columns().map(|c| c.name.text().to_string()).collect();
    assert_eq!(names, vec!["id", "created"]);
}

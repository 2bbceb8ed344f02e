//! Integration tests for basic collection elements

use metabind::binder::{Binder, BindingServices, ClassCatalog, ClassDescriptor, MemberType};
use metabind::relational::SqlTypeCode;
use metabind::source::{
    BasicPluralElementSource, ColumnSource, EntityHierarchy, EntitySource, IdentifierSource,
    PluralAttributeSource, RootEntitySource, SingularAttributeSource,
};

fn root(entity: EntitySource) -> EntityHierarchy {
    EntityHierarchy::single(RootEntitySource::new(
        entity,
        IdentifierSource::simple(SingularAttributeSource::new("id").with_type("long")),
    ))
}

#[test]
fn element_column_defaults_to_elt() {
    let order = EntitySource::new("Order").with_attribute(PluralAttributeSource::basic_bag(
        "notes",
        BasicPluralElementSource::default().with_type("text"),
    ));

    let metadata = Binder::new().bind(&[root(order)]).unwrap();

    let plural = metadata.collection("Order.notes").unwrap().as_plural().unwrap();
    let element = plural.basic_element().unwrap();
    assert_eq!(element.values.len(), 1);
    let database = metadata.database();
    let column = database.column(element.values[0].value.as_column().unwrap()).unwrap();
    assert_eq!(column.name.text(), "elt");
    assert_eq!(
        element.values[0].value.table(),
        plural.collection_table.unwrap()
    );

    let resolved = element.type_descriptor.resolved.as_ref().unwrap();
    assert_eq!(resolved.name, "text");
    assert_eq!(
        database.datatype(element.values[0].value).map(|d| d.type_code),
        Some(SqlTypeCode::CLOB)
    );
}

#[test]
fn explicit_element_column() {
    let order = EntitySource::new("Order").with_attribute(PluralAttributeSource::basic_set(
        "tags",
        BasicPluralElementSource::default()
            .with_type("string")
            .with_column("tag"),
    ));

    let metadata = Binder::new().bind(&[root(order)]).unwrap();

    let plural = metadata.collection("Order.tags").unwrap().as_plural().unwrap();
    let table = metadata.database().table(plural.collection_table.unwrap()).unwrap();
    let names: Vec<_> = table.columns().map(|c| c.name.text().to_string()).collect();
    assert_eq!(names, vec!["id", "tag"]);
}

#[test]
fn element_type_comes_from_generic_argument() {
    let catalog = ClassCatalog::new().with_class(
        "shop.Order",
        ClassDescriptor::new().with_field("tags", MemberType::generic("Set", ["String"])),
    );
    let binder = Binder::new().with_services(BindingServices::new().with_introspector(catalog));
    let order = EntitySource::new("Order")
        .with_class("shop.Order")
        .with_attribute(PluralAttributeSource::basic_set(
            "tags",
            BasicPluralElementSource::default(),
        ));

    let metadata = binder.bind(&[root(order)]).unwrap();

    let plural = metadata.collection("Order.tags").unwrap().as_plural().unwrap();
    let descriptor = &plural.basic_element().unwrap().type_descriptor;
    assert_eq!(descriptor.declared_type_name.as_deref(), Some("String"));
    assert_eq!(descriptor.resolved.as_ref().unwrap().name, "string");
}

#[test]
fn unknown_element_type_stays_unresolved() {
    let order = EntitySource::new("Order").with_attribute(PluralAttributeSource::basic_set(
        "tags",
        BasicPluralElementSource::default(),
    ));

    let metadata = Binder::new().bind(&[root(order)]).unwrap();

    let plural = metadata.collection("Order.tags").unwrap().as_plural().unwrap();
    let element = plural.basic_element().unwrap();
    assert!(!element.type_descriptor.is_resolved());
    assert_eq!(element.values.len(), 1);
}

#[test]
fn element_column_settings_are_applied() {
    let mut element = BasicPluralElementSource::default().with_type("string");
    element.value_sources = vec![
        ColumnSource::new("label")
            .with_nullable(false)
            .with_comment("tag label")
            .into(),
    ];
    let order = EntitySource::new("Order")
        .with_attribute(PluralAttributeSource::basic_set("tags", element));

    let metadata = Binder::new().bind(&[root(order)]).unwrap();

    let plural = metadata.collection("Order.tags").unwrap().as_plural().unwrap();
    let value = plural.basic_element().unwrap().values[0].value;
    let column = metadata.database().column(value.as_column().unwrap()).unwrap();
    assert_eq!(column.name.text(), "label");
    assert!(!column.nullable);
    assert_eq!(column.comment.as_deref(), Some("tag label"));
}

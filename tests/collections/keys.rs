//! Integration tests for collection keys

use metabind::Binder;
use metabind::foundation::{ErrorKind, KeySide, OnDeleteAction};
use metabind::source::{
    BasicPluralElementSource, ComponentAttributeSource, EntityHierarchy, EntitySource,
    IdentifierSource, PluralAttributeKeySource, PluralAttributeSource, RelationalValueSource,
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

/// A component attribute spanning three columns.
fn code() -> ComponentAttributeSource {
    ComponentAttributeSource::new("code")
        .with_attribute(SingularAttributeSource::new("region").with_type("string"))
        .with_attribute(SingularAttributeSource::new("branch").with_type("string"))
        .with_attribute(SingularAttributeSource::new("serial").with_type("long"))
}

// =============================================================================
// Synthesized Keys
// =============================================================================

#[test]
fn key_is_synthesized_from_identifier() {
    let order = EntitySource::new("Order").with_attribute(tags());

    let metadata = Binder::new().bind(&[root(order)]).unwrap();

    let order_table = metadata.entity_binding("Order").unwrap().primary_table();
    let plural = metadata.collection("Order.tags").unwrap().as_plural().unwrap();
    let key = plural.key.as_ref().unwrap();
    let identifier = metadata
        .hierarchy_of(metadata.entity_id("Order").unwrap())
        .unwrap()
        .identifier_attribute()
        .unwrap();
    assert_eq!(key.referenced_attribute, identifier);
    assert_eq!(key.values.len(), 1);

    let database = metadata.database();
    let key_column = database.column(key.values[0].value.as_column().unwrap()).unwrap();
    assert_eq!(key_column.name.text(), "id");
    assert!(!key_column.nullable);

    let table = database.table(plural.collection_table.unwrap()).unwrap();
    let foreign_key = table.foreign_key(key.foreign_key).unwrap();
    assert_eq!(foreign_key.target_table, order_table);
    assert_eq!(foreign_key.name, None);
    assert_eq!(foreign_key.delete_rule, OnDeleteAction::NoAction);
    assert_eq!(foreign_key.column_count(), 1);
    let target = foreign_key.target_columns().next().unwrap();
    assert_eq!(database.column_name(target).unwrap().text(), "id");
    assert_eq!(target.table(), order_table);
}

#[test]
fn key_referencing_component_spans_its_columns() {
    let order = EntitySource::new("Order")
        .with_attribute(code())
        .with_attribute(
            tags().with_key(PluralAttributeKeySource::default().with_property_ref("code")),
        );

    let metadata = Binder::new().bind(&[root(order)]).unwrap();

    let plural = metadata.collection("Order.tags").unwrap().as_plural().unwrap();
    let key = plural.key.as_ref().unwrap();
    assert_eq!(key.values.len(), 3);
    let table = metadata.database().table(plural.collection_table.unwrap()).unwrap();
    let names: Vec<_> = table.columns().map(|c| c.name.text().to_string()).collect();
    assert_eq!(names, vec!["region", "branch", "serial", "elt"]);
}

// =============================================================================
// Explicit Keys
// =============================================================================

#[test]
fn explicit_key_columns_and_constraint_settings() {
    let order = EntitySource::new("Order").with_attribute(
        tags().with_key(
            PluralAttributeKeySource::default()
                .with_column("order_id")
                .with_foreign_key_name("FK_order_tags")
                .with_on_delete(OnDeleteAction::Cascade),
        ),
    );

    let metadata = Binder::new().bind(&[root(order)]).unwrap();

    let plural = metadata.collection("Order.tags").unwrap().as_plural().unwrap();
    let key = plural.key.as_ref().unwrap();
    let database = metadata.database();
    let table = database.table(plural.collection_table.unwrap()).unwrap();
    let foreign_key = table.foreign_key(key.foreign_key).unwrap();
    assert_eq!(foreign_key.name.as_deref(), Some("FK_order_tags"));
    assert_eq!(foreign_key.delete_rule, OnDeleteAction::Cascade);

    let mapping = &foreign_key.column_mappings()[0];
    assert_eq!(database.column_name(mapping.source).unwrap().text(), "order_id");
    assert_eq!(database.column_name(mapping.target).unwrap().text(), "id");
    assert!(!database.column(mapping.source).unwrap().nullable);
}

#[test]
fn key_with_fewer_columns_than_target_is_rejected() {
    let order = EntitySource::new("Order").with_attribute(code()).with_attribute(
        tags().with_key(
            PluralAttributeKeySource::default()
                .with_property_ref("code")
                .with_column("region")
                .with_column("branch"),
        ),
    );

    let err = Binder::new().bind(&[root(order)]).unwrap_err();

    assert!(matches!(
        err.kind,
        ErrorKind::KeyCardinalityMismatch { ref role, excess: KeySide::Target }
            if role == "Order.tags"
    ));
}

#[test]
fn key_with_more_columns_than_target_is_rejected() {
    let order = EntitySource::new("Order").with_attribute(
        tags().with_key(
            PluralAttributeKeySource::default()
                .with_column("order_id")
                .with_column("order_version"),
        ),
    );

    let err = Binder::new().bind(&[root(order)]).unwrap_err();

    assert!(matches!(
        err.kind,
        ErrorKind::KeyCardinalityMismatch { ref role, excess: KeySide::Source }
            if role == "Order.tags"
    ));
}

#[test]
fn key_column_cannot_reference_formula() {
    let order = EntitySource::new("Order")
        .with_attribute(
            SingularAttributeSource::new("code")
                .with_type("string")
                .with_value(RelationalValueSource::formula("upper(name)")),
        )
        .with_attribute(tags().with_key(
            PluralAttributeKeySource::default()
                .with_property_ref("code")
                .with_column("order_code"),
        ));

    let err = Binder::new().bind(&[root(order)]).unwrap_err();

    match err.kind {
        ErrorKind::KeyTypeMismatch {
            role,
            column,
            expression,
        } => {
            assert_eq!(role, "Order.tags");
            assert_eq!(column, "order_code");
            assert_eq!(expression, "upper(name)");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn key_cannot_reference_collection() {
    let order = EntitySource::new("Order")
        .with_attribute(PluralAttributeSource::basic_bag(
            "notes",
            BasicPluralElementSource::default(),
        ))
        .with_attribute(
            tags().with_key(PluralAttributeKeySource::default().with_property_ref("notes")),
        );

    let err = Binder::new().bind(&[root(order)]).unwrap_err();

    assert!(matches!(
        err.kind,
        ErrorKind::PluralPropertyReference { ref role, ref attribute }
            if role == "Order.tags" && attribute == "notes"
    ));
}

#[test]
fn key_referencing_unknown_attribute_is_rejected() {
    let order = EntitySource::new("Order")
        .with_attribute(
            tags().with_key(PluralAttributeKeySource::default().with_property_ref("code")),
        );

    let err = Binder::new().bind(&[root(order)]).unwrap_err();

    assert!(matches!(
        err.kind,
        ErrorKind::UnknownAttribute { ref entity, ref attribute }
            if entity == "Order" && attribute == "code"
    ));
}

#[test]
fn subclass_collection_key_references_root_identifier() {
    let animal = EntitySource::new("Animal").with_subclass(
        EntitySource::new("Dog")
            .with_discriminator_value("D")
            .with_attribute(PluralAttributeSource::basic_set(
                "tricks",
                BasicPluralElementSource::default().with_type("string"),
            )),
    );
    let hierarchy = EntityHierarchy::new(
        RootEntitySource::new(
            animal,
            IdentifierSource::simple(SingularAttributeSource::new("id").with_type("long")),
        )
        .with_discriminator(metabind::source::DiscriminatorSource::column("kind")),
        metabind::foundation::InheritanceType::SingleTable,
    );

    let metadata = Binder::new().bind(&[hierarchy]).unwrap();

    let plural = metadata.collection("Dog.tricks").unwrap().as_plural().unwrap();
    let table = metadata.database().table(plural.collection_table.unwrap()).unwrap();
    assert_eq!(table.name().text(), "Animal_tricks");
    let key = plural.key.as_ref().unwrap();
    let foreign_key = table.foreign_key(key.foreign_key).unwrap();
    assert_eq!(
        foreign_key.target_table,
        metadata.entity_binding("Animal").unwrap().primary_table()
    );
}

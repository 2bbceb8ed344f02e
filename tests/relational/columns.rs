//! Integration tests for columns, derived values, and value types

use std::collections::HashMap;

use metabind::binder::{BasicTypeRegistry, Binder, BindingServices, TypeDefinition};
use metabind::binding::Metadata;
use metabind::relational::{SimpleValue, Size, SqlTypeCode};
use metabind::source::{
    ColumnSource, EntityHierarchy, EntitySource, ExplicitTypeSource, IdentifierSource,
    RelationalValueSource, RootEntitySource, SingularAttributeSource,
};
use proptest::prelude::*;

fn product(entity: EntitySource) -> Vec<EntityHierarchy> {
    vec![EntityHierarchy::single(RootEntitySource::new(
        entity,
        IdentifierSource::simple(SingularAttributeSource::new("id").with_type("long")),
    ))]
}

fn values(metadata: &Metadata, attribute: &str) -> Vec<SimpleValue> {
    let binding = metadata.entity_binding("Product").unwrap();
    metadata
        .attribute(binding.attribute(attribute).unwrap())
        .unwrap()
        .values()
        .iter()
        .map(|value| value.value)
        .collect()
}

#[test]
fn column_settings_are_applied() {
    let entity = EntitySource::new("Product").with_attribute(
        SingularAttributeSource::new("sku").with_type("string").with_value(
            ColumnSource::new("sku_code")
                .unique()
                .with_nullable(false)
                .with_default("'n/a'")
                .with_sql_type("varchar(32)")
                .with_size(Size::length(32))
                .with_comment("stock keeping unit"),
        ),
    );

    let metadata = Binder::new().bind(&product(entity)).unwrap();

    let value = values(&metadata, "sku")[0];
    let column = metadata.database().column(value.as_column().unwrap()).unwrap();
    assert_eq!(column.name.text(), "sku_code");
    assert!(column.unique);
    assert!(!column.nullable);
    assert_eq!(column.default_value.as_deref(), Some("'n/a'"));
    assert_eq!(column.sql_type.as_deref(), Some("varchar(32)"));
    assert_eq!(column.size, Some(Size::length(32)));
    assert_eq!(column.comment.as_deref(), Some("stock keeping unit"));
}

#[test]
fn implicit_columns_are_nullable() {
    let entity = EntitySource::new("Product")
        .with_attribute(SingularAttributeSource::new("name").with_type("string"));

    let metadata = Binder::new().bind(&product(entity)).unwrap();

    let value = values(&metadata, "name")[0];
    assert!(metadata.database().column(value.as_column().unwrap()).unwrap().nullable);
}

#[test]
fn attributes_sharing_a_column_share_it() {
    let entity = EntitySource::new("Product")
        .with_attribute(SingularAttributeSource::new("code").with_type("string"))
        .with_attribute(
            SingularAttributeSource::new("legacy_code")
                .with_type("string")
                .with_column("code"),
        );

    let metadata = Binder::new().bind(&product(entity)).unwrap();

    assert_eq!(values(&metadata, "code"), values(&metadata, "legacy_code"));
    let table = metadata
        .database()
        .table(metadata.entity_binding("Product").unwrap().primary_table())
        .unwrap();
    assert_eq!(table.column_count(), 2);
}

#[test]
fn formulas_become_shared_derived_values() {
    let entity = EntitySource::new("Product")
        .with_attribute(
            SingularAttributeSource::new("gross")
                .with_type("double")
                .with_value(RelationalValueSource::formula("price * 1.2")),
        )
        .with_attribute(
            SingularAttributeSource::new("total")
                .with_type("double")
                .with_value(RelationalValueSource::formula("price * 1.2")),
        );

    let metadata = Binder::new().bind(&product(entity)).unwrap();

    let gross = values(&metadata, "gross")[0];
    let SimpleValue::Derived(derived) = gross else {
        panic!("expected a derived value, got {gross:?}");
    };
    assert_eq!(values(&metadata, "total")[0], gross);
    let table = metadata.database().table(derived.table()).unwrap();
    assert_eq!(table.derived_value(derived).unwrap().expression, "price * 1.2");
    assert_eq!(table.column_count(), 1);

    let binding = metadata.entity_binding("Product").unwrap();
    let attribute = metadata.attribute(binding.attribute("gross").unwrap()).unwrap();
    assert!(!attribute.values()[0].included_in_insert);
    assert!(!attribute.values()[0].included_in_update);
}

#[test]
fn multi_column_attribute_keeps_column_order() {
    let entity = EntitySource::new("Product").with_attribute(
        SingularAttributeSource::new("dimensions")
            .with_value(ColumnSource::new("width"))
            .with_value(ColumnSource::new("height")),
    );

    let metadata = Binder::new().bind(&product(entity)).unwrap();

    let names: Vec<_> = values(&metadata, "dimensions")
        .into_iter()
        .map(|value| {
            metadata
                .database()
                .column_name(value.as_column().unwrap())
                .unwrap()
                .text()
                .to_string()
        })
        .collect();
    assert_eq!(names, vec!["width", "height"]);
}

proptest! {
    #[test]
    fn attributes_naming_one_column_share_it(
        columns in prop::collection::vec("c_[a-d]{1,2}", 1..24)
    ) {
        let mut entity = EntitySource::new("Product");
        for (i, column) in columns.iter().enumerate() {
            entity = entity.with_attribute(
                SingularAttributeSource::new(format!("a{i}")).with_column(column.clone()),
            );
        }

        let metadata = Binder::new().bind(&product(entity)).unwrap();

        let mut by_column: HashMap<&str, SimpleValue> = HashMap::new();
        for (i, column) in columns.iter().enumerate() {
            let value = values(&metadata, &format!("a{i}"))[0];
            let shared = *by_column.entry(column.as_str()).or_insert(value);
            prop_assert_eq!(shared, value);
        }
        let table = metadata
            .database()
            .table(metadata.entity_binding("Product").unwrap().primary_table())
            .unwrap();
        prop_assert_eq!(table.column_count(), by_column.len() + 1);
    }
}

// =============================================================================
// Types
// =============================================================================

#[test]
fn resolved_type_sets_column_datatype() {
    let entity = EntitySource::new("Product")
        .with_attribute(SingularAttributeSource::new("launched").with_type("date"));

    let metadata = Binder::new().bind(&product(entity)).unwrap();

    let value = values(&metadata, "launched")[0];
    let datatype = metadata.database().datatype(value).unwrap();
    assert_eq!(datatype.type_code, SqlTypeCode::DATE);
    assert_eq!(datatype.type_name, "date");
}

#[test]
fn type_definition_supplies_implementation_and_parameters() {
    let types = BasicTypeRegistry::new().with_definition(
        TypeDefinition::new("money", "big_decimal")
            .with_parameter("scale", "2")
            .with_parameter("currency", "EUR"),
    );
    let binder = Binder::new().with_services(BindingServices::new().with_types(types));
    let entity = EntitySource::new("Product").with_attribute(
        SingularAttributeSource::new("price").with_type_information(
            ExplicitTypeSource::named("money").with_parameter("scale", "4"),
        ),
    );

    let metadata = binder.bind(&product(entity)).unwrap();

    let binding = metadata.entity_binding("Product").unwrap();
    let price = metadata.attribute(binding.attribute("price").unwrap()).unwrap();
    let descriptor = &price.type_descriptor;
    assert_eq!(descriptor.explicit_type_name.as_deref(), Some("big_decimal"));
    assert_eq!(descriptor.type_parameters.get("scale").map(String::as_str), Some("4"));
    assert_eq!(descriptor.type_parameters.get("currency").map(String::as_str), Some("EUR"));
    assert_eq!(descriptor.resolved.as_ref().unwrap().name, "big_decimal");
    assert_eq!(
        metadata.database().datatype(price.values()[0].value).map(|d| d.type_code),
        Some(SqlTypeCode::NUMERIC)
    );
}

#[test]
fn unregistered_type_stays_unresolved() {
    let entity = EntitySource::new("Product")
        .with_attribute(SingularAttributeSource::new("price").with_type("shop.Money"));

    let metadata = Binder::new().bind(&product(entity)).unwrap();

    let binding = metadata.entity_binding("Product").unwrap();
    let price = metadata.attribute(binding.attribute("price").unwrap()).unwrap();
    assert_eq!(price.type_descriptor.explicit_type_name.as_deref(), Some("shop.Money"));
    assert!(!price.type_descriptor.is_resolved());
    assert!(metadata.database().datatype(price.values()[0].value).is_none());
}

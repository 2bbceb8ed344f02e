//! Integration tests for identifiers, versions, and generators

use metabind::binder::{
    Binder, BinderOptions, BindingServices, ClassCatalog, ClassDescriptor,
    DEFAULT_GENERATOR_NAME, DefaultIdentifierGeneratorFactory, ENTITY_NAME,
    IDENTIFIER_NORMALIZER, MemberType, PREFER_POOLED_VALUES_LO,
};
use metabind::foundation::{ErrorKind, IdGenerator, Identifier};
use metabind::relational::SqlTypeCode;
use metabind::source::{
    EntityHierarchy, EntitySource, IdentifierSource, RootEntitySource, SingularAttributeSource,
};

fn person(identifier: IdentifierSource) -> Vec<EntityHierarchy> {
    vec![EntityHierarchy::single(RootEntitySource::new(
        EntitySource::new("Person").with_class("shop.Person"),
        identifier,
    ))]
}

// =============================================================================
// Simple Identifiers
// =============================================================================

#[test]
fn implicit_identifier_column_becomes_primary_key() {
    let catalog = ClassCatalog::new().with_class(
        "shop.Person",
        ClassDescriptor::new().with_field("id", MemberType::simple("i32")),
    );
    let binder =
        Binder::new().with_services(BindingServices::new().with_introspector(catalog));

    let metadata = binder
        .bind(&person(IdentifierSource::simple(SingularAttributeSource::new("id"))))
        .unwrap();

    let entity = metadata.entity_binding("Person").unwrap();
    let table = metadata.database().table(entity.primary_table()).unwrap();
    assert_eq!(table.name().text(), "Person");
    assert_eq!(table.primary_key.columns.len(), 1);
    let column = table.column(table.primary_key.columns[0]).unwrap();
    assert_eq!(column.name, Identifier::parse("id"));

    let details = metadata.hierarchy_of(metadata.entity_id("Person").unwrap()).unwrap();
    let identifier = details.identifier.as_ref().unwrap();
    assert_eq!(identifier.generator_descriptor.name, DEFAULT_GENERATOR_NAME);
    assert_eq!(identifier.generator_descriptor.strategy, "assigned");
    assert_eq!(
        identifier.generator_descriptor.parameters.get(ENTITY_NAME).map(String::as_str),
        Some("Person")
    );

    let id = metadata.attribute(identifier.attribute).unwrap();
    let resolved = id.type_descriptor.resolved.as_ref().unwrap();
    assert_eq!(resolved.name, "integer");
    assert_eq!(column.datatype.as_ref().unwrap().type_code, SqlTypeCode::INTEGER);
}

#[test]
fn identifier_columns_follow_explicit_names() {
    let metadata = Binder::new()
        .bind(&person(IdentifierSource::simple(
            SingularAttributeSource::new("id")
                .with_type("long")
                .with_column("person_id"),
        )))
        .unwrap();

    let entity = metadata.entity_binding("Person").unwrap();
    let table = metadata.database().table(entity.primary_table()).unwrap();
    let column = table.column(table.primary_key.columns[0]).unwrap();
    assert_eq!(column.name.text(), "person_id");
}

#[test]
fn formula_identifier_is_rejected() {
    let identifier = IdentifierSource::simple(
        SingularAttributeSource::new("id")
            .with_value(metabind::source::RelationalValueSource::formula("next_id()")),
    );

    let err = Binder::new().bind(&person(identifier)).unwrap_err();
    assert!(err.is_contract_violation());
}

#[test]
fn composite_identifiers_are_not_yet_implemented() {
    let aggregated = IdentifierSource::AggregatedComposite(
        metabind::source::ComponentAttributeSource::new("key"),
    );
    let err = Binder::new().bind(&person(aggregated)).unwrap_err();
    assert!(err.is_not_yet_implemented());

    let non_aggregated =
        IdentifierSource::NonAggregatedComposite(vec![SingularAttributeSource::new("a")]);
    let err = Binder::new().bind(&person(non_aggregated)).unwrap_err();
    assert!(err.is_not_yet_implemented());
}

// =============================================================================
// Generators
// =============================================================================

#[test]
fn generator_settings_merge_in_order() {
    let generator = IdGenerator::new("person_seq", "sequence")
        .with_parameter("sequence_name", "person_seq")
        .with_parameter(PREFER_POOLED_VALUES_LO, "true");
    let options = BinderOptions::quoted()
        .with_generator_setting("increment_size", "50")
        .with_generator_setting(PREFER_POOLED_VALUES_LO, "false");

    let metadata = Binder::new()
        .with_options(options)
        .bind(&person(IdentifierSource::generated(
            SingularAttributeSource::new("id").with_type("long"),
            generator,
        )))
        .unwrap();

    let details = metadata.hierarchy_of(metadata.entity_id("Person").unwrap()).unwrap();
    let generator = details.identifier.as_ref().unwrap().generator.as_ref().unwrap();
    assert_eq!(generator.strategy(), "sequence");
    assert!(!generator.is_post_insert());
    let settings = generator.settings();
    assert_eq!(settings.get("sequence_name").map(String::as_str), Some("person_seq"));
    assert_eq!(settings.get("increment_size").map(String::as_str), Some("50"));
    assert_eq!(settings.get(PREFER_POOLED_VALUES_LO).map(String::as_str), Some("true"));
    assert_eq!(settings.get(IDENTIFIER_NORMALIZER).map(String::as_str), Some("quoted"));
    assert_eq!(settings.get(ENTITY_NAME).map(String::as_str), Some("Person"));
}

#[test]
fn identity_generator_is_post_insert() {
    let metadata = Binder::new()
        .bind(&person(IdentifierSource::generated(
            SingularAttributeSource::new("id").with_type("long"),
            IdGenerator::new("person_identity", "identity"),
        )))
        .unwrap();

    let details = metadata.hierarchy_of(metadata.entity_id("Person").unwrap()).unwrap();
    let generator = details.identifier.as_ref().unwrap().generator.as_ref().unwrap();
    assert!(generator.is_post_insert());
}

#[test]
fn unknown_generator_strategy_fails() {
    let err = Binder::new()
        .bind(&person(IdentifierSource::generated(
            SingularAttributeSource::new("id").with_type("long"),
            IdGenerator::new("hilo_gen", "hilo"),
        )))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownGeneratorStrategy(ref s) if s == "hilo"));
}

#[test]
fn registered_strategies_are_available() {
    let services = BindingServices::new()
        .with_generators(DefaultIdentifierGeneratorFactory::new().with_strategy("hilo", false));
    let metadata = Binder::new()
        .with_services(services)
        .bind(&person(IdentifierSource::generated(
            SingularAttributeSource::new("id").with_type("long"),
            IdGenerator::new("hilo_gen", "hilo"),
        )))
        .unwrap();

    let details = metadata.hierarchy_of(metadata.entity_id("Person").unwrap()).unwrap();
    assert!(details.identifier.as_ref().unwrap().generator.is_some());
}

// =============================================================================
// Versions
// =============================================================================

#[test]
fn version_is_recorded_on_hierarchy() {
    let root = RootEntitySource::new(
        EntitySource::new("Person"),
        IdentifierSource::simple(SingularAttributeSource::new("id").with_type("long")),
    )
    .with_version(SingularAttributeSource::new("revision").with_type("integer"));

    let metadata = Binder::new().bind(&[EntityHierarchy::single(root)]).unwrap();

    let entity_id = metadata.entity_id("Person").unwrap();
    let details = metadata.hierarchy_of(entity_id).unwrap();
    let version = metadata.attribute(details.version.unwrap()).unwrap();
    assert_eq!(version.name(), "revision");
    assert_eq!(metadata.entity(entity_id).unwrap().attributes().len(), 2);
}

//! Collection binding: collection table, key, and elements.
//!
//! Bags and sets of basic values are supported. Lists and maps, and every
//! element nature other than basic, fail as not yet implemented.

use metabind_binding::{
    AttributeBindingId, AttributeBindingKind, BasicCollectionElement, CollectionElement,
    CollectionKey, CollectionNature, ContainerRef, DomainAttributeKind, EntityBindingId,
    HierarchyDetails, PluralAttributeBinding, RelationalValueBinding, TypeDescriptor,
};
use metabind_foundation::{Error, ErrorKind, KeySide, MetaAttributeContext, Result};
use metabind_relational::{ColumnId, ForeignKeyId, SimpleValue, TableId};
use metabind_source::{
    ColumnBindingDefaults, PluralAttributeElementNature, PluralAttributeElementSource,
    PluralAttributeKeySource, PluralAttributeNature, PluralAttributeSource, RelationalValueSource,
    TableSource,
};

use crate::session::BindingSession;
use crate::typing::apply_explicit_type;

/// Column name given to a basic element without columns.
const ELEMENT_COLUMN: &str = "elt";

const KEY_DEFAULTS: ColumnBindingDefaults = ColumnBindingDefaults::COLLECTION_KEY;

impl BindingSession<'_> {
    /// Binds a bag or set attribute and registers it by role.
    pub(crate) fn bind_plural_attribute(
        &mut self,
        container: ContainerRef,
        source: &PluralAttributeSource,
        meta: &MetaAttributeContext,
    ) -> Result<AttributeBindingId> {
        let nature = match source.nature {
            PluralAttributeNature::Bag => CollectionNature::Bag,
            PluralAttributeNature::Set => CollectionNature::Set,
            PluralAttributeNature::List | PluralAttributeNature::Map => {
                return Err(Error::not_yet_implemented(format!(
                    "{} collections",
                    source.nature
                )));
            }
        };
        let owner = self.owning_entity(container)?;
        let role = format!("{}.{}", self.container_path(container)?, source.name);
        log::debug!("binding collection {role}");

        self.create_domain_attribute(container, &source.name, DomainAttributeKind::Plural, false)?;
        let id = self.add_attribute(
            container,
            &source.name,
            AttributeBindingKind::Plural(plural_binding(nature, source)),
        )?;
        self.apply_attribute_settings(
            id,
            source.property_accessor_name.as_deref(),
            source.included_in_optimistic_locking,
            meta,
            &source.meta_attributes,
        )?;
        {
            let services = self.services;
            let descriptor = &mut self.attribute_mut(id)?.type_descriptor;
            descriptor.declared_type_name = Some(source.nature.reported_type_name().to_string());
            apply_explicit_type(services.types.as_ref(), descriptor, &source.type_information);
        }

        let collection_table =
            if source.element.nature() == PluralAttributeElementNature::OneToMany {
                None
            } else {
                Some(self.bind_collection_table(id, owner, &role, source)?)
            };
        if let Some(table) = collection_table {
            self.bind_collection_key(id, owner, table, &role, &source.key)?;
        }
        self.bind_collection_element(id, container, collection_table, &role, source)?;

        self.metadata.add_collection(role, id);
        Ok(id)
    }

    fn plural_mut(&mut self, id: AttributeBindingId) -> Result<&mut PluralAttributeBinding> {
        self.attribute_mut(id)?
            .as_plural_mut()
            .ok_or_else(|| Error::contract_violation(format!("{id:?} is not a collection")))
    }

    // =========================================================================
    // Collection Table
    // =========================================================================

    fn bind_collection_table(
        &mut self,
        collection: AttributeBindingId,
        owner: EntityBindingId,
        role: &str,
        source: &PluralAttributeSource,
    ) -> Result<TableId> {
        let (owner_name, owner_table) = {
            let binding = self.entity(owner)?;
            (
                binding.entity_name().to_string(),
                binding.primary_table_name().to_string(),
            )
        };
        let table_source = TableSource {
            explicit_schema_name: source.explicit_schema_name.clone(),
            explicit_catalog_name: source.explicit_catalog_name.clone(),
            explicit_table_name: source.explicit_collection_table_name.clone(),
            logical_name: None,
        };
        let (table, _) = self.create_table(&table_source, |naming| {
            naming.collection_table_name(&owner_name, Some(&owner_table), None, None, role)
        });

        let collection_table = self.table_mut(table)?;
        if let Some(comment) = &source.collection_table_comment {
            collection_table.add_comment(comment.clone());
        }
        if let Some(check) = &source.collection_table_check {
            collection_table.add_check_constraint(check.clone());
        }
        self.plural_mut(collection)?.collection_table = Some(table);
        Ok(table)
    }

    // =========================================================================
    // Key
    // =========================================================================

    fn bind_collection_key(
        &mut self,
        collection: AttributeBindingId,
        owner: EntityBindingId,
        table: TableId,
        role: &str,
        key: &PluralAttributeKeySource,
    ) -> Result<()> {
        let referenced_attribute = self.collection_key_target(owner, role, key)?;
        let targets = self.metadata.flattened_values(referenced_attribute);
        let target_table = match targets.first() {
            Some(target) => target.value.table(),
            None => self.entity(owner)?.primary_table(),
        };

        let foreign_key = {
            let collection_table = self.table_mut(table)?;
            let foreign_key = collection_table
                .create_foreign_key(target_table, key.explicit_foreign_key_name.clone());
            if let Some(constraint) = collection_table.foreign_key_mut(foreign_key) {
                constraint.delete_rule = key.on_delete;
            }
            foreign_key
        };

        let values = if key.value_sources.is_empty() {
            self.synthesize_key_columns(table, foreign_key, role, &targets)?
        } else {
            self.bind_key_columns(table, foreign_key, role, &key.value_sources, &targets)?
        };
        self.plural_mut(collection)?.key = Some(CollectionKey {
            foreign_key,
            referenced_attribute,
            values,
        });
        Ok(())
    }

    /// The owner attribute a collection key references.
    fn collection_key_target(
        &self,
        owner: EntityBindingId,
        role: &str,
        key: &PluralAttributeKeySource,
    ) -> Result<AttributeBindingId> {
        let Some(name) = key.referenced_attribute_name.as_deref() else {
            return self
                .metadata
                .hierarchy_of(owner)
                .and_then(HierarchyDetails::identifier_attribute)
                .ok_or_else(|| {
                    Error::contract_violation(format!(
                        "collection {role} is owned by an entity without an identifier"
                    ))
                });
        };
        let attribute = self.metadata.locate_attribute(owner, name).ok_or_else(|| {
            Error::unknown_attribute(
                self.metadata
                    .entity(owner)
                    .map(|binding| binding.entity_name().to_string())
                    .unwrap_or_default(),
                name,
            )
        })?;
        if !self.attribute(attribute)?.is_singular() {
            return Err(Error::new(ErrorKind::PluralPropertyReference {
                role: role.to_string(),
                attribute: name.to_string(),
            }));
        }
        Ok(attribute)
    }

    /// Pairs declared key values with target values by position.
    fn bind_key_columns(
        &mut self,
        table: TableId,
        foreign_key: ForeignKeyId,
        role: &str,
        sources: &[RelationalValueSource],
        targets: &[RelationalValueBinding],
    ) -> Result<Vec<RelationalValueBinding>> {
        let mut targets = targets.iter();
        let mut values = Vec::with_capacity(sources.len());
        for source in sources {
            let target = targets
                .next()
                .ok_or_else(|| Error::key_cardinality_mismatch(role, KeySide::Source))?;
            let column = match source {
                RelationalValueSource::Column(column) => column,
                RelationalValueSource::Derived(derived) => {
                    log::warn!(
                        "collection {role}: derived key value ({}) is not supported; skipped",
                        derived.expression
                    );
                    continue;
                }
            };
            let target_column = match target.value {
                SimpleValue::Column(target_column) => target_column,
                SimpleValue::Derived(derived) => {
                    let expression = self
                        .metadata
                        .database()
                        .table(derived.table())
                        .and_then(|t| t.derived_value(derived))
                        .map(|d| d.expression.clone())
                        .unwrap_or_default();
                    return Err(Error::new(ErrorKind::KeyTypeMismatch {
                        role: role.to_string(),
                        column: column.name.clone(),
                        expression,
                    }));
                }
            };
            let id = self.bind_column(table, column, KEY_DEFAULTS)?;
            self.map_key_column(table, foreign_key, id, target_column)?;
            values.push(RelationalValueBinding::column(
                id,
                column.included_in_insert.decode(KEY_DEFAULTS.included_in_insert),
                column.included_in_update.decode(KEY_DEFAULTS.included_in_update),
            ));
        }
        if targets.next().is_some() {
            return Err(Error::key_cardinality_mismatch(role, KeySide::Target));
        }
        Ok(values)
    }

    /// Creates one key column per target column, named after the target.
    fn synthesize_key_columns(
        &mut self,
        table: TableId,
        foreign_key: ForeignKeyId,
        role: &str,
        targets: &[RelationalValueBinding],
    ) -> Result<Vec<RelationalValueBinding>> {
        let mut values = Vec::with_capacity(targets.len());
        for target in targets {
            let SimpleValue::Column(target_column) = target.value else {
                log::warn!(
                    "collection {role}: no key column can reference a derived value; skipped"
                );
                continue;
            };
            let target_name = self
                .metadata
                .database()
                .column_name(target_column)
                .map(|name| name.text().to_string())
                .ok_or_else(|| Error::contract_violation(format!("no column {target_column:?}")))?;
            let name = self.services.naming.column_name(&target_name);
            let id = self.locate_or_create_column(table, &name)?;
            if let Some(column) = self.metadata.database_mut().column_mut(id) {
                column.nullable = KEY_DEFAULTS.nullable;
            }
            self.map_key_column(table, foreign_key, id, target_column)?;
            values.push(RelationalValueBinding::column(
                id,
                KEY_DEFAULTS.included_in_insert,
                KEY_DEFAULTS.included_in_update,
            ));
        }
        Ok(values)
    }

    fn map_key_column(
        &mut self,
        table: TableId,
        foreign_key: ForeignKeyId,
        source: ColumnId,
        target: ColumnId,
    ) -> Result<()> {
        let constraint = self
            .table_mut(table)?
            .foreign_key_mut(foreign_key)
            .ok_or_else(|| Error::contract_violation(format!("no foreign key {foreign_key:?}")))?;
        constraint.add_column_mapping(source, target);
        Ok(())
    }

    // =========================================================================
    // Elements
    // =========================================================================

    fn bind_collection_element(
        &mut self,
        collection: AttributeBindingId,
        container: ContainerRef,
        table: Option<TableId>,
        role: &str,
        source: &PluralAttributeSource,
    ) -> Result<()> {
        let element = match &source.element {
            PluralAttributeElementSource::Basic(element) => element,
            other => {
                return Err(Error::not_yet_implemented(format!(
                    "{} collection elements",
                    other.nature()
                )));
            }
        };
        let table = table.ok_or_else(|| {
            Error::contract_violation(format!("collection {role} has no collection table"))
        })?;

        let mut descriptor = TypeDescriptor::new();
        descriptor.declared_type_name = self
            .container_class(container)
            .and_then(|class| self.services.introspector.element_type(&class, &source.name));
        apply_explicit_type(
            self.services.types.as_ref(),
            &mut descriptor,
            &element.type_information,
        );
        let values = self.bind_table_values(
            table,
            &element.value_sources,
            element.column_defaults,
            ELEMENT_COLUMN,
        )?;
        self.resolve_type(&mut descriptor, &values, &format!("elements of {role}"));

        self.plural_mut(collection)?.element = Some(CollectionElement::Basic(
            BasicCollectionElement {
                type_descriptor: descriptor,
                values,
            },
        ));
        Ok(())
    }
}

/// The collection-level settings copied straight from the source.
fn plural_binding(
    nature: CollectionNature,
    source: &PluralAttributeSource,
) -> PluralAttributeBinding {
    let mut binding = PluralAttributeBinding::new(nature);
    binding.fetch_timing = source.fetch_timing;
    binding.fetch_style = source.fetch_style;
    binding.caching.clone_from(&source.caching);
    binding
        .custom_persister_class_name
        .clone_from(&source.custom_persister_class_name);
    binding.custom_loader_name.clone_from(&source.custom_loader_name);
    binding.custom_sql_insert.clone_from(&source.custom_sql_insert);
    binding.custom_sql_update.clone_from(&source.custom_sql_update);
    binding.custom_sql_delete.clone_from(&source.custom_sql_delete);
    binding.custom_sql_delete_all.clone_from(&source.custom_sql_delete_all);
    binding.where_filter.clone_from(&source.where_filter);
    if source.sorted {
        binding.sorted = true;
        binding.comparator_name.clone_from(&source.comparator_name);
    } else {
        binding.order_by.clone_from(&source.order_by);
    }
    binding
}

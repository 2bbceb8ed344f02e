//! Entity bindings.

use std::collections::HashMap;
use std::fmt;

use metabind_foundation::{CustomSql, MetaAttributeContext};
use metabind_relational::TableId;

use crate::attribute::AttributeBindingId;
use crate::domain::AttributeContainer;
use crate::hierarchy::HierarchyId;

/// Identifies an entity binding in [`Metadata`](crate::Metadata).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityBindingId(pub(crate) u32);

impl EntityBindingId {
    /// Returns the raw index of this binding.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for EntityBindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityBindingId({})", self.0)
    }
}

/// A bound entity.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityBinding {
    entity: AttributeContainer,
    hierarchy: HierarchyId,
    super_entity: Option<EntityBindingId>,
    sub_entities: Vec<EntityBindingId>,
    primary_table: TableId,
    primary_table_name: String,
    secondary_tables: Vec<(String, TableId)>,
    attributes: Vec<AttributeBindingId>,
    attribute_index: HashMap<String, AttributeBindingId>,
    /// Name used in JPA queries.
    pub jpa_entity_name: Option<String>,
    /// Discriminator value identifying this entity.
    pub discriminator_match_value: Option<String>,
    /// Meta attributes.
    pub meta: MetaAttributeContext,
    /// Lazily loaded through a proxy.
    pub lazy: bool,
    /// Proxy interface name.
    pub proxy_interface_name: Option<String>,
    /// Custom entity persister class.
    pub custom_persister_class_name: Option<String>,
    /// Custom tuplizer class.
    pub custom_tuplizer_class_name: Option<String>,
    /// Generate inserts per instance.
    pub dynamic_insert: bool,
    /// Generate updates per instance.
    pub dynamic_update: bool,
    /// Batch fetch size.
    pub batch_size: Option<u32>,
    /// Select before updating detached instances.
    pub select_before_update: bool,
    /// Never instantiated directly.
    pub is_abstract: bool,
    /// Named custom loader.
    pub custom_loader_name: Option<String>,
    /// Custom insert statement.
    pub custom_sql_insert: Option<CustomSql>,
    /// Custom update statement.
    pub custom_sql_update: Option<CustomSql>,
    /// Custom delete statement.
    pub custom_sql_delete: Option<CustomSql>,
    /// Tables whose changes invalidate this entity.
    pub synchronized_table_names: Vec<String>,
}

impl EntityBinding {
    /// Creates a binding for `entity` stored in `primary_table`.
    #[must_use]
    pub fn new(
        entity: AttributeContainer,
        hierarchy: HierarchyId,
        super_entity: Option<EntityBindingId>,
        primary_table: TableId,
        primary_table_name: impl Into<String>,
    ) -> Self {
        Self {
            entity,
            hierarchy,
            super_entity,
            sub_entities: Vec::new(),
            primary_table,
            primary_table_name: primary_table_name.into(),
            secondary_tables: Vec::new(),
            attributes: Vec::new(),
            attribute_index: HashMap::new(),
            jpa_entity_name: None,
            discriminator_match_value: None,
            meta: MetaAttributeContext::new(),
            lazy: false,
            proxy_interface_name: None,
            custom_persister_class_name: None,
            custom_tuplizer_class_name: None,
            dynamic_insert: false,
            dynamic_update: false,
            batch_size: None,
            select_before_update: false,
            is_abstract: false,
            custom_loader_name: None,
            custom_sql_insert: None,
            custom_sql_update: None,
            custom_sql_delete: None,
            synchronized_table_names: Vec::new(),
        }
    }

    /// Returns the entity name.
    #[must_use]
    pub fn entity_name(&self) -> &str {
        self.entity.name()
    }

    /// Returns the mapped class; absent in map mode.
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        self.entity.class_name()
    }

    /// Returns the domain container.
    #[must_use]
    pub fn entity(&self) -> &AttributeContainer {
        &self.entity
    }

    /// Returns the domain container mutably.
    pub fn entity_mut(&mut self) -> &mut AttributeContainer {
        &mut self.entity
    }

    /// Returns the hierarchy this entity belongs to.
    #[must_use]
    pub fn hierarchy(&self) -> HierarchyId {
        self.hierarchy
    }

    /// Returns the superclass binding.
    #[must_use]
    pub fn super_entity(&self) -> Option<EntityBindingId> {
        self.super_entity
    }

    /// Returns direct subclass bindings in binding order.
    #[must_use]
    pub fn sub_entities(&self) -> &[EntityBindingId] {
        &self.sub_entities
    }

    pub(crate) fn add_sub_entity(&mut self, id: EntityBindingId) {
        if !self.sub_entities.contains(&id) {
            self.sub_entities.push(id);
        }
    }

    /// Returns the primary table.
    #[must_use]
    pub fn primary_table(&self) -> TableId {
        self.primary_table
    }

    /// Returns the primary table's logical name.
    #[must_use]
    pub fn primary_table_name(&self) -> &str {
        &self.primary_table_name
    }

    /// Adds a secondary table under its logical name.
    pub fn add_secondary_table(&mut self, logical_name: impl Into<String>, table: TableId) {
        let logical_name = logical_name.into();
        match self.secondary_tables.iter_mut().find(|(name, _)| *name == logical_name) {
            Some(entry) => entry.1 = table,
            None => self.secondary_tables.push((logical_name, table)),
        }
    }

    /// Returns secondary tables in declaration order.
    pub fn secondary_tables(&self) -> impl Iterator<Item = (&str, TableId)> {
        self.secondary_tables
            .iter()
            .map(|(name, table)| (name.as_str(), *table))
    }

    /// Locates a table by logical name.
    ///
    /// `None`, or the primary table's own name, is the primary table.
    #[must_use]
    pub fn locate_table(&self, logical_name: Option<&str>) -> Option<TableId> {
        match logical_name {
            None => Some(self.primary_table),
            Some(name) if name == self.primary_table_name => Some(self.primary_table),
            Some(name) => self
                .secondary_tables
                .iter()
                .find(|(logical, _)| logical == name)
                .map(|(_, table)| *table),
        }
    }

    /// Looks up a directly declared attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<AttributeBindingId> {
        self.attribute_index.get(name).copied()
    }

    /// Returns directly declared attributes in binding order.
    #[must_use]
    pub fn attributes(&self) -> &[AttributeBindingId] {
        &self.attributes
    }

    pub(crate) fn add_attribute(&mut self, name: &str, id: AttributeBindingId) {
        self.attributes.push(id);
        self.attribute_index.insert(name.to_string(), id);
    }
}

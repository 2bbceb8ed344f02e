//! Collection attribute sources.

use std::fmt;

use metabind_foundation::{
    Caching, CustomSql, FetchStyle, FetchTiming, MetaAttributeSource, OnDeleteAction,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::attribute::{ColumnBindingDefaults, ComponentAttributeSource, ExplicitTypeSource};
use crate::relational::RelationalValueSource;

/// Collection semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PluralAttributeNature {
    /// Unordered, duplicates allowed.
    Bag,
    /// Unordered, no duplicates.
    Set,
    /// Indexed by position.
    List,
    /// Indexed by key.
    Map,
}

impl PluralAttributeNature {
    /// The collection type name reported on the binding's type descriptor.
    #[must_use]
    pub fn reported_type_name(self) -> &'static str {
        match self {
            Self::Bag => "collection",
            Self::Set => "set",
            Self::List => "list",
            Self::Map => "map",
        }
    }

    /// Returns true for natures that need an index.
    #[must_use]
    pub fn is_indexed(self) -> bool {
        matches!(self, Self::List | Self::Map)
    }
}

impl fmt::Display for PluralAttributeNature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bag => "bag",
            Self::Set => "set",
            Self::List => "list",
            Self::Map => "map",
        };
        f.write_str(name)
    }
}

/// What a collection holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PluralAttributeElementNature {
    /// Scalar values.
    Basic,
    /// Embedded components.
    Component,
    /// Entities owning the foreign key.
    OneToMany,
    /// Entities through a link table.
    ManyToMany,
    /// Heterogeneous entity references.
    ManyToAny,
}

impl fmt::Display for PluralAttributeElementNature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Basic => "basic",
            Self::Component => "component",
            Self::OneToMany => "one-to-many",
            Self::ManyToMany => "many-to-many",
            Self::ManyToAny => "many-to-any",
        };
        f.write_str(name)
    }
}

/// Scalar collection elements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BasicPluralElementSource {
    /// Explicit element type.
    pub type_information: ExplicitTypeSource,
    /// Element columns; a default column is synthesized when empty.
    pub value_sources: Vec<RelationalValueSource>,
    /// Defaults for flags the value sources leave unspecified.
    pub column_defaults: ColumnBindingDefaults,
}

impl BasicPluralElementSource {
    /// Sets the explicit element type.
    #[must_use]
    pub fn with_type(mut self, name: impl Into<String>) -> Self {
        self.type_information.name = Some(name.into());
        self
    }

    /// Adds an element column.
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>) -> Self {
        self.value_sources.push(RelationalValueSource::column(name));
        self
    }
}

/// The element description of a collection.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PluralAttributeElementSource {
    /// Scalar values.
    Basic(BasicPluralElementSource),
    /// Embedded components.
    Component(ComponentAttributeSource),
    /// Entities owning the key.
    OneToMany {
        /// Element entity.
        referenced_entity_name: String,
    },
    /// Entities through the collection table.
    ManyToMany {
        /// Element entity.
        referenced_entity_name: String,
        /// Link columns.
        value_sources: Vec<RelationalValueSource>,
    },
    /// Heterogeneous entity references.
    ManyToAny,
}

impl PluralAttributeElementSource {
    /// Returns the element nature.
    #[must_use]
    pub fn nature(&self) -> PluralAttributeElementNature {
        match self {
            Self::Basic(_) => PluralAttributeElementNature::Basic,
            Self::Component(_) => PluralAttributeElementNature::Component,
            Self::OneToMany { .. } => PluralAttributeElementNature::OneToMany,
            Self::ManyToMany { .. } => PluralAttributeElementNature::ManyToMany,
            Self::ManyToAny => PluralAttributeElementNature::ManyToAny,
        }
    }
}

/// The collection key: the foreign key from the collection table to its owner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PluralAttributeKeySource {
    /// Foreign key constraint name.
    pub explicit_foreign_key_name: Option<String>,
    /// Delete rule.
    pub on_delete: OnDeleteAction,
    /// Owner attribute the key references (property-ref); the identifier when absent.
    pub referenced_attribute_name: Option<String>,
    /// Key columns; synthesized from the target when empty.
    pub value_sources: Vec<RelationalValueSource>,
}

impl PluralAttributeKeySource {
    /// Adds a key column.
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>) -> Self {
        self.value_sources.push(RelationalValueSource::column(name));
        self
    }

    /// Targets a non-identifier owner attribute.
    #[must_use]
    pub fn with_property_ref(mut self, attribute_name: impl Into<String>) -> Self {
        self.referenced_attribute_name = Some(attribute_name.into());
        self
    }

    /// Names the foreign key.
    #[must_use]
    pub fn with_foreign_key_name(mut self, name: impl Into<String>) -> Self {
        self.explicit_foreign_key_name = Some(name.into());
        self
    }

    /// Sets the delete rule.
    #[must_use]
    pub fn with_on_delete(mut self, action: OnDeleteAction) -> Self {
        self.on_delete = action;
        self
    }
}

/// A collection attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PluralAttributeSource {
    /// Attribute name.
    pub name: String,
    /// Collection semantics.
    pub nature: PluralAttributeNature,
    /// Element description.
    pub element: PluralAttributeElementSource,
    /// Key description.
    pub key: PluralAttributeKeySource,
    /// Explicit collection table name.
    pub explicit_collection_table_name: Option<String>,
    /// Explicit collection table schema.
    pub explicit_schema_name: Option<String>,
    /// Explicit collection table catalog.
    pub explicit_catalog_name: Option<String>,
    /// Collection table comment.
    pub collection_table_comment: Option<String>,
    /// Collection table check constraint.
    pub collection_table_check: Option<String>,
    /// SQL restriction applied when loading.
    pub where_filter: Option<String>,
    /// Fetch timing.
    pub fetch_timing: FetchTiming,
    /// Fetch style.
    pub fetch_style: FetchStyle,
    /// Second-level cache settings.
    pub caching: Option<Caching>,
    /// Explicit collection type.
    pub type_information: ExplicitTypeSource,
    /// Custom collection persister class.
    pub custom_persister_class_name: Option<String>,
    /// Named custom loader.
    pub custom_loader_name: Option<String>,
    /// Custom insert statement.
    pub custom_sql_insert: Option<CustomSql>,
    /// Custom update statement.
    pub custom_sql_update: Option<CustomSql>,
    /// Custom delete statement.
    pub custom_sql_delete: Option<CustomSql>,
    /// Custom delete-all statement.
    pub custom_sql_delete_all: Option<CustomSql>,
    /// In-memory sorting.
    pub sorted: bool,
    /// Comparator used when sorted.
    pub comparator_name: Option<String>,
    /// SQL ordering applied when loading.
    pub order_by: Option<String>,
    /// Explicit property accessor strategy.
    pub property_accessor_name: Option<String>,
    /// Participates in optimistic lock checks.
    pub included_in_optimistic_locking: bool,
    /// Meta attributes.
    pub meta_attributes: Vec<MetaAttributeSource>,
}

impl PluralAttributeSource {
    /// Creates a collection of the given nature holding `element`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        nature: PluralAttributeNature,
        element: PluralAttributeElementSource,
    ) -> Self {
        Self {
            name: name.into(),
            nature,
            element,
            key: PluralAttributeKeySource::default(),
            explicit_collection_table_name: None,
            explicit_schema_name: None,
            explicit_catalog_name: None,
            collection_table_comment: None,
            collection_table_check: None,
            where_filter: None,
            fetch_timing: FetchTiming::Delayed,
            fetch_style: FetchStyle::Select,
            caching: None,
            type_information: ExplicitTypeSource::default(),
            custom_persister_class_name: None,
            custom_loader_name: None,
            custom_sql_insert: None,
            custom_sql_update: None,
            custom_sql_delete: None,
            custom_sql_delete_all: None,
            sorted: false,
            comparator_name: None,
            order_by: None,
            property_accessor_name: None,
            included_in_optimistic_locking: true,
            meta_attributes: Vec::new(),
        }
    }

    /// Creates a set of scalar values.
    #[must_use]
    pub fn basic_set(name: impl Into<String>, element: BasicPluralElementSource) -> Self {
        Self::new(
            name,
            PluralAttributeNature::Set,
            PluralAttributeElementSource::Basic(element),
        )
    }

    /// Creates a bag of scalar values.
    #[must_use]
    pub fn basic_bag(name: impl Into<String>, element: BasicPluralElementSource) -> Self {
        Self::new(
            name,
            PluralAttributeNature::Bag,
            PluralAttributeElementSource::Basic(element),
        )
    }

    /// Sets the key.
    #[must_use]
    pub fn with_key(mut self, key: PluralAttributeKeySource) -> Self {
        self.key = key;
        self
    }

    /// Sets the collection table name.
    #[must_use]
    pub fn with_table(mut self, name: impl Into<String>) -> Self {
        self.explicit_collection_table_name = Some(name.into());
        self
    }

    /// Sets the collection table schema.
    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.explicit_schema_name = Some(schema.into());
        self
    }

    /// Sets the collection table comment.
    #[must_use]
    pub fn with_table_comment(mut self, comment: impl Into<String>) -> Self {
        self.collection_table_comment = Some(comment.into());
        self
    }

    /// Sets the collection table check constraint.
    #[must_use]
    pub fn with_table_check(mut self, check: impl Into<String>) -> Self {
        self.collection_table_check = Some(check.into());
        self
    }

    /// Sets the loading restriction.
    #[must_use]
    pub fn with_where(mut self, where_filter: impl Into<String>) -> Self {
        self.where_filter = Some(where_filter.into());
        self
    }

    /// Sorts in memory with the named comparator.
    #[must_use]
    pub fn sorted_by(mut self, comparator_name: impl Into<String>) -> Self {
        self.sorted = true;
        self.comparator_name = Some(comparator_name.into());
        self
    }

    /// Orders by a SQL fragment when loading.
    #[must_use]
    pub fn ordered_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    /// Sets second-level caching.
    #[must_use]
    pub fn with_caching(mut self, caching: Caching) -> Self {
        self.caching = Some(caching);
        self
    }

    /// Sets fetch timing and style.
    #[must_use]
    pub fn with_fetch(mut self, timing: FetchTiming, style: FetchStyle) -> Self {
        self.fetch_timing = timing;
        self.fetch_style = style;
        self
    }

    /// Sets the custom collection persister class.
    #[must_use]
    pub fn with_persister(mut self, class_name: impl Into<String>) -> Self {
        self.custom_persister_class_name = Some(class_name.into());
        self
    }

    /// Sets the custom insert statement.
    #[must_use]
    pub fn with_custom_insert(mut self, sql: CustomSql) -> Self {
        self.custom_sql_insert = Some(sql);
        self
    }

    /// Sets the custom delete-all statement.
    #[must_use]
    pub fn with_custom_delete_all(mut self, sql: CustomSql) -> Self {
        self.custom_sql_delete_all = Some(sql);
        self
    }

    /// Adds a meta attribute.
    #[must_use]
    pub fn with_meta(mut self, meta: MetaAttributeSource) -> Self {
        self.meta_attributes.push(meta);
        self
    }
}

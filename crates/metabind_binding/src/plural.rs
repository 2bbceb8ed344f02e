//! Collection bindings.

use std::fmt;

use metabind_foundation::{Caching, CustomSql, FetchStyle, FetchTiming};
use metabind_relational::{ForeignKeyId, TableId};

use crate::attribute::{AttributeBindingId, RelationalValueBinding};
use crate::types::TypeDescriptor;

/// Collection semantics the binder supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollectionNature {
    /// Unordered, duplicates allowed.
    Bag,
    /// Unordered, no duplicates.
    Set,
}

impl fmt::Display for CollectionNature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bag => f.write_str("bag"),
            Self::Set => f.write_str("set"),
        }
    }
}

/// The foreign key from a collection table to its owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionKey {
    /// The foreign key on the collection table.
    pub foreign_key: ForeignKeyId,
    /// Owner attribute the key references.
    pub referenced_attribute: AttributeBindingId,
    /// Key values in order.
    pub values: Vec<RelationalValueBinding>,
}

/// Scalar collection elements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BasicCollectionElement {
    /// Element type information.
    pub type_descriptor: TypeDescriptor,
    /// Element values on the collection table.
    pub values: Vec<RelationalValueBinding>,
}

/// What a bound collection holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CollectionElement {
    /// Scalar values.
    Basic(BasicCollectionElement),
}

/// A bag or set attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PluralAttributeBinding {
    /// Collection semantics.
    pub nature: CollectionNature,
    /// Collection table.
    pub collection_table: Option<TableId>,
    /// Key to the owner.
    pub key: Option<CollectionKey>,
    /// Element binding.
    pub element: Option<CollectionElement>,
    /// Fetch timing.
    pub fetch_timing: FetchTiming,
    /// Fetch style.
    pub fetch_style: FetchStyle,
    /// Second-level cache settings.
    pub caching: Option<Caching>,
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
    /// SQL restriction applied when loading.
    pub where_filter: Option<String>,
    /// Sorted in memory.
    pub sorted: bool,
    /// Comparator used when sorted; natural ordering when absent.
    pub comparator_name: Option<String>,
    /// SQL ordering; never set on a sorted collection.
    pub order_by: Option<String>,
}

impl PluralAttributeBinding {
    /// Creates an unbound collection of the given nature.
    #[must_use]
    pub fn new(nature: CollectionNature) -> Self {
        Self {
            nature,
            collection_table: None,
            key: None,
            element: None,
            fetch_timing: FetchTiming::Delayed,
            fetch_style: FetchStyle::Select,
            caching: None,
            custom_persister_class_name: None,
            custom_loader_name: None,
            custom_sql_insert: None,
            custom_sql_update: None,
            custom_sql_delete: None,
            custom_sql_delete_all: None,
            where_filter: None,
            sorted: false,
            comparator_name: None,
            order_by: None,
        }
    }

    /// Returns the basic element binding, if bound.
    #[must_use]
    pub fn basic_element(&self) -> Option<&BasicCollectionElement> {
        match &self.element {
            Some(CollectionElement::Basic(element)) => Some(element),
            None => None,
        }
    }
}

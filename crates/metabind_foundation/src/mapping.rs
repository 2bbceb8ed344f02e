//! Mapping vocabulary shared by the source and binding models.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Name/value parameters for types and generators.
///
/// Persistent so that type definitions can hand their defaults to many
/// descriptors without copying.
pub type TypeParameters = im::OrdMap<String, String>;

/// A three-valued flag: explicitly true, explicitly false, or unspecified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TruthValue {
    /// Explicitly true.
    True,
    /// Explicitly false.
    False,
    /// Not specified; use the applicable default.
    #[default]
    Unknown,
}

impl TruthValue {
    /// Resolves the flag against a default.
    #[must_use]
    pub fn decode(self, default: bool) -> bool {
        match self {
            Self::True => true,
            Self::False => false,
            Self::Unknown => default,
        }
    }
}

impl From<bool> for TruthValue {
    fn from(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}

/// How an entity hierarchy is mapped to tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InheritanceType {
    /// The hierarchy has a single entity.
    #[default]
    NoInheritance,
    /// All subclasses share the root table and are told apart by a discriminator.
    SingleTable,
    /// Each subclass has its own table joined to its superclass table.
    Joined,
    /// Each concrete class has a full table of its own.
    TablePerClass,
}

impl fmt::Display for InheritanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoInheritance => "none",
            Self::SingleTable => "single-table",
            Self::Joined => "joined",
            Self::TablePerClass => "table-per-class",
        };
        f.write_str(name)
    }
}

/// Runtime representation of entity instances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntityMode {
    /// Instances are objects of a mapped class.
    #[default]
    Pojo,
    /// Instances are dynamic maps; class names are ignored.
    Map,
}

/// When an association or collection is fetched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FetchTiming {
    /// Fetched together with the owner.
    Immediate,
    /// Fetched on first access.
    #[default]
    Delayed,
    /// Fetched piecemeal on access (extra-lazy).
    Extra,
}

/// How an association or collection is fetched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FetchStyle {
    /// A separate select per owner.
    #[default]
    Select,
    /// An outer join with the owner.
    Join,
    /// Batched selects.
    Batch,
    /// A subselect over the owner query.
    Subselect,
}

/// Operations cascaded across an association.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CascadeStyle {
    /// Every operation.
    All,
    /// Save and update.
    SaveUpdate,
    /// Persist.
    Persist,
    /// Merge.
    Merge,
    /// Delete.
    Delete,
    /// Refresh.
    Refresh,
    /// Evict.
    Evict,
    /// Lock.
    Lock,
    /// Replicate.
    Replicate,
}

/// When a property value is generated by the database.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PropertyGeneration {
    /// Never generated.
    #[default]
    Never,
    /// Generated on insert.
    Insert,
    /// Generated on insert and update.
    Always,
}

/// Optimistic locking strategy for a hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OptimisticLockStyle {
    /// No optimistic locking.
    None,
    /// A version or timestamp attribute.
    #[default]
    Version,
    /// Compare dirty columns.
    Dirty,
    /// Compare all columns.
    All,
}

/// Second-level cache access strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AccessType {
    /// Read-only data.
    ReadOnly,
    /// Read-write with soft locks.
    ReadWrite,
    /// Read-write without locking.
    NonstrictReadWrite,
    /// Fully transactional.
    Transactional,
}

/// Second-level cache settings.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Caching {
    /// Cache region name.
    pub region: Option<String>,
    /// Access strategy.
    pub access_type: AccessType,
    /// Whether lazy properties are cached as well.
    pub cache_lazy_properties: bool,
}

impl Caching {
    /// Creates caching settings for the given access type.
    #[must_use]
    pub fn new(access_type: AccessType) -> Self {
        Self {
            region: None,
            access_type,
            cache_lazy_properties: true,
        }
    }

    /// Sets the cache region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// How the outcome of a custom SQL statement is checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExecuteUpdateResultCheckStyle {
    /// Do not check.
    None,
    /// Check the affected row count.
    #[default]
    Count,
    /// Rely on the statement raising an error.
    Param,
}

/// A custom SQL statement overriding a generated one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CustomSql {
    /// The SQL text.
    pub sql: String,
    /// Whether the statement is a callable.
    pub callable: bool,
    /// Result check style.
    pub check_style: ExecuteUpdateResultCheckStyle,
}

impl CustomSql {
    /// Creates a plain, counted statement.
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            callable: false,
            check_style: ExecuteUpdateResultCheckStyle::Count,
        }
    }
}

/// Foreign key delete rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OnDeleteAction {
    /// No database-level action.
    #[default]
    NoAction,
    /// Cascade deletes in the database.
    Cascade,
}

/// A named identifier generator descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IdGenerator {
    /// Generator name.
    pub name: String,
    /// Strategy name understood by the generator factory.
    pub strategy: String,
    /// Strategy parameters.
    pub parameters: TypeParameters,
}

impl IdGenerator {
    /// Creates a generator descriptor without parameters.
    #[must_use]
    pub fn new(name: impl Into<String>, strategy: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            strategy: strategy.into(),
            parameters: TypeParameters::new(),
        }
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

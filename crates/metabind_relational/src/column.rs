//! Columns and derived values.

use metabind_foundation::Identifier;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::datatype::Datatype;
use crate::table::TableId;

/// Identifies a column: its table and position within the table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColumnId {
    pub(crate) table: TableId,
    pub(crate) index: u32,
}

impl ColumnId {
    /// Returns the owning table.
    #[must_use]
    pub const fn table(self) -> TableId {
        self.table
    }

    /// Returns the position within the owning table.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }
}

/// Identifies a derived value within its table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DerivedValueId {
    pub(crate) table: TableId,
    pub(crate) index: u32,
}

impl DerivedValueId {
    /// Returns the owning table.
    #[must_use]
    pub const fn table(self) -> TableId {
        self.table
    }
}

/// A single relational value: a stored column or a formula.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SimpleValue {
    /// A physical column.
    Column(ColumnId),
    /// A value computed by an expression.
    Derived(DerivedValueId),
}

impl SimpleValue {
    /// Returns the table the value belongs to.
    #[must_use]
    pub fn table(self) -> TableId {
        match self {
            Self::Column(id) => id.table,
            Self::Derived(id) => id.table,
        }
    }

    /// Returns the column id if this is a column.
    #[must_use]
    pub fn as_column(self) -> Option<ColumnId> {
        match self {
            Self::Column(id) => Some(id),
            Self::Derived(_) => None,
        }
    }
}

/// Column length, precision, and scale.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Size {
    /// Character or binary length.
    pub length: Option<u32>,
    /// Numeric precision.
    pub precision: Option<u32>,
    /// Numeric scale.
    pub scale: Option<u32>,
}

impl Size {
    /// A length-only size.
    #[must_use]
    pub const fn length(length: u32) -> Self {
        Self {
            length: Some(length),
            precision: None,
            scale: None,
        }
    }

    /// A precision/scale size.
    #[must_use]
    pub const fn precision(precision: u32, scale: u32) -> Self {
        Self {
            length: None,
            precision: Some(precision),
            scale: Some(scale),
        }
    }
}

/// A physical column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    /// This column's id.
    pub id: ColumnId,
    /// Physical name.
    pub name: Identifier,
    /// Whether the column accepts nulls.
    pub nullable: bool,
    /// Whether the column carries a single-column unique constraint.
    pub unique: bool,
    /// Default value expression.
    pub default_value: Option<String>,
    /// Explicit SQL type declaration.
    pub sql_type: Option<String>,
    /// Length, precision, and scale.
    pub size: Option<Size>,
    /// Resolved storage type.
    pub datatype: Option<Datatype>,
    /// Custom SQL read expression.
    pub read_fragment: Option<String>,
    /// Custom SQL write expression.
    pub write_fragment: Option<String>,
    /// Check constraint condition.
    pub check_condition: Option<String>,
    /// Column comment.
    pub comment: Option<String>,
}

impl Column {
    pub(crate) fn new(id: ColumnId, name: Identifier) -> Self {
        Self {
            id,
            name,
            nullable: true,
            unique: false,
            default_value: None,
            sql_type: None,
            size: None,
            datatype: None,
            read_fragment: None,
            write_fragment: None,
            check_condition: None,
            comment: None,
        }
    }
}

/// A value computed by a SQL expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivedValue {
    /// This value's id.
    pub id: DerivedValueId,
    /// The SQL expression.
    pub expression: String,
    /// Resolved storage type.
    pub datatype: Option<Datatype>,
}

//! Foreign keys.

use metabind_foundation::OnDeleteAction;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::column::ColumnId;
use crate::table::TableId;

/// Identifies a foreign key within its source table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ForeignKeyId {
    pub(crate) table: TableId,
    pub(crate) index: u32,
}

impl ForeignKeyId {
    /// Returns the table that owns the key.
    #[must_use]
    pub const fn table(self) -> TableId {
        self.table
    }
}

/// One source column and the target column it references.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColumnMapping {
    /// Column in the owning table.
    pub source: ColumnId,
    /// Referenced column in the target table.
    pub target: ColumnId,
}

/// A foreign key: ordered (source, target) column pairs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForeignKey {
    /// This key's id.
    pub id: ForeignKeyId,
    /// Constraint name.
    pub name: Option<String>,
    /// Referenced table.
    pub target_table: TableId,
    /// Delete rule.
    pub delete_rule: OnDeleteAction,
    columns: Vec<ColumnMapping>,
}

impl ForeignKey {
    pub(crate) fn new(id: ForeignKeyId, target_table: TableId, name: Option<String>) -> Self {
        Self {
            id,
            name,
            target_table,
            delete_rule: OnDeleteAction::NoAction,
            columns: Vec::new(),
        }
    }

    /// Returns the source table.
    #[must_use]
    pub fn source_table(&self) -> TableId {
        self.id.table
    }

    /// Appends a column pair.
    pub fn add_column_mapping(&mut self, source: ColumnId, target: ColumnId) {
        self.columns.push(ColumnMapping { source, target });
    }

    /// Returns the column pairs in order.
    #[must_use]
    pub fn column_mappings(&self) -> &[ColumnMapping] {
        &self.columns
    }

    /// Iterates over source columns in order.
    pub fn source_columns(&self) -> impl Iterator<Item = ColumnId> + '_ {
        self.columns.iter().map(|m| m.source)
    }

    /// Iterates over target columns in order.
    pub fn target_columns(&self) -> impl Iterator<Item = ColumnId> + '_ {
        self.columns.iter().map(|m| m.target)
    }

    /// Returns the number of column pairs.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

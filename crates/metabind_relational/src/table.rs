//! Tables and their keys.

use std::collections::HashMap;
use std::fmt;

use metabind_foundation::Identifier;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::column::{Column, ColumnId, DerivedValue, DerivedValueId};
use crate::database::SchemaName;
use crate::foreign_key::{ForeignKey, ForeignKeyId};

/// Identifies a table in a [`Database`](crate::Database).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TableId(pub(crate) u32);

impl TableId {
    /// Returns the raw index of this table.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TableId({})", self.0)
    }
}

/// The primary key of a table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrimaryKey {
    /// Constraint name.
    pub name: Option<String>,
    /// Key columns in order.
    pub columns: Vec<ColumnId>,
}

impl PrimaryKey {
    /// Adds a column if it is not already part of the key.
    pub fn add_column(&mut self, column: ColumnId) {
        if !self.columns.contains(&column) {
            self.columns.push(column);
        }
    }
}

/// A named unique key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniqueKey {
    /// Constraint name.
    pub name: String,
    /// Key columns in order.
    pub columns: Vec<ColumnId>,
}

impl UniqueKey {
    /// Adds a column if it is not already part of the key.
    pub fn add_column(&mut self, column: ColumnId) {
        if !self.columns.contains(&column) {
            self.columns.push(column);
        }
    }
}

/// A named index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Index {
    /// Index name.
    pub name: String,
    /// Indexed columns in order.
    pub columns: Vec<ColumnId>,
}

/// A table within a schema namespace.
///
/// Columns are keyed by physical name: asking for an existing name returns
/// the existing column.
#[derive(Clone, Debug)]
pub struct Table {
    id: TableId,
    schema: SchemaName,
    name: Identifier,
    columns: Vec<Column>,
    column_index: HashMap<Identifier, u32>,
    derived_values: Vec<DerivedValue>,
    derived_index: HashMap<String, u32>,
    /// Primary key.
    pub primary_key: PrimaryKey,
    unique_keys: Vec<UniqueKey>,
    indexes: Vec<Index>,
    foreign_keys: Vec<ForeignKey>,
    /// Table comments.
    pub comments: Vec<String>,
    /// Table-level check constraints.
    pub check_constraints: Vec<String>,
}

impl Table {
    pub(crate) fn new(id: TableId, schema: SchemaName, name: Identifier) -> Self {
        Self {
            id,
            schema,
            name,
            columns: Vec::new(),
            column_index: HashMap::new(),
            derived_values: Vec::new(),
            derived_index: HashMap::new(),
            primary_key: PrimaryKey::default(),
            unique_keys: Vec::new(),
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
            comments: Vec::new(),
            check_constraints: Vec::new(),
        }
    }

    /// Returns this table's id.
    #[must_use]
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Returns the schema namespace.
    #[must_use]
    pub fn schema(&self) -> &SchemaName {
        &self.schema
    }

    /// Returns the physical name.
    #[must_use]
    pub fn name(&self) -> &Identifier {
        &self.name
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Looks up a column by physical name.
    #[must_use]
    pub fn locate_column(&self, name: &Identifier) -> Option<ColumnId> {
        self.column_index.get(name).map(|&index| ColumnId {
            table: self.id,
            index,
        })
    }

    /// Returns the column with the given name, creating it if needed.
    ///
    /// # Panics
    ///
    /// Panics if the table holds more than `u32::MAX` columns.
    pub fn locate_or_create_column(&mut self, name: Identifier) -> ColumnId {
        if let Some(id) = self.locate_column(&name) {
            return id;
        }
        let index = u32::try_from(self.columns.len()).expect("too many columns");
        let id = ColumnId {
            table: self.id,
            index,
        };
        self.columns.push(Column::new(id, name.clone()));
        self.column_index.insert(name, index);
        id
    }

    /// Gets a column of this table.
    #[must_use]
    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        if id.table != self.id {
            return None;
        }
        self.columns.get(id.index as usize)
    }

    /// Gets a column of this table mutably.
    pub fn column_mut(&mut self, id: ColumnId) -> Option<&mut Column> {
        if id.table != self.id {
            return None;
        }
        self.columns.get_mut(id.index as usize)
    }

    /// Iterates over columns in creation order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    // =========================================================================
    // Derived values
    // =========================================================================

    /// Returns the derived value for an expression, creating it if needed.
    ///
    /// # Panics
    ///
    /// Panics if the table holds more than `u32::MAX` derived values.
    pub fn locate_or_create_derived_value(&mut self, expression: &str) -> DerivedValueId {
        if let Some(&index) = self.derived_index.get(expression) {
            return DerivedValueId {
                table: self.id,
                index,
            };
        }
        let index = u32::try_from(self.derived_values.len()).expect("too many derived values");
        let id = DerivedValueId {
            table: self.id,
            index,
        };
        self.derived_values.push(DerivedValue {
            id,
            expression: expression.to_string(),
            datatype: None,
        });
        self.derived_index.insert(expression.to_string(), index);
        id
    }

    /// Gets a derived value of this table.
    #[must_use]
    pub fn derived_value(&self, id: DerivedValueId) -> Option<&DerivedValue> {
        if id.table != self.id {
            return None;
        }
        self.derived_values.get(id.index as usize)
    }

    /// Gets a derived value of this table mutably.
    pub fn derived_value_mut(&mut self, id: DerivedValueId) -> Option<&mut DerivedValue> {
        if id.table != self.id {
            return None;
        }
        self.derived_values.get_mut(id.index as usize)
    }

    // =========================================================================
    // Constraints
    // =========================================================================

    /// Returns the unique key with the given name, creating it if needed.
    pub fn get_or_create_unique_key(&mut self, name: &str) -> &mut UniqueKey {
        let position = match self.unique_keys.iter().position(|k| k.name == name) {
            Some(position) => position,
            None => {
                self.unique_keys.push(UniqueKey {
                    name: name.to_string(),
                    columns: Vec::new(),
                });
                self.unique_keys.len() - 1
            }
        };
        &mut self.unique_keys[position]
    }

    /// Returns the unique keys.
    #[must_use]
    pub fn unique_keys(&self) -> &[UniqueKey] {
        &self.unique_keys
    }

    /// Returns the index with the given name, creating it if needed.
    pub fn get_or_create_index(&mut self, name: &str) -> &mut Index {
        let position = match self.indexes.iter().position(|i| i.name == name) {
            Some(position) => position,
            None => {
                self.indexes.push(Index {
                    name: name.to_string(),
                    columns: Vec::new(),
                });
                self.indexes.len() - 1
            }
        };
        &mut self.indexes[position]
    }

    /// Returns the indexes.
    #[must_use]
    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    /// Creates a foreign key from this table to `target`.
    ///
    /// # Panics
    ///
    /// Panics if the table holds more than `u32::MAX` foreign keys.
    pub fn create_foreign_key(&mut self, target: TableId, name: Option<String>) -> ForeignKeyId {
        let index = u32::try_from(self.foreign_keys.len()).expect("too many foreign keys");
        let id = ForeignKeyId {
            table: self.id,
            index,
        };
        self.foreign_keys.push(ForeignKey::new(id, target, name));
        id
    }

    /// Gets a foreign key of this table.
    #[must_use]
    pub fn foreign_key(&self, id: ForeignKeyId) -> Option<&ForeignKey> {
        if id.table != self.id {
            return None;
        }
        self.foreign_keys.get(id.index as usize)
    }

    /// Gets a foreign key of this table mutably.
    pub fn foreign_key_mut(&mut self, id: ForeignKeyId) -> Option<&mut ForeignKey> {
        if id.table != self.id {
            return None;
        }
        self.foreign_keys.get_mut(id.index as usize)
    }

    /// Returns the foreign keys.
    #[must_use]
    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    /// Adds a comment.
    pub fn add_comment(&mut self, comment: impl Into<String>) {
        self.comments.push(comment.into());
    }

    /// Adds a check constraint.
    pub fn add_check_constraint(&mut self, condition: impl Into<String>) {
        self.check_constraints.push(condition.into());
    }
}

//! Schema namespaces and the table arena.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use metabind_foundation::Identifier;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::column::{Column, ColumnId, SimpleValue};
use crate::datatype::Datatype;
use crate::table::{Table, TableId};

/// The (schema, catalog) pair that namespaces tables.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SchemaName {
    /// Schema name; `None` is the connection default.
    pub schema: Option<Identifier>,
    /// Catalog name; `None` is the connection default.
    pub catalog: Option<Identifier>,
}

impl SchemaName {
    /// Creates a schema name.
    #[must_use]
    pub fn new(schema: Option<Identifier>, catalog: Option<Identifier>) -> Self {
        Self { schema, catalog }
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.catalog, &self.schema) {
            (Some(catalog), Some(schema)) => write!(f, "{catalog}.{schema}"),
            (Some(catalog), None) => write!(f, "{catalog}."),
            (None, Some(schema)) => write!(f, "{schema}"),
            (None, None) => f.write_str("<default>"),
        }
    }
}

/// A schema namespace: table names mapped to tables.
#[derive(Clone, Debug)]
pub struct Schema {
    name: SchemaName,
    tables: HashMap<Identifier, TableId>,
}

impl Schema {
    /// Returns the schema's name.
    #[must_use]
    pub fn name(&self) -> &SchemaName {
        &self.name
    }

    /// Looks up a table by name.
    #[must_use]
    pub fn locate_table(&self, name: &Identifier) -> Option<TableId> {
        self.tables.get(name).copied()
    }

    /// Returns the number of tables in the schema.
    #[must_use]
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

/// All schemas and tables created during a binding session.
#[derive(Clone, Debug, Default)]
pub struct Database {
    schemas: BTreeMap<SchemaName, Schema>,
    tables: Vec<Table>,
}

impl Database {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the schema, creating it if needed.
    pub fn locate_schema(&mut self, name: &SchemaName) -> &Schema {
        self.schemas.entry(name.clone()).or_insert_with(|| Schema {
            name: name.clone(),
            tables: HashMap::new(),
        })
    }

    /// Looks up an existing schema.
    #[must_use]
    pub fn schema(&self, name: &SchemaName) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Iterates over schemas in name order.
    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    /// Looks up a table by schema and name.
    #[must_use]
    pub fn locate_table(&self, schema: &SchemaName, name: &Identifier) -> Option<TableId> {
        self.schemas.get(schema)?.locate_table(name)
    }

    /// Returns the table with the given name, creating it (and its schema) if needed.
    ///
    /// # Panics
    ///
    /// Panics if the database holds more than `u32::MAX` tables.
    pub fn locate_or_create_table(&mut self, schema: &SchemaName, name: Identifier) -> TableId {
        if let Some(id) = self.locate_table(schema, &name) {
            return id;
        }
        let id = TableId(u32::try_from(self.tables.len()).expect("too many tables"));
        self.tables.push(Table::new(id, schema.clone(), name.clone()));
        self.schemas
            .entry(schema.clone())
            .or_insert_with(|| Schema {
                name: schema.clone(),
                tables: HashMap::new(),
            })
            .tables
            .insert(name, id);
        id
    }

    /// Gets a table.
    #[must_use]
    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.get(id.0 as usize)
    }

    /// Gets a table mutably.
    pub fn table_mut(&mut self, id: TableId) -> Option<&mut Table> {
        self.tables.get_mut(id.0 as usize)
    }

    /// Iterates over tables in creation order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    /// Returns the number of tables.
    #[must_use]
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Gets a column anywhere in the database.
    #[must_use]
    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.table(id.table())?.column(id)
    }

    /// Gets a column anywhere in the database mutably.
    pub fn column_mut(&mut self, id: ColumnId) -> Option<&mut Column> {
        self.table_mut(id.table())?.column_mut(id)
    }

    /// Returns the storage type of a value, if resolved.
    #[must_use]
    pub fn datatype(&self, value: SimpleValue) -> Option<&Datatype> {
        let table = self.table(value.table())?;
        match value {
            SimpleValue::Column(id) => table.column(id)?.datatype.as_ref(),
            SimpleValue::Derived(id) => table.derived_value(id)?.datatype.as_ref(),
        }
    }

    /// Sets the storage type of a value unless it already has one.
    pub fn set_datatype_if_absent(&mut self, value: SimpleValue, datatype: Datatype) {
        let Some(table) = self.table_mut(value.table()) else {
            return;
        };
        let slot = match value {
            SimpleValue::Column(id) => table.column_mut(id).map(|c| &mut c.datatype),
            SimpleValue::Derived(id) => table.derived_value_mut(id).map(|d| &mut d.datatype),
        };
        if let Some(slot) = slot {
            if slot.is_none() {
                *slot = Some(datatype);
            }
        }
    }

    /// Returns the physical name of a column.
    #[must_use]
    pub fn column_name(&self, id: ColumnId) -> Option<&Identifier> {
        self.column(id).map(|c| &c.name)
    }
}

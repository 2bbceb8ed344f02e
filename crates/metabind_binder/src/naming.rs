//! Naming strategies for generated table and column names.

use std::fmt;

/// Turns logical mapping names into physical table and column names.
pub trait NamingStrategy: fmt::Debug {
    /// Table name for an entity without an explicit table.
    fn class_to_table_name(&self, class_name: &str) -> String;

    /// Column name for an attribute without an explicit column.
    fn property_to_column_name(&self, property_name: &str) -> String;

    /// Physical name for an explicit table name.
    fn table_name(&self, table_name: &str) -> String;

    /// Physical name for an explicit column name.
    fn column_name(&self, column_name: &str) -> String;

    /// Table name for a collection without an explicit table.
    fn collection_table_name(
        &self,
        owner_entity: &str,
        owner_entity_table: Option<&str>,
        associated_entity: Option<&str>,
        associated_entity_table: Option<&str>,
        role: &str,
    ) -> String;
}

/// Returns the part of a dotted name after the last dot.
#[must_use]
pub fn unqualify(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Unqualified class and property names; explicit names pass through.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultNamingStrategy;

impl NamingStrategy for DefaultNamingStrategy {
    fn class_to_table_name(&self, class_name: &str) -> String {
        unqualify(class_name).to_string()
    }

    fn property_to_column_name(&self, property_name: &str) -> String {
        unqualify(property_name).to_string()
    }

    fn table_name(&self, table_name: &str) -> String {
        table_name.to_string()
    }

    fn column_name(&self, column_name: &str) -> String {
        column_name.to_string()
    }

    fn collection_table_name(
        &self,
        owner_entity: &str,
        owner_entity_table: Option<&str>,
        _associated_entity: Option<&str>,
        _associated_entity_table: Option<&str>,
        role: &str,
    ) -> String {
        let owner = owner_entity_table.unwrap_or_else(|| unqualify(owner_entity));
        format!("{owner}_{}", unqualify(role))
    }
}

//! Relational resolution: tables, columns, derived values, and constraints.

use metabind_binding::{EntityBindingId, RelationalValueBinding};
use metabind_foundation::{Error, ErrorKind, Identifier, Result};
use metabind_relational::{ColumnId, SchemaName, TableId};
use metabind_source::{
    ColumnBindingDefaults, ColumnSource, ConstraintSource, EntitySource, RelationalValueSource,
    TableSource,
};

use crate::naming::NamingStrategy;
use crate::session::BindingSession;

/// Builds a constraint name from its table and column names.
fn constraint_name(prefix: &str, table: &str, columns: &[String]) -> String {
    let mut name = format!("{prefix}_{table}");
    for column in columns {
        name.push('_');
        name.push_str(column);
    }
    name
}

impl BindingSession<'_> {
    // =========================================================================
    // Tables
    // =========================================================================

    /// Locates or creates the table described by `source`.
    ///
    /// An explicit name goes through [`NamingStrategy::table_name`]; without
    /// one, `implicit_name` derives it. Returns the table and its unquoted
    /// name, which is the table's logical name.
    pub(crate) fn create_table(
        &mut self,
        source: &TableSource,
        implicit_name: impl FnOnce(&dyn NamingStrategy) -> String,
    ) -> (TableId, String) {
        let services = self.services;
        let naming = services.naming.as_ref();
        let name = match source.explicit_table_name.as_deref() {
            Some(explicit) if !explicit.is_empty() => naming.table_name(explicit),
            _ => implicit_name(naming),
        };
        let schema = SchemaName::new(
            self.namespace_part(
                source.explicit_schema_name.as_deref(),
                self.options.default_schema_name.as_deref(),
            ),
            self.namespace_part(
                source.explicit_catalog_name.as_deref(),
                self.options.default_catalog_name.as_deref(),
            ),
        );
        let physical = Identifier::parse(&self.options.quote_identifier(&name));
        let table = self
            .metadata
            .database_mut()
            .locate_or_create_table(&schema, physical);
        log::trace!("table {name} resolved to {table:?}");
        (table, name)
    }

    fn namespace_part(&self, explicit: Option<&str>, default: Option<&str>) -> Option<Identifier> {
        explicit
            .or(default)
            .filter(|name| !name.is_empty())
            .map(|name| Identifier::parse(&self.options.quote_identifier(name)))
    }

    /// Binds the secondary tables of an entity under their logical names.
    pub(crate) fn bind_secondary_tables(
        &mut self,
        entity: EntityBindingId,
        source: &EntitySource,
    ) -> Result<()> {
        for table_source in &source.secondary_tables {
            let class_name = self
                .entity(entity)?
                .class_name()
                .unwrap_or(&source.entity_name)
                .to_string();
            let (table, name) =
                self.create_table(table_source, |naming| naming.class_to_table_name(&class_name));
            let logical_name = table_source.logical_name.clone().unwrap_or(name);
            self.entity_mut(entity)?
                .add_secondary_table(logical_name, table);
        }
        Ok(())
    }

    /// Finds the table a value or constraint of an entity lives in.
    pub(crate) fn locate_entity_table(
        &self,
        entity: EntityBindingId,
        logical_name: Option<&str>,
    ) -> Result<TableId> {
        let binding = self.entity(entity)?;
        binding.locate_table(logical_name).ok_or_else(|| {
            Error::new(ErrorKind::UnknownTable {
                entity: binding.entity_name().to_string(),
                table: logical_name.unwrap_or_default().to_string(),
            })
        })
    }

    // =========================================================================
    // Values
    // =========================================================================

    /// Binds the values of an entity attribute.
    ///
    /// Each source is placed in the table it names; with no sources a single
    /// column named after the attribute is created on the primary table.
    pub(crate) fn bind_entity_values(
        &mut self,
        entity: EntityBindingId,
        sources: &[RelationalValueSource],
        defaults: ColumnBindingDefaults,
        attribute_name: &str,
    ) -> Result<Vec<RelationalValueBinding>> {
        if sources.is_empty() {
            let table = self.entity(entity)?.primary_table();
            return Ok(vec![self.bind_implicit_column(table, attribute_name, defaults)?]);
        }
        let mut values = Vec::with_capacity(sources.len());
        for source in sources {
            let table = self.locate_entity_table(entity, source.containing_table_name())?;
            values.push(self.bind_value(table, source, defaults)?);
        }
        Ok(values)
    }

    /// Binds values that all live in one table, such as collection elements.
    pub(crate) fn bind_table_values(
        &mut self,
        table: TableId,
        sources: &[RelationalValueSource],
        defaults: ColumnBindingDefaults,
        implicit_name: &str,
    ) -> Result<Vec<RelationalValueBinding>> {
        if sources.is_empty() {
            return Ok(vec![self.bind_implicit_column(table, implicit_name, defaults)?]);
        }
        sources
            .iter()
            .map(|source| self.bind_value(table, source, defaults))
            .collect()
    }

    /// Creates the column an attribute maps to when it declares none.
    pub(crate) fn bind_implicit_column(
        &mut self,
        table: TableId,
        attribute_name: &str,
        defaults: ColumnBindingDefaults,
    ) -> Result<RelationalValueBinding> {
        let name = self.services.naming.property_to_column_name(attribute_name);
        let column = self.locate_or_create_column(table, &name)?;
        if let Some(column) = self.metadata.database_mut().column_mut(column) {
            column.nullable = defaults.nullable;
        }
        Ok(RelationalValueBinding::column(
            column,
            defaults.included_in_insert,
            defaults.included_in_update,
        ))
    }

    /// Binds one column or derived value in `table`.
    pub(crate) fn bind_value(
        &mut self,
        table: TableId,
        source: &RelationalValueSource,
        defaults: ColumnBindingDefaults,
    ) -> Result<RelationalValueBinding> {
        match source {
            RelationalValueSource::Column(column) => {
                let id = self.bind_column(table, column, defaults)?;
                Ok(RelationalValueBinding::column(
                    id,
                    column.included_in_insert.decode(defaults.included_in_insert),
                    column.included_in_update.decode(defaults.included_in_update),
                ))
            }
            RelationalValueSource::Derived(derived) => {
                let id = self
                    .table_mut(table)?
                    .locate_or_create_derived_value(&derived.expression);
                Ok(RelationalValueBinding::derived(id))
            }
        }
    }

    /// Locates or creates a column and applies the source's settings to it.
    pub(crate) fn bind_column(
        &mut self,
        table: TableId,
        source: &ColumnSource,
        defaults: ColumnBindingDefaults,
    ) -> Result<ColumnId> {
        let name = self.services.naming.column_name(&source.name);
        let id = self.locate_or_create_column(table, &name)?;
        let column = self
            .metadata
            .database_mut()
            .column_mut(id)
            .ok_or_else(|| Error::contract_violation(format!("no column {id:?}")))?;

        column.nullable = source.nullable.decode(defaults.nullable);
        if source.unique {
            column.unique = true;
        }
        if source.default_value.is_some() {
            column.default_value.clone_from(&source.default_value);
        }
        if source.sql_type.is_some() {
            column.sql_type.clone_from(&source.sql_type);
        }
        if source.size.is_some() {
            column.size.clone_from(&source.size);
        }
        if source.datatype.is_some() {
            column.datatype.clone_from(&source.datatype);
        }
        if source.read_fragment.is_some() {
            column.read_fragment.clone_from(&source.read_fragment);
        }
        if source.write_fragment.is_some() {
            column.write_fragment.clone_from(&source.write_fragment);
        }
        if source.check_condition.is_some() {
            column.check_condition.clone_from(&source.check_condition);
        }
        if source.comment.is_some() {
            column.comment.clone_from(&source.comment);
        }
        Ok(id)
    }

    /// Locates or creates a column by its (possibly quoted) physical name.
    pub(crate) fn locate_or_create_column(
        &mut self,
        table: TableId,
        name: &str,
    ) -> Result<ColumnId> {
        let physical = Identifier::parse(&self.options.quote_identifier(name));
        Ok(self.table_mut(table)?.locate_or_create_column(physical))
    }

    // =========================================================================
    // Constraints
    // =========================================================================

    /// Binds the unique keys and indexes an entity declares.
    pub(crate) fn bind_constraints(
        &mut self,
        entity: EntityBindingId,
        source: &EntitySource,
    ) -> Result<()> {
        for constraint in &source.constraints {
            match constraint {
                ConstraintSource::Unique {
                    name,
                    table_name,
                    column_names,
                } => {
                    let (table, columns, name) = self.constraint_columns(
                        entity,
                        "UK",
                        name.as_deref(),
                        table_name.as_deref(),
                        column_names,
                    )?;
                    let key = self.table_mut(table)?.get_or_create_unique_key(&name);
                    for column in columns {
                        key.add_column(column);
                    }
                }
                ConstraintSource::Index {
                    name,
                    table_name,
                    column_names,
                } => {
                    let (table, columns, name) = self.constraint_columns(
                        entity,
                        "IDX",
                        name.as_deref(),
                        table_name.as_deref(),
                        column_names,
                    )?;
                    let index = self.table_mut(table)?.get_or_create_index(&name);
                    for column in columns {
                        if !index.columns.contains(&column) {
                            index.columns.push(column);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn constraint_columns(
        &mut self,
        entity: EntityBindingId,
        prefix: &str,
        name: Option<&str>,
        table_name: Option<&str>,
        column_names: &[String],
    ) -> Result<(TableId, Vec<ColumnId>, String)> {
        let table = self.locate_entity_table(entity, table_name)?;
        let mut columns = Vec::with_capacity(column_names.len());
        for column_name in column_names {
            columns.push(self.locate_or_create_column(table, column_name)?);
        }
        let name = match name {
            Some(name) => name.to_string(),
            None => {
                let table_text = self
                    .metadata
                    .database()
                    .table(table)
                    .map(|t| t.name().text().to_string())
                    .unwrap_or_default();
                constraint_name(prefix, &table_text, column_names)
            }
        };
        log::trace!("constraint {name} on {table:?}");
        Ok((table, columns, name))
    }
}

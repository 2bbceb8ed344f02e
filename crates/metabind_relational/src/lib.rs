//! Relational model (schemas, tables, columns, keys) for metabind.
//!
//! This crate provides:
//! - [`Database`] - Schema namespaces and the table arena
//! - [`Table`] - Columns, derived values, primary/unique/foreign keys
//! - [`Column`] - Physical columns, deduplicated by name within a table
//! - [`Datatype`] - SQL storage type of a value

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod column;
mod database;
mod datatype;
mod foreign_key;
mod table;

pub use column::{Column, ColumnId, DerivedValue, DerivedValueId, SimpleValue, Size};
pub use database::{Database, Schema, SchemaName};
pub use datatype::{Datatype, SqlTypeCode};
pub use foreign_key::{ColumnMapping, ForeignKey, ForeignKeyId};
pub use table::{Index, PrimaryKey, Table, TableId, UniqueKey};

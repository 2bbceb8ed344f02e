//! SQL storage types.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A JDBC-style SQL type code.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SqlTypeCode(pub i32);

impl SqlTypeCode {
    /// `BIT`
    pub const BIT: SqlTypeCode = SqlTypeCode(-7);
    /// `TINYINT`
    pub const TINYINT: SqlTypeCode = SqlTypeCode(-6);
    /// `SMALLINT`
    pub const SMALLINT: SqlTypeCode = SqlTypeCode(5);
    /// `INTEGER`
    pub const INTEGER: SqlTypeCode = SqlTypeCode(4);
    /// `BIGINT`
    pub const BIGINT: SqlTypeCode = SqlTypeCode(-5);
    /// `FLOAT`
    pub const FLOAT: SqlTypeCode = SqlTypeCode(6);
    /// `DOUBLE`
    pub const DOUBLE: SqlTypeCode = SqlTypeCode(8);
    /// `NUMERIC`
    pub const NUMERIC: SqlTypeCode = SqlTypeCode(2);
    /// `CHAR`
    pub const CHAR: SqlTypeCode = SqlTypeCode(1);
    /// `VARCHAR`
    pub const VARCHAR: SqlTypeCode = SqlTypeCode(12);
    /// `DATE`
    pub const DATE: SqlTypeCode = SqlTypeCode(91);
    /// `TIME`
    pub const TIME: SqlTypeCode = SqlTypeCode(92);
    /// `TIMESTAMP`
    pub const TIMESTAMP: SqlTypeCode = SqlTypeCode(93);
    /// `VARBINARY`
    pub const VARBINARY: SqlTypeCode = SqlTypeCode(-3);
    /// `BLOB`
    pub const BLOB: SqlTypeCode = SqlTypeCode(2004);
    /// `CLOB`
    pub const CLOB: SqlTypeCode = SqlTypeCode(2005);
    /// `BOOLEAN`
    pub const BOOLEAN: SqlTypeCode = SqlTypeCode(16);
}

impl fmt::Debug for SqlTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SqlTypeCode({})", self.0)
    }
}

/// The storage type of a column or derived value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Datatype {
    /// SQL type code.
    pub type_code: SqlTypeCode,
    /// Name of the canonical type that produced it.
    pub type_name: String,
    /// Name of the runtime class values map to.
    pub returned_class: String,
}

impl Datatype {
    /// Creates a datatype.
    #[must_use]
    pub fn new(
        type_code: SqlTypeCode,
        type_name: impl Into<String>,
        returned_class: impl Into<String>,
    ) -> Self {
        Self {
            type_code,
            type_name: type_name.into(),
            returned_class: returned_class.into(),
        }
    }
}

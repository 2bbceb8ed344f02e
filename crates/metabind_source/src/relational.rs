//! Relational hints: tables, columns, formulas, and constraints.

use metabind_foundation::TruthValue;
use metabind_relational::{Datatype, Size};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A table declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TableSource {
    /// Explicit schema name.
    pub explicit_schema_name: Option<String>,
    /// Explicit catalog name.
    pub explicit_catalog_name: Option<String>,
    /// Explicit table name; derived from the class name when absent.
    pub explicit_table_name: Option<String>,
    /// Name used by columns and constraints to refer to this table.
    pub logical_name: Option<String>,
}

impl TableSource {
    /// A table with no explicit naming.
    #[must_use]
    pub fn implicit() -> Self {
        Self::default()
    }

    /// A table with an explicit name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            explicit_table_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Sets the schema.
    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.explicit_schema_name = Some(schema.into());
        self
    }

    /// Sets the catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.explicit_catalog_name = Some(catalog.into());
        self
    }

    /// Sets the logical name.
    #[must_use]
    pub fn with_logical_name(mut self, logical_name: impl Into<String>) -> Self {
        self.logical_name = Some(logical_name.into());
        self
    }
}

/// A column declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColumnSource {
    /// Logical column name.
    pub name: String,
    /// Logical name of the containing table; the primary table when absent.
    pub containing_table_name: Option<String>,
    /// Nullability override.
    pub nullable: TruthValue,
    /// Insertability override.
    pub included_in_insert: TruthValue,
    /// Updatability override.
    pub included_in_update: TruthValue,
    /// Single-column unique constraint.
    pub unique: bool,
    /// Default value expression.
    pub default_value: Option<String>,
    /// Explicit SQL type declaration.
    pub sql_type: Option<String>,
    /// Length, precision, and scale.
    pub size: Option<Size>,
    /// Explicit storage type.
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

impl ColumnSource {
    /// Creates a column declaration with every override unspecified.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the containing table's logical name.
    #[must_use]
    pub fn in_table(mut self, logical_name: impl Into<String>) -> Self {
        self.containing_table_name = Some(logical_name.into());
        self
    }

    /// Sets nullability.
    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable.into();
        self
    }

    /// Sets insertability.
    #[must_use]
    pub fn with_insert(mut self, included: bool) -> Self {
        self.included_in_insert = included.into();
        self
    }

    /// Sets updatability.
    #[must_use]
    pub fn with_update(mut self, included: bool) -> Self {
        self.included_in_update = included.into();
        self
    }

    /// Marks the column unique.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Sets the SQL type.
    #[must_use]
    pub fn with_sql_type(mut self, sql_type: impl Into<String>) -> Self {
        self.sql_type = Some(sql_type.into());
        self
    }

    /// Sets the size.
    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// A formula declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DerivedValueSource {
    /// The SQL expression.
    pub expression: String,
    /// Logical name of the containing table; the primary table when absent.
    pub containing_table_name: Option<String>,
}

/// A column or a formula.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RelationalValueSource {
    /// A stored column.
    Column(ColumnSource),
    /// A derived value.
    Derived(DerivedValueSource),
}

impl RelationalValueSource {
    /// A column with default settings.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column(ColumnSource::new(name))
    }

    /// A formula on the primary table.
    #[must_use]
    pub fn formula(expression: impl Into<String>) -> Self {
        Self::Derived(DerivedValueSource {
            expression: expression.into(),
            containing_table_name: None,
        })
    }

    /// Returns the logical name of the containing table.
    #[must_use]
    pub fn containing_table_name(&self) -> Option<&str> {
        match self {
            Self::Column(column) => column.containing_table_name.as_deref(),
            Self::Derived(derived) => derived.containing_table_name.as_deref(),
        }
    }
}

impl From<ColumnSource> for RelationalValueSource {
    fn from(column: ColumnSource) -> Self {
        Self::Column(column)
    }
}

/// A table-level constraint declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConstraintSource {
    /// A unique key.
    Unique {
        /// Constraint name; generated when absent.
        name: Option<String>,
        /// Logical table name; the primary table when absent.
        table_name: Option<String>,
        /// Column names in order.
        column_names: Vec<String>,
    },
    /// An index.
    Index {
        /// Index name; generated when absent.
        name: Option<String>,
        /// Logical table name; the primary table when absent.
        table_name: Option<String>,
        /// Column names in order.
        column_names: Vec<String>,
    },
}

impl ConstraintSource {
    /// An unnamed unique key on the primary table.
    #[must_use]
    pub fn unique<I, S>(column_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Unique {
            name: None,
            table_name: None,
            column_names: column_names.into_iter().map(Into::into).collect(),
        }
    }

    /// An unnamed index on the primary table.
    #[must_use]
    pub fn index<I, S>(column_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Index {
            name: None,
            table_name: None,
            column_names: column_names.into_iter().map(Into::into).collect(),
        }
    }

    /// Sets the constraint name.
    #[must_use]
    pub fn named(mut self, constraint_name: impl Into<String>) -> Self {
        match &mut self {
            Self::Unique { name, .. } | Self::Index { name, .. } => {
                *name = Some(constraint_name.into());
            }
        }
        self
    }

    /// Sets the logical table name.
    #[must_use]
    pub fn on_table(mut self, logical_name: impl Into<String>) -> Self {
        match &mut self {
            Self::Unique { table_name, .. } | Self::Index { table_name, .. } => {
                *table_name = Some(logical_name.into());
            }
        }
        self
    }
}

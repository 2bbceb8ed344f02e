//! Type descriptors attached to attribute bindings.

use metabind_foundation::TypeParameters;
use metabind_relational::SqlTypeCode;

/// A canonical type as produced by a type registry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedType {
    /// Canonical type name.
    pub name: String,
    /// Name of the runtime class values map to.
    pub returned_class: String,
    /// SQL type codes, one per column the type spans.
    pub sql_types: Vec<SqlTypeCode>,
}

impl ResolvedType {
    /// Creates a resolved type.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        returned_class: impl Into<String>,
        sql_types: impl IntoIterator<Item = SqlTypeCode>,
    ) -> Self {
        Self {
            name: name.into(),
            returned_class: returned_class.into(),
            sql_types: sql_types.into_iter().collect(),
        }
    }

    /// Returns the number of columns the type spans.
    #[must_use]
    pub fn column_span(&self) -> usize {
        self.sql_types.len()
    }
}

/// What is known about an attribute's type.
///
/// The resolved type is computed once and cached here; later lookups
/// reuse it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Declared runtime type, from the mapping or the attribute's class.
    pub declared_type_name: Option<String>,
    /// Explicit type name, after type-definition expansion.
    pub explicit_type_name: Option<String>,
    /// Type parameters, after type-definition expansion.
    pub type_parameters: TypeParameters,
    /// The resolved canonical type.
    pub resolved: Option<ResolvedType>,
}

impl TypeDescriptor {
    /// Creates an empty descriptor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once a canonical type has been resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    /// Returns the name a registry lookup should use: explicit, else declared.
    #[must_use]
    pub fn lookup_name(&self) -> Option<&str> {
        self.explicit_type_name
            .as_deref()
            .or(self.declared_type_name.as_deref())
    }
}

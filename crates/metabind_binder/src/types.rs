//! Type registries.

use std::collections::HashMap;
use std::fmt;

use metabind_binding::ResolvedType;
use metabind_foundation::TypeParameters;
use metabind_relational::SqlTypeCode;

/// A named type definition: an implementation plus default parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDefinition {
    /// Definition name, used as an explicit type name in mappings.
    pub name: String,
    /// Name of the implementing type.
    pub type_implementation: String,
    /// Default parameters; attribute-local parameters override them.
    pub parameters: TypeParameters,
}

impl TypeDefinition {
    /// Creates a definition without parameters.
    #[must_use]
    pub fn new(name: impl Into<String>, type_implementation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_implementation: type_implementation.into(),
            parameters: TypeParameters::new(),
        }
    }

    /// Adds a default parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

/// Resolves type names to canonical types.
pub trait TypeRegistry: fmt::Debug {
    /// Looks up a named type definition.
    fn type_definition(&self, name: &str) -> Option<&TypeDefinition>;

    /// Resolves a type name or runtime class name to a canonical type.
    fn heuristic_type(&self, name: &str, parameters: &TypeParameters) -> Option<ResolvedType>;
}

/// A registry of standard scalar types plus registered types and definitions.
///
/// Types resolve by canonical name or by runtime class name.
#[derive(Clone, Debug)]
pub struct BasicTypeRegistry {
    types: HashMap<String, ResolvedType>,
    definitions: HashMap<String, TypeDefinition>,
}

impl Default for BasicTypeRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for (name, class, code) in [
            ("boolean", "bool", SqlTypeCode::BOOLEAN),
            ("byte", "i8", SqlTypeCode::TINYINT),
            ("short", "i16", SqlTypeCode::SMALLINT),
            ("integer", "i32", SqlTypeCode::INTEGER),
            ("long", "i64", SqlTypeCode::BIGINT),
            ("float", "f32", SqlTypeCode::FLOAT),
            ("double", "f64", SqlTypeCode::DOUBLE),
            ("big_decimal", "Decimal", SqlTypeCode::NUMERIC),
            ("character", "char", SqlTypeCode::CHAR),
            ("string", "String", SqlTypeCode::VARCHAR),
            ("text", "String", SqlTypeCode::CLOB),
            ("binary", "Vec<u8>", SqlTypeCode::VARBINARY),
            ("date", "NaiveDate", SqlTypeCode::DATE),
            ("time", "NaiveTime", SqlTypeCode::TIME),
            ("timestamp", "SystemTime", SqlTypeCode::TIMESTAMP),
        ] {
            registry.register_type(ResolvedType::new(name, class, [code]));
        }
        registry
    }
}

impl BasicTypeRegistry {
    /// Creates a registry with the standard scalar types.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with no types at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            types: HashMap::new(),
            definitions: HashMap::new(),
        }
    }

    /// Registers a type under its name and, if not already taken, its class name.
    pub fn register_type(&mut self, resolved: ResolvedType) {
        self.types
            .entry(resolved.returned_class.clone())
            .or_insert_with(|| resolved.clone());
        self.types.insert(resolved.name.clone(), resolved);
    }

    /// Registers a type definition.
    pub fn register_definition(&mut self, definition: TypeDefinition) {
        self.definitions.insert(definition.name.clone(), definition);
    }

    /// Builder method to register a type.
    #[must_use]
    pub fn with_type(mut self, resolved: ResolvedType) -> Self {
        self.register_type(resolved);
        self
    }

    /// Builder method to register a type definition.
    #[must_use]
    pub fn with_definition(mut self, definition: TypeDefinition) -> Self {
        self.register_definition(definition);
        self
    }
}

impl TypeRegistry for BasicTypeRegistry {
    fn type_definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.definitions.get(name)
    }

    fn heuristic_type(&self, name: &str, _parameters: &TypeParameters) -> Option<ResolvedType> {
        self.types.get(name).cloned()
    }
}

//! Binder configuration.

use metabind_foundation::{MetaAttributeSource, TypeParameters};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Property accessor used when a mapping names none.
pub const DEFAULT_PROPERTY_ACCESSOR: &str = "property";

/// Settings applied across a binding session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinderOptions {
    /// Quote every generated table and column name.
    pub globally_quoted_identifiers: bool,

    /// Schema used when a table names none.
    pub default_schema_name: Option<String>,

    /// Catalog used when a table names none.
    pub default_catalog_name: Option<String>,

    /// Property accessor used when an attribute names none.
    pub default_property_accessor: String,

    /// Settings handed to every identifier generator.
    ///
    /// They override the built-in generator defaults and are overridden by a
    /// generator's own parameters.
    pub generator_settings: TypeParameters,

    /// Meta attributes visible to every entity; only inheritable ones are inherited.
    pub global_meta_attributes: Vec<MetaAttributeSource>,
}

impl Default for BinderOptions {
    fn default() -> Self {
        Self {
            globally_quoted_identifiers: false,
            default_schema_name: None,
            default_catalog_name: None,
            default_property_accessor: DEFAULT_PROPERTY_ACCESSOR.to_string(),
            generator_settings: TypeParameters::new(),
            global_meta_attributes: Vec::new(),
        }
    }
}

impl BinderOptions {
    /// Creates options with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that quote every generated identifier.
    #[must_use]
    pub fn quoted() -> Self {
        Self {
            globally_quoted_identifiers: true,
            ..Self::default()
        }
    }

    /// Builder method to enable/disable global identifier quoting.
    #[must_use]
    pub fn with_globally_quoted_identifiers(mut self, quoted: bool) -> Self {
        self.globally_quoted_identifiers = quoted;
        self
    }

    /// Builder method to set the default schema.
    #[must_use]
    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema_name = Some(schema.into());
        self
    }

    /// Builder method to set the default catalog.
    #[must_use]
    pub fn with_default_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.default_catalog_name = Some(catalog.into());
        self
    }

    /// Builder method to set the default property accessor.
    #[must_use]
    pub fn with_default_property_accessor(mut self, accessor: impl Into<String>) -> Self {
        self.default_property_accessor = accessor.into();
        self
    }

    /// Builder method to add a generator setting.
    #[must_use]
    pub fn with_generator_setting(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.generator_settings.insert(name.into(), value.into());
        self
    }

    /// Builder method to add a global meta attribute.
    #[must_use]
    pub fn with_global_meta(mut self, meta: MetaAttributeSource) -> Self {
        self.global_meta_attributes.push(meta);
        self
    }

    /// Quotes `name` if identifiers are globally quoted.
    #[must_use]
    pub fn quote_identifier(&self, name: &str) -> String {
        if self.globally_quoted_identifiers {
            metabind_foundation::quote(name)
        } else {
            name.to_string()
        }
    }
}

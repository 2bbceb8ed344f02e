//! Collaborators the binder consults while binding.

use crate::generator::{DefaultIdentifierGeneratorFactory, IdentifierGeneratorFactory};
use crate::introspect::{AttributeTypeIntrospector, ClassCatalog};
use crate::naming::{DefaultNamingStrategy, NamingStrategy};
use crate::types::{BasicTypeRegistry, TypeRegistry};

/// The naming strategy, type registry, introspector, and generator factory
/// used by a [`Binder`](crate::Binder).
#[derive(Debug)]
pub struct BindingServices {
    /// Derives physical table and column names.
    pub naming: Box<dyn NamingStrategy>,
    /// Resolves type names.
    pub types: Box<dyn TypeRegistry>,
    /// Discovers declared attribute types.
    pub introspector: Box<dyn AttributeTypeIntrospector>,
    /// Builds identifier generators.
    pub generators: Box<dyn IdentifierGeneratorFactory>,
}

impl Default for BindingServices {
    fn default() -> Self {
        Self {
            naming: Box::new(DefaultNamingStrategy),
            types: Box::new(BasicTypeRegistry::new()),
            introspector: Box::new(ClassCatalog::new()),
            generators: Box::new(DefaultIdentifierGeneratorFactory::new()),
        }
    }
}

impl BindingServices {
    /// Creates the default services.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to replace the naming strategy.
    #[must_use]
    pub fn with_naming(mut self, naming: impl NamingStrategy + 'static) -> Self {
        self.naming = Box::new(naming);
        self
    }

    /// Builder method to replace the type registry.
    #[must_use]
    pub fn with_types(mut self, types: impl TypeRegistry + 'static) -> Self {
        self.types = Box::new(types);
        self
    }

    /// Builder method to replace the introspector.
    #[must_use]
    pub fn with_introspector(
        mut self,
        introspector: impl AttributeTypeIntrospector + 'static,
    ) -> Self {
        self.introspector = Box::new(introspector);
        self
    }

    /// Builder method to replace the identifier generator factory.
    #[must_use]
    pub fn with_generators(
        mut self,
        generators: impl IdentifierGeneratorFactory + 'static,
    ) -> Self {
        self.generators = Box::new(generators);
        self
    }
}

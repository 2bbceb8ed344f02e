//! Identifier generator factories.

use std::collections::HashMap;
use std::fmt;

use metabind_binding::IdentifierGenerator;
use metabind_foundation::{Error, ErrorKind, IdGenerator, Result, TypeParameters};

/// Merged settings handed to an identifier generator.
pub type GeneratorSettings = TypeParameters;

/// Setting: prefer the pooled-lo optimizer for pooled generators.
pub const PREFER_POOLED_VALUES_LO: &str = "prefer_pooled_values_lo";

/// Setting: how generators normalize the database object names they create.
pub const IDENTIFIER_NORMALIZER: &str = "identifier_normalizer";

/// Setting: the entity a generator produces identifiers for.
pub const ENTITY_NAME: &str = "entity_name";

/// Name of the generator used when a simple identifier declares none.
pub const DEFAULT_GENERATOR_NAME: &str = "default_assign_identity_generator";

/// Builds identifier generators by strategy name.
pub trait IdentifierGeneratorFactory: fmt::Debug {
    /// Creates a generator for `strategy` configured with `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if the strategy is unknown.
    fn create(
        &self,
        strategy: &str,
        settings: &GeneratorSettings,
    ) -> Result<Box<dyn IdentifierGenerator>>;
}

/// Merges generator settings: built-in defaults, then global settings, then
/// the descriptor's own parameters.
#[must_use]
pub fn merge_generator_settings(
    global: &TypeParameters,
    descriptor: &IdGenerator,
    globally_quoted_identifiers: bool,
) -> GeneratorSettings {
    let mut settings = global.clone();
    if !settings.contains_key(PREFER_POOLED_VALUES_LO) {
        settings.insert(PREFER_POOLED_VALUES_LO.to_string(), "false".to_string());
    }
    if !settings.contains_key(IDENTIFIER_NORMALIZER) {
        let normalizer = if globally_quoted_identifiers {
            "quoted"
        } else {
            "unquoted"
        };
        settings.insert(IDENTIFIER_NORMALIZER.to_string(), normalizer.to_string());
    }
    settings.extend(descriptor.parameters.clone());
    settings
}

/// A generator descriptor configured by [`DefaultIdentifierGeneratorFactory`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfiguredGenerator {
    strategy: String,
    settings: GeneratorSettings,
    post_insert: bool,
}

impl IdentifierGenerator for ConfiguredGenerator {
    fn strategy(&self) -> &str {
        &self.strategy
    }

    fn settings(&self) -> &TypeParameters {
        &self.settings
    }

    fn is_post_insert(&self) -> bool {
        self.post_insert
    }
}

/// Knows the built-in strategies and any registered ones.
#[derive(Clone, Debug)]
pub struct DefaultIdentifierGeneratorFactory {
    strategies: HashMap<String, bool>,
}

impl Default for DefaultIdentifierGeneratorFactory {
    fn default() -> Self {
        let mut factory = Self {
            strategies: HashMap::new(),
        };
        for (strategy, post_insert) in [
            ("assigned", false),
            ("increment", false),
            ("sequence", false),
            ("identity", true),
            ("uuid", false),
        ] {
            factory.register(strategy, post_insert);
        }
        factory
    }
}

impl DefaultIdentifierGeneratorFactory {
    /// Creates a factory with the built-in strategies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a strategy; `post_insert` strategies learn values from the insert.
    pub fn register(&mut self, strategy: impl Into<String>, post_insert: bool) {
        self.strategies.insert(strategy.into(), post_insert);
    }

    /// Builder method to register a strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: impl Into<String>, post_insert: bool) -> Self {
        self.register(strategy, post_insert);
        self
    }
}

impl IdentifierGeneratorFactory for DefaultIdentifierGeneratorFactory {
    fn create(
        &self,
        strategy: &str,
        settings: &GeneratorSettings,
    ) -> Result<Box<dyn IdentifierGenerator>> {
        let post_insert = *self
            .strategies
            .get(strategy)
            .ok_or_else(|| Error::new(ErrorKind::UnknownGeneratorStrategy(strategy.to_string())))?;
        Ok(Box::new(ConfiguredGenerator {
            strategy: strategy.to_string(),
            settings: settings.clone(),
            post_insert,
        }))
    }
}

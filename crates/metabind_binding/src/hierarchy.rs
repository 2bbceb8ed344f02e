//! Settings shared by every entity of an inheritance hierarchy.

use std::fmt;

use metabind_foundation::{
    Caching, EntityMode, IdGenerator, InheritanceType, OptimisticLockStyle, TypeParameters,
};

use crate::attribute::{AttributeBindingId, RelationalValueBinding};
use crate::types::TypeDescriptor;

/// Identifies a hierarchy in [`Metadata`](crate::Metadata).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HierarchyId(pub(crate) u32);

impl fmt::Debug for HierarchyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HierarchyId({})", self.0)
    }
}

/// A configured identifier generator.
///
/// Produced by an identifier generator factory from a strategy name and the
/// merged generator settings.
pub trait IdentifierGenerator: fmt::Debug {
    /// The strategy this generator implements.
    fn strategy(&self) -> &str;

    /// The settings the generator was configured with.
    fn settings(&self) -> &TypeParameters;

    /// Returns true if values are only known after the row is inserted.
    fn is_post_insert(&self) -> bool {
        false
    }
}

/// The identifier of a hierarchy.
#[derive(Debug)]
pub struct EntityIdentifier {
    /// The identifier attribute on the root entity.
    pub attribute: AttributeBindingId,
    /// The generator descriptor the generator is built from.
    pub generator_descriptor: IdGenerator,
    /// The configured generator; created once the whole root entity is bound.
    pub generator: Option<Box<dyn IdentifierGenerator>>,
}

/// The discriminator of a hierarchy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityDiscriminator {
    /// The discriminator column or formula.
    pub value: RelationalValueBinding,
    /// Discriminator type information.
    pub type_descriptor: TypeDescriptor,
    /// Written on insert.
    pub inserted: bool,
    /// Always applied as a restriction.
    pub forced: bool,
}

/// Settings shared by every entity of a hierarchy.
#[derive(Debug)]
pub struct HierarchyDetails {
    /// Name of the root entity.
    pub root_entity_name: String,
    /// How the hierarchy maps to tables.
    pub inheritance: InheritanceType,
    /// Runtime representation.
    pub entity_mode: EntityMode,
    /// Identifier, once bound.
    pub identifier: Option<EntityIdentifier>,
    /// Version attribute.
    pub version: Option<AttributeBindingId>,
    /// Discriminator.
    pub discriminator: Option<EntityDiscriminator>,
    /// Second-level cache settings.
    pub caching: Option<Caching>,
    /// Only queried explicitly, never through a superclass.
    pub explicit_polymorphism: bool,
    /// Optimistic locking strategy.
    pub optimistic_lock_style: OptimisticLockStyle,
    /// Instances may change.
    pub mutable: bool,
    /// SQL restriction applied when loading.
    pub where_filter: Option<String>,
    /// Database row id column.
    pub row_id: Option<String>,
}

impl HierarchyDetails {
    /// Creates details for a hierarchy rooted at `root_entity_name`.
    #[must_use]
    pub fn new(
        root_entity_name: impl Into<String>,
        inheritance: InheritanceType,
        entity_mode: EntityMode,
    ) -> Self {
        Self {
            root_entity_name: root_entity_name.into(),
            inheritance,
            entity_mode,
            identifier: None,
            version: None,
            discriminator: None,
            caching: None,
            explicit_polymorphism: false,
            optimistic_lock_style: OptimisticLockStyle::Version,
            mutable: true,
            where_filter: None,
            row_id: None,
        }
    }

    /// Returns the identifier attribute, once bound.
    #[must_use]
    pub fn identifier_attribute(&self) -> Option<AttributeBindingId> {
        self.identifier.as_ref().map(|identifier| identifier.attribute)
    }
}

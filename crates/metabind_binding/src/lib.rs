//! Resolved binding model for metabind.
//!
//! The binder fills a [`Metadata`] with entity, attribute, and collection
//! bindings that refer to each other and to the relational model by id.
//!
//! This crate provides:
//! - [`Metadata`] - Arenas of bindings plus the [`Database`](metabind_relational::Database)
//! - [`EntityBinding`] - One bound entity and its tables
//! - [`AttributeBinding`] - Basic, many-to-one, component, and collection attributes
//! - [`HierarchyDetails`] - Identifier, version, discriminator, and policies of a hierarchy
//! - [`TypeDescriptor`] - Declared, explicit, and resolved type information

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod attribute;
mod domain;
mod entity;
mod hierarchy;
mod metadata;
mod plural;
mod types;

pub use attribute::{
    AttributeBinding, AttributeBindingId, AttributeBindingKind, BasicAttributeBinding,
    ComponentAttributeBinding, ContainerRef, ManyToOneAttributeBinding, RelationalValueBinding,
};
pub use domain::{AttributeContainer, DomainAttribute, DomainAttributeKind};
pub use entity::{EntityBinding, EntityBindingId};
pub use hierarchy::{
    EntityDiscriminator, EntityIdentifier, HierarchyDetails, HierarchyId, IdentifierGenerator,
};
pub use metadata::Metadata;
pub use plural::{
    BasicCollectionElement, CollectionElement, CollectionKey, CollectionNature,
    PluralAttributeBinding,
};
pub use types::{ResolvedType, TypeDescriptor};

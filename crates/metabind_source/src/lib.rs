//! Abstract mapping source model consumed by the metabind binder.
//!
//! A mapping front end (XML documents, annotations, ...) produces these
//! immutable descriptions; the binder turns them into a binding model.
//!
//! This crate provides:
//! - [`EntityHierarchy`] - One inheritance tree and its strategy
//! - [`EntitySource`] / [`RootEntitySource`] - Entity descriptions
//! - [`AttributeSource`] - Basic, many-to-one, component, and plural attributes
//! - [`RelationalValueSource`] - Column and formula descriptions

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod attribute;
mod entity;
mod plural;
mod relational;

pub use attribute::{
    AttributeSource, ColumnBindingDefaults, ComponentAttributeSource, ExplicitTypeSource,
    SingularAttributeSource, ToOneAttributeSource,
};
pub use entity::{
    DiscriminatorSource, EntityHierarchy, EntitySource, IdentifierSource, RootEntitySource,
};
pub use plural::{
    BasicPluralElementSource, PluralAttributeElementNature, PluralAttributeElementSource,
    PluralAttributeKeySource, PluralAttributeNature, PluralAttributeSource,
};
pub use relational::{
    ColumnSource, ConstraintSource, DerivedValueSource, RelationalValueSource, TableSource,
};

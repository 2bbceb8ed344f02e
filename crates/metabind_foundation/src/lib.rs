//! Errors, identifiers, and shared mapping vocabulary for metabind.
//!
//! This crate provides:
//! - [`Error`] - Binding errors with origin context
//! - [`Identifier`] - Quoting-aware relational identifiers
//! - [`MetaAttributeContext`] - Inherited meta attributes
//! - The mapping vocabulary shared by source and binding models
//!   ([`InheritanceType`], [`TruthValue`], [`FetchTiming`], ...)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod identifier;
pub mod mapping;
pub mod meta;

pub use error::{Error, ErrorContext, ErrorKind, KeySide, Origin, OriginKind};
pub use identifier::{Identifier, quote};
pub use mapping::{
    AccessType, CascadeStyle, Caching, CustomSql, EntityMode, ExecuteUpdateResultCheckStyle,
    FetchStyle, FetchTiming, IdGenerator, InheritanceType, OnDeleteAction, OptimisticLockStyle,
    PropertyGeneration, TruthValue, TypeParameters,
};
pub use meta::{MetaAttribute, MetaAttributeContext, MetaAttributeSource};

/// Result type alias using metabind's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

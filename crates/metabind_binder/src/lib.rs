//! Binder for metabind.
//!
//! The binder walks [`EntityHierarchy`](metabind_source::EntityHierarchy)
//! sources and produces a [`Metadata`](metabind_binding::Metadata): entity
//! and attribute bindings, resolved types, and the tables, columns, keys,
//! and constraints they map to.
//!
//! This crate provides:
//! - [`Binder`] - Entry point; one binding session per call
//! - [`BinderOptions`] - Quoting, default schema and catalog, generator settings
//! - [`BindingServices`] - Naming strategy, type registry, introspector, generator factory
//! - [`NamingStrategy`] / [`TypeRegistry`] / [`AttributeTypeIntrospector`] - Pluggable collaborators

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod attributes;
mod binder;
mod collections;
mod generator;
mod hierarchy;
mod introspect;
mod naming;
mod options;
mod reference;
mod relational;
mod services;
mod session;
mod types;
mod typing;

pub use binder::Binder;
pub use generator::{
    ConfiguredGenerator, DEFAULT_GENERATOR_NAME, DefaultIdentifierGeneratorFactory, ENTITY_NAME,
    GeneratorSettings, IDENTIFIER_NORMALIZER, IdentifierGeneratorFactory, PREFER_POOLED_VALUES_LO,
    merge_generator_settings,
};
pub use introspect::{AttributeTypeIntrospector, ClassCatalog, ClassDescriptor, MemberType};
pub use naming::{DefaultNamingStrategy, NamingStrategy, unqualify};
pub use options::{BinderOptions, DEFAULT_PROPERTY_ACCESSOR};
pub use services::BindingServices;
pub use types::{BasicTypeRegistry, TypeDefinition, TypeRegistry};

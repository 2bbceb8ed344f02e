//! Metabind - entity mapping metadata binder
//!
//! This crate re-exports all layers of the metabind system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: metabind_binder     - Binding session, naming, types, generators
//! Layer 2: metabind_binding    - Entity, attribute, and collection bindings
//!          metabind_source     - Abstract mapping sources
//! Layer 1: metabind_relational - Tables, columns, keys, constraints
//! Layer 0: metabind_foundation - Errors, identifiers, mapping vocabulary
//! ```

pub use metabind_binder as binder;
pub use metabind_binding as binding;
pub use metabind_foundation as foundation;
pub use metabind_relational as relational;
pub use metabind_source as source;

pub use metabind_binder::{Binder, BinderOptions, BindingServices};
pub use metabind_binding::Metadata;
pub use metabind_foundation::{Error, ErrorKind, Result};

//! Integration tests for entity and hierarchy binding
//!
//! Tests root entities, identifiers, discriminators, inheritance strategies,
//! and hierarchy-wide settings.

mod identifiers;
mod settings;

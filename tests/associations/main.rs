//! Integration tests for associations
//!
//! Tests many-to-one target resolution, on-demand binding of referenced
//! entities, property references, and nested components.

mod references;

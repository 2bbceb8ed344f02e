//! Error types for the binding engine.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The main error type for binding operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Attaches the originating mapping document, keeping any existing stack.
    #[must_use]
    pub fn with_origin(mut self, origin: &Origin) -> Self {
        let context = self.context.take().unwrap_or_default();
        if context.origin.is_some() {
            self.context = Some(context);
        } else {
            self.context = Some(context.with_origin(origin.clone()));
        }
        self
    }

    /// Records an enclosing binding step; frames added later sit further out.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        let mut context = self.context.take().unwrap_or_default();
        context.stack.insert(0, frame.into());
        self.context = Some(context);
        self
    }

    /// Creates a caller contract violation.
    #[must_use]
    pub fn contract_violation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ContractViolation(message.into()))
    }

    /// Creates a not-yet-implemented error for a named mapping feature.
    #[must_use]
    pub fn not_yet_implemented(feature: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotYetImplemented(feature.into()))
    }

    /// Creates an unknown entity error.
    #[must_use]
    pub fn unknown_entity(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownEntity(name.into()))
    }

    /// Creates an unknown attribute error.
    #[must_use]
    pub fn unknown_attribute(entity: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownAttribute {
            entity: entity.into(),
            attribute: attribute.into(),
        })
    }

    /// Creates a collection key cardinality mismatch error.
    #[must_use]
    pub fn key_cardinality_mismatch(role: impl Into<String>, excess: KeySide) -> Self {
        Self::new(ErrorKind::KeyCardinalityMismatch {
            role: role.into(),
            excess,
        })
    }

    /// Returns true if this error reports an explicitly unsupported mapping.
    #[must_use]
    pub fn is_not_yet_implemented(&self) -> bool {
        matches!(self.kind, ErrorKind::NotYetImplemented(_))
    }

    /// Returns true if this error is a caller contract violation.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(self.kind, ErrorKind::ContractViolation(_))
    }
}

/// Which side of a collection key has values left over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeySide {
    /// More key source columns than target columns.
    Source,
    /// More target columns than key source columns.
    Target,
}

impl fmt::Display for KeySide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "more collection key source columns than target columns"),
            Self::Target => write!(f, "more collection key target columns than source columns"),
        }
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The caller handed the binder structurally incomplete input.
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// The mapping uses a feature the binder does not support yet.
    #[error("not yet implemented: {0}")]
    NotYetImplemented(String),

    /// A collection key and its target have different column counts.
    #[error("{excess} for collection: {role}")]
    KeyCardinalityMismatch {
        /// Role of the offending collection.
        role: String,
        /// The side with values left over.
        excess: KeySide,
    },

    /// A collection key column is paired with a derived target value.
    #[error(
        "type mismatch between collection key source and target; collection: {role}; \
         source column ({column}) corresponds with target derived value ({expression})"
    )]
    KeyTypeMismatch {
        /// Role of the offending collection.
        role: String,
        /// The key source column name.
        column: String,
        /// The target formula.
        expression: String,
    },

    /// A collection key property-ref names a plural attribute.
    #[error("collection ({role}) property-ref names plural attribute {attribute}")]
    PluralPropertyReference {
        /// Role of the offending collection.
        role: String,
        /// The referenced attribute name.
        attribute: String,
    },

    /// No source was supplied for a referenced entity.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// An attribute reference did not resolve.
    #[error("attribute not found: {attribute} on entity {entity}")]
    UnknownAttribute {
        /// The entity that was searched.
        entity: String,
        /// The attribute name that was not found.
        attribute: String,
    },

    /// A logical table name did not resolve.
    #[error("table not found: {table} on entity {entity}")]
    UnknownTable {
        /// The entity that was searched.
        entity: String,
        /// The logical table name that was not found.
        table: String,
    },

    /// An association names no target and none could be discovered.
    #[error("cannot determine the referenced entity for association {0}")]
    UnresolvedAssociationTarget(String),

    /// The identifier generator factory does not know a strategy.
    #[error("unknown identifier generator strategy: {0}")]
    UnknownGeneratorStrategy(String),
}

/// Kind of document a mapping came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OriginKind {
    /// A mapping document (e.g. an XML file).
    File,
    /// Annotations on a class.
    Annotation,
    /// Built programmatically.
    #[default]
    Other,
}

/// Where a piece of mapping metadata was declared.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Origin {
    /// The kind of source.
    pub kind: OriginKind,
    /// The document or class name.
    pub name: String,
}

impl Origin {
    /// Creates an origin for a mapping file.
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            kind: OriginKind::File,
            name: name.into(),
        }
    }

    /// Creates an origin for an annotated class.
    #[must_use]
    pub fn annotation(class_name: impl Into<String>) -> Self {
        Self {
            kind: OriginKind::Annotation,
            name: class_name.into(),
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            OriginKind::File => write!(f, "file {}", self.name),
            OriginKind::Annotation => write!(f, "class {}", self.name),
            OriginKind::Other => write!(f, "{}", self.name),
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The mapping document the failing element came from.
    pub origin: Option<Origin>,
    /// Entities and attributes being bound, outermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the origin.
    #[must_use]
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(origin) = &self.origin {
            write!(f, "in {origin}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  binding {frame}")?;
            }
        }
        Ok(())
    }
}

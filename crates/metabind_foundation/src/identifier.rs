//! Relational identifiers with quoting.
//!
//! A name wrapped in backticks (`` `order` ``) is a quoted identifier; the
//! backticks are stripped and the quoted flag is kept instead.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A table, column, schema, or catalog name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Identifier {
    text: String,
    quoted: bool,
}

impl Identifier {
    /// Parses a possibly back-quoted name.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        if name.len() >= 2 && name.starts_with('`') && name.ends_with('`') {
            Self {
                text: name[1..name.len() - 1].to_string(),
                quoted: true,
            }
        } else {
            Self {
                text: name.to_string(),
                quoted: false,
            }
        }
    }

    /// Parses an optional name, treating empty strings as absent.
    #[must_use]
    pub fn parse_opt(name: Option<&str>) -> Option<Self> {
        name.filter(|n| !n.is_empty()).map(Self::parse)
    }

    /// Returns the name without quotes.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns true if the identifier is quoted.
    #[must_use]
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// Renders the identifier in its back-quoted mapping form.
    #[must_use]
    pub fn to_mapping_form(&self) -> String {
        if self.quoted {
            quote(&self.text)
        } else {
            self.text.clone()
        }
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self.to_mapping_form())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_mapping_form())
    }
}

/// Wraps a name in backticks unless it already is.
#[must_use]
pub fn quote(name: &str) -> String {
    if name.len() >= 2 && name.starts_with('`') && name.ends_with('`') {
        name.to_string()
    } else {
        format!("`{name}`")
    }
}

//! Meta attributes: free-form name/value annotations on mapped elements.
//!
//! Contexts are inherited down the mapping tree. A name declared locally
//! shadows the inherited attribute of the same name; repeated local
//! declarations accumulate values.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A meta attribute declaration in the source model.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MetaAttributeSource {
    /// Attribute name.
    pub name: String,
    /// One value.
    pub value: String,
    /// Whether entities inherit it from the global context.
    pub inheritable: bool,
}

impl MetaAttributeSource {
    /// Creates an inheritable meta attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inheritable: true,
        }
    }

    /// Marks the attribute as not inheritable.
    #[must_use]
    pub fn not_inheritable(mut self) -> Self {
        self.inheritable = false;
        self
    }
}

/// A resolved meta attribute with all of its values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetaAttribute {
    /// Attribute name.
    pub name: String,
    /// Values in declaration order.
    pub values: Vec<String>,
}

impl MetaAttribute {
    /// Returns the first value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

/// The meta attributes visible at one level of the mapping tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetaAttributeContext {
    attributes: im::OrdMap<String, MetaAttribute>,
    local: im::OrdSet<String>,
}

impl MetaAttributeContext {
    /// Creates an empty root context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a child context from local declarations.
    ///
    /// With `only_inheritable`, declarations not marked inheritable are skipped.
    #[must_use]
    pub fn extend<'a>(
        &self,
        sources: impl IntoIterator<Item = &'a MetaAttributeSource>,
        only_inheritable: bool,
    ) -> Self {
        let mut child = Self {
            attributes: self.attributes.clone(),
            local: im::OrdSet::new(),
        };
        for source in sources {
            if only_inheritable && !source.inheritable {
                continue;
            }
            if !child.local.contains(&source.name) {
                child.local.insert(source.name.clone());
                child.attributes.insert(
                    source.name.clone(),
                    MetaAttribute {
                        name: source.name.clone(),
                        values: Vec::new(),
                    },
                );
            }
            if let Some(attribute) = child.attributes.get_mut(&source.name) {
                attribute.values.push(source.value.clone());
            }
        }
        child
    }

    /// Looks up a visible meta attribute, local or inherited.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MetaAttribute> {
        self.attributes.get(name)
    }

    /// Looks up a meta attribute declared at this level.
    #[must_use]
    pub fn local(&self, name: &str) -> Option<&MetaAttribute> {
        if self.local.contains(name) {
            self.attributes.get(name)
        } else {
            None
        }
    }

    /// Returns the number of visible meta attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns true if no meta attribute is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

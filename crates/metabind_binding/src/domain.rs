//! Domain model: the attribute slots of entities and components.

/// Shape of a domain attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DomainAttributeKind {
    /// A single value, association, or component.
    Singular,
    /// A collection.
    Plural,
}

/// An attribute slot on an entity or component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainAttribute {
    /// Attribute name.
    pub name: String,
    /// Singular or plural.
    pub kind: DomainAttributeKind,
    /// Has no backing field or accessor.
    pub virtual_attribute: bool,
    /// Declared runtime type, once discovered.
    pub declared_type: Option<String>,
}

/// An entity or component class and its attribute slots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeContainer {
    name: String,
    class_name: Option<String>,
    super_name: Option<String>,
    attributes: Vec<DomainAttribute>,
}

impl AttributeContainer {
    /// Creates an empty container.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        class_name: Option<String>,
        super_name: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            class_name,
            super_name,
            attributes: Vec::new(),
        }
    }

    /// Returns the entity name or component path.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the mapped class, if any.
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Returns the superclass container's name.
    #[must_use]
    pub fn super_name(&self) -> Option<&str> {
        self.super_name.as_deref()
    }

    /// Looks up an attribute slot.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&DomainAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Iterates over attribute slots in creation order.
    pub fn attributes(&self) -> impl Iterator<Item = &DomainAttribute> {
        self.attributes.iter()
    }

    /// Returns the slot with the given name, creating it if needed.
    ///
    /// An existing slot keeps its original kind and virtual flag.
    pub fn locate_or_create(
        &mut self,
        name: &str,
        kind: DomainAttributeKind,
        virtual_attribute: bool,
    ) -> &mut DomainAttribute {
        let position = match self.attributes.iter().position(|a| a.name == name) {
            Some(position) => position,
            None => {
                self.attributes.push(DomainAttribute {
                    name: name.to_string(),
                    kind,
                    virtual_attribute,
                    declared_type: None,
                });
                self.attributes.len() - 1
            }
        };
        &mut self.attributes[position]
    }

    /// Records a slot's declared type unless one is already known.
    pub fn set_declared_type_if_absent(&mut self, name: &str, declared_type: &str) {
        if let Some(attribute) = self.attributes.iter_mut().find(|a| a.name == name) {
            if attribute.declared_type.is_none() {
                attribute.declared_type = Some(declared_type.to_string());
            }
        }
    }
}

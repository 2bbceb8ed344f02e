//! Discovery of declared attribute types.

use std::collections::HashMap;
use std::fmt;

/// Reports the declared types of class members.
pub trait AttributeTypeIntrospector: fmt::Debug {
    /// The declared type of a member: its accessor's type, else its field's type.
    fn declared_type(&self, owner_class: &str, member: &str) -> Option<String>;

    /// The element type of a collection member.
    ///
    /// A single generic argument is the element type; with two (a map), the
    /// second is.
    fn element_type(&self, owner_class: &str, member: &str) -> Option<String>;
}

/// The type of a field or accessor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberType {
    /// Type name without generic arguments.
    pub name: String,
    /// Generic arguments in order.
    pub arguments: Vec<String>,
}

impl MemberType {
    /// A non-generic type.
    #[must_use]
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// A generic type.
    #[must_use]
    pub fn generic<I, S>(name: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    fn element_type(&self) -> Option<&str> {
        match self.arguments.as_slice() {
            [element] | [_, element] => Some(element),
            _ => None,
        }
    }
}

/// The members of one class.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassDescriptor {
    accessors: HashMap<String, MemberType>,
    fields: HashMap<String, MemberType>,
}

impl ClassDescriptor {
    /// Creates a class with no members.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, member_type: MemberType) -> Self {
        self.fields.insert(name.into(), member_type);
        self
    }

    /// Adds an accessor.
    #[must_use]
    pub fn with_accessor(mut self, name: impl Into<String>, member_type: MemberType) -> Self {
        self.accessors.insert(name.into(), member_type);
        self
    }

    fn member(&self, name: &str) -> Option<&MemberType> {
        self.accessors.get(name).or_else(|| self.fields.get(name))
    }
}

/// A static catalog of classes and their member types.
#[derive(Clone, Debug, Default)]
pub struct ClassCatalog {
    classes: HashMap<String, ClassDescriptor>,
}

impl ClassCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a class, replacing any previous description.
    #[must_use]
    pub fn with_class(mut self, class_name: impl Into<String>, class: ClassDescriptor) -> Self {
        self.classes.insert(class_name.into(), class);
        self
    }

    fn member(&self, owner_class: &str, member: &str) -> Option<&MemberType> {
        self.classes.get(owner_class)?.member(member)
    }
}

impl AttributeTypeIntrospector for ClassCatalog {
    fn declared_type(&self, owner_class: &str, member: &str) -> Option<String> {
        self.member(owner_class, member).map(|m| m.name.clone())
    }

    fn element_type(&self, owner_class: &str, member: &str) -> Option<String> {
        self.member(owner_class, member)?
            .element_type()
            .map(str::to_string)
    }
}

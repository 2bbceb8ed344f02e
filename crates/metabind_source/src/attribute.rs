//! Attribute sources.

use metabind_foundation::{
    CascadeStyle, FetchStyle, FetchTiming, MetaAttributeSource, PropertyGeneration,
    TypeParameters,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::plural::PluralAttributeSource;
use crate::relational::RelationalValueSource;

/// Defaults applied to relational values whose source leaves a flag unspecified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColumnBindingDefaults {
    /// Values are written on insert.
    pub included_in_insert: bool,
    /// Values are written on update.
    pub included_in_update: bool,
    /// Columns accept nulls.
    pub nullable: bool,
}

impl ColumnBindingDefaults {
    /// Ordinary attribute values: inserted, updated, nullable.
    pub const ATTRIBUTE: ColumnBindingDefaults = ColumnBindingDefaults {
        included_in_insert: true,
        included_in_update: true,
        nullable: true,
    };

    /// Discriminator values: inserted, never updated, not nullable.
    pub const DISCRIMINATOR: ColumnBindingDefaults = ColumnBindingDefaults {
        included_in_insert: true,
        included_in_update: false,
        nullable: false,
    };

    /// Collection key values: inserted, never updated, not nullable.
    pub const COLLECTION_KEY: ColumnBindingDefaults = ColumnBindingDefaults {
        included_in_insert: true,
        included_in_update: false,
        nullable: false,
    };
}

impl Default for ColumnBindingDefaults {
    fn default() -> Self {
        Self::ATTRIBUTE
    }
}

/// An explicit type override and its parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExplicitTypeSource {
    /// Type name or type-definition name.
    pub name: Option<String>,
    /// Attribute-local type parameters.
    pub parameters: TypeParameters,
}

impl ExplicitTypeSource {
    /// An explicit type name without parameters.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            parameters: TypeParameters::new(),
        }
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

/// A singular attribute mapped to one or more relational values.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SingularAttributeSource {
    /// Attribute name.
    pub name: String,
    /// Explicit property accessor strategy.
    pub property_accessor_name: Option<String>,
    /// Lazily loaded.
    pub lazy: bool,
    /// Database generation timing.
    pub generation: PropertyGeneration,
    /// Participates in optimistic lock checks.
    pub included_in_optimistic_locking: bool,
    /// Has no backing field or accessor.
    pub virtual_attribute: bool,
    /// Explicit type information.
    pub type_information: ExplicitTypeSource,
    /// Columns and formulas; a default column is synthesized when empty.
    pub value_sources: Vec<RelationalValueSource>,
    /// Defaults for flags the value sources leave unspecified.
    pub column_defaults: ColumnBindingDefaults,
    /// Meta attributes.
    pub meta_attributes: Vec<MetaAttributeSource>,
}

impl SingularAttributeSource {
    /// Creates an attribute with default settings.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            property_accessor_name: None,
            lazy: false,
            generation: PropertyGeneration::Never,
            included_in_optimistic_locking: true,
            virtual_attribute: false,
            type_information: ExplicitTypeSource::default(),
            value_sources: Vec::new(),
            column_defaults: ColumnBindingDefaults::ATTRIBUTE,
            meta_attributes: Vec::new(),
        }
    }

    /// Sets an explicit type name.
    #[must_use]
    pub fn with_type(mut self, name: impl Into<String>) -> Self {
        self.type_information.name = Some(name.into());
        self
    }

    /// Sets explicit type information.
    #[must_use]
    pub fn with_type_information(mut self, type_information: ExplicitTypeSource) -> Self {
        self.type_information = type_information;
        self
    }

    /// Adds a relational value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<RelationalValueSource>) -> Self {
        self.value_sources.push(value.into());
        self
    }

    /// Adds a column by name.
    #[must_use]
    pub fn with_column(self, name: impl Into<String>) -> Self {
        self.with_value(RelationalValueSource::column(name))
    }

    /// Sets the column defaults.
    #[must_use]
    pub fn with_column_defaults(mut self, defaults: ColumnBindingDefaults) -> Self {
        self.column_defaults = defaults;
        self
    }

    /// Sets the property accessor.
    #[must_use]
    pub fn with_accessor(mut self, accessor: impl Into<String>) -> Self {
        self.property_accessor_name = Some(accessor.into());
        self
    }

    /// Marks the attribute lazy.
    #[must_use]
    pub fn lazy(mut self) -> Self {
        self.lazy = true;
        self
    }

    /// Marks the attribute virtual.
    #[must_use]
    pub fn virtual_attribute(mut self) -> Self {
        self.virtual_attribute = true;
        self
    }

    /// Sets the generation timing.
    #[must_use]
    pub fn with_generation(mut self, generation: PropertyGeneration) -> Self {
        self.generation = generation;
        self
    }

    /// Excludes the attribute from optimistic lock checks.
    #[must_use]
    pub fn excluded_from_optimistic_locking(mut self) -> Self {
        self.included_in_optimistic_locking = false;
        self
    }

    /// Adds a meta attribute.
    #[must_use]
    pub fn with_meta(mut self, meta: MetaAttributeSource) -> Self {
        self.meta_attributes.push(meta);
        self
    }
}

/// A many-to-one association.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ToOneAttributeSource {
    /// The association's own attribute settings and foreign key columns.
    pub attribute: SingularAttributeSource,
    /// Target entity; discovered from the declared type when absent.
    pub referenced_entity_name: Option<String>,
    /// Target attribute (property-ref); the target's identifier when absent.
    pub referenced_attribute_name: Option<String>,
    /// Cascaded operations.
    pub cascade_styles: Vec<CascadeStyle>,
    /// Fetch timing.
    pub fetch_timing: FetchTiming,
    /// Fetch style.
    pub fetch_style: FetchStyle,
}

impl ToOneAttributeSource {
    /// Creates an association to `entity_name`.
    #[must_use]
    pub fn new(name: impl Into<String>, entity_name: impl Into<String>) -> Self {
        Self {
            attribute: SingularAttributeSource::new(name),
            referenced_entity_name: Some(entity_name.into()),
            referenced_attribute_name: None,
            cascade_styles: Vec::new(),
            fetch_timing: FetchTiming::Delayed,
            fetch_style: FetchStyle::Select,
        }
    }

    /// Creates an association whose target is discovered from the declared type.
    #[must_use]
    pub fn inferred(name: impl Into<String>) -> Self {
        Self {
            referenced_entity_name: None,
            ..Self::new(name, String::new())
        }
    }

    /// Targets a non-identifier attribute.
    #[must_use]
    pub fn with_property_ref(mut self, attribute_name: impl Into<String>) -> Self {
        self.referenced_attribute_name = Some(attribute_name.into());
        self
    }

    /// Adds a foreign key column.
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>) -> Self {
        self.attribute = self.attribute.with_column(name);
        self
    }

    /// Adds a cascade style.
    #[must_use]
    pub fn with_cascade(mut self, style: CascadeStyle) -> Self {
        self.cascade_styles.push(style);
        self
    }

    /// Sets fetch timing and style.
    #[must_use]
    pub fn with_fetch(mut self, timing: FetchTiming, style: FetchStyle) -> Self {
        self.fetch_timing = timing;
        self.fetch_style = style;
        self
    }
}

/// An embedded component: a nested group of attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComponentAttributeSource {
    /// Attribute name.
    pub name: String,
    /// Component class name.
    pub class_name: Option<String>,
    /// Name of an attribute on the component pointing back at its owner.
    pub parent_reference_attribute_name: Option<String>,
    /// Explicit property accessor strategy.
    pub property_accessor_name: Option<String>,
    /// Participates in optimistic lock checks.
    pub included_in_optimistic_locking: bool,
    /// Nested attributes.
    pub attributes: Vec<AttributeSource>,
    /// Meta attributes.
    pub meta_attributes: Vec<MetaAttributeSource>,
}

impl ComponentAttributeSource {
    /// Creates an empty component.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_name: None,
            parent_reference_attribute_name: None,
            property_accessor_name: None,
            included_in_optimistic_locking: true,
            attributes: Vec::new(),
            meta_attributes: Vec::new(),
        }
    }

    /// Sets the component class.
    #[must_use]
    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Sets the parent back-reference attribute.
    #[must_use]
    pub fn with_parent_reference(mut self, attribute_name: impl Into<String>) -> Self {
        self.parent_reference_attribute_name = Some(attribute_name.into());
        self
    }

    /// Adds a nested attribute.
    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<AttributeSource>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    /// Adds a meta attribute.
    #[must_use]
    pub fn with_meta(mut self, meta: MetaAttributeSource) -> Self {
        self.meta_attributes.push(meta);
        self
    }
}

/// Any attribute source.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AttributeSource {
    /// A scalar value.
    Basic(SingularAttributeSource),
    /// A many-to-one association.
    ManyToOne(ToOneAttributeSource),
    /// An embedded component.
    Component(ComponentAttributeSource),
    /// A collection.
    Plural(PluralAttributeSource),
}

impl AttributeSource {
    /// Returns the attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Basic(source) => &source.name,
            Self::ManyToOne(source) => &source.attribute.name,
            Self::Component(source) => &source.name,
            Self::Plural(source) => &source.name,
        }
    }

    /// Returns true for non-collection attributes.
    #[must_use]
    pub fn is_singular(&self) -> bool {
        !matches!(self, Self::Plural(_))
    }
}

impl From<SingularAttributeSource> for AttributeSource {
    fn from(source: SingularAttributeSource) -> Self {
        Self::Basic(source)
    }
}

impl From<ToOneAttributeSource> for AttributeSource {
    fn from(source: ToOneAttributeSource) -> Self {
        Self::ManyToOne(source)
    }
}

impl From<ComponentAttributeSource> for AttributeSource {
    fn from(source: ComponentAttributeSource) -> Self {
        Self::Component(source)
    }
}

impl From<PluralAttributeSource> for AttributeSource {
    fn from(source: PluralAttributeSource) -> Self {
        Self::Plural(source)
    }
}

//! Attribute bindings.

use std::collections::HashMap;
use std::fmt;

use metabind_foundation::{
    CascadeStyle, FetchStyle, FetchTiming, MetaAttributeContext, PropertyGeneration,
};
use metabind_relational::{ColumnId, DerivedValueId, SimpleValue};

use crate::domain::AttributeContainer;
use crate::entity::EntityBindingId;
use crate::plural::PluralAttributeBinding;
use crate::types::TypeDescriptor;

/// Identifies an attribute binding in [`Metadata`](crate::Metadata).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeBindingId(pub(crate) u32);

impl AttributeBindingId {
    /// Returns the raw index of this binding.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for AttributeBindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttributeBindingId({})", self.0)
    }
}

/// The binding that holds an attribute: an entity or a component.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContainerRef {
    /// Attribute of an entity.
    Entity(EntityBindingId),
    /// Attribute nested in a component attribute.
    Component(AttributeBindingId),
}

/// One relational value of an attribute and how it is written.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RelationalValueBinding {
    /// The column or derived value.
    pub value: SimpleValue,
    /// Written on insert.
    pub included_in_insert: bool,
    /// Written on update.
    pub included_in_update: bool,
}

impl RelationalValueBinding {
    /// A column value.
    #[must_use]
    pub fn column(id: ColumnId, included_in_insert: bool, included_in_update: bool) -> Self {
        Self {
            value: SimpleValue::Column(id),
            included_in_insert,
            included_in_update,
        }
    }

    /// A derived value; never written.
    #[must_use]
    pub fn derived(id: DerivedValueId) -> Self {
        Self {
            value: SimpleValue::Derived(id),
            included_in_insert: false,
            included_in_update: false,
        }
    }
}

/// A scalar attribute.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BasicAttributeBinding {
    /// Lazily loaded.
    pub lazy: bool,
    /// Database generation timing.
    pub generation: PropertyGeneration,
    /// Relational values in order.
    pub values: Vec<RelationalValueBinding>,
}

/// A many-to-one association.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManyToOneAttributeBinding {
    /// Lazily loaded.
    pub lazy: bool,
    /// Database generation timing.
    pub generation: PropertyGeneration,
    /// Foreign key values in order.
    pub values: Vec<RelationalValueBinding>,
    /// Target entity name.
    pub referenced_entity_name: String,
    /// Target attribute name for a property reference.
    pub referenced_attribute_name: Option<String>,
    /// Target entity, once resolved.
    pub referenced_entity: Option<EntityBindingId>,
    /// Target identifier or property-referenced attribute, once resolved.
    pub referenced_attribute: Option<AttributeBindingId>,
    /// Cascaded operations.
    pub cascade_styles: Vec<CascadeStyle>,
    /// Fetch timing.
    pub fetch_timing: FetchTiming,
    /// Fetch style.
    pub fetch_style: FetchStyle,
}

impl ManyToOneAttributeBinding {
    /// Creates an unresolved association to `referenced_entity_name`.
    #[must_use]
    pub fn new(referenced_entity_name: impl Into<String>) -> Self {
        Self {
            lazy: false,
            generation: PropertyGeneration::Never,
            values: Vec::new(),
            referenced_entity_name: referenced_entity_name.into(),
            referenced_attribute_name: None,
            referenced_entity: None,
            referenced_attribute: None,
            cascade_styles: Vec::new(),
            fetch_timing: FetchTiming::Delayed,
            fetch_style: FetchStyle::Select,
        }
    }

    /// Returns true if the association targets a non-identifier attribute.
    #[must_use]
    pub fn is_property_reference(&self) -> bool {
        self.referenced_attribute_name.is_some()
    }

    /// Returns true once the target attribute is known.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.referenced_attribute.is_some()
    }
}

/// An embedded component and its nested attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentAttributeBinding {
    /// The component's domain container.
    pub component: AttributeContainer,
    /// Attribute on the component pointing back at its owner.
    pub parent_reference: Option<String>,
    attributes: Vec<AttributeBindingId>,
    attribute_index: HashMap<String, AttributeBindingId>,
}

impl ComponentAttributeBinding {
    /// Creates a component with no attributes.
    #[must_use]
    pub fn new(component: AttributeContainer) -> Self {
        Self {
            component,
            parent_reference: None,
            attributes: Vec::new(),
            attribute_index: HashMap::new(),
        }
    }

    /// Looks up a nested attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<AttributeBindingId> {
        self.attribute_index.get(name).copied()
    }

    /// Returns nested attributes in binding order.
    #[must_use]
    pub fn attributes(&self) -> &[AttributeBindingId] {
        &self.attributes
    }

    pub(crate) fn add_attribute(&mut self, name: &str, id: AttributeBindingId) {
        self.attributes.push(id);
        self.attribute_index.insert(name.to_string(), id);
    }
}

/// The kind-specific part of an attribute binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeBindingKind {
    /// A scalar value.
    Basic(BasicAttributeBinding),
    /// A many-to-one association.
    ManyToOne(ManyToOneAttributeBinding),
    /// An embedded component.
    Component(ComponentAttributeBinding),
    /// A collection.
    Plural(PluralAttributeBinding),
}

/// A bound attribute of an entity or component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeBinding {
    id: AttributeBindingId,
    container: ContainerRef,
    name: String,
    path: String,
    /// Property accessor strategy.
    pub property_accessor_name: Option<String>,
    /// Participates in optimistic lock checks.
    pub included_in_optimistic_locking: bool,
    /// Meta attributes, inherited from the container.
    pub meta: MetaAttributeContext,
    /// Type information.
    pub type_descriptor: TypeDescriptor,
    referencing_associations: Vec<AttributeBindingId>,
    /// Kind-specific state.
    pub kind: AttributeBindingKind,
}

impl AttributeBinding {
    pub(crate) fn new(
        id: AttributeBindingId,
        container: ContainerRef,
        name: String,
        path: String,
        kind: AttributeBindingKind,
    ) -> Self {
        Self {
            id,
            container,
            name,
            path,
            property_accessor_name: None,
            included_in_optimistic_locking: true,
            meta: MetaAttributeContext::new(),
            type_descriptor: TypeDescriptor::new(),
            referencing_associations: Vec::new(),
            kind,
        }
    }

    /// Returns this binding's id.
    #[must_use]
    pub fn id(&self) -> AttributeBindingId {
        self.id
    }

    /// Returns the holding entity or component.
    #[must_use]
    pub fn container(&self) -> ContainerRef {
        self.container
    }

    /// Returns the attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attribute path (`Entity.component.attribute`); the role for collections.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns true for non-collection attributes.
    #[must_use]
    pub fn is_singular(&self) -> bool {
        !matches!(self.kind, AttributeBindingKind::Plural(_))
    }

    /// Returns the directly held relational values.
    ///
    /// Components hold none themselves; see
    /// [`Metadata::flattened_values`](crate::Metadata::flattened_values).
    #[must_use]
    pub fn values(&self) -> &[RelationalValueBinding] {
        match &self.kind {
            AttributeBindingKind::Basic(basic) => &basic.values,
            AttributeBindingKind::ManyToOne(many_to_one) => &many_to_one.values,
            AttributeBindingKind::Component(_) | AttributeBindingKind::Plural(_) => &[],
        }
    }

    /// Returns the directly held relational values mutably.
    pub fn values_mut(&mut self) -> Option<&mut Vec<RelationalValueBinding>> {
        match &mut self.kind {
            AttributeBindingKind::Basic(basic) => Some(&mut basic.values),
            AttributeBindingKind::ManyToOne(many_to_one) => Some(&mut many_to_one.values),
            AttributeBindingKind::Component(_) | AttributeBindingKind::Plural(_) => None,
        }
    }

    /// Returns the many-to-one state, if this is an association.
    #[must_use]
    pub fn as_many_to_one(&self) -> Option<&ManyToOneAttributeBinding> {
        match &self.kind {
            AttributeBindingKind::ManyToOne(many_to_one) => Some(many_to_one),
            _ => None,
        }
    }

    /// Returns the many-to-one state mutably.
    pub fn as_many_to_one_mut(&mut self) -> Option<&mut ManyToOneAttributeBinding> {
        match &mut self.kind {
            AttributeBindingKind::ManyToOne(many_to_one) => Some(many_to_one),
            _ => None,
        }
    }

    /// Returns the component state, if this is a component.
    #[must_use]
    pub fn as_component(&self) -> Option<&ComponentAttributeBinding> {
        match &self.kind {
            AttributeBindingKind::Component(component) => Some(component),
            _ => None,
        }
    }

    /// Returns the component state mutably.
    pub fn as_component_mut(&mut self) -> Option<&mut ComponentAttributeBinding> {
        match &mut self.kind {
            AttributeBindingKind::Component(component) => Some(component),
            _ => None,
        }
    }

    /// Returns the collection state, if this is a collection.
    #[must_use]
    pub fn as_plural(&self) -> Option<&PluralAttributeBinding> {
        match &self.kind {
            AttributeBindingKind::Plural(plural) => Some(plural),
            _ => None,
        }
    }

    /// Returns the collection state mutably.
    pub fn as_plural_mut(&mut self) -> Option<&mut PluralAttributeBinding> {
        match &mut self.kind {
            AttributeBindingKind::Plural(plural) => Some(plural),
            _ => None,
        }
    }

    /// Returns the associations that reference this attribute.
    #[must_use]
    pub fn referencing_associations(&self) -> &[AttributeBindingId] {
        &self.referencing_associations
    }

    /// Records an association that references this attribute.
    pub fn add_referencing_association(&mut self, association: AttributeBindingId) {
        if !self.referencing_associations.contains(&association) {
            self.referencing_associations.push(association);
        }
    }
}

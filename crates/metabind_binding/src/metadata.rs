//! The complete binding model produced by a binding session.

use std::collections::{BTreeMap, HashMap};

use metabind_relational::Database;

use crate::attribute::{
    AttributeBinding, AttributeBindingId, AttributeBindingKind, ContainerRef,
    RelationalValueBinding,
};
use crate::entity::{EntityBinding, EntityBindingId};
use crate::hierarchy::{HierarchyDetails, HierarchyId};

/// Entities, attributes, collections, and the relational model they map to.
///
/// All bindings live in arenas owned here and refer to each other by id.
#[derive(Debug, Default)]
pub struct Metadata {
    database: Database,
    entities: Vec<EntityBinding>,
    entity_index: HashMap<String, EntityBindingId>,
    attributes: Vec<AttributeBinding>,
    hierarchies: Vec<HierarchyDetails>,
    collections: BTreeMap<String, AttributeBindingId>,
}

impl Metadata {
    /// Creates empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the relational model.
    #[must_use]
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Returns the relational model mutably.
    pub fn database_mut(&mut self) -> &mut Database {
        &mut self.database
    }

    // =========================================================================
    // Hierarchies
    // =========================================================================

    /// Adds a hierarchy.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` hierarchies are added.
    pub fn add_hierarchy(&mut self, details: HierarchyDetails) -> HierarchyId {
        let id = HierarchyId(u32::try_from(self.hierarchies.len()).expect("too many hierarchies"));
        self.hierarchies.push(details);
        id
    }

    /// Gets a hierarchy.
    #[must_use]
    pub fn hierarchy(&self, id: HierarchyId) -> Option<&HierarchyDetails> {
        self.hierarchies.get(id.0 as usize)
    }

    /// Gets a hierarchy mutably.
    pub fn hierarchy_mut(&mut self, id: HierarchyId) -> Option<&mut HierarchyDetails> {
        self.hierarchies.get_mut(id.0 as usize)
    }

    /// Iterates over hierarchies in binding order.
    pub fn hierarchies(&self) -> impl Iterator<Item = &HierarchyDetails> {
        self.hierarchies.iter()
    }

    /// Returns the hierarchy details of an entity.
    #[must_use]
    pub fn hierarchy_of(&self, entity: EntityBindingId) -> Option<&HierarchyDetails> {
        self.hierarchy(self.entity(entity)?.hierarchy())
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Adds an entity binding without making it visible by name.
    ///
    /// The superclass binding, if any, records the new binding as a subclass.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` entities are added.
    pub fn add_entity(&mut self, binding: EntityBinding) -> EntityBindingId {
        let id = EntityBindingId(u32::try_from(self.entities.len()).expect("too many entities"));
        if let Some(super_entity) = binding.super_entity() {
            if let Some(parent) = self.entities.get_mut(super_entity.0 as usize) {
                parent.add_sub_entity(id);
            }
        }
        self.entities.push(binding);
        id
    }

    /// Makes an entity binding visible by name.
    pub fn register_entity(&mut self, id: EntityBindingId) {
        if let Some(binding) = self.entities.get(id.0 as usize) {
            self.entity_index
                .insert(binding.entity_name().to_string(), id);
        }
    }

    /// Returns true if a binding is registered under `entity_name`.
    #[must_use]
    pub fn is_registered(&self, entity_name: &str) -> bool {
        self.entity_index.contains_key(entity_name)
    }

    /// Looks up a registered entity by name.
    #[must_use]
    pub fn entity_id(&self, entity_name: &str) -> Option<EntityBindingId> {
        self.entity_index.get(entity_name).copied()
    }

    /// Looks up a registered entity binding by name.
    #[must_use]
    pub fn entity_binding(&self, entity_name: &str) -> Option<&EntityBinding> {
        self.entity(self.entity_id(entity_name)?)
    }

    /// Gets an entity binding.
    #[must_use]
    pub fn entity(&self, id: EntityBindingId) -> Option<&EntityBinding> {
        self.entities.get(id.0 as usize)
    }

    /// Gets an entity binding mutably.
    pub fn entity_mut(&mut self, id: EntityBindingId) -> Option<&mut EntityBinding> {
        self.entities.get_mut(id.0 as usize)
    }

    /// Iterates over entity bindings in binding order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn entities(&self) -> impl Iterator<Item = (EntityBindingId, &EntityBinding)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(index, binding)| (EntityBindingId(index as u32), binding))
    }

    /// Returns the number of entity bindings.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Adds an attribute binding to an entity or component.
    ///
    /// Returns `None` if the container does not exist or is not a component.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` attributes are added.
    pub fn add_attribute(
        &mut self,
        container: ContainerRef,
        name: &str,
        kind: AttributeBindingKind,
    ) -> Option<AttributeBindingId> {
        let path = format!("{}.{name}", self.container_path(container)?);
        let id =
            AttributeBindingId(u32::try_from(self.attributes.len()).expect("too many attributes"));
        match container {
            ContainerRef::Entity(entity) => {
                self.entities.get_mut(entity.0 as usize)?.add_attribute(name, id);
            }
            ContainerRef::Component(component) => {
                self.attributes
                    .get_mut(component.0 as usize)?
                    .as_component_mut()?
                    .add_attribute(name, id);
            }
        }
        self.attributes
            .push(AttributeBinding::new(id, container, name.to_string(), path, kind));
        Some(id)
    }

    /// Gets an attribute binding.
    #[must_use]
    pub fn attribute(&self, id: AttributeBindingId) -> Option<&AttributeBinding> {
        self.attributes.get(id.0 as usize)
    }

    /// Gets an attribute binding mutably.
    pub fn attribute_mut(&mut self, id: AttributeBindingId) -> Option<&mut AttributeBinding> {
        self.attributes.get_mut(id.0 as usize)
    }

    /// Iterates over attribute bindings in binding order.
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeBinding> {
        self.attributes.iter()
    }

    /// Returns the attribute bindings of an entity or component.
    #[must_use]
    pub fn container_attributes(&self, container: ContainerRef) -> &[AttributeBindingId] {
        match container {
            ContainerRef::Entity(entity) => self
                .entity(entity)
                .map_or(&[][..], EntityBinding::attributes),
            ContainerRef::Component(component) => self
                .attribute(component)
                .and_then(AttributeBinding::as_component)
                .map_or(&[][..], |c| c.attributes()),
        }
    }

    /// Looks up an attribute on an entity, then up its superclass chain.
    #[must_use]
    pub fn locate_attribute(
        &self,
        entity: EntityBindingId,
        name: &str,
    ) -> Option<AttributeBindingId> {
        let mut current = Some(entity);
        while let Some(id) = current {
            let binding = self.entity(id)?;
            if let Some(attribute) = binding.attribute(name) {
                return Some(attribute);
            }
            current = binding.super_entity();
        }
        None
    }

    /// Returns the path of an entity or component: the entity name, then
    /// component names joined with dots.
    #[must_use]
    pub fn container_path(&self, container: ContainerRef) -> Option<String> {
        match container {
            ContainerRef::Entity(entity) => Some(self.entity(entity)?.entity_name().to_string()),
            ContainerRef::Component(component) => {
                Some(self.attribute(component)?.path().to_string())
            }
        }
    }

    /// Returns the entity that ultimately holds a container.
    #[must_use]
    pub fn owning_entity(&self, container: ContainerRef) -> Option<EntityBindingId> {
        let mut current = container;
        loop {
            match current {
                ContainerRef::Entity(entity) => return Some(entity),
                ContainerRef::Component(component) => {
                    current = self.attribute(component)?.container();
                }
            }
        }
    }

    /// Returns every relational value of an attribute, descending into components.
    #[must_use]
    pub fn flattened_values(&self, id: AttributeBindingId) -> Vec<RelationalValueBinding> {
        let mut values = Vec::new();
        self.collect_values(id, &mut values);
        values
    }

    fn collect_values(&self, id: AttributeBindingId, out: &mut Vec<RelationalValueBinding>) {
        let Some(binding) = self.attribute(id) else {
            return;
        };
        match &binding.kind {
            AttributeBindingKind::Component(component) => {
                for &nested in component.attributes() {
                    self.collect_values(nested, out);
                }
            }
            _ => out.extend_from_slice(binding.values()),
        }
    }

    /// Records that `association` references `target`.
    pub fn add_referencing_association(
        &mut self,
        target: AttributeBindingId,
        association: AttributeBindingId,
    ) {
        if let Some(binding) = self.attribute_mut(target) {
            binding.add_referencing_association(association);
        }
    }

    // =========================================================================
    // Collections
    // =========================================================================

    /// Registers a collection binding by role.
    pub fn add_collection(&mut self, role: impl Into<String>, id: AttributeBindingId) {
        self.collections.insert(role.into(), id);
    }

    /// Looks up a collection binding by role.
    #[must_use]
    pub fn collection(&self, role: &str) -> Option<&AttributeBinding> {
        self.attribute(*self.collections.get(role)?)
    }

    /// Iterates over collection roles and bindings in role order.
    pub fn collections(&self) -> impl Iterator<Item = (&str, &AttributeBinding)> {
        self.collections.iter().filter_map(|(role, &id)| {
            self.attribute(id).map(|binding| (role.as_str(), binding))
        })
    }

    /// Returns the number of registered collections.
    #[must_use]
    pub fn collection_count(&self) -> usize {
        self.collections.len()
    }
}

//! State of one binding run.
//!
//! A session owns the metadata under construction and an index of every
//! entity source by name. Bindings are created on demand: an entity that is
//! referenced before its hierarchy is processed gets bound at that point, and
//! the name index in [`Metadata`] doubles as the processed set.

use std::collections::HashMap;

use metabind_binding::{
    AttributeBinding, AttributeBindingId, AttributeBindingKind, ContainerRef, EntityBinding,
    EntityBindingId, HierarchyDetails, HierarchyId, Metadata,
};
use metabind_foundation::{Error, MetaAttributeContext, Result};
use metabind_relational::{Table, TableId};
use metabind_source::{EntityHierarchy, EntitySource};

use crate::options::BinderOptions;
use crate::services::BindingServices;

// =============================================================================
// Source Index
// =============================================================================

/// An entity source together with where it sits in its hierarchy.
#[derive(Clone, Copy, Debug)]
pub(crate) struct IndexedSource<'a> {
    pub(crate) source: &'a EntitySource,
    pub(crate) hierarchy: &'a EntityHierarchy,
    pub(crate) super_name: Option<&'a str>,
}

/// A property reference whose target attribute was not bound yet.
#[derive(Clone, Debug)]
pub(crate) struct DeferredReference {
    pub(crate) association: AttributeBindingId,
    pub(crate) entity: EntityBindingId,
    pub(crate) attribute_name: String,
}

// =============================================================================
// Binding Session
// =============================================================================

pub(crate) struct BindingSession<'a> {
    pub(crate) options: &'a BinderOptions,
    pub(crate) services: &'a BindingServices,
    pub(crate) metadata: Metadata,
    pub(crate) global_meta: MetaAttributeContext,
    pub(crate) deferred: Vec<DeferredReference>,
    sources: HashMap<&'a str, IndexedSource<'a>>,
    classes: HashMap<&'a str, &'a str>,
}

impl<'a> BindingSession<'a> {
    pub(crate) fn new(
        options: &'a BinderOptions,
        services: &'a BindingServices,
        hierarchies: &'a [EntityHierarchy],
    ) -> Self {
        let mut session = Self {
            options,
            services,
            metadata: Metadata::new(),
            global_meta: MetaAttributeContext::new()
                .extend(&options.global_meta_attributes, true),
            deferred: Vec::new(),
            sources: HashMap::new(),
            classes: HashMap::new(),
        };
        for hierarchy in hierarchies {
            session.index(&hierarchy.root.entity, hierarchy, None);
        }
        session
    }

    fn index(
        &mut self,
        source: &'a EntitySource,
        hierarchy: &'a EntityHierarchy,
        super_name: Option<&'a str>,
    ) {
        let name = source.entity_name.as_str();
        let previous = self.sources.insert(
            name,
            IndexedSource {
                source,
                hierarchy,
                super_name,
            },
        );
        if previous.is_some() {
            log::warn!("entity {name} is declared more than once; the last declaration wins");
        }
        if let Some(class_name) = source.class_name.as_deref() {
            self.classes.entry(class_name).or_insert(name);
        }
        for subclass in &source.subclasses {
            self.index(subclass, hierarchy, Some(name));
        }
    }

    pub(crate) fn source(&self, entity_name: &str) -> Option<IndexedSource<'a>> {
        self.sources.get(entity_name).copied()
    }

    /// Maps a type name to an entity name: an entity of that name, else the
    /// entity mapping that class.
    pub(crate) fn entity_name_for_type(&self, type_name: &str) -> Option<&'a str> {
        self.sources
            .get_key_value(type_name)
            .map(|(name, _)| *name)
            .or_else(|| self.classes.get(type_name).copied())
    }

    /// Completes deferred property references and hands over the metadata.
    pub(crate) fn finish(mut self) -> Result<Metadata> {
        for deferred in std::mem::take(&mut self.deferred) {
            let entity_name = self.entity(deferred.entity)?.entity_name().to_string();
            let referenced = self
                .metadata
                .locate_attribute(deferred.entity, &deferred.attribute_name)
                .ok_or_else(|| Error::unknown_attribute(&entity_name, &deferred.attribute_name))?;
            if let Some(association) = self
                .metadata
                .attribute_mut(deferred.association)
                .and_then(AttributeBinding::as_many_to_one_mut)
            {
                association.referenced_attribute = Some(referenced);
            }
            self.metadata
                .add_referencing_association(referenced, deferred.association);
            log::trace!(
                "resolved deferred reference to {entity_name}.{}",
                deferred.attribute_name
            );
        }
        Ok(self.metadata)
    }

    // =========================================================================
    // Metadata Access
    // =========================================================================

    pub(crate) fn entity(&self, id: EntityBindingId) -> Result<&EntityBinding> {
        self.metadata
            .entity(id)
            .ok_or_else(|| Error::contract_violation(format!("no entity binding {id:?}")))
    }

    pub(crate) fn entity_mut(&mut self, id: EntityBindingId) -> Result<&mut EntityBinding> {
        self.metadata
            .entity_mut(id)
            .ok_or_else(|| Error::contract_violation(format!("no entity binding {id:?}")))
    }

    pub(crate) fn attribute(&self, id: AttributeBindingId) -> Result<&AttributeBinding> {
        self.metadata
            .attribute(id)
            .ok_or_else(|| Error::contract_violation(format!("no attribute binding {id:?}")))
    }

    pub(crate) fn attribute_mut(
        &mut self,
        id: AttributeBindingId,
    ) -> Result<&mut AttributeBinding> {
        self.metadata
            .attribute_mut(id)
            .ok_or_else(|| Error::contract_violation(format!("no attribute binding {id:?}")))
    }

    pub(crate) fn hierarchy(&self, id: HierarchyId) -> Result<&HierarchyDetails> {
        self.metadata
            .hierarchy(id)
            .ok_or_else(|| Error::contract_violation(format!("no hierarchy {id:?}")))
    }

    pub(crate) fn hierarchy_mut(&mut self, id: HierarchyId) -> Result<&mut HierarchyDetails> {
        self.metadata
            .hierarchy_mut(id)
            .ok_or_else(|| Error::contract_violation(format!("no hierarchy {id:?}")))
    }

    pub(crate) fn table_mut(&mut self, id: TableId) -> Result<&mut Table> {
        self.metadata
            .database_mut()
            .table_mut(id)
            .ok_or_else(|| Error::contract_violation(format!("no table {id:?}")))
    }

    /// The entity that ultimately holds a container.
    pub(crate) fn owning_entity(&self, container: ContainerRef) -> Result<EntityBindingId> {
        self.metadata
            .owning_entity(container)
            .ok_or_else(|| Error::contract_violation(format!("no container {container:?}")))
    }

    /// The entity name or component path of a container.
    pub(crate) fn container_path(&self, container: ContainerRef) -> Result<String> {
        self.metadata
            .container_path(container)
            .ok_or_else(|| Error::contract_violation(format!("no container {container:?}")))
    }

    /// The class mapped by a container, if any.
    pub(crate) fn container_class(&self, container: ContainerRef) -> Option<String> {
        match container {
            ContainerRef::Entity(entity) => {
                self.metadata.entity(entity)?.class_name().map(str::to_string)
            }
            ContainerRef::Component(component) => self
                .metadata
                .attribute(component)?
                .as_component()?
                .component
                .class_name()
                .map(str::to_string),
        }
    }

    /// Adds an attribute binding, failing if the container is unknown.
    pub(crate) fn add_attribute(
        &mut self,
        container: ContainerRef,
        name: &str,
        kind: AttributeBindingKind,
    ) -> Result<AttributeBindingId> {
        self.metadata
            .add_attribute(container, name, kind)
            .ok_or_else(|| {
                Error::contract_violation(format!("cannot add attribute {name} to {container:?}"))
            })
    }
}

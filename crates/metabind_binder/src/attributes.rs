//! Attribute binding for entities and components.

use metabind_binding::{
    AttributeBindingId, AttributeBindingKind, AttributeContainer, BasicAttributeBinding,
    ComponentAttributeBinding, ContainerRef, DomainAttributeKind, ManyToOneAttributeBinding,
    RelationalValueBinding,
};
use metabind_foundation::{Error, ErrorKind, MetaAttributeContext, MetaAttributeSource, Result};
use metabind_source::{
    AttributeSource, ComponentAttributeSource, SingularAttributeSource, ToOneAttributeSource,
};

use crate::session::BindingSession;

impl BindingSession<'_> {
    /// Binds every attribute source into `container`, in declaration order.
    pub(crate) fn bind_attributes(
        &mut self,
        container: ContainerRef,
        sources: &[AttributeSource],
        meta: &MetaAttributeContext,
    ) -> Result<()> {
        for source in sources {
            self.bind_attribute(container, source, meta)
                .map_err(|err| err.with_frame(format!("attribute {}", source.name())))?;
        }
        Ok(())
    }

    fn bind_attribute(
        &mut self,
        container: ContainerRef,
        source: &AttributeSource,
        meta: &MetaAttributeContext,
    ) -> Result<AttributeBindingId> {
        match source {
            AttributeSource::Basic(basic) => self.bind_basic_attribute(container, basic, meta),
            AttributeSource::ManyToOne(to_one) => {
                self.bind_many_to_one_attribute(container, to_one, meta)
            }
            AttributeSource::Component(component) => {
                self.bind_component_attribute(container, component, meta)
            }
            AttributeSource::Plural(plural) => self.bind_plural_attribute(container, plural, meta),
        }
    }

    // =========================================================================
    // Shared Steps
    // =========================================================================

    /// Locates or creates the domain slot an attribute binds to.
    pub(crate) fn create_domain_attribute(
        &mut self,
        container: ContainerRef,
        name: &str,
        kind: DomainAttributeKind,
        virtual_attribute: bool,
    ) -> Result<()> {
        let domain = match container {
            ContainerRef::Entity(entity) => self.entity_mut(entity)?.entity_mut(),
            ContainerRef::Component(component) => {
                &mut self
                    .attribute_mut(component)?
                    .as_component_mut()
                    .ok_or_else(|| {
                        Error::contract_violation(format!("{component:?} is not a component"))
                    })?
                    .component
            }
        };
        domain.locate_or_create(name, kind, virtual_attribute);
        Ok(())
    }

    /// Applies the accessor, locking, and meta settings every attribute has.
    pub(crate) fn apply_attribute_settings(
        &mut self,
        attribute: AttributeBindingId,
        property_accessor_name: Option<&str>,
        included_in_optimistic_locking: bool,
        meta: &MetaAttributeContext,
        meta_sources: &[MetaAttributeSource],
    ) -> Result<()> {
        let accessor = property_accessor_name
            .unwrap_or(&self.options.default_property_accessor)
            .to_string();
        let binding = self.attribute_mut(attribute)?;
        binding.property_accessor_name = Some(accessor);
        binding.included_in_optimistic_locking = included_in_optimistic_locking;
        binding.meta = meta.extend(meta_sources, false);
        Ok(())
    }

    fn bind_singular_values(
        &mut self,
        container: ContainerRef,
        source: &SingularAttributeSource,
    ) -> Result<Vec<RelationalValueBinding>> {
        let owner = self.owning_entity(container)?;
        self.bind_entity_values(owner, &source.value_sources, source.column_defaults, &source.name)
    }

    // =========================================================================
    // Basic
    // =========================================================================

    /// Binds a scalar attribute.
    pub(crate) fn bind_basic_attribute(
        &mut self,
        container: ContainerRef,
        source: &SingularAttributeSource,
        meta: &MetaAttributeContext,
    ) -> Result<AttributeBindingId> {
        log::trace!("binding basic attribute {}", source.name);
        self.create_domain_attribute(
            container,
            &source.name,
            DomainAttributeKind::Singular,
            source.virtual_attribute,
        )?;
        let values = self.bind_singular_values(container, source)?;
        let kind = AttributeBindingKind::Basic(BasicAttributeBinding {
            lazy: source.lazy,
            generation: source.generation,
            values,
        });
        let id = self.add_attribute(container, &source.name, kind)?;
        self.apply_attribute_settings(
            id,
            source.property_accessor_name.as_deref(),
            source.included_in_optimistic_locking,
            meta,
            &source.meta_attributes,
        )?;
        self.resolve_attribute_type(id, &source.type_information)?;
        Ok(id)
    }

    // =========================================================================
    // Many-to-one
    // =========================================================================

    /// Binds a many-to-one association and resolves its target.
    pub(crate) fn bind_many_to_one_attribute(
        &mut self,
        container: ContainerRef,
        source: &ToOneAttributeSource,
        meta: &MetaAttributeContext,
    ) -> Result<AttributeBindingId> {
        let attribute = &source.attribute;
        log::trace!("binding many-to-one attribute {}", attribute.name);
        self.create_domain_attribute(
            container,
            &attribute.name,
            DomainAttributeKind::Singular,
            attribute.virtual_attribute,
        )?;
        let referenced_entity_name = match source.referenced_entity_name.as_deref() {
            Some(name) => name.to_string(),
            None => self.infer_referenced_entity(container, &attribute.name)?,
        };
        let values = self.bind_singular_values(container, attribute)?;

        let mut association = ManyToOneAttributeBinding::new(referenced_entity_name);
        association.lazy = attribute.lazy;
        association.generation = attribute.generation;
        association.values = values;
        association
            .referenced_attribute_name
            .clone_from(&source.referenced_attribute_name);
        association.cascade_styles.clone_from(&source.cascade_styles);
        association.fetch_timing = source.fetch_timing;
        association.fetch_style = source.fetch_style;

        let id = self.add_attribute(
            container,
            &attribute.name,
            AttributeBindingKind::ManyToOne(association),
        )?;
        self.apply_attribute_settings(
            id,
            attribute.property_accessor_name.as_deref(),
            attribute.included_in_optimistic_locking,
            meta,
            &attribute.meta_attributes,
        )?;
        self.resolve_attribute_type(id, &attribute.type_information)?;
        self.resolve_entity_reference(id)?;
        Ok(id)
    }

    /// Finds the target of an association that names none from the
    /// attribute's declared class.
    fn infer_referenced_entity(&self, container: ContainerRef, name: &str) -> Result<String> {
        self.container_class(container)
            .and_then(|class| self.services.introspector.declared_type(&class, name))
            .and_then(|declared| self.entity_name_for_type(&declared))
            .map(str::to_string)
            .ok_or_else(|| {
                let path = self
                    .container_path(container)
                    .map_or_else(|_| name.to_string(), |path| format!("{path}.{name}"));
                Error::new(ErrorKind::UnresolvedAssociationTarget(path))
            })
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Binds a component and, recursively, its nested attributes.
    pub(crate) fn bind_component_attribute(
        &mut self,
        container: ContainerRef,
        source: &ComponentAttributeSource,
        meta: &MetaAttributeContext,
    ) -> Result<AttributeBindingId> {
        log::trace!("binding component attribute {}", source.name);
        self.create_domain_attribute(
            container,
            &source.name,
            DomainAttributeKind::Singular,
            false,
        )?;
        let path = format!("{}.{}", self.container_path(container)?, source.name);
        let class_name = source.class_name.clone().or_else(|| {
            self.container_class(container)
                .and_then(|class| self.services.introspector.declared_type(&class, &source.name))
        });
        let parent_class = self.container_class(container);

        let mut component =
            ComponentAttributeBinding::new(AttributeContainer::new(path, class_name.clone(), None));
        if let Some(parent) = source.parent_reference_attribute_name.as_deref() {
            let slot = component
                .component
                .locate_or_create(parent, DomainAttributeKind::Singular, false);
            if slot.declared_type.is_none() {
                slot.declared_type = parent_class;
            }
            component.parent_reference = Some(parent.to_string());
        }

        let id = self.add_attribute(
            container,
            &source.name,
            AttributeBindingKind::Component(component),
        )?;
        self.apply_attribute_settings(
            id,
            source.property_accessor_name.as_deref(),
            source.included_in_optimistic_locking,
            meta,
            &source.meta_attributes,
        )?;
        let component_meta = {
            let binding = self.attribute_mut(id)?;
            binding.type_descriptor.declared_type_name = class_name.clone();
            binding.meta.clone()
        };
        if let Some(class_name) = class_name.as_deref() {
            self.record_declared_type(container, &source.name, class_name);
        }

        self.bind_attributes(ContainerRef::Component(id), &source.attributes, &component_meta)?;
        Ok(id)
    }
}

//! Entity and hierarchy binding.
//!
//! A root entity binds the settings shared by its hierarchy (identifier,
//! version, discriminator, caching, and locking) before its own attributes.
//! Subclasses are bound after their superclass according to the
//! hierarchy's inheritance strategy.

use std::slice;

use metabind_binding::{
    AttributeContainer, ContainerRef, EntityBinding, EntityBindingId, EntityDiscriminator,
    EntityIdentifier, HierarchyDetails, HierarchyId, TypeDescriptor,
};
use metabind_foundation::{
    EntityMode, Error, IdGenerator, InheritanceType, MetaAttributeContext, Result,
};
use metabind_relational::{SimpleValue, TableId};
use metabind_source::{
    ColumnBindingDefaults, DiscriminatorSource, EntityHierarchy, EntitySource,
    ExplicitTypeSource, IdentifierSource, RootEntitySource,
};

use crate::generator::{DEFAULT_GENERATOR_NAME, ENTITY_NAME, merge_generator_settings};
use crate::session::BindingSession;
use crate::typing::apply_explicit_type;

/// Discriminator type used when the mapping names none.
const DEFAULT_DISCRIMINATOR_TYPE: &str = "string";

/// The class an entity maps in the given mode; map-mode entities have none.
fn mapped_class(source: &EntitySource, mode: EntityMode) -> Option<String> {
    match mode {
        EntityMode::Pojo => source.class_name.clone(),
        EntityMode::Map => None,
    }
}

impl<'a> BindingSession<'a> {
    // =========================================================================
    // Hierarchies
    // =========================================================================

    /// Binds a whole hierarchy: the root, then every subclass.
    ///
    /// Entities already bound because something referenced them are kept.
    pub(crate) fn bind_hierarchy(&mut self, hierarchy: &'a EntityHierarchy) -> Result<()> {
        let root_name = hierarchy.root.entity.entity_name.as_str();
        log::debug!("binding hierarchy {root_name} ({:?})", hierarchy.inheritance);
        self.get_entity_binding(root_name)?;
        Ok(())
    }

    /// Binds one entity whose superclass, if any, is already bound.
    ///
    /// Returns the existing binding when the entity was bound before.
    pub(crate) fn create_entity_binding(
        &mut self,
        entity_name: &str,
        super_entity: Option<EntityBindingId>,
    ) -> Result<EntityBindingId> {
        if let Some(existing) = self.metadata.entity_id(entity_name) {
            return Ok(existing);
        }
        let indexed = self
            .source(entity_name)
            .ok_or_else(|| Error::unknown_entity(entity_name))?;
        let source = indexed.source;
        log::debug!("binding entity {entity_name}");

        let result = match super_entity {
            None if indexed.super_name.is_some() => Err(Error::contract_violation(format!(
                "subclass {entity_name} bound without its superclass"
            ))),
            None => self.bind_root_entity(indexed.hierarchy),
            Some(super_entity) => self.bind_subclass_entity(source, super_entity),
        };
        result.map_err(|err| {
            err.with_origin(&source.origin)
                .with_frame(format!("entity {entity_name}"))
        })
    }

    /// Binds the direct subclasses of an entity and, recursively, theirs.
    pub(crate) fn bind_subclasses(
        &mut self,
        entity: EntityBindingId,
        source: &'a EntitySource,
    ) -> Result<()> {
        for subclass in &source.subclasses {
            let id = self.create_entity_binding(&subclass.entity_name, Some(entity))?;
            self.bind_subclasses(id, subclass)?;
        }
        Ok(())
    }

    // =========================================================================
    // Root Entities
    // =========================================================================

    fn bind_root_entity(&mut self, hierarchy: &'a EntityHierarchy) -> Result<EntityBindingId> {
        let root = &hierarchy.root;
        let source = &root.entity;
        let hierarchy_id = self.metadata.add_hierarchy(HierarchyDetails::new(
            &source.entity_name,
            hierarchy.inheritance,
            root.entity_mode,
        ));

        let class_name = mapped_class(source, root.entity_mode);
        let (table, table_name) = self.create_table(&source.primary_table, |naming| {
            naming.class_to_table_name(class_name.as_deref().unwrap_or(&source.entity_name))
        });
        let meta = self.global_meta.extend(&source.meta_attributes, true);
        let binding = self.build_entity_binding(
            source,
            hierarchy_id,
            root.entity_mode,
            None,
            (table, table_name),
            meta,
        );
        let entity = self.metadata.add_entity(binding);

        self.bind_identifier(entity, hierarchy_id, root)?;
        if let Some(version) = root.version.as_ref() {
            let meta = self.entity(entity)?.meta.clone();
            let id = self.bind_basic_attribute(ContainerRef::Entity(entity), version, &meta)?;
            self.hierarchy_mut(hierarchy_id)?.version = Some(id);
        }
        if let Some(discriminator) = root.discriminator.as_ref() {
            self.bind_discriminator(entity, hierarchy_id, discriminator)?;
        }
        self.bind_hierarchy_settings(hierarchy_id, root)?;

        self.metadata.register_entity(entity);
        self.bind_entity_body(entity, source)?;
        self.create_identifier_generator(hierarchy_id)?;
        Ok(entity)
    }

    fn bind_hierarchy_settings(
        &mut self,
        hierarchy: HierarchyId,
        root: &RootEntitySource,
    ) -> Result<()> {
        let details = self.hierarchy_mut(hierarchy)?;
        details.caching.clone_from(&root.caching);
        details.explicit_polymorphism = root.explicit_polymorphism;
        details.optimistic_lock_style = root.optimistic_lock_style;
        details.mutable = root.mutable;
        details.where_filter.clone_from(&root.where_filter);
        details.row_id.clone_from(&root.row_id);
        Ok(())
    }

    // =========================================================================
    // Subclasses
    // =========================================================================

    fn bind_subclass_entity(
        &mut self,
        source: &'a EntitySource,
        super_entity: EntityBindingId,
    ) -> Result<EntityBindingId> {
        let parent = self.entity(super_entity)?;
        let hierarchy_id = parent.hierarchy();
        let parent_table = (parent.primary_table(), parent.primary_table_name().to_string());
        let parent_meta = parent.meta.clone();
        let details = self.hierarchy(hierarchy_id)?;
        let inheritance = details.inheritance;
        let mode = details.entity_mode;

        let class_name = mapped_class(source, mode);
        let table = match inheritance {
            InheritanceType::NoInheritance => {
                return Err(Error::contract_violation(format!(
                    "{} declares no inheritance but has subclass {}",
                    details.root_entity_name, source.entity_name
                )));
            }
            InheritanceType::SingleTable => parent_table,
            InheritanceType::Joined | InheritanceType::TablePerClass => {
                self.create_table(&source.primary_table, |naming| {
                    naming.class_to_table_name(
                        class_name.as_deref().unwrap_or(&source.entity_name),
                    )
                })
            }
        };
        let meta = parent_meta.extend(&source.meta_attributes, true);
        let binding = self.build_entity_binding(
            source,
            hierarchy_id,
            mode,
            Some(super_entity),
            table,
            meta,
        );
        let entity = self.metadata.add_entity(binding);

        self.metadata.register_entity(entity);
        self.bind_entity_body(entity, source)?;
        Ok(entity)
    }

    // =========================================================================
    // Shared Entity Steps
    // =========================================================================

    /// Builds the binding for an entity without attributes.
    fn build_entity_binding(
        &self,
        source: &EntitySource,
        hierarchy: HierarchyId,
        mode: EntityMode,
        super_entity: Option<EntityBindingId>,
        (table, table_name): (TableId, String),
        meta: MetaAttributeContext,
    ) -> EntityBinding {
        let class_name = mapped_class(source, mode);
        let super_name = super_entity
            .and_then(|id| self.metadata.entity(id))
            .map(|parent| parent.entity_name().to_string());
        let container =
            AttributeContainer::new(&source.entity_name, class_name.clone(), super_name);
        let mut binding = EntityBinding::new(container, hierarchy, super_entity, table, table_name);

        binding.jpa_entity_name.clone_from(&source.jpa_entity_name);
        binding
            .discriminator_match_value
            .clone_from(&source.discriminator_match_value);
        binding.meta = meta;
        match (mode, source.proxy.as_ref()) {
            (EntityMode::Pojo, Some(proxy)) => {
                binding.proxy_interface_name = Some(proxy.clone());
                binding.lazy = true;
            }
            (EntityMode::Pojo, None) if source.lazy => {
                binding.proxy_interface_name = class_name;
                binding.lazy = true;
            }
            (EntityMode::Pojo, None) => binding.lazy = false,
            (EntityMode::Map, _) => binding.lazy = source.lazy,
        }
        binding
            .custom_persister_class_name
            .clone_from(&source.custom_persister_class_name);
        binding
            .custom_tuplizer_class_name
            .clone_from(&source.custom_tuplizer_class_name);
        binding.dynamic_insert = source.dynamic_insert;
        binding.dynamic_update = source.dynamic_update;
        binding.batch_size = source.batch_size;
        binding.select_before_update = source.select_before_update;
        binding.is_abstract = source.is_abstract;
        binding.custom_loader_name.clone_from(&source.custom_loader_name);
        binding.custom_sql_insert.clone_from(&source.custom_sql_insert);
        binding.custom_sql_update.clone_from(&source.custom_sql_update);
        binding.custom_sql_delete.clone_from(&source.custom_sql_delete);
        binding
            .synchronized_table_names
            .clone_from(&source.synchronized_table_names);
        binding
    }

    /// Binds secondary tables, attributes, and constraints, in that order.
    fn bind_entity_body(&mut self, entity: EntityBindingId, source: &EntitySource) -> Result<()> {
        self.bind_secondary_tables(entity, source)?;
        let meta = self.entity(entity)?.meta.clone();
        self.bind_attributes(ContainerRef::Entity(entity), &source.attributes, &meta)?;
        self.bind_constraints(entity, source)
    }

    // =========================================================================
    // Identifier
    // =========================================================================

    fn bind_identifier(
        &mut self,
        entity: EntityBindingId,
        hierarchy: HierarchyId,
        root: &RootEntitySource,
    ) -> Result<()> {
        match &root.identifier {
            IdentifierSource::Simple {
                attribute,
                generator,
            } => {
                let meta = self.entity(entity)?.meta.clone();
                let id = self
                    .bind_basic_attribute(ContainerRef::Entity(entity), attribute, &meta)
                    .map_err(|err| err.with_frame("identifier"))?;
                for value in self.attribute(id)?.values().to_vec() {
                    let SimpleValue::Column(column) = value.value else {
                        return Err(Error::contract_violation(format!(
                            "identifier {} of {} maps to a formula",
                            attribute.name, root.entity.entity_name
                        )));
                    };
                    self.table_mut(column.table())?.primary_key.add_column(column);
                }
                let generator_descriptor = generator.clone().unwrap_or_else(|| {
                    IdGenerator::new(DEFAULT_GENERATOR_NAME, "assigned")
                        .with_parameter(ENTITY_NAME, &root.entity.entity_name)
                });
                self.hierarchy_mut(hierarchy)?.identifier = Some(EntityIdentifier {
                    attribute: id,
                    generator_descriptor,
                    generator: None,
                });
                Ok(())
            }
            IdentifierSource::AggregatedComposite(_) => Err(Error::not_yet_implemented(
                "aggregated composite identifiers",
            )),
            IdentifierSource::NonAggregatedComposite(_) => Err(Error::not_yet_implemented(
                "non-aggregated composite identifiers",
            )),
        }
    }

    /// Creates the identifier generator of a hierarchy once its root is bound.
    fn create_identifier_generator(&mut self, hierarchy: HierarchyId) -> Result<()> {
        let services = self.services;
        let options = self.options;
        let quoted = options.globally_quoted_identifiers;
        let global = &options.generator_settings;
        let details = self.hierarchy_mut(hierarchy)?;
        let root_name = details.root_entity_name.clone();
        let Some(identifier) = details.identifier.as_mut() else {
            return Ok(());
        };
        if identifier.generator.is_some() {
            return Ok(());
        }
        let descriptor = &identifier.generator_descriptor;
        let mut settings = merge_generator_settings(global, descriptor, quoted);
        if !settings.contains_key(ENTITY_NAME) {
            settings.insert(ENTITY_NAME.to_string(), root_name.clone());
        }
        log::trace!(
            "creating {} generator {} for {root_name}",
            descriptor.strategy,
            descriptor.name
        );
        identifier.generator = Some(services.generators.create(&descriptor.strategy, &settings)?);
        Ok(())
    }

    // =========================================================================
    // Discriminator
    // =========================================================================

    fn bind_discriminator(
        &mut self,
        entity: EntityBindingId,
        hierarchy: HierarchyId,
        source: &DiscriminatorSource,
    ) -> Result<()> {
        let values = self.bind_entity_values(
            entity,
            slice::from_ref(&source.value_source),
            ColumnBindingDefaults::DISCRIMINATOR,
            "class",
        )?;
        let Some(value) = values.into_iter().next() else {
            return Err(Error::contract_violation("discriminator bound no value"));
        };

        let mut descriptor = TypeDescriptor::new();
        let type_information = match source.type_information() {
            ExplicitTypeSource { name: None, .. } => {
                ExplicitTypeSource::named(DEFAULT_DISCRIMINATOR_TYPE)
            }
            named => named,
        };
        apply_explicit_type(self.services.types.as_ref(), &mut descriptor, &type_information);
        let subject = format!("{}.class", self.entity(entity)?.entity_name());
        self.resolve_type(&mut descriptor, slice::from_ref(&value), &subject);

        self.hierarchy_mut(hierarchy)?.discriminator = Some(EntityDiscriminator {
            value,
            type_descriptor: descriptor,
            inserted: source.inserted,
            forced: source.forced,
        });
        Ok(())
    }
}

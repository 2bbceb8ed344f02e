//! On-demand entity binding and association target resolution.

use metabind_binding::{AttributeBinding, AttributeBindingId, EntityBindingId};
use metabind_foundation::{Error, InheritanceType, Result};

use crate::session::{BindingSession, DeferredReference};

impl BindingSession<'_> {
    /// Returns the binding of `entity_name`, binding it now if needed.
    ///
    /// The superclass is bound first; binding an entity also binds its
    /// subclasses unless its hierarchy declares no inheritance.
    pub(crate) fn get_entity_binding(&mut self, entity_name: &str) -> Result<EntityBindingId> {
        if let Some(id) = self.metadata.entity_id(entity_name) {
            return Ok(id);
        }
        let indexed = self
            .source(entity_name)
            .ok_or_else(|| Error::unknown_entity(entity_name))?;

        let super_entity = match indexed.super_name {
            Some(super_name) => {
                let id = self.get_entity_binding(super_name)?;
                // Binding the superclass binds its subclasses too.
                if let Some(id) = self.metadata.entity_id(entity_name) {
                    return Ok(id);
                }
                Some(id)
            }
            None => None,
        };
        let id = self.create_entity_binding(entity_name, super_entity)?;
        if indexed.hierarchy.inheritance == InheritanceType::NoInheritance {
            if !indexed.source.subclasses.is_empty() {
                log::debug!("{entity_name} declares no inheritance; its subclasses are not bound");
            }
            return Ok(id);
        }
        self.bind_subclasses(id, indexed.source)
            .map_err(|err| err.with_frame(format!("entity {entity_name}")))?;
        Ok(id)
    }

    /// Resolves the target entity and attribute of a many-to-one association.
    ///
    /// Without a property reference the target is the referenced entity's
    /// identifier. A property reference to an attribute that is not bound
    /// yet is completed when the session finishes.
    pub(crate) fn resolve_entity_reference(
        &mut self,
        association: AttributeBindingId,
    ) -> Result<()> {
        let (entity_name, attribute_name) = {
            let binding = self
                .attribute(association)?
                .as_many_to_one()
                .ok_or_else(|| {
                    Error::contract_violation(format!("{association:?} is not a many-to-one"))
                })?;
            (
                binding.referenced_entity_name.clone(),
                binding.referenced_attribute_name.clone(),
            )
        };
        let entity = self.get_entity_binding(&entity_name)?;

        let referenced = match attribute_name {
            None => Some(
                self.metadata
                    .hierarchy_of(entity)
                    .and_then(|details| details.identifier_attribute())
                    .ok_or_else(|| {
                        Error::contract_violation(format!("{entity_name} has no identifier"))
                    })?,
            ),
            Some(attribute_name) => {
                let located = self.metadata.locate_attribute(entity, &attribute_name);
                if located.is_none() {
                    log::debug!("property reference {entity_name}.{attribute_name} deferred");
                    self.deferred.push(DeferredReference {
                        association,
                        entity,
                        attribute_name,
                    });
                }
                located
            }
        };

        if let Some(target) = self
            .metadata
            .attribute_mut(association)
            .and_then(AttributeBinding::as_many_to_one_mut)
        {
            target.referenced_entity = Some(entity);
            target.referenced_attribute = referenced;
        }
        if let Some(referenced) = referenced {
            self.metadata
                .add_referencing_association(referenced, association);
        }
        Ok(())
    }
}

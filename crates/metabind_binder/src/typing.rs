//! Type resolution for attributes, collection elements, and discriminators.

use metabind_binding::{
    AttributeBinding, AttributeBindingId, ContainerRef, EntityBinding, RelationalValueBinding,
    TypeDescriptor,
};
use metabind_foundation::Result;
use metabind_relational::Datatype;
use metabind_source::ExplicitTypeSource;

use crate::session::BindingSession;
use crate::types::TypeRegistry;

/// Applies explicit type information to a descriptor.
///
/// A name that matches a type definition is replaced by the definition's
/// implementation and picks up its parameters; the source's own parameters
/// override both.
pub(crate) fn apply_explicit_type(
    types: &dyn TypeRegistry,
    descriptor: &mut TypeDescriptor,
    source: &ExplicitTypeSource,
) {
    let Some(name) = source.name.as_deref() else {
        return;
    };
    match types.type_definition(name) {
        Some(definition) => {
            descriptor.explicit_type_name = Some(definition.type_implementation.clone());
            descriptor.type_parameters.extend(definition.parameters.clone());
        }
        None => descriptor.explicit_type_name = Some(name.to_string()),
    }
    descriptor.type_parameters.extend(source.parameters.clone());
}

impl BindingSession<'_> {
    /// Resolves a descriptor against the type registry and applies the
    /// result to a single-valued binding's relational value.
    ///
    /// A descriptor with neither an explicit nor a declared type stays
    /// unresolved.
    pub(crate) fn resolve_type(
        &mut self,
        descriptor: &mut TypeDescriptor,
        values: &[RelationalValueBinding],
        subject: &str,
    ) {
        if descriptor.resolved.is_none() {
            let Some(name) = descriptor.lookup_name() else {
                log::debug!("type of {subject} is not known yet; resolution deferred");
                return;
            };
            let resolved = self
                .services
                .types
                .heuristic_type(name, &descriptor.type_parameters);
            if resolved.is_none() {
                log::debug!("type {name} of {subject} is not registered; resolution deferred");
                return;
            }
            descriptor.resolved = resolved;
        }
        let Some(resolved) = descriptor.resolved.as_ref() else {
            return;
        };
        log::trace!("type of {subject} resolved to {}", resolved.name);
        if descriptor.declared_type_name.is_none() {
            descriptor.declared_type_name = Some(resolved.returned_class.clone());
        }
        if let ([value], Some(&code)) = (values, resolved.sql_types.first()) {
            self.metadata.database_mut().set_datatype_if_absent(
                value.value,
                Datatype::new(code, resolved.name.clone(), resolved.returned_class.clone()),
            );
        }
    }

    /// Resolves the type of a singular attribute binding.
    ///
    /// The declared type comes from the introspector unless the binding
    /// already has one; it is also recorded on the domain attribute slot.
    pub(crate) fn resolve_attribute_type(
        &mut self,
        attribute: AttributeBindingId,
        source: &ExplicitTypeSource,
    ) -> Result<()> {
        let binding = self.attribute(attribute)?;
        let container = binding.container();
        let name = binding.name().to_string();
        let path = binding.path().to_string();
        let values = binding.values().to_vec();
        let mut descriptor = binding.type_descriptor.clone();

        if descriptor.declared_type_name.is_none() {
            descriptor.declared_type_name = self
                .container_class(container)
                .and_then(|class| self.services.introspector.declared_type(&class, &name));
        }
        apply_explicit_type(self.services.types.as_ref(), &mut descriptor, source);
        self.resolve_type(&mut descriptor, &values, &path);

        if let Some(declared) = descriptor.declared_type_name.as_deref() {
            self.record_declared_type(container, &name, declared);
        }
        self.attribute_mut(attribute)?.type_descriptor = descriptor;
        Ok(())
    }

    /// Records a slot's declared type on the container's domain model.
    pub(crate) fn record_declared_type(
        &mut self,
        container: ContainerRef,
        name: &str,
        declared: &str,
    ) {
        let domain = match container {
            ContainerRef::Entity(entity) => self
                .metadata
                .entity_mut(entity)
                .map(EntityBinding::entity_mut),
            ContainerRef::Component(component) => self
                .metadata
                .attribute_mut(component)
                .and_then(AttributeBinding::as_component_mut)
                .map(|component| &mut component.component),
        };
        if let Some(domain) = domain {
            domain.set_declared_type_if_absent(name, declared);
        }
    }
}

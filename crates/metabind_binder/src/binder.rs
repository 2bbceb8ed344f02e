//! The binder entry point.

use metabind_binding::Metadata;
use metabind_foundation::Result;
use metabind_source::EntityHierarchy;

use crate::options::BinderOptions;
use crate::services::BindingServices;
use crate::session::BindingSession;

/// Compiles entity hierarchies into [`Metadata`].
///
/// A binder holds configuration only; every call to [`Binder::bind`] runs
/// its own session, so one binder can be reused.
///
/// # Example
///
/// ```
/// use metabind_binder::Binder;
/// use metabind_source::{
///     EntityHierarchy, EntitySource, IdentifierSource, RootEntitySource, SingularAttributeSource,
/// };
///
/// let person = RootEntitySource::new(
///     EntitySource::new("Person").with_class("shop.Person"),
///     IdentifierSource::simple(SingularAttributeSource::new("id").with_type("long")),
/// );
/// let metadata = Binder::new().bind(&[EntityHierarchy::single(person)]).unwrap();
/// assert!(metadata.entity_binding("Person").is_some());
/// ```
#[derive(Debug, Default)]
pub struct Binder {
    options: BinderOptions,
    services: BindingServices,
}

impl Binder {
    /// Creates a binder with default options and services.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the options.
    #[must_use]
    pub fn with_options(mut self, options: BinderOptions) -> Self {
        self.options = options;
        self
    }

    /// Builder method to set the services.
    #[must_use]
    pub fn with_services(mut self, services: BindingServices) -> Self {
        self.services = services;
        self
    }

    /// Returns the options.
    #[must_use]
    pub fn options(&self) -> &BinderOptions {
        &self.options
    }

    /// Returns the services.
    #[must_use]
    pub fn services(&self) -> &BindingServices {
        &self.services
    }

    /// Binds every hierarchy, in order, into a new [`Metadata`].
    ///
    /// # Errors
    ///
    /// Returns the first binding error; the partially built metadata is
    /// discarded.
    pub fn bind(&self, hierarchies: &[EntityHierarchy]) -> Result<Metadata> {
        let mut session = BindingSession::new(&self.options, &self.services, hierarchies);
        for hierarchy in hierarchies {
            session.bind_hierarchy(hierarchy)?;
        }
        let metadata = session.finish()?;
        log::debug!(
            "bound {} entities and {} collections",
            metadata.entity_count(),
            metadata.collection_count()
        );
        Ok(metadata)
    }
}

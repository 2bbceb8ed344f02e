//! Entity sources and hierarchies.

use metabind_foundation::{
    Caching, CustomSql, EntityMode, IdGenerator, InheritanceType, MetaAttributeSource,
    OptimisticLockStyle, Origin,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::attribute::{
    AttributeSource, ComponentAttributeSource, ExplicitTypeSource, SingularAttributeSource,
};
use crate::relational::{ConstraintSource, RelationalValueSource, TableSource};

/// An entity, root or subclass.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntitySource {
    /// Unique entity name.
    pub entity_name: String,
    /// Mapped class; absent for dynamic-map entities.
    pub class_name: Option<String>,
    /// Name used in JPA queries.
    pub jpa_entity_name: Option<String>,
    /// Where the entity was declared.
    pub origin: Origin,
    /// Primary table; ignored for single-table subclasses.
    pub primary_table: TableSource,
    /// Secondary tables, addressed by logical name.
    pub secondary_tables: Vec<TableSource>,
    /// Attributes in declaration order.
    pub attributes: Vec<AttributeSource>,
    /// Table constraints.
    pub constraints: Vec<ConstraintSource>,
    /// Direct subclasses.
    pub subclasses: Vec<EntitySource>,
    /// Meta attributes.
    pub meta_attributes: Vec<MetaAttributeSource>,
    /// Lazily loaded through a proxy.
    pub lazy: bool,
    /// Proxy interface name.
    pub proxy: Option<String>,
    /// Generate inserts per instance.
    pub dynamic_insert: bool,
    /// Generate updates per instance.
    pub dynamic_update: bool,
    /// Batch fetch size.
    pub batch_size: Option<u32>,
    /// Select before updating detached instances.
    pub select_before_update: bool,
    /// Never instantiated directly.
    pub is_abstract: bool,
    /// Custom entity persister class.
    pub custom_persister_class_name: Option<String>,
    /// Custom tuplizer class.
    pub custom_tuplizer_class_name: Option<String>,
    /// Named custom loader.
    pub custom_loader_name: Option<String>,
    /// Custom insert statement.
    pub custom_sql_insert: Option<CustomSql>,
    /// Custom update statement.
    pub custom_sql_update: Option<CustomSql>,
    /// Custom delete statement.
    pub custom_sql_delete: Option<CustomSql>,
    /// Tables whose changes invalidate this entity.
    pub synchronized_table_names: Vec<String>,
    /// Discriminator value identifying this entity.
    pub discriminator_match_value: Option<String>,
}

impl EntitySource {
    /// Creates an entity with an implicit primary table.
    #[must_use]
    pub fn new(entity_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            class_name: None,
            jpa_entity_name: None,
            origin: Origin::default(),
            primary_table: TableSource::implicit(),
            secondary_tables: Vec::new(),
            attributes: Vec::new(),
            constraints: Vec::new(),
            subclasses: Vec::new(),
            meta_attributes: Vec::new(),
            lazy: true,
            proxy: None,
            dynamic_insert: false,
            dynamic_update: false,
            batch_size: None,
            select_before_update: false,
            is_abstract: false,
            custom_persister_class_name: None,
            custom_tuplizer_class_name: None,
            custom_loader_name: None,
            custom_sql_insert: None,
            custom_sql_update: None,
            custom_sql_delete: None,
            synchronized_table_names: Vec::new(),
            discriminator_match_value: None,
        }
    }

    /// Sets the mapped class.
    #[must_use]
    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Sets the origin.
    #[must_use]
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Sets the primary table.
    #[must_use]
    pub fn with_table(mut self, table: TableSource) -> Self {
        self.primary_table = table;
        self
    }

    /// Adds a secondary table.
    #[must_use]
    pub fn with_secondary_table(mut self, table: TableSource) -> Self {
        self.secondary_tables.push(table);
        self
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<AttributeSource>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    /// Adds a table constraint.
    #[must_use]
    pub fn with_constraint(mut self, constraint: ConstraintSource) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Adds a direct subclass.
    #[must_use]
    pub fn with_subclass(mut self, subclass: EntitySource) -> Self {
        self.subclasses.push(subclass);
        self
    }

    /// Adds a meta attribute.
    #[must_use]
    pub fn with_meta(mut self, meta: MetaAttributeSource) -> Self {
        self.meta_attributes.push(meta);
        self
    }

    /// Sets the discriminator value identifying this entity.
    #[must_use]
    pub fn with_discriminator_value(mut self, value: impl Into<String>) -> Self {
        self.discriminator_match_value = Some(value.into());
        self
    }

    /// Enables dynamic insert and update.
    #[must_use]
    pub fn dynamic(mut self) -> Self {
        self.dynamic_insert = true;
        self.dynamic_update = true;
        self
    }

    /// Sets the batch fetch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Adds a synchronized table.
    #[must_use]
    pub fn synchronized_with(mut self, table_name: impl Into<String>) -> Self {
        self.synchronized_table_names.push(table_name.into());
        self
    }

    /// Iterates over this entity and all of its subclasses, depth first.
    pub fn walk(&self) -> impl Iterator<Item = &EntitySource> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.subclasses.iter().rev());
            Some(next)
        })
    }
}

/// How the hierarchy's identifier is mapped.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IdentifierSource {
    /// A single basic attribute.
    Simple {
        /// The identifier attribute.
        attribute: SingularAttributeSource,
        /// Generator descriptor; `assigned` when absent.
        generator: Option<IdGenerator>,
    },
    /// An embedded identifier component.
    AggregatedComposite(ComponentAttributeSource),
    /// Several entity attributes forming the identifier together.
    NonAggregatedComposite(Vec<SingularAttributeSource>),
}

impl IdentifierSource {
    /// A simple identifier without a generator.
    #[must_use]
    pub fn simple(attribute: SingularAttributeSource) -> Self {
        Self::Simple {
            attribute,
            generator: None,
        }
    }

    /// A simple identifier with a generator.
    #[must_use]
    pub fn generated(attribute: SingularAttributeSource, generator: IdGenerator) -> Self {
        Self::Simple {
            attribute,
            generator: Some(generator),
        }
    }
}

/// The discriminator column of a hierarchy.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiscriminatorSource {
    /// Column or formula.
    pub value_source: RelationalValueSource,
    /// Explicit type; `string` when absent.
    pub explicit_type_name: Option<String>,
    /// Written on insert.
    pub inserted: bool,
    /// Always applied as a restriction, even for the root.
    pub forced: bool,
}

impl DiscriminatorSource {
    /// A discriminator column with default flags.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self {
            value_source: RelationalValueSource::column(name),
            explicit_type_name: None,
            inserted: true,
            forced: false,
        }
    }

    /// A discriminator formula.
    #[must_use]
    pub fn formula(expression: impl Into<String>) -> Self {
        Self {
            value_source: RelationalValueSource::formula(expression),
            explicit_type_name: None,
            inserted: false,
            forced: false,
        }
    }

    /// Sets the explicit type.
    #[must_use]
    pub fn with_type(mut self, name: impl Into<String>) -> Self {
        self.explicit_type_name = Some(name.into());
        self
    }

    /// Marks the discriminator forced.
    #[must_use]
    pub fn forced(mut self) -> Self {
        self.forced = true;
        self
    }

    /// Returns the explicit type as type information.
    #[must_use]
    pub fn type_information(&self) -> ExplicitTypeSource {
        ExplicitTypeSource {
            name: self.explicit_type_name.clone(),
            ..ExplicitTypeSource::default()
        }
    }
}

/// The root entity of a hierarchy and the settings shared by the hierarchy.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RootEntitySource {
    /// The root entity.
    pub entity: EntitySource,
    /// Identifier mapping.
    pub identifier: IdentifierSource,
    /// Version attribute.
    pub version: Option<SingularAttributeSource>,
    /// Discriminator.
    pub discriminator: Option<DiscriminatorSource>,
    /// Second-level cache settings.
    pub caching: Option<Caching>,
    /// Only queried explicitly, never through a superclass.
    pub explicit_polymorphism: bool,
    /// Optimistic locking strategy.
    pub optimistic_lock_style: OptimisticLockStyle,
    /// Instances may change.
    pub mutable: bool,
    /// SQL restriction applied when loading.
    pub where_filter: Option<String>,
    /// Database row id column.
    pub row_id: Option<String>,
    /// Runtime representation.
    pub entity_mode: EntityMode,
}

impl RootEntitySource {
    /// Creates a root entity with the given identifier.
    #[must_use]
    pub fn new(entity: EntitySource, identifier: IdentifierSource) -> Self {
        Self {
            entity,
            identifier,
            version: None,
            discriminator: None,
            caching: None,
            explicit_polymorphism: false,
            optimistic_lock_style: OptimisticLockStyle::Version,
            mutable: true,
            where_filter: None,
            row_id: None,
            entity_mode: EntityMode::Pojo,
        }
    }

    /// Sets the version attribute.
    #[must_use]
    pub fn with_version(mut self, version: SingularAttributeSource) -> Self {
        self.version = Some(version);
        self
    }

    /// Sets the discriminator.
    #[must_use]
    pub fn with_discriminator(mut self, discriminator: DiscriminatorSource) -> Self {
        self.discriminator = Some(discriminator);
        self
    }

    /// Sets second-level caching.
    #[must_use]
    pub fn with_caching(mut self, caching: Caching) -> Self {
        self.caching = Some(caching);
        self
    }

    /// Sets the optimistic locking strategy.
    #[must_use]
    pub fn with_optimistic_lock(mut self, style: OptimisticLockStyle) -> Self {
        self.optimistic_lock_style = style;
        self
    }

    /// Sets the entity mode.
    #[must_use]
    pub fn with_entity_mode(mut self, mode: EntityMode) -> Self {
        self.entity_mode = mode;
        self
    }

    /// Sets the loading restriction.
    #[must_use]
    pub fn with_where(mut self, where_filter: impl Into<String>) -> Self {
        self.where_filter = Some(where_filter.into());
        self
    }

    /// Marks instances immutable.
    #[must_use]
    pub fn immutable(mut self) -> Self {
        self.mutable = false;
        self
    }

    /// Marks the hierarchy explicitly polymorphic.
    #[must_use]
    pub fn explicit_polymorphism(mut self) -> Self {
        self.explicit_polymorphism = true;
        self
    }
}

/// One inheritance tree: a root, its nested subclasses, and the strategy.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityHierarchy {
    /// The root entity.
    pub root: RootEntitySource,
    /// How the hierarchy maps to tables.
    pub inheritance: InheritanceType,
}

impl EntityHierarchy {
    /// A hierarchy with a single entity.
    #[must_use]
    pub fn single(root: RootEntitySource) -> Self {
        Self {
            root,
            inheritance: InheritanceType::NoInheritance,
        }
    }

    /// A hierarchy with the given strategy.
    #[must_use]
    pub fn new(root: RootEntitySource, inheritance: InheritanceType) -> Self {
        Self { root, inheritance }
    }

    /// Iterates over every entity in the hierarchy, root first.
    pub fn entities(&self) -> impl Iterator<Item = &EntitySource> {
        self.root.entity.walk()
    }
}

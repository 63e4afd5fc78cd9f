use crate::ecs::{Component, Entity, EntityId, EntityStore, Group};

/// View handed to component hooks.
///
/// Gives access to the owning entity (sibling components, flags, groups)
/// and to the rest of the store (other entities, group buckets, creation).
///
/// While a hook runs its entity is checked out of the store, so
/// `ctx.store().get(ctx.id())` is `None`; go through [`Context::entity`]
/// instead. The component whose hook is running is likewise detached from
/// the entity.
pub struct Context<'a> {
    id: EntityId,
    entity: &'a mut Entity,
    store: &'a mut EntityStore,
}

impl<'a> Context<'a> {
    pub(crate) fn new(id: EntityId, entity: &'a mut Entity, store: &'a mut EntityStore) -> Self {
        Self { id, entity, store }
    }

    /// Handle of the owning entity.
    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn entity(&self) -> &Entity {
        self.entity
    }

    #[inline]
    pub fn entity_mut(&mut self) -> &mut Entity {
        self.entity
    }

    #[inline]
    pub fn store(&self) -> &EntityStore {
        self.store
    }

    #[inline]
    pub fn store_mut(&mut self) -> &mut EntityStore {
        self.store
    }

    /// Sibling component of type `T`. Panics if absent.
    pub fn get<T: Component>(&self) -> &T {
        self.entity.get_component::<T>()
    }

    /// Mutable sibling component of type `T`. Panics if absent.
    pub fn get_mut<T: Component>(&mut self) -> &mut T {
        self.entity.get_component_mut::<T>()
    }

    pub fn has<T: Component>(&self) -> bool {
        self.entity.has_component::<T>()
    }

    /// Attach another component to the owning entity and run its `init`.
    ///
    /// # Panics
    /// Panics if a `T` is already attached.
    pub fn add_component<T: Component>(&mut self, component: T) -> &mut T {
        self.entity.attach(self.id, self.store, component);
        self.entity.get_component_mut::<T>()
    }

    /// Tag the owning entity with `group` and register it in the bucket.
    pub fn add_group(&mut self, group: Group) {
        if self.entity.insert_group(group) {
            self.store.add_to_group(self.id, group);
        }
    }
}

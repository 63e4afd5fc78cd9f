// entity.rs - Component container with alive/active flags and group bits
//
// An entity owns its components in attachment order. A fixed table indexed
// by component id maps each kind to its position in that list, and a bitset
// mirrors which kinds are present.

use crate::ecs::component::registered_id;
use crate::ecs::{
    component_id, Bitset, Component, ComponentId, Context, EntityId, EntityStore, Group,
    MAX_COMPONENTS,
};
use std::any::type_name;
use std::fmt;

/// Lifecycle hook selector used when dispatching over components.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Hook {
    Init,
    Update(f32),
    Draw,
}

struct Attached {
    id: ComponentId,
    /// `None` only while this component's own hook is running.
    slot: Option<Box<dyn Component>>,
}

/// A set of components plus alive/active flags and group membership.
///
/// Entities are created by [`EntityStore::create_entity`] and always live
/// inside the store. Operations that need the store as well (attaching a
/// component, joining a group) are on [`EntityMut`](crate::ecs::EntityMut)
/// and [`Context`].
pub struct Entity {
    alive: bool,
    active: bool,
    components: Vec<Attached>,
    lookup: [Option<usize>; MAX_COMPONENTS],
    kinds: Bitset,
    groups: Bitset,
}

impl Entity {
    pub(crate) fn new() -> Self {
        Self {
            alive: true,
            active: true,
            components: Vec::new(),
            lookup: [None; MAX_COMPONENTS],
            kinds: Bitset::new(),
            groups: Bitset::new(),
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Mark the entity dead. It is reclaimed by the next `refresh`.
    /// There is no way back.
    pub fn destroy(&mut self) {
        self.alive = false;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Let the entity take part in update/draw passes again.
    pub fn enable(&mut self) {
        self.active = true;
    }

    /// Skip the entity in update/draw passes. Components and groups are kept.
    pub fn disable(&mut self) {
        self.active = false;
    }

    /// Returns `true` if a component of type `T` is attached.
    pub fn has_component<T: Component>(&self) -> bool {
        registered_id::<T>().is_some_and(|id| self.kinds.contains(id as usize))
    }

    /// Borrow the component of type `T`.
    ///
    /// # Panics
    /// Panics if no `T` is attached, or if called on `T` from inside one of
    /// `T`'s own hooks.
    pub fn get_component<T: Component>(&self) -> &T {
        match self.component::<T>() {
            Some(component) => component,
            None => panic!("entity has no component `{}`", type_name::<T>()),
        }
    }

    /// Mutably borrow the component of type `T`.
    ///
    /// # Panics
    /// Same conditions as [`Entity::get_component`].
    pub fn get_component_mut<T: Component>(&mut self) -> &mut T {
        match self.component_mut::<T>() {
            Some(component) => component,
            None => panic!("entity has no component `{}`", type_name::<T>()),
        }
    }

    /// Non-panicking variant of [`Entity::get_component`].
    pub fn component<T: Component>(&self) -> Option<&T> {
        let index = self.index_of::<T>()?;
        let component: &dyn Component = self.components[index].slot.as_deref()?;
        component.as_any().downcast_ref::<T>()
    }

    /// Non-panicking variant of [`Entity::get_component_mut`].
    pub fn component_mut<T: Component>(&mut self) -> Option<&mut T> {
        let index = self.index_of::<T>()?;
        let component: &mut dyn Component = self.components[index].slot.as_deref_mut()?;
        component.as_any_mut().downcast_mut::<T>()
    }

    /// Number of attached components.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Attached component ids in attachment order.
    pub fn component_ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.components.iter().map(|attached| attached.id)
    }

    #[inline]
    pub fn has_group(&self, group: Group) -> bool {
        self.groups.contains(group.index())
    }

    /// Clear the membership bit for `group`.
    ///
    /// The store's bucket keeps its (now stale) handle until the next refresh.
    pub fn del_group(&mut self, group: Group) {
        self.groups.remove(group.index());
    }

    /// Group membership set.
    pub fn groups(&self) -> Bitset {
        self.groups
    }

    /// Set the membership bit. Returns `true` if it was not set before.
    pub(crate) fn insert_group(&mut self, group: Group) -> bool {
        self.groups.insert(group.index())
    }

    fn index_of<T: Component>(&self) -> Option<usize> {
        let id = registered_id::<T>()? as usize;
        if !self.kinds.contains(id) {
            return None;
        }
        self.lookup[id]
    }

    /// Attach `component` and run its `init` hook.
    ///
    /// # Panics
    /// Panics if a `T` is already attached.
    pub(crate) fn attach<T: Component>(
        &mut self,
        id: EntityId,
        store: &mut EntityStore,
        component: T,
    ) {
        let kind = component_id::<T>();
        assert!(
            !self.kinds.contains(kind as usize),
            "entity {id} already has component `{}`",
            type_name::<T>()
        );

        let index = self.components.len();
        self.components.push(Attached {
            id: kind,
            slot: Some(Box::new(component)),
        });
        self.lookup[kind as usize] = Some(index);
        self.kinds.insert(kind as usize);

        self.run_hook(index, id, store, Hook::Init);
    }

    /// Run `hook` on every component in attachment order.
    ///
    /// Components attached while the pass runs are not visited by it.
    pub(crate) fn dispatch(&mut self, id: EntityId, store: &mut EntityStore, hook: Hook) {
        let count = self.components.len();
        for index in 0..count {
            self.run_hook(index, id, store, hook);
        }
    }

    fn run_hook(&mut self, index: usize, id: EntityId, store: &mut EntityStore, hook: Hook) {
        let Some(mut component) = self.components[index].slot.take() else {
            return;
        };

        {
            let mut ctx = Context::new(id, self, store);
            match hook {
                Hook::Init => component.init(&mut ctx),
                Hook::Update(dt) => component.update(&mut ctx, dt),
                Hook::Draw => component.draw(&mut ctx),
            }
        }

        self.components[index].slot = Some(component);
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("alive", &self.alive)
            .field("active", &self.active)
            .field("components", &self.kinds)
            .field("groups", &self.groups)
            .finish()
    }
}

// store.rs - Entity ownership, group buckets, passes and reclamation
//
// The store owns every entity in a slot table addressed by `EntityId`.
// `order` is the master collection (creation order) that passes walk.
// Group buckets are caches of handles; they are only cleaned in `refresh`.

use crate::ecs::entity::Hook;
use crate::ecs::{Component, Entity, EntityId, Group, MAX_GROUPS};
use std::collections::HashSet;
use std::ops::{Deref, DerefMut};

const OCCUPIED: &str = "EntityMut always refers to an occupied slot";

enum SlotState {
    Vacant,
    Occupied(Box<Entity>),
    /// Entity is checked out while its component hooks run.
    Borrowed,
}

struct Slot {
    generation: u32,
    state: SlotState,
}

/// Owner of all entities and group buckets.
pub struct EntityStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
    order: Vec<EntityId>,
    buckets: [Vec<EntityId>; MAX_GROUPS],
    /// Nesting depth of running component hooks.
    hook_depth: u32,
    seen: HashSet<EntityId>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            order: Vec::new(),
            buckets: std::array::from_fn(|_| Vec::new()),
            hook_depth: 0,
            seen: HashSet::new(),
        }
    }

    /// Create an alive, active entity with no components or groups.
    ///
    /// The entity is appended to the master collection. When called from
    /// inside a pass, it is first visited by the next pass.
    pub fn create_entity(&mut self) -> EntityMut<'_> {
        let entity = Box::new(Entity::new());
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.state = SlotState::Occupied(entity);
                EntityId::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    state: SlotState::Occupied(entity),
                });
                EntityId::new(index, 0)
            }
        };

        self.order.push(id);
        tracing::trace!(entity = %id, "created entity");
        EntityMut { store: self, id }
    }

    /// Run `update(dt)` on every alive, active entity in creation order.
    pub fn update(&mut self, dt: f32) {
        self.dispatch(Hook::Update(dt));
    }

    /// Run `draw` on every alive, active entity in creation order.
    pub fn draw(&mut self) {
        self.dispatch(Hook::Draw);
    }

    fn dispatch(&mut self, hook: Hook) {
        let count = self.order.len();
        for i in 0..count {
            let id = self.order[i];
            self.with_entity(id, |entity, store| {
                if entity.is_alive() && entity.is_active() {
                    entity.dispatch(id, store, hook);
                }
            });
        }
    }

    /// Append `id` to the bucket of `group`.
    ///
    /// No membership bit is touched and no duplicate check is made; a
    /// handle whose entity does not carry the bit is dropped at the next
    /// refresh.
    pub fn add_to_group(&mut self, id: EntityId, group: Group) {
        self.buckets[group.index()].push(id);
    }

    /// Handles in the bucket of `group`.
    ///
    /// Between refreshes this may include destroyed entities, entities that
    /// left the group, and duplicates. Check `is_alive`/`has_group` when
    /// that matters.
    pub fn entities_by_group(&self, group: Group) -> &[EntityId] {
        &self.buckets[group.index()]
    }

    /// Purge stale bucket entries, then reclaim destroyed entities.
    ///
    /// Buckets go first: the membership bits of dead entities are read
    /// before their storage is released.
    ///
    /// # Panics
    /// Panics if called from inside a component hook.
    pub fn refresh(&mut self) {
        assert!(
            self.hook_depth == 0,
            "refresh called from inside a component hook"
        );

        let mut seen = std::mem::take(&mut self.seen);
        for group in Group::all() {
            let mut bucket = std::mem::take(&mut self.buckets[group.index()]);
            seen.clear();
            bucket.retain(|&id| {
                self.get(id)
                    .is_some_and(|entity| entity.is_alive() && entity.has_group(group))
                    && seen.insert(id)
            });
            self.buckets[group.index()] = bucket;
        }
        seen.clear();
        self.seen = seen;

        let slots = &mut self.slots;
        let free = &mut self.free;
        let mut reclaimed = 0usize;
        self.order.retain(|&id| {
            let slot = &mut slots[id.index() as usize];
            let alive = match &slot.state {
                SlotState::Occupied(entity) => entity.is_alive(),
                SlotState::Borrowed => true,
                SlotState::Vacant => false,
            };
            if !alive {
                slot.state = SlotState::Vacant;
                // An exhausted slot is retired so old handles never match again.
                if slot.generation < u32::MAX {
                    slot.generation += 1;
                    free.push(id.index());
                }
                reclaimed += 1;
            }
            alive
        });

        if reclaimed > 0 {
            tracing::debug!(reclaimed, live = self.order.len(), "refreshed entity store");
        }
    }

    /// Entity behind `id`, unless it was reclaimed or is running hooks.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let slot = self.slots.get(id.index() as usize)?;
        match &slot.state {
            SlotState::Occupied(entity) if slot.generation == id.generation() => Some(&**entity),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        match &mut slot.state {
            SlotState::Occupied(entity) if slot.generation == id.generation() => {
                Some(&mut **entity)
            }
            _ => None,
        }
    }

    /// Host-side handle for `id`, with the same availability as [`EntityStore::get`].
    pub fn entity_mut(&mut self, id: EntityId) -> Option<EntityMut<'_>> {
        self.get(id)?;
        Some(EntityMut { store: self, id })
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Number of entities in the master collection, dead ones included
    /// until the next refresh.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Master collection in creation order.
    pub fn ids(&self) -> &[EntityId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.order
            .iter()
            .filter_map(move |&id| self.get(id).map(|entity| (id, entity)))
    }

    /// Check out `id`, run `f` with the entity and the rest of the store,
    /// then put it back.
    fn with_entity<R>(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut Entity, &mut EntityStore) -> R,
    ) -> Option<R> {
        let mut entity = self.checkout(id)?;
        self.hook_depth += 1;
        let result = f(&mut *entity, self);
        self.hook_depth -= 1;
        self.checkin(id, entity);
        Some(result)
    }

    fn checkout(&mut self, id: EntityId) -> Option<Box<Entity>> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() || !matches!(slot.state, SlotState::Occupied(_)) {
            return None;
        }
        match std::mem::replace(&mut slot.state, SlotState::Borrowed) {
            SlotState::Occupied(entity) => Some(entity),
            _ => None,
        }
    }

    fn checkin(&mut self, id: EntityId, entity: Box<Entity>) {
        let slot = &mut self.slots[id.index() as usize];
        debug_assert!(matches!(slot.state, SlotState::Borrowed));
        slot.state = SlotState::Occupied(entity);
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Host-side mutable handle to one entity.
///
/// Dereferences to [`Entity`] for flags, lookups and `del_group`; adds the
/// operations that also need the store.
pub struct EntityMut<'a> {
    store: &'a mut EntityStore,
    id: EntityId,
}

impl<'a> EntityMut<'a> {
    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Attach `component`, run its `init` hook and return it.
    ///
    /// # Panics
    /// Panics if a `T` is already attached.
    pub fn add_component<T: Component>(&mut self, component: T) -> &mut T {
        let id = self.id;
        self.store
            .with_entity(id, |entity, store| entity.attach(id, store, component))
            .expect(OCCUPIED);
        self.get_component_mut::<T>()
    }

    /// Tag the entity with `group` and register it in the bucket.
    ///
    /// Repeated calls leave a single membership bit and push no new handle.
    pub fn add_group(&mut self, group: Group) {
        if self.insert_group(group) {
            self.store.add_to_group(self.id, group);
        }
    }

    /// Run every component's `update`, regardless of the active flag.
    pub fn update(&mut self, dt: f32) {
        let id = self.id;
        self.store
            .with_entity(id, |entity, store| entity.dispatch(id, store, Hook::Update(dt)))
            .expect(OCCUPIED);
    }

    /// Run every component's `draw`, regardless of the active flag.
    pub fn draw(&mut self) {
        let id = self.id;
        self.store
            .with_entity(id, |entity, store| entity.dispatch(id, store, Hook::Draw))
            .expect(OCCUPIED);
    }
}

impl Deref for EntityMut<'_> {
    type Target = Entity;

    fn deref(&self) -> &Entity {
        self.store.get(self.id).expect(OCCUPIED)
    }
}

impl DerefMut for EntityMut<'_> {
    fn deref_mut(&mut self) -> &mut Entity {
        self.store.get_mut(self.id).expect(OCCUPIED)
    }
}

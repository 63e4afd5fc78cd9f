// component.rs - Component hooks and runtime kind registration
//
// Components are identified by small u32 ids handed out on first use.
// The id doubles as an index into each entity's lookup table, which is why
// the id space is capped at MAX_COMPONENTS.

use crate::ecs::{Bitset, Context, EcsError};
use once_cell::sync::Lazy;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

pub type ComponentId = u32;

/// Maximum number of distinct component types per process.
pub const MAX_COMPONENTS: usize = 32;

const _: () = assert!(MAX_COMPONENTS <= Bitset::CAPACITY);

/// Upcast helper so boxed components can be downcast to their concrete type.
///
/// Implemented for every `'static` type; never implement it by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behavior unit attached to an entity.
///
/// All hooks default to no-ops. Each hook receives a [`Context`] that points
/// at the owning entity and the store. While a hook runs, the component
/// itself is detached from the entity, so `ctx` can reach every sibling but
/// not `self`.
pub trait Component: AsAny {
    /// Called once, right after the component is attached.
    fn init(&mut self, ctx: &mut Context<'_>) {
        let _ = ctx;
    }

    /// Called once per simulation tick while the owning entity is active.
    fn update(&mut self, ctx: &mut Context<'_>, dt: f32) {
        let _ = (ctx, dt);
    }

    /// Called once per render pass while the owning entity is active.
    fn draw(&mut self, ctx: &mut Context<'_>) {
        let _ = ctx;
    }
}

/// Metadata recorded for each registered component type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentMeta {
    pub id: ComponentId,
    pub name: &'static str,
    pub type_id: TypeId,
}

/// Assigns dense ids to component types.
///
/// Assignment is monotonic: ids are never reused or removed. The engine uses
/// one process-wide instance (see [`component_id`]); standalone instances
/// are useful when a bounded id space must be exercised in isolation.
#[derive(Debug)]
pub struct ComponentRegistry {
    capacity: usize,
    ids: HashMap<TypeId, ComponentId>,
    metas: Vec<ComponentMeta>,
}

impl ComponentRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ids: HashMap::new(),
            metas: Vec::new(),
        }
    }

    /// Return the id for `type_id`, assigning the next free one if needed.
    pub fn register(
        &mut self,
        type_id: TypeId,
        name: &'static str,
    ) -> Result<ComponentId, EcsError> {
        if let Some(&id) = self.ids.get(&type_id) {
            return Ok(id);
        }
        if self.metas.len() >= self.capacity {
            return Err(EcsError::ComponentCapacityExceeded {
                name,
                capacity: self.capacity,
            });
        }

        let id = self.metas.len() as ComponentId;
        self.ids.insert(type_id, id);
        self.metas.push(ComponentMeta { id, name, type_id });
        tracing::debug!(component = name, id, "registered component kind");
        Ok(id)
    }

    pub fn id_of(&self, type_id: TypeId) -> Option<ComponentId> {
        self.ids.get(&type_id).copied()
    }

    pub fn meta(&self, id: ComponentId) -> Option<&ComponentMeta> {
        self.metas.get(id as usize)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.metas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metas.is_empty()
    }
}

/// Process-wide registry used by every entity.
static REGISTRY: Lazy<RwLock<ComponentRegistry>> =
    Lazy::new(|| RwLock::new(ComponentRegistry::with_capacity(MAX_COMPONENTS)));

/// Id of component type `T`, assigning one on first use.
pub fn try_component_id<T: Component>() -> Result<ComponentId, EcsError> {
    let type_id = TypeId::of::<T>();
    let known = REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .id_of(type_id);
    if let Some(id) = known {
        return Ok(id);
    }

    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(type_id, type_name::<T>())
}

/// Id of component type `T`, assigning one on first use.
///
/// # Panics
/// Panics when more than [`MAX_COMPONENTS`] distinct types are registered.
pub fn component_id<T: Component>() -> ComponentId {
    match try_component_id::<T>() {
        Ok(id) => id,
        Err(err) => panic!("{err}"),
    }
}

/// Id of `T` if it has been registered, without assigning one.
pub(crate) fn registered_id<T: Component>() -> Option<ComponentId> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .id_of(TypeId::of::<T>())
}

/// Look up metadata for a previously assigned id.
pub fn meta_of(id: ComponentId) -> Option<ComponentMeta> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .meta(id)
        .cloned()
}

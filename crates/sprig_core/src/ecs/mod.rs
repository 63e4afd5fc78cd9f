//! Entity Component System core types.
//!
//! Entities are heterogeneous bags of boxed components, owned by an
//! [`EntityStore`]. Each component type is assigned a small [`ComponentId`]
//! on first use; the id indexes a fixed-size lookup table inside every
//! entity, so typed access is a bitset probe plus an array read.
//!
//! Entities can also be tagged into runtime-defined [`Group`]s. The store
//! keeps one bucket of [`EntityId`] handles per group. Buckets are a cache:
//! they may hold stale or duplicate handles until the next
//! [`EntityStore::refresh`], which is also where destroyed entities are
//! reclaimed.

mod bitset;
mod component;
mod context;
mod entity;
mod error;
mod group;
mod handle;
mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use bitset::Bitset;
pub use component::{
    component_id, meta_of, try_component_id, AsAny, Component, ComponentId, ComponentMeta,
    ComponentRegistry, MAX_COMPONENTS,
};
pub use context::Context;
pub use entity::Entity;
pub use error::EcsError;
pub use group::{Group, MAX_GROUPS};
pub use handle::EntityId;
pub use store::{EntityMut, EntityStore};

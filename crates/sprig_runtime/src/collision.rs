// collision.rs - Box overlap and the per-tick hit/boundary pass
//
// Runs after `update` on every tick. Only the flags and positions of other
// entities are touched; removal happens at the next refresh.

use crate::components::{Physics, Transform};
use crate::world::{ENEMY_BULLET, ENEMY_DROP, ENEMY_GROUPS, PLAYER_BULLET, PLAYER_SHIP};
use sprig_core::ecs::{Entity, EntityId, EntityStore};
use sprig_core::math::Vec2;

/// Axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, half_size: Vec2) -> Self {
        Self {
            min: center - half_size,
            max: center + half_size,
        }
    }

    /// Overlap test; touching edges count.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.max.x >= other.min.x
            && self.min.x <= other.max.x
            && self.max.y >= other.min.y
            && self.min.y <= other.max.y
    }
}

/// Box of an entity with both `Transform` and `Physics`.
pub fn bounds_of(entity: &Entity) -> Option<Aabb> {
    let transform = entity.component::<Transform>()?;
    let physics = entity.component::<Physics>()?;
    Some(physics.bounds(transform.position))
}

/// What one collision pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub ships_destroyed: u32,
    pub player_hit: bool,
    pub bullets_expired: u32,
    pub formation_turned: bool,
}

/// Resolve bullet hits, expire off-screen bullets and turn the enemy
/// formation at the side borders of `field`.
pub fn resolve(store: &mut EntityStore, field: Vec2) -> TickReport {
    let mut report = TickReport::default();
    let mut enemies: Vec<EntityId> = Vec::new();
    for group in ENEMY_GROUPS {
        enemies.extend_from_slice(store.entities_by_group(group));
    }

    let player_bullets = store.entities_by_group(PLAYER_BULLET).to_vec();
    for bullet in player_bullets {
        let Some(bullet_box) = flying_bounds(store, bullet) else {
            continue;
        };
        let target = enemies.iter().copied().find(|&ship| {
            live_bounds(store, ship).is_some_and(|ship_box| bullet_box.intersects(&ship_box))
        });

        if let Some(ship) = target {
            destroy(store, ship);
            disable(store, bullet);
            report.ships_destroyed += 1;
        } else if bullet_box.max.y < 0.0 {
            disable(store, bullet);
            report.bullets_expired += 1;
        }
    }

    let players = store.entities_by_group(PLAYER_SHIP).to_vec();
    let enemy_bullets = store.entities_by_group(ENEMY_BULLET).to_vec();
    for bullet in enemy_bullets {
        let Some(bullet_box) = flying_bounds(store, bullet) else {
            continue;
        };
        let target = players.iter().copied().find(|&ship| {
            live_bounds(store, ship).is_some_and(|ship_box| bullet_box.intersects(&ship_box))
        });

        if let Some(ship) = target {
            destroy(store, ship);
            disable(store, bullet);
            report.player_hit = true;
        } else if bullet_box.max.y > field.y {
            disable(store, bullet);
            report.bullets_expired += 1;
        }
    }

    let crossed = enemies
        .iter()
        .filter_map(|&ship| live_bounds(store, ship))
        .any(|ship_box| ship_box.min.x < 0.0 || ship_box.max.x > field.x);
    if crossed {
        for &ship in &enemies {
            let Some(entity) = store.get_mut(ship) else {
                continue;
            };
            if let Some(physics) = entity.component_mut::<Physics>() {
                physics.velocity.x = -physics.velocity.x;
            }
            if let Some(transform) = entity.component_mut::<Transform>() {
                transform.position.y += ENEMY_DROP;
            }
        }
        report.formation_turned = true;
    }

    if report.ships_destroyed > 0 || report.player_hit {
        tracing::debug!(
            ships_destroyed = report.ships_destroyed,
            player_hit = report.player_hit,
            "resolved hits"
        );
    }
    report
}

fn live_bounds(store: &EntityStore, id: EntityId) -> Option<Aabb> {
    store
        .get(id)
        .filter(|entity| entity.is_alive())
        .and_then(bounds_of)
}

fn flying_bounds(store: &EntityStore, id: EntityId) -> Option<Aabb> {
    store
        .get(id)
        .filter(|entity| entity.is_alive() && entity.is_active())
        .and_then(bounds_of)
}

fn destroy(store: &mut EntityStore, id: EntityId) {
    if let Some(entity) = store.get_mut(id) {
        entity.destroy();
    }
}

fn disable(store: &mut EntityStore, id: EntityId) {
    if let Some(entity) = store.get_mut(id) {
        entity.disable();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_core::ecs::Group;

    const FIELD: Vec2 = Vec2::new(800.0, 600.0);

    fn spawn(store: &mut EntityStore, group: Group, at: Vec2, half: Vec2) -> EntityId {
        let mut entity = store.create_entity();
        entity.add_component(Transform::at(at));
        entity.add_component(Physics::new(half));
        entity.add_group(group);
        entity.id()
    }

    #[test]
    fn touching_boxes_intersect() {
        let a = Aabb::from_center(Vec2::ZERO, Vec2::ONE);
        let b = Aabb::from_center(Vec2::new(2.0, 0.0), Vec2::ONE);
        let c = Aabb::from_center(Vec2::new(2.5, 0.0), Vec2::ONE);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn player_bullet_destroys_one_ship() {
        let mut store = EntityStore::new();
        let bullet = spawn(&mut store, PLAYER_BULLET, Vec2::new(100.0, 100.0), Vec2::ONE);
        let hit = spawn(&mut store, ENEMY_GROUPS[0], Vec2::new(100.0, 100.0), Vec2::splat(10.0));
        let also_overlapping =
            spawn(&mut store, ENEMY_GROUPS[1], Vec2::new(105.0, 100.0), Vec2::splat(10.0));

        let report = resolve(&mut store, FIELD);
        assert_eq!(report.ships_destroyed, 1);
        assert!(!store.get(hit).expect("destroyed until refresh").is_alive());
        assert!(store.get(also_overlapping).expect("ship").is_alive());
        assert!(!store.get(bullet).expect("bullet").is_active());
    }

    #[test]
    fn parked_bullets_do_not_hit() {
        let mut store = EntityStore::new();
        let bullet = spawn(&mut store, ENEMY_BULLET, Vec2::new(50.0, 50.0), Vec2::ONE);
        store.get_mut(bullet).expect("bullet").disable();
        let player = spawn(&mut store, PLAYER_SHIP, Vec2::new(50.0, 50.0), Vec2::ONE);

        let report = resolve(&mut store, FIELD);
        assert!(!report.player_hit);
        assert!(store.get(player).expect("player").is_alive());
    }

    #[test]
    fn enemy_bullet_destroys_player() {
        let mut store = EntityStore::new();
        let bullet = spawn(&mut store, ENEMY_BULLET, Vec2::new(50.0, 50.0), Vec2::ONE);
        let player = spawn(&mut store, PLAYER_SHIP, Vec2::new(50.0, 51.0), Vec2::ONE);

        let report = resolve(&mut store, FIELD);
        assert!(report.player_hit);
        assert!(!store.get(player).expect("player").is_alive());
        assert!(!store.get(bullet).expect("bullet").is_active());
    }

    #[test]
    fn bullets_leaving_the_field_expire() {
        let mut store = EntityStore::new();
        let up = spawn(&mut store, PLAYER_BULLET, Vec2::new(10.0, -5.0), Vec2::ONE);
        let down = spawn(&mut store, ENEMY_BULLET, Vec2::new(10.0, 605.0), Vec2::ONE);
        let inside = spawn(&mut store, ENEMY_BULLET, Vec2::new(10.0, 300.0), Vec2::ONE);

        let report = resolve(&mut store, FIELD);
        assert_eq!(report.bullets_expired, 2);
        assert!(!store.get(up).expect("bullet").is_active());
        assert!(!store.get(down).expect("bullet").is_active());
        assert!(store.get(inside).expect("bullet").is_active());
    }

    #[test]
    fn formation_turns_and_drops_together() {
        let mut store = EntityStore::new();
        let edge = spawn(&mut store, ENEMY_GROUPS[0], Vec2::new(795.0, 100.0), Vec2::splat(10.0));
        let inner = spawn(&mut store, ENEMY_GROUPS[1], Vec2::new(400.0, 160.0), Vec2::splat(10.0));
        for id in [edge, inner] {
            let ship = store.get_mut(id).expect("ship");
            ship.get_component_mut::<Physics>().velocity = Vec2::new(0.05, 0.0);
        }

        let report = resolve(&mut store, FIELD);
        assert!(report.formation_turned);
        let inner = store.get(inner).expect("ship");
        assert_eq!(inner.get_component::<Physics>().velocity.x, -0.05);
        assert_eq!(inner.get_component::<Transform>().position.y, 160.0 + ENEMY_DROP);
    }

    #[test]
    fn formation_inside_the_field_keeps_course() {
        let mut store = EntityStore::new();
        spawn(&mut store, ENEMY_GROUPS[0], Vec2::new(400.0, 100.0), Vec2::splat(10.0));
        assert!(!resolve(&mut store, FIELD).formation_turned);
    }
}

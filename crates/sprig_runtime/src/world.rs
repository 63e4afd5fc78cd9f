//! Space Invaders world layout
//!
//! Group ids, gameplay constants and the factories that assemble entities
//! from components. Distances are in pixels, times in milliseconds.

use crate::components::{Physics, PlayerController, SpriteRenderer, Transform, WeaponAi};
use crate::render::SharedBatch;
use sprig_core::ecs::{EntityId, EntityMut, EntityStore, Group};
use sprig_core::math::Vec2;
use sprig_core::rng::{fork_rng, GameRng};
use sprig_services::InputState;
use std::cell::Cell;
use std::rc::Rc;

pub const PLAYER_SHIP: Group = Group::new(0);
pub const OFFENSIVE_ENEMY_SHIP: Group = Group::new(1);
pub const PLAYER_BULLET: Group = Group::new(2);
pub const ENEMY_BULLET: Group = Group::new(3);
pub const DEFENSIVE_ENEMY_SHIP: Group = Group::new(4);

pub const ENEMY_GROUPS: [Group; 2] = [OFFENSIVE_ENEMY_SHIP, DEFENSIVE_ENEMY_SHIP];

pub const PLAYER_SIZE: Vec2 = Vec2::new(66.0, 50.0);
pub const PLAYER_SPEED: f32 = 0.6;
pub const PLAYER_FIRE_COOLDOWN: f32 = 1000.0;

pub const ENEMY_SIZE: Vec2 = Vec2::new(69.3, 56.0);
pub const ENEMY_SPEED: f32 = 0.05;
/// Vertical step taken by the whole formation when it turns.
pub const ENEMY_DROP: f32 = 5.0;
pub const ENEMY_COLUMNS: usize = 9;
pub const ENEMY_ROWS: usize = 4;

pub const BULLET_SIZE: Vec2 = Vec2::new(9.0, 37.0);
pub const BULLET_SPEED: f32 = 0.5;
/// Distance from a ship's centre to where its bullets appear.
pub const BULLET_SPAWN_OFFSET: f32 = 45.0;
pub const PLAYER_BULLETS: usize = 6;
pub const ENEMY_BULLETS: usize = 36;

const ENEMY_GAP: f32 = 5.0;
const GRID_MARGIN_X: f32 = 22.0;
const PLAYER_BASELINE: f32 = 60.0;

/// Spawns the entities of one game into a store.
pub struct WorldBuilder {
    field: Vec2,
    batch: SharedBatch,
    controls: Rc<Cell<InputState>>,
    rng: GameRng,
    enemy_bullet_cursor: Rc<Cell<usize>>,
}

impl WorldBuilder {
    pub fn new(
        field: Vec2,
        batch: SharedBatch,
        controls: Rc<Cell<InputState>>,
        rng: GameRng,
    ) -> Self {
        Self {
            field,
            batch,
            controls,
            rng,
            enemy_bullet_cursor: Rc::default(),
        }
    }

    /// Player ship, enemy formation, then both bullet pools.
    pub fn populate(&mut self, store: &mut EntityStore) {
        self.spawn_player(store);
        self.spawn_enemy_grid(store);
        for _ in 0..PLAYER_BULLETS {
            self.spawn_player_bullet(store);
        }
        for _ in 0..ENEMY_BULLETS {
            self.spawn_enemy_bullet(store);
        }
        tracing::info!(entities = store.len(), "populated world");
    }

    pub fn spawn_player(&mut self, store: &mut EntityStore) -> EntityId {
        let position = Vec2::new(self.field.x / 2.0, self.field.y - PLAYER_BASELINE);
        let mut ship = self.body(store, position, PLAYER_SIZE, "playerShip1_blue");
        ship.add_component(PlayerController::new(
            Rc::clone(&self.controls),
            self.field.x,
        ));
        ship.add_group(PLAYER_SHIP);
        ship.id()
    }

    /// A disabled player bullet waiting in the pool.
    pub fn spawn_player_bullet(&mut self, store: &mut EntityStore) -> EntityId {
        self.bullet(store, "laserBlue03", -BULLET_SPEED, PLAYER_BULLET)
    }

    /// A disabled enemy bullet waiting in the pool.
    pub fn spawn_enemy_bullet(&mut self, store: &mut EntityStore) -> EntityId {
        self.bullet(store, "laserRed03", BULLET_SPEED, ENEMY_BULLET)
    }

    pub fn spawn_offensive_ship(&mut self, store: &mut EntityStore, position: Vec2) -> EntityId {
        let weapon = WeaponAi::new(
            fork_rng(&mut self.rng),
            Rc::clone(&self.enemy_bullet_cursor),
        );
        let mut ship = self.enemy(store, position, "enemyRed2");
        ship.add_component(weapon);
        ship.add_group(OFFENSIVE_ENEMY_SHIP);
        ship.id()
    }

    pub fn spawn_defensive_ship(&mut self, store: &mut EntityStore, position: Vec2) -> EntityId {
        let mut ship = self.enemy(store, position, "enemyGreen3");
        ship.add_group(DEFENSIVE_ENEMY_SHIP);
        ship.id()
    }

    /// Column-major grid; even rows shoot, odd rows only absorb hits.
    pub fn spawn_enemy_grid(&mut self, store: &mut EntityStore) {
        for column in 0..ENEMY_COLUMNS {
            for row in 0..ENEMY_ROWS {
                let position = Vec2::new(
                    (column + 1) as f32 * (ENEMY_SIZE.x + ENEMY_GAP) + GRID_MARGIN_X,
                    (row + 1) as f32 * (ENEMY_SIZE.y + ENEMY_GAP),
                );
                if row % 2 == 0 {
                    self.spawn_offensive_ship(store, position);
                } else {
                    self.spawn_defensive_ship(store, position);
                }
            }
        }
    }

    fn enemy<'s>(
        &self,
        store: &'s mut EntityStore,
        position: Vec2,
        texture: &'static str,
    ) -> EntityMut<'s> {
        let mut ship = self.body(store, position, ENEMY_SIZE, texture);
        ship.get_component_mut::<Physics>().velocity = Vec2::new(ENEMY_SPEED, 0.0);
        ship
    }

    fn bullet(
        &self,
        store: &mut EntityStore,
        texture: &'static str,
        speed: f32,
        pool: Group,
    ) -> EntityId {
        let parked = self.field / 2.0;
        let mut bullet = self.body(store, parked, BULLET_SIZE, texture);
        bullet.get_component_mut::<Physics>().velocity = Vec2::new(0.0, speed);
        bullet.disable();
        bullet.add_group(pool);
        bullet.id()
    }

    fn body<'s>(
        &self,
        store: &'s mut EntityStore,
        position: Vec2,
        size: Vec2,
        texture: &'static str,
    ) -> EntityMut<'s> {
        let half_size = size / 2.0;
        let mut entity = store.create_entity();
        entity.add_component(Transform::at(position));
        entity.add_component(Physics::new(half_size));
        entity.add_component(SpriteRenderer::new(
            Rc::clone(&self.batch),
            texture,
            half_size,
        ));
        entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SpriteBatch;
    use sprig_core::rng::seeded_rng;

    fn populated() -> EntityStore {
        let mut store = EntityStore::new();
        WorldBuilder::new(
            Vec2::new(800.0, 600.0),
            SpriteBatch::shared(),
            Rc::default(),
            seeded_rng(1),
        )
        .populate(&mut store);
        store
    }

    #[test]
    fn populate_fills_every_group() {
        let store = populated();
        assert_eq!(store.entities_by_group(PLAYER_SHIP).len(), 1);
        assert_eq!(store.entities_by_group(OFFENSIVE_ENEMY_SHIP).len(), 18);
        assert_eq!(store.entities_by_group(DEFENSIVE_ENEMY_SHIP).len(), 18);
        assert_eq!(store.entities_by_group(PLAYER_BULLET).len(), PLAYER_BULLETS);
        assert_eq!(store.entities_by_group(ENEMY_BULLET).len(), ENEMY_BULLETS);
        assert_eq!(store.len(), 1 + 36 + PLAYER_BULLETS + ENEMY_BULLETS);
    }

    #[test]
    fn bullets_start_disabled_and_ships_active() {
        let store = populated();
        for &id in store.entities_by_group(PLAYER_BULLET) {
            assert!(!store.get(id).expect("bullet").is_active());
        }
        for &id in store.entities_by_group(ENEMY_BULLET) {
            assert!(!store.get(id).expect("bullet").is_active());
        }
        assert!(store.iter().filter(|(_, e)| e.is_active()).count() == 37);
    }

    #[test]
    fn only_offensive_ships_carry_weapons() {
        let store = populated();
        for &id in store.entities_by_group(OFFENSIVE_ENEMY_SHIP) {
            assert!(store.get(id).expect("ship").has_component::<WeaponAi>());
        }
        for &id in store.entities_by_group(DEFENSIVE_ENEMY_SHIP) {
            assert!(!store.get(id).expect("ship").has_component::<WeaponAi>());
        }
    }

    #[test]
    fn grid_and_player_positions() {
        let store = populated();
        let position = |id: EntityId| {
            store
                .get(id)
                .expect("entity")
                .get_component::<Transform>()
                .position
        };

        let player = store.entities_by_group(PLAYER_SHIP)[0];
        assert_eq!(position(player), Vec2::new(400.0, 540.0));

        // Column-major: the first two ships are rows 0 and 1 of column 0.
        let top_left = store.entities_by_group(OFFENSIVE_ENEMY_SHIP)[0];
        let below = store.entities_by_group(DEFENSIVE_ENEMY_SHIP)[0];
        assert_eq!(position(top_left).y, ENEMY_SIZE.y + ENEMY_GAP);
        assert_eq!(position(below).y, 2.0 * (ENEMY_SIZE.y + ENEMY_GAP));
        assert_eq!(position(top_left).x, position(below).x);
    }
}

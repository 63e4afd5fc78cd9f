// components.rs - Gameplay components for the Space Invaders host
//
// Every visible entity is Transform + Physics + SpriteRenderer, attached in
// that order so the renderer copies the position after physics moved it.
// Controllers come last and read the siblings through the hook context.

use crate::collision::Aabb;
use crate::render::{SharedBatch, Sprite};
use crate::world::{
    BULLET_SPAWN_OFFSET, ENEMY_BULLET, PLAYER_BULLET, PLAYER_FIRE_COOLDOWN, PLAYER_SPEED,
};
use rand::Rng;
use sprig_core::ecs::{Component, Context, EntityId, EntityStore, Group};
use sprig_core::math::Vec2;
use sprig_core::rng::GameRng;
use sprig_services::InputState;
use std::cell::Cell;
use std::rc::Rc;

/// World-space position (sprite centre).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transform {
    pub position: Vec2,
}

impl Transform {
    pub fn at(position: Vec2) -> Self {
        Self { position }
    }
}

impl Component for Transform {}

/// Velocity and box extents. Moves the sibling [`Transform`] every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Physics {
    pub velocity: Vec2,
    pub half_size: Vec2,
}

impl Physics {
    pub fn new(half_size: Vec2) -> Self {
        Self {
            velocity: Vec2::ZERO,
            half_size,
        }
    }

    pub fn bounds(&self, position: Vec2) -> Aabb {
        Aabb::from_center(position, self.half_size)
    }
}

impl Component for Physics {
    fn init(&mut self, ctx: &mut Context<'_>) {
        assert!(ctx.has::<Transform>(), "Physics requires a Transform");
    }

    fn update(&mut self, ctx: &mut Context<'_>, dt: f32) {
        ctx.get_mut::<Transform>().position += self.velocity * dt;
    }
}

/// Emits one sprite per draw at the position seen during the last update.
pub struct SpriteRenderer {
    batch: SharedBatch,
    texture: &'static str,
    size: Vec2,
    position: Vec2,
}

impl SpriteRenderer {
    pub fn new(batch: SharedBatch, texture: &'static str, half_size: Vec2) -> Self {
        Self {
            batch,
            texture,
            size: half_size * 2.0,
            position: Vec2::ZERO,
        }
    }
}

impl Component for SpriteRenderer {
    fn init(&mut self, ctx: &mut Context<'_>) {
        self.position = ctx.get::<Transform>().position;
    }

    fn update(&mut self, ctx: &mut Context<'_>, _dt: f32) {
        self.position = ctx.get::<Transform>().position;
    }

    fn draw(&mut self, _ctx: &mut Context<'_>) {
        self.batch.borrow_mut().push(Sprite {
            texture: self.texture,
            position: self.position,
            size: self.size,
        });
    }
}

/// Steers the player ship from polled input and fires pooled bullets.
pub struct PlayerController {
    controls: Rc<Cell<InputState>>,
    field_width: f32,
    since_last_shot: f32,
    next_bullet: usize,
}

impl PlayerController {
    pub fn new(controls: Rc<Cell<InputState>>, field_width: f32) -> Self {
        Self {
            controls,
            field_width,
            // Ready to fire on the first tick.
            since_last_shot: PLAYER_FIRE_COOLDOWN + 1.0,
            next_bullet: 0,
        }
    }
}

impl Component for PlayerController {
    fn init(&mut self, ctx: &mut Context<'_>) {
        assert!(
            ctx.has::<Transform>() && ctx.has::<Physics>(),
            "PlayerController requires Transform and Physics"
        );
    }

    fn update(&mut self, ctx: &mut Context<'_>, dt: f32) {
        let input = self.controls.get();
        let position = ctx.get::<Transform>().position;
        let physics = ctx.get_mut::<Physics>();
        let bounds = physics.bounds(position);

        physics.velocity.x = if input.move_x < 0.0 && bounds.min.x > 0.0 {
            -PLAYER_SPEED
        } else if input.move_x > 0.0 && bounds.max.x < self.field_width {
            PLAYER_SPEED
        } else {
            0.0
        };

        self.since_last_shot += dt;
        if input.fire && self.since_last_shot > PLAYER_FIRE_COOLDOWN {
            let muzzle = position - Vec2::new(0.0, BULLET_SPAWN_OFFSET);
            launch_bullet(ctx.store_mut(), PLAYER_BULLET, &mut self.next_bullet, muzzle);
            self.since_last_shot = 0.0;
        }
    }
}

/// Fires enemy bullets after random 1 to 15 second pauses.
pub struct WeaponAi {
    rng: GameRng,
    /// Bullet pool cursor shared by every enemy weapon.
    next_bullet: Rc<Cell<usize>>,
    elapsed: f32,
    next_fire: f32,
}

impl WeaponAi {
    pub fn new(rng: GameRng, next_bullet: Rc<Cell<usize>>) -> Self {
        Self {
            rng,
            next_bullet,
            elapsed: 0.0,
            next_fire: 0.0,
        }
    }

    /// Milliseconds between the previous shot and the next one.
    pub fn next_fire(&self) -> f32 {
        self.next_fire
    }

    fn schedule(&mut self) {
        self.next_fire = self.rng.gen_range(1..=15u32) as f32 * 1000.0;
    }
}

impl Component for WeaponAi {
    fn init(&mut self, ctx: &mut Context<'_>) {
        assert!(ctx.has::<Transform>(), "WeaponAi requires a Transform");
        self.schedule();
    }

    fn update(&mut self, ctx: &mut Context<'_>, dt: f32) {
        self.elapsed += dt;
        if self.elapsed <= self.next_fire {
            return;
        }

        let muzzle = ctx.get::<Transform>().position + Vec2::new(0.0, BULLET_SPAWN_OFFSET);
        let mut cursor = self.next_bullet.get();
        launch_bullet(ctx.store_mut(), ENEMY_BULLET, &mut cursor, muzzle);
        self.next_bullet.set(cursor);

        self.schedule();
        self.elapsed = 0.0;
    }
}

/// Move the next bullet of `pool` to `at` and enable it.
///
/// Bullets are recycled round-robin, so a bullet still in flight is pulled
/// back when the pool wraps.
pub fn launch_bullet(
    store: &mut EntityStore,
    pool: Group,
    cursor: &mut usize,
    at: Vec2,
) -> Option<EntityId> {
    let bullets = store.entities_by_group(pool);
    if bullets.is_empty() {
        return None;
    }
    if *cursor >= bullets.len() {
        *cursor = 0;
    }
    let id = bullets[*cursor];
    *cursor += 1;

    let bullet = store.get_mut(id)?;
    bullet.get_component_mut::<Transform>().position = at;
    bullet.enable();
    tracing::trace!(bullet = %id, %pool, "launched bullet");
    Some(id)
}

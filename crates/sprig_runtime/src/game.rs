//! Frame loop
//!
//! Each frame runs three phases: input (poll once), update (fixed-step
//! ticks of refresh, component update and collision pass) and draw.

use crate::collision;
use crate::render::{SharedBatch, SpriteBatch};
use crate::world::{WorldBuilder, ENEMY_GROUPS, PLAYER_SHIP};
use sprig_core::ecs::EntityStore;
use sprig_core::math::Vec2;
use sprig_core::rng::seeded_rng;
use sprig_core::time::FixedTimestep;
use sprig_services::{InputSource, InputState, Settings};
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every enemy ship was destroyed.
    Victory,
    /// The player ship was destroyed.
    Defeat,
    Quit,
    /// `max_frames` reached.
    FrameLimit,
}

pub struct Game {
    store: EntityStore,
    clock: FixedTimestep,
    input: Box<dyn InputSource>,
    controls: Rc<Cell<InputState>>,
    batch: SharedBatch,
    field: Vec2,
    frame_budget: Duration,
    max_frames: Option<u64>,
    running: bool,
    outcome: Option<Outcome>,
    frames: u64,
    ships_destroyed: u32,
}

impl Game {
    pub fn new(settings: &Settings, input: Box<dyn InputSource>) -> Self {
        let field = Vec2::new(settings.window.width, settings.window.height);
        let batch = SpriteBatch::shared();
        let controls = Rc::new(Cell::new(InputState::IDLE));

        let mut store = EntityStore::new();
        WorldBuilder::new(
            field,
            Rc::clone(&batch),
            Rc::clone(&controls),
            seeded_rng(settings.simulation.seed),
        )
        .populate(&mut store);

        Self {
            store,
            clock: settings.simulation.clock(),
            input,
            controls,
            batch,
            field,
            frame_budget: Duration::from_secs_f32(settings.simulation.frame_budget_ms() / 1000.0),
            max_frames: settings.simulation.max_frames,
            running: true,
            outcome: None,
            frames: 0,
            ships_destroyed: 0,
        }
    }

    /// Run frames until the game ends, throttled to the frame limit.
    ///
    /// The first frame sees zero elapsed time; later frames are fed the
    /// measured duration of the one before.
    pub fn run(&mut self) -> Outcome {
        let mut last_frame_ms = 0.0;
        while self.is_running() {
            if self.max_frames.is_some_and(|max| self.frames >= max) {
                self.finish(Outcome::FrameLimit);
                break;
            }

            let started = Instant::now();
            self.frame(last_frame_ms);
            if let Some(rest) = self.frame_budget.checked_sub(started.elapsed()) {
                std::thread::sleep(rest);
            }
            last_frame_ms = started.elapsed().as_secs_f32() * 1000.0;
        }

        let outcome = self.outcome.unwrap_or(Outcome::Quit);
        tracing::info!(
            ?outcome,
            frames = self.frames,
            ticks = self.clock.tick_count(),
            ships_destroyed = self.ships_destroyed,
            "game over"
        );
        outcome
    }

    /// One frame with `frame_time_ms` of elapsed time.
    pub fn frame(&mut self, frame_time_ms: f32) {
        self.input_phase();
        self.update_phase(frame_time_ms);
        self.draw_phase();
        self.frames += 1;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn ships_destroyed(&self) -> u32 {
        self.ships_destroyed
    }

    fn input_phase(&mut self) {
        let input = self.input.poll();
        self.controls.set(input);
        if input.quit {
            self.finish(Outcome::Quit);
        }
    }

    fn update_phase(&mut self, frame_time_ms: f32) {
        self.clock.accumulate(frame_time_ms);
        while self.clock.next_tick() {
            self.store.refresh();
            if let Some(outcome) = self.decided() {
                self.finish(outcome);
                break;
            }

            self.store.update(self.clock.step());
            let report = collision::resolve(&mut self.store, self.field);
            self.ships_destroyed += report.ships_destroyed;
            if report.player_hit {
                tracing::debug!(tick = self.clock.tick_count(), "player ship hit");
            }
        }
    }

    fn draw_phase(&mut self) {
        self.batch.borrow_mut().clear();
        self.store.draw();
        self.batch.borrow_mut().present();
    }

    fn decided(&self) -> Option<Outcome> {
        if self.store.entities_by_group(PLAYER_SHIP).is_empty() {
            Some(Outcome::Defeat)
        } else if ENEMY_GROUPS
            .iter()
            .all(|&group| self.store.entities_by_group(group).is_empty())
        {
            Some(Outcome::Victory)
        } else {
            None
        }
    }

    /// Stop the loop. The first reason recorded wins.
    fn finish(&mut self, outcome: Outcome) {
        if self.outcome.is_none() {
            tracing::info!(?outcome, frame = self.frames, "stopping");
            self.outcome = Some(outcome);
        }
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Physics, Transform, WeaponAi};
    use crate::world::{
        DEFENSIVE_ENEMY_SHIP, ENEMY_BULLET, OFFENSIVE_ENEMY_SHIP, PLAYER_BULLET,
    };
    use sprig_core::ecs::{EntityId, Group};
    use sprig_services::ScriptedInput;

    fn game_with(input: InputState) -> Game {
        Game::new(
            &Settings::default(),
            Box::new(ScriptedInput::new(vec![(1, input)])),
        )
    }

    fn first(game: &Game, group: Group) -> EntityId {
        game.store.entities_by_group(group)[0]
    }

    fn position(game: &Game, id: EntityId) -> Vec2 {
        game.store
            .get(id)
            .expect("entity is alive")
            .get_component::<Transform>()
            .position
    }

    fn launch(game: &mut Game, bullet: EntityId, at: Vec2) {
        let entity = game.store.get_mut(bullet).expect("bullet is alive");
        entity.get_component_mut::<Transform>().position = at;
        entity.enable();
    }

    #[test]
    fn zero_time_frame_only_draws() {
        let mut game = game_with(InputState::IDLE);
        game.frame(0.0);

        assert_eq!(game.clock.tick_count(), 0);
        let batch = game.batch.borrow();
        assert_eq!(batch.len(), 37);
        assert_eq!(batch.frames_presented(), 1);
    }

    #[test]
    fn holding_fire_launches_a_bullet_on_the_first_tick() {
        let mut game = game_with(InputState::IDLE.firing());
        game.frame(1.0);

        let active: Vec<_> = game
            .store
            .entities_by_group(PLAYER_BULLET)
            .iter()
            .copied()
            .filter(|&id| game.store.get(id).is_some_and(|bullet| bullet.is_active()))
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(position(&game, active[0]), Vec2::new(400.0, 494.5));
        assert_eq!(game.batch.borrow().len(), 38);
    }

    #[test]
    fn player_bullet_destroys_enemy_and_refresh_removes_it() {
        let mut game = game_with(InputState::IDLE);
        let ship = first(&game, OFFENSIVE_ENEMY_SHIP);
        let bullet = first(&game, PLAYER_BULLET);
        let at = position(&game, ship);
        launch(&mut game, bullet, at);

        game.frame(1.0);
        assert!(!game.store.get(ship).expect("reclaimed at refresh").is_alive());
        assert!(!game.store.get(bullet).expect("bullet").is_active());
        assert_eq!(game.ships_destroyed(), 1);

        game.frame(1.0);
        assert!(game.store.get(ship).is_none());
        assert_eq!(game.store.entities_by_group(OFFENSIVE_ENEMY_SHIP).len(), 17);
        assert!(game.is_running());
    }

    #[test]
    fn losing_the_player_is_defeat_at_the_next_refresh() {
        let mut game = game_with(InputState::IDLE);
        let player = first(&game, PLAYER_SHIP);
        let bullet = first(&game, ENEMY_BULLET);
        let at = position(&game, player);
        launch(&mut game, bullet, at);

        game.frame(1.0);
        assert!(game.is_running());

        game.frame(1.0);
        assert!(!game.is_running());
        assert_eq!(game.outcome, Some(Outcome::Defeat));
    }

    #[test]
    fn clearing_every_enemy_is_victory() {
        let mut game = game_with(InputState::IDLE);
        for group in ENEMY_GROUPS {
            for id in game.store.entities_by_group(group).to_vec() {
                game.store.get_mut(id).expect("ship").destroy();
            }
        }

        game.frame(1.0);
        assert!(!game.is_running());
        assert_eq!(game.outcome, Some(Outcome::Victory));
    }

    #[test]
    fn formation_turns_at_the_right_border() {
        let mut game = game_with(InputState::IDLE);
        let edge = first(&game, OFFENSIVE_ENEMY_SHIP);
        let other = first(&game, DEFENSIVE_ENEMY_SHIP);
        let other_y = position(&game, other).y;

        let entity = game.store.get_mut(edge).expect("ship");
        let half_width = entity.get_component::<Physics>().half_size.x;
        entity.get_component_mut::<Transform>().position.x = 800.0 - half_width;

        game.frame(1.0);
        let other = game.store.get(other).expect("ship");
        assert!(other.get_component::<Physics>().velocity.x < 0.0);
        assert_eq!(other.get_component::<Transform>().position.y, other_y + 5.0);
    }

    #[test]
    fn tiny_slice_frame_ends_at_the_tick_cap() {
        let mut settings = Settings::default();
        settings.simulation.step = 1e-6;
        settings.simulation.slice = 1e-6;
        settings.simulation.max_ticks_per_frame = 50;
        let mut game = Game::new(&settings, Box::new(ScriptedInput::new(Vec::new())));

        game.frame(50.0);
        assert_eq!(game.clock.tick_count(), 50);
        assert_eq!(game.clock.accumulated(), 0.0);
        assert!(game.is_running());
    }

    #[test]
    fn quit_input_stops_run_after_one_frame() {
        let mut game = game_with(InputState {
            quit: true,
            ..InputState::IDLE
        });
        assert_eq!(game.run(), Outcome::Quit);
        assert_eq!(game.frames(), 1);
    }

    #[test]
    fn max_frames_caps_a_headless_run() {
        let mut settings = Settings::default();
        settings.simulation.max_frames = Some(3);
        let mut game = Game::new(&settings, Box::new(ScriptedInput::new(Vec::new())));

        assert_eq!(game.run(), Outcome::FrameLimit);
        assert_eq!(game.frames(), 3);
    }

    #[test]
    fn same_seed_schedules_the_same_volleys() {
        let schedule = |seed: u64| {
            let mut settings = Settings::default();
            settings.simulation.seed = seed;
            let game = Game::new(&settings, Box::new(ScriptedInput::new(Vec::new())));
            game.store
                .entities_by_group(OFFENSIVE_ENEMY_SHIP)
                .iter()
                .map(|&id| {
                    game.store
                        .get(id)
                        .expect("ship")
                        .get_component::<WeaponAi>()
                        .next_fire()
                })
                .collect::<Vec<_>>()
        };

        assert_eq!(schedule(42), schedule(42));
        assert_ne!(schedule(42), schedule(43));
    }
}

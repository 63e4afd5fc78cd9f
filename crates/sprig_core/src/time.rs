//! Fixed-step simulation clock
//!
//! Wall-clock frame time accumulates into a slice counter; the simulation
//! advances once per whole slice, so a rendered frame may run zero, one or
//! several ticks. `step` is the `dt` handed to each tick and `slice` is how
//! much accumulated time one tick consumes. Both are in the host's chosen
//! unit (milliseconds for the bundled runtime).

/// Default per-tick `dt`, in milliseconds.
pub const DEFAULT_STEP: f32 = 1.0;
/// Default accumulated time consumed per tick, in milliseconds.
pub const DEFAULT_SLICE: f32 = 1.0;
/// Default cap on ticks run for one accumulated frame.
pub const DEFAULT_MAX_TICKS_PER_FRAME: u32 = 1000;

/// Fixed-step accumulator.
///
/// ```ignore
/// clock.accumulate(frame_time_ms);
/// while clock.next_tick() {
///     store.refresh();
///     store.update(clock.step());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    slice: f32,
    accumulated: f32,
    tick_count: u64,
    max_ticks_per_frame: u32,
    frame_ticks: u32,
}

impl FixedTimestep {
    /// # Panics
    /// Panics if `slice` is not strictly positive.
    pub fn new(step: f32, slice: f32) -> Self {
        assert!(slice > 0.0, "time slice must be positive, got {slice}");
        Self {
            step,
            slice,
            accumulated: 0.0,
            tick_count: 0,
            max_ticks_per_frame: DEFAULT_MAX_TICKS_PER_FRAME,
            frame_ticks: 0,
        }
    }

    /// Limit the ticks drained after one `accumulate`. At least one tick is
    /// always allowed.
    pub fn with_max_ticks_per_frame(mut self, max_ticks: u32) -> Self {
        self.max_ticks_per_frame = max_ticks.max(1);
        self
    }

    /// Add one frame's elapsed time.
    pub fn accumulate(&mut self, frame_time: f32) {
        self.accumulated += frame_time.max(0.0);
        self.frame_ticks = 0;
    }

    /// Consume one slice if enough time has accumulated.
    ///
    /// Returns `true` when the caller should run one simulation tick. Once
    /// the per-frame cap is reached the remaining backlog is dropped, which
    /// also ends the drain when `slice` is below the accumulator's precision.
    pub fn next_tick(&mut self) -> bool {
        if self.accumulated < self.slice {
            return false;
        }
        if self.frame_ticks >= self.max_ticks_per_frame {
            tracing::warn!(
                backlog = self.accumulated,
                ticks = self.frame_ticks,
                "simulation fell behind, dropping backlog"
            );
            self.accumulated = 0.0;
            return false;
        }

        self.accumulated -= self.slice;
        self.frame_ticks += 1;
        self.tick_count += 1;
        true
    }

    /// `dt` to pass to each tick.
    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn slice(&self) -> f32 {
        self.slice
    }

    /// Time carried over to the next frame.
    pub fn accumulated(&self) -> f32 {
        self.accumulated
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn max_ticks_per_frame(&self) -> u32 {
        self.max_ticks_per_frame
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(DEFAULT_STEP, DEFAULT_SLICE)
    }
}

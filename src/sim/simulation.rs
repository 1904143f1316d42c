//! Simulation aggregate
//!
//! Owns the configuration, the wall seed and the anchor history of one bird.
//! `add_jump` is the only operation that mutates anything; every query is a
//! pure function of the current history and returns copies.

use super::anchors::AnchorStore;
use super::collision;
use super::error::SimError;
use super::projection;
use super::state::{BirdState, Wall};
use super::walls::{self, Walls};
use crate::config::SimConfig;

/// Most whole-frame samples `collision_path` emits before the crash state
pub const MAX_PATH_FRAMES: usize = 1024;

#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    seed: i64,
    anchors: AnchorStore,
}

impl Simulation {
    /// Create an uninitialized simulation. Call `init` before querying the bird.
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            seed: 0,
            anchors: AnchorStore::new(),
        }
    }

    /// Create and initialize in one step
    pub fn started(config: SimConfig, seed: i64) -> Self {
        let mut sim = Self::new(config);
        sim.init(seed);
        sim
    }

    /// Rebuild a simulation from its seed and jump frames
    ///
    /// Yields the same history on every peer that replays the same input.
    pub fn replay(config: SimConfig, seed: i64, jumps: &[f64]) -> Result<Self, SimError> {
        let mut sim = Self::started(config, seed);
        for &time in jumps {
            sim.add_jump(time)?;
        }
        Ok(sim)
    }

    /// Reset history to the spawn state and adopt `seed` for wall placement
    pub fn init(&mut self, seed: i64) -> BirdState {
        self.seed = seed;
        let initial = BirdState::initial(&self.config);
        self.anchors.reset(initial);
        log::info!(
            "Simulation initialized with seed {} at ({}, {})",
            seed,
            initial.x,
            initial.y
        );
        initial
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }

    pub fn is_initialized(&self) -> bool {
        !self.anchors.is_empty()
    }

    /// Insert a jump at whole frame `time`
    ///
    /// The bird is projected to `time` and its vertical speed is replaced by
    /// `jump_speed`, so chained jumps never accumulate speed.
    pub fn add_jump(&mut self, time: f64) -> Result<BirdState, SimError> {
        if !time.is_finite() || time.fract() != 0.0 {
            return Err(SimError::NonIntegerTime { time });
        }
        let last = self.anchors.last().ok_or(SimError::Uninitialized)?;
        if time <= last.time {
            return Err(SimError::NonMonotonicJump {
                time,
                last: last.time,
            });
        }

        let mut jumped = projection::project(&self.config, &last, time)?;
        jumped.vspeed = self.config.jump_speed;
        self.anchors.push(jumped);
        log::debug!(
            "Jump at frame {}: y={:.3} valid={}",
            time,
            jumped.y,
            jumped.valid
        );
        Ok(jumped)
    }

    /// Project `previous` to `time` with this simulation's physics
    ///
    /// Works on any snapshot, including a remote player's, without touching
    /// this simulation's history.
    pub fn calc_state(&self, previous: &BirdState, time: f64) -> Result<BirdState, SimError> {
        projection::project(&self.config, previous, time)
    }

    /// Anchor in effect at time `t`
    pub fn find_anchor_for(&self, t: f64) -> Result<BirdState, SimError> {
        self.anchors.find_anchor_for(t)
    }

    /// State of the bird at any time covered by the history, past or future
    pub fn position_at(&self, t: f64) -> Result<BirdState, SimError> {
        let anchor = self.anchors.find_anchor_for(t)?;
        projection::project(&self.config, &anchor, t)
    }

    /// Most recent anchor
    pub fn last_state(&self) -> Result<BirdState, SimError> {
        self.anchors.last().ok_or(SimError::Uninitialized)
    }

    /// Snapshot of the full history, initial state first
    pub fn anchors(&self) -> &[BirdState] {
        self.anchors.as_slice()
    }

    /// Frames at which jumps were inserted
    pub fn jump_times(&self) -> impl Iterator<Item = f64> + '_ {
        self.anchors.as_slice().iter().skip(1).map(|a| a.time)
    }

    /// Earliest time the bird launched from `from` leaves the band
    pub fn next_bird_collision(&self, from: &BirdState) -> f64 {
        collision::next_bird_collision(&self.config, from)
    }

    /// Whether the bird launched from `last` is still flying at `current_time`
    pub fn validate_jump(&self, last: &BirdState, current_time: f64) -> Result<bool, SimError> {
        collision::validate_jump(&self.config, last, current_time)
    }

    /// Predicted path from the last anchor to the crash
    ///
    /// One state per whole frame before the collision, at most
    /// `MAX_PATH_FRAMES` of them, then the state at the collision itself.
    pub fn collision_path(&self) -> Result<Vec<BirdState>, SimError> {
        let last = self.last_state()?;
        let collision_time = self.next_bird_collision(&last);
        if !collision_time.is_finite() {
            return Ok(vec![last]);
        }

        let mut path = Vec::new();
        let mut t = last.time;
        while t < collision_time && path.len() < MAX_PATH_FRAMES {
            path.push(self.position_at(t)?);
            t += 1.0;
        }
        path.push(self.position_at(collision_time)?);
        Ok(path)
    }

    /// Wall number `index`
    pub fn wall_at(&self, index: i64) -> Wall {
        walls::wall_at(&self.config, self.seed, index)
    }

    /// Walls whose left edge lies in `[x_min, x_max]`
    pub fn walls_between(&self, x_min: f64, x_max: f64) -> Walls {
        walls::walls_between(&self.config, self.seed, x_min, x_max)
    }
}

//! Trajectory and world value types
//!
//! Everything here is plain data. States are copied out of the simulation,
//! never borrowed from its history.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

/// Kinematic state of a bird at one instant
///
/// Anchors (initial state and jumps) have whole-frame `time`; projected
/// states may be fractional. Once `valid` is false the state is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BirdState {
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
    /// Vertical velocity (units/frame)
    pub vspeed: f64,
    /// Frame number
    pub time: f64,
    /// Still inside the band
    pub valid: bool,
}

impl BirdState {
    /// Resting state at frame 0
    pub fn spawn(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            vspeed: 0.0,
            time: 0.0,
            valid: true,
        }
    }

    /// Initial anchor for a configuration
    pub fn initial(config: &SimConfig) -> Self {
        Self::spawn(config.start_x, config.start_y)
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Approximate equality for tests and cross-peer checks
    pub fn approx_eq(&self, other: &BirdState, eps: f64) -> bool {
        self.valid == other.valid
            && (self.time - other.time).abs() <= eps
            && (self.x - other.x).abs() <= eps
            && (self.y - other.y).abs() <= eps
            && (self.vspeed - other.vspeed).abs() <= eps
    }
}

/// A wall with a vertical opening centred at `y`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub index: i64,
    pub y: f64,
}

impl Wall {
    /// Left edge of the wall
    #[inline]
    pub fn x(&self, config: &SimConfig) -> f64 {
        self.index as f64 * config.wall_pitch()
    }

    /// Upper edge of the opening
    #[inline]
    pub fn gap_top(&self, config: &SimConfig) -> f64 {
        self.y + config.wall_gap / 2.0
    }

    /// Lower edge of the opening
    #[inline]
    pub fn gap_bottom(&self, config: &SimConfig) -> f64 {
        self.y - config.wall_gap / 2.0
    }

    /// Left edge at the height of the opening's centre
    pub fn gap_center(&self, config: &SimConfig) -> DVec2 {
        DVec2::new(self.x(config), self.y)
    }
}

//! MMOpy - flight physics for a multiplayer jump-and-dodge arcade game
//!
//! Core modules:
//! - `sim`: Deterministic trajectory reconstruction and wall generation
//! - `config`: Session constants (speeds, gravity, vertical band, walls)
//! - `session`: Per-game context driven once per rendered frame
//! - `wasm`: Browser bindings for the JS client

pub mod config;
pub mod session;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use config::{ConfigError, SimConfig, WallNoise};
pub use session::{FrameReport, Phase, RemoteView, Session};
pub use sim::{BirdState, SimError, Simulation, Wall};

/// Default tuning constants
pub mod consts {
    /// Horizontal speed (units/frame)
    pub const HSPEED: f64 = 10.0;
    /// Vertical speed set by a jump (units/frame)
    pub const JUMP_SPEED: f64 = 8.0;
    /// Vertical acceleration (units/frame², negative = down)
    pub const GRAVITY: f64 = -0.5;

    /// Vertical band the bird must stay strictly inside
    pub const CEILING: f64 = 200.0;
    pub const FLOOR: f64 = -220.0;

    /// Wall defaults
    pub const WALL_WIDTH: f64 = 20.0;
    /// Vertical size of the opening in each wall
    pub const WALL_GAP: f64 = 150.0;

    /// Spawn point
    pub const START_X: f64 = 0.0;
    pub const START_Y: f64 = 100.0;
}

//! Deterministic trajectory module
//!
//! Everything a peer needs to agree on a bird's flight and the world lives
//! here. This module must stay pure and deterministic:
//! - Closed-form kinematics only, no frame-by-frame integration
//! - Walls are a function of `(seed, index)`, never of generation order
//! - No rendering, networking or clock dependencies

pub mod anchors;
pub mod collision;
pub mod error;
pub mod projection;
pub mod simulation;
pub mod state;
pub mod walls;

pub use anchors::AnchorStore;
pub use collision::{next_bird_collision, validate_jump};
pub use error::SimError;
pub use projection::project;
pub use simulation::{MAX_PATH_FRAMES, Simulation};
pub use state::{BirdState, Wall};
pub use walls::{FIRST_WALL_INDEX, Walls, pcg_noise, sine_noise, wall_at, walls_between};

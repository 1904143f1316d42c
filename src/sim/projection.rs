//! Analytic state projection
//!
//! Between two anchors the bird moves under constant acceleration, so any
//! later state follows in closed form from the anchor alone:
//!
//! ```text
//! v(t) = v0 + g·dt
//! y(t) = y0 + v0·dt + ½·g·dt²
//! x(t) = x0 + hspeed·dt
//! ```

use super::error::SimError;
use super::state::BirdState;
use crate::config::SimConfig;

/// Advance `anchor` to time `t`
///
/// Fails with `InvalidTime` when `t` precedes the anchor. An invalid anchor is
/// returned unchanged: a crashed bird stays where it crashed.
pub fn project(config: &SimConfig, anchor: &BirdState, t: f64) -> Result<BirdState, SimError> {
    if t < anchor.time {
        return Err(SimError::InvalidTime {
            time: t,
            anchor: anchor.time,
        });
    }
    if !anchor.valid {
        return Ok(*anchor);
    }

    let dt = t - anchor.time;
    let y = anchor.y + anchor.vspeed * dt + 0.5 * config.gravity * dt * dt;
    Ok(BirdState {
        x: anchor.x + config.hspeed * dt,
        y,
        vspeed: anchor.vspeed + config.gravity * dt,
        time: t,
        valid: config.contains_y(y),
    })
}

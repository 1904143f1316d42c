//! Boundary crossing prediction
//!
//! From any valid state the vertical path is a parabola, so it is monotone on
//! either side of its vertex. The oracle checks the vertex against `project`
//! (a graze of the ceiling counts), then bisects on `project(..).valid` inside
//! the first monotone piece that leaves the band. The analytic root of
//! `½g·dt² + v0·dt + (y0 - bound) = 0` only seeds the bracket on the last
//! piece, so the answer always agrees with `project` to float resolution.

use super::error::SimError;
use super::projection::project;
use super::state::BirdState;
use crate::config::SimConfig;

/// Each step halves the bracket; enough to reach adjacent floats
const MAX_BISECT_STEPS: u32 = 256;
/// Doublings allowed when the analytic root lands a hair inside the band
const MAX_EXPAND_STEPS: u32 = 64;

/// Earliest time at which projecting `from` yields an invalid state
///
/// Returns `from.time` if `from` is already invalid or out of the band, and
/// `f64::INFINITY` if the bird never leaves the band (only possible without
/// downward gravity). A finite result is always a time at which `project`
/// reports the bird out.
pub fn next_bird_collision(config: &SimConfig, from: &BirdState) -> f64 {
    if !from.valid || !config.contains_y(from.y) {
        return from.time;
    }
    let is_out = |t: f64| project(config, from, t).map_or(true, |s| !s.valid);

    let a = 0.5 * config.gravity;
    let b = from.vspeed;

    // Rising piece up to the vertex, if it lies ahead
    let mut start = 0.0;
    if a != 0.0 {
        let vertex = -b / (2.0 * a);
        if vertex > 0.0 {
            let vertex_time = from.time + vertex;
            if is_out(vertex_time) {
                return bisect(&is_out, from.time, vertex_time);
            }
            start = vertex;
        }
    }

    // Past the vertex the bird heads for exactly one bound
    let slope = b + 2.0 * a * start;
    if slope == 0.0 && a == 0.0 {
        return f64::INFINITY;
    }
    let heading_up = slope > 0.0 || (slope == 0.0 && a > 0.0);
    let bound = if heading_up { config.ceiling } else { config.floor };
    let Some(dt) = earliest_root(a, b, from.y - bound) else {
        return f64::INFINITY;
    };

    let inside = from.time + start;
    let mut outside = (from.time + dt).max(inside);
    let mut step = (outside - inside).max(1.0);
    let mut expansions = 0;
    while !is_out(outside) {
        if expansions == MAX_EXPAND_STEPS {
            return f64::INFINITY;
        }
        outside += step;
        step *= 2.0;
        expansions += 1;
    }
    bisect(&is_out, inside, outside)
}

/// True iff the bird launched from `last` is still flying at `current_time`
pub fn validate_jump(
    config: &SimConfig,
    last: &BirdState,
    current_time: f64,
) -> Result<bool, SimError> {
    Ok(project(config, last, current_time)?.valid)
}

/// Smallest non-negative root of `a·t² + b·t + c`
fn earliest_root(a: f64, b: f64, c: f64) -> Option<f64> {
    if a == 0.0 {
        if b == 0.0 {
            return None;
        }
        let t = -c / b;
        return (t >= 0.0).then_some(t);
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    // Cancellation-free form: roots are q/a and c/q
    let q = -0.5 * (b + b.signum() * discriminant.sqrt());
    let mut best: Option<f64> = None;
    for root in [q / a, if q != 0.0 { c / q } else { f64::NAN }] {
        if root >= 0.0 {
            best = Some(best.map_or(root, |t: f64| t.min(root)));
        }
    }
    best
}

/// First out-of-band time in `(inside, outside]` on a monotone piece
///
/// `inside` must be valid and `outside` invalid; `outside` stays invalid.
fn bisect(is_out: &impl Fn(f64) -> bool, mut inside: f64, mut outside: f64) -> f64 {
    for _ in 0..MAX_BISECT_STEPS {
        let mid = inside + (outside - inside) * 0.5;
        if mid <= inside || mid >= outside {
            break;
        }
        if is_out(mid) {
            outside = mid;
        } else {
            inside = mid;
        }
    }
    outside
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn state(y: f64, vspeed: f64, time: f64) -> BirdState {
        BirdState {
            x: 0.0,
            y,
            vspeed,
            time,
            valid: true,
        }
    }

    #[test]
    fn test_free_fall_hits_floor_at_analytic_root() {
        let config = SimConfig::default();
        // 100 - 0.25·dt² = -220  =>  dt = sqrt(1280)
        let t = next_bird_collision(&config, &state(100.0, 0.0, 0.0));
        assert!((t - 1280.0_f64.sqrt()).abs() < 1e-9);
        assert!(!project(&config, &state(100.0, 0.0, 0.0), t).unwrap().valid);
        assert!(project(&config, &state(100.0, 0.0, 0.0), t - 1e-6).unwrap().valid);
    }

    #[test]
    fn test_collision_time_is_offset_by_anchor_time() {
        let config = SimConfig::default();
        let base = next_bird_collision(&config, &state(100.0, 8.0, 0.0));
        let shifted = next_bird_collision(&config, &state(100.0, 8.0, 40.0));
        assert!((shifted - base - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_ceiling_hit_while_ascending() {
        let config = SimConfig::default();
        // Apex would be 190 + 64 = 254 > ceiling; hits 200 on the way up
        let from = state(190.0, 8.0, 0.0);
        let t = next_bird_collision(&config, &from);
        let at = project(&config, &from, t).unwrap();
        assert!(!at.valid);
        assert!(at.vspeed > 0.0, "should still be rising at the ceiling");
        assert!((at.y - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_apex_below_ceiling_falls_to_floor() {
        let config = SimConfig::default();
        let from = state(100.0, 8.0, 0.0);
        let t = next_bird_collision(&config, &from);
        let at = project(&config, &from, t).unwrap();
        assert!(!at.valid);
        assert!(at.y <= config.floor);
    }

    #[test]
    fn test_already_invalid_returns_own_time() {
        let config = SimConfig::default();
        let crashed = BirdState {
            valid: false,
            ..state(-300.0, -3.0, 17.0)
        };
        assert_eq!(next_bird_collision(&config, &crashed), 17.0);
        // Claims valid but sits outside the band
        assert_eq!(next_bird_collision(&config, &state(200.0, 0.0, 4.0)), 4.0);
    }

    #[test]
    fn test_no_gravity_no_velocity_never_collides() {
        let config = SimConfig {
            gravity: 0.0,
            ..Default::default()
        };
        assert_eq!(
            next_bird_collision(&config, &state(0.0, 0.0, 0.0)),
            f64::INFINITY
        );
        let t = next_bird_collision(&config, &state(0.0, -2.0, 0.0));
        assert!((t - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate_jump() {
        let config = SimConfig::default();
        let last = state(100.0, 0.0, 0.0);
        assert!(validate_jump(&config, &last, 10.0).unwrap());
        assert!(!validate_jump(&config, &last, 40.0).unwrap());
        assert!(validate_jump(&config, &last, -1.0).is_err());
    }

    #[test]
    fn test_earliest_root_picks_smaller_positive() {
        // (t - 1)(t - 3) = t² - 4t + 3
        assert_eq!(earliest_root(1.0, -4.0, 3.0), Some(1.0));
        // (t + 1)(t - 2) = t² - t - 2
        assert_eq!(earliest_root(1.0, -1.0, -2.0), Some(2.0));
        assert_eq!(earliest_root(1.0, 0.0, 1.0), None);
    }

    #[test]
    fn test_ceiling_graze_at_apex_counts_as_hit() {
        let config = SimConfig::default();
        // Apex at dt = 16 lands on 200.0 exactly after rounding
        let from = state(135.99999999999997, 8.0, 0.0);
        assert!(!project(&config, &from, 16.0).unwrap().valid);

        let t = next_bird_collision(&config, &from);
        assert!(t <= 16.0, "graze at the apex was skipped, got {}", t);
        assert!(!project(&config, &from, t).unwrap().valid);
        for frame in 0..16 {
            assert!(project(&config, &from, frame as f64).unwrap().valid);
        }
    }

    #[test]
    fn test_near_tangent_crossing_is_out_of_band() {
        let config = SimConfig::default();
        let from = state(136.00000000000003, 8.0, 1000.0);
        let t = next_bird_collision(&config, &from);
        assert!(t.is_finite());
        assert!(t >= from.time);
        assert!(!project(&config, &from, t).unwrap().valid);
        let mut frame = from.time;
        while frame < t {
            assert!(project(&config, &from, frame).unwrap().valid);
            frame += 1.0;
        }
    }

    proptest! {
        #[test]
        fn grazing_ceiling_never_skipped(
            y in 135.9999999..136.0000001_f64,
            time in 0u32..5000,
        ) {
            let config = SimConfig::default();
            let from = state(y, 8.0, time as f64);
            let t = next_bird_collision(&config, &from);
            prop_assert!(!project(&config, &from, t).unwrap().valid);
            let apex = from.time + 16.0;
            if !project(&config, &from, apex).unwrap().valid {
                prop_assert!(t <= apex);
            }
        }

        #[test]
        fn collision_agrees_with_projection(
            y in -219.0..199.0_f64,
            v in -20.0..20.0_f64,
            time in 0u32..500,
        ) {
            let config = SimConfig::default();
            let from = state(y, v, time as f64);
            let t = next_bird_collision(&config, &from);
            prop_assert!(t.is_finite());
            prop_assert!(t >= from.time);
            prop_assert!(!project(&config, &from, t).unwrap().valid);

            // Every whole frame strictly before the crossing is still in the band
            let mut frame = from.time;
            while frame + 1e-6 < t {
                prop_assert!(project(&config, &from, frame).unwrap().valid);
                frame += 1.0;
            }
        }

        #[test]
        fn falling_bird_lands_on_floor(
            y in -219.0..199.0_f64,
            v in -20.0..0.0_f64,
        ) {
            let config = SimConfig::default();
            let from = state(y, v, 0.0);
            let t = next_bird_collision(&config, &from);
            let landed = project(&config, &from, t).unwrap();
            prop_assert!((landed.y - config.floor).abs() < 1e-6);
        }
    }
}

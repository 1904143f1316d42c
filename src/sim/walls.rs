//! Procedural wall placement
//!
//! A wall's opening is a pure function of `(seed, index)`. There is no
//! generator state, so every peer computes wall `k` independently and in any
//! order without it ever going over the network.

use std::iter::FusedIterator;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::Wall;
use crate::config::{SimConfig, WallNoise};

/// No walls at or behind the spawn column
pub const FIRST_WALL_INDEX: i64 = 1;

/// Deterministic value in `[0, 1)` from a real-valued seed
///
/// Not statistically strong, but smooth enough to look random and trivially
/// reproducible on any peer.
#[inline]
pub fn sine_noise(n: f64) -> f64 {
    let x = n.sin() * 10000.0;
    x - x.floor()
}

/// Deterministic value in `[0, 1)` from a freshly keyed PCG stream
pub fn pcg_noise(seed: i64, index: i64) -> f64 {
    let key = (seed as u64)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add((index as u64).wrapping_mul(2654435761));
    let mut rng = Pcg32::seed_from_u64(key);
    rng.random::<f64>()
}

/// Maps `(seed, index)` to an opening height inside the band
#[derive(Debug, Clone, Copy, PartialEq)]
struct WallPlacer {
    noise: WallNoise,
    seed: i64,
    /// Lowest admissible opening centre
    low: f64,
    /// Range of admissible opening centres
    span: f64,
}

impl WallPlacer {
    fn new(config: &SimConfig, seed: i64) -> Self {
        let half_gap = config.wall_gap / 2.0;
        Self {
            noise: config.wall_noise,
            seed,
            low: config.floor + half_gap,
            span: (config.band_height() - config.wall_gap).max(0.0),
        }
    }

    fn unit(&self, index: i64) -> f64 {
        match self.noise {
            WallNoise::Sine => {
                let seed = self.seed as f64;
                let index = index as f64;
                sine_noise(seed + index + (1.0 + seed.abs()) * index)
            }
            WallNoise::Pcg => pcg_noise(self.seed, index),
        }
    }

    fn place(&self, index: i64) -> Wall {
        Wall {
            index,
            y: self.low + self.unit(index) * self.span,
        }
    }
}

/// Wall number `index` for `seed`
pub fn wall_at(config: &SimConfig, seed: i64, index: i64) -> Wall {
    WallPlacer::new(config, seed).place(index)
}

/// Walls whose left edge lies in `[x_min, x_max]`, generated lazily
pub fn walls_between(config: &SimConfig, seed: i64, x_min: f64, x_max: f64) -> Walls {
    let placer = WallPlacer::new(config, seed);
    let pitch = config.wall_pitch();
    if !(pitch > 0.0) || !(x_min <= x_max) {
        return Walls {
            placer,
            next: 0,
            end: 0,
        };
    }

    // `as` saturates, so infinite bounds clamp instead of wrapping
    let first = ((x_min / pitch).ceil() as i64).max(FIRST_WALL_INDEX);
    let last = (x_max / pitch).floor() as i64;
    Walls {
        placer,
        next: first,
        end: last.saturating_add(1).max(first),
    }
}

/// Lazy, restartable run of consecutive walls
///
/// Cloning yields an independent cursor that regenerates identical walls.
#[derive(Debug, Clone)]
pub struct Walls {
    placer: WallPlacer,
    next: i64,
    /// Exclusive
    end: i64,
}

impl Walls {
    /// Index range still to be produced
    pub fn indices(&self) -> std::ops::Range<i64> {
        self.next..self.end
    }
}

impl Iterator for Walls {
    type Item = Wall;

    fn next(&mut self) -> Option<Wall> {
        if self.next >= self.end {
            return None;
        }
        let wall = self.placer.place(self.next);
        self.next += 1;
        Some(wall)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.end - self.next).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for Walls {
    fn next_back(&mut self) -> Option<Wall> {
        if self.next >= self.end {
            return None;
        }
        self.end -= 1;
        Some(self.placer.place(self.end))
    }
}

impl ExactSizeIterator for Walls {}

impl FusedIterator for Walls {}

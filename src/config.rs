//! Simulation configuration
//!
//! Fixed for the lifetime of a session. Every participant must run with the
//! same values or their reconstructed trajectories will diverge.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised when loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(&'static str),

    #[error("unknown wall noise {0:?} (expected \"sine\" or \"pcg\")")]
    UnknownNoise(String),
}

/// Pseudo-random source used to place wall gaps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallNoise {
    /// `frac(sin(n) * 10000)`, matches already deployed clients bit for bit
    #[default]
    Sine,
    /// PCG32 keyed by `(seed, index)`
    Pcg,
}

impl WallNoise {
    pub fn as_str(&self) -> &'static str {
        match self {
            WallNoise::Sine => "sine",
            WallNoise::Pcg => "pcg",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sine" | "sin" => Some(WallNoise::Sine),
            "pcg" => Some(WallNoise::Pcg),
            _ => None,
        }
    }
}

/// Physics and world constants for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Horizontal speed (units/frame)
    pub hspeed: f64,
    /// Vertical speed after a jump (units/frame)
    pub jump_speed: f64,
    /// Vertical acceleration (units/frame²)
    pub gravity: f64,
    /// Upper bound of the valid band (exclusive)
    pub ceiling: f64,
    /// Lower bound of the valid band (exclusive)
    pub floor: f64,
    /// Horizontal thickness of a wall
    pub wall_width: f64,
    /// Vertical opening of a wall; also the horizontal space between walls
    pub wall_gap: f64,
    pub start_x: f64,
    pub start_y: f64,
    /// Wall placement noise
    pub wall_noise: WallNoise,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            hspeed: HSPEED,
            jump_speed: JUMP_SPEED,
            gravity: GRAVITY,
            ceiling: CEILING,
            floor: FLOOR,
            wall_width: WALL_WIDTH,
            wall_gap: WALL_GAP,
            start_x: START_X,
            start_y: START_Y,
            wall_noise: WallNoise::Sine,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants the trajectory math relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            self.hspeed,
            self.jump_speed,
            self.gravity,
            self.ceiling,
            self.floor,
            self.wall_width,
            self.wall_gap,
            self.start_x,
            self.start_y,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::Invalid("all values must be finite"));
        }
        if self.floor >= self.ceiling {
            return Err(ConfigError::Invalid("floor must be below ceiling"));
        }
        if self.gravity >= 0.0 {
            return Err(ConfigError::Invalid("gravity must pull downward"));
        }
        if self.hspeed < 0.0 {
            return Err(ConfigError::Invalid("hspeed must not be negative"));
        }
        if self.jump_speed <= 0.0 {
            return Err(ConfigError::Invalid("jump_speed must be positive"));
        }
        if self.wall_width < 0.0 {
            return Err(ConfigError::Invalid("wall_width must not be negative"));
        }
        if self.wall_gap <= 0.0 || self.wall_gap >= self.band_height() {
            return Err(ConfigError::Invalid(
                "wall_gap must be positive and fit inside the band",
            ));
        }
        if !self.contains_y(self.start_y) {
            return Err(ConfigError::Invalid("start_y must lie strictly inside the band"));
        }
        Ok(())
    }

    /// Replace the wall noise by name, as accepted by `WallNoise::from_str`
    pub fn with_noise_name(mut self, name: &str) -> Result<Self, ConfigError> {
        self.wall_noise =
            WallNoise::from_str(name).ok_or_else(|| ConfigError::UnknownNoise(name.to_string()))?;
        Ok(self)
    }

    /// Height of the playable band
    #[inline]
    pub fn band_height(&self) -> f64 {
        self.ceiling - self.floor
    }

    /// Strict band test; touching either bound is out
    #[inline]
    pub fn contains_y(&self, y: f64) -> bool {
        y > self.floor && y < self.ceiling
    }

    /// Horizontal distance between consecutive walls
    #[inline]
    pub fn wall_pitch(&self) -> f64 {
        self.wall_width + self.wall_gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = SimConfig::from_json(r#"{ "hspeed": 5.0, "wall_noise": "pcg" }"#).unwrap();
        assert_eq!(config.hspeed, 5.0);
        assert_eq!(config.gravity, GRAVITY);
        assert_eq!(config.wall_noise, WallNoise::Pcg);
    }

    #[test]
    fn test_json_roundtrip_preserves_values() {
        let config = SimConfig {
            ceiling: 300.0,
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(SimConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_inverted_band() {
        let config = SimConfig {
            floor: 250.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_upward_gravity() {
        let config = SimConfig {
            gravity: 0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_start_on_ceiling() {
        let config = SimConfig {
            start_y: CEILING,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            SimConfig::from_json("{ hspeed: }"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_contains_y_is_strict() {
        let config = SimConfig::default();
        assert!(!config.contains_y(CEILING));
        assert!(!config.contains_y(FLOOR));
        assert!(config.contains_y(0.0));
    }

    #[test]
    fn test_wall_noise_from_str() {
        assert_eq!(WallNoise::from_str("PCG"), Some(WallNoise::Pcg));
        assert_eq!(WallNoise::from_str("sin"), Some(WallNoise::Sine));
        assert_eq!(WallNoise::from_str("perlin"), None);
        assert_eq!(WallNoise::Pcg.as_str(), "pcg");

        let config = SimConfig::default().with_noise_name("Pcg").unwrap();
        assert_eq!(config.wall_noise, WallNoise::Pcg);
        assert!(matches!(
            SimConfig::default().with_noise_name("perlin"),
            Err(ConfigError::UnknownNoise(name)) if name == "perlin"
        ));
    }
}

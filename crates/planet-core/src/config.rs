//! Planet configuration, loaded from JSON.

use serde::{Deserialize, Serialize};

use crate::error::PlanetError;
use crate::noise::params::RidgedParams;

/// Everything needed to set up a planet and its terrain generator.
/// Defaults describe an Earth-sized planet with 8 km of relief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetConfig {
    /// Base sphere radius in metres.
    pub radius: f64,
    /// Maximum displacement either side of the base sphere, in metres.
    pub scale: f64,
    /// Vertices per patch side. Odd, at least 3.
    pub tile_size: usize,
    pub terrain: RidgedParams,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            radius: 6_378_000.0,
            scale: 8_000.0,
            tile_size: 33,
            terrain: RidgedParams::default(),
        }
    }
}

impl PlanetConfig {
    /// Parse and validate. Missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self, PlanetError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, PlanetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), PlanetError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(PlanetError::InvalidConfig(format!("radius must be positive, got {}", self.radius)));
        }
        if !(self.scale.is_finite() && self.scale >= 0.0) {
            return Err(PlanetError::InvalidConfig(format!("scale must be non-negative, got {}", self.scale)));
        }
        if self.tile_size < 3 || self.tile_size % 2 == 0 {
            return Err(PlanetError::InvalidTileSize(self.tile_size));
        }
        let t = &self.terrain;
        for (name, value) in [
            ("octaves", t.octaves),
            ("lacunarity", t.lacunarity),
            ("gain", t.gain),
            ("offset", t.offset),
            ("h", t.h),
            ("weight", t.weight),
            ("freq", t.freq),
        ] {
            if !value.is_finite() {
                return Err(PlanetError::InvalidConfig(format!("terrain.{name} must be finite, got {value}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_demo_planet() {
        let c = PlanetConfig::default();
        assert_eq!(c.radius, 6_378_000.0);
        assert_eq!(c.scale, 8_000.0);
        assert_eq!(c.tile_size, 33);
        assert_eq!(c.terrain.octaves, 16.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(PlanetConfig::from_json("{}").unwrap(), PlanetConfig::default());
    }

    #[test]
    fn nested_terrain_overrides_merge_with_defaults() {
        let c = PlanetConfig::from_json(r#"{ "radius": 1000, "terrain": { "gain": 1.5 } }"#).unwrap();
        assert_eq!(c.radius, 1000.0);
        assert_eq!(c.scale, 8_000.0);
        assert_eq!(c.terrain.gain, 1.5);
        assert_eq!(c.terrain.lacunarity, 2.0);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            PlanetConfig::from_json(r#"{ "radius": -1 }"#),
            Err(PlanetError::InvalidConfig(_))
        ));
        assert!(matches!(
            PlanetConfig::from_json(r#"{ "tile_size": 32 }"#),
            Err(PlanetError::InvalidTileSize(32))
        ));
        assert!(matches!(PlanetConfig::from_json("not json"), Err(PlanetError::Json(_))));
        let c = PlanetConfig { scale: f64::NAN, ..PlanetConfig::default() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn json_roundtrip() {
        let c = PlanetConfig { tile_size: 17, ..PlanetConfig::default() };
        let back = PlanetConfig::from_json(&c.to_json().unwrap()).unwrap();
        assert_eq!(back, c);
    }
}

//! Galaxy parameters and the bounds the panel enforces on them.
//!
//! [`GalaxyParams`] is the single record the panel edits and the generator
//! reads. Values coming from outside the panel (preset files, the command
//! line) go through [`GalaxyParams::clamp_to_bounds`] so the generator only
//! ever sees what a slider could have produced.
//!
//! # Example
//!
//! ```ignore
//! use galaxy::params::GalaxyParams;
//!
//! let mut params = GalaxyParams::load("spiral.json")?;
//! params.branches = 5;
//! params.clamp_to_bounds();
//! params.save("spiral.json")?;
//! ```

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::Rgb;
use crate::error::ConfigError;

/// Slider bounds for one numeric parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange<T> {
    pub min: T,
    pub max: T,
    pub step: T,
}

impl<T: PartialOrd + Copy> ParamRange<T> {
    /// Clamp `value` into `min..=max`. Unordered values (NaN) map to `min`.
    pub fn clamp(&self, value: T) -> T {
        if !(value >= self.min) {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn range(&self) -> RangeInclusive<T> {
        self.min..=self.max
    }
}

pub const COUNT_RANGE: ParamRange<u32> = ParamRange { min: 1_000, max: 1_000_000, step: 100 };
pub const SIZE_RANGE: ParamRange<f32> = ParamRange { min: 0.001, max: 0.025, step: 0.001 };
pub const RADIUS_RANGE: ParamRange<f32> = ParamRange { min: 1.0, max: 20.0, step: 0.01 };
pub const BRANCHES_RANGE: ParamRange<u32> = ParamRange { min: 2, max: 20, step: 1 };
pub const SPIN_RANGE: ParamRange<f32> = ParamRange { min: -5.0, max: 5.0, step: 0.001 };
pub const RANDOMNESS_POW_RANGE: ParamRange<f32> = ParamRange { min: 1.0, max: 10.0, step: 0.001 };

/// Everything that shapes the generated galaxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyParams {
    /// Number of points.
    pub count: u32,
    /// Point size in world units (attenuated with distance).
    pub size: f32,
    /// Outer radius of the disk.
    pub radius: f32,
    /// Number of spiral arms.
    pub branches: u32,
    /// Extra arm angle per unit of radius, in radians.
    pub spin: f32,
    /// Exponent applied to jitter samples; higher values pull points onto the arms.
    pub randomness_pow: f32,
    /// Color at the center.
    pub inside_color: Rgb,
    /// Color at the outer edge.
    pub outside_color: Rgb,
}

impl Default for GalaxyParams {
    fn default() -> Self {
        Self {
            count: 10_000,
            size: 0.01,
            radius: 5.0,
            branches: 3,
            spin: 1.0,
            randomness_pow: 3.0,
            inside_color: Rgb::RED,
            outside_color: Rgb::BLUE,
        }
    }
}

impl GalaxyParams {
    /// Number of points a generation with these parameters produces.
    #[inline]
    pub fn point_count(&self) -> usize {
        self.count as usize
    }

    /// Whether every numeric field lies within its panel bounds.
    pub fn is_within_bounds(&self) -> bool {
        COUNT_RANGE.contains(self.count)
            && SIZE_RANGE.contains(self.size)
            && RADIUS_RANGE.contains(self.radius)
            && BRANCHES_RANGE.contains(self.branches)
            && SPIN_RANGE.contains(self.spin)
            && RANDOMNESS_POW_RANGE.contains(self.randomness_pow)
    }

    /// Clamp every numeric field into its panel bounds.
    ///
    /// Returns the names of the fields that had to change.
    pub fn clamp_to_bounds(&mut self) -> Vec<&'static str> {
        let mut clamped = Vec::new();

        fn apply<T: PartialOrd + Copy + std::fmt::Debug>(
            name: &'static str,
            value: &mut T,
            range: ParamRange<T>,
            clamped: &mut Vec<&'static str>,
        ) {
            let fixed = range.clamp(*value);
            // NaN never compares equal, so it is always reported.
            if fixed != *value {
                warn!(param = name, from = ?value, to = ?fixed, "parameter outside panel bounds, clamped");
                *value = fixed;
                clamped.push(name);
            }
        }

        apply("count", &mut self.count, COUNT_RANGE, &mut clamped);
        apply("size", &mut self.size, SIZE_RANGE, &mut clamped);
        apply("radius", &mut self.radius, RADIUS_RANGE, &mut clamped);
        apply("branches", &mut self.branches, BRANCHES_RANGE, &mut clamped);
        apply("spin", &mut self.spin, SPIN_RANGE, &mut clamped);
        apply("randomness_pow", &mut self.randomness_pow, RANDOMNESS_POW_RANGE, &mut clamped);

        clamped
    }

    /// Parse a JSON preset. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a preset from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Write a preset to disk, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

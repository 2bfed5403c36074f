//! 8-bit RGB colors.
//!
//! Galaxy colors are authored the way a color picker shows them: three sRGB
//! bytes, written as `#rrggbb` in preset files and on the command line.
//! Interpolation happens on the normalized channel values, in display space.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;

/// An sRGB color with one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const RED: Rgb = Rgb::from_hex(0xff0000);
    pub const BLUE: Rgb = Rgb::from_hex(0x0000ff);

    /// Build a color from a packed `0xRRGGBB` value.
    pub const fn from_hex(hex: u32) -> Self {
        Self([(hex >> 16) as u8, (hex >> 8) as u8, hex as u8])
    }

    /// Packed `0xRRGGBB` value.
    pub fn to_hex(self) -> u32 {
        let [r, g, b] = self.0;
        (r as u32) << 16 | (g as u32) << 8 | b as u32
    }

    /// Channels normalized to `0.0..=1.0`.
    pub fn to_vec3(self) -> Vec3 {
        let [r, g, b] = self.0;
        Vec3::new(r as f32, g as f32, b as f32) / 255.0
    }

    /// Linear interpolation towards `other`; `t = 0` gives `self`.
    #[inline]
    pub fn lerp(self, other: Rgb, t: f32) -> Vec3 {
        self.to_vec3().lerp(other.to_vec3(), t)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl FromStr for Rgb {
    type Err = ConfigError;

    /// Accepts `#rrggbb`, `0xrrggbb` or bare `rrggbb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConfigError::InvalidColor(s.to_string()));
        }

        u32::from_str_radix(digits, 16)
            .map(Rgb::from_hex)
            .map_err(|_| ConfigError::InvalidColor(s.to_string()))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

//! # Galaxy - an interactive spiral galaxy
//!
//! Procedurally generates a spiral galaxy as a cloud of colored points,
//! renders it with additive blending and lets you orbit around it while
//! tweaking the generator from a panel.
//!
//! ## Quick Start
//!
//! ```ignore
//! use galaxy::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     galaxy::app::run(ViewerConfig {
//!         params: GalaxyParams { branches: 5, spin: -1.5, ..Default::default() },
//!         seed: Some(7),
//!         preset_path: None,
//!     })
//! }
//! ```
//!
//! ## Generation
//!
//! [`generate`] turns a [`GalaxyParams`] into a [`PointCloud`]: flat
//! position and color arrays with three floats per point. Point `i` sits on
//! branch `i % branches` at a random fraction of the radius, bent by
//! `spin * radius` and scattered by a jitter whose magnitude is a random
//! number raised to `randomness_pow`. Colors run from `inside_color` at the
//! center to `outside_color` at the rim.
//!
//! The generator only needs an [`rand::Rng`], so a seeded `StdRng` gives
//! the same galaxy every time:
//!
//! ```
//! use galaxy::{generate, GalaxyParams};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let params = GalaxyParams { count: 1_000, ..Default::default() };
//! let a = generate(&params, &mut StdRng::seed_from_u64(1));
//! let b = generate(&params, &mut StdRng::seed_from_u64(1));
//! assert_eq!(a, b);
//! assert_eq!(a.len(), 1_000);
//! ```
//!
//! ## Scene
//!
//! A [`Scene`] holds at most one galaxy. Regenerating disposes the old
//! point object before the new one is built, so GPU memory never holds two
//! galaxies at once.
//!
//! ## Presets
//!
//! Parameters serialize to JSON with colors as `#rrggbb` strings. Missing
//! fields take their defaults and out-of-range values can be clamped with
//! [`GalaxyParams::clamp_to_bounds`].

pub mod app;
pub mod camera;
pub mod color;
pub mod error;
pub mod generator;
mod gpu;
pub mod input;
pub mod panel;
pub mod params;
pub mod scene;
mod shader;
pub mod time;
pub mod viewport;

pub use app::{run, ViewerConfig};
pub use camera::Camera;
pub use color::Rgb;
pub use error::{AppError, ConfigError, GpuError};
pub use generator::{generate, PointCloud, PointVertex};
pub use glam::{Vec2, Vec3};
pub use params::{GalaxyParams, ParamRange};
pub use scene::{Drawable, Points, Scene};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use galaxy::prelude::*;
/// ```
pub mod prelude {
    pub use crate::app::{run, ViewerConfig};
    pub use crate::camera::Camera;
    pub use crate::color::Rgb;
    pub use crate::error::{AppError, ConfigError, GpuError};
    pub use crate::generator::{generate, PointCloud};
    pub use crate::params::GalaxyParams;
    pub use crate::scene::{Drawable, Scene};
    pub use crate::{Vec2, Vec3};
}

//! Spiral galaxy point generation.
//!
//! Points are scattered along `branches` evenly spaced arms. Each point gets
//! a random distance from the center, its arm is twisted by `distance ×
//! spin`, and a per-axis jitter (flattened on Y) spreads it off the arm.
//! Jitter magnitudes are `uniform^randomness_pow`, so large exponents keep
//! most points tight against their arm.
//!
//! Generation is a pure function of the parameters and the random source.
//! Pass a seeded [`rand::rngs::StdRng`] for reproducible galaxies.
//!
//! ```ignore
//! use rand::SeedableRng;
//! use galaxy::{generate, GalaxyParams};
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let cloud = generate(&GalaxyParams::default(), &mut rng);
//! assert_eq!(cloud.positions.len(), 30_000);
//! ```

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

use crate::params::GalaxyParams;

/// Flat position and color arrays, three floats per point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
}

/// Interleaved per-point vertex data as uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl PointCloud {
    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[index * 3..index * 3 + 3])
    }

    pub fn color(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.colors[index * 3..index * 3 + 3])
    }

    /// Interleave positions and colors for a vertex buffer.
    pub fn to_vertices(&self) -> Vec<PointVertex> {
        self.positions
            .chunks_exact(3)
            .zip(self.colors.chunks_exact(3))
            .map(|(p, c)| PointVertex {
                position: [p[0], p[1], p[2]],
                color: [c[0], c[1], c[2]],
            })
            .collect()
    }
}

/// Base angle of the arm that point `index` belongs to.
#[inline]
pub fn branch_angle(index: u32, branches: u32) -> f32 {
    (index % branches) as f32 / branches as f32 * TAU
}

/// `uniform(0,1)^pow` with a random sign.
fn jitter<R: Rng + ?Sized>(rng: &mut R, pow: f32) -> f32 {
    let magnitude = rng.gen::<f32>().powf(pow);
    if rng.gen_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}

/// Generate a galaxy of `params.count` points.
pub fn generate<R: Rng + ?Sized>(params: &GalaxyParams, rng: &mut R) -> PointCloud {
    let count = params.point_count();
    let branches = params.branches.max(1);
    let mut positions = Vec::with_capacity(count * 3);
    let mut colors = Vec::with_capacity(count * 3);

    for i in 0..params.count {
        // Sampled as a fraction so the color factor stays strictly below 1.
        let fraction: f32 = rng.gen();
        let radius = fraction * params.radius;
        let angle = branch_angle(i, branches) + radius * params.spin;

        let jitter_x = jitter(rng, params.randomness_pow);
        let jitter_y = jitter(rng, params.randomness_pow) / 3.0;
        let jitter_z = jitter(rng, params.randomness_pow);

        positions.extend_from_slice(&[
            angle.cos() * radius + jitter_x,
            jitter_y,
            angle.sin() * radius + jitter_z,
        ]);

        let color = params.inside_color.lerp(params.outside_color, fraction);
        colors.extend_from_slice(&color.to_array());
    }

    PointCloud { positions, colors }
}

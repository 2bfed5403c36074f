//! The scene: a single slot for the current galaxy.
//!
//! The scene owns at most one drawable point cloud. Replacing it always
//! disposes the old drawable before the new one is attached, so GPU memory
//! never holds two galaxies and the renderer never sees an empty scene once
//! the first galaxy exists.
//!
//! [`Scene::regenerate`] is the only place a committed parameter change turns
//! into new geometry.

use std::time::Instant;

use glam::Mat4;
use rand::Rng;
use tracing::debug;

use crate::generator::{generate, PointCloud};
use crate::params::GalaxyParams;

/// Something the renderer can draw that holds resources needing release.
pub trait Drawable {
    /// Release the resources. Called exactly once, right before the drawable
    /// leaves the scene.
    fn dispose(self);
}

/// The attached galaxy and its transform.
#[derive(Debug)]
pub struct Points<D> {
    pub drawable: D,
    pub point_count: usize,
    /// Rotation about the Y axis in radians.
    pub rotation_y: f32,
}

impl<D> Points<D> {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation_y)
    }
}

#[derive(Debug)]
pub struct Scene<D: Drawable> {
    points: Option<Points<D>>,
    generation: u64,
}

impl<D: Drawable> Scene<D> {
    pub fn new() -> Self {
        Self {
            points: None,
            generation: 0,
        }
    }

    pub fn points(&self) -> Option<&Points<D>> {
        self.points.as_ref()
    }

    /// Number of attached objects: 0 before the first galaxy, 1 after.
    pub fn object_count(&self) -> usize {
        usize::from(self.points.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_none()
    }

    /// How many galaxies have been attached so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Set the galaxy's Y rotation. No-op on an empty scene.
    pub fn set_rotation(&mut self, radians: f32) {
        if let Some(points) = &mut self.points {
            points.rotation_y = radians;
        }
    }

    /// Dispose the current galaxy, generate a new one from `params` and
    /// attach the drawable `build` makes from it.
    pub fn regenerate<R, F>(&mut self, params: &GalaxyParams, rng: &mut R, build: F)
    where
        R: Rng + ?Sized,
        F: FnOnce(&PointCloud) -> D,
    {
        let rotation_y = self.detach();

        let started = Instant::now();
        let cloud = generate(params, rng);
        let drawable = build(&cloud);

        self.points = Some(Points {
            drawable,
            point_count: cloud.len(),
            rotation_y,
        });
        self.generation += 1;

        debug!(
            points = cloud.len(),
            generation = self.generation,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "galaxy regenerated"
        );
    }

    /// Dispose the current galaxy and leave the scene empty.
    pub fn clear(&mut self) {
        self.detach();
    }

    /// Take the current galaxy out and dispose it. Returns its rotation so
    /// the replacement keeps spinning from the same angle.
    fn detach(&mut self) -> f32 {
        match self.points.take() {
            Some(old) => {
                let rotation = old.rotation_y;
                old.drawable.dispose();
                rotation
            }
            None => 0.0,
        }
    }
}

impl<D: Drawable> Default for Scene<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Drawable> Drop for Scene<D> {
    fn drop(&mut self) {
        self.clear();
    }
}

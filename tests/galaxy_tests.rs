//! Integration tests for galaxy generation, the scene slot and presets.
//!
//! Everything here runs without a GPU: the scene is exercised with a
//! counting drawable instead of real vertex buffers.

use std::cell::RefCell;
use std::f32::consts::TAU;
use std::rc::Rc;

use galaxy::camera::Camera;
use galaxy::generator::branch_angle;
use galaxy::viewport::{Viewport, MAX_PIXEL_RATIO};
use galaxy::{generate, ConfigError, Drawable, GalaxyParams, Rgb, Scene};
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::dpi::PhysicalSize;

// ============================================================================
// Generation
// ============================================================================

#[test]
fn test_default_galaxy_has_ten_thousand_points() {
    let params = GalaxyParams::default();
    let cloud = generate(&params, &mut StdRng::seed_from_u64(42));

    assert_eq!(cloud.positions.len(), 30_000);
    assert_eq!(cloud.colors.len(), 30_000);
    assert_eq!(cloud.len(), params.point_count());
}

#[test]
fn test_three_points_land_on_three_arms() {
    // A huge exponent shrinks the jitter to nothing, leaving each point on
    // the ray of its branch.
    let params = GalaxyParams {
        count: 3,
        radius: 5.0,
        branches: 3,
        spin: 0.0,
        randomness_pow: 1e6,
        ..Default::default()
    };
    let cloud = generate(&params, &mut StdRng::seed_from_u64(3));
    assert_eq!(cloud.len(), 3);

    let expected = [0.0, TAU / 3.0, 2.0 * TAU / 3.0];
    for (i, angle) in expected.iter().enumerate() {
        assert!((branch_angle(i as u32, 3) - angle).abs() < 1e-6);

        let p = cloud.position(i);
        let (sin, cos) = angle.sin_cos();
        // Perpendicular offset from the arm and distance along it.
        let across = p.x * sin - p.z * cos;
        let along = p.x * cos + p.z * sin;
        assert!(across.abs() < 1e-4, "point {i} is {across} off its arm");
        assert!((-1e-4..params.radius).contains(&along), "point {i} at {along} along its arm");
        assert!(p.y.abs() < 1e-4);
    }
}

#[test]
fn test_colors_stay_between_endpoints() {
    let params = GalaxyParams {
        count: 5_000,
        inside_color: Rgb::from_hex(0xff8000),
        outside_color: Rgb::from_hex(0x2040ff),
        ..Default::default()
    };
    let inside = params.inside_color.to_vec3();
    let outside = params.outside_color.to_vec3();
    let lo = inside.min(outside);
    let hi = inside.max(outside);

    let cloud = generate(&params, &mut StdRng::seed_from_u64(9));
    for i in 0..cloud.len() {
        let c = cloud.color(i);
        assert!(c.cmpge(lo - 1e-6).all() && c.cmple(hi + 1e-6).all(), "color {c} out of range");
    }
}

#[test]
fn test_same_seed_same_galaxy_fresh_rng_different_galaxy() {
    let params = GalaxyParams {
        count: 2_000,
        ..Default::default()
    };

    let a = generate(&params, &mut StdRng::seed_from_u64(11));
    let b = generate(&params, &mut StdRng::seed_from_u64(11));
    let c = generate(&params, &mut StdRng::seed_from_u64(12));

    assert_eq!(a, b);
    assert_eq!(a.len(), c.len());
    assert_ne!(a.positions, c.positions);
}

// ============================================================================
// Scene
// ============================================================================

/// Records dispose calls by id.
struct Recorder {
    id: usize,
    disposed: Rc<RefCell<Vec<usize>>>,
}

impl Drawable for Recorder {
    fn dispose(self) {
        self.disposed.borrow_mut().push(self.id);
    }
}

#[test]
fn test_regenerate_disposes_previous_galaxy() {
    let disposed = Rc::new(RefCell::new(Vec::new()));
    let mut scene = Scene::new();
    let mut rng = StdRng::seed_from_u64(5);
    let params = GalaxyParams {
        count: 1_000,
        ..Default::default()
    };

    assert_eq!(scene.object_count(), 0);

    for id in 0..4 {
        let disposed_in_build = disposed.clone();
        scene.regenerate(&params, &mut rng, |cloud| {
            // The previous galaxy is already gone by the time the new one is built.
            assert_eq!(disposed_in_build.borrow().len(), id);
            assert_eq!(cloud.len(), 1_000);
            Recorder {
                id,
                disposed: disposed_in_build.clone(),
            }
        });
        assert_eq!(scene.object_count(), 1);
    }

    assert_eq!(*disposed.borrow(), vec![0, 1, 2]);
    assert_eq!(scene.generation(), 4);
    assert_eq!(scene.points().map(|p| p.drawable.id), Some(3));

    drop(scene);
    assert_eq!(*disposed.borrow(), vec![0, 1, 2, 3]);
}

#[test]
fn test_rotation_survives_regeneration() {
    let disposed = Rc::new(RefCell::new(Vec::new()));
    let mut scene = Scene::new();
    let mut rng = StdRng::seed_from_u64(6);
    let params = GalaxyParams::default();

    scene.regenerate(&params, &mut rng, |_| Recorder {
        id: 0,
        disposed: disposed.clone(),
    });
    scene.set_rotation(1.25);
    scene.regenerate(&params, &mut rng, |_| Recorder {
        id: 1,
        disposed: disposed.clone(),
    });

    assert_eq!(scene.points().map(|p| p.rotation_y), Some(1.25));
}

// ============================================================================
// Presets
// ============================================================================

#[test]
fn test_preset_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spiral.json");

    let params = GalaxyParams {
        count: 50_000,
        branches: 7,
        spin: -2.5,
        inside_color: Rgb::from_hex(0xffaa33),
        outside_color: Rgb::from_hex(0x1b3984),
        ..Default::default()
    };
    params.save(&path).unwrap();

    let json = std::fs::read_to_string(&path).unwrap();
    assert!(json.contains("\"#ffaa33\""));

    assert_eq!(GalaxyParams::load(&path).unwrap(), params);
}

#[test]
fn test_partial_preset_fills_defaults() {
    let params = GalaxyParams::from_json(r##"{ "branches": 5, "outside_color": "#00ff00" }"##).unwrap();

    assert_eq!(params.branches, 5);
    assert_eq!(params.outside_color, Rgb::from_hex(0x00ff00));
    assert_eq!(params.count, GalaxyParams::default().count);
}

#[test]
fn test_bad_presets_are_rejected() {
    assert!(matches!(
        GalaxyParams::from_json(r#"{ "inside_color": "crimson" }"#),
        Err(ConfigError::Json(_))
    ));
    assert!(matches!(
        GalaxyParams::load("/nonexistent/galaxy/preset.json"),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn test_out_of_range_preset_is_clamped() {
    let mut params = GalaxyParams::from_json(r#"{ "count": 5, "spin": 12.0, "branches": 40 }"#).unwrap();
    assert!(!params.is_within_bounds());

    let clamped = params.clamp_to_bounds();

    assert_eq!(clamped, vec!["count", "branches", "spin"]);
    assert_eq!(params.count, 1_000);
    assert_eq!(params.branches, 20);
    assert_eq!(params.spin, 5.0);
    assert!(params.is_within_bounds());
}

// ============================================================================
// Viewport and camera
// ============================================================================

#[test]
fn test_resize_updates_aspect_and_caps_pixel_ratio() {
    let mut viewport = Viewport::new(PhysicalSize::new(1280, 720), 3.0);
    let mut camera = Camera::default();

    viewport.resize(PhysicalSize::new(1600, 900));
    camera.set_viewport(viewport.width as f32, viewport.height as f32);

    assert!((camera.aspect - 1600.0 / 900.0).abs() < 1e-6);
    assert!(viewport.pixel_ratio() <= MAX_PIXEL_RATIO);
}

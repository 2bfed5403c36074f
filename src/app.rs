//! The viewer: window, frame loop and event routing.
//!
//! Every redraw advances the clock and the camera damping, spins the galaxy,
//! runs the panel, applies a committed parameter change, draws, and asks for
//! the next redraw. The loop ends when the window closes or a stop was
//! requested.

use std::path::PathBuf;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::camera::Camera;
use crate::error::AppError;
use crate::gpu::{EguiIntegration, GpuPoints, GpuState};
use crate::input::{Action, OrbitInput};
use crate::panel::{Panel, PanelStats};
use crate::params::GalaxyParams;
use crate::scene::Scene;
use crate::time::Time;
use crate::viewport::Viewport;

/// Galaxy spin in radians per second of elapsed time.
pub const ROTATION_SPEED: f32 = 1.0 / 5.0;

/// Everything the viewer needs to start.
#[derive(Debug, Clone, Default)]
pub struct ViewerConfig {
    pub params: GalaxyParams,
    /// Seed for reproducible galaxies. Fresh entropy when `None`.
    pub seed: Option<u64>,
    /// Where "Save preset" writes.
    pub preset_path: Option<PathBuf>,
}

/// Open the window and run until it closes.
pub fn run(config: ViewerConfig) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct App {
    // Declared before `gpu` so galaxy buffers are released before the device.
    scene: Scene<GpuPoints>,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    egui: Option<EguiIntegration>,
    viewport: Viewport,
    camera: Camera,
    params: GalaxyParams,
    rng: StdRng,
    panel: Panel,
    input: OrbitInput,
    time: Time,
    stop_requested: bool,
    /// Startup failure to report once the event loop returns.
    fatal: Option<AppError>,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            scene: Scene::new(),
            window: None,
            gpu: None,
            egui: None,
            viewport: Viewport::new(winit::dpi::PhysicalSize::new(1280, 720), 1.0),
            camera: Camera::default(),
            params: config.params,
            rng,
            panel: Panel::new(config.preset_path),
            input: OrbitInput::new(),
            time: Time::new(),
            stop_requested: false,
            fatal: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attrs = Window::default_attributes()
            .with_title("Galaxy")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        self.viewport = Viewport::new(window.inner_size(), window.scale_factor());
        self.camera.set_viewport(self.viewport.width as f32, self.viewport.height as f32);

        let gpu = pollster::block_on(GpuState::new(window.clone(), &self.viewport))?;
        let egui = EguiIntegration::new(gpu.device(), gpu.surface_format(), &window);

        rebuild_galaxy(&gpu, &mut self.scene, &self.params, &mut self.rng);
        info!(
            width = self.viewport.width,
            height = self.viewport.height,
            pixel_ratio = self.viewport.pixel_ratio(),
            "viewer started"
        );

        window.request_redraw();
        self.window = Some(window);
        self.gpu = Some(gpu);
        self.egui = Some(egui);
        Ok(())
    }

    fn resize(&mut self) {
        self.camera.set_viewport(self.viewport.width as f32, self.viewport.height as f32);
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(&self.viewport);
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        if self.stop_requested {
            info!("stop requested, leaving frame loop");
            event_loop.exit();
            return;
        }
        if self.viewport.is_empty() {
            // Minimized; the next resize requests a redraw.
            return;
        }
        let (Some(window), Some(gpu), Some(egui)) = (self.window.clone(), self.gpu.as_mut(), self.egui.as_mut())
        else {
            return;
        };

        let (elapsed, _) = self.time.update();
        self.camera.update();
        self.scene.set_rotation(elapsed * ROTATION_SPEED);

        egui.begin_frame(&window);
        let stats = PanelStats {
            points: self.scene.points().map_or(0, |p| p.point_count),
            fps: self.time.fps(),
        };
        let panel_output = self.panel.show(&egui.ctx, &mut self.params, stats);
        let egui_output = egui.end_frame(&window);

        if panel_output.regenerate {
            debug!(params = ?self.params, "parameters committed");
            rebuild_galaxy(gpu, &mut self.scene, &self.params, &mut self.rng);
        }
        if panel_output.save {
            if let Some(path) = self.panel.preset_path().cloned() {
                match self.params.save(&path) {
                    Ok(()) => {
                        info!(path = %path.display(), "preset saved");
                        self.panel.set_status(format!("saved {}", path.display()));
                    }
                    Err(err) => {
                        warn!(error = %err, "preset not saved");
                        self.panel.set_status(err.to_string());
                    }
                }
            }
        }

        match gpu.render(&self.camera, self.scene.points(), egui, &egui_output) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory, exiting");
                event_loop.exit();
                return;
            }
            Err(err) => warn!(error = ?err, "frame skipped"),
        }

        window.request_redraw();
    }
}

/// Dispose the current galaxy and attach a fresh one built from `params`.
fn rebuild_galaxy(gpu: &GpuState, scene: &mut Scene<GpuPoints>, params: &GalaxyParams, rng: &mut StdRng) {
    let size = params.size;
    scene.regenerate(params, rng, |cloud| gpu.create_points(cloud, size));
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            error!(error = %err, "viewer failed to start");
            self.fatal = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let consumed = match (&mut self.egui, &self.window) {
            (Some(egui), Some(window)) => egui.on_window_event(window, &event),
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.viewport.resize(physical_size);
                self.resize();
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.viewport.set_scale_factor(scale_factor);
                self.resize();
            }
            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
            }
            event => {
                // A drag that ends over the panel must still end.
                let release = matches!(
                    event,
                    WindowEvent::MouseInput {
                        state: ElementState::Released,
                        ..
                    }
                );
                if consumed && !release {
                    return;
                }
                match self.input.handle_event(&event) {
                    Some(Action::Stop) => self.stop_requested = true,
                    Some(action) => {
                        action.apply(&mut self.camera);
                    }
                    None => {}
                }
            }
        }
    }
}

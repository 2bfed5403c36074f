//! Error types for the galaxy viewer.
//!
//! GPU setup, preset loading and window creation can fail. Point generation
//! and everything inside the frame loop cannot.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; ensure your system supports Vulkan, Metal, DX12 or GL")]
    NoAdapter,
    /// The surface reports no usable texture format.
    #[error("surface supports no texture formats on this adapter")]
    UnsupportedSurface,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
}

/// Errors from reading, writing or parsing parameter presets.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access preset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid preset JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),
}

/// Errors that stop the viewer from starting.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to create event loop.
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_gpu_error_wraps_into_app_error() {
        let err: AppError = GpuError::NoAdapter.into();
        assert!(err.to_string().starts_with("GPU error: no compatible GPU adapter"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: AppError = ConfigError::InvalidColor("#zz".into()).into();
        assert_eq!(err.to_string(), "invalid color \"#zz\", expected #rrggbb");
    }

    #[test]
    fn test_io_error_names_path() {
        let err = ConfigError::Io {
            path: PathBuf::from("/tmp/missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/tmp/missing.json"));
        assert!(err.source().is_some());
    }
}

//! GPU context management for wgpu device and queue.

use std::sync::OnceLock;
use thiserror::Error;
use wgpu::{Device, Instance, Queue};

static GPU_CONTEXT: OnceLock<GpuContext> = OnceLock::new();

/// Errors that can occur while acquiring or using the render surface.
///
/// These all fall in the "render surface unavailable" class: raised once
/// when a view opens (or a frame is read back), never retried. The
/// geometry pipeline itself has no recoverable failures.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No compatible GPU adapter found.
    #[error("No compatible GPU adapter found")]
    NoAdapter,

    /// GPU context was already initialized.
    #[error("GPU context already initialized")]
    AlreadyInitialized,

    /// Failed to request GPU device.
    #[error("Failed to request GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    /// Frame readback buffer mapping failed.
    #[error("Frame readback failed")]
    BufferMapping,
}

/// Global GPU context holding device and queue.
pub struct GpuContext {
    /// The wgpu device for creating resources and pipelines.
    pub device: Device,
    /// The command queue for submitting work.
    pub queue: Queue,
}

impl GpuContext {
    /// Initialize the GPU context asynchronously.
    ///
    /// This should be called once when the first view opens. Subsequent
    /// calls return the existing context.
    pub async fn init() -> Result<&'static Self, RenderError> {
        if let Some(ctx) = GPU_CONTEXT.get() {
            return Ok(ctx);
        }

        let instance = Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default(), None)
            .await?;

        GPU_CONTEXT
            .set(GpuContext { device, queue })
            .map_err(|_| RenderError::AlreadyInitialized)?;

        Ok(GPU_CONTEXT.get().expect("context was just set"))
    }

    /// Get the GPU context if it has been initialized.
    pub fn get() -> Option<&'static Self> {
        GPU_CONTEXT.get()
    }

    /// Initialize the GPU context synchronously.
    pub fn init_blocking() -> Result<&'static Self, RenderError> {
        pollster::block_on(Self::init())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore = "requires GPU"]
    fn test_gpu_init() {
        let ctx = GpuContext::init_blocking();
        assert!(ctx.is_ok() || matches!(ctx, Err(RenderError::NoAdapter)));
    }
}

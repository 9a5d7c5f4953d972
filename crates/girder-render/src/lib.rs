#![warn(missing_docs)]

//! wgpu offscreen renderer for the girder section viewer.
//!
//! Renders the extruded section solid into an RGBA texture and reads the
//! pixels back for presentation by whichever viewport host is driving
//! the frame clock (the terminal UI in this repository). Geometry is
//! uploaded once; each frame only rewrites two small uniform buffers and
//! records one render pass, so frame cost is independent of mesh size.
//!
//! The scene: perspective camera starting at (2, 2, 2), two directional
//! lights plus ambient fill, a steel-grey metallic material, and a slow
//! turntable spin whenever the user is not orbiting.

mod camera;
mod context;
mod scene;

pub use camera::OrbitCamera;
pub use context::{GpuContext, RenderError};
pub use scene::{SceneController, Turntable, ROTATION_RATE};

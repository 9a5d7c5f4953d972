#![warn(missing_docs)]

//! Profile extrusion and triangle mesh generation.
//!
//! Turns a validated [`SectionProfile`](girder_section::SectionProfile)
//! into a watertight triangle mesh:
//! 1. Sweep the closed outline along +Z by the configured depth
//! 2. Generate one side-wall quad per outline edge
//! 3. Ear-clip the non-convex end caps
//! 4. Optionally round every outline edge with a multi-segment chamfer
//!
//! The chamfer stands in for the true root fillet of a rolled section: a
//! quarter-arc of `bevel_segments` planar facets whose size matches the
//! nominal root radius. That trades geometric exactness for a mesh that
//! extrudes robustly for any legal input; it is a visualization
//! approximation, not engineering-grade fillet geometry.

mod extrude;
mod mesh;
mod policy;

pub use extrude::extrude_profile;
pub use mesh::{uv_sphere, TriangleMesh};
pub use policy::{ExtrusionConfig, VariantPolicy};

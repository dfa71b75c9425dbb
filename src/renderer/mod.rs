//! WebGPU rendering module
//!
//! Scenes are plain triangle lists built on the CPU each frame and drawn
//! with a single flat-colour pipeline.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use vertex::Vertex;

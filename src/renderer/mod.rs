//! WebGPU rendering module
//!
//! Models are drawn as flat-shaded bounding boxes viewed through a fixed
//! perspective camera.

pub mod camera;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use camera::Camera;
pub use pipeline::RenderState;
pub use vertex::Vertex;

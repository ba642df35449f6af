pub mod camera;
pub mod gpu_context;
pub mod layer_pipeline;
pub mod quad;
pub mod texture;

pub use camera::{LayerUniform, ScrollCamera};
pub use gpu_context::GpuContext;
pub use layer_pipeline::LayerPipeline;
pub use quad::{create_unit_quad, QuadVertex, UNIT_QUAD_VERTEX_COUNT};
pub use texture::Texture;

mod clock;
mod gpu_context;
mod gpu_mesh;
mod mesh_cache;

pub use clock::FrameClock;
pub use gpu_context::GpuContext;
pub use gpu_mesh::{vertices_of, GpuMesh, ModelBinding};
pub use mesh_cache::MeshCache;

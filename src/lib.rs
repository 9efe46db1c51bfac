pub mod binding;
pub mod camera;
pub mod mesh;
pub mod perf;
/// Depth Raster - per-pixel inverse-depth maps from triangle meshes
/// Projects a mesh through a 3x4 camera matrix and scanline-fills each
/// triangle with perspective-correct depth
pub mod rendering;

pub use binding::{render_depth, BindingConfig, BindingError, HostArray, IndexBase, RenderRequest};
pub use camera::{CameraMatrix, ScreenVertex};
pub use mesh::{Face, Triangle, TriangleMesh};
pub use perf::{CounterSnapshot, FunctionCounters, FUNCTION_COUNTERS};
pub use rendering::{
    render_mesh, render_triangles, AtomicDepthImage, DepthImage, RenderConfig, RenderMode,
    RenderStats, ScanlineRasterizer,
};

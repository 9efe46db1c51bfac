pub mod depth_image;
/// Inverse-depth rasterization pipeline
/// Column scanline fill with perspective-correct depth
pub mod edge;
pub mod rasterizer;
pub mod renderer;

pub use depth_image::{AtomicDepthImage, DepthImage, MIN_DEPTH};
pub use edge::{solve_depth_at_x, solve_depth_at_y, Axis};
pub use rasterizer::{DepthTarget, ScanlineRasterizer, MIN_SPAN_HEIGHT};
pub use renderer::{
    render_mesh, render_mesh_with_stats, render_triangles, RenderConfig, RenderMode, RenderStats,
};

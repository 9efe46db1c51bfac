/// Render orchestration: project, assemble, rasterize
///
/// Sequential mode draws triangles in input order into a plain `DepthImage`.
/// Parallel mode fans triangles out over rayon and writes through an
/// `AtomicDepthImage`. Both produce bitwise identical buffers since the
/// per-pixel update is a maximum.
use super::depth_image::{AtomicDepthImage, DepthImage};
use super::rasterizer::ScanlineRasterizer;
use crate::camera::CameraMatrix;
use crate::count_add;
use crate::count_call;
use crate::mesh::{Triangle, TriangleMesh};
use crate::perf::PerfTimer;
use rayon::prelude::*;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Single pass over the triangle list, in order
    #[default]
    Sequential,
    /// Triangles distributed across the rayon thread pool
    Parallel,
}

/// Configuration for a render call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    pub mode: RenderMode,
    /// Parallel mode falls back to sequential below this triangle count
    pub min_parallel_triangles: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::Sequential,
            min_parallel_triangles: 64,
        }
    }
}

impl RenderConfig {
    pub fn parallel() -> Self {
        Self {
            mode: RenderMode::Parallel,
            ..Self::default()
        }
    }
}

/// Summary of a finished render call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStats {
    pub triangles: usize,
    pub covered_pixels: usize,
    pub elapsed: Duration,
}

/// Render pre-projected triangles into a fresh `width` x `height` image.
pub fn render_triangles(
    triangles: &[Triangle],
    width: usize,
    height: usize,
    config: &RenderConfig,
) -> DepthImage {
    count_call!(crate::perf::FUNCTION_COUNTERS.render_calls);
    count_add!(
        crate::perf::FUNCTION_COUNTERS.triangles_submitted,
        triangles.len() as u64
    );
    let rasterizer = ScanlineRasterizer::new();

    let parallel = config.mode == RenderMode::Parallel
        && triangles.len() >= config.min_parallel_triangles;

    if parallel {
        let image = AtomicDepthImage::new(width, height);
        triangles.par_iter().for_each(|triangle| {
            let mut target = &image;
            rasterizer.rasterize_triangle(triangle, &mut target);
        });
        image.into_depth_image()
    } else {
        let mut image = DepthImage::new(width, height);
        for triangle in triangles {
            rasterizer.rasterize_triangle(triangle, &mut image);
        }
        image
    }
}

/// Project `mesh` through `camera` and render a `height` x `width`
/// inverse-depth image. Argument order follows the (rows, columns)
/// image-size convention.
pub fn render_mesh(
    mesh: &TriangleMesh,
    camera: &CameraMatrix,
    height: usize,
    width: usize,
    config: &RenderConfig,
) -> DepthImage {
    render_mesh_with_stats(mesh, camera, height, width, config).0
}

pub fn render_mesh_with_stats(
    mesh: &TriangleMesh,
    camera: &CameraMatrix,
    height: usize,
    width: usize,
    config: &RenderConfig,
) -> (DepthImage, RenderStats) {
    let timer = PerfTimer::new("render_mesh");

    let projected = camera.project_mesh(mesh);
    let triangles = mesh.assemble(&projected);
    let image = render_triangles(&triangles, width, height, config);

    let stats = RenderStats {
        triangles: triangles.len(),
        covered_pixels: image.covered_pixel_count(),
        elapsed: timer.elapsed(),
    };
    log::debug!(
        "rendered {} triangles into {}x{} ({:?}): {} pixels covered in {}μs",
        stats.triangles,
        width,
        height,
        config.mode,
        stats.covered_pixels,
        stats.elapsed.as_micros()
    );

    (image, stats)
}

/// Demo entry point
/// Renders a sphere resting on a ground quad and reports timing and coverage
use depth_raster::*;
use glam::{DMat3, DVec3};
use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const WIDTH: usize = 160;
const HEIGHT: usize = 120;

fn build_scene() -> TriangleMesh {
    let mut mesh = TriangleMesh::uv_sphere(DVec3::new(0.0, 0.0, 6.0), 1.5, 48, 96);
    // Ground quad below the sphere, receding from the camera
    mesh.push_quad([
        DVec3::new(-6.0, 1.5, 2.0),
        DVec3::new(6.0, 1.5, 2.0),
        DVec3::new(6.0, 1.5, 20.0),
        DVec3::new(-6.0, 1.5, 20.0),
    ]);
    mesh
}

fn build_camera() -> CameraMatrix {
    let f = 120.0;
    let k = DMat3::from_cols(
        DVec3::new(f, 0.0, 0.0),
        DVec3::new(0.0, f, 0.0),
        DVec3::new(WIDTH as f64 * 0.5, HEIGHT as f64 * 0.5, 1.0),
    );
    // Slight downward tilt
    let rotation = DMat3::from_rotation_x(-0.12);
    CameraMatrix::from_intrinsics(k, rotation, DVec3::new(0.0, -0.4, 0.5))
}

/// Coarse text preview of the silhouette, one character per 4x8 block.
fn ascii_preview(image: &DepthImage) -> String {
    let max = image.as_slice().iter().cloned().fold(0.0, f64::max);
    let ramp = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];
    let mut out = String::new();
    for y in (0..image.height()).step_by(8) {
        for x in (0..image.width()).step_by(4) {
            let v = image.read(x, y);
            let c = if v <= 0.0 || max <= 0.0 {
                ' '
            } else {
                let idx = ((v / max) * (ramp.len() - 1) as f64).round() as usize;
                ramp[idx.clamp(1, ramp.len() - 1)]
            };
            out.push(c);
        }
        out.push('\n');
    }
    out
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("=== Depth Raster - Inverse Depth Renderer ===");

    let mesh = build_scene();
    let camera = build_camera();
    log::info!(
        "Scene: {} vertices, {} triangles, {}x{} output",
        mesh.vertices.len(),
        mesh.triangle_count(),
        WIDTH,
        HEIGHT
    );

    FUNCTION_COUNTERS.reset();
    let (sequential, seq_stats) =
        rendering::render_mesh_with_stats(&mesh, &camera, HEIGHT, WIDTH, &RenderConfig::default());
    let (parallel, par_stats) =
        rendering::render_mesh_with_stats(&mesh, &camera, HEIGHT, WIDTH, &RenderConfig::parallel());

    anyhow::ensure!(
        sequential == parallel,
        "parallel render diverged from sequential render"
    );

    log::info!(
        "Sequential: {} pixels covered in {:.2}ms",
        seq_stats.covered_pixels,
        seq_stats.elapsed.as_secs_f64() * 1000.0
    );
    log::info!(
        "Parallel:   {} pixels covered in {:.2}ms ({} threads)",
        par_stats.covered_pixels,
        par_stats.elapsed.as_secs_f64() * 1000.0,
        rayon::current_num_threads()
    );

    let nearest = sequential.as_slice().iter().cloned().fold(0.0, f64::max);
    if nearest > 0.0 {
        log::info!("Nearest surface depth: {:.4}", 1.0 / nearest);
    }

    FUNCTION_COUNTERS.snapshot().log_report();

    println!("{}", ascii_preview(&sequential));
    Ok(())
}

/// Scanline rasterizer for inverse-depth rendering
/// Splits each triangle into flat-sided pieces and fills them column by column
use super::depth_image::{AtomicDepthImage, DepthImage};
use super::edge::{line_y_at_x, solve_depth_at_x, solve_depth_at_y};
use crate::camera::ScreenVertex;
use crate::count_call;
use crate::mesh::Triangle;

/// Columns whose covered span is shorter than this are skipped.
pub const MIN_SPAN_HEIGHT: f64 = 0.5;

/// Abstraction over a render target that accepts depth samples.
pub trait DepthTarget {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Nearest-wins depth write. `x` and `y` are already bounds-checked.
    fn accumulate(&mut self, x: usize, y: usize, depth: f64);
}

impl DepthTarget for DepthImage {
    #[inline]
    fn width(&self) -> usize {
        DepthImage::width(self)
    }

    #[inline]
    fn height(&self) -> usize {
        DepthImage::height(self)
    }

    #[inline]
    fn accumulate(&mut self, x: usize, y: usize, depth: f64) {
        DepthImage::accumulate(self, x, y, depth);
    }
}

impl<'a> DepthTarget for &'a AtomicDepthImage {
    #[inline]
    fn width(&self) -> usize {
        AtomicDepthImage::width(self)
    }

    #[inline]
    fn height(&self) -> usize {
        AtomicDepthImage::height(self)
    }

    #[inline]
    fn accumulate(&mut self, x: usize, y: usize, depth: f64) {
        AtomicDepthImage::accumulate(self, x, y, depth);
    }
}

/// Which side of a flat-sided triangle carries the vertical edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlatSide {
    /// Flat edge at low x, apex at high x.
    Left,
    /// Flat edge at high x, apex at low x.
    Right,
}

/// Round-half-up to the nearest integer.
#[inline]
fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanlineRasterizer;

impl ScanlineRasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Rasterize one projected triangle into `target`.
    ///
    /// Degenerate input (collinear points, vertices projecting to infinity,
    /// sub-pixel slivers, geometry outside the image) draws nothing.
    pub fn rasterize_triangle<T: DepthTarget>(&self, triangle: &Triangle, target: &mut T) {
        count_call!(crate::perf::FUNCTION_COUNTERS.triangles_processed);

        if target.width() == 0 || target.height() == 0 {
            return;
        }
        if !triangle.vertices.iter().all(ScreenVertex::is_finite) {
            count_call!(crate::perf::FUNCTION_COUNTERS.triangles_degenerate);
            log::trace!("skipping triangle with non-finite screen position: {:?}", triangle);
            return;
        }

        // Sort by screen x, descending: v1 has max x, v3 min x
        let mut sorted = triangle.vertices;
        sorted.sort_by(|a, b| b.x.total_cmp(&a.x));
        let [v1, v2, v3] = sorted;

        if v2.x == v3.x {
            self.fill_flat_sided(v1, [v2, v3], FlatSide::Left, target);
        } else if v1.x == v2.x {
            self.fill_flat_sided(v3, [v1, v2], FlatSide::Right, target);
        } else {
            count_call!(crate::perf::FUNCTION_COUNTERS.triangles_split);
            // Split vertex on the long edge v1-v3, at the column of v2
            let v4 = ScreenVertex::new(
                v2.x,
                line_y_at_x(v2.x, &v1, &v3),
                solve_depth_at_x(v2.x, &v1, &v3),
            );
            self.fill_flat_sided(v1, [v2, v4], FlatSide::Left, target);
            self.fill_flat_sided(v3, [v2, v4], FlatSide::Right, target);
        }
    }

    /// Fill a triangle with one vertical edge (`flat`, both at the same x),
    /// sweeping integer columns from the apex toward the flat edge.
    fn fill_flat_sided<T: DepthTarget>(
        &self,
        apex: ScreenVertex,
        flat: [ScreenVertex; 2],
        side: FlatSide,
        target: &mut T,
    ) {
        let flat_x = flat[0].x;
        if apex.x == flat_x {
            count_call!(crate::perf::FUNCTION_COUNTERS.triangles_degenerate);
            log::trace!("skipping zero-width triangle piece at x = {}", flat_x);
            return;
        }

        let (upper, lower) = if flat[0].y <= flat[1].y {
            (flat[0], flat[1])
        } else {
            (flat[1], flat[0])
        };

        let (x_min, x_max) = match side {
            FlatSide::Left => (flat_x, apex.x),
            FlatSide::Right => (apex.x, flat_x),
        };

        // Integer columns inside [x_min, x_max], clamped to the image
        let last_column = target.width() as i64 - 1;
        let first = (x_min.ceil() as i64).max(0);
        let last = (x_max.floor() as i64).min(last_column);
        if first > last {
            return;
        }

        let count = last - first + 1;
        for i in 0..count {
            let x = match side {
                FlatSide::Left => last - i,
                FlatSide::Right => first + i,
            };
            let xf = x as f64;
            let top = ScreenVertex::new(
                xf,
                line_y_at_x(xf, &apex, &upper),
                solve_depth_at_x(xf, &apex, &upper),
            );
            let bottom = ScreenVertex::new(
                xf,
                line_y_at_x(xf, &apex, &lower),
                solve_depth_at_x(xf, &apex, &lower),
            );
            self.fill_column(x as usize, top, bottom, target);
        }
    }

    /// Fill the vertical span between two boundary points of column `x`.
    fn fill_column<T: DepthTarget>(
        &self,
        x: usize,
        a: ScreenVertex,
        b: ScreenVertex,
        target: &mut T,
    ) {
        let (start, end) = if a.y <= b.y { (a, b) } else { (b, a) };

        // Also rejects NaN heights
        if !(end.y - start.y >= MIN_SPAN_HEIGHT) {
            count_call!(crate::perf::FUNCTION_COUNTERS.columns_skipped);
            return;
        }

        let last_row = target.height() as i64 - 1;
        let y_first = round_half_up(start.y).max(0);
        let y_last = round_half_up(end.y).min(last_row);
        if y_first > y_last {
            return;
        }

        count_call!(crate::perf::FUNCTION_COUNTERS.columns_filled);
        for y in y_first..=y_last {
            let depth = solve_depth_at_y(y as f64, &start, &end);
            target.accumulate(x, y as usize, depth);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every write, so tests can inspect coverage without the
    /// nearest-wins rule getting in the way.
    struct RecordingTarget {
        width: usize,
        height: usize,
        writes: Vec<(usize, usize, f64)>,
    }

    impl RecordingTarget {
        fn new(width: usize, height: usize) -> Self {
            Self {
                width,
                height,
                writes: Vec::new(),
            }
        }
    }

    impl DepthTarget for RecordingTarget {
        fn width(&self) -> usize {
            self.width
        }

        fn height(&self) -> usize {
            self.height
        }

        fn accumulate(&mut self, x: usize, y: usize, depth: f64) {
            assert!(x < self.width && y < self.height, "write out of bounds");
            self.writes.push((x, y, depth));
        }
    }

    fn v(x: f64, y: f64, d: f64) -> ScreenVertex {
        ScreenVertex::new(x, y, d)
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(1.5), 2);
        assert_eq!(round_half_up(1.49), 1);
        assert_eq!(round_half_up(-0.5), 0);
        assert_eq!(round_half_up(-0.51), -1);
    }

    #[test]
    fn test_flat_left_triangle_covers_columns() {
        // Vertical edge at x = 0 from y = 0..4, apex at (4, 2)
        let tri = Triangle::new(v(0.0, 0.0, 1.0), v(0.0, 4.0, 1.0), v(4.0, 2.0, 1.0));
        let mut target = RecordingTarget::new(8, 8);
        ScanlineRasterizer::new().rasterize_triangle(&tri, &mut target);

        let columns: std::collections::BTreeSet<usize> =
            target.writes.iter().map(|w| w.0).collect();
        // Column 4 is the apex itself and has zero height
        assert_eq!(columns.into_iter().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert!(target.writes.contains(&(0, 0, 1.0)));
        assert!(target.writes.contains(&(0, 4, 1.0)));
        assert!(target.writes.iter().all(|w| w.2 == 1.0));
    }

    #[test]
    fn test_flat_right_triangle_covers_columns() {
        let tri = Triangle::new(v(5.0, 1.0, 2.0), v(1.0, 3.0, 2.0), v(5.0, 5.0, 2.0));
        let mut target = RecordingTarget::new(8, 8);
        ScanlineRasterizer::new().rasterize_triangle(&tri, &mut target);

        let columns: std::collections::BTreeSet<usize> =
            target.writes.iter().map(|w| w.0).collect();
        assert_eq!(columns.into_iter().collect::<Vec<_>>(), vec![2, 3, 4, 5]);
        // Full flat column 5 spans rows 1..=5
        let col5: Vec<usize> = target
            .writes
            .iter()
            .filter(|w| w.0 == 5)
            .map(|w| w.1)
            .collect();
        assert_eq!(col5, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_general_triangle_is_split() {
        let tri = Triangle::new(v(0.0, 0.0, 1.0), v(3.0, 6.0, 1.0), v(6.0, 1.0, 1.0));
        let mut target = RecordingTarget::new(8, 8);
        ScanlineRasterizer::new().rasterize_triangle(&tri, &mut target);

        let columns: std::collections::BTreeSet<usize> =
            target.writes.iter().map(|w| w.0).collect();
        assert!(columns.contains(&1));
        assert!(columns.contains(&3));
        assert!(columns.contains(&5));
        // Column 3 passes through the split vertex and the mid vertex
        assert!(target.writes.iter().any(|w| w.0 == 3 && w.1 == 6));
    }

    #[test]
    fn test_collinear_triangle_draws_nothing() {
        let tri = Triangle::new(v(0.0, 0.0, 1.0), v(2.0, 2.0, 1.0), v(4.0, 4.0, 1.0));
        let mut target = RecordingTarget::new(8, 8);
        ScanlineRasterizer::new().rasterize_triangle(&tri, &mut target);
        assert!(target.writes.is_empty());
    }

    #[test]
    fn test_vertical_line_triangle_draws_nothing() {
        let tri = Triangle::new(v(2.0, 0.0, 1.0), v(2.0, 3.0, 1.0), v(2.0, 6.0, 1.0));
        let mut target = RecordingTarget::new(8, 8);
        ScanlineRasterizer::new().rasterize_triangle(&tri, &mut target);
        assert!(target.writes.is_empty());
    }

    #[test]
    fn test_thin_sliver_draws_nothing() {
        // Span height never exceeds 0.4 pixels
        let tri = Triangle::new(v(0.0, 2.0, 1.0), v(0.0, 2.4, 1.0), v(6.0, 2.2, 1.0));
        let mut target = RecordingTarget::new(8, 8);
        ScanlineRasterizer::new().rasterize_triangle(&tri, &mut target);
        assert!(target.writes.is_empty());
    }

    #[test]
    fn test_offscreen_triangle_draws_nothing() {
        let tri = Triangle::new(
            v(-20.0, -20.0, 1.0),
            v(-10.0, -20.0, 1.0),
            v(-15.0, -5.0, 1.0),
        );
        let mut target = RecordingTarget::new(8, 8);
        ScanlineRasterizer::new().rasterize_triangle(&tri, &mut target);
        assert!(target.writes.is_empty());
    }

    #[test]
    fn test_partially_offscreen_triangle_is_clamped() {
        let tri = Triangle::new(
            v(-10.0, -10.0, 1.0),
            v(20.0, -10.0, 1.0),
            v(-10.0, 20.0, 1.0),
        );
        let mut target = RecordingTarget::new(4, 4);
        ScanlineRasterizer::new().rasterize_triangle(&tri, &mut target);
        // RecordingTarget asserts bounds on every write
        assert!(!target.writes.is_empty());
    }

    #[test]
    fn test_non_finite_vertex_draws_nothing() {
        let tri = Triangle::new(
            v(f64::INFINITY, 0.0, 0.0),
            v(1.0, 1.0, 1.0),
            v(3.0, 5.0, 1.0),
        );
        let mut target = RecordingTarget::new(8, 8);
        ScanlineRasterizer::new().rasterize_triangle(&tri, &mut target);
        assert!(target.writes.is_empty());
    }

    #[test]
    fn test_zero_sized_target() {
        let tri = Triangle::new(v(0.0, 0.0, 1.0), v(3.0, 6.0, 1.0), v(6.0, 1.0, 1.0));
        let mut target = RecordingTarget::new(0, 0);
        ScanlineRasterizer::new().rasterize_triangle(&tri, &mut target);
        assert!(target.writes.is_empty());
    }

    #[test]
    fn test_writes_into_depth_image() {
        let tri = Triangle::new(v(0.0, 0.0, 4.0), v(3.0, 0.0, 4.0), v(0.0, 3.0, 4.0));
        let mut img = DepthImage::new(4, 4);
        ScanlineRasterizer::new().rasterize_triangle(&tri, &mut img);
        assert_eq!(img.read(0, 0), 0.25);
        assert_eq!(img.read(3, 3), 0.0);
    }
}

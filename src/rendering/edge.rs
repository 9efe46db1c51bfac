//! Perspective-correct depth along a projected edge.
//!
//! Screen coordinates are camera-space X (or Y) divided by camera-space Z, so
//! they are not linear along a 3D edge. The products `x * depth` and `depth`
//! are, being the affine camera-space X and Z. Solving
//!
//! ```text
//! x = (X0 + t (X1 - X0)) / (d0 + t (d1 - d0)),   Xi = xi * di
//! ```
//!
//! for the depth at the solution gives the closed form used below, without
//! extracting `t`.
//!
//! Both endpoints must differ along the solved axis; a zero-length edge
//! divides zero by zero. The scanline rasterizer never hands such an edge in.

use crate::camera::ScreenVertex;

/// Screen axis an edge is solved along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    fn coord(self, v: &ScreenVertex) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }
}

/// Depth at screen coordinate `target` on the edge `start`-`end`, solved
/// along `axis`.
#[inline]
pub fn solve_depth(axis: Axis, target: f64, start: &ScreenVertex, end: &ScreenVertex) -> f64 {
    let (c0, d0) = (axis.coord(start), start.depth);
    let (c1, d1) = (axis.coord(end), end.depth);
    // Constant depth along the edge. The closed form below only reaches d0
    // up to rounding here.
    if d0 == d1 {
        return d0;
    }
    let p0 = c0 * d0;
    let p1 = c1 * d1;
    (p0 * d1 - p1 * d0) / (target * d1 - target * d0 - p1 + p0)
}

/// Depth where the edge crosses screen column `x`.
#[inline]
pub fn solve_depth_at_x(x: f64, start: &ScreenVertex, end: &ScreenVertex) -> f64 {
    solve_depth(Axis::X, x, start, end)
}

/// Depth where the edge crosses screen row `y`.
#[inline]
pub fn solve_depth_at_y(y: f64, start: &ScreenVertex, end: &ScreenVertex) -> f64 {
    solve_depth(Axis::Y, y, start, end)
}

/// Screen-space y of the 2D line `start`-`end` at column `x`. Straight
/// edges stay straight after projection, so plain linear interpolation is
/// exact here; only depth needs the perspective solve.
#[inline]
pub fn line_y_at_x(x: f64, start: &ScreenVertex, end: &ScreenVertex) -> f64 {
    start.y + (x - start.x) * (end.y - start.y) / (end.x - start.x)
}

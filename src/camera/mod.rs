/// Pinhole projection from a 3x4 camera matrix
/// Maps world-space vertices to screen space while retaining camera-space depth
use crate::mesh::TriangleMesh;
use glam::{DMat3, DVec3, DVec4};

/// A projected vertex: perspective-divided screen position plus the
/// un-divided camera-space depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenVertex {
    pub x: f64,
    pub y: f64,
    pub depth: f64,
}

impl ScreenVertex {
    #[inline]
    pub const fn new(x: f64, y: f64, depth: f64) -> Self {
        Self { x, y, depth }
    }

    /// True when both screen coordinates are finite. Vertices lying on the
    /// camera plane project to infinity and cannot be rasterized.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Camera matrix P = K * [R | t], stored as three rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMatrix {
    pub rows: [DVec4; 3],
}

impl CameraMatrix {
    pub fn from_rows(rows: [[f64; 4]; 3]) -> Self {
        Self {
            rows: [
                DVec4::from_array(rows[0]),
                DVec4::from_array(rows[1]),
                DVec4::from_array(rows[2]),
            ],
        }
    }

    /// Build from 12 values laid out row by row.
    ///
    /// # Panics
    /// Panics if `values` does not hold exactly 12 entries.
    pub fn from_row_major(values: &[f64]) -> Self {
        assert_eq!(values.len(), 12, "camera matrix needs 12 values");
        let mut rows = [[0.0; 4]; 3];
        for (r, row) in rows.iter_mut().enumerate() {
            row.copy_from_slice(&values[r * 4..r * 4 + 4]);
        }
        Self::from_rows(rows)
    }

    /// Build from 12 values laid out column by column (host array order).
    ///
    /// # Panics
    /// Panics if `values` does not hold exactly 12 entries.
    pub fn from_column_major(values: &[f64]) -> Self {
        assert_eq!(values.len(), 12, "camera matrix needs 12 values");
        let mut rows = [[0.0; 4]; 3];
        for c in 0..4 {
            for r in 0..3 {
                rows[r][c] = values[c * 3 + r];
            }
        }
        Self::from_rows(rows)
    }

    /// Compose P = K * [R | t] from intrinsics and extrinsics.
    pub fn from_intrinsics(k: DMat3, rotation: DMat3, translation: DVec3) -> Self {
        let kr = k * rotation;
        let kt = k * translation;
        let row = |i: usize| {
            let r = kr.row(i);
            DVec4::new(r.x, r.y, r.z, kt[i])
        };
        Self {
            rows: [row(0), row(1), row(2)],
        }
    }

    /// Camera-space coordinates (x', y', z') = P * (X, Y, Z, 1).
    #[inline]
    pub fn camera_point(&self, point: DVec3) -> DVec3 {
        let h = point.extend(1.0);
        DVec3::new(self.rows[0].dot(h), self.rows[1].dot(h), self.rows[2].dot(h))
    }

    /// Project a world-space point to screen space. No clipping happens
    /// here: a point at or behind the camera still yields a vertex, with
    /// non-positive depth or non-finite screen coordinates.
    #[inline]
    pub fn project(&self, point: DVec3) -> ScreenVertex {
        let c = self.camera_point(point);
        ScreenVertex::new(c.x / c.z, c.y / c.z, c.z)
    }

    /// Project every vertex of `mesh` once, in vertex order.
    pub fn project_mesh(&self, mesh: &TriangleMesh) -> Vec<ScreenVertex> {
        mesh.vertices.iter().map(|&v| self.project(v)).collect()
    }
}

/// Triangle mesh input and projected triangle assembly
use crate::camera::ScreenVertex;
use glam::DVec3;

/// Zero-based vertex indices of one triangle.
pub type Face = [usize; 3];

/// Indexed triangle mesh in world space.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    pub vertices: Vec<DVec3>,
    pub faces: Vec<Face>,
}

impl TriangleMesh {
    pub fn new(vertices: Vec<DVec3>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// Assemble screen-space triangles from already projected vertices.
    ///
    /// Face indices must be in range; the binding layer guarantees this.
    pub fn assemble(&self, projected: &[ScreenVertex]) -> Vec<Triangle> {
        self.faces
            .iter()
            .map(|&[a, b, c]| Triangle::new(projected[a], projected[b], projected[c]))
            .collect()
    }

    /// Append a quad as two triangles (a, b, c) and (a, c, d).
    pub fn push_quad(&mut self, corners: [DVec3; 4]) {
        let base = self.vertices.len();
        self.vertices.extend_from_slice(&corners);
        self.faces.push([base, base + 1, base + 2]);
        self.faces.push([base, base + 2, base + 3]);
    }

    /// Latitude/longitude sphere, mostly used by the demo and benches.
    pub fn uv_sphere(center: DVec3, radius: f64, stacks: usize, slices: usize) -> Self {
        let stacks = stacks.max(2);
        let slices = slices.max(3);
        let mut mesh = Self::default();

        for i in 0..=stacks {
            let phi = std::f64::consts::PI * i as f64 / stacks as f64;
            for j in 0..slices {
                let theta = std::f64::consts::TAU * j as f64 / slices as f64;
                let direction =
                    DVec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
                mesh.vertices.push(center + radius * direction);
            }
        }

        for i in 0..stacks {
            for j in 0..slices {
                let a = i * slices + j;
                let b = i * slices + (j + 1) % slices;
                let c = (i + 1) * slices + (j + 1) % slices;
                let d = (i + 1) * slices + j;
                mesh.faces.push([a, b, c]);
                mesh.faces.push([a, c, d]);
            }
        }

        mesh
    }
}

/// Three projected vertices. Triangles are independent and carry their
/// vertices by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [ScreenVertex; 3],
}

impl Triangle {
    #[inline]
    pub const fn new(a: ScreenVertex, b: ScreenVertex, c: ScreenVertex) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }
}

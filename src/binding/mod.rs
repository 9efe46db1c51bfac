/// Host binding layer
/// Validates column-major host arrays and marshals the rendered image back
///
/// The rendering core trusts its inputs. Every shape and range check lives
/// here, so a request that gets past `RenderRequest::from_host_arrays` can
/// be rendered without further checks.
pub mod error;

pub use error::BindingError;

use crate::camera::CameraMatrix;
use crate::mesh::{Face, TriangleMesh};
use crate::rendering::{render_mesh, RenderConfig};
use glam::DVec3;

const NUM_INPUTS: usize = 4;
const NUM_OUTPUTS: usize = 1;

/// Largest accepted image dimension.
pub const MAX_IMAGE_DIMENSION: usize = 1 << 16;

/// Largest accepted `height * width`, 512 MiB of f64 cells.
pub const MAX_IMAGE_CELLS: usize = 1 << 26;

/// Dense 2D array in host (column-major) layout.
#[derive(Debug, Clone, PartialEq)]
pub struct HostArray {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f64>,
}

impl HostArray {
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        Self { rows, cols, data }
    }

    /// Build from row-major nested rows.
    ///
    /// # Panics
    /// Panics if the rows differ in length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Self {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = vec![0.0; n_rows * n_cols];
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            assert_eq!(
                row.len(),
                n_cols,
                "row {} has {} columns, expected {}",
                r,
                row.len(),
                n_cols
            );
            for (c, &v) in row.iter().enumerate() {
                data[c * n_rows + r] = v;
            }
        }
        Self::new(n_rows, n_cols, data)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[col * self.rows + row]
    }
}

/// Base of the face indices supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexBase {
    #[default]
    Zero,
    One,
}

impl IndexBase {
    fn offset(self) -> f64 {
        match self {
            IndexBase::Zero => 0.0,
            IndexBase::One => 1.0,
        }
    }
}

/// Binding-layer configuration. Verbosity is passed in explicitly rather
/// than read from process-wide state.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingConfig {
    /// 0 silences warnings, 1 warns on suspicious input, 2+ also logs a
    /// summary of every accepted request
    pub verbose_level: u32,
    pub index_base: IndexBase,
    /// Identifier prefix for errors
    pub component: String,
    /// Function name used in error identifiers
    pub function_name: String,
    pub render: RenderConfig,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            verbose_level: 1,
            index_base: IndexBase::Zero,
            component: "MATLAB".to_string(),
            function_name: "render_depth".to_string(),
            render: RenderConfig::default(),
        }
    }
}

impl BindingConfig {
    /// Identifier for `err` under this configuration.
    pub fn error_identifier(&self, err: &BindingError) -> String {
        err.identifier(&self.component, &self.function_name)
    }
}

/// A validated render call.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub mesh: TriangleMesh,
    pub camera: CameraMatrix,
    pub height: usize,
    pub width: usize,
    pub render: RenderConfig,
}

impl RenderRequest {
    /// Validate the four host inputs `[vertices, faces, image_size, camera]`.
    pub fn from_host_arrays(
        inputs: &[HostArray],
        n_outputs: usize,
        config: &BindingConfig,
    ) -> Result<Self, BindingError> {
        if inputs.len() != NUM_INPUTS {
            return Err(BindingError::InputCount {
                expected: NUM_INPUTS,
                actual: inputs.len(),
            });
        }
        if n_outputs != NUM_OUTPUTS {
            return Err(BindingError::OutputCount {
                expected: NUM_OUTPUTS,
                actual: n_outputs,
            });
        }

        let (vertices, faces, image_size, camera) =
            (&inputs[0], &inputs[1], &inputs[2], &inputs[3]);

        check_shape(vertices, "vertices", "Nx3 with N >= 1", |r, c| r >= 1 && c == 3)?;
        check_shape(faces, "faces", "Mx3 with M >= 1", |r, c| r >= 1 && c == 3)?;
        check_shape(image_size, "image_size", "1x2", |r, c| r == 1 && c == 2)?;
        check_shape(camera, "camera", "3x4", |r, c| r == 3 && c == 4)?;

        let vertex_list = read_vertices(vertices)?;
        let face_list = read_faces(faces, vertex_list.len(), config.index_base)?;
        let height = read_dimension(image_size.get(0, 0), "height")?;
        let width = read_dimension(image_size.get(0, 1), "width")?;
        if height.checked_mul(width).map_or(true, |n| n > MAX_IMAGE_CELLS) {
            return Err(BindingError::Assertion {
                argument: "image_size",
                message: format!(
                    "{}x{} image exceeds the limit of {} pixels",
                    height, width, MAX_IMAGE_CELLS
                ),
            });
        }

        if let Some(bad) = camera.data.iter().find(|v| !v.is_finite()) {
            return Err(BindingError::Assertion {
                argument: "camera",
                message: format!("entries must be finite, found {}", bad),
            });
        }
        let camera = CameraMatrix::from_column_major(&camera.data);

        let request = Self {
            mesh: TriangleMesh::new(vertex_list, face_list),
            camera,
            height,
            width,
            render: config.render.clone(),
        };
        request.report(config.verbose_level);
        Ok(request)
    }

    /// Render and marshal the result as a `height` x `width` host array.
    pub fn render(&self) -> HostArray {
        let image = render_mesh(
            &self.mesh,
            &self.camera,
            self.height,
            self.width,
            &self.render,
        );
        crate::perf_scope!("marshal_column_major");
        HostArray::new(self.height, self.width, image.to_column_major())
    }

    fn report(&self, verbose_level: u32) {
        if verbose_level >= 1 {
            let behind = self
                .mesh
                .vertices
                .iter()
                .filter(|&&v| self.camera.camera_point(v).z <= 0.0)
                .count();
            if behind > 0 {
                log::warn!(
                    "{} of {} vertices lie on or behind the camera plane; \
                     triangles crossing it are not clipped",
                    behind,
                    self.mesh.vertices.len()
                );
            }
        }
        if verbose_level >= 2 {
            log::debug!(
                "render request: {} vertices, {} faces, {}x{} output, {:?}",
                self.mesh.vertices.len(),
                self.mesh.faces.len(),
                self.height,
                self.width,
                self.render.mode
            );
        }
    }
}

/// Validate, render and marshal in one call.
pub fn render_depth(
    inputs: &[HostArray],
    n_outputs: usize,
    config: &BindingConfig,
) -> Result<HostArray, BindingError> {
    let request = RenderRequest::from_host_arrays(inputs, n_outputs, config)?;
    Ok(request.render())
}

fn check_shape(
    array: &HostArray,
    argument: &'static str,
    expected: &str,
    ok: impl Fn(usize, usize) -> bool,
) -> Result<(), BindingError> {
    if !ok(array.rows, array.cols) {
        return Err(BindingError::InputShape {
            argument,
            expected: expected.to_string(),
            rows: array.rows,
            cols: array.cols,
        });
    }
    let needed = array.rows * array.cols;
    if array.data.len() != needed {
        return Err(BindingError::DataLength {
            argument,
            expected: needed,
            actual: array.data.len(),
        });
    }
    Ok(())
}

fn read_vertices(array: &HostArray) -> Result<Vec<DVec3>, BindingError> {
    (0..array.rows)
        .map(|r| {
            let v = DVec3::new(array.get(r, 0), array.get(r, 1), array.get(r, 2));
            if v.is_finite() {
                Ok(v)
            } else {
                Err(BindingError::Assertion {
                    argument: "vertices",
                    message: format!("vertex {} is not finite: {}", r, v),
                })
            }
        })
        .collect()
}

fn read_faces(
    array: &HostArray,
    vertex_count: usize,
    base: IndexBase,
) -> Result<Vec<Face>, BindingError> {
    let offset = base.offset();
    let mut faces = Vec::with_capacity(array.rows);
    for r in 0..array.rows {
        let mut face = [0usize; 3];
        for (c, slot) in face.iter_mut().enumerate() {
            let raw = array.get(r, c);
            let index = raw - offset;
            if !(index.is_finite() && index.fract() == 0.0 && index >= 0.0) {
                return Err(BindingError::Assertion {
                    argument: "faces",
                    message: format!("face {} has invalid index {}", r, raw),
                });
            }
            if index >= vertex_count as f64 {
                return Err(BindingError::Assertion {
                    argument: "faces",
                    message: format!(
                        "face {} references vertex {} but only {} vertices exist",
                        r, raw, vertex_count
                    ),
                });
            }
            *slot = index as usize;
        }
        faces.push(face);
    }
    Ok(faces)
}

fn read_dimension(value: f64, name: &str) -> Result<usize, BindingError> {
    if value.is_finite()
        && value.fract() == 0.0
        && value >= 1.0
        && value <= MAX_IMAGE_DIMENSION as f64
    {
        Ok(value as usize)
    } else {
        Err(BindingError::Assertion {
            argument: "image_size",
            message: format!(
                "{} must be a positive integer no larger than {}, got {}",
                name, MAX_IMAGE_DIMENSION, value
            ),
        })
    }
}

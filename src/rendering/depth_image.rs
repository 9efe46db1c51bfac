/// Inverse-depth accumulation buffer
/// One f64 per pixel, row-major, zero meaning "no surface seen"
///
/// The update rule is a per-pixel maximum of 1/d, which is commutative and
/// associative: triangles may be drawn in any order, or concurrently through
/// `AtomicDepthImage`, with bitwise identical results.
use crate::count_call;
use std::sync::atomic::{AtomicU64, Ordering};

/// Samples with camera-space depth below this are discarded.
pub const MIN_DEPTH: f64 = 1e-5;

#[derive(Debug, Clone, PartialEq)]
pub struct DepthImage {
    width: usize,
    height: usize,
    cells: Vec<f64>,
}

impl DepthImage {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0.0; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Record a depth sample at (x, y), keeping the nearest surface.
    /// Callers must bounds-check `x` and `y`.
    #[inline]
    pub fn accumulate(&mut self, x: usize, y: usize, depth: f64) -> bool {
        count_call!(crate::perf::FUNCTION_COUNTERS.accumulate_attempts);
        // Negated test so NaN is rejected as well.
        if !(depth >= MIN_DEPTH) {
            count_call!(crate::perf::FUNCTION_COUNTERS.accumulate_rejected);
            return false;
        }
        let inv = 1.0 / depth;
        let cell = &mut self.cells[y * self.width + x];
        if inv > *cell {
            *cell = inv;
            count_call!(crate::perf::FUNCTION_COUNTERS.accumulate_updated);
            true
        } else {
            false
        }
    }

    /// Current accumulator value. Callers must bounds-check.
    #[inline]
    pub fn read(&self, x: usize, y: usize) -> f64 {
        self.cells[y * self.width + x]
    }

    /// Bounds-checked read.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x < self.width && y < self.height {
            Some(self.read(x, y))
        } else {
            None
        }
    }

    /// Row-major cell slice, index `y * width + x`.
    pub fn as_slice(&self) -> &[f64] {
        &self.cells
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        // chunks_exact panics on zero, and a zero-width image has no rows anyway
        self.cells.chunks_exact(self.width.max(1))
    }

    /// Per-pixel maximum merge of a partial buffer into this one.
    ///
    /// # Panics
    /// Panics if the two images differ in size.
    pub fn merge_max(&mut self, other: &DepthImage) {
        assert_eq!(
            (self.width, self.height),
            (other.width, other.height),
            "merged depth images must have equal size"
        );
        for (dst, &src) in self.cells.iter_mut().zip(&other.cells) {
            if src > *dst {
                *dst = src;
            }
        }
    }

    /// Mask of pixels whose inverse depth exceeds `threshold`.
    pub fn silhouette(&self, threshold: f64) -> Vec<bool> {
        self.cells.iter().map(|&v| v > threshold).collect()
    }

    pub fn covered_pixel_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v > 0.0).count()
    }

    /// Cells in column-major order (`x * height + y`), the layout
    /// expected by column-major hosts.
    pub fn to_column_major(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.cells.len()];
        for (y, row) in self.rows().enumerate().take(self.height) {
            for (x, &v) in row.iter().enumerate() {
                out[x * self.height + y] = v;
            }
        }
        out
    }
}

/// Depth image whose cells can be updated concurrently.
///
/// Cells hold the bit pattern of a non-negative f64. For non-negative
/// finite doubles the IEEE-754 bit order matches numeric order, so an
/// integer `fetch_max` is an atomic max on the inverse depth.
pub struct AtomicDepthImage {
    width: usize,
    height: usize,
    cells: Vec<AtomicU64>,
}

impl AtomicDepthImage {
    pub fn new(width: usize, height: usize) -> Self {
        let zero = 0.0f64.to_bits();
        Self {
            width,
            height,
            cells: (0..width * height).map(|_| AtomicU64::new(zero)).collect(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Same contract as `DepthImage::accumulate`, callable through a shared
    /// reference.
    #[inline]
    pub fn accumulate(&self, x: usize, y: usize, depth: f64) -> bool {
        count_call!(crate::perf::FUNCTION_COUNTERS.accumulate_attempts);
        if !(depth >= MIN_DEPTH) {
            count_call!(crate::perf::FUNCTION_COUNTERS.accumulate_rejected);
            return false;
        }
        let bits = (1.0 / depth).to_bits();
        let previous = self.cells[y * self.width + x].fetch_max(bits, Ordering::Relaxed);
        let updated = previous < bits;
        if updated {
            count_call!(crate::perf::FUNCTION_COUNTERS.accumulate_updated);
        }
        updated
    }

    #[inline]
    pub fn read(&self, x: usize, y: usize) -> f64 {
        f64::from_bits(self.cells[y * self.width + x].load(Ordering::Relaxed))
    }

    /// Collapse into a plain `DepthImage` once all writers are done.
    pub fn into_depth_image(self) -> DepthImage {
        DepthImage {
            width: self.width,
            height: self.height,
            cells: self
                .cells
                .into_iter()
                .map(|c| f64::from_bits(c.into_inner()))
                .collect(),
        }
    }
}

/// Instrumentation for the render path
/// Provides call counting for rasterization and depth accumulation
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe performance counters for function call tracking
pub struct FunctionCounters {
    // Orchestration counters
    pub render_calls: AtomicU64,
    pub triangles_submitted: AtomicU64,
    pub triangles_processed: AtomicU64,
    pub triangles_split: AtomicU64,
    pub triangles_degenerate: AtomicU64,

    // Scanline counters
    pub columns_filled: AtomicU64,
    pub columns_skipped: AtomicU64,

    // Depth image counters
    pub accumulate_attempts: AtomicU64,
    pub accumulate_rejected: AtomicU64,
    pub accumulate_updated: AtomicU64,
}

impl FunctionCounters {
    pub const fn new() -> Self {
        Self {
            render_calls: AtomicU64::new(0),
            triangles_submitted: AtomicU64::new(0),
            triangles_processed: AtomicU64::new(0),
            triangles_split: AtomicU64::new(0),
            triangles_degenerate: AtomicU64::new(0),
            columns_filled: AtomicU64::new(0),
            columns_skipped: AtomicU64::new(0),
            accumulate_attempts: AtomicU64::new(0),
            accumulate_rejected: AtomicU64::new(0),
            accumulate_updated: AtomicU64::new(0),
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.render_calls.store(0, Ordering::Relaxed);
        self.triangles_submitted.store(0, Ordering::Relaxed);
        self.triangles_processed.store(0, Ordering::Relaxed);
        self.triangles_split.store(0, Ordering::Relaxed);
        self.triangles_degenerate.store(0, Ordering::Relaxed);
        self.columns_filled.store(0, Ordering::Relaxed);
        self.columns_skipped.store(0, Ordering::Relaxed);
        self.accumulate_attempts.store(0, Ordering::Relaxed);
        self.accumulate_rejected.store(0, Ordering::Relaxed);
        self.accumulate_updated.store(0, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            render_calls: self.render_calls.load(Ordering::Relaxed),
            triangles_submitted: self.triangles_submitted.load(Ordering::Relaxed),
            triangles_processed: self.triangles_processed.load(Ordering::Relaxed),
            triangles_split: self.triangles_split.load(Ordering::Relaxed),
            triangles_degenerate: self.triangles_degenerate.load(Ordering::Relaxed),
            columns_filled: self.columns_filled.load(Ordering::Relaxed),
            columns_skipped: self.columns_skipped.load(Ordering::Relaxed),
            accumulate_attempts: self.accumulate_attempts.load(Ordering::Relaxed),
            accumulate_rejected: self.accumulate_rejected.load(Ordering::Relaxed),
            accumulate_updated: self.accumulate_updated.load(Ordering::Relaxed),
        }
    }
}

impl Default for FunctionCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of counter values at a point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub render_calls: u64,
    pub triangles_submitted: u64,
    pub triangles_processed: u64,
    pub triangles_split: u64,
    pub triangles_degenerate: u64,
    pub columns_filled: u64,
    pub columns_skipped: u64,
    pub accumulate_attempts: u64,
    pub accumulate_rejected: u64,
    pub accumulate_updated: u64,
}

impl CounterSnapshot {
    /// Write the formatted report through the `log` facade
    pub fn log_report(&self) {
        log::info!("=== Performance Counters Report ===");
        log::info!("Orchestration:");
        log::info!("  render calls:               {:12}", self.render_calls);
        log::info!("  triangles submitted:        {:12}", self.triangles_submitted);
        log::info!("  triangles processed:        {:12}", self.triangles_processed);
        log::info!("  triangles split:            {:12}", self.triangles_split);
        log::info!("  triangles degenerate:       {:12}", self.triangles_degenerate);

        log::info!("Scanline Operations:");
        log::info!("  columns filled:             {:12}", self.columns_filled);
        log::info!("  columns skipped:            {:12}", self.columns_skipped);

        log::info!("Depth Accumulation:");
        log::info!("  accumulate attempts:        {:12}", self.accumulate_attempts);
        log::info!("  rejected (depth < eps):     {:12}", self.accumulate_rejected);
        log::info!("  cells updated:              {:12}", self.accumulate_updated);
        if self.accumulate_attempts > 0 {
            let update_rate =
                (self.accumulate_updated as f64 / self.accumulate_attempts as f64) * 100.0;
            log::info!("  update rate:                {:11.2}%", update_rate);
        }
    }
}

/// Global function counters instance
pub static FUNCTION_COUNTERS: FunctionCounters = FunctionCounters::new();

/// Macro for incrementing a counter (only when profiling feature is enabled)
#[macro_export]
macro_rules! count_call {
    ($counter:expr) => {
        #[cfg(feature = "profiling")]
        {
            $counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        }
    };
}

/// Macro for adding to a counter (only when profiling feature is enabled)
#[macro_export]
macro_rules! count_add {
    ($counter:expr, $value:expr) => {
        #[cfg(feature = "profiling")]
        {
            $counter.fetch_add($value, std::sync::atomic::Ordering::Relaxed);
        }
    };
}

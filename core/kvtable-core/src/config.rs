//! Engine configuration.
//!
//! The scan governor value is injected here and threaded into the engine at
//! construction; there is no process-global state.

/// Default ceiling on rows inspected by a single non-indexed filter pass.
pub const DEFAULT_MAX_SCAN_ROWS: u64 = 100_000;

/// Smallest accepted scan ceiling.
pub const MIN_MAX_SCAN_ROWS: u64 = 1_000;

/// Largest accepted scan ceiling.
pub const MAX_MAX_SCAN_ROWS: u64 = 10_000_000;

/// Engine configuration, fixed at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum rows a single non-indexed scan/filter step may inspect
    /// before the query fails with `ScanLimitExceeded`.
    pub max_scan_rows: u64,
}

impl EngineConfig {
    /// Configuration with the default scan ceiling.
    pub fn new() -> Self {
        Self {
            max_scan_rows: DEFAULT_MAX_SCAN_ROWS,
        }
    }

    /// Configuration with a caller-supplied scan ceiling.
    ///
    /// Out-of-range values are logged and replaced with the default;
    /// construction never fails.
    pub fn with_scan_limit(max_scan_rows: u64) -> Self {
        if !(MIN_MAX_SCAN_ROWS..=MAX_MAX_SCAN_ROWS).contains(&max_scan_rows) {
            tracing::warn!(
                requested = max_scan_rows,
                default = DEFAULT_MAX_SCAN_ROWS,
                "invalid max_scan_rows (must be between {} and {}), using default",
                MIN_MAX_SCAN_ROWS,
                MAX_MAX_SCAN_ROWS
            );
            return Self::new();
        }
        Self { max_scan_rows }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

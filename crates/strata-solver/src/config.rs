//! Solver configuration types.

/// Engine-agnostic configuration passed through the solve contract.
///
/// Every field defaults to `None`, meaning "use the engine's default".
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Time limit in seconds.
    pub time_limit: Option<f64>,
    /// Relative optimality gap tolerance for integer search.
    pub relative_gap: Option<f64>,
    /// Number of threads to use.
    pub threads: Option<u32>,
    /// Feasibility tolerance.
    pub tolerance: Option<f64>,
    /// Whether the engine may write progress output.
    pub enable_output: Option<bool>,
}

impl SolverConfig {
    /// Create a new configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time limit in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    /// Set the relative optimality gap tolerance.
    pub fn with_relative_gap(mut self, gap: f64) -> Self {
        self.relative_gap = Some(gap);
        self
    }

    /// Set the number of threads.
    pub fn with_threads(mut self, count: u32) -> Self {
        self.threads = Some(count);
        self
    }

    /// Set the feasibility tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Enable or disable engine output.
    pub fn with_output(mut self, enabled: bool) -> Self {
        self.enable_output = Some(enabled);
        self
    }

    /// Check if this configuration is completely empty (all defaults).
    pub fn is_empty(&self) -> bool {
        self.time_limit.is_none()
            && self.relative_gap.is_none()
            && self.threads.is_none()
            && self.tolerance.is_none()
            && self.enable_output.is_none()
    }
}

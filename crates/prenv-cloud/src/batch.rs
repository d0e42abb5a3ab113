//! Per-item outcome collection for batched operations

/// Result of a batch of independent operations
///
/// Each item is recorded individually so the caller decides the aggregate
/// policy: creation requires every item to succeed, teardown is
/// best-effort.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// Items that succeeded
    pub succeeded: Vec<ItemResult>,

    /// Items that failed
    pub failed: Vec<ItemResult>,

    /// Wall time of the whole batch in milliseconds
    pub duration_ms: u64,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn add_success(&mut self, target: impl Into<String>) {
        self.succeeded.push(ItemResult {
            target: target.into(),
            error: None,
        });
    }

    pub fn add_failure(&mut self, target: impl Into<String>, error: impl Into<String>) {
        self.failed.push(ItemResult {
            target: target.into(),
            error: Some(error.into()),
        });
    }
}

/// Result of a single item
#[derive(Debug, Clone)]
pub struct ItemResult {
    /// Resource the operation targeted
    pub target: String,

    /// Error message if failed
    pub error: Option<String>,
}

impl std::fmt::Display for BatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} succeeded, {} failed in {}ms",
            self.succeeded.len(),
            self.failed.len(),
            self.duration_ms
        )
    }
}

//! Cursor configuration.

/// How `next()` treats a match on the very last record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowBoundary {
    /// A match is reported whenever one is found, including on the final
    /// record.
    #[default]
    IncludeLast,
    /// A match is only reported while at least one record remains after it,
    /// so a match on the final record reads as "no more rows". This is the
    /// behaviour of older drivers and is kept for callers that depend on it.
    ExcludeLast,
}

/// Cursor configuration
#[derive(Debug, Clone, Default)]
pub struct CursorConfig {
    /// End-of-table rule for `next()`
    pub boundary: RowBoundary,
}

impl CursorConfig {
    /// Configuration reproducing the legacy end-of-table rule.
    pub fn legacy() -> Self {
        Self {
            boundary: RowBoundary::ExcludeLast,
        }
    }

    /// Set the end-of-table rule
    pub fn with_boundary(mut self, boundary: RowBoundary) -> Self {
        self.boundary = boundary;
        self
    }
}

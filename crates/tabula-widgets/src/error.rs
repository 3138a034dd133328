/// Errors returned by the direct (non-message) table API and JSON loaders.
///
/// Formatting and sorting never fail; they degrade to pass-through or
/// placeholder output instead.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// A page was requested outside `1..=page_count`.
    #[error("page {page} is outside 1..={page_count}")]
    PageOutOfRange {
        /// The requested page (1-based).
        page: usize,
        /// The number of pages available.
        page_count: usize,
    },
    /// A page size of zero was requested.
    #[error("page size must be greater than zero")]
    InvalidPageSize,
    /// Row or header JSON could not be parsed.
    #[error("invalid table JSON: {0}")]
    Json(#[from] serde_json::Error),
}

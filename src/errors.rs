//! Error taxonomy for the review engine
//!
//! Nothing here is fatal: callers recover from both variants by treating
//! the operation as a no-op and moving on.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    /// Rectangle below the minimum size, or a blank comment
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    /// Referenced annotation, issue, or page is not present
    #[error("not found: {0}")]
    NotFound(String),
}

//! Error types for palette extraction

use thiserror::Error;

/// Result type alias for palette operations
pub type Result<T> = std::result::Result<T, PaletteError>;

/// Errors surfaced to callers of the extractor.
///
/// `Processing` carries no detail. The cause is logged where it happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// The caller handed over something the pipeline will not accept
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Normalization, sampling or clustering failed
    #[error("failed to process image")]
    Processing,
}

impl PaletteError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Log `detail` and collapse it into the generic processing error.
    pub(crate) fn processing(detail: impl std::fmt::Display) -> Self {
        log::error!("image processing failed: {detail}");
        Self::Processing
    }

    /// Whether the caller can fix this by changing its request
    pub fn is_caller_error(&self) -> bool {
        matches!(self, PaletteError::InvalidInput { .. })
    }
}

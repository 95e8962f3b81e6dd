//! Bridge error taxonomy and status codes.

use thiserror::Error;

use super::handle::KindRange;
use crate::domain::subscription::ValidationError;

/// Category of a bridge failure, stable across the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing argument or output slot, or a handle that owns nothing.
    Precondition,
    /// Inputs rejected by a factory.
    Validation,
    /// Handle tag outside the accepted range, or unrecognized.
    TypeMismatch,
    /// Registry could not take another object.
    Allocation,
}

impl ErrorKind {
    /// Status code returned to foreign callers. Zero means success.
    #[must_use]
    pub const fn status_code(self) -> i32 {
        match self {
            Self::Precondition => 1,
            Self::Validation => 2,
            Self::TypeMismatch => 3,
            Self::Allocation => 4,
        }
    }

    /// Metric label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Precondition => "precondition",
            Self::Validation => "validation",
            Self::TypeMismatch => "type_mismatch",
            Self::Allocation => "allocation",
        }
    }
}

/// Errors surfaced by the handle bridge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// Required argument, output slot or live handle missing.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// Factory rejected the inputs.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Handle tag not accepted by the operation.
    #[error("type mismatch: kind {found} not accepted by {accepted}")]
    TypeMismatch {
        /// Tag carried by the handle.
        found: i32,
        /// Range the operation accepts.
        accepted: KindRange,
    },

    /// Tag does not name any known kind.
    #[error("unrecognized subscription kind identifier {0}")]
    UnknownKind(i32),

    /// Registry is out of room.
    #[error("allocation failed: {0}")]
    Allocation(String),
}

impl BridgeError {
    pub(crate) fn precondition(detail: impl Into<String>) -> Self {
        Self::Precondition(detail.into())
    }

    /// Category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Precondition(_) => ErrorKind::Precondition,
            Self::Validation(_) => ErrorKind::Validation,
            Self::TypeMismatch { .. } | Self::UnknownKind(_) => ErrorKind::TypeMismatch,
            Self::Allocation(_) => ErrorKind::Allocation,
        }
    }

    /// Status code for foreign callers.
    #[must_use]
    pub const fn status_code(&self) -> i32 {
        self.kind().status_code()
    }
}

//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeomError {
    /// A parameter is out of its documented domain.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },
    /// The input geometry cannot support the operation (empty, too few coordinates, ...).
    #[error("degenerate geometry: {reason}")]
    Degenerate { reason: String },
    /// Rejection sampling gave up.
    #[error("sampling exhausted after {attempts} attempts ({found} of {wanted} points)")]
    SamplingExhausted {
        attempts: usize,
        found: usize,
        wanted: usize,
    },
    #[error("block splitter has not been prepared")]
    NotPrepared,
    #[error("splits are not optimized")]
    NotOptimized,
}

impl GeomError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::Degenerate {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GeomError>;

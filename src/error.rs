use thiserror::Error;

/// Errors reported by the map builders and decoding adapters.
///
/// Builder calls never propagate these to the caller: they are logged and the
/// call degrades to a no-op. Only the pure expression builders return them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("step expression needs {expected} colours for {breaks} breaks, got {colours}")]
    ArityMismatch {
        breaks: usize,
        colours: usize,
        expected: usize,
    },

    #[error("{operation} is only supported on a rendered map")]
    UnsupportedContext { operation: &'static str },

    #[error("malformed feature payload: {reason}")]
    MalformedFeaturePayload { reason: String },
}

impl MapError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

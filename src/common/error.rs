use thiserror::Error;

/// Errors surfaced by the node operations.
///
/// The display strings are part of the service contract; clients match on
/// them.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("required parameter")]
    RequiredParameter(&'static str),

    #[error("length overflow parameter value")]
    LengthOverflowParameterValue {
        parameter: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("out of range parameter value")]
    OutOfRangeParameterValue(&'static str),

    #[error("invalid parameter value")]
    InvalidParameterValue(&'static str),

    #[error("not found")]
    NotFound(u64),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl PolicyError {
    /// Validation failures are rejected before the store is touched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PolicyError::RequiredParameter(_)
                | PolicyError::LengthOverflowParameterValue { .. }
                | PolicyError::OutOfRangeParameterValue(_)
                | PolicyError::InvalidParameterValue(_)
        )
    }
}

/// Convenience result type used across layerstack.
pub type StackResult<T> = Result<T, StackError>;

/// Error taxonomy for the fallible, caller-facing operations.
///
/// The compositing hot path (partitioning, compiling, interpreting and
/// blending) never fails; it works on values validated here.
#[derive(thiserror::Error, Debug)]
pub enum StackError {
    /// A stack already holds the maximum number of inputs.
    #[error("capacity error: a stack holds at most {max} inputs")]
    Capacity {
        /// The hard per-stack input limit.
        max: usize,
    },

    /// Invalid caller-provided geometry or pixel data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StackError {
    /// Build a [`StackError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StackError::Capacity`] value.
    pub fn capacity(max: usize) -> Self {
        Self::Capacity { max }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

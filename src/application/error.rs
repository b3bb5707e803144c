use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// A business invariant would be violated by the requested mutation.
    /// Deterministic: resubmitting the same input always fails the same way.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An update referenced a list position the account does not have.
    #[error("{entity} index out of bounds: {index} (list has {len})")]
    IndexOutOfBounds {
        entity: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl AppError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }
}

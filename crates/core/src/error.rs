#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The encoder exited non-zero. Carries the tail of its stderr as a
    /// diagnostic blob; never echoed to clients verbatim.
    #[error("Render failed: {message}")]
    RenderFailed {
        message: String,
        stderr_tail: String,
    },

    #[error("Render timed out after {0} s")]
    RenderTimeout(u64),

    #[error("Render cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

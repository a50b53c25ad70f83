use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The text measurer could not wrap a value (bad font size, width, or metrics).
    #[error("text measurement failed: {0}")]
    Measure(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("invalid page geometry: {0}")]
    Geometry(String),

    #[error("invalid schema: {0}")]
    Schema(String),
}

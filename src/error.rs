use thiserror::Error;

/// Input that cannot be screened at all. Never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInputError {
    #[error("Invalid input: image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("Invalid input: {width}x{height} RGB image needs {expected} bytes, got {actual}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

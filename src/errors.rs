use thiserror::Error;

pub type Result<T> = std::result::Result<T, GridError>;

/// Errors surfaced to whoever drives the editor. None of them are fatal;
/// the grid and the undo history stay untouched when an operation fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("invalid grid size: {reason}")]
    InvalidDimensions { reason: String },

    #[error("cell ({x}, {y}) is outside of the {width}x{height} grid")]
    OutOfRange {
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    },

    #[error("please enter the bitmap code")]
    EmptyImportInput,

    #[error("'{token}' is not a valid byte literal")]
    UnparseableToken { token: String },

    #[error(
        "the imported bitmap has {actual} bytes but the grid needs {expected}"
    )]
    SizeMismatch { expected: usize, actual: usize },

    #[error("no code to copy, generate the code first")]
    NoContentToExport,

    #[error("line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to write image: {0}")]
    Image(String),
}

impl GridError {
    pub fn invalid_dimensions(reason: impl Into<String>) -> GridError {
        GridError::InvalidDimensions {
            reason: reason.into(),
        }
    }
}

impl From<image::ImageError> for GridError {
    fn from(error: image::ImageError) -> Self {
        GridError::Image(error.to_string())
    }
}

impl From<serde_json::Error> for GridError {
    fn from(error: serde_json::Error) -> Self {
        GridError::Config(error.to_string())
    }
}

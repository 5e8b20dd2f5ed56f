//! Error types for document construction, layout and serialization.

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building or writing a PDF.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An element does not fit in the available space, even on a fresh page
    #[error("{element} needs {required_width}x{required_height} but only {available_width}x{available_height} is available")]
    Overflow {
        /// Kind of element that failed to fit
        element: String,
        /// Width the element needs
        required_width: f32,
        /// Height the element needs
        required_height: f32,
        /// Width that was offered
        available_width: f32,
        /// Height that was offered
        available_height: f32,
    },

    /// Invalid argument supplied to a constructor or setter
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A font or image could not be read or decoded
    #[error("Resource error: {0}")]
    Resource(String),

    /// The object graph violates a writer invariant
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build an overflow error for an element of the given kind.
    pub fn overflow(element: &str, required: (f32, f32), available: (f32, f32)) -> Self {
        Error::Overflow {
            element: element.to_string(),
            required_width: required.0,
            required_height: required.1,
            available_width: available.0,
            available_height: available.1,
        }
    }

    /// Whether this error reports an element that did not fit.
    pub fn is_overflow(&self) -> bool {
        matches!(self, Error::Overflow { .. })
    }
}

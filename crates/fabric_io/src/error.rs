//! Error types for design file reading and writing.

/// Errors from reading or writing the textual design formats.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// An underlying filesystem error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A required input file is missing.
    #[error("cannot find {file}")]
    MissingFile {
        /// The file that could not be opened.
        file: String,
    },

    /// A line did not match the expected format.
    #[error("{file}:{line}: {message}")]
    Malformed {
        /// File the line came from.
        file: String,
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        message: String,
    },

    /// A line referenced a name never declared by an earlier file.
    #[error("{file}:{line}: unknown name '{name}'")]
    UnknownName {
        /// File the reference came from.
        file: String,
        /// 1-based line number.
        line: usize,
        /// The undeclared name.
        name: String,
    },

    /// The model rejected the assembled input.
    #[error("invalid design input: {0}")]
    Model(#[from] fabric_model::ModelError),
}

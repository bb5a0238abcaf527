use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Parse failure. Structural variants carry the 1-based number of the line
/// nearest the failure.
#[derive(Debug, Error)]
pub enum Error {
    #[error("expected indented block for key '{key}' at line {line}")]
    ExpectedBlock { key: String, line: usize },

    #[error("expected indented block for sequence item at line {line}")]
    ExpectedItemBlock { line: usize },

    #[error("failed to parse block for key '{key}' at line {line}")]
    EmptyBlock { key: String, line: usize },

    #[error("failed to parse block for sequence item at line {line}")]
    EmptyItemBlock { line: usize },

    #[error("inconsistent indentation in nested sequence continuation at line {line}")]
    InconsistentIndent { line: usize },

    #[error("cannot mix sequences and mappings at the document root (line {line})")]
    MixedRoot { line: usize },

    #[error("invalid flow syntax at line {line}: {source}")]
    Flow {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("deserialize failed: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// 1-based line number, when the failure is tied to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::ExpectedBlock { line, .. }
            | Error::ExpectedItemBlock { line }
            | Error::EmptyBlock { line, .. }
            | Error::EmptyItemBlock { line }
            | Error::InconsistentIndent { line }
            | Error::MixedRoot { line }
            | Error::Flow { line, .. } => Some(*line),
            Error::Deserialize(_) | Error::Io(_) => None,
        }
    }
}

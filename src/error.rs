use std::path::PathBuf;

/// Errors that can occur in samqc.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    Parameter(String),

    #[error("I/O error: {source} ({path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("SAM format error at line {line}: invalid {field} value '{value}'")]
    Format {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Convenience for wrapping an `io::Error` with a path context.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }

    /// A typed SAM field that failed to parse.
    pub fn format(line: usize, field: &'static str, value: impl Into<String>) -> Self {
        Self::Format {
            line,
            field,
            value: value.into(),
        }
    }
}

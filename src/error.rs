use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors raised while generating icon assets
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{tool} is required but not usable: {reason}")]
    MissingTool { tool: String, reason: String },

    #[error("SVG source file '{}' not found", .0.display())]
    SourceNotFound(PathBuf),

    #[error("failed to start {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("failed to {action} '{}': {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("rendering '{}' failed: {message}", path.display())]
    Render { path: PathBuf, message: String },
}

impl GenerateError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        GenerateError::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Whether this error stops the whole run instead of a single icon
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GenerateError::MissingTool { .. } | GenerateError::SourceNotFound(_)
        )
    }
}

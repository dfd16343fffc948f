use std::{io, path::PathBuf, process::ExitStatus};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("can't start {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        source: io::Error,
    },

    /// Tool ran but exited non-zero; `stderr` holds its diagnostics.
    #[error("{} returned error status ({status}):\n{stderr}", .program.display())]
    ToolFailed {
        program: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    #[error("grid needs exactly {expected} clips, got {got}")]
    ClipCount { expected: usize, got: usize },

    #[error("{failed} of {total} group clips failed to encode")]
    EncodeFailed { failed: usize, total: usize },

    #[error("the folder '{}' does not exist", .0.display())]
    FolderNotFound(PathBuf),

    #[error("can't rename to '{}': file exists", .0.display())]
    RenameTargetExists(PathBuf),

    #[error("invalid config: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;

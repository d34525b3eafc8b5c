use std::io;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("目录不存在: {0}")]
    DirectoryNotFound(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to spawn process: {0}")]
    Spawn(#[source] io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

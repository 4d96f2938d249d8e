use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while talking to the editor. All variants
/// except [`HarnessError::PatternNotFound`] mean the environment is broken
/// and the run should stop.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to start editor `{executable}`: {source}")]
    Spawn {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    #[error("editor exited during startup ({status})")]
    Exited { status: std::process::ExitStatus },

    #[error("editor server `{server}` did not come up within {waited_ms}ms")]
    StartupTimeout { server: String, waited_ms: u64 },

    #[error("editor rejected {channel} `{payload}`: {stderr}")]
    Remote {
        channel: &'static str,
        payload: String,
        stderr: String,
    },

    #[error("pattern /{pattern}/ not found in buffer")]
    PatternNotFound { pattern: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HarnessError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HarnessError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;

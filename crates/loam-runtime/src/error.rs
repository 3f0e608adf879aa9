use std::fmt;

#[derive(Debug)]
pub enum RuntimeError {
    /// A worker of this kind is already owned by the session.
    AlreadyRunning(&'static str),
    WorkerPanicked(&'static str),
    Spawn(std::io::Error),
    PoolBuild(rayon::ThreadPoolBuildError),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::AlreadyRunning(what) => write!(f, "{what} is already running"),
            RuntimeError::WorkerPanicked(what) => write!(f, "{what} thread panicked"),
            RuntimeError::Spawn(e) => write!(f, "failed to spawn thread: {e}"),
            RuntimeError::PoolBuild(e) => write!(f, "failed to build worker pool: {e}"),
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuntimeError::Spawn(e) => Some(e),
            RuntimeError::PoolBuild(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for RuntimeError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        RuntimeError::PoolBuild(e)
    }
}

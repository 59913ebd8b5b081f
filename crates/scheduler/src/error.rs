use thiserror::Error;

/// Contract violation by a [`BackgroundOperation`](crate::operation::BackgroundOperation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MisuseError {
    #[error("result taken before the operation was ready")]
    NotReady,
    #[error("result already taken")]
    AlreadyTaken,
}

/// Errors that abort a scheduling run. Both variants are programming
/// errors; no partial result is returned.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("duplicate identity: {identity}")]
    DuplicateIdentity { identity: String },

    #[error("operation {identity} violated its contract: {source}")]
    Misuse {
        identity: String,
        #[source]
        source: MisuseError,
    },
}

/// Error building the worker pool used to launch thread-backed operations.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

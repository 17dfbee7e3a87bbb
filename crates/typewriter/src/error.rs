//! Error types for the typewriter crate

use thiserror::Error;

/// Errors surfaced while constructing a typewriter.
///
/// These are setup defects: the host wired the animator to resources that do
/// not exist. They are raised immediately so a broken animator is never
/// constructed; there is no internal recovery path.
#[derive(Error, Debug)]
pub enum TypewriterError {
    /// The source list was empty; the animation has nothing to type.
    #[error("no source phrases were provided")]
    EmptySources,

    /// No output sink was attached before `build()`.
    #[error("no output sink attached")]
    MissingSink,

    /// The timer service behind the supplied handle has already shut down.
    #[error("timer service is no longer available")]
    TimerUnavailable,
}

/// Result type for typewriter operations.
pub type Result<T> = std::result::Result<T, TypewriterError>;

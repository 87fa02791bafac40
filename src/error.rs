// Error taxonomy for the playback session controller
use thiserror::Error;

/// Errors surfaced by the session controller.
///
/// Nothing is retried automatically; the loop-on-finish reload is a
/// success-path behavior, not error recovery.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The locator could not be resolved to playable media.
    #[error("failed to resolve source {locator}: {reason}")]
    SourceResolution { locator: String, reason: String },

    /// The media engine refused a source or reported an error mid-session.
    #[error("playback failed: {0}")]
    Playback(String),

    /// Seek attempted with an unknown duration or an unusable target.
    #[error("invalid seek to {requested}s: {reason}")]
    InvalidSeek { requested: f64, reason: String },
}

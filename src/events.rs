// Events delivered to the presentation layer
use crate::session::PlaybackState;
use crate::source::SourceLocator;
use serde::Serialize;

/// Updates emitted by the controller for the presentation layer to render.
///
/// `Progress` is produced once per tick while a session exists; the other
/// variants are produced as the transitions happen and delivered on the
/// next tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// Periodic progress sample.
    Progress {
        position_seconds: Option<f64>,
        duration_seconds: Option<f64>,
        is_playing: bool,
    },
    /// The session moved to a new state.
    StateChanged { state: PlaybackState },
    /// End of stream reached for the current source.
    Completed { source: SourceLocator },
    /// A failure was surfaced; the session is in `Failed`.
    Error { message: String },
}

// Session data model
use crate::source::SourceLocator;
use serde::Serialize;

/// Lifecycle state of a playback session.
///
/// `Idle` is only ever reported by the controller when no session exists;
/// a live `Session` starts in `Loading` and never returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Loading,
    Playing,
    Paused,
    Finished,
    Failed,
}

/// One loaded track: source, state, and the last sampled timeline.
///
/// Position and duration stay `None` until the engine reports them.
/// Position is only tracked once duration is known, and is kept within
/// `[0, duration]`.
#[derive(Debug, Clone)]
pub struct Session {
    pub source: SourceLocator,
    pub state: PlaybackState,
    pub position_seconds: Option<f64>,
    pub duration_seconds: Option<f64>,
    pub volume: f32,
}

impl Session {
    /// Create a session in `Loading`. Volume is fixed at full scale.
    pub fn new(source: SourceLocator) -> Self {
        Self {
            source,
            state: PlaybackState::Loading,
            position_seconds: None,
            duration_seconds: None,
            volume: 1.0,
        }
    }
}

// Playback session state machine
// Synchronous core driven by user commands and the periodic progress tick

use crate::config::ControllerConfig;
use crate::engine::MediaEngine;
use crate::error::SessionError;
use crate::events::PlaybackEvent;
use crate::session::{PlaybackState, Session};
use crate::source::SourceLocator;
use tracing::{debug, info, warn};

/// Owns the current media session and the engine handle.
///
/// All operations return immediately; transition events accumulate and are
/// drained by `on_progress_tick`, which a periodic tick source is expected
/// to call while a session exists.
pub struct SessionController<E: MediaEngine> {
    engine: E,
    session: Option<Session>,
    config: ControllerConfig,
    pending: Vec<PlaybackEvent>,
}

impl<E: MediaEngine> SessionController<E> {
    /// Take exclusive ownership of the engine handle.
    pub fn new(engine: E, config: ControllerConfig) -> Self {
        Self {
            engine,
            session: None,
            config,
            pending: Vec::new(),
        }
    }

    /// Resolve and load a source, replacing any existing session.
    ///
    /// The previous session is fully released before the new one acquires
    /// engine resources. Playback starts immediately on success. On
    /// resolution or engine failure the controller transitions to
    /// `Failed` and the error is returned, never swallowed.
    pub fn load(&mut self, source: SourceLocator) -> Result<(), SessionError> {
        let resolved = match source.resolve() {
            Ok(resolved) => resolved,
            Err(err) => {
                warn!("source resolution failed for {source}: {err}");
                self.teardown();
                self.fail_session(Session::new(source), err.to_string());
                return Err(err);
            }
        };

        self.teardown();

        info!("loading {source}");
        let session = Session::new(source);
        self.pending.push(PlaybackEvent::StateChanged {
            state: PlaybackState::Loading,
        });

        if let Err(reason) = self.engine.load(&resolved) {
            warn!("engine rejected {}: {reason}", resolved.locator());
            self.fail_session(session, reason.clone());
            return Err(SessionError::Playback(reason));
        }

        self.engine.set_volume(session.volume);
        self.engine.play();
        self.session = Some(session);
        Ok(())
    }

    /// Resume playback. Valid from `Paused` and `Finished`; no-op
    /// otherwise. From `Finished` the engine is rewound first.
    pub fn play(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.state {
            PlaybackState::Paused | PlaybackState::Finished => {
                if session.state == PlaybackState::Finished {
                    if let Err(reason) = self.engine.seek(0.0) {
                        warn!("rewind after finish failed: {reason}");
                    }
                }
                self.engine.play();
                session.state = PlaybackState::Playing;
                self.pending.push(PlaybackEvent::StateChanged {
                    state: PlaybackState::Playing,
                });
            }
            _ => {}
        }
    }

    /// Pause playback. Valid from `Playing`, and from `Loading` since
    /// playback is auto-started at load; no-op otherwise.
    pub fn pause(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.state {
            PlaybackState::Playing | PlaybackState::Loading => {
                self.engine.pause();
                session.state = PlaybackState::Paused;
                self.pending.push(PlaybackEvent::StateChanged {
                    state: PlaybackState::Paused,
                });
            }
            _ => {}
        }
    }

    /// Seek to a target in seconds, clamped to `[0, duration]`.
    ///
    /// Rejected while the duration is unknown, when the target is not a
    /// finite number, or when there is no usable session. Returns the
    /// clamped target; the next progress tick reflects it.
    pub fn seek(&mut self, to_seconds: f64) -> Result<f64, SessionError> {
        let Some(session) = self.session.as_ref() else {
            return Err(SessionError::InvalidSeek {
                requested: to_seconds,
                reason: "no active session".to_string(),
            });
        };
        if session.state == PlaybackState::Failed {
            return Err(SessionError::InvalidSeek {
                requested: to_seconds,
                reason: "session is in a failed state".to_string(),
            });
        }
        if !to_seconds.is_finite() {
            return Err(SessionError::InvalidSeek {
                requested: to_seconds,
                reason: "target is not a finite number".to_string(),
            });
        }
        let Some(duration) = self.engine.duration_seconds() else {
            return Err(SessionError::InvalidSeek {
                requested: to_seconds,
                reason: "duration not yet known".to_string(),
            });
        };

        let target = to_seconds.clamp(0.0, duration);
        self.engine.seek(target).map_err(SessionError::Playback)?;
        if let Some(session) = self.session.as_mut() {
            session.position_seconds = Some(target);
            session.duration_seconds = Some(duration);
        }
        Ok(target)
    }

    /// Sample the engine and advance the state machine.
    ///
    /// Drains events queued by commands, routes mid-session engine errors
    /// to `Failed`, refreshes the timeline, handles end-of-stream (with
    /// the loop-on-finish reload when enabled), promotes `Loading` to
    /// `Playing` once the engine is rolling, and appends a progress
    /// sample.
    pub fn on_progress_tick(&mut self) -> Vec<PlaybackEvent> {
        let mut events = std::mem::take(&mut self.pending);

        let Some(session) = self.session.as_mut() else {
            return events;
        };
        if session.state == PlaybackState::Failed {
            return events;
        }

        if let Some(message) = self.engine.error() {
            warn!("engine error mid-session: {message}");
            session.state = PlaybackState::Failed;
            events.push(PlaybackEvent::StateChanged {
                state: PlaybackState::Failed,
            });
            events.push(PlaybackEvent::Error { message });
            return events;
        }

        session.duration_seconds = self.engine.duration_seconds();
        session.position_seconds = match session.duration_seconds {
            Some(duration) => self
                .engine
                .position_seconds()
                .map(|p| p.clamp(0.0, duration)),
            None => None,
        };

        if self.engine.ended()
            && matches!(session.state, PlaybackState::Loading | PlaybackState::Playing)
        {
            session.state = PlaybackState::Finished;
            events.push(PlaybackEvent::StateChanged {
                state: PlaybackState::Finished,
            });
            events.push(PlaybackEvent::Completed {
                source: session.source.clone(),
            });

            if self.config.loop_on_finish {
                // Success path: replay the same source from the start.
                debug!("end of stream, reloading {}", session.source);
                session.position_seconds = None;
                session.duration_seconds = None;
                match session.source.resolve() {
                    Ok(resolved) => match self.engine.load(&resolved) {
                        Ok(()) => {
                            self.engine.set_volume(session.volume);
                            self.engine.play();
                            session.state = PlaybackState::Loading;
                            events.push(PlaybackEvent::StateChanged {
                                state: PlaybackState::Loading,
                            });
                        }
                        Err(reason) => {
                            warn!("reload after finish failed: {reason}");
                            session.state = PlaybackState::Failed;
                            events.push(PlaybackEvent::StateChanged {
                                state: PlaybackState::Failed,
                            });
                            events.push(PlaybackEvent::Error { message: reason });
                        }
                    },
                    Err(err) => {
                        warn!("reload after finish failed: {err}");
                        session.state = PlaybackState::Failed;
                        events.push(PlaybackEvent::StateChanged {
                            state: PlaybackState::Failed,
                        });
                        events.push(PlaybackEvent::Error {
                            message: err.to_string(),
                        });
                    }
                }
            }
            return events;
        }

        if session.state == PlaybackState::Loading && self.engine.rate() != 0.0 {
            session.state = PlaybackState::Playing;
            events.push(PlaybackEvent::StateChanged {
                state: PlaybackState::Playing,
            });
        }

        let is_playing = self.engine.rate() != 0.0 && self.engine.error().is_none();
        events.push(PlaybackEvent::Progress {
            position_seconds: session.position_seconds,
            duration_seconds: session.duration_seconds,
            is_playing,
        });

        events
    }

    /// True iff a session exists, the engine's rate is non-zero, and no
    /// engine error is set.
    pub fn is_playing(&self) -> bool {
        self.session.is_some() && self.engine.rate() != 0.0 && self.engine.error().is_none()
    }

    /// Current state; `Idle` when no session exists.
    pub fn state(&self) -> PlaybackState {
        self.session
            .as_ref()
            .map(|s| s.state)
            .unwrap_or(PlaybackState::Idle)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn current_source(&self) -> Option<&SourceLocator> {
        self.session.as_ref().map(|s| &s.source)
    }

    /// Release the engine resources and drop any undelivered events.
    pub fn dispose(&mut self) {
        debug!("disposing session controller");
        self.teardown();
        self.pending.clear();
    }

    fn teardown(&mut self) {
        if self.session.take().is_some() {
            self.engine.release();
        }
    }

    fn fail_session(&mut self, mut session: Session, message: String) {
        session.state = PlaybackState::Failed;
        self.session = Some(session);
        self.pending.push(PlaybackEvent::StateChanged {
            state: PlaybackState::Failed,
        });
        self.pending.push(PlaybackEvent::Error { message });
    }

    #[cfg(test)]
    pub(crate) fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}

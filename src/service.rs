// Async playback driver
// Owns the controller behind a mutex, runs the tick task, forwards events

use crate::config::ControllerConfig;
use crate::controller::SessionController;
use crate::engine::MediaEngine;
use crate::error::SessionError;
use crate::events::PlaybackEvent;
use crate::remote::{TransportButton, TransportControls};
use crate::session::PlaybackState;
use crate::source::SourceLocator;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Drives a `SessionController` with a periodic tick task and delivers
/// its events to the presentation layer over an mpsc channel.
///
/// One tick task exists per loaded session: it is started by a successful
/// `load` and stopped before the next session acquires resources, so two
/// tick sources never overlap. A failed `load` starts no tick task.
pub struct PlaybackService<E: MediaEngine> {
    controller: Arc<Mutex<SessionController<E>>>,
    events_tx: mpsc::UnboundedSender<PlaybackEvent>,
    tick_interval: Duration,
    ticker: Option<JoinHandle<()>>,
}

impl<E: MediaEngine> PlaybackService<E> {
    /// Create the service and the event stream for the presentation layer.
    pub fn new(
        engine: E,
        config: ControllerConfig,
    ) -> (Self, mpsc::UnboundedReceiver<PlaybackEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let tick_interval = config.tick_interval();
        let controller = Arc::new(Mutex::new(SessionController::new(engine, config)));
        (
            Self {
                controller,
                events_tx,
                tick_interval,
                ticker: None,
            },
            events_rx,
        )
    }

    /// Load a new source. The previous tick task is stopped before the
    /// controller tears the old session down and acquires new resources.
    pub fn load(&mut self, source: SourceLocator) -> Result<(), SessionError> {
        self.stop_ticker();
        let result = self.controller.lock().load(source);
        match result {
            Ok(()) => self.start_ticker(),
            Err(_) => {
                // No tick source for a failed load; deliver the queued
                // failure events directly.
                let events = self.controller.lock().on_progress_tick();
                self.send_all(events);
            }
        }
        result
    }

    pub fn play(&self) {
        self.controller.lock().play();
    }

    pub fn pause(&self) {
        self.controller.lock().pause();
    }

    pub fn seek(&self, to_seconds: f64) -> Result<f64, SessionError> {
        self.controller.lock().seek(to_seconds)
    }

    pub fn is_playing(&self) -> bool {
        self.controller.lock().is_playing()
    }

    pub fn state(&self) -> PlaybackState {
        self.controller.lock().state()
    }

    /// Wire a system transport control surface to this service.
    ///
    /// Only play and pause are supported in this scope: they are enabled
    /// and mapped to controller commands, everything else stays disabled
    /// and presses of unsupported buttons are ignored.
    pub fn attach_transport_controls<T: TransportControls>(
        &self,
        controls: &mut T,
    ) -> Result<(), String> {
        controls.set_enabled_buttons(&[TransportButton::Play, TransportButton::Pause])?;

        let controller = Arc::clone(&self.controller);
        controls.set_button_callback(Box::new(move |button| match button {
            TransportButton::Play => controller.lock().play(),
            TransportButton::Pause => controller.lock().pause(),
            _ => {}
        }))?;

        controls.set_playback_status(self.is_playing())
    }

    /// Stop the tick task and release the session resources. Nothing is
    /// left pending afterwards.
    pub fn dispose(&mut self) {
        self.stop_ticker();
        self.controller.lock().dispose();
    }

    fn start_ticker(&mut self) {
        let controller = Arc::clone(&self.controller);
        let events_tx = self.events_tx.clone();
        let interval = self.tick_interval;
        debug!("starting tick task at {:?}", interval);

        self.ticker = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let events = controller.lock().on_progress_tick();
                for event in events {
                    if events_tx.send(event).is_err() {
                        // Presentation layer went away.
                        return;
                    }
                }
            }
        }));
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    fn send_all(&self, events: Vec<PlaybackEvent>) {
        for event in events {
            let _ = self.events_tx.send(event);
        }
    }

    #[cfg(test)]
    pub(crate) fn controller(&self) -> Arc<Mutex<SessionController<E>>> {
        Arc::clone(&self.controller)
    }
}

impl<E: MediaEngine> Drop for PlaybackService<E> {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockEngine;
    use std::path::PathBuf;

    fn remote(url: &str) -> SourceLocator {
        SourceLocator::RemoteUrl(url.to_string())
    }

    struct RecordingControls {
        enabled: Vec<TransportButton>,
        callback: Option<Box<dyn Fn(TransportButton) + Send + Sync>>,
        status: Option<bool>,
    }

    impl RecordingControls {
        fn new() -> Self {
            Self {
                enabled: Vec::new(),
                callback: None,
                status: None,
            }
        }

        fn press(&self, button: TransportButton) {
            self.callback.as_ref().unwrap()(button);
        }
    }

    impl TransportControls for RecordingControls {
        fn set_enabled_buttons(&mut self, buttons: &[TransportButton]) -> Result<(), String> {
            self.enabled = buttons.to_vec();
            Ok(())
        }

        fn set_button_callback(
            &mut self,
            callback: Box<dyn Fn(TransportButton) + Send + Sync + 'static>,
        ) -> Result<(), String> {
            self.callback = Some(callback);
            Ok(())
        }

        fn set_playback_status(&mut self, is_playing: bool) -> Result<(), String> {
            self.status = Some(is_playing);
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_emit_progress_at_cadence() {
        let (mut service, mut events_rx) =
            PlaybackService::new(MockEngine::new(), ControllerConfig::default());
        service.load(remote("https://example.com/track.mp3")).unwrap();

        let mut progress_samples = 0;
        while progress_samples < 3 {
            match events_rx.recv().await.unwrap() {
                PlaybackEvent::Progress { is_playing, .. } => {
                    assert!(is_playing);
                    progress_samples += 1;
                }
                PlaybackEvent::StateChanged { .. } => {}
                other => panic!("unexpected event: {:?}", other),
            }
        }

        service.dispose();
        assert_eq!(service.state(), PlaybackState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_load_starts_no_tick_source() {
        let (mut service, mut events_rx) =
            PlaybackService::new(MockEngine::new(), ControllerConfig::default());
        let err = service
            .load(SourceLocator::LocalFile(PathBuf::from("missing.mp3")))
            .unwrap_err();
        assert!(matches!(err, SessionError::SourceResolution { .. }));

        assert_eq!(
            events_rx.recv().await.unwrap(),
            PlaybackEvent::StateChanged {
                state: PlaybackState::Failed
            }
        );
        assert!(matches!(
            events_rx.recv().await.unwrap(),
            PlaybackEvent::Error { .. }
        ));

        // No ticker was spawned, so nothing else arrives.
        tokio::time::advance(Duration::from_millis(500)).await;
        tokio::task::yield_now().await;
        assert!(events_rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_stops_previous_tick_source() {
        let (mut service, mut events_rx) =
            PlaybackService::new(MockEngine::new(), ControllerConfig::default());
        service.load(remote("https://example.com/a.mp3")).unwrap();

        // Let the first session tick a little.
        loop {
            if let PlaybackEvent::Progress { .. } = events_rx.recv().await.unwrap() {
                break;
            }
        }

        service.load(remote("https://example.com/b.mp3")).unwrap();
        {
            let controller = service.controller();
            let mut controller = controller.lock();
            let calls = &controller.engine_mut().calls;
            let release = calls.iter().position(|c| c == "release").unwrap();
            let second_load = calls
                .iter()
                .position(|c| c == "load https://example.com/b.mp3")
                .unwrap();
            assert!(release < second_load);
        }

        // Events keep flowing for the new session only.
        loop {
            if let PlaybackEvent::Progress { .. } = events_rx.recv().await.unwrap() {
                break;
            }
        }
        assert_eq!(service.state(), PlaybackState::Playing);

        service.dispose();
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_play_pause_wiring() {
        let (mut service, _events_rx) =
            PlaybackService::new(MockEngine::new(), ControllerConfig::default());
        service.load(remote("https://example.com/track.mp3")).unwrap();

        let mut controls = RecordingControls::new();
        service.attach_transport_controls(&mut controls).unwrap();

        // Previous/next are not supported in this scope.
        assert_eq!(
            controls.enabled,
            vec![TransportButton::Play, TransportButton::Pause]
        );
        assert_eq!(controls.status, Some(true));

        controls.press(TransportButton::Pause);
        assert!(!service.is_playing());

        controls.press(TransportButton::Play);
        assert!(service.is_playing());

        // Unsupported buttons are ignored.
        controls.press(TransportButton::Next);
        controls.press(TransportButton::Previous);
        assert!(service.is_playing());

        service.dispose();
    }
}

// System transport control surface
// Explicit command-handler registration for "now playing" overlays

/// Buttons a platform transport control surface can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportButton {
    Play,
    Pause,
    Stop,
    Next,
    Previous,
}

/// Platform "now playing" control surface (SMTC, MPRIS, a remote command
/// center, ...).
///
/// Registration returns success/failure so callers can surface wiring
/// problems instead of capturing UI state in implicit closures.
pub trait TransportControls {
    /// Enable exactly the given buttons; every other button is disabled.
    fn set_enabled_buttons(&mut self, buttons: &[TransportButton]) -> Result<(), String>;

    /// Register the handler invoked when an enabled button is pressed.
    fn set_button_callback(
        &mut self,
        callback: Box<dyn Fn(TransportButton) + Send + Sync + 'static>,
    ) -> Result<(), String>;

    /// Reflect the play/pause state on the system overlay.
    fn set_playback_status(&mut self, is_playing: bool) -> Result<(), String>;
}

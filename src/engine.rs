// Media engine abstraction
// The seam between the session controller and the platform media player

use crate::source::ResolvedSource;

/// Interface to the underlying platform media player.
///
/// Implementations wrap whatever the platform provides (an AVFoundation
/// player, an HTML audio element, a GStreamer pipeline, ...). All calls
/// are fire-and-forget from the controller's perspective: commands return
/// immediately and their effects are observed through subsequent ticks.
///
/// The handle is owned exclusively by one controller and never aliased.
pub trait MediaEngine: Send + 'static {
    /// Replace the current item with the resolved source and prepare it
    /// for playback from the beginning. Must clear the `ended` flag.
    fn load(&mut self, source: &ResolvedSource) -> Result<(), String>;

    fn play(&mut self);

    fn pause(&mut self);

    /// Move the playhead. The target has already been clamped by the
    /// controller.
    fn seek(&mut self, seconds: f64) -> Result<(), String>;

    /// Current playhead position, `None` until the engine reports one.
    fn position_seconds(&self) -> Option<f64>;

    /// Media duration, `None` until the source has reported it.
    fn duration_seconds(&self) -> Option<f64>;

    /// Playback rate; non-zero means the engine is rolling.
    fn rate(&self) -> f32;

    fn set_volume(&mut self, volume: f32);

    /// Latched end-of-stream flag. Cleared by `load` and by a seek away
    /// from the end.
    fn ended(&self) -> bool;

    /// Fatal engine error for the current item, if any.
    fn error(&self) -> Option<String>;

    /// Stop playback and free the decoder/stream resources for the
    /// current item.
    fn release(&mut self);
}

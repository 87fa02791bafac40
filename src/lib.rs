// Playback session controller
// Module declarations
mod config;
mod controller;
mod engine;
mod error;
mod events;
mod remote;
mod service;
mod session;
mod source;

pub use config::ControllerConfig;
pub use controller::SessionController;
pub use engine::MediaEngine;
pub use error::SessionError;
pub use events::PlaybackEvent;
pub use remote::{TransportButton, TransportControls};
pub use service::PlaybackService;
pub use session::{PlaybackState, Session};
pub use source::{ResolvedSource, SourceLocator};

use thiserror::Error;

pub mod commands;
pub mod thread;

pub use commands::{Clip, PlaybackStatus, PlayerCommand, PlayerHandle, PlayerSnapshot};

/// The playback engine a controls overlay drives.
///
/// Methods take `&self` so the overlay can hold a non-owning handle; any
/// implementation that mutates state does so through interior mutability or
/// by forwarding to another thread.
pub trait Player {
    fn play(&self);
    fn pause(&self);
    fn stop(&self);
    /// Jumps to a position given as a fraction of the full length.
    fn seek(&self, fraction: f64);
    fn set_volume(&self, volume: f32);

    fn status(&self) -> PlaybackStatus;
    /// Current position as a fraction in `[0, 1]`.
    fn progress(&self) -> f64;
    /// Current position in seconds.
    fn current_time(&self) -> f64;
    /// Total length in seconds.
    fn video_length(&self) -> f64;
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlayerError {
    #[error("No video is loaded.")]
    NoVideoLoaded,
    #[error("Can't seek to {0}: position must be a fraction between 0 and 1.")]
    InvalidSeek(f64),
}

/// Lifecycle notifications a [`Player`] emits.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    NewVideo,
    ReadyToPlay,
    /// Periodic position update, as a fraction in `[0, 1]`.
    Progress(f64),
    Started,
    Stopped,
    Finished,
    SeekStarted,
    SeekEnded,
    Error(PlayerError),
}

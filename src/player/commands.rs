use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::player::Player;

#[derive(Debug, Clone)]
pub enum PlayerCommand {
    Load(Clip),
    Play,
    Pause,
    Stop,
    Seek(f64),
    SetVolume(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Playing,
    Paused,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub title: String,
    pub duration_secs: f64,
}

/// What the UI thread can read about the player without a round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub status: PlaybackStatus,
    pub position_secs: f64,
    pub length_secs: f64,
    pub volume: f32,
    pub loading: bool,
}

impl Default for PlayerSnapshot {
    fn default() -> Self {
        Self {
            status: PlaybackStatus::Idle,
            position_secs: 0.0,
            length_secs: 0.0,
            volume: 1.0,
            loading: false,
        }
    }
}

impl PlayerSnapshot {
    pub fn progress(&self) -> f64 {
        if self.length_secs > 0.0 {
            (self.position_secs / self.length_secs).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// [`Player`] implementation that forwards commands to the player thread.
pub struct PlayerHandle {
    cmd_tx: mpsc::Sender<PlayerCommand>,
    snapshot: Arc<Mutex<PlayerSnapshot>>,
}

impl PlayerHandle {
    pub fn new(cmd_tx: mpsc::Sender<PlayerCommand>, snapshot: Arc<Mutex<PlayerSnapshot>>) -> Self {
        Self { cmd_tx, snapshot }
    }

    pub fn load(&self, clip: Clip) {
        self.send(PlayerCommand::Load(clip));
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        self.snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn send(&self, cmd: PlayerCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            tracing::warn!("player thread is gone, dropping command");
        }
    }
}

impl Player for PlayerHandle {
    fn play(&self) {
        self.send(PlayerCommand::Play);
    }

    fn pause(&self) {
        self.send(PlayerCommand::Pause);
    }

    fn stop(&self) {
        self.send(PlayerCommand::Stop);
    }

    fn seek(&self, fraction: f64) {
        self.send(PlayerCommand::Seek(fraction));
    }

    fn set_volume(&self, volume: f32) {
        self.send(PlayerCommand::SetVolume(volume));
    }

    fn status(&self) -> PlaybackStatus {
        self.snapshot().status
    }

    fn progress(&self) -> f64 {
        self.snapshot().progress()
    }

    fn current_time(&self) -> f64 {
        self.snapshot().position_secs
    }

    fn video_length(&self) -> f64 {
        self.snapshot().length_secs
    }
}

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::events::types::AppEvent;
use crate::player::commands::{Clip, PlaybackStatus, PlayerCommand, PlayerSnapshot};
use crate::player::{PlayerError, PlayerEvent};

/// How often the thread wakes up when no command arrives.
const CLOCK_TICK: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy)]
pub struct ClockSettings {
    pub load_delay: Duration,
    pub progress_interval: Duration,
    pub volume: f32,
}

/// Playback clock standing in for a decoder. Time only moves through
/// [`Session::advance`], which keeps it testable without a thread.
struct Session {
    settings: ClockSettings,
    clip: Option<Clip>,
    status: PlaybackStatus,
    position: f64,
    volume: f32,
    loading: Option<Duration>,
    play_when_ready: bool,
    seek_when_ready: Option<f64>,
    since_progress: Duration,
}

impl Session {
    fn new(settings: ClockSettings) -> Self {
        Self {
            settings,
            clip: None,
            status: PlaybackStatus::Idle,
            position: 0.0,
            volume: settings.volume.clamp(0.0, 1.0),
            loading: None,
            play_when_ready: false,
            seek_when_ready: None,
            since_progress: Duration::ZERO,
        }
    }

    fn length(&self) -> f64 {
        self.clip.as_ref().map(|c| c.duration_secs).unwrap_or(0.0)
    }

    fn fraction(&self) -> f64 {
        let length = self.length();
        if length > 0.0 {
            (self.position / length).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    fn handle(&mut self, cmd: PlayerCommand) -> Vec<PlayerEvent> {
        match cmd {
            PlayerCommand::Load(clip) => {
                tracing::info!(title = %clip.title, "loading clip");
                self.clip = Some(clip);
                self.status = PlaybackStatus::Idle;
                self.position = 0.0;
                self.loading = Some(self.settings.load_delay);
                self.play_when_ready = false;
                self.seek_when_ready = None;
                self.since_progress = Duration::ZERO;
                vec![PlayerEvent::NewVideo]
            }

            PlayerCommand::Play => {
                if self.clip.is_none() {
                    return vec![PlayerEvent::Error(PlayerError::NoVideoLoaded)];
                }
                if self.loading.is_some() {
                    self.play_when_ready = true;
                    return Vec::new();
                }
                self.start()
            }

            PlayerCommand::Pause => {
                self.play_when_ready = false;
                if self.status == PlaybackStatus::Playing {
                    self.status = PlaybackStatus::Paused;
                }
                Vec::new()
            }

            PlayerCommand::Stop => {
                if self.clip.is_none() {
                    return Vec::new();
                }
                self.play_when_ready = false;
                self.status = PlaybackStatus::Stopped;
                self.position = 0.0;
                vec![PlayerEvent::Stopped]
            }

            PlayerCommand::Seek(fraction) => {
                if self.clip.is_none() {
                    return vec![PlayerEvent::Error(PlayerError::NoVideoLoaded)];
                }
                if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
                    return vec![PlayerEvent::Error(PlayerError::InvalidSeek(fraction))];
                }
                // Applied once the clip is ready; the last request wins.
                if self.loading.is_some() {
                    self.seek_when_ready = Some(fraction);
                    return Vec::new();
                }
                self.seek_to(fraction)
            }

            PlayerCommand::SetVolume(volume) => {
                self.volume = volume.clamp(0.0, 1.0);
                Vec::new()
            }
        }
    }

    fn seek_to(&mut self, fraction: f64) -> Vec<PlayerEvent> {
        self.position = fraction * self.length();
        self.since_progress = Duration::ZERO;
        vec![
            PlayerEvent::SeekStarted,
            PlayerEvent::Progress(fraction),
            PlayerEvent::SeekEnded,
        ]
    }

    fn start(&mut self) -> Vec<PlayerEvent> {
        if self.status == PlaybackStatus::Playing {
            return Vec::new();
        }
        if self.position >= self.length() {
            self.position = 0.0;
        }
        self.status = PlaybackStatus::Playing;
        self.since_progress = Duration::ZERO;
        vec![PlayerEvent::Started]
    }

    fn advance(&mut self, elapsed: Duration) -> Vec<PlayerEvent> {
        let mut events = Vec::new();

        if let Some(remaining) = self.loading {
            if elapsed >= remaining {
                self.loading = None;
                events.push(PlayerEvent::ReadyToPlay);
                if let Some(fraction) = self.seek_when_ready.take() {
                    events.extend(self.seek_to(fraction));
                }
                if std::mem::take(&mut self.play_when_ready) {
                    events.extend(self.start());
                }
            } else {
                self.loading = Some(remaining - elapsed);
            }
            return events;
        }

        if self.status != PlaybackStatus::Playing {
            return events;
        }

        self.position += elapsed.as_secs_f64();
        self.since_progress += elapsed;

        if self.position >= self.length() {
            self.position = 0.0;
            self.status = PlaybackStatus::Stopped;
            events.push(PlayerEvent::Progress(1.0));
            events.push(PlayerEvent::Finished);
            events.push(PlayerEvent::Stopped);
        } else if self.since_progress >= self.settings.progress_interval {
            self.since_progress = Duration::ZERO;
            events.push(PlayerEvent::Progress(self.fraction()));
        }

        events
    }

    fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            status: self.status,
            position_secs: self.position,
            length_secs: self.length(),
            volume: self.volume,
            loading: self.loading.is_some(),
        }
    }
}

pub fn spawn(
    settings: ClockSettings,
    cmd_rx: mpsc::Receiver<PlayerCommand>,
    event_tx: mpsc::Sender<AppEvent>,
    snapshot: Arc<Mutex<PlayerSnapshot>>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let mut session = Session::new(settings);
        let mut last_tick = Instant::now();

        loop {
            let mut events = match cmd_rx.recv_timeout(CLOCK_TICK) {
                Ok(cmd) => session.handle(cmd),
                Err(RecvTimeoutError::Timeout) => Vec::new(),
                // Main thread is gone, exit
                Err(RecvTimeoutError::Disconnected) => break,
            };

            let now = Instant::now();
            events.extend(session.advance(now - last_tick));
            last_tick = now;

            *snapshot.lock().unwrap_or_else(PoisonError::into_inner) = session.snapshot();

            for event in events {
                if let PlayerEvent::Error(ref e) = event {
                    tracing::warn!("player error: {}", e);
                }
                if event_tx.send(AppEvent::Player(event)).is_err() {
                    return;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ClockSettings {
        ClockSettings {
            load_delay: Duration::from_millis(200),
            progress_interval: Duration::from_millis(100),
            volume: 1.0,
        }
    }

    fn clip(secs: f64) -> Clip {
        Clip {
            title: "Test".to_string(),
            duration_secs: secs,
        }
    }

    fn loaded(secs: f64) -> Session {
        let mut session = Session::new(settings());
        session.handle(PlayerCommand::Load(clip(secs)));
        session.advance(Duration::from_millis(200));
        session
    }

    #[test]
    fn load_announces_new_video_then_ready() {
        let mut session = Session::new(settings());

        assert_eq!(
            session.handle(PlayerCommand::Load(clip(10.0))),
            vec![PlayerEvent::NewVideo]
        );
        assert!(session.snapshot().loading);
        assert!(session.advance(Duration::from_millis(150)).is_empty());
        assert_eq!(
            session.advance(Duration::from_millis(50)),
            vec![PlayerEvent::ReadyToPlay]
        );
        assert!(!session.snapshot().loading);
    }

    #[test]
    fn play_during_load_starts_once_ready() {
        let mut session = Session::new(settings());
        session.handle(PlayerCommand::Load(clip(10.0)));

        assert!(session.handle(PlayerCommand::Play).is_empty());
        assert_eq!(
            session.advance(Duration::from_millis(200)),
            vec![PlayerEvent::ReadyToPlay, PlayerEvent::Started]
        );
        assert_eq!(session.status, PlaybackStatus::Playing);
    }

    #[test]
    fn playing_emits_progress_on_interval() {
        let mut session = loaded(10.0);
        assert_eq!(session.handle(PlayerCommand::Play), vec![PlayerEvent::Started]);

        assert_eq!(
            session.advance(Duration::from_secs(1)),
            vec![PlayerEvent::Progress(0.1)]
        );
        assert_eq!(session.snapshot().position_secs, 1.0);
        assert!(session.advance(Duration::from_millis(50)).is_empty());
    }

    #[test]
    fn paused_clock_does_not_move() {
        let mut session = loaded(10.0);
        session.handle(PlayerCommand::Play);
        session.advance(Duration::from_secs(2));
        session.handle(PlayerCommand::Pause);

        assert!(session.advance(Duration::from_secs(5)).is_empty());
        assert_eq!(session.snapshot().position_secs, 2.0);
        assert_eq!(session.snapshot().status, PlaybackStatus::Paused);
    }

    #[test]
    fn reaching_the_end_finishes_and_stops() {
        let mut session = loaded(1.0);
        session.handle(PlayerCommand::Play);

        assert_eq!(
            session.advance(Duration::from_secs(2)),
            vec![
                PlayerEvent::Progress(1.0),
                PlayerEvent::Finished,
                PlayerEvent::Stopped
            ]
        );
        assert_eq!(session.snapshot().status, PlaybackStatus::Stopped);
        assert_eq!(session.snapshot().position_secs, 0.0);
    }

    #[test]
    fn seek_brackets_the_jump() {
        let mut session = loaded(20.0);

        assert_eq!(
            session.handle(PlayerCommand::Seek(0.5)),
            vec![
                PlayerEvent::SeekStarted,
                PlayerEvent::Progress(0.5),
                PlayerEvent::SeekEnded
            ]
        );
        assert_eq!(session.snapshot().position_secs, 10.0);
    }

    #[test]
    fn seek_during_load_waits_for_ready() {
        let mut session = Session::new(settings());
        session.handle(PlayerCommand::Load(clip(20.0)));

        assert!(session.handle(PlayerCommand::Seek(0.25)).is_empty());
        assert!(session.snapshot().loading);
        assert_eq!(session.snapshot().position_secs, 0.0);

        assert_eq!(
            session.advance(Duration::from_millis(200)),
            vec![
                PlayerEvent::ReadyToPlay,
                PlayerEvent::SeekStarted,
                PlayerEvent::Progress(0.25),
                PlayerEvent::SeekEnded
            ]
        );
        assert_eq!(session.snapshot().position_secs, 5.0);
    }

    #[test]
    fn reload_drops_a_deferred_seek() {
        let mut session = Session::new(settings());
        session.handle(PlayerCommand::Load(clip(20.0)));
        session.handle(PlayerCommand::Seek(0.5));
        session.handle(PlayerCommand::Load(clip(10.0)));

        assert_eq!(
            session.advance(Duration::from_millis(200)),
            vec![PlayerEvent::ReadyToPlay]
        );
        assert_eq!(session.snapshot().position_secs, 0.0);
    }

    #[test]
    fn commands_without_a_clip_report_errors() {
        let mut session = Session::new(settings());

        assert_eq!(
            session.handle(PlayerCommand::Play),
            vec![PlayerEvent::Error(PlayerError::NoVideoLoaded)]
        );
        assert_eq!(
            session.handle(PlayerCommand::Seek(0.5)),
            vec![PlayerEvent::Error(PlayerError::NoVideoLoaded)]
        );
        assert!(session.handle(PlayerCommand::Stop).is_empty());
    }

    #[test]
    fn out_of_range_seek_is_rejected() {
        let mut session = loaded(20.0);

        assert_eq!(
            session.handle(PlayerCommand::Seek(1.5)),
            vec![PlayerEvent::Error(PlayerError::InvalidSeek(1.5))]
        );
        assert_eq!(session.snapshot().position_secs, 0.0);
    }

    #[test]
    fn stop_rewinds() {
        let mut session = loaded(20.0);
        session.handle(PlayerCommand::Play);
        session.advance(Duration::from_secs(3));

        assert_eq!(session.handle(PlayerCommand::Stop), vec![PlayerEvent::Stopped]);
        assert_eq!(session.snapshot().position_secs, 0.0);
    }

    #[test]
    fn volume_is_clamped() {
        let mut session = loaded(20.0);
        session.handle(PlayerCommand::SetVolume(1.7));
        assert_eq!(session.snapshot().volume, 1.0);
        session.handle(PlayerCommand::SetVolume(-0.2));
        assert_eq!(session.snapshot().volume, 0.0);
    }
}

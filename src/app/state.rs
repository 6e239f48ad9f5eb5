use std::rc::Rc;
use std::sync::mpsc;
use std::time::Instant;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::{decrement, increment};
use crate::config::Config;
use crate::controls::ControlsOverlay;
use crate::events::types::{AppEvent, HostEvent};
use crate::player::{Clip, Player, PlayerError, PlayerEvent, PlayerHandle};
use crate::ui::notifications::NotificationManager;
use crate::ui::theme::Theme;

const VOLUME_STEP: f32 = 0.1;

/// Screen areas from the last frame, used for mouse hit testing.
#[derive(Default, Clone)]
pub struct LayoutRegions {
    pub scrub_bar: Option<Rect>,
    pub prev_button: Option<Rect>,
    pub play_button: Option<Rect>,
    pub next_button: Option<Rect>,
}

pub struct App {
    pub theme: Theme,
    pub playlist: Vec<Clip>,
    pub current_clip: usize,

    pub overlay: ControlsOverlay,
    pub player: Rc<PlayerHandle>,

    pub notifications: NotificationManager,

    // Control
    pub should_quit: bool,
    pub has_focus: bool,
    pub layout_regions: LayoutRegions,
}

fn post(event_tx: &mpsc::Sender<AppEvent>, event: HostEvent) -> Box<dyn FnMut()> {
    let tx = event_tx.clone();
    Box::new(move || {
        let _ = tx.send(AppEvent::Host(event.clone()));
    })
}

impl App {
    pub fn new(
        config: &Config,
        theme: Theme,
        player: Rc<PlayerHandle>,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Result<Self> {
        let mut overlay = ControlsOverlay::new(config.overlay_settings(&theme)?);
        overlay.attach(&player);

        let callbacks = overlay.callbacks_mut();
        callbacks.did_press_next = Some(post(&event_tx, HostEvent::NextPressed));
        callbacks.did_press_previous = Some(post(&event_tx, HostEvent::PreviousPressed));
        callbacks.on_new_video = Some(post(&event_tx, HostEvent::NewVideo));
        callbacks.on_finished = Some(post(&event_tx, HostEvent::Finished));
        let tx = event_tx.clone();
        callbacks.on_error = Some(Box::new(move |error: PlayerError| {
            let _ = tx.send(AppEvent::Host(HostEvent::PlayerError(error)));
        }));
        callbacks.on_interaction_change = Some(Box::new(|interacting: bool| {
            tracing::debug!(interacting, "scrub interaction changed");
        }));

        Ok(Self {
            theme,
            playlist: config.playlist.clone(),
            current_clip: 0,

            overlay,
            player,

            notifications: NotificationManager::new(),

            should_quit: false,
            has_focus: true,
            layout_regions: LayoutRegions::default(),
        })
    }

    pub fn current(&self) -> Option<&Clip> {
        self.playlist.get(self.current_clip)
    }

    pub fn load_clip(&mut self, index: usize) {
        if let Some(clip) = self.playlist.get(index) {
            self.current_clip = index;
            self.player.load(clip.clone());
        }
    }

    /// Moves through the playlist without wrapping. Returns false at either end.
    fn step_playlist(&mut self, forward: bool) -> bool {
        let len = self.playlist.len();
        let next = if forward {
            increment(self.current_clip, len, false)
        } else {
            decrement(self.current_clip, len, false)
        };
        if next == self.current_clip {
            return false;
        }
        self.load_clip(next);
        true
    }

    pub fn on_player_event(&mut self, event: PlayerEvent) {
        self.overlay.handle_player_event(event);
    }

    pub fn on_host_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::NextPressed => {
                if !self.step_playlist(true) {
                    self.notifications.warning("Already at the last clip");
                }
            }
            HostEvent::PreviousPressed => {
                if !self.step_playlist(false) {
                    self.notifications.warning("Already at the first clip");
                }
            }
            HostEvent::NewVideo => {
                if let Some(clip) = self.current() {
                    let text = format!("Loading {}", clip.title);
                    tracing::info!("{}", text);
                    self.notifications.info(text);
                }
            }
            HostEvent::Finished => {
                if self.step_playlist(true) {
                    // Continue playback as if the user pressed play.
                    self.overlay.tap_play_pause();
                } else {
                    self.notifications.info("End of playlist");
                }
            }
            HostEvent::PlayerError(error) => {
                tracing::error!("player error: {}", error);
                self.notifications.error(error.to_string());
            }
        }
    }

    pub fn on_focus_lost(&mut self) {
        self.has_focus = false;
        self.overlay.on_focus_lost();
    }

    pub fn on_focus_gained(&mut self) {
        self.has_focus = true;
    }

    pub fn tick(&mut self, now: Instant) {
        self.overlay.tick(now);
        self.notifications.tick(now);
    }

    fn change_volume(&mut self, delta: f32) {
        let volume = (self.player.snapshot().volume + delta).clamp(0.0, 1.0);
        self.player.set_volume(volume);
    }

    pub fn handle_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.player.stop();
                self.should_quit = true;
            }
            KeyCode::Char(' ') => self.overlay.tap_play_pause(),
            KeyCode::Char('n') => self.overlay.tap_next(),
            KeyCode::Char('p') => self.overlay.tap_previous(),
            KeyCode::Char('l') | KeyCode::Right => self.overlay.jump_forward(),
            KeyCode::Char('h') | KeyCode::Left => self.overlay.jump_backward(),
            KeyCode::Char('s') => self.player.stop(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.change_volume(VOLUME_STEP),
            KeyCode::Char('-') => self.change_volume(-VOLUME_STEP),
            _ => {}
        }
    }

    fn scrub_value_at(&self, column: u16) -> Option<f64> {
        let region = self.layout_regions.scrub_bar?;
        let fraction = column_to_fraction(region, column);
        Some(self.overlay.bounds().value_at(fraction))
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) {
        let (x, y) = (event.column, event.row);

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let regions = self.layout_regions.clone();
                if regions.scrub_bar.is_some_and(|r| point_in_rect(x, y, &r)) {
                    self.overlay.begin_scrub();
                    if let Some(value) = self.scrub_value_at(x) {
                        self.overlay.drag_scrub(value);
                    }
                } else if regions.play_button.is_some_and(|r| point_in_rect(x, y, &r)) {
                    self.overlay.tap_play_pause();
                } else if regions.prev_button.is_some_and(|r| point_in_rect(x, y, &r)) {
                    self.overlay.tap_previous();
                } else if regions.next_button.is_some_and(|r| point_in_rect(x, y, &r)) {
                    self.overlay.tap_next();
                }
            }

            MouseEventKind::Drag(MouseButton::Left) => {
                if self.overlay.is_scrubbing() {
                    if let Some(value) = self.scrub_value_at(x) {
                        self.overlay.drag_scrub(value);
                    }
                }
            }

            MouseEventKind::Up(MouseButton::Left) => {
                if self.overlay.is_scrubbing() {
                    if let Some(value) = self.scrub_value_at(x) {
                        self.overlay.end_scrub(value, Instant::now());
                    }
                }
            }

            _ => {}
        }
    }
}

fn point_in_rect(x: u16, y: u16, rect: &Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

/// Position of `column` along a horizontal bar, with the first and last
/// cells mapping to 0 and 1.
pub fn column_to_fraction(region: Rect, column: u16) -> f64 {
    if region.width <= 1 {
        return 0.0;
    }
    let offset = column.saturating_sub(region.x).min(region.width - 1);
    offset as f64 / (region.width - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{PlayerCommand, PlayerSnapshot};
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use std::sync::{Arc, Mutex};

    struct Harness {
        app: App,
        cmd_rx: mpsc::Receiver<PlayerCommand>,
        event_rx: mpsc::Receiver<AppEvent>,
        snapshot: Arc<Mutex<PlayerSnapshot>>,
    }

    impl Harness {
        fn new() -> Self {
            let (cmd_tx, cmd_rx) = mpsc::channel();
            let (event_tx, event_rx) = mpsc::channel();
            let snapshot = Arc::new(Mutex::new(PlayerSnapshot::default()));
            let player = Rc::new(PlayerHandle::new(cmd_tx, snapshot.clone()));
            let app = App::new(&Config::default(), Theme::default(), player, event_tx).unwrap();
            Self {
                app,
                cmd_rx,
                event_rx,
                snapshot,
            }
        }

        fn commands(&self) -> Vec<PlayerCommand> {
            self.cmd_rx.try_iter().collect()
        }

        /// Feeds host events raised by overlay callbacks back into the app.
        fn pump(&mut self) {
            let events: Vec<AppEvent> = self.event_rx.try_iter().collect();
            for event in events {
                if let AppEvent::Host(host) = event {
                    self.app.on_host_event(host);
                }
            }
        }

        fn ready(&mut self) {
            self.app.on_player_event(PlayerEvent::ReadyToPlay);
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn next_key_loads_following_clip() {
        let mut h = Harness::new();

        h.app.handle_input(key(KeyCode::Char('n')));
        h.pump();

        assert_eq!(h.app.current_clip, 1);
        let commands = h.commands();
        assert!(matches!(&commands[0], PlayerCommand::Load(clip) if clip.title == "Harbour at Dusk"));
    }

    #[test]
    fn previous_at_start_only_warns() {
        let mut h = Harness::new();

        h.app.handle_input(key(KeyCode::Char('p')));
        h.pump();

        assert_eq!(h.app.current_clip, 0);
        assert!(h.commands().is_empty());
        assert_eq!(h.app.notifications.active_notifications().len(), 1);
    }

    #[test]
    fn finished_advances_and_keeps_playing() {
        let mut h = Harness::new();

        h.app.on_player_event(PlayerEvent::Finished);
        h.pump();

        assert_eq!(h.app.current_clip, 1);
        let commands = h.commands();
        assert!(matches!(commands[0], PlayerCommand::Load(_)));
        assert!(matches!(commands[1], PlayerCommand::Play));
    }

    #[test]
    fn player_errors_become_notifications() {
        let mut h = Harness::new();

        h.app.on_player_event(PlayerEvent::Error(PlayerError::NoVideoLoaded));
        h.pump();

        let active = h.app.notifications.active_notifications();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].text, "No video is loaded.");
    }

    #[test]
    fn focus_loss_pauses() {
        let mut h = Harness::new();
        h.app.on_focus_lost();

        assert!(!h.app.has_focus);
        assert!(matches!(h.commands()[..], [PlayerCommand::Pause]));
    }

    #[test]
    fn volume_keys_step_from_current_volume() {
        let mut h = Harness::new();
        h.snapshot.lock().unwrap().volume = 0.95;

        h.app.handle_input(key(KeyCode::Char('+')));
        h.app.handle_input(key(KeyCode::Char('-')));

        let commands = h.commands();
        assert!(matches!(commands[0], PlayerCommand::SetVolume(v) if v == 1.0));
        assert!(matches!(commands[1], PlayerCommand::SetVolume(v) if (v - 0.85).abs() < 1e-6));
    }

    #[test]
    fn dragging_the_scrub_bar_seeks_on_release() {
        let mut h = Harness::new();
        h.ready();
        h.app.layout_regions.scrub_bar = Some(Rect::new(10, 5, 11, 1));

        h.app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 12, 5));
        assert!(h.app.overlay.is_interacting());
        h.app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 15, 5));
        assert_eq!(h.app.overlay.scrub_value(), 0.5);
        h.app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 20, 5));

        assert!(matches!(h.commands()[..], [PlayerCommand::Seek(f)] if f == 1.0));
        assert!(!h.app.overlay.is_scrubbing());
    }

    #[test]
    fn clicking_buttons_taps_them() {
        let mut h = Harness::new();
        h.app.layout_regions.play_button = Some(Rect::new(0, 0, 4, 1));
        h.app.layout_regions.next_button = Some(Rect::new(6, 0, 4, 1));

        h.app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 1, 0));
        h.app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 7, 0));
        h.pump();

        let commands = h.commands();
        assert!(matches!(commands[0], PlayerCommand::Play));
        assert!(matches!(commands[1], PlayerCommand::Load(_)));
    }

    #[test]
    fn column_maps_across_the_bar() {
        let region = Rect::new(4, 0, 5, 1);
        assert_eq!(column_to_fraction(region, 4), 0.0);
        assert_eq!(column_to_fraction(region, 6), 0.5);
        assert_eq!(column_to_fraction(region, 8), 1.0);
        assert_eq!(column_to_fraction(region, 0), 0.0);
        assert_eq!(column_to_fraction(region, 50), 1.0);
        assert_eq!(column_to_fraction(Rect::new(0, 0, 1, 1), 0), 0.0);
    }
}

use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use ratatui::style::Color;

use crate::controls::deferred::DeferredTask;
use crate::controls::format::{format_secs, format_time};
use crate::controls::seek::{DEFAULT_JUMP_STEP, SeekBounds, jump_target};
use crate::player::{PlaybackStatus, Player, PlayerError, PlayerEvent};
use crate::ui::loading::Spinner;

/// How long the scrub bar keeps ignoring progress after a release.
pub const DEFAULT_CLEAR_DELAY: Duration = Duration::from_millis(100);

type Callback = Box<dyn FnMut()>;

/// Hooks the host application plugs into the overlay.
#[derive(Default)]
pub struct OverlayCallbacks {
    pub did_press_next: Option<Callback>,
    pub did_press_previous: Option<Callback>,
    pub on_interaction_change: Option<Box<dyn FnMut(bool)>>,
    pub on_new_video: Option<Callback>,
    pub on_finished: Option<Callback>,
    pub on_error: Option<Box<dyn FnMut(PlayerError)>>,
}

#[derive(Debug, Clone, Copy)]
pub struct OverlaySettings {
    pub show_next: bool,
    pub show_previous: bool,
    pub tint: Color,
    pub jump_step: f64,
    pub clear_delay: Duration,
    pub bounds: SeekBounds,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            show_next: true,
            show_previous: true,
            tint: Color::White,
            jump_step: DEFAULT_JUMP_STEP,
            clear_delay: DEFAULT_CLEAR_DELAY,
            bounds: SeekBounds::default(),
        }
    }
}

#[derive(Debug, Clone)]
struct ScrubBar {
    bounds: SeekBounds,
    value: f64,
    interactive: bool,
    dragging: bool,
}

impl ScrubBar {
    fn reset(&mut self) {
        self.value = self.bounds.min();
    }

    fn set_fraction(&mut self, fraction: f64) {
        self.value = self.bounds.value_at(fraction);
    }

    fn set_value(&mut self, value: f64) {
        self.value = value.clamp(self.bounds.min(), self.bounds.max());
    }
}

/// Playback controls bound to a [`Player`].
///
/// Gestures on the widgets turn into player calls and [`PlayerEvent`]s turn
/// into widget updates. The overlay only holds a weak reference to the player
/// and treats a missing player as a no-op.
///
/// While the interaction flag is set (the user is scrubbing, or just paused
/// from the toggle) progress ticks leave the scrub bar alone. Releasing the
/// scrub bar clears the flag after `clear_delay`; the bar then snaps back to
/// the player's position.
pub struct ControlsOverlay {
    player: Option<Weak<dyn Player>>,
    callbacks: OverlayCallbacks,

    play_selected: bool,
    scrub: ScrubBar,
    elapsed_label: String,
    length_label: String,
    spinner: Spinner,

    show_next: bool,
    show_previous: bool,
    tint: Color,
    jump_step: f64,

    interacting: bool,
    pending_clear: DeferredTask,
}

impl ControlsOverlay {
    pub fn new(settings: OverlaySettings) -> Self {
        Self {
            player: None,
            callbacks: OverlayCallbacks::default(),

            play_selected: false,
            scrub: ScrubBar {
                bounds: settings.bounds,
                value: settings.bounds.min(),
                interactive: false,
                dragging: false,
            },
            elapsed_label: format_time(0),
            length_label: format_time(0),
            spinner: Spinner::new(),

            show_next: settings.show_next,
            show_previous: settings.show_previous,
            tint: settings.tint,
            jump_step: settings.jump_step,

            interacting: false,
            pending_clear: DeferredTask::new(settings.clear_delay),
        }
    }

    pub fn attach<P: Player + 'static>(&mut self, player: &Rc<P>) {
        let player: Rc<dyn Player> = player.clone();
        self.player = Some(Rc::downgrade(&player));
    }

    pub fn detach(&mut self) {
        self.player = None;
    }

    pub fn callbacks_mut(&mut self) -> &mut OverlayCallbacks {
        &mut self.callbacks
    }

    fn player(&self) -> Option<Rc<dyn Player>> {
        self.player.as_ref().and_then(Weak::upgrade)
    }

    fn set_interacting(&mut self, interacting: bool) {
        if self.interacting == interacting {
            return;
        }
        self.interacting = interacting;
        if let Some(cb) = self.callbacks.on_interaction_change.as_mut() {
            cb(interacting);
        }
    }

    /// Drops the interaction flag and snaps the scrub bar back to the player.
    fn clear_interaction(&mut self) {
        self.pending_clear.cancel();
        self.set_interacting(false);
        if let Some(player) = self.player() {
            self.scrub.set_fraction(player.progress());
        }
    }

    fn refresh_elapsed(&mut self) {
        if let Some(player) = self.player() {
            self.elapsed_label = format_secs(player.current_time());
        }
    }

    // ---- gestures ----

    pub fn tap_play_pause(&mut self) {
        let Some(player) = self.player() else {
            return;
        };

        if player.status() == PlaybackStatus::Playing {
            player.pause();
            self.play_selected = false;
            self.pending_clear.cancel();
            self.set_interacting(true);
        } else {
            player.play();
            self.play_selected = true;
            self.clear_interaction();
        }
    }

    pub fn tap_next(&mut self) {
        if !self.show_next {
            return;
        }
        if let Some(cb) = self.callbacks.did_press_next.as_mut() {
            cb();
        }
    }

    pub fn tap_previous(&mut self) {
        if !self.show_previous {
            return;
        }
        if let Some(cb) = self.callbacks.did_press_previous.as_mut() {
            cb();
        }
    }

    pub fn begin_scrub(&mut self) {
        if !self.scrub.interactive {
            return;
        }
        // A newer drag supersedes any clear still waiting from the last one.
        self.pending_clear.cancel();
        self.scrub.dragging = true;
        self.set_interacting(true);
    }

    pub fn drag_scrub(&mut self, value: f64) {
        if self.scrub.dragging {
            self.scrub.set_value(value);
        }
    }

    /// Releases the scrub bar at `value`. A release without a preceding
    /// [`Self::begin_scrub`] is treated as a tap on the bar.
    pub fn end_scrub(&mut self, value: f64, now: Instant) {
        if !self.scrub.interactive {
            return;
        }
        self.scrub.dragging = false;
        self.scrub.set_value(value);
        self.set_interacting(true);

        if let Some(player) = self.player() {
            player.seek(self.scrub.bounds.fraction(value));
        }
        self.pending_clear.schedule(now);
    }

    pub fn jump_forward(&mut self) {
        self.jump_by(self.jump_step);
    }

    pub fn jump_backward(&mut self) {
        self.jump_by(-self.jump_step);
    }

    /// Seeks `step` away from the current position. Outside of a drag this
    /// also drops a flag left over from pausing, so the bar follows the jump.
    /// Ignored while the scrub bar is locked for loading.
    pub fn jump_by(&mut self, step: f64) {
        if !self.scrub.interactive {
            return;
        }
        let Some(player) = self.player() else {
            return;
        };
        if !self.scrub.dragging {
            self.clear_interaction();
        }
        player.seek(jump_target(player.progress(), step));
    }

    /// The host application lost the foreground. An open drag is dropped
    /// without seeking since its release will never arrive.
    pub fn on_focus_lost(&mut self) {
        if let Some(player) = self.player() {
            player.pause();
        }
        self.play_selected = false;

        if self.scrub.dragging {
            self.scrub.dragging = false;
            self.clear_interaction();
        }
    }

    /// Runs the deferred flag clear and animates the spinner.
    pub fn tick(&mut self, now: Instant) {
        if self.pending_clear.poll(now) {
            self.clear_interaction();
        }
        self.spinner.tick(now);
    }

    // ---- player events ----

    pub fn handle_player_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::NewVideo => {
                // An unfinished drag belongs to the previous video.
                self.pending_clear.cancel();
                self.scrub.dragging = false;
                self.set_interacting(false);

                self.scrub.interactive = false;
                self.scrub.reset();
                self.spinner.start();
                self.elapsed_label = format_time(0);
                self.length_label = format_time(0);

                if let Some(cb) = self.callbacks.on_new_video.as_mut() {
                    cb();
                }
            }

            PlayerEvent::ReadyToPlay | PlayerEvent::Started => {
                self.scrub.interactive = true;
                self.spinner.stop();
                if let Some(player) = self.player() {
                    self.length_label = format_secs(player.video_length());
                    self.elapsed_label = format_secs(player.current_time());
                }
            }

            PlayerEvent::Progress(fraction) => {
                if !self.interacting {
                    self.scrub.set_fraction(fraction);
                }
                self.refresh_elapsed();
            }

            PlayerEvent::Stopped => {
                self.play_selected = false;
                self.scrub.reset();
            }

            PlayerEvent::Finished => {
                if let Some(cb) = self.callbacks.on_finished.as_mut() {
                    cb();
                }
            }

            PlayerEvent::SeekStarted => self.spinner.start(),
            PlayerEvent::SeekEnded => self.spinner.stop(),

            PlayerEvent::Error(error) => match self.callbacks.on_error.as_mut() {
                Some(sink) => sink(error),
                None => tracing::warn!("unhandled player error: {}", error),
            },
        }
    }

    // ---- host configuration ----

    pub fn set_show_next(&mut self, show: bool) {
        self.show_next = show;
    }

    pub fn set_show_previous(&mut self, show: bool) {
        self.show_previous = show;
    }

    pub fn set_tint(&mut self, tint: Color) {
        self.tint = tint;
    }

    // ---- read-only state for rendering ----

    pub fn is_interacting(&self) -> bool {
        self.interacting
    }

    pub fn play_selected(&self) -> bool {
        self.play_selected
    }

    pub fn bounds(&self) -> SeekBounds {
        self.scrub.bounds
    }

    pub fn scrub_value(&self) -> f64 {
        self.scrub.value
    }

    pub fn scrub_fraction(&self) -> f64 {
        self.scrub.bounds.fraction(self.scrub.value)
    }

    pub fn scrub_interactive(&self) -> bool {
        self.scrub.interactive
    }

    pub fn is_scrubbing(&self) -> bool {
        self.scrub.dragging
    }

    pub fn elapsed_label(&self) -> &str {
        &self.elapsed_label
    }

    pub fn length_label(&self) -> &str {
        &self.length_label
    }

    pub fn spinner_frame(&self) -> Option<&'static str> {
        self.spinner.current_frame()
    }

    pub fn show_next(&self) -> bool {
        self.show_next
    }

    pub fn show_previous(&self) -> bool {
        self.show_previous
    }

    pub fn tint(&self) -> Color {
        self.tint
    }
}

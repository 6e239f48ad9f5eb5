use std::time::{Duration, Instant};

use ratatui::style::Color;

use crate::ui::theme::Theme;

/// Toasts kept on screen at once; older ones are dropped first.
const MAX_VISIBLE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn prefix(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "INFO",
            NotificationLevel::Warning => "WARN",
            NotificationLevel::Error => "ERROR",
        }
    }

    pub fn color(&self, theme: &Theme) -> Color {
        match self {
            NotificationLevel::Info => theme.accent,
            NotificationLevel::Warning => theme.warning,
            NotificationLevel::Error => theme.error,
        }
    }

    fn lifetime(&self) -> Duration {
        match self {
            NotificationLevel::Info => Duration::from_secs(2),
            NotificationLevel::Warning => Duration::from_secs(3),
            NotificationLevel::Error => Duration::from_secs(4),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: String,
    /// How many times this exact message arrived while still visible.
    pub repeats: u32,
    expires_at: Instant,
}

#[derive(Debug, Default)]
pub struct NotificationManager {
    notifications: Vec<Notification>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self {
            notifications: Vec::new(),
        }
    }

    pub fn notify(&mut self, level: NotificationLevel, text: impl Into<String>, now: Instant) {
        let text = text.into();
        let expires_at = now + level.lifetime();

        // A repeated message refreshes the visible toast instead of stacking.
        if let Some(existing) = self
            .notifications
            .iter_mut()
            .find(|n| n.level == level && n.text == text)
        {
            existing.repeats += 1;
            existing.expires_at = expires_at;
            return;
        }

        self.notifications.push(Notification {
            level,
            text,
            repeats: 1,
            expires_at,
        });
        if self.notifications.len() > MAX_VISIBLE {
            self.notifications.remove(0);
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.notify(NotificationLevel::Info, text, Instant::now());
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.notify(NotificationLevel::Warning, text, Instant::now());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.notify(NotificationLevel::Error, text, Instant::now());
    }

    pub fn tick(&mut self, now: Instant) {
        self.notifications.retain(|n| n.expires_at > now);
    }

    pub fn active_notifications(&self) -> &[Notification] {
        &self.notifications
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_level_lifetime() {
        let now = Instant::now();
        let mut manager = NotificationManager::new();
        manager.notify(NotificationLevel::Info, "hello", now);
        manager.notify(NotificationLevel::Error, "boom", now);

        manager.tick(now + Duration::from_secs(3));
        let active = manager.active_notifications();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].text, "boom");

        manager.tick(now + Duration::from_secs(4));
        assert!(manager.active_notifications().is_empty());
    }

    #[test]
    fn repeats_collapse_into_one_toast() {
        let now = Instant::now();
        let mut manager = NotificationManager::new();
        manager.notify(NotificationLevel::Error, "No video is loaded.", now);
        manager.notify(
            NotificationLevel::Error,
            "No video is loaded.",
            now + Duration::from_secs(3),
        );

        assert_eq!(manager.active_notifications().len(), 1);
        assert_eq!(manager.active_notifications()[0].repeats, 2);

        manager.tick(now + Duration::from_secs(5));
        assert_eq!(manager.active_notifications().len(), 1);
    }

    #[test]
    fn oldest_toast_is_dropped_when_full() {
        let now = Instant::now();
        let mut manager = NotificationManager::new();
        for i in 0..=MAX_VISIBLE {
            manager.notify(NotificationLevel::Info, format!("n{i}"), now);
        }

        let active = manager.active_notifications();
        assert_eq!(active.len(), MAX_VISIBLE);
        assert_eq!(active[0].text, "n1");
    }
}

pub mod logging;

use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::controls::OverlaySettings;
use crate::controls::overlay::DEFAULT_CLEAR_DELAY;
use crate::controls::seek::{DEFAULT_JUMP_STEP, SeekBounds};
use crate::player::Clip;
use crate::player::thread::ClockSettings;
use crate::ui::theme::{Theme, ThemeName};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: ThemeName,
    /// Accent color for every overlay widget, e.g. `"#7dcfff"` or `"cyan"`.
    /// Falls back to the theme accent.
    pub tint: Option<String>,
    pub show_next: bool,
    pub show_previous: bool,
    pub jump_step: f64,
    pub interaction_clear_delay_ms: u64,
    pub progress_interval_ms: u64,
    pub load_delay_ms: u64,
    pub volume: f32,
    pub log_level: String,
    pub playlist: Vec<Clip>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ThemeName::default(),
            tint: None,
            show_next: true,
            show_previous: true,
            jump_step: DEFAULT_JUMP_STEP,
            interaction_clear_delay_ms: DEFAULT_CLEAR_DELAY.as_millis() as u64,
            progress_interval_ms: 100,
            load_delay_ms: 600,
            volume: 0.8,
            log_level: "info".to_string(),
            playlist: vec![
                Clip {
                    title: "Opening Titles".to_string(),
                    duration_secs: 95.0,
                },
                Clip {
                    title: "Harbour at Dusk".to_string(),
                    duration_secs: 754.0,
                },
                Clip {
                    title: "Director's Commentary".to_string(),
                    duration_secs: 3725.0,
                },
            ],
        }
    }
}

impl Config {
    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.playlist.is_empty(), "Playlist must contain at least one clip");
        for clip in &self.playlist {
            anyhow::ensure!(
                clip.duration_secs.is_finite() && clip.duration_secs > 0.0,
                "Clip {:?} must have a positive duration",
                clip.title
            );
        }
        anyhow::ensure!(
            self.jump_step > 0.0 && self.jump_step <= 1.0,
            "jump_step must be in (0, 1], got {}",
            self.jump_step
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.volume),
            "volume must be in [0, 1], got {}",
            self.volume
        );
        self.log_level()?;
        self.tint_override()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<tracing::Level> {
        tracing::Level::from_str(&self.log_level)
            .map_err(|_| anyhow::anyhow!("Unknown log_level {:?}", self.log_level))
    }

    fn tint_override(&self) -> Result<Option<Color>> {
        self.tint
            .as_deref()
            .map(|tint| {
                Color::from_str(tint).map_err(|_| anyhow::anyhow!("Unknown tint color {:?}", tint))
            })
            .transpose()
    }

    pub fn overlay_settings(&self, theme: &Theme) -> Result<OverlaySettings> {
        Ok(OverlaySettings {
            show_next: self.show_next,
            show_previous: self.show_previous,
            tint: self.tint_override()?.unwrap_or(theme.accent),
            jump_step: self.jump_step,
            clear_delay: Duration::from_millis(self.interaction_clear_delay_ms),
            bounds: SeekBounds::default(),
        })
    }

    pub fn clock_settings(&self) -> ClockSettings {
        ClockSettings {
            load_delay: Duration::from_millis(self.load_delay_ms),
            progress_interval: Duration::from_millis(self.progress_interval_ms),
            volume: self.volume,
        }
    }
}

fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Could not find config directory")?
        .join("scrubline");

    Ok(config_dir.join("config.yml"))
}

fn write_default(config_path: &Path) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let yaml =
        serde_yaml::to_string(&Config::default()).context("Failed to serialize default config")?;
    fs::write(config_path, yaml).context("Failed to write default config file")?;

    eprintln!("Config file created at: {}", config_path.display());
    Ok(())
}

pub fn load_or_create_config() -> Result<Config> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        write_default(&config_path)?;
    }

    let config_content = fs::read_to_string(&config_path).context("Failed to read config file")?;
    Config::parse(&config_content).with_context(|| format!("In {}", config_path.display()))
}

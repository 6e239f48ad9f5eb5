use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeName {
    TokyoNight,
    #[default]
    CatppuccinMocha,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    // Base colors
    pub bg: Color,
    pub fg: Color,
    pub fg_dim: Color,

    // UI elements
    pub border: Color,
    pub video_bg: Color,

    // Accents
    pub accent: Color,

    // Semantic colors
    pub playing: Color,
    pub paused: Color,
    pub warning: Color,
    pub error: Color,
}

impl Theme {
    pub const fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::TokyoNight => Self::tokyo_night(),
            ThemeName::CatppuccinMocha => Self::catppuccin_mocha(),
        }
    }

    pub const fn tokyo_night() -> Self {
        Self {
            // Base
            bg: Color::Rgb(26, 27, 38),      // #1a1b26
            fg: Color::Rgb(192, 202, 245),   // #c0caf5
            fg_dim: Color::Rgb(86, 95, 137), // #565f89

            // UI elements
            border: Color::Rgb(61, 89, 161), // #3d59a1
            video_bg: Color::Rgb(22, 22, 30), // #16161e

            // Accents
            accent: Color::Rgb(125, 207, 255), // #7dcfff

            // Semantic
            playing: Color::Rgb(158, 206, 106), // #9ece6a
            paused: Color::Rgb(224, 175, 104),  // #e0af68
            warning: Color::Rgb(255, 158, 100), // #ff9e64
            error: Color::Rgb(247, 118, 142),   // #f7768e
        }
    }

    pub const fn catppuccin_mocha() -> Self {
        Self {
            // Base
            bg: Color::Rgb(30, 30, 46),        // #1e1e2e
            fg: Color::Rgb(205, 214, 244),     // #cdd6f4
            fg_dim: Color::Rgb(108, 112, 134), // #6c7086

            // UI elements
            border: Color::Rgb(137, 180, 250), // #89b4fa
            video_bg: Color::Rgb(17, 17, 27),  // #11111b

            // Accents
            accent: Color::Rgb(148, 226, 213), // #94e2d5

            // Semantic
            playing: Color::Rgb(166, 227, 161), // #a6e3a1
            paused: Color::Rgb(249, 226, 175),  // #f9e2af
            warning: Color::Rgb(250, 179, 135), // #fab387
            error: Color::Rgb(243, 139, 168),   // #f38ba8
        }
    }

    // Computed styles
    pub fn border_style(&self) -> Style {
        Style::new().fg(self.fg_dim)
    }

    pub fn label_style(&self) -> Style {
        Style::new().fg(self.fg_dim)
    }

    pub fn value_style(&self) -> Style {
        Style::new().fg(self.fg)
    }

    pub fn title_style(&self) -> Style {
        Style::new().fg(self.fg).add_modifier(Modifier::BOLD)
    }

    /// Style for overlay widgets drawn in the tint color.
    pub fn tinted(&self, tint: Color) -> Style {
        Style::new().fg(tint)
    }

    /// Tinted style, dimmed while the widget refuses input.
    pub fn tinted_if(&self, tint: Color, enabled: bool) -> Style {
        if enabled {
            self.tinted(tint)
        } else {
            Style::new().fg(self.fg_dim).add_modifier(Modifier::DIM)
        }
    }

    pub fn status_color(&self, playing: bool) -> Color {
        if playing { self.playing } else { self.paused }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_name(ThemeName::default())
    }
}

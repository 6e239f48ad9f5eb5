use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{
    app::state::App,
    controls::ControlsOverlay,
    player::{PlaybackStatus, PlayerSnapshot},
    ui::theme::Theme,
};

const ROUNDED_BORDER: border::Set = border::ROUNDED;

const PREV_LABEL: &str = "⏮ Prev";
const NEXT_LABEL: &str = "Next ⏭";
const BUTTON_WIDTH: u16 = 10;

fn block_with_title(title: &'_ str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_set(ROUNDED_BORDER)
        .title(title)
}

pub fn render(f: &mut Frame, app: &mut App) {
    let theme = app.theme;
    let area = f.area();

    let background = Block::default().style(Style::default().bg(theme.bg));
    f.render_widget(background, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(area);

    let snapshot = app.player.snapshot();
    draw_video_view(f, chunks[0], app, &snapshot);
    draw_controls(f, chunks[1], app, &snapshot);
    draw_footer(f, chunks[2], &theme);
    draw_notifications(f, area, app);
}

fn draw_video_view(f: &mut Frame, area: Rect, app: &App, snapshot: &PlayerSnapshot) {
    let theme = &app.theme;
    let title = match app.current() {
        Some(clip) => format!(" {} ({}/{}) ", clip.title, app.current_clip + 1, app.playlist.len()),
        None => " No video ".to_string(),
    };

    let block = block_with_title(&title)
        .border_style(theme.border_style())
        .style(Style::default().bg(theme.video_bg));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let status = if snapshot.loading {
        Span::styled("Loading…", theme.label_style())
    } else {
        let (text, playing) = match snapshot.status {
            PlaybackStatus::Idle => ("Ready", false),
            PlaybackStatus::Playing => ("▶ Playing", true),
            PlaybackStatus::Paused => ("⏸ Paused", false),
            PlaybackStatus::Stopped => ("⏹ Stopped", false),
        };
        Span::styled(
            text,
            Style::new()
                .fg(theme.status_color(playing))
                .add_modifier(Modifier::BOLD),
        )
    };

    let mut lines = vec![Line::from(status)];
    if !app.has_focus {
        lines.push(Line::from(Span::styled(
            "(window inactive)",
            theme.label_style(),
        )));
    }

    let text_area = Rect {
        x: inner.x,
        y: inner.y + inner.height.saturating_sub(lines.len() as u16) / 2,
        width: inner.width,
        height: (lines.len() as u16).min(inner.height),
    };
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), text_area);
}

fn draw_controls(f: &mut Frame, area: Rect, app: &mut App, snapshot: &PlayerSnapshot) {
    let theme = app.theme;
    let tint = app.overlay.tint();

    let block = block_with_title(" Controls ").border_style(theme.tinted(tint));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    draw_buttons(f, rows[0], app);
    draw_scrub_row(f, rows[2], app);

    let volume = format!("Vol {:>3.0}%", snapshot.volume * 100.0);
    f.render_widget(
        Paragraph::new(volume)
            .alignment(Alignment::Right)
            .style(theme.tinted(tint)),
        rows[1],
    );
}

fn draw_buttons(f: &mut Frame, area: Rect, app: &mut App) {
    let overlay = &app.overlay;
    let style = app.theme.tinted(overlay.tint());

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(BUTTON_WIDTH),
            Constraint::Length(BUTTON_WIDTH + 2),
            Constraint::Length(BUTTON_WIDTH),
            Constraint::Min(0),
        ])
        .split(area);

    let play_label = if overlay.play_selected() {
        "⏸ Pause"
    } else {
        "▶ Play"
    };
    f.render_widget(
        Paragraph::new(play_label)
            .alignment(Alignment::Center)
            .style(style.add_modifier(Modifier::BOLD)),
        cells[2],
    );

    let prev = overlay.show_previous().then_some(cells[1]);
    let next = overlay.show_next().then_some(cells[3]);
    if let Some(cell) = prev {
        f.render_widget(
            Paragraph::new(PREV_LABEL).alignment(Alignment::Center).style(style),
            cell,
        );
    }
    if let Some(cell) = next {
        f.render_widget(
            Paragraph::new(NEXT_LABEL).alignment(Alignment::Center).style(style),
            cell,
        );
    }

    app.layout_regions.play_button = Some(cells[2]);
    app.layout_regions.prev_button = prev;
    app.layout_regions.next_button = next;
}

fn draw_scrub_row(f: &mut Frame, area: Rect, app: &mut App) {
    let overlay = &app.overlay;
    let theme = &app.theme;
    let tint = overlay.tint();

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(9),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(9),
        ])
        .split(area);

    if let Some(frame) = overlay.spinner_frame() {
        f.render_widget(Paragraph::new(frame).style(theme.tinted(tint)), cells[0]);
    }
    f.render_widget(
        Paragraph::new(overlay.elapsed_label())
            .alignment(Alignment::Right)
            .style(theme.tinted(tint)),
        cells[1],
    );
    f.render_widget(
        Paragraph::new(overlay.length_label())
            .alignment(Alignment::Left)
            .style(theme.tinted(tint)),
        cells[5],
    );

    draw_slider(f, cells[3], overlay, theme);
    app.layout_regions.scrub_bar = Some(cells[3]);
}

fn draw_slider(f: &mut Frame, area: Rect, overlay: &ControlsOverlay, theme: &Theme) {
    let width = area.width as usize;
    if width == 0 {
        return;
    }

    let knob = knob_position(overlay.scrub_fraction(), width);
    let style = theme.tinted_if(overlay.tint(), overlay.scrub_interactive());
    let knob_style = if overlay.is_interacting() {
        style.add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        style
    };

    let line = Line::from(vec![
        Span::styled("━".repeat(knob), style),
        Span::styled("●", knob_style),
        Span::styled("─".repeat(width - knob - 1), theme.label_style()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Cell index of the slider knob for a fraction, inside `[0, width - 1]`.
fn knob_position(fraction: f64, width: usize) -> usize {
    if width <= 1 {
        return 0;
    }
    ((fraction.clamp(0.0, 1.0) * (width - 1) as f64).round() as usize).min(width - 1)
}

fn draw_footer(f: &mut Frame, area: Rect, theme: &Theme) {
    let keybinds =
        "Space: Play/Pause | ←→/hl: Jump | n/p: Next/Prev | s: Stop | +/-: Volume | q: Quit";

    f.render_widget(
        Paragraph::new(keybinds)
            .style(theme.label_style())
            .block(block_with_title("").border_style(theme.border_style())),
        area,
    );
}

fn draw_notifications(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let width = area.width.min(48);

    for (i, notification) in app.notifications.active_notifications().iter().enumerate() {
        let y = area.y + 1 + i as u16 * 3;
        if y + 3 > area.y + area.height {
            break;
        }
        let toast_area = Rect {
            x: area.x + area.width - width,
            y,
            width,
            height: 3,
        };

        let color = notification.level.color(theme);
        let mut text = notification.text.clone();
        if notification.repeats > 1 {
            text.push_str(&format!(" (x{})", notification.repeats));
        }
        let title = format!(" {} ", notification.level.prefix());

        f.render_widget(Clear, toast_area);
        f.render_widget(
            Paragraph::new(text)
                .style(Style::new().fg(theme.fg).bg(theme.bg))
                .block(block_with_title(&title).border_style(Style::new().fg(color))),
            toast_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knob_spans_the_whole_bar() {
        assert_eq!(knob_position(0.0, 11), 0);
        assert_eq!(knob_position(0.5, 11), 5);
        assert_eq!(knob_position(1.0, 11), 10);
        assert_eq!(knob_position(2.0, 11), 10);
        assert_eq!(knob_position(0.7, 1), 0);
    }
}

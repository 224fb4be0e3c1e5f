use std::time::{Duration, Instant};

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::config::{Palette, WallPolicy};
use crate::game::Snapshot;

const SEPARATOR: &str = " │ ";
const VALUE_FLASH_HOLD_DURATION: Duration = Duration::from_millis(600);
const VALUE_FLASH_FADE_DURATION: Duration = Duration::from_millis(900);

/// Last-change timestamps for HUD values that flash when they move.
#[derive(Debug, Clone, Copy, Default)]
pub struct HudValueFlash {
    pub score_changed_at: Option<Instant>,
    pub level_changed_at: Option<Instant>,
    pub high_score_changed_at: Option<Instant>,
}

impl HudValueFlash {
    /// Stamps every value that differs between two snapshots.
    pub fn observe(&mut self, previous: &Snapshot, current: &Snapshot, now: Instant) {
        if previous.score != current.score {
            self.score_changed_at = Some(now);
        }
        if previous.level != current.level {
            self.level_changed_at = Some(now);
        }
        if previous.high_score != current.high_score {
            self.high_score_changed_at = Some(now);
        }
    }
}

/// Frame-local values the HUD needs besides the snapshot.
#[derive(Debug, Clone, Copy)]
pub struct HudInfo<'a> {
    pub palette: &'a Palette,
    pub value_flash: HudValueFlash,
    pub now: Instant,
}

/// Renders the two HUD rows and returns the play area above them.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot, info: &HudInfo<'_>) -> Rect {
    let [play_area, score_area, status_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(score_line(snapshot, usize::from(score_area.width), info))
            .alignment(Alignment::Right)
            .style(Style::default().fg(info.palette.hud_label)),
        score_area,
    );
    frame.render_widget(
        Paragraph::new(status_line(snapshot, info.palette))
            .alignment(Alignment::Right)
            .style(Style::default().fg(info.palette.hud_label)),
        status_area,
    );

    play_area
}

fn score_line(snapshot: &Snapshot, available_width: usize, info: &HudInfo<'_>) -> Line<'static> {
    let length = snapshot.snake.len();
    let compact = score_line_width(length, snapshot, false) > available_width;
    let labels = if compact {
        ["L", "V", "S", "H"]
    } else {
        ["Length", "Level", "Score", "Hi"]
    };

    let value = info.palette.hud_value;
    let accent = info.palette.snake_head;
    let flash = info.value_flash;
    let level_style = Style::default().fg(flash_color(value, accent, flash.level_changed_at, info.now));
    let score_style = Style::default().fg(flash_color(value, accent, flash.score_changed_at, info.now));
    let high_style = Style::default().fg(flash_color(
        info.palette.hud_label,
        accent,
        flash.high_score_changed_at,
        info.now,
    ));

    Line::from(vec![
        Span::raw(format!("{}: ", labels[0])),
        Span::styled(length.to_string(), Style::default().fg(value)),
        Span::raw(SEPARATOR),
        Span::raw(format!("{}: ", labels[1])),
        Span::styled(snapshot.level.to_string(), level_style),
        Span::raw(SEPARATOR),
        Span::raw(format!("{}: ", labels[2])),
        Span::styled(snapshot.score.to_string(), score_style),
        Span::raw(SEPARATOR),
        Span::raw(format!("{}: ", labels[3])),
        Span::styled(snapshot.high_score.to_string(), high_style),
    ])
}

fn score_line_width(length: usize, snapshot: &Snapshot, compact: bool) -> usize {
    let labels = if compact {
        ["L", "V", "S", "H"]
    } else {
        ["Length", "Level", "Score", "Hi"]
    };
    let text = format!(
        "{}: {length}{SEPARATOR}{}: {}{SEPARATOR}{}: {}{SEPARATOR}{}: {}",
        labels[0], labels[1], snapshot.level, labels[2], snapshot.score, labels[3], snapshot.high_score,
    );
    text.width()
}

fn status_line(snapshot: &Snapshot, palette: &Palette) -> Line<'static> {
    let walls_color = match snapshot.wall_policy {
        WallPolicy::Blocking => palette.food,
        WallPolicy::Wrapping => palette.snake_body,
    };
    let mut spans = vec![
        Span::raw(format!("{}x{}", snapshot.grid.width, snapshot.grid.height)),
        Span::raw(SEPARATOR),
        Span::raw("Walls: "),
        Span::styled(snapshot.wall_policy.label(), Style::default().fg(walls_color)),
        Span::raw(SEPARATOR),
        Span::styled(
            format!("{} moves/s", snapshot.moves_per_second),
            Style::default().fg(palette.hud_value),
        ),
    ];

    if let Some(bonus) = snapshot.bonus {
        spans.push(Span::raw(SEPARATOR));
        spans.push(Span::styled(
            format!("+{} for {}", bonus.points, bonus.remaining_ticks),
            Style::default().fg(palette.bonus),
        ));
    }

    Line::from(spans)
}

fn flash_color(base: Color, accent: Color, changed_at: Option<Instant>, now: Instant) -> Color {
    let Some(changed_at) = changed_at else {
        return base;
    };
    let elapsed = now.saturating_duration_since(changed_at);
    if elapsed <= VALUE_FLASH_HOLD_DURATION {
        return accent;
    }
    if elapsed >= VALUE_FLASH_HOLD_DURATION + VALUE_FLASH_FADE_DURATION {
        return base;
    }

    let fade_elapsed = elapsed - VALUE_FLASH_HOLD_DURATION;
    let t = fade_elapsed.as_secs_f32() / VALUE_FLASH_FADE_DURATION.as_secs_f32();
    blend_color(accent, base, ease_out_cubic(t))
}

fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

fn blend_color(from: Color, to: Color, t: f32) -> Color {
    match (from, to) {
        (Color::Rgb(fr, fg, fb), Color::Rgb(tr, tg, tb)) => {
            Color::Rgb(lerp_u8(fr, tr, t), lerp_u8(fg, tg, t), lerp_u8(fb, tb, t))
        }
        _ if t < 1.0 => from,
        _ => to,
    }
}

fn lerp_u8(from: u8, to: u8, t: f32) -> u8 {
    (f32::from(from) + (f32::from(to) - f32::from(from)) * t).round() as u8
}

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};
use ratatui::Frame;

use crate::config::Palette;
use crate::game::{DeathReason, RunState, Snapshot};

/// Draws the overlay matching the run state; nothing while running.
pub fn render_overlay(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot, palette: &Palette) {
    match snapshot.run_state {
        RunState::Idle => render_start_menu(frame, area, snapshot, palette),
        RunState::Paused => render_pause_menu(frame, area),
        RunState::GameOver | RunState::Victory => render_game_over_menu(frame, area, snapshot),
        RunState::Running => {}
    }
}

fn render_start_menu(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot, palette: &Palette) {
    let popup = centered_popup(area, 70, 50);
    frame.render_widget(Clear, popup);

    let [title_row, body_row, footer_row] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(2),
    ])
    .areas(popup);

    frame.render_widget(
        Paragraph::new(Line::from("SNAKE EVOLUTION"))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(palette.menu_title)
                    .add_modifier(Modifier::BOLD),
            ),
        title_row,
    );

    let body = vec![
        Line::from(format!("High score: {}", snapshot.high_score)),
        Line::from(format!("Walls: {}", snapshot.wall_policy.label())),
        Line::from(""),
        Line::from("[Space]/[Enter] Start"),
        Line::from("[T] Toggle walls"),
        Line::from("[Q] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" start ")),
        body_row,
    );

    frame.render_widget(
        Paragraph::new(Line::from("Arrows / WASD / HJKL to move"))
            .alignment(Alignment::Center)
            .style(Style::default().fg(palette.menu_footer)),
        footer_row,
    );
}

fn render_pause_menu(frame: &mut Frame<'_>, area: Rect) {
    let popup = centered_popup(area, 60, 30);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("PAUSED"),
        Line::from(""),
        Line::from("[Space] Resume"),
        Line::from("[Q] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" pause ")),
        popup,
    );
}

fn render_game_over_menu(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot) {
    let popup = centered_popup(area, 70, 45);
    frame.render_widget(Clear, popup);

    let is_new_high = snapshot.score > 0 && snapshot.score == snapshot.high_score;
    let (title, heading) = if snapshot.run_state == RunState::Victory {
        (" victory ", "BOARD CLEARED")
    } else {
        (" game over ", "GAME OVER")
    };
    let lines = vec![
        Line::from(heading),
        Line::from(""),
        Line::from(format!("Score: {}", snapshot.score)),
        Line::from(format!("High score: {}", snapshot.high_score)),
        Line::from(match snapshot.death_reason {
            Some(DeathReason::WallCollision) => "Cause: hit wall",
            Some(DeathReason::SelfCollision) => "Cause: hit yourself",
            None => "",
        }),
        Line::from(if is_new_high { "New high score!" } else { "" }),
        Line::from(""),
        Line::from("[Space]/[Enter] Play again"),
        Line::from("[Q] Quit"),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(title)),
        popup,
    );
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}

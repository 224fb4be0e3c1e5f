use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::config::{
    GridSize, Palette, BORDER_HALF_BLOCK, CELL_WIDTH, GLYPH_BONUS, GLYPH_CELL, GLYPH_FOOD,
};
use crate::game::Snapshot;
use crate::snake::Position;
use crate::ui::hud::{render_hud, HudInfo};
use crate::ui::menu::render_overlay;

/// Renders the full game frame from a snapshot. No game decisions happen here.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot, hud_info: &HudInfo<'_>) {
    let area = frame.area();
    let play_area = render_hud(frame, area, snapshot, hud_info);
    let palette = hud_info.palette;

    let board = board_rect(play_area, snapshot.grid);
    let block = Block::bordered()
        .border_set(BORDER_HALF_BLOCK)
        .border_style(Style::new().fg(palette.border_fg).bg(palette.border_bg))
        .style(Style::new().bg(palette.grid_bg));

    let inner = block.inner(board);
    frame.render_widget(block, board);

    render_items(frame, inner, snapshot, palette);
    render_snake(frame, inner, snapshot, palette);
    render_overlay(frame, board, snapshot, palette);
}

/// Centres the bordered board inside `area`, shrinking it if the terminal is
/// too small.
fn board_rect(area: Rect, grid: GridSize) -> Rect {
    let width = grid
        .width
        .saturating_mul(CELL_WIDTH)
        .saturating_add(2)
        .min(area.width);
    let height = grid.height.saturating_add(2).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_items(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot, palette: &Palette) {
    let buffer = frame.buffer_mut();

    if let Some((x, y)) = logical_to_terminal(inner, snapshot.grid, snapshot.food) {
        buffer.set_string(x, y, GLYPH_FOOD, Style::new().fg(palette.food).bg(palette.grid_bg));
    }

    if let Some(bonus) = snapshot.bonus {
        if let Some((x, y)) = logical_to_terminal(inner, snapshot.grid, bonus.position) {
            buffer.set_string(
                x,
                y,
                GLYPH_BONUS,
                Style::new()
                    .fg(palette.bonus)
                    .bg(palette.grid_bg)
                    .add_modifier(Modifier::BOLD),
            );
        }
    }
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot, palette: &Palette) {
    let buffer = frame.buffer_mut();

    // Tail first so the head is drawn last.
    for (index, segment) in snapshot.snake.iter().enumerate().rev() {
        let Some((x, y)) = logical_to_terminal(inner, snapshot.grid, *segment) else {
            continue;
        };
        let color = if index == 0 {
            palette.snake_head
        } else {
            palette.snake_body
        };
        buffer.set_string(x, y, GLYPH_CELL, Style::new().fg(color));
    }
}

fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use ratatui::Terminal;

    use crate::config::{GridSize, SimulationConfig, PALETTE};
    use crate::game::Simulation;
    use crate::score::MemoryStore;
    use crate::snake::Position;
    use crate::ui::hud::{HudInfo, HudValueFlash};

    use super::{logical_to_terminal, render};

    #[test]
    fn cells_map_two_columns_wide() {
        let inner = Rect::new(1, 1, 20, 10);
        let grid = GridSize {
            width: 10,
            height: 10,
        };

        assert_eq!(
            logical_to_terminal(inner, grid, Position { x: 3, y: 2 }),
            Some((7, 3))
        );
        assert_eq!(logical_to_terminal(inner, grid, Position { x: 10, y: 2 }), None);
    }

    #[test]
    fn cells_outside_a_clipped_board_are_skipped() {
        let inner = Rect::new(0, 0, 6, 2);
        let grid = GridSize {
            width: 10,
            height: 10,
        };

        assert_eq!(logical_to_terminal(inner, grid, Position { x: 3, y: 0 }), None);
        assert_eq!(logical_to_terminal(inner, grid, Position { x: 0, y: 5 }), None);
    }

    #[test]
    fn frame_renders_without_panicking_on_small_terminal() {
        let simulation = Simulation::new_with_seed(
            SimulationConfig::default(),
            Box::new(MemoryStore::default()),
            1,
        )
        .expect("default config is valid");
        let snapshot = simulation.snapshot();
        let info = HudInfo {
            palette: &PALETTE,
            value_flash: HudValueFlash::default(),
            now: Instant::now(),
        };

        for (width, height) in [(80, 40), (20, 8)] {
            let mut terminal =
                Terminal::new(TestBackend::new(width, height)).expect("test backend");
            terminal
                .draw(|frame| render(frame, &snapshot, &info))
                .expect("draw succeeds");
        }
    }
}

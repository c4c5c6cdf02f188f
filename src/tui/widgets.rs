use ratatui::layout::Position;
use ratatui::prelude::*;
use ratatui::widgets::Widget;

use crate::pipeline::assign::SwatchGrid;

/// Terminal cells per swatch. The grid region is always exactly
/// `cols * CELL_WIDTH` by `rows * CELL_HEIGHT`, the terminal-cell analog of
/// a fixed button size.
pub const CELL_WIDTH: u16 = 9;
pub const CELL_HEIGHT: u16 = 3;

/// Label shown while an activated swatch's hex code sits on the clipboard.
pub const COPIED_LABEL: &str = "Copied!";

fn to_color(c: crate::color::Color) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Rect the swatch grid occupies: its fixed size, centered within `area`
/// and clipped to it.
pub fn grid_rect(area: Rect, rows: usize, cols: usize) -> Rect {
    let width = (cols as u16).saturating_mul(CELL_WIDTH);
    let height = (rows as u16).saturating_mul(CELL_HEIGHT);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Map a terminal position to the slot under it, if any.
pub fn hit_test(area: Rect, grid: &SwatchGrid, x: u16, y: u16) -> Option<usize> {
    let rect = grid_rect(area, grid.rows(), grid.cols());
    if !rect.contains(Position { x, y }) {
        return None;
    }
    let col = ((x - rect.x) / CELL_WIDTH) as usize;
    let row = ((y - rect.y) / CELL_HEIGHT) as usize;
    if col >= grid.cols() || row >= grid.rows() {
        return None;
    }
    Some(grid.index_of(col, row))
}

/// Renders the swatch grid: one colored cell per occupied slot with its hex
/// code centered on the swatch, black or white for contrast. Empty slots are
/// not drawn. The hovered slot is dimmed, the keyboard-selected slot gets
/// bold + underline.
pub struct SwatchGridWidget<'a> {
    grid: &'a SwatchGrid,
    copied: &'a [bool],
    hovered: Option<usize>,
    selected: Option<usize>,
}

impl<'a> SwatchGridWidget<'a> {
    pub fn new(grid: &'a SwatchGrid, copied: &'a [bool]) -> Self {
        Self {
            grid,
            copied,
            hovered: None,
            selected: None,
        }
    }

    pub fn hovered(mut self, hovered: Option<usize>) -> Self {
        self.hovered = hovered;
        self
    }

    pub fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }
}

impl Widget for SwatchGridWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rect = grid_rect(area, self.grid.rows(), self.grid.cols());

        for index in 0..self.grid.capacity() {
            let Some(color) = self.grid.slot(index).color() else {
                continue;
            };
            let (col, row) = self.grid.position_of(index);

            let cell = Rect {
                x: rect.x + col as u16 * CELL_WIDTH,
                y: rect.y + row as u16 * CELL_HEIGHT,
                width: CELL_WIDTH,
                height: CELL_HEIGHT,
            }
            .intersection(area)
            .intersection(buf.area);
            if cell.is_empty() {
                continue;
            }

            let background = if self.hovered == Some(index) {
                color.dimmed()
            } else {
                color
            };
            // Label contrast follows the swatch's own color, not the dim.
            let mut style = Style::default()
                .bg(to_color(background))
                .fg(to_color(color.label_color()));
            buf.set_style(cell, style);

            if self.selected == Some(index) {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }

            let label = if self.copied.get(index).copied().unwrap_or(false) {
                COPIED_LABEL.to_string()
            } else {
                color.to_hex()
            };
            let label_y = rect.y + row as u16 * CELL_HEIGHT + CELL_HEIGHT / 2;
            let label_x = rect.x
                + col as u16 * CELL_WIDTH
                + CELL_WIDTH.saturating_sub(label.len() as u16) / 2;
            if label_y >= cell.y && label_y < cell.bottom() && label_x < cell.right() {
                let max_width = (cell.right() - label_x) as usize;
                buf.set_stringn(label_x, label_y, &label, max_width, style);
            }
        }
    }
}

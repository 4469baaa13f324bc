use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::{Block, Borders, Widget};

use neurostream_core::encoder::{Rgb, FIRING_HEIGHT};
use neurostream_core::instance::{Instance, InstancedRenderer};
use neurostream_data::CellCoordinate;

/// Terminal columns per grid cell, so cells come out roughly square.
pub const CELL_COLUMNS: u16 = 2;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const EMPTY_SLOT: char = '·';

/// Draws the instance pool top-down: one bar glyph per cell, its height and
/// color taken straight from the instance.
pub struct GridWidget<'a> {
    renderer: &'a InstancedRenderer,
    title: &'a str,
}

impl<'a> GridWidget<'a> {
    pub fn new(renderer: &'a InstancedRenderer, title: &'a str) -> Self {
        Self { renderer, title }
    }

    pub fn inner_area(area: Rect) -> Rect {
        Block::default().borders(Borders::ALL).inner(area)
    }

    pub fn glyph_for(instance: &Instance) -> char {
        if !instance.visible {
            return EMPTY_SLOT;
        }
        let level = (instance.height / FIRING_HEIGHT * BARS.len() as f32).ceil() as usize;
        BARS[level.clamp(1, BARS.len()) - 1]
    }

    pub fn color_for(instance: &Instance) -> Color {
        if !instance.visible {
            return Color::DarkGray;
        }
        to_color(instance.color)
    }

    /// Screen position of a grid cell, if it fits in `area`.
    pub fn cell_to_screen(coordinate: CellCoordinate, area: Rect) -> Option<(u16, u16)> {
        let inner = Self::inner_area(area);
        let column = u16::try_from(coordinate.x).ok()?.checked_mul(CELL_COLUMNS)?;
        let row = u16::try_from(coordinate.y).ok()?;
        let x = inner.x.checked_add(column)?;
        let y = inner.y.checked_add(row)?;
        if x.saturating_add(CELL_COLUMNS) <= inner.right() && y < inner.bottom() {
            Some((x, y))
        } else {
            None
        }
    }
}

pub fn to_color(rgb: Rgb) -> Color {
    let (r, g, b) = rgb.to_u8();
    Color::Rgb(r, g, b)
}

impl<'a> Widget for GridWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.renderer.grid() {
            Some(grid) => format!(" {} ({}x{}) ", self.title, grid.width, grid.height),
            None => format!(" {} (waiting for snapshot) ", self.title),
        };
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .render(area, buf);

        let Some(grid) = self.renderer.grid() else {
            return;
        };

        for (index, instance) in self.renderer.instances().iter().enumerate() {
            let Some(coordinate) = grid.coordinate_of(index) else {
                continue;
            };
            let Some((x, y)) = Self::cell_to_screen(coordinate, area) else {
                continue;
            };
            let glyph = Self::glyph_for(instance).to_string();
            let color = Self::color_for(instance);
            for column in 0..CELL_COLUMNS {
                let cell = &mut buf[(x + column, y)];
                cell.set_symbol(&glyph);
                cell.set_fg(color);
            }
        }
    }
}

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use neurostream_core::encoder::{
    EXCITATORY_ACTIVE, EXCITATORY_RESTING, INHIBITORY_ACTIVE, INHIBITORY_FIRING,
    INHIBITORY_RESTING,
};

use crate::renderer::to_color;

/// Centered key to the color coding, toggled with `l`.
pub struct LegendWidget;

fn swatch(color: Color, label: &str) -> Line<'_> {
    Line::from(vec![
        Span::styled(" ██ ", Style::default().fg(color)),
        Span::raw(label),
    ])
}

impl Widget for LegendWidget {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let legend_width = 44.min(area.width.saturating_sub(4));
        let legend_height = 12.min(area.height.saturating_sub(4));
        let legend_area = Rect::new(
            area.x + (area.width - legend_width) / 2,
            area.y + (area.height - legend_height) / 2,
            legend_width,
            legend_height,
        );

        Clear.render(legend_area, buf);
        let legend_text = vec![
            swatch(Color::White, "Firing excitatory"),
            swatch(to_color(INHIBITORY_FIRING), "Firing inhibitory"),
            swatch(to_color(EXCITATORY_ACTIVE), "Active excitatory"),
            swatch(to_color(INHIBITORY_ACTIVE), "Active inhibitory"),
            swatch(to_color(EXCITATORY_RESTING), "Resting excitatory"),
            swatch(to_color(INHIBITORY_RESTING), "Resting inhibitory"),
            Line::from(""),
            Line::from(" Bar height follows activation;"),
            Line::from(" deeper layers render dimmer."),
            Line::from(" [L] Legend  [Q] Quit "),
        ];

        Paragraph::new(legend_text)
            .block(Block::default().title(" Legend ").borders(Borders::ALL))
            .render(legend_area, buf);
    }
}

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use neurostream_core::instance::FrameStats;
use neurostream_data::{ConnectionStatus, StreamStatus};

/// Two-line header: connection health on top, ingest counters below.
pub struct StatusWidget<'a> {
    pub pet_id: &'a str,
    pub status: &'a StreamStatus,
    pub stats: FrameStats,
    pub fps: f64,
}

pub fn status_color(status: ConnectionStatus) -> Color {
    match status {
        ConnectionStatus::Connecting => Color::Yellow,
        ConnectionStatus::Connected => Color::Green,
        ConnectionStatus::Degraded => Color::Rgb(255, 165, 0),
        ConnectionStatus::Error => Color::Red,
    }
}

impl<'a> Widget for StatusWidget<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let lines = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        let health = self.status.status;
        let mut first = vec![
            Span::styled(
                format!(" ● {} ", health.label()),
                Style::default()
                    .fg(status_color(health))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("| Pet: {} ", self.pet_id)),
        ];
        if health == ConnectionStatus::Degraded && self.status.reconnect_attempts > 0 {
            first.push(Span::styled(
                format!("| Attempt {} ", self.status.reconnect_attempts),
                Style::default().fg(Color::DarkGray),
            ));
        }
        if let Some(message) = &self.status.error_message {
            first.push(Span::styled(
                format!("| {message}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        Paragraph::new(Line::from(first)).render(lines[0], buf);

        let grid = match self.status.grid {
            Some(grid) => format!("{}x{}", grid.width, grid.height),
            None => "?".to_string(),
        };
        Paragraph::new(format!(
            " Grid: {} | Cells: {} | Firing: {} | Updates: {} | Msgs: {} | Bad: {} | FPS: {:.0}",
            grid,
            self.stats.visible,
            self.stats.firing,
            self.status.cells_updated_count,
            self.status.messages_received,
            self.status.parse_failures,
            self.fps
        ))
        .style(Style::default().fg(Color::Gray))
        .render(lines[1], buf);
    }
}

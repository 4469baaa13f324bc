use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap};

/// Popup shown once the session has failed for good.
pub struct FailureWidget<'a> {
    pub message: &'a str,
}

impl<'a> Widget for FailureWidget<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let width = 60.min(area.width.saturating_sub(4));
        let height = 9.min(area.height.saturating_sub(2));
        let popup = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        );

        Clear.render(popup, buf);
        let text = vec![
            Line::from(""),
            Line::from(self.message),
            Line::from(""),
            Line::from("Press [Q] to quit.").style(Style::default().fg(Color::DarkGray)),
        ];
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(" Brain stream unavailable ")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(
                        Style::default()
                            .fg(Color::Red)
                            .add_modifier(Modifier::BOLD),
                    ),
            )
            .render(popup, buf);
    }
}

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use neurostream_data::ConnectionStatus;
use neurostream_io::network::transport::Transport;
use neurostream_tui::{FailureWidget, GridWidget, LegendWidget, StatusWidget};

use crate::app::state::App;

impl<T: Transport> App<T> {
    pub fn draw(&self, f: &mut Frame) {
        let status = self.session.status();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Status
                Constraint::Min(0),    // Grid
            ])
            .split(f.area());

        f.render_widget(
            StatusWidget {
                pet_id: &self.pet_id,
                status: &status,
                stats: self.last_stats,
                fps: self.fps,
            },
            layout[0],
        );
        f.render_widget(GridWidget::new(&self.renderer, "Brain"), layout[1]);

        if self.show_legend {
            f.render_widget(LegendWidget, layout[1]);
        }
        if status.status == ConnectionStatus::Error {
            let message = status
                .error_message
                .as_deref()
                .unwrap_or("The brain stream ended.");
            f.render_widget(FailureWidget { message }, layout[1]);
        }
    }
}

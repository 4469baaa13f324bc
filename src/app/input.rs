use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use neurostream_io::network::transport::Transport;

use crate::app::state::App;

impl<T: Transport> App<T> {
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit(),
            KeyCode::Char('l') => self.show_legend = !self.show_legend,
            _ => {}
        }
    }
}

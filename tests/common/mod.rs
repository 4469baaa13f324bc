pub mod macros;

use neurostream_core::config::AppConfig;
use neurostream_data::{CellCoordinate, CellState, CellType, CorticalLayer};
use neurostream_io::network::transport::{EventSender, Transport, TransportEvent, TransportHandle};
use neurostream_io::{encode_batch, IngestSettings, StreamIngestor};
use std::cell::RefCell;
use std::rc::Rc;

/// Transport driven by the test: records every connect and lets the test
/// push events into the most recent channel.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    endpoints: Rc<RefCell<Vec<String>>>,
    sender: Rc<RefCell<Option<EventSender>>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn push(&self, event: TransportEvent) {
        if let Some(sender) = self.sender.borrow().as_ref() {
            let _ = sender.send(event);
        }
    }

    pub fn open(&self) {
        self.push(TransportEvent::Open);
    }

    pub fn message(&self, states: &[CellState]) {
        self.push(TransportEvent::Message(
            encode_batch(states).expect("encode batch"),
        ));
    }

    pub fn raw(&self, payload: &str) {
        self.push(TransportEvent::Message(payload.to_string()));
    }

    pub fn error(&self, reason: &str) {
        self.push(TransportEvent::Error(reason.to_string()));
    }

    pub fn connect_count(&self) -> usize {
        self.endpoints.borrow().len()
    }

    pub fn endpoints(&self) -> Vec<String> {
        self.endpoints.borrow().clone()
    }
}

impl Transport for ScriptedTransport {
    fn connect(&self, endpoint: &str, events: EventSender) -> TransportHandle {
        self.endpoints.borrow_mut().push(endpoint.to_string());
        *self.sender.borrow_mut() = Some(events);
        TransportHandle::detached()
    }
}

#[allow(dead_code)]
pub struct SessionBuilder {
    config: AppConfig,
    endpoint: String,
    open: bool,
}

#[allow(dead_code)]
impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            endpoint: "http://localhost:8080/api/pets/test-pet/brain/stream".to_string(),
            open: true,
        }
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn unopened(mut self) -> Self {
        self.open = false;
        self
    }

    pub fn build(self) -> (StreamIngestor<ScriptedTransport>, ScriptedTransport) {
        let transport = ScriptedTransport::default();
        let mut session =
            StreamIngestor::new(transport.clone(), IngestSettings::from_config(&self.config));
        if self.open {
            session.open(&self.endpoint).expect("open session");
        }
        (session, transport)
    }
}

#[allow(dead_code)]
pub fn cell(x: u32, y: u32, activation: f64) -> CellState {
    CellState::new(CellCoordinate::new(x, y), CellType::Excitatory, CorticalLayer::L2_3)
        .with_activation(activation)
}

/// Every cell of a `width` x `height` grid at `activation`.
#[allow(dead_code)]
pub fn full_grid(width: u32, height: u32, activation: f64) -> Vec<CellState> {
    (0..height)
        .flat_map(|y| (0..width).map(move |x| cell(x, y, activation)))
        .collect()
}

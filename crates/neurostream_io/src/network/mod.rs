pub mod flow_control;
pub mod probe;
pub mod sse;
pub mod transport;

pub use flow_control::Backoff;
pub use probe::fetch_brain_status;
pub use sse::{SseDecoder, SseEvent};
pub use transport::{
    EventReceiver, EventSender, SseTransport, Transport, TransportEvent, TransportHandle,
};

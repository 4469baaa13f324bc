//! One-way event channel to the brain simulation.
//!
//! The transport task only reads the network and forwards [`TransportEvent`]s
//! through an unbounded channel; applying them is left to the ingestor, so
//! no state is ever shared with the render loop.

use std::time::Duration;

use futures::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use neurostream_core::config::{AppConfig, ReconnectConfig};

use super::flow_control::Backoff;
use super::sse::SseDecoder;
use crate::error::{IoError, Result};

const EVENT_STREAM: &str = "text/event-stream";
const LAST_EVENT_ID: &str = "Last-Event-ID";

/// Transport lifecycle callbacks, in delivery order.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// Handshake succeeded (initial connect or reconnect).
    Open,
    /// Raw payload of one message event.
    Message(String),
    /// The channel failed. Sent before any reconnect attempt.
    Error(String),
    /// A reconnect attempt is scheduled.
    Reconnecting { attempt: u32, delay: Duration },
    /// The transport gave up for good.
    Closed(String),
}

pub type EventSender = mpsc::UnboundedSender<TransportEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<TransportEvent>;

/// Opens event channels. Implementations push events into `events` until the
/// returned handle is dropped.
pub trait Transport {
    fn connect(&self, endpoint: &str, events: EventSender) -> TransportHandle;
}

/// Owns the background task of one channel; aborts it when dropped.
#[derive(Debug, Default)]
pub struct TransportHandle {
    task: Option<JoinHandle<()>>,
}

impl TransportHandle {
    pub fn spawned(task: JoinHandle<()>) -> Self {
        Self { task: Some(task) }
    }

    /// A handle with no task behind it, for transports driven externally.
    pub fn detached() -> Self {
        Self { task: None }
    }

    pub fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for TransportHandle {
    fn drop(&mut self) {
        self.abort();
    }
}

/// Server-Sent Events over reqwest.
///
/// reqwest has no automatic reconnection, so this transport implements it:
/// once a channel has opened at least once, a dropped stream is retried with
/// exponential backoff. A channel that never opened is not retried.
#[derive(Clone, Debug)]
pub struct SseTransport {
    client: reqwest::Client,
    reconnect: ReconnectConfig,
}

impl SseTransport {
    pub fn new(client: reqwest::Client, reconnect: ReconnectConfig) -> Self {
        Self { client, reconnect }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()?;
        Ok(Self::new(client, config.stream.reconnect.clone()))
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

impl Transport for SseTransport {
    fn connect(&self, endpoint: &str, events: EventSender) -> TransportHandle {
        let task = tokio::spawn(run_channel(
            self.client.clone(),
            endpoint.to_string(),
            Backoff::from_config(&self.reconnect),
            events,
        ));
        TransportHandle::spawned(task)
    }
}

enum StreamEnd {
    ServerClosed,
    ReceiverGone,
}

async fn run_channel(
    client: reqwest::Client,
    url: String,
    mut backoff: Backoff,
    events: EventSender,
) {
    let mut decoder = SseDecoder::new();
    let mut has_opened = false;

    loop {
        let session = Session {
            decoder: &mut decoder,
            backoff: &mut backoff,
            has_opened: &mut has_opened,
        };
        let reason = match read_stream(&client, &url, session, &events).await {
            Ok(StreamEnd::ReceiverGone) => return,
            Ok(StreamEnd::ServerClosed) => "stream ended by server".to_string(),
            Err(e) => e.to_string(),
        };

        tracing::debug!(url = %url, reason = %reason, "Brain stream channel error");
        if events.send(TransportEvent::Error(reason)).is_err() || !has_opened {
            return;
        }

        let Some(delay) = backoff.next_delay(decoder.retry()) else {
            let _ = events.send(TransportEvent::Closed(format!(
                "Gave up reconnecting after {} attempts",
                backoff.attempts()
            )));
            return;
        };
        let attempt = backoff.attempts();
        if events
            .send(TransportEvent::Reconnecting { attempt, delay })
            .is_err()
        {
            return;
        }
        tokio::time::sleep(delay).await;
        decoder.reset_connection();
    }
}

/// Per-channel state threaded through each connection attempt.
struct Session<'a> {
    decoder: &'a mut SseDecoder,
    backoff: &'a mut Backoff,
    has_opened: &'a mut bool,
}

async fn read_stream(
    client: &reqwest::Client,
    url: &str,
    session: Session<'_>,
    events: &EventSender,
) -> Result<StreamEnd> {
    let Session {
        decoder,
        backoff,
        has_opened,
    } = session;

    let mut request = client
        .get(url)
        .header(ACCEPT, EVENT_STREAM)
        .header(CACHE_CONTROL, "no-cache");
    if let Some(id) = decoder.last_event_id() {
        request = request.header(LAST_EVENT_ID, id);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(IoError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !content_type.starts_with(EVENT_STREAM) {
        return Err(IoError::network(format!(
            "expected {EVENT_STREAM}, got '{content_type}'"
        )));
    }

    *has_opened = true;
    backoff.reset();
    if events.send(TransportEvent::Open).is_err() {
        return Ok(StreamEnd::ReceiverGone);
    }

    let mut body = response.bytes_stream();
    let mut dispatched = Vec::new();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| IoError::from(e).with_context("reading brain stream"))?;
        decoder.feed(&chunk, &mut dispatched);
        for event in dispatched.drain(..) {
            if !event.is_message() {
                tracing::trace!(event = ?event.event, "Ignoring non-message event");
                continue;
            }
            if events.send(TransportEvent::Message(event.data)).is_err() {
                return Ok(StreamEnd::ReceiverGone);
            }
        }
    }

    Ok(StreamEnd::ServerClosed)
}

//! Incremental `text/event-stream` decoder.
//!
//! Bytes arrive in arbitrary chunks; lines are buffered until complete, so a
//! field or even a multi-byte character may be split across chunks. LF, CRLF
//! and lone CR terminate lines. A leading byte order mark is skipped.
//!
//! Events larger than the decoder's limit are discarded whole.

use std::time::Duration;

/// Default cap on a buffered line and on an event's accumulated data.
pub const DEFAULT_MAX_EVENT_BYTES: usize = 8 * 1024 * 1024;

const BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// `None` for untyped events, which count as `message`.
    pub event: Option<String>,
    pub data: String,
    pub id: Option<String>,
}

impl SseEvent {
    pub fn is_message(&self) -> bool {
        matches!(self.event.as_deref(), None | Some("message"))
    }
}

#[derive(Debug)]
pub struct SseDecoder {
    line: Vec<u8>,
    after_cr: bool,
    /// No line of the current connection has been completed yet.
    at_stream_start: bool,
    /// The event being assembled went over `max_event_bytes`.
    overflowed: bool,
    /// Bytes up to the next line end belong to an oversized line.
    skipping_line: bool,
    max_event_bytes: usize,
    data: String,
    event_type: Option<String>,
    last_event_id: Option<String>,
    retry: Option<Duration>,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::with_limit(DEFAULT_MAX_EVENT_BYTES)
    }
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(max_event_bytes: usize) -> Self {
        Self {
            line: Vec::new(),
            after_cr: false,
            at_stream_start: true,
            overflowed: false,
            skipping_line: false,
            max_event_bytes,
            data: String::new(),
            event_type: None,
            last_event_id: None,
            retry: None,
        }
    }

    /// Consumes `chunk`, appending every event it completes to `out`.
    pub fn feed(&mut self, chunk: &[u8], out: &mut Vec<SseEvent>) {
        for &byte in chunk {
            match byte {
                b'\n' if self.after_cr => self.after_cr = false,
                b'\n' => self.end_line(out),
                b'\r' => {
                    self.end_line(out);
                    self.after_cr = true;
                }
                _ => {
                    self.after_cr = false;
                    if self.skipping_line {
                        continue;
                    }
                    if self.line.len() >= self.max_event_bytes {
                        self.overflow();
                        self.skipping_line = true;
                        continue;
                    }
                    self.line.push(byte);
                }
            }
        }
    }

    /// Id of the last event seen, to resume from after a reconnect.
    pub fn last_event_id(&self) -> Option<&str> {
        self.last_event_id.as_deref()
    }

    /// Reconnection delay suggested by the server.
    pub fn retry(&self) -> Option<Duration> {
        self.retry
    }

    /// Drops any half-received event; keeps the event id and retry hint.
    pub fn reset_connection(&mut self) {
        self.line.clear();
        self.after_cr = false;
        self.at_stream_start = true;
        self.overflowed = false;
        self.skipping_line = false;
        self.data.clear();
        self.event_type = None;
    }

    fn overflow(&mut self) {
        if !self.overflowed {
            tracing::warn!(
                limit = self.max_event_bytes,
                "SSE event exceeds size limit; discarding it"
            );
        }
        self.overflowed = true;
        self.line.clear();
        self.data.clear();
    }

    fn end_line(&mut self, out: &mut Vec<SseEvent>) {
        let line = std::mem::take(&mut self.line);
        let mut bytes = line.as_slice();
        if std::mem::take(&mut self.at_stream_start) {
            bytes = bytes.strip_prefix(BOM).unwrap_or(bytes);
        }

        if std::mem::take(&mut self.skipping_line) {
            return;
        }
        if self.overflowed {
            // Skip the rest of the oversized event up to its blank line.
            if bytes.is_empty() {
                self.overflowed = false;
                self.event_type = None;
            }
            return;
        }
        self.process_line(&String::from_utf8_lossy(bytes), out);
    }

    fn process_line(&mut self, line: &str, out: &mut Vec<SseEvent>) {
        if line.is_empty() {
            self.dispatch(out);
            return;
        }
        if line.starts_with(':') {
            return;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "data" => {
                if self.data.len() + value.len() + 1 > self.max_event_bytes {
                    self.overflow();
                    return;
                }
                self.data.push_str(value);
                self.data.push('\n');
            }
            "event" => self.event_type = Some(value.to_string()),
            "id" if !value.contains('\0') => self.last_event_id = Some(value.to_string()),
            "retry" => {
                if let Ok(ms) = value.parse::<u64>() {
                    self.retry = Some(Duration::from_millis(ms));
                }
            }
            _ => {}
        }
    }

    fn dispatch(&mut self, out: &mut Vec<SseEvent>) {
        let event_type = self.event_type.take();
        if self.data.is_empty() {
            return;
        }
        let mut data = std::mem::take(&mut self.data);
        if data.ends_with('\n') {
            data.pop();
        }
        out.push(SseEvent {
            event: event_type.filter(|t| !t.is_empty()),
            data,
            id: self.last_event_id.clone(),
        });
    }
}

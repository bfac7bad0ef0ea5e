//! Normalizes agent runtime responses into one parsed JSON value.
//!
//! The runtime answers in one of three transport shapes, declared
//! out-of-band by content type: a streamed event log, a sequence of JSON
//! byte chunks, or an opaque object. Each shape gets its own branch of a
//! closed enum; downstream code never inspects transport details again.

use bytes::Bytes;
use serde_json::{json, Value};

use super::errors::PlanError;

const EVENT_DATA_PREFIX: &str = "data: ";

/// A forward-only sequence of event-stream lines.
///
/// Single-pass by construction: decoding consumes the stream, and there is
/// no way to rewind or re-read it. A second read is a programming error,
/// not a retry opportunity.
#[derive(Debug)]
pub struct EventStream {
    lines: std::vec::IntoIter<String>,
}

impl EventStream {
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines: lines.into_iter(),
        }
    }

    pub fn from_text(body: &str) -> Self {
        Self::new(body.lines().map(str::to_string).collect())
    }
}

impl Iterator for EventStream {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.lines.next()
    }
}

/// Transport-level response, tagged by the declared content kind
#[derive(Debug)]
pub enum RawResponse {
    /// `text/event-stream`: lines, possibly `data: `-prefixed
    EventStream(EventStream),
    /// `application/json`: body as received, chunk by chunk
    JsonChunks(Vec<Bytes>),
    /// Anything else: passed through, field extraction still applies
    Opaque(Value),
}

/// Decode a raw response into one parsed JSON value.
///
/// Parse failures where JSON was expected are fatal for the attempt and
/// are never retried. The result may still carry a transport envelope;
/// see [`unwrap_envelope`].
pub fn decode(raw: RawResponse) -> Result<Value, PlanError> {
    match raw {
        RawResponse::EventStream(stream) => decode_event_stream(stream),
        RawResponse::JsonChunks(chunks) => decode_json_chunks(&chunks),
        RawResponse::Opaque(value) => Ok(value),
    }
}

fn decode_event_stream(stream: EventStream) -> Result<Value, PlanError> {
    let mut content = Vec::new();
    for line in stream {
        if line.is_empty() {
            continue;
        }
        let line = line.strip_prefix(EVENT_DATA_PREFIX).unwrap_or(&line);
        content.push(line.to_string());
    }
    let text = content.join("\n");

    if text.trim_start().starts_with('{') {
        serde_json::from_str(&text)
            .map_err(|e| PlanError::MalformedResponse(format!("invalid event-stream JSON: {e}")))
    } else {
        Ok(json!({ "response": text }))
    }
}

fn decode_json_chunks(chunks: &[Bytes]) -> Result<Value, PlanError> {
    let mut body = Vec::with_capacity(chunks.iter().map(Bytes::len).sum());
    for chunk in chunks {
        body.extend_from_slice(chunk);
    }
    serde_json::from_slice(&body)
        .map_err(|e| PlanError::MalformedResponse(format!("invalid JSON body: {e}")))
}

/// Strip the transport envelope, one level only.
///
/// A mapping with a `response` key is a runtime wrapper around the plan
/// content, not plan content itself.
pub fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("response") => {
            map.remove("response").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn event_stream_with_data_prefix_parses_json() {
        let raw = RawResponse::EventStream(EventStream::new(vec!["data: {\"a\":1}".to_string()]));
        assert_eq!(decode(raw).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn event_stream_non_json_blob_is_wrapped() {
        let raw = RawResponse::EventStream(EventStream::new(vec![
            "data: Here is your plan".to_string(),
            String::new(),
            "Stay consistent!".to_string(),
        ]));
        assert_eq!(
            decode(raw).unwrap(),
            json!({"response": "Here is your plan\nStay consistent!"})
        );
    }

    #[test]
    fn event_stream_skips_blank_lines() {
        let raw = RawResponse::EventStream(EventStream::new(vec![
            String::new(),
            "data: {\"tips\":".to_string(),
            String::new(),
            "data: []}".to_string(),
        ]));
        assert_eq!(decode(raw).unwrap(), json!({"tips": []}));
    }

    #[test]
    fn event_stream_invalid_json_is_malformed() {
        let raw =
            RawResponse::EventStream(EventStream::new(vec!["data: {\"a\": oops".to_string()]));
        assert!(matches!(
            decode(raw),
            Err(PlanError::MalformedResponse(_))
        ));
    }

    #[test]
    fn json_chunks_concatenate_in_order() {
        let raw = RawResponse::JsonChunks(vec![
            Bytes::from_static(b"{\"a\":"),
            Bytes::from_static(b"1}"),
        ]);
        assert_eq!(decode(raw).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn json_chunks_invalid_body_is_malformed() {
        let raw = RawResponse::JsonChunks(vec![Bytes::from_static(b"not json")]);
        assert!(matches!(
            decode(raw),
            Err(PlanError::MalformedResponse(_))
        ));
    }

    #[test]
    fn envelope_unwraps_one_level_only() {
        let value = json!({"response": {"response": {"tips": []}}});
        // Only the outer envelope is transport wrapping.
        assert_eq!(unwrap_envelope(value), json!({"response": {"tips": []}}));
    }

    #[test]
    fn opaque_value_passes_through_then_envelope_extracts() {
        let raw = RawResponse::Opaque(json!({
            "content_type": "application/octet-stream",
            "response": {"workout_plan": {}}
        }));
        let decoded = decode(raw).unwrap();
        assert_eq!(unwrap_envelope(decoded), json!({"workout_plan": {}}));
    }

    #[test]
    fn value_without_envelope_is_unchanged() {
        let value = json!({"workout_plan": {}, "tips": []});
        assert_eq!(unwrap_envelope(value.clone()), value);
    }
}

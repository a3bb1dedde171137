//! Ingress codec: engine replies to typed events.
//!
//! Engine messages are JSON objects tagged by an integer `"type"` field.
//! Decoding is defensive field-by-field: a missing or mistyped field is an
//! error for this message only, never a panic.

use serde_json::Value;

use aria_types::{EngineEvent, LoadError};

use crate::WireError;

const TYPE_LOAD_FAILED: i64 = 0;
const TYPE_LOAD_SUCCEEDED: i64 = 1;
const TYPE_CONTEXT_INITIALIZED: i64 = 2;

/// Decode a raw engine message.
pub fn decode_engine_event(raw: &str) -> Result<EngineEvent, WireError> {
    let value: Value = serde_json::from_str(raw)?;
    decode_engine_value(&value)
}

/// Decode an already-parsed engine message.
pub fn decode_engine_value(value: &Value) -> Result<EngineEvent, WireError> {
    let tag = value
        .get("type")
        .and_then(Value::as_i64)
        .ok_or(WireError::MissingType)?;
    match tag {
        TYPE_LOAD_FAILED => Ok(EngineEvent::LoadFailed {
            request_id: field_u32(value, "requestId")?,
            error: decode_load_error(field_str(value, "error")?)?,
        }),
        TYPE_LOAD_SUCCEEDED => Ok(EngineEvent::LoadSucceeded {
            request_id: field_u32(value, "requestId")?,
            buffer_id: field_u32(value, "bufferId")?,
            duration_secs: field_f64(value, "durationInSeconds")?,
        }),
        TYPE_CONTEXT_INITIALIZED => Ok(EngineEvent::ContextInitialized {
            samples_per_second: field_u32(value, "samplesPerSecond")?,
        }),
        other => Err(WireError::UnknownMessageType(other)),
    }
}

fn decode_load_error(name: &str) -> Result<LoadError, WireError> {
    match name {
        "NetworkError" => Ok(LoadError::NetworkError),
        "MediaDecodeAudioDataUnknownContentType" => {
            Ok(LoadError::MediaDecodeAudioDataUnknownContentType)
        }
        other => Err(WireError::UnknownLoadError(other.to_string())),
    }
}

fn field_u32(value: &Value, name: &'static str) -> Result<u32, WireError> {
    value
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or(WireError::MissingField(name))
}

fn field_f64(value: &Value, name: &'static str) -> Result<f64, WireError> {
    value
        .get(name)
        .and_then(Value::as_f64)
        .ok_or(WireError::MissingField(name))
}

fn field_str<'a>(value: &'a Value, name: &'static str) -> Result<&'a str, WireError> {
    value
        .get(name)
        .and_then(Value::as_str)
        .ok_or(WireError::MissingField(name))
}

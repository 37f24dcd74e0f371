use serde_json::{Map, Value};
use std::fmt;

/// Wire key carrying the room number
pub const ROOM_KEY: &str = "r";

/// One decoded sensor frame.
///
/// `fields` holds every wire key other than `r`, values untouched. Which of
/// them become room properties is decided by the mapper.
#[derive(Clone, Debug, PartialEq)]
pub struct RoomUpdate {
    pub room: i64,
    pub fields: Map<String, Value>,
}

impl RoomUpdate {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Reasons a frame is rejected.
///
/// All variants are handled the same way by the polling loop (the frame is
/// dropped); the kind only matters for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    InvalidUtf8,
    Malformed(String),
    NotAnObject,
    MissingRoom,
    InvalidRoom(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::InvalidUtf8 => write!(f, "frame is not valid UTF-8"),
            DecodeError::Malformed(e) => write!(f, "frame is not valid JSON: {}", e),
            DecodeError::NotAnObject => write!(f, "frame must be a JSON object"),
            DecodeError::MissingRoom => write!(f, "frame is missing room number '{}'", ROOM_KEY),
            DecodeError::InvalidRoom(v) => {
                write!(f, "room number must be an integer, got {}", v)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Decodes one newline-delimited frame.
///
/// Rules:
/// - Bytes must be UTF-8
/// - Text must be a single JSON object (surrounding whitespace and the
///   trailing line terminator are allowed)
/// - `r` is required and must be an integer that fits in an `i64`; larger
///   values are rejected as [`DecodeError::InvalidRoom`]
///
/// Either the whole frame decodes or it is rejected; there are no partial
/// results.
pub fn decode(line: &[u8]) -> Result<RoomUpdate, DecodeError> {
    let text = std::str::from_utf8(line).map_err(|_| DecodeError::InvalidUtf8)?;

    let value: Value =
        serde_json::from_str(text).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let mut fields = match value {
        Value::Object(fields) => fields,
        _ => return Err(DecodeError::NotAnObject),
    };

    let room = fields.remove(ROOM_KEY).ok_or(DecodeError::MissingRoom)?;
    let room = room
        .as_i64()
        .ok_or_else(|| DecodeError::InvalidRoom(room.to_string()))?;

    Ok(RoomUpdate { room, fields })
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Current dynamic state of one room on one floor
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoomState {
    /// Floor the room was addressed on (e.g., "Floor 1")
    pub floor: String,

    /// Room identifier (e.g., "Room 3")
    pub room: String,

    /// Sensor-derived properties (e.g., "occupied", "quiet")
    pub dynamic_props: Map<String, Value>,

    /// Last update timestamp
    pub last_updated: DateTime<Utc>,
}

/// Property change broadcast to subscribers
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoomStateUpdate {
    pub floor: String,
    pub room: String,
    pub property: String,
    pub old_value: Option<Value>,
    pub new_value: Value,
    pub timestamp: DateTime<Utc>,
}

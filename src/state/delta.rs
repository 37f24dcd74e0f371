use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Room identifier for a sensor room number (e.g., 3 -> "Room 3")
pub fn room_id(number: i64) -> String {
    format!("Room {}", number)
}

/// Per-room dynamic property update sent to the state store.
///
/// Serializes as a plain map keyed by room identifier:
///
/// ```text
/// {"Room 3": {"dynamic_props": {"occupied": 1, "quiet": 0}}}
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateDelta {
    rooms: BTreeMap<String, RoomDelta>,
}

/// Property changes for a single room
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomDelta {
    #[serde(default)]
    pub dynamic_props: Map<String, Value>,
}

impl StateDelta {
    /// Delta addressing exactly one room
    pub fn for_room(room: impl Into<String>, dynamic_props: Map<String, Value>) -> Self {
        let mut rooms = BTreeMap::new();
        rooms.insert(room.into(), RoomDelta { dynamic_props });
        Self { rooms }
    }

    pub fn get(&self, room: &str) -> Option<&RoomDelta> {
        self.rooms.get(room)
    }

    pub fn rooms(&self) -> impl Iterator<Item = (&String, &RoomDelta)> {
        self.rooms.iter()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_room_id_format() {
        assert_eq!(room_id(3), "Room 3");
        assert_eq!(room_id(0), "Room 0");
        assert_eq!(room_id(-1), "Room -1");
    }

    #[test]
    fn test_serializes_as_room_map() {
        let mut props = Map::new();
        props.insert("occupied".to_string(), json!(1));
        props.insert("quiet".to_string(), json!(0));
        let delta = StateDelta::for_room(room_id(3), props);

        assert_eq!(
            serde_json::to_value(&delta).unwrap(),
            json!({"Room 3": {"dynamic_props": {"occupied": 1, "quiet": 0}}})
        );
    }

    #[test]
    fn test_deserialize_without_dynamic_props() {
        let delta: StateDelta = serde_json::from_value(json!({"Room 7": {}})).unwrap();
        assert_eq!(delta.len(), 1);
        assert!(delta.get("Room 7").unwrap().dynamic_props.is_empty());
    }
}

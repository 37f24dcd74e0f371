use roomstate::{room_id, StateDelta};
use serde_json::Map;

use super::decoder::RoomUpdate;

/// Fixed mapping from wire key to semantic room property.
pub struct KeyMap {
    entries: &'static [(&'static str, &'static str)],
}

/// Keys understood by the sensor firmware
pub const KEY_MAP: KeyMap = KeyMap {
    entries: &[("c", "occupied"), ("n", "quiet")],
};

impl KeyMap {
    /// Semantic property name for a wire key
    pub fn property(&self, wire_key: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(key, _)| *key == wire_key)
            .map(|(_, name)| *name)
    }
}

/// Transform a decoded frame into a state delta for its room.
///
/// Room key: `Room {r}`. Only keys listed in [`KEY_MAP`] are copied; keys
/// absent from the frame are omitted, never defaulted.
pub fn update_to_delta(update: &RoomUpdate) -> StateDelta {
    let mut dynamic_props = Map::new();

    for (wire_key, value) in &update.fields {
        if let Some(property) = KEY_MAP.property(wire_key) {
            dynamic_props.insert(property.to_string(), value.clone());
        }
    }

    StateDelta::for_room(room_id(update.room), dynamic_props)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::decode;
    use serde_json::json;

    fn map_frame(frame: &[u8]) -> serde_json::Value {
        let update = decode(frame).unwrap();
        serde_json::to_value(update_to_delta(&update)).unwrap()
    }

    #[test]
    fn test_key_map_lookup() {
        assert_eq!(KEY_MAP.property("c"), Some("occupied"));
        assert_eq!(KEY_MAP.property("n"), Some("quiet"));
        assert_eq!(KEY_MAP.property("r"), None);
        assert_eq!(KEY_MAP.property("occupied"), None);
    }

    #[test]
    fn test_full_frame() {
        assert_eq!(
            map_frame(br#"{"r":3,"c":1,"n":0}"#),
            json!({"Room 3": {"dynamic_props": {"occupied": 1, "quiet": 0}}})
        );
    }

    #[test]
    fn test_missing_quiet_is_omitted() {
        assert_eq!(
            map_frame(br#"{"r":5,"c":1}"#),
            json!({"Room 5": {"dynamic_props": {"occupied": 1}}})
        );
    }

    #[test]
    fn test_each_subset() {
        let cases = [
            (&br#"{"r":1}"#[..], json!({})),
            (&br#"{"r":1,"c":0}"#[..], json!({"occupied": 0})),
            (&br#"{"r":1,"n":1}"#[..], json!({"quiet": 1})),
            (&br#"{"r":1,"n":1,"c":1}"#[..], json!({"occupied": 1, "quiet": 1})),
        ];

        for (frame, expected) in cases {
            assert_eq!(map_frame(frame)["Room 1"]["dynamic_props"], expected);
        }
    }

    #[test]
    fn test_unknown_keys_dropped() {
        assert_eq!(
            map_frame(br#"{"r":2,"c":1,"t":21.5,"occupied":0}"#),
            json!({"Room 2": {"dynamic_props": {"occupied": 1}}})
        );
    }

    #[test]
    fn test_values_passed_through() {
        // Values are copied as received, not coerced to 0/1
        assert_eq!(
            map_frame(br#"{"r":4,"c":true,"n":7}"#),
            json!({"Room 4": {"dynamic_props": {"occupied": true, "quiet": 7}}})
        );
    }

    #[test]
    fn test_no_dedup() {
        let update = decode(br#"{"r":9,"c":1}"#).unwrap();
        let first = update_to_delta(&update);
        let second = update_to_delta(&update);

        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert!(second.get("Room 9").is_some());
    }
}

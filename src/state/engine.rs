use crate::state::entity::{RoomState, RoomStateUpdate};
use crate::state::{StateDelta, StateStore};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::Map;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// In-process room state store
///
/// Holds the dynamic properties of every room that has received a delta,
/// keyed by floor and room. Used when the node runs without a remote
/// building-state server, and by tests.
pub struct StateEngine {
    /// Lock-free concurrent map keyed by (floor, room)
    rooms: Arc<DashMap<(String, String), RoomState>>,

    /// Broadcast channel for property changes
    state_tx: broadcast::Sender<RoomStateUpdate>,
}

fn room_key(floor: &str, room: &str) -> (String, String) {
    (floor.to_string(), room.to_string())
}

impl StateEngine {
    /// Create new state engine with broadcast channel
    pub fn new() -> Self {
        let (state_tx, _) = broadcast::channel(1000);

        Self {
            rooms: Arc::new(DashMap::new()),
            state_tx,
        }
    }

    /// Merge a delta into the rooms of `floor` (core state mutation)
    ///
    /// Properties not mentioned in the delta keep their current values.
    /// Returns one update per property written, in delta order.
    pub fn apply_delta(&self, floor: &str, delta: &StateDelta) -> Vec<RoomStateUpdate> {
        let now = Utc::now();
        let mut updates = Vec::new();

        for (room, room_delta) in delta.rooms() {
            let mut state = self
                .rooms
                .entry(room_key(floor, room))
                .or_insert_with(|| RoomState {
                    floor: floor.to_string(),
                    room: room.clone(),
                    dynamic_props: Map::new(),
                    last_updated: now,
                });

            for (property, value) in &room_delta.dynamic_props {
                let old_value = state.dynamic_props.insert(property.clone(), value.clone());

                let update = RoomStateUpdate {
                    floor: floor.to_string(),
                    room: room.clone(),
                    property: property.clone(),
                    old_value,
                    new_value: value.clone(),
                    timestamp: now,
                };

                // No subscribers is fine
                let _ = self.state_tx.send(update.clone());
                updates.push(update);
            }

            state.last_updated = now;
        }

        debug!(floor = %floor, updates = updates.len(), "Applied room state delta");

        updates
    }

    /// Get room state by floor and room identifier
    pub fn get_room(&self, floor: &str, room: &str) -> Option<RoomState> {
        self.rooms.get(&room_key(floor, room)).map(|r| r.clone())
    }

    /// All known rooms on a floor
    pub fn rooms_on_floor(&self, floor: &str) -> Vec<RoomState> {
        self.rooms
            .iter()
            .filter(|r| r.value().floor == floor)
            .map(|r| r.value().clone())
            .collect()
    }

    /// Get all rooms
    pub fn get_all_rooms(&self) -> Vec<RoomState> {
        self.rooms.iter().map(|r| r.value().clone()).collect()
    }

    /// Subscribe to property changes
    pub fn subscribe(&self) -> broadcast::Receiver<RoomStateUpdate> {
        self.state_tx.subscribe()
    }
}

impl Default for StateEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for StateEngine {
    async fn set_room_state(&self, floor_name: &str, delta: StateDelta) -> Result<()> {
        self.apply_delta(floor_name, &delta);
        Ok(())
    }
}

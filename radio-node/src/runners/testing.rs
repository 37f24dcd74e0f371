//! Scripted link and recording store shared by the runner tests.

use crate::link::{LineSource, LinkError};
use anyhow::Result;
use async_trait::async_trait;
use roomstate::{BuildingConfig, StateDelta, StateStore};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays a fixed list of reads, then reports the link closed
pub struct ScriptedLink {
    reads: VecDeque<Result<Vec<u8>, LinkError>>,
}

impl ScriptedLink {
    pub fn frames(frames: &[&[u8]]) -> Self {
        Self {
            reads: frames.iter().map(|f| Ok(f.to_vec())).collect(),
        }
    }

    pub fn reads(reads: Vec<Result<Vec<u8>, LinkError>>) -> Self {
        Self {
            reads: reads.into(),
        }
    }
}

#[async_trait]
impl LineSource for ScriptedLink {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn read_line(&mut self) -> Result<Vec<u8>, LinkError> {
        self.reads.pop_front().unwrap_or(Err(LinkError::Closed))
    }
}

/// Records every call; optionally fails them all
#[derive(Default)]
pub struct RecordingStore {
    pub calls: Mutex<Vec<(String, StateDelta)>>,
    pub fail: bool,
}

impl RecordingStore {
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<(String, StateDelta)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StateStore for RecordingStore {
    async fn set_room_state(&self, floor_name: &str, delta: StateDelta) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((floor_name.to_string(), delta));
        if self.fail {
            anyhow::bail!("store unavailable");
        }
        Ok(())
    }
}

/// Building with `rooms_per_floor[i]` rooms on "Floor {i+1}"
pub fn building(rooms_per_floor: &[usize]) -> BuildingConfig {
    let mut floors = Vec::new();
    let mut rooms = Vec::new();

    for (i, count) in rooms_per_floor.iter().enumerate() {
        let floor = format!("Floor {}", i + 1);
        floors.push(serde_json::json!({ "name": floor }));
        for room in 1..=*count {
            rooms.push(serde_json::json!({
                "name": format!("Room {}", room),
                "static_props": { "loc": { "floor": floor } }
            }));
        }
    }

    serde_json::from_value(serde_json::json!({ "floors": floors, "rooms": rooms })).unwrap()
}

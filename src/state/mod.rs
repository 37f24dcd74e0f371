// Room state model, state store seam and in-process engine

mod delta;
mod engine;
mod entity;
mod store;

pub use delta::{room_id, RoomDelta, StateDelta};
pub use engine::StateEngine;
pub use entity::{RoomState, RoomStateUpdate};
pub use store::StateStore;

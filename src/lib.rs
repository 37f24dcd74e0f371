// Building configuration (floors and room registry)
pub mod config;

// Room state model, state store seam and in-process engine
pub mod state;

pub use config::{load_building_config, BuildingConfig};
pub use state::{room_id, RoomDelta, StateDelta, StateEngine, StateStore};

//! Radio node - bridges the room sensor radio network to the building state.
//!
//! Sensors report occupancy and noise to a radio receiver attached over
//! serial. The node reads one JSON frame per line, turns it into a room
//! state delta and hands it to a [`StateStore`](roomstate::StateStore).
//!
//! # Architecture
//!
//! ```text
//! Room sensors ──radio──> receiver (Arduino)
//!          ↓  serial, 9600 baud, {"r":3,"c":1,"n":0}\n
//! ┌─────────────────────────────────────────┐
//! │       SerialLink (reader thread)         │
//! └─────────────────────────────────────────┘
//!          ↓  frames
//! ┌─────────────────────────────────────────┐
//! │       PollingLoop                        │
//! │  - decode frame (protocol::decode)       │
//! │  - map keys (protocol::update_to_delta)  │
//! │  - drop anything malformed               │
//! └─────────────────────────────────────────┘
//!          ↓  set_room_state(first floor, delta)
//!     StateStore (StateEngine | HttpStateStore)
//! ```
//!
//! Without hardware, [`StubLoop`] replaces the link and the polling loop
//! with randomly generated deltas.

pub mod link;
pub mod protocol;
pub mod publisher;
pub mod runners;
pub mod settings;
pub mod status;

// Re-export public types
pub use link::{LineSource, LinkError, SerialLink};
pub use protocol::{decode, update_to_delta, DecodeError, RoomUpdate};
pub use publisher::HttpStateStore;
pub use runners::polling::PollingLoop;
pub use runners::stub::StubLoop;
pub use runners::{DropReason, PollOutcome};
pub use settings::{NodeMode, NodeSettings};
pub use status::{NodeStatus, NodeStatusSnapshot};

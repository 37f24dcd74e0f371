//! Serial frame protocol.
//!
//! Each frame is one line of compact JSON sent by the radio receiver:
//!
//! ```text
//! {"r":3,"c":1,"n":0}
//! ```
//!
//! `r` is the room number, `c` the occupied flag and `n` the quiet flag.

mod decoder;
mod mapper;

pub use decoder::{decode, DecodeError, RoomUpdate, ROOM_KEY};
pub use mapper::{update_to_delta, KeyMap, KEY_MAP};

use roomstate::StateDelta;

/// Decode a frame and map it to a delta in one step
pub fn frame_to_delta(line: &[u8]) -> Result<StateDelta, DecodeError> {
    decode(line).map(|update| update_to_delta(&update))
}

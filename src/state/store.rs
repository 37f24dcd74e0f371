use crate::state::StateDelta;
use anyhow::Result;
use async_trait::async_trait;

/// Destination for room-state deltas.
///
/// This is the only operation the radio node needs from the building-state
/// server: it pushes a delta addressed to a floor and waits for the call to
/// complete. State is never read back through this interface.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Merge `delta` into the state of `floor_name`.
    async fn set_room_state(&self, floor_name: &str, delta: StateDelta) -> Result<()>;
}

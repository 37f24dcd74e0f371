//! Synthetic update generator for nodes without radio hardware.

use super::{DropReason, PollOutcome};
use crate::status::NodeStatus;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roomstate::{room_id, BuildingConfig, StateDelta, StateStore};
use serde_json::{json, Map};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Stub driver.
///
/// Each iteration picks a random floor other than the first, a random room
/// among those registered to it, and random occupied/quiet flags.
pub struct StubLoop<R = StdRng> {
    store: Arc<dyn StateStore>,
    building: Arc<BuildingConfig>,
    status: Arc<NodeStatus>,
    interval: Duration,
    rng: R,
}

impl StubLoop<StdRng> {
    /// Stub loop seeded from OS entropy
    pub fn new(store: Arc<dyn StateStore>, building: Arc<BuildingConfig>) -> Self {
        Self::with_rng(store, building, StdRng::from_entropy())
    }
}

impl<R: Rng + Send + 'static> StubLoop<R> {
    pub fn with_rng(store: Arc<dyn StateStore>, building: Arc<BuildingConfig>, rng: R) -> Self {
        Self {
            store,
            building,
            status: Arc::new(NodeStatus::new()),
            interval: Duration::ZERO,
            rng,
        }
    }

    /// Wait between synthetic updates
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn status(&self) -> Arc<NodeStatus> {
        Arc::clone(&self.status)
    }

    /// Builds one synthetic update and the floor it is addressed to.
    pub fn fake_update(&mut self) -> Result<(String, StateDelta), DropReason> {
        let floors = &self.building.floors;
        if floors.len() < 2 {
            return Err(DropReason::NoFloor);
        }

        let floor = &floors[self.rng.gen_range(1..floors.len())];
        let room_count = self.building.room_count_on_floor(&floor.name);
        if room_count == 0 {
            return Err(DropReason::NoRooms(floor.name.clone()));
        }

        let room = self.rng.gen_range(1..=room_count) as i64;

        let mut dynamic_props = Map::new();
        dynamic_props.insert("occupied".to_string(), json!(self.rng.gen_range(0..=1i64)));
        dynamic_props.insert("quiet".to_string(), json!(self.rng.gen_range(0..=1i64)));

        Ok((floor.name.clone(), StateDelta::for_room(room_id(room), dynamic_props)))
    }

    /// Runs one iteration: yield, wait, generate, dispatch.
    pub async fn step(&mut self) -> PollOutcome {
        tokio::task::yield_now().await;
        if !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }

        let (floor, delta) = match self.fake_update() {
            Ok(update) => update,
            Err(reason) => {
                self.status.record_addressing_drop();
                return PollOutcome::Dropped(reason);
            }
        };

        match self.store.set_room_state(&floor, delta.clone()).await {
            Ok(()) => {
                self.status.record_dispatch();
                PollOutcome::Dispatched { floor, delta }
            }
            Err(e) => {
                warn!(floor = %floor, error = %e, "Failed to dispatch stub room state");
                self.status.record_dispatch_failure();
                PollOutcome::Dropped(DropReason::Dispatch(e))
            }
        }
    }

    /// Generates updates forever
    pub async fn run(mut self) {
        info!(
            floors = self.building.floors.len(),
            interval_ms = self.interval.as_millis() as u64,
            "Starting stub loop"
        );

        loop {
            self.step().await;
        }
    }

    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

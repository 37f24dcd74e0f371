//! Serial polling loop.
//!
//! Drives frames from the radio link into the state store, one frame per
//! iteration. Every per-frame failure is absorbed here: the frame is
//! counted, optionally logged, and discarded.

use super::{DropReason, PollOutcome};
use crate::link::{LineSource, LinkError};
use crate::protocol::frame_to_delta;
use crate::status::NodeStatus;
use roomstate::{BuildingConfig, StateStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_millis(1000);

/// Polling loop for the hardware path.
///
/// Updates are always addressed to the first configured floor, whichever
/// floor the sensor is actually on.
pub struct PollingLoop {
    link: Option<Box<dyn LineSource>>,
    store: Arc<dyn StateStore>,
    building: Arc<BuildingConfig>,
    status: Arc<NodeStatus>,
    idle_interval: Duration,
    log_dropped_frames: bool,
}

impl PollingLoop {
    /// Creates a loop over `link`; `None` yields a loop that never
    /// dispatches.
    pub fn new(
        link: Option<Box<dyn LineSource>>,
        store: Arc<dyn StateStore>,
        building: Arc<BuildingConfig>,
    ) -> Self {
        Self {
            link,
            store,
            building,
            status: Arc::new(NodeStatus::new()),
            idle_interval: DEFAULT_IDLE_INTERVAL,
            log_dropped_frames: false,
        }
    }

    /// How long an iteration waits when there is no link
    pub fn with_idle_interval(mut self, idle_interval: Duration) -> Self {
        self.idle_interval = idle_interval;
        self
    }

    /// Log each discarded frame at debug level (off by default)
    pub fn with_dropped_frame_logging(mut self, enabled: bool) -> Self {
        self.log_dropped_frames = enabled;
        self
    }

    pub fn status(&self) -> Arc<NodeStatus> {
        Arc::clone(&self.status)
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    /// Runs one iteration: yield, read one frame, translate, dispatch.
    pub async fn poll_once(&mut self) -> PollOutcome {
        tokio::task::yield_now().await;

        let link = match self.link.as_mut() {
            Some(link) => link,
            None => {
                tokio::time::sleep(self.idle_interval).await;
                return PollOutcome::NoLink;
            }
        };

        let line = match link.read_line().await {
            Ok(line) => line,
            Err(e) => return self.read_failed(e),
        };
        self.status.record_frame();

        let delta = match frame_to_delta(&line) {
            Ok(delta) => delta,
            Err(e) => {
                self.status.record_decode_drop();
                return self.dropped(DropReason::Decode(e));
            }
        };

        // TODO: address the sensor's own floor once frames carry one; the
        // first floor is used for every room until then.
        let floor = match self.building.first_floor() {
            Some(floor) => floor.name.clone(),
            None => {
                self.status.record_addressing_drop();
                return self.dropped(DropReason::NoFloor);
            }
        };

        match self.store.set_room_state(&floor, delta.clone()).await {
            Ok(()) => {
                self.status.record_dispatch();
                PollOutcome::Dispatched { floor, delta }
            }
            Err(e) => {
                warn!(floor = %floor, error = %e, "Failed to dispatch room state");
                self.status.record_dispatch_failure();
                self.dropped(DropReason::Dispatch(e))
            }
        }
    }

    fn read_failed(&mut self, e: LinkError) -> PollOutcome {
        self.status.record_read_error();
        if let LinkError::Closed = e {
            if let Some(link) = self.link.take() {
                warn!(device = %link.name(), "Radio link closed, continuing without it");
            }
        }
        self.dropped(DropReason::Read(e))
    }

    fn dropped(&self, reason: DropReason) -> PollOutcome {
        if self.log_dropped_frames {
            debug!(reason = %reason, "Dropped frame");
        }
        PollOutcome::Dropped(reason)
    }

    /// Polls forever. Only process shutdown ends this future.
    pub async fn run(mut self) {
        info!(
            connected = self.is_connected(),
            device = self.link.as_ref().map(|l| l.name()).unwrap_or("none"),
            "Starting polling loop"
        );

        loop {
            self.poll_once().await;
        }
    }

    /// Spawns [`run`](Self::run) on the current runtime.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

//! Node drivers.
//!
//! Exactly one driver runs per node: [`polling::PollingLoop`] when a radio
//! receiver is expected, [`stub::StubLoop`] for demos without hardware.
//! Both produce at most one state-store call per iteration and never stop
//! on their own.

pub mod polling;
pub mod stub;

#[cfg(test)]
pub(crate) mod testing;

use crate::link::LinkError;
use crate::protocol::DecodeError;
use roomstate::StateDelta;
use std::fmt;

/// Result of one loop iteration
#[derive(Debug)]
pub enum PollOutcome {
    /// No link; nothing was read
    NoLink,
    /// A delta reached the state store
    Dispatched { floor: String, delta: StateDelta },
    /// The frame or update was discarded
    Dropped(DropReason),
}

impl PollOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, PollOutcome::Dispatched { .. })
    }
}

/// Why an iteration produced no update
#[derive(Debug)]
pub enum DropReason {
    Read(LinkError),
    Decode(DecodeError),
    /// No floor to address the update to
    NoFloor,
    /// Floor has no registered rooms
    NoRooms(String),
    Dispatch(anyhow::Error),
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::Read(e) => write!(f, "{}", e),
            DropReason::Decode(e) => write!(f, "{}", e),
            DropReason::NoFloor => write!(f, "no floor configured"),
            DropReason::NoRooms(floor) => write!(f, "no rooms registered on '{}'", floor),
            DropReason::Dispatch(e) => write!(f, "dispatch failed: {}", e),
        }
    }
}

//! Serial link to the radio receiver.
//!
//! The polling loop only sees a [`LineSource`]: something that hands over
//! one newline-terminated frame at a time. [`SerialLink`] is the hardware
//! implementation; tests script their own.

mod discovery;
mod serial;

pub use discovery::{
    available_ports, select_port, DescriptionContains, PortInfo, PortMatcher, VENDOR_KEYWORD,
};
pub use serial::{discover, SerialLink, BAUD_RATE};

use async_trait::async_trait;
use std::fmt;
use std::io;

/// Errors surfaced by a line source
#[derive(Debug)]
pub enum LinkError {
    /// Device read failed; the frame in flight is lost
    Io(io::Error),
    /// The link is gone and will produce no more frames
    Closed,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::Io(e) => write!(f, "serial read failed: {}", e),
            LinkError::Closed => write!(f, "serial link closed"),
        }
    }
}

impl std::error::Error for LinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LinkError::Io(e) => Some(e),
            LinkError::Closed => None,
        }
    }
}

impl From<io::Error> for LinkError {
    fn from(e: io::Error) -> Self {
        LinkError::Io(e)
    }
}

/// Source of newline-delimited frames.
///
/// `read_line` suspends the calling task until a frame (or an error) is
/// available. A frame is returned as received, terminator included, and may
/// be empty, malformed, or truncated.
#[async_trait]
pub trait LineSource: Send {
    /// Human-readable name of the underlying device, for logs
    fn name(&self) -> &str;

    async fn read_line(&mut self) -> Result<Vec<u8>, LinkError>;
}

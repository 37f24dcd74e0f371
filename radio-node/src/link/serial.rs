use super::discovery::{select_port, PortInfo, PortMatcher};
use super::{LineSource, LinkError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::{self, BufRead, BufReader, Read};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Baud rate of the radio receiver firmware
pub const BAUD_RATE: u32 = 9600;

/// Port read timeout; only bounds how long the reader thread blocks per read
const READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Frames buffered between the reader thread and the polling task
const LINE_BUFFER: usize = 64;

/// Hardware serial link.
///
/// The port is owned by a dedicated reader thread which performs blocking
/// line reads and forwards each frame over a channel, so awaiting
/// [`LineSource::read_line`] suspends only the polling task.
pub struct SerialLink {
    device: String,
    lines: mpsc::Receiver<io::Result<Vec<u8>>>,
}

impl SerialLink {
    /// Opens `device` at [`BAUD_RATE`] and starts its reader thread.
    pub fn open(device: &str) -> Result<Self> {
        let port = serialport::new(device, BAUD_RATE)
            .timeout(READ_TIMEOUT)
            .open()
            .with_context(|| format!("Failed to open serial port {}", device))?;

        let link = Self::spawn(device, port)?;
        info!(device = %device, baud = BAUD_RATE, "Serial link open");

        Ok(link)
    }

    /// Starts the reader thread over an already opened byte stream.
    fn spawn<R>(device: &str, port: R) -> Result<Self>
    where
        R: Read + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(LINE_BUFFER);
        let name = device.to_string();

        std::thread::Builder::new()
            .name("serial-reader".to_string())
            .spawn(move || read_frames(port, tx, name))
            .context("Failed to spawn serial reader thread")?;

        Ok(Self {
            device: device.to_string(),
            lines: rx,
        })
    }
}

#[async_trait]
impl LineSource for SerialLink {
    fn name(&self) -> &str {
        &self.device
    }

    async fn read_line(&mut self) -> Result<Vec<u8>, LinkError> {
        match self.lines.recv().await {
            Some(Ok(line)) => Ok(line),
            Some(Err(e)) => Err(LinkError::Io(e)),
            None => Err(LinkError::Closed),
        }
    }
}

/// Reader thread body: one channel message per newline-terminated frame.
///
/// Read timeouts only mean the line is still arriving; bytes read so far
/// stay in the buffer. End of stream or any other error ends the thread,
/// which closes the channel.
fn read_frames<R: Read>(port: R, tx: mpsc::Sender<io::Result<Vec<u8>>>, device: String) {
    let mut reader = BufReader::new(port);
    let mut buf = Vec::new();

    loop {
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => {
                if !buf.is_empty() {
                    let _ = tx.blocking_send(Ok(std::mem::take(&mut buf)));
                }
                debug!(device = %device, "Serial stream ended");
                break;
            }
            Ok(_) => {
                if buf.last() != Some(&b'\n') {
                    // EOF mid-frame; hand over the partial frame on the next pass
                    continue;
                }
                if tx.blocking_send(Ok(std::mem::take(&mut buf))).is_err() {
                    // Polling task is gone
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => continue,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!(device = %device, error = %e, "Serial read failed, closing link");
                if !buf.is_empty() {
                    let _ = tx.blocking_send(Ok(std::mem::take(&mut buf)));
                }
                let _ = tx.blocking_send(Err(e));
                break;
            }
        }
    }
}

/// Finds and opens the radio receiver.
///
/// Returns `None` when no device is attached or the selected device cannot
/// be opened; the node then runs without a link.
pub fn discover(ports: &[PortInfo], preferred: &dyn PortMatcher) -> Option<SerialLink> {
    let port = match select_port(ports, preferred) {
        Some(port) => port,
        None => {
            warn!("No serial device found, running without a radio link");
            return None;
        }
    };

    info!(
        device = %port.device,
        description = %port.description,
        "Selected serial device"
    );

    match SerialLink::open(&port.device) {
        Ok(link) => Some(link),
        Err(e) => {
            warn!(device = %port.device, error = %e, "Running without a radio link");
            None
        }
    }
}

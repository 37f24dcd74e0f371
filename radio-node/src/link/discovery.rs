use serialport::{SerialPortInfo, SerialPortType};
use tracing::{debug, warn};

/// Description keyword of the radio receiver boards
pub const VENDOR_KEYWORD: &str = "Arduino";

/// Enumerated serial device
#[derive(Clone, Debug, PartialEq)]
pub struct PortInfo {
    /// OS device path (e.g., "/dev/ttyACM0", "COM3")
    pub device: String,
    /// Human-readable description (USB product and manufacturer)
    pub description: String,
}

impl From<SerialPortInfo> for PortInfo {
    fn from(info: SerialPortInfo) -> Self {
        let description = match &info.port_type {
            SerialPortType::UsbPort(usb) => {
                let parts: Vec<&str> = [usb.product.as_deref(), usb.manufacturer.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect();
                if parts.is_empty() {
                    "n/a".to_string()
                } else {
                    parts.join(" - ")
                }
            }
            _ => "n/a".to_string(),
        };

        Self {
            device: info.port_name,
            description,
        }
    }
}

/// Decides which device is preferred during discovery
pub trait PortMatcher {
    fn matches(&self, port: &PortInfo) -> bool;
}

impl<F> PortMatcher for F
where
    F: Fn(&PortInfo) -> bool,
{
    fn matches(&self, port: &PortInfo) -> bool {
        self(port)
    }
}

/// Prefers devices whose description contains a keyword (case-sensitive)
pub struct DescriptionContains(pub String);

impl DescriptionContains {
    /// Matcher for the radio receiver vendor
    pub fn vendor() -> Self {
        Self(VENDOR_KEYWORD.to_string())
    }
}

impl PortMatcher for DescriptionContains {
    fn matches(&self, port: &PortInfo) -> bool {
        port.description.contains(&self.0)
    }
}

/// Picks the device to open.
///
/// The first preferred device wins; otherwise the first enumerated device;
/// `None` when nothing is attached.
pub fn select_port<'a>(ports: &'a [PortInfo], preferred: &dyn PortMatcher) -> Option<&'a PortInfo> {
    ports
        .iter()
        .find(|port| preferred.matches(port))
        .or_else(|| ports.first())
}

/// Lists serial devices present on this machine.
///
/// Enumeration failures are treated as "no devices".
pub fn available_ports() -> Vec<PortInfo> {
    match serialport::available_ports() {
        Ok(ports) => {
            let ports: Vec<PortInfo> = ports.into_iter().map(PortInfo::from).collect();
            debug!(count = ports.len(), "Enumerated serial ports");
            ports
        }
        Err(e) => {
            warn!(error = %e, "Failed to list serial ports");
            Vec::new()
        }
    }
}

use std::time::Duration;

/// Which driver runs as the node's main task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeMode {
    /// Read frames from the serial radio receiver
    Serial,
    /// Generate synthetic updates (no hardware attached)
    Stub,
}

impl std::str::FromStr for NodeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "serial" => Ok(NodeMode::Serial),
            "stub" => Ok(NodeMode::Stub),
            other => Err(format!("unknown node mode '{}' (expected serial or stub)", other)),
        }
    }
}

/// Node settings. Built from env vars, falling back to defaults.
#[derive(Debug, Clone)]
pub struct NodeSettings {
    pub mode: NodeMode,
    /// Building configuration file (TOML, or JSON by extension)
    pub config_path: String,
    /// Base URL of the building-state server; in-process engine when unset
    pub server_url: Option<String>,
    /// Wait between iterations while no link is available
    pub idle_interval: Duration,
    /// Wait between synthetic updates in stub mode
    pub stub_interval: Duration,
    /// Log every dropped frame at debug level
    pub log_dropped_frames: bool,
    pub status_interval: Duration,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            mode: NodeMode::Serial,
            config_path: "building.toml".to_string(),
            server_url: None,
            idle_interval: Duration::from_millis(1000),
            stub_interval: Duration::from_millis(1000),
            log_dropped_frames: false,
            status_interval: Duration::from_secs(60),
        }
    }
}

impl NodeSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    ///
    /// Unparseable values are ignored and the default kept.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(v) = lookup("RADIO_NODE_MODE") {
            if let Ok(mode) = v.parse::<NodeMode>() {
                cfg.mode = mode;
            }
        }
        if let Some(v) = lookup("ROOMSTATE_CONFIG") {
            cfg.config_path = v;
        }
        if let Some(v) = lookup("ROOMSTATE_SERVER_URL") {
            let v = v.trim().trim_end_matches('/').to_string();
            if !v.is_empty() {
                cfg.server_url = Some(v);
            }
        }
        if let Some(v) = lookup("RADIO_NODE_IDLE_MS") {
            if let Ok(ms) = v.parse::<u64>() {
                cfg.idle_interval = Duration::from_millis(ms);
            }
        }
        if let Some(v) = lookup("RADIO_NODE_STUB_INTERVAL_MS") {
            if let Ok(ms) = v.parse::<u64>() {
                cfg.stub_interval = Duration::from_millis(ms);
            }
        }
        if let Some(v) = lookup("RADIO_NODE_LOG_DROPPED") {
            if let Ok(b) = v.parse::<bool>() {
                cfg.log_dropped_frames = b;
            }
        }
        if let Some(v) = lookup("RADIO_NODE_STATUS_INTERVAL_SECS") {
            if let Ok(secs) = v.parse::<u64>() {
                if secs > 0 {
                    cfg.status_interval = Duration::from_secs(secs);
                }
            }
        }

        cfg
    }
}

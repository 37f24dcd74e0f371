use anyhow::{Context, Result};
use radio_node::link::{self, DescriptionContains, LineSource};
use radio_node::{HttpStateStore, NodeMode, NodeSettings, NodeStatus, PollingLoop, StubLoop};
use roomstate::{load_building_config, StateEngine, StateStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "radio_node=info,roomstate=info".into()),
        )
        .init();

    info!("Radio node starting...");

    let settings = NodeSettings::from_env();
    info!(
        mode = ?settings.mode,
        config = %settings.config_path,
        server_url = settings.server_url.as_deref().unwrap_or("in-process"),
        "Configuration loaded"
    );

    let building = Arc::new(
        load_building_config(&settings.config_path)
            .context("Failed to load building configuration")?,
    );
    info!(
        floors = building.floors.len(),
        rooms = building.rooms.len(),
        "Building configuration loaded"
    );

    let store: Arc<dyn StateStore> = match &settings.server_url {
        Some(url) => Arc::new(HttpStateStore::new(url.clone(), "radio-node")),
        None => {
            let engine = Arc::new(StateEngine::new());
            tokio::spawn(log_state_changes(Arc::clone(&engine)));
            engine
        }
    };

    let (status, node_handle) = match settings.mode {
        NodeMode::Serial => {
            let ports = link::available_ports();
            let link = link::discover(&ports, &DescriptionContains::vendor())
                .map(|l| Box::new(l) as Box<dyn LineSource>);

            let node = PollingLoop::new(link, store, building)
                .with_idle_interval(settings.idle_interval)
                .with_dropped_frame_logging(settings.log_dropped_frames);
            (node.status(), node.start())
        }
        NodeMode::Stub => {
            let node = StubLoop::new(store, building).with_interval(settings.stub_interval);
            (node.status(), node.start())
        }
    };

    let reporter_handle = tokio::spawn(report_status(status, settings.status_interval));

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c signal")?;
    info!("Shutdown signal received");

    node_handle.abort();
    reporter_handle.abort();
    info!("Radio node stopped");

    Ok(())
}

/// Periodically log the node's counters
async fn report_status(status: Arc<NodeStatus>, every: Duration) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // First tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let snapshot = status.snapshot();
        info!(
            frames_read = snapshot.frames_read,
            dispatched = snapshot.dispatched,
            dropped = snapshot.dropped(),
            read_errors = snapshot.read_errors,
            "Node status"
        );
    }
}

/// Log room changes applied to the in-process engine
async fn log_state_changes(engine: Arc<StateEngine>) {
    let mut rx = engine.subscribe();

    loop {
        match rx.recv().await {
            Ok(update) => {
                info!(
                    floor = %update.floor,
                    room = %update.room,
                    property = %update.property,
                    value = %update.new_value,
                    "Room state changed"
                );
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped = skipped, "State change log lagging");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

//! Forwarding deltas to a remote building-state server over HTTP.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use roomstate::{StateDelta, StateStore};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// Envelope POSTed for every delta
#[derive(Debug, Serialize)]
pub struct RoomStateEvent<'a> {
    /// UUIDv7 identifier (time-ordered)
    #[serde(rename = "eventId")]
    pub event_id: String,
    /// Producer identity
    pub source: &'a str,
    /// Unix epoch milliseconds (node time)
    pub timestamp: i64,
    pub floor: &'a str,
    pub state: &'a StateDelta,
}

/// [`StateStore`] backed by the building-state server's HTTP API.
///
/// Each call POSTs to `{base_url}/api/floors/{floor}/state` and waits for
/// the response; any non-2xx status is an error.
pub struct HttpStateStore {
    base_url: String,
    source: String,
    http_client: reqwest::Client,
}

impl HttpStateStore {
    pub fn new(base_url: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            source: source.into(),
            http_client: reqwest::Client::new(),
        }
    }

    fn floor_url(&self, floor_name: &str) -> String {
        format!(
            "{}/api/floors/{}/state",
            self.base_url,
            urlencoding::encode(floor_name)
        )
    }
}

#[async_trait]
impl StateStore for HttpStateStore {
    async fn set_room_state(&self, floor_name: &str, delta: StateDelta) -> Result<()> {
        let url = self.floor_url(floor_name);
        let event = RoomStateEvent {
            event_id: Uuid::now_v7().to_string(),
            source: &self.source,
            timestamp: Utc::now().timestamp_millis(),
            floor: floor_name,
            state: &delta,
        };

        debug!(event_id = %event.event_id, floor = %floor_name, "Posting room state");

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&event)
            .send()
            .await
            .context("Failed to send room state to building-state server")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());

            anyhow::bail!("Building-state server returned error status {}: {}", status, body);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::{json, Map};

    fn occupied_delta() -> StateDelta {
        let mut props = Map::new();
        props.insert("occupied".to_string(), json!(1));
        StateDelta::for_room("Room 3", props)
    }

    #[test]
    fn test_floor_url_is_encoded() {
        let store = HttpStateStore::new("http://localhost:8080", "radio-node");
        assert_eq!(
            store.floor_url("Floor 1"),
            "http://localhost:8080/api/floors/Floor%201/state"
        );
    }

    #[tokio::test]
    async fn test_posts_delta() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/floors/Floor%201/state")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(json!({
                "source": "radio-node",
                "floor": "Floor 1",
                "state": {"Room 3": {"dynamic_props": {"occupied": 1}}}
            })))
            .with_status(204)
            .create_async()
            .await;

        let store = HttpStateStore::new(server.url(), "radio-node");
        let result = store.set_room_state("Floor 1", occupied_delta()).await;
        assert!(result.is_ok(), "Expected Ok, got {:?}", result);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/floors/Floor%201/state")
            .with_status(404)
            .with_body("unknown floor")
            .create_async()
            .await;

        let store = HttpStateStore::new(server.url(), "radio-node");
        let err = store
            .set_room_state("Floor 1", occupied_delta())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("unknown floor"));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_unreachable() {
        let store = HttpStateStore::new("http://localhost:9999", "radio-node");
        let result = store.set_room_state("Floor 1", occupied_delta()).await;
        assert!(result.is_err());
    }
}

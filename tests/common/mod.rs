//! Shared harness for integration tests: an in-memory server on an
//! ephemeral port, a manually driven generator, and a WebSocket client.

#![allow(dead_code, clippy::panic, clippy::expect_used)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;
use station_gateway::app::build_app;
use station_gateway::app_state::AppState;
use station_gateway::config::GatewayConfig;
use station_gateway::domain::StationDraft;
use station_gateway::persistence::{InMemoryStationStore, StationStore};
use station_gateway::service::StateGenerator;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// Generator type used by the tests.
pub type TestGenerator = StateGenerator<Arc<StationStore>, StdRng>;

/// A running server plus handles into its state.
pub struct TestServer {
    /// Bound address.
    pub addr: SocketAddr,
    /// State shared with the server.
    pub state: AppState,
}

impl TestServer {
    /// Starts a server whose catalog holds `stations` stations with ids
    /// `1..=stations`. The background generator is disabled; tests drive
    /// ticks through [`TestServer::generator`].
    pub async fn start(stations: usize) -> Self {
        let drafts = (1..=stations).map(|i| StationDraft {
            name: format!("Station {i}"),
            city: "Casablanca".to_string(),
            latitude: 33.5,
            longitude: -7.6,
            phone: None,
            description: None,
        });
        let store = InMemoryStationStore::with_stations(drafts)
            .await
            .expect("seed in-memory store");
        let config = GatewayConfig {
            persistence_enabled: false,
            generator_enabled: false,
            ..GatewayConfig::default()
        };
        let state = AppState::new(StationStore::Memory(store), config);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        let app = build_app(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    /// Builds a generator over the server's state with a fixed seed.
    pub fn generator(&self, seed: u64) -> TestGenerator {
        StateGenerator::new(
            Arc::clone(self.state.station_service.store()),
            self.state.realtime.broadcaster().clone(),
            Arc::clone(self.state.realtime.trains()),
            StdRng::seed_from_u64(seed),
        )
    }

    /// Absolute URL for a REST path.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Opens a WebSocket client and waits until the server registered it.
    pub async fn client(&self) -> WsClient {
        let before = self.state.realtime.registry().len().await;
        let (stream, _) = connect_async(format!("ws://{}/ws", self.addr))
            .await
            .expect("ws connect");
        for _ in 0..100 {
            if self.state.realtime.registry().len().await > before {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        WsClient { stream }
    }
}

/// Thin JSON wrapper over a tungstenite client.
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    /// Sends `{"event": event, "data": data}`.
    pub async fn send(&mut self, event: &str, data: Value) {
        let frame = serde_json::json!({ "event": event, "data": data });
        self.send_raw(&frame.to_string()).await;
    }

    /// Sends a raw text frame.
    pub async fn send_raw(&mut self, text: &str) {
        self.stream
            .send(Message::text(text.to_string()))
            .await
            .expect("ws send");
    }

    /// Receives the next JSON message, failing after five seconds.
    pub async fn recv(&mut self) -> Value {
        loop {
            let next = tokio::time::timeout(Duration::from_secs(5), self.stream.next())
                .await
                .expect("timed out waiting for ws message");
            match next {
                Some(Ok(Message::Text(text))) => {
                    return serde_json::from_str(text.as_str()).expect("json message");
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                other => panic!("unexpected ws frame: {other:?}"),
            }
        }
    }

    /// Receives messages up to and including the next one named `event`.
    pub async fn recv_until(&mut self, event: &str) -> Vec<Value> {
        let mut seen = Vec::new();
        loop {
            let msg = self.recv().await;
            let done = msg["event"] == event;
            seen.push(msg);
            if done {
                return seen;
            }
        }
    }

    /// Closes the socket.
    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}

/// Returns the messages in `batch` named `event`.
pub fn named<'a>(batch: &'a [Value], event: &str) -> Vec<&'a Value> {
    batch.iter().filter(|m| m["event"] == event).collect()
}

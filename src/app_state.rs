//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::persistence::StationStore;
use crate::service::{RealtimeService, StationService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Station catalog CRUD.
    pub station_service: StationService,
    /// Live-update core: registry, router, broadcaster, train table.
    pub realtime: RealtimeService,
    /// Configuration the server was started with.
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    /// Wires the services around one station store.
    #[must_use]
    pub fn new(store: StationStore, config: GatewayConfig) -> Self {
        let store = Arc::new(store);
        Self {
            station_service: StationService::new(Arc::clone(&store)),
            realtime: RealtimeService::new(store, config.outbound_queue_capacity),
            config: Arc::new(config),
        }
    }
}

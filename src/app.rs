//! Router assembly and background task startup.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::service::StateGenerator;
use crate::ws::handler::ws_handler;

/// Upper bound on REST request handling time.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the full HTTP router: REST API, WebSocket endpoint, and, with
/// the `swagger-ui` feature, the Swagger UI.
pub fn build_app(state: AppState) -> Router {
    let router = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::ApiDoc::openapi()),
        )
    };

    with_http_layers(router, REQUEST_TIMEOUT).with_state(state)
}

/// Tracing, permissive CORS, and a request timeout answered with `408`.
fn with_http_layers<S>(router: Router<S>, timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                timeout,
            )),
    )
}

/// Spawns the state generator if it is enabled in the configuration.
///
/// The generator's random source is seeded from `GENERATOR_SEED` when set,
/// from the OS otherwise.
pub fn spawn_generator(state: &AppState) -> Option<JoinHandle<()>> {
    let config = &state.config;
    if !config.generator_enabled {
        tracing::info!("state generator disabled");
        return None;
    }
    let rng = match config.generator_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let generator = StateGenerator::new(
        Arc::clone(state.station_service.store()),
        state.realtime.broadcaster().clone(),
        Arc::clone(state.realtime.trains()),
        rng,
    );
    Some(generator.spawn(config.tick_interval))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;

    fn request(uri: &str) -> Request<Body> {
        let Ok(req) = Request::builder().uri(uri).body(Body::empty()) else {
            panic!("valid request");
        };
        req
    }

    #[tokio::test]
    async fn slow_requests_time_out_with_408() {
        let router: Router = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    "done"
                }),
            )
            .route("/fast", get(|| async { "done" }));
        let app = with_http_layers(router, Duration::from_millis(20));

        let Ok(resp) = app.clone().oneshot(request("/slow")).await else {
            panic!("infallible");
        };
        assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);

        let Ok(resp) = app.oneshot(request("/fast")).await else {
            panic!("infallible");
        };
        assert_eq!(resp.status(), StatusCode::OK);
    }
}

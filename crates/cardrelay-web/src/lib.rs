//! CardRelay Web Server
//!
//! Axum-based notification relay: accepts card design submissions over
//! HTTP and pushes the processed result to every connected WebSocket.

pub mod error;
pub mod routes;
pub mod state;
pub mod websocket;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use cardrelay_core::RelayConfig;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

pub use state::AppState;

/// CORS policy allowing the configured origins with credentials.
fn cors_layer(config: &RelayConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Skipping invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Create the application router.
pub fn create_router(state: AppState, config: &RelayConfig) -> Router {
    let api_routes = Router::new()
        .route("/health", get(routes::status::health))
        .route("/card/design", post(routes::design::submit_design))
        .with_state(state.clone());

    Router::new()
        .route("/", get(routes::status::index))
        .nest("/api", api_routes)
        .route("/ws", get(websocket::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
        .with_state(state)
}

/// Serve the relay on an already bound listener until Ctrl+C.
pub async fn serve(listener: tokio::net::TcpListener, config: &RelayConfig) -> anyhow::Result<()> {
    let app = create_router(AppState::new(), config);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Run the relay server.
pub async fn run_server(config: RelayConfig) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("Relay listening on http://{}", listener.local_addr()?);

    serve(listener, &config).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C, running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    fn app(state: &AppState) -> Router {
        create_router(state.clone(), &RelayConfig::default())
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_design(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/card/design")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_root() {
        let state = AppState::new();
        let response = app(&state)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_health_reports_member_count() {
        let state = AppState::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        state.channels.register(tx);

        let response = app(&state)
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["connectedClients"], 1);
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_missing_card_data_is_rejected_without_broadcast() {
        let state = AppState::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        state.channels.register(tx);

        let response = app(&state).oneshot(post_design("{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
        assert_eq!(state.channels.len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let state = AppState::new();
        let response = app(&state).oneshot(post_design("{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_submit_with_no_channels() {
        let state = AppState::new();
        let response = app(&state)
            .oneshot(post_design(r#"{"cardData":{"a":1}}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["notifiedClients"], 0);
        assert_eq!(body["design"]["status"], "processed");
        assert_eq!(body["design"]["a"], 1);
        assert!(body["design"]["id"].as_str().unwrap().starts_with("design-"));
    }

    #[tokio::test]
    async fn test_submit_counts_only_reachable_channels() {
        let state = AppState::new();
        let (tx_live, mut rx_live) = mpsc::unbounded_channel();
        let (tx_dead, rx_dead) = mpsc::unbounded_channel();
        state.channels.register(tx_live);
        state.channels.register(tx_dead);
        drop(rx_dead);

        let response = app(&state)
            .oneshot(post_design(r#"{"cardData":{"title":"Birthday"}}"#))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["notifiedClients"], 1);
        assert_eq!(state.channels.len(), 1);

        let event: Value = serde_json::from_str(&rx_live.try_recv().unwrap()).unwrap();
        assert_eq!(event["type"], "design-processed");
        assert_eq!(event["data"]["id"], body["design"]["id"]);
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let state = AppState::new();
        let request = Request::get("/api/health")
            .header("origin", "http://10.0.2.2:3000")
            .body(Body::empty())
            .unwrap();
        let response = app(&state).oneshot(request).await.unwrap();
        let headers = response.headers();
        assert_eq!(
            headers.get("access-control-allow-origin").unwrap(),
            "http://10.0.2.2:3000"
        );
        assert_eq!(headers.get("access-control-allow-credentials").unwrap(), "true");
    }

    #[tokio::test]
    async fn test_cors_ignores_other_origins() {
        let state = AppState::new();
        let request = Request::get("/api/health")
            .header("origin", "http://evil.test")
            .body(Body::empty())
            .unwrap();
        let response = app(&state).oneshot(request).await.unwrap();
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }
}

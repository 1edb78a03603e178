//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, metrics)
//! - Bind server to listener
//! - Stop accepting and drain on shutdown

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::audit::AuditLog;
use crate::config::ToolkitConfig;
use crate::http::{currency, geolocation, qr, status};
use crate::observability::metrics;
use crate::providers::{build_http_client, ExchangeRateClient, GeolocationClient, ProviderResult};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ToolkitConfig>,
    pub exchange_rates: ExchangeRateClient,
    pub geolocation: GeolocationClient,
    pub audit: AuditLog,
}

impl AppState {
    /// Build provider clients from `config` around an opened audit log.
    pub fn new(config: ToolkitConfig, audit: AuditLog) -> ProviderResult<Self> {
        let http = build_http_client(&config.providers)?;

        let exchange_rates =
            ExchangeRateClient::new(http.clone(), &config.providers.exchange_rate_url)?;
        let geolocation = GeolocationClient::new(
            http,
            &config.providers.geolocation_url,
            config.providers.geolocation_fields,
            config.audit.user_id.clone(),
        )?;

        Ok(Self {
            config: Arc::new(config),
            exchange_rates,
            geolocation,
            audit,
        })
    }
}

/// HTTP server for the toolkit API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server around prepared state.
    pub fn new(state: AppState) -> Self {
        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/qr-code/generate", post(qr::generate_qr_code))
            .route("/currency/exchange-rate", get(currency::get_exchange_rate))
            .route("/ip-geolocation/{ip}", get(geolocation::get_ip_geolocation))
            .route("/audit/recent", get(status::recent_audit))
            .route("/health", get(status::health))
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn make_request_span(request: &Request) -> tracing::Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let response = next.run(request).await;
    metrics::record_request(&endpoint, response.status().as_u16(), start);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use tower::ServiceExt;

    async fn test_state() -> AppState {
        let mut config = ToolkitConfig::default();
        config.database = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        };
        config.providers.use_system_proxy = false;
        let audit = AuditLog::connect(&config.database).await.unwrap();
        AppState::new(config, audit).unwrap()
    }

    #[tokio::test]
    async fn test_router_serves_health_in_process() {
        let server = HttpServer::new(test_state().await);

        let response = server
            .router()
            .oneshot(HttpRequest::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_router_rejects_bad_audit_limit() {
        let server = HttpServer::new(test_state().await);

        let response = server
            .router()
            .oneshot(
                HttpRequest::get("/audit/recent?limit=abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let server = HttpServer::new(test_state().await);

        let response = server
            .router()
            .oneshot(HttpRequest::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

//! HTTP server setup and request forwarding.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Run the resolution pipeline for every incoming request
//! - Forward rewritten requests to the application upstream
//! - Relay upstream responses, streaming the body through

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{
        header,
        uri::{Authority, PathAndQuery, Scheme},
        HeaderValue, Request, StatusCode, Uri,
    },
    response::{IntoResponse, Json, Response},
    routing::{any, get},
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::request::{request_id, X_REQUEST_ID};
use crate::http::response;
use crate::pipeline::{self, Decision, RequestContext};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Live configuration, atomically swapped on reload.
    pub config: Arc<ArcSwap<GatewayConfig>>,
    pub client: Client<HttpConnector, Body>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: Arc<ArcSwap<GatewayConfig>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Self {
        let shared = Arc::new(ArcSwap::from_pointee(config.clone()));

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.upstream.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let state = AppState {
            config: shared.clone(),
            client,
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config: shared,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/healthz", get(health_handler))
            .route("/search", get(crate::search::search_handler))
            .route("/", any(gateway_handler))
            .route("/{*path}", any(gateway_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.upstream.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Handle to the live configuration, for the reload task.
    pub fn config_handle(&self) -> Arc<ArcSwap<GatewayConfig>> {
        self.config.clone()
    }

    /// Run the server until the shutdown signal fires.
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
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// GET /healthz: gateway liveness.
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Main gateway handler.
/// Runs the resolution pipeline, then redirects or forwards.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let config = state.config.load_full();
    let request_id = request_id(request.headers());

    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);

    if pipeline::is_bypassed(&path, &config.i18n) {
        tracing::debug!(request_id = %request_id, path = %path, "Bypassing pipeline");
        return forward(&state, &config, request, path, Vec::new(), &request_id).await;
    }

    let mut ctx = RequestContext::new(request.headers(), &path, query.as_deref());
    match pipeline::run(&mut ctx, &config) {
        Decision::Redirect { location, cookies } => {
            tracing::debug!(
                request_id = %request_id,
                path = %path,
                location = %location,
                "Pipeline redirect"
            );
            response::redirect(&location, &cookies)
        }
        Decision::Continue => {
            tracing::debug!(
                request_id = %request_id,
                path = %path,
                rewritten = %ctx.path,
                "Forwarding upstream"
            );
            forward(&state, &config, request, ctx.path, ctx.set_cookies, &request_id).await
        }
    }
}

/// Forward a request to the application upstream with a rewritten path,
/// relaying the response body as it streams in.
async fn forward(
    state: &AppState,
    config: &GatewayConfig,
    request: Request<Body>,
    rewritten_path: String,
    set_cookies: Vec<String>,
    request_id: &str,
) -> Response {
    let (parts, body) = request.into_parts();

    let path_and_query = match parts.uri.query() {
        Some(query) => format!("{rewritten_path}?{query}"),
        None => rewritten_path,
    };

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Authority::from_str(&config.upstream.app_address).ok();
    uri_parts.path_and_query = PathAndQuery::from_str(&path_and_query).ok();

    let Ok(uri) = Uri::from_parts(uri_parts) else {
        tracing::error!(request_id = %request_id, path = %path_and_query, "Failed to build upstream URI");
        return (StatusCode::INTERNAL_SERVER_ERROR, "Invalid upstream URI").into_response();
    };

    let mut builder = Request::builder().method(parts.method.clone()).uri(uri);
    if let Some(headers) = builder.headers_mut() {
        for (name, value) in parts.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }
        if let Ok(value) = HeaderValue::from_str(request_id) {
            headers.insert(X_REQUEST_ID, value);
        }
    }

    let upstream_request = match builder.body(body) {
        Ok(req) => req,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Failed to build upstream request");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Invalid upstream request").into_response();
        }
    };

    match state.client.request(upstream_request).await {
        Ok(upstream_response) => {
            let (mut parts, body) = upstream_response.into_parts();
            response::strip_hop_by_hop(&mut parts.headers);
            response::append_cookies(&mut parts.headers, &set_cookies);
            parts
                .headers
                .entry(header::HeaderName::from_static(X_REQUEST_ID))
                .or_insert_with(|| {
                    HeaderValue::from_str(request_id)
                        .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
                });

            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream request failed");
            response::bad_gateway("Upstream request failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower::ServiceExt;

    fn request(uri: &str, headers: &[(&str, &str)]) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn healthz_reports_ok() {
        let server = HttpServer::new(GatewayConfig::default());
        let response = server
            .router
            .oneshot(request("/healthz", &[]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn locale_redirect_needs_no_upstream() {
        let server = HttpServer::new(GatewayConfig::default());
        let response = server
            .router
            .oneshot(request(
                "/about",
                &[
                    ("host", "conferences.flaw.uniba.sk"),
                    ("accept-language", "en"),
                ],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/en/about");
    }

    #[tokio::test]
    async fn login_redirect_needs_no_upstream() {
        let server = HttpServer::new(GatewayConfig::default());
        let response = server
            .router
            .oneshot(request(
                "/en/grants",
                &[("host", "conferences.flaw.uniba.sk")],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login?url=%2Fen%2Fgrants"
        );
    }

    #[tokio::test]
    async fn search_requires_query() {
        let server = HttpServer::new(GatewayConfig::default());
        let response = server.router.oneshot(request("/search", &[])).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

//! Middleware stack for the API server
//!
//! Provides logging, request ID generation, CORS, rate limiting, and the
//! 30 second request timeout.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use apollo_common::{AppError, CorsConfig, RateLimitConfig};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::GlobalKeyExtractor, GovernorLayer,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

use crate::response::ApiError;
use crate::state::AppState;

/// Header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Apply the middleware stack with rate limiting and configured CORS
///
/// Request order: rate limit, request id, trace, timeout, CORS, handler.
pub fn apply_middleware(
    router: Router<AppState>,
    rate_limit_config: &RateLimitConfig,
    cors_config: &CorsConfig,
    is_production: bool,
) -> Router<AppState> {
    let router = router
        // CORS (innermost - applied last to outgoing responses)
        .layer(create_cors_layer(cors_config, is_production))
        // Timeout (returns 503 Service Unavailable on timeout)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            REQUEST_TIMEOUT,
        ))
        // Tracing
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Request ID propagation
        .layer(PropagateRequestIdLayer::new(header::HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        // Request ID generation
        .layer(SetRequestIdLayer::new(
            header::HeaderName::from_static(REQUEST_ID_HEADER),
            MakeRequestUuid,
        ));

    apply_rate_limit(router, rate_limit_config)
}

/// Global token bucket; rejections are rewritten into the error envelope
fn apply_rate_limit(router: Router<AppState>, config: &RateLimitConfig) -> Router<AppState> {
    if config.requests_per_second == 0 || config.burst == 0 {
        warn!("Rate limiting disabled");
        return router;
    }

    // One token every `1000 / rps` milliseconds
    let interval_ms = (1000 / u64::from(config.requests_per_second)).max(1);

    let Some(governor_conf) = GovernorConfigBuilder::default()
        .per_millisecond(interval_ms)
        .burst_size(config.burst)
        .key_extractor(GlobalKeyExtractor)
        .finish()
    else {
        warn!(
            requests_per_second = config.requests_per_second,
            burst = config.burst,
            "Invalid rate limit settings, rate limiting disabled"
        );
        return router;
    };

    info!(
        requests_per_second = config.requests_per_second,
        burst = config.burst,
        "Rate limiting enabled"
    );

    router
        .layer(GovernorLayer {
            config: Arc::new(governor_conf),
        })
        .layer(axum::middleware::map_response(rate_limit_envelope))
}

async fn rate_limit_envelope(response: Response) -> Response {
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return response;
    }

    let retry_after = response.headers().get(header::RETRY_AFTER).cloned();
    let mut enveloped = ApiError::from(AppError::RateLimitExceeded).into_response();
    if let Some(value) = retry_after {
        enveloped.headers_mut().insert(header::RETRY_AFTER, value);
    }
    enveloped
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &CorsConfig, is_production: bool) -> CorsLayer {
    let base_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([
            header::HeaderName::from_static(REQUEST_ID_HEADER),
            header::RETRY_AFTER,
        ]);

    // In production, only allow configured origins
    // In development, allow any origin if no origins are configured
    if is_production || !config.allowed_origins.is_empty() {
        if config.allowed_origins.is_empty() {
            warn!(
                "CORS: No allowed origins configured in production mode. \
                 Requests from browsers will be blocked."
            );
            return base_layer.allow_origin(AllowOrigin::list(Vec::<HeaderValue>::new()));
        }

        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| {
                origin.parse::<HeaderValue>().ok().or_else(|| {
                    warn!("Invalid CORS origin: {}", origin);
                    None
                })
            })
            .collect();

        info!("CORS: Allowing {} configured origins", origins.len());
        // Session cookies only travel with credentialed requests
        base_layer
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
    } else {
        warn!(
            "CORS: Allowing any origin (development mode). \
             Configure CORS_ALLOWED_ORIGINS for production."
        );
        base_layer.allow_origin(Any)
    }
}

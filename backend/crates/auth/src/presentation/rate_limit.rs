//! Auth Rate Limiting
//!
//! Fixed-window cap per client address on the `/auth` routes. Responses
//! carry `RateLimit-*` headers; rejections add `Retry-After`.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::client::{extract_client_ip, peer_ip};
use platform::rate_limit::{RateLimitResult, RateLimitStore};

use crate::domain::repository::AccountRepository;
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

const RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
const RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
const RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

/// Requests without a resolvable address share one bucket.
const UNKNOWN_CLIENT: &str = "unknown";

pub async fn limit_by_ip<R>(
    State(state): State<AuthAppState<R>>,
    req: Request,
    next: Next,
) -> Response
where
    R: AccountRepository + Send + Sync + 'static,
{
    let config = &state.ctx.config;
    let peer = peer_ip(
        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr),
    );
    let key = extract_client_ip(req.headers(), peer, config.trust_forwarded_for)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());

    let store = state.rate_limiter.as_ref();
    let result = match RateLimitStore::check_and_increment(store, &key, &config.rate_limit).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "Rate limit check failed, allowing request");
            return next.run(req).await;
        }
    };

    let mut response = if result.allowed {
        next.run(req).await
    } else {
        tracing::warn!(client = %key, "Rate limit exceeded");
        let mut rejected = AuthError::RateLimited.into_response();
        rejected
            .headers_mut()
            .insert(header::RETRY_AFTER, reset_seconds(&result));
        rejected
    };

    write_headers(response.headers_mut(), config.rate_limit.max_requests, &result);
    response
}

fn reset_seconds(result: &RateLimitResult) -> HeaderValue {
    // Round up so clients never retry early.
    let secs = result.reset_after.as_secs() + u64::from(result.reset_after.subsec_nanos() > 0);
    HeaderValue::from(secs)
}

fn write_headers(headers: &mut HeaderMap, limit: u32, result: &RateLimitResult) {
    headers.insert(RATELIMIT_LIMIT, HeaderValue::from(limit));
    headers.insert(RATELIMIT_REMAINING, HeaderValue::from(result.remaining));
    headers.insert(RATELIMIT_RESET, reset_seconds(result));
}

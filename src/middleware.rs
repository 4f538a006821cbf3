use axum::{
    extract::{ConnectInfo, Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::metrics::{RATE_LIMITED_TOTAL, REQUEST_TOTAL};
use crate::rate_limit::ClientKey;
use crate::state::AppState;

pub const SUMMARIZE_PATH: &str = "/api/summarize/";

fn is_summarize(req: &Request) -> bool {
    req.uri().path() == SUMMARIZE_PATH && *req.method() == Method::POST
}

// Peer address as seen by the listener. No forwarded-for handling, so
// everything behind one proxy shares a bucket.
fn client_ip(req: &Request) -> IpAddr {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Logs and counts every summarize call before admission is decided.
pub async fn request_logging(req: Request, next: Next) -> Response {
    if is_summarize(&req) {
        REQUEST_TOTAL.inc();
        info!(client = %client_ip(&req), "summarize request");
    }
    next.run(req).await
}

/// Admission filter: only `POST /api/summarize/` is limited, everything
/// else passes straight through.
pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    if !is_summarize(&req) {
        return next.run(req).await;
    }

    let key = ClientKey::from(client_ip(&req));
    let decision = state.limiter.try_admit(key, Instant::now());

    if !decision.admitted {
        RATE_LIMITED_TOTAL.inc();
        warn!(client = %key, "rate limit exceeded");
        return ApiError::RateLimited {
            retry_after: decision.retry_after,
        }
        .into_response();
    }

    debug!(client = %key, remaining = decision.remaining, "admitted");
    next.run(req).await
}

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{CONTENT_TYPE, RETRY_AFTER},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use super::AppState;
use crate::constants::replies::RATE_LIMITED;
use crate::services::Admission;

const UNKNOWN_CLIENT: &str = "unknown";

/// Charges every request against the caller's budget before any handler runs.
pub async fn admission_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let key = client_key(
        peer,
        request.headers(),
        &state.config().rate_limit.trusted_proxy_ips,
    );

    match state.shared.admission.admit(&key) {
        Admission::Allow => next.run(request).await,
        Admission::Reject { retry_after } => {
            tracing::debug!(client = %key, "Request rejected by admission control");
            metrics::counter!("admission_rejections_total").increment(1);
            rejection_response(retry_after)
        }
    }
}

/// Identity a request is rate limited under.
///
/// The socket peer, unless that peer is a trusted proxy, in which case the
/// first `X-Forwarded-For` address is used.
#[must_use]
pub fn client_key(peer: Option<IpAddr>, headers: &HeaderMap, trusted_proxies: &[String]) -> String {
    let Some(peer) = peer else {
        return UNKNOWN_CLIENT.to_string();
    };

    let peer_is_trusted = trusted_proxies
        .iter()
        .filter_map(|p| p.parse::<IpAddr>().ok())
        .any(|p| p == peer);

    if peer_is_trusted && let Some(forwarded) = forwarded_for(headers) {
        return forwarded.to_string();
    }

    peer.to_string()
}

fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

fn rejection_response(retry_after: Duration) -> Response {
    let seconds = retry_after.as_millis().div_ceil(1000).max(1);

    let mut response = (StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED).into_response();
    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    if let Ok(value) = HeaderValue::from_str(&seconds.to_string()) {
        headers.insert(RETRY_AFTER, value);
    }
    response
}

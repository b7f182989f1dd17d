use crate::error::{AppError, Result};
use crate::model::RedirectQuery;
use crate::state::AppState;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::header::{
    CONNECTION, CONTENT_ENCODING, CONTENT_LENGTH, LOCATION, PROXY_AUTHENTICATE,
    PROXY_AUTHORIZATION, TE, TRAILER, TRANSFER_ENCODING, UPGRADE,
};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use snip_core::{Link, LinkId};
use tracing::{debug, trace, warn};

/// Headers that must not be forwarded from the upstream response.
///
/// The body is re-streamed decoded and re-framed, so the upstream encoding and
/// length no longer apply.
const STRIPPED_HEADERS: [HeaderName; 9] = [
    CONTENT_ENCODING,
    CONTENT_LENGTH,
    TRANSFER_ENCODING,
    CONNECTION,
    TE,
    TRAILER,
    UPGRADE,
    PROXY_AUTHENTICATE,
    PROXY_AUTHORIZATION,
];

pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<RedirectQuery>,
) -> Result<Response> {
    // Ids that cannot be valid cannot be stored either.
    let id = LinkId::new(id).map_err(|_| AppError::NotFound)?;
    let link = state
        .shortener()
        .get_link(&id)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Err(err) = state.shortener().increment_clicks(&id).await {
        warn!(id = %id, error = %err, "failed to count click");
    }

    if query.proxy_enabled() {
        return proxy(&state, &link).await;
    }

    trace!(id = %id, location = %link.original_url, "redirecting");
    Ok((StatusCode::FOUND, [(LOCATION, link.original_url)]).into_response())
}

async fn proxy(state: &AppState, link: &Link) -> Result<Response> {
    let content = state
        .shortener()
        .fetch_original_content(&link.original_url)
        .await?;
    debug!(id = %link.id, status = %content.status, "proxying original content");

    let mut headers = content.headers;
    strip_proxy_headers(&mut headers);

    let mut response = Response::new(Body::from_stream(content.body));
    *response.status_mut() = content.status;
    *response.headers_mut() = headers;
    Ok(response)
}

fn strip_proxy_headers(headers: &mut HeaderMap) {
    for name in STRIPPED_HEADERS {
        headers.remove(name);
    }
    headers.remove("keep-alive");
    headers.remove("proxy-connection");
}

pub async fn not_found_handler() -> AppError {
    AppError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::CONTENT_TYPE;
    use axum::http::HeaderValue;

    #[test]
    fn strips_encoding_and_hop_by_hop_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("42"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));

        strip_proxy_headers(&mut headers);

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/html");
    }
}

use crate::config::RepliesConfig;
use crate::error::RepliesError;
use crate::policy::{Ability, PermissionPolicy, User};
use crate::replies::ReplyRepositoryHandle;
use crate::server::guards::ReplyRouteGuard;
use crate::server::routes::{replies, session};
use crate::session::CurrentUserProvider;

use axum::{
    Router,
    extract::Request,
    http::{HeaderName, HeaderValue, StatusCode, Version, header::USER_AGENT},
    middleware::{self, Next},
    response::Response,
};
use base64::Engine as _;
use rand::RngCore;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

const MAX_REQUEST_ID_LEN: usize = 128;
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

fn generate_request_id() -> String {
    // 96 bits => 16 chars base64url (no padding).
    let mut bytes = [0u8; 12];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn format_http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "HTTP/?",
    }
}

#[derive(Clone)]
pub struct AppState {
    pub replies: ReplyRepositoryHandle,
    pub users: Arc<dyn CurrentUserProvider>,
    pub policy: Arc<PermissionPolicy>,
    pub enabled: bool,
}

impl AppState {
    pub fn new(
        replies: ReplyRepositoryHandle,
        users: Arc<dyn CurrentUserProvider>,
        settings: &RepliesConfig,
    ) -> Self {
        Self {
            replies,
            users,
            policy: Arc::new(PermissionPolicy::from_config(settings)),
            enabled: settings.enabled,
        }
    }

    /// Handler-side permission check; denials look like unknown routes.
    pub fn authorize(&self, user: &User, ability: Ability) -> Result<(), RepliesError> {
        if self.enabled && self.policy.allows(user, ability) {
            Ok(())
        } else {
            Err(RepliesError::NotFound)
        }
    }
}

async fn not_found_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn access_log(req: Request, next: Next) -> Response {
    // Capture request metadata before moving `req` into the handler stack.
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();

    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map_or_else(generate_request_id, str::to_string);

    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Instant::now();
    let mut resp = next.run(req).await;

    // Always reflect `x-request-id`, even if the client didn't send one.
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(X_REQUEST_ID, value);
    }

    let status = resp.status();
    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    let path = uri.path();
    let protocol = format_http_version(version);

    if status.is_server_error() {
        error!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    } else if status.is_client_error() {
        warn!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    } else {
        info!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    }

    resp
}

/// Builds the application router with canned reply routes nested at `mount_path`.
pub fn app_router(state: AppState, mount_path: &str) -> Router {
    let canned = replies::router().route_layer(middleware::from_extractor_with_state::<
        ReplyRouteGuard,
        _,
    >(state.clone()));

    Router::new()
        .nest(mount_path, canned)
        .merge(session::router())
        .fallback(not_found_handler)
        .with_state(state)
        .layer(middleware::from_fn(access_log))
}

use axum::{
    body::{to_bytes, Body},
    extract::{ConnectInfo, Extension},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast::Sender as BroadcastSender;
use tracing::{error, info, warn};

use crate::config::ResponseMode;
use crate::ingest;
use crate::AppState;

/// Every path lands on the same handler.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new().fallback(dispatch).layer(Extension(state))
}

pub async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: BroadcastSender<()>,
) -> anyhow::Result<()> {
    let app = router(state).into_make_service_with_connect_info::<SocketAddr>();
    let mut shutdown_sub = shutdown.subscribe();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_sub.recv().await;
        })
        .await?;
    Ok(())
}

pub async fn dispatch(
    Extension(state): Extension<Arc<AppState>>,
    request: Request<Body>,
) -> Response {
    match *request.method() {
        Method::GET => serve_dataset(&state).await,
        Method::POST => accept_upload(&state, request).await,
        _ => match state.config.response_mode {
            ResponseMode::Legacy => StatusCode::OK.into_response(),
            ResponseMode::Strict => StatusCode::METHOD_NOT_ALLOWED.into_response(),
        },
    }
}

async fn serve_dataset(state: &AppState) -> Response {
    let json_header = [(CONTENT_TYPE, "application/json")];

    // nothing uploaded yet is an empty array, not an empty object
    let Some(dataset) = state.store.current().await else {
        return (json_header, "[]").into_response();
    };

    match serde_json::to_vec(dataset.as_ref()) {
        Ok(body) => (json_header, body).into_response(),
        Err(e) => {
            error!(error = %e, "failed to encode dataset");
            match state.config.response_mode {
                ResponseMode::Legacy => (json_header, Body::empty()).into_response(),
                ResponseMode::Strict => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            }
        }
    }
}

async fn accept_upload(state: &AppState, request: Request<Body>) -> Response {
    let mode = state.config.response_mode;
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let authorized = request
        .headers()
        .get(state.config.auth_header.as_str())
        .is_some_and(|value| value.as_bytes() == state.config.auth_value.as_bytes());
    if !authorized {
        warn!(%remote, "dropping upload without valid auth header");
        return match mode {
            ResponseMode::Legacy => StatusCode::OK.into_response(),
            ResponseMode::Strict => StatusCode::UNAUTHORIZED.into_response(),
        };
    }

    let body = match to_bytes(request.into_body(), state.config.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(%remote, error = %e, "failed to read upload body");
            return rejected(mode, format!("request body error: {e}"));
        }
    };

    let dataset = match ingest::parse_upload(&body) {
        Ok(dataset) => dataset,
        Err(e) => {
            error!(%remote, error = %e, "rejected upload, keeping previous dataset");
            return rejected(mode, e.to_string());
        }
    };

    let rows = dataset.len();
    let sold = dataset.sold_count();
    state.store.replace(dataset).await;
    info!(%remote, rows, sold, "dataset replaced");

    match mode {
        ResponseMode::Legacy => StatusCode::OK.into_response(),
        ResponseMode::Strict => StatusCode::NO_CONTENT.into_response(),
    }
}

fn rejected(mode: ResponseMode, message: String) -> Response {
    match mode {
        ResponseMode::Legacy => StatusCode::OK.into_response(),
        ResponseMode::Strict => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
        }
    }
}

use crate::error::Result;
use crate::model::{CreateUrlRequest, CreateUrlResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tinylink_core::UrlInput;
use tracing::{debug, info};

pub async fn create_url_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<Json<CreateUrlResponse>> {
    let Json(request) = payload?;
    let mut input = UrlInput::new(request.url).with_keywords(request.keywords);
    if let Some(expires_on) = request.expires_on {
        input = input.with_expires_on(expires_on);
    }

    let short = state
        .shortener()
        .create_short_link(&state.context(), input)
        .await?;
    info!(id = %short.link.id, code = %short.code, "Short link ready");

    Ok(Json(CreateUrlResponse {
        short_url: short.code.to_url(state.base_url()),
        short_code: short.code.to_string(),
    }))
}

pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response> {
    let url = state
        .shortener()
        .resolve_code(&state.context(), &code)
        .await?;
    debug!(code = %code, "Redirecting");

    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, url)]).into_response())
}

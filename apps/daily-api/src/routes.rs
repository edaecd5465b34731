use axum::{
	Json, Router,
	extract::{Query, State},
	http::{HeaderMap, StatusCode},
	response::{IntoResponse, Response},
	routing::get,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;
use daily_service::{Error, SearchPageRequest, SearchPageResponse, SuggestRequest, SuggestResponse};

/// Set by the upstream auth layer to the signed-in viewer's user id.
pub const VIEWER_HEADER: &str = "x-daily-user-id";

#[derive(Debug, Deserialize)]
struct SuggestParams {
	#[serde(default)]
	q: String,
	limit: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
	#[serde(default)]
	q: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } => json_error(
				StatusCode::BAD_REQUEST,
				"invalid_request",
				message,
				Some(vec!["q".to_string()]),
			),
			Error::Storage { message } => {
				tracing::error!(error = %message, "Search request failed in storage.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message, None)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/search/suggest", get(suggest))
		.route("/v1/search", get(search_page))
		.with_state(state)
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn suggest(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(params): Query<SuggestParams>,
) -> Result<Json<SuggestResponse>, ApiError> {
	let viewer = viewer_id(&headers)?;
	let request = SuggestRequest { q: params.q, limit: params.limit, viewer };
	let response = state.service.suggest(request).await?;

	Ok(Json(response))
}

async fn search_page(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(params): Query<SearchParams>,
) -> Result<Json<SearchPageResponse>, ApiError> {
	let viewer = viewer_id(&headers)?;
	let response = state.service.search_page(SearchPageRequest { q: params.q, viewer }).await?;

	Ok(Json(response))
}

/// A missing or blank header means an anonymous viewer.
fn viewer_id(headers: &HeaderMap) -> Result<Option<Uuid>, ApiError> {
	let Some(raw) = headers.get(VIEWER_HEADER) else { return Ok(None) };
	let invalid = || {
		json_error(
			StatusCode::BAD_REQUEST,
			"invalid_request",
			format!("{VIEWER_HEADER} must be a UUID."),
			Some(vec![VIEWER_HEADER.to_string()]),
		)
	};
	let value = raw.to_str().map_err(|_| invalid())?.trim();

	if value.is_empty() {
		return Ok(None);
	}

	Uuid::parse_str(value).map(Some).map_err(|_| invalid())
}

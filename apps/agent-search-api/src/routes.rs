use axum::{
	Json, Router,
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use agent_search_domain::AgentRecord;
use agent_search_service::{Error, RankRequest, RankResponse, SearchRequest, SearchResponse};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/agents/search", post(search))
		.route("/v1/agents/rank", post(rank))
		.route("/v1/agents/{agent_id}", get(get_agent))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search(payload)?;

	Ok(Json(response))
}

async fn rank(
	State(state): State<AppState>,
	Json(payload): Json<RankRequest>,
) -> Result<Json<RankResponse>, ApiError> {
	let response = state.service.rank(payload)?;

	Ok(Json(response))
}

async fn get_agent(
	State(state): State<AppState>,
	Path(agent_id): Path<String>,
) -> Result<Json<AgentRecord>, ApiError> {
	let agent = state.service.get_agent(&agent_id)?.clone();

	Ok(Json(agent))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_request", message),
			Error::NotFound { message } =>
				Self::new(StatusCode::NOT_FOUND, "not_found", message),
			Error::Config { message } => {
				tracing::error!(error = %message, "Service configuration rejected at request time.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "config_error", message)
			},
			Error::Catalog { message } => {
				tracing::error!(error = %message, "Catalog failure while serving request.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "Internal error.")
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

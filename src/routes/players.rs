use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};

use crate::{
    dto::player::{PlayerResponse, SubmitPlayerRequest},
    error::AppError,
    services::score_service,
    state::SharedState,
};

/// Score submission endpoints.
pub fn router() -> Router<SharedState> {
    Router::new().route("/players", post(submit_player))
}

/// Record a finished run; the score is computed from `timeTaken`.
#[utoipa::path(
    post,
    path = "/api/players",
    tag = "players",
    request_body = SubmitPlayerRequest,
    responses(
        (status = 201, description = "Player stored", body = PlayerResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn submit_player(
    State(state): State<SharedState>,
    payload: Result<Json<SubmitPlayerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PlayerResponse>), AppError> {
    let Json(payload) = payload?;
    let record = score_service::submit_player(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(PlayerResponse::ok(record))))
}

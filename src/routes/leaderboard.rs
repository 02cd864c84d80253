use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::player::LeaderboardResponse, error::AppError, services::score_service,
    state::SharedState,
};

/// Leaderboard endpoints.
pub fn router() -> Router<SharedState> {
    Router::new().route("/leaderboard", get(leaderboard))
}

/// Best players, highest score first and fastest first on ties.
#[utoipa::path(
    get,
    path = "/api/leaderboard",
    tag = "leaderboard",
    responses(
        (status = 200, description = "Ranked players", body = LeaderboardResponse),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn leaderboard(
    State(state): State<SharedState>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let records = score_service::leaderboard(&state).await?;
    Ok(Json(LeaderboardResponse::ok(records)))
}

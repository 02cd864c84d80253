use std::time::SystemTime;

use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::PlayerEntity,
    dto::player::{MISSING_FIELDS_MESSAGE, PlayerRecord, SubmitPlayerRequest},
    error::ServiceError,
    game::scoring::score,
    state::SharedState,
};

/// Validate a finished run, compute its score and persist it.
pub async fn submit_player(
    state: &SharedState,
    request: SubmitPlayerRequest,
) -> Result<PlayerRecord, ServiceError> {
    if request.has_missing_fields() {
        return Err(ServiceError::InvalidInput(MISSING_FIELDS_MESSAGE.into()));
    }
    request
        .validate()
        .map_err(|err| ServiceError::InvalidInput(err.to_string()))?;

    let (Some(name), Some(department), Some(time_taken)) =
        (request.name, request.department, request.time_taken)
    else {
        return Err(ServiceError::InvalidInput(MISSING_FIELDS_MESSAGE.into()));
    };
    let time_taken = u32::try_from(time_taken)
        .map_err(|_| ServiceError::InvalidInput("timeTaken out of range".into()))?;

    let player = PlayerEntity {
        id: Uuid::new_v4().to_string(),
        name: name.trim().to_owned(),
        department: department.trim().to_owned(),
        time_taken,
        score: score(time_taken),
        created_at: SystemTime::now(),
    };

    let store = state.require_score_store().await?;
    store.save_player(player.clone()).await?;
    info!(
        id = %player.id,
        name = %player.name,
        time_taken,
        score = player.score,
        "player score saved"
    );

    Ok(player.into())
}

/// Best players in leaderboard order, each annotated with its one-based rank.
pub async fn leaderboard(state: &SharedState) -> Result<Vec<PlayerRecord>, ServiceError> {
    let limit = state.config().server().leaderboard_limit;
    let store = state.require_score_store().await?;
    let players = store.top_players(limit).await?;
    debug!(count = players.len(), limit, "leaderboard loaded");

    Ok(players
        .into_iter()
        .zip(1u32..)
        .map(|(player, rank)| PlayerRecord {
            rank: Some(rank),
            ..player.into()
        })
        .collect())
}

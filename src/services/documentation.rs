use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI document for the WebVerse leaderboard service.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::players::submit_player,
        crate::routes::leaderboard::leaderboard,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::player::SubmitPlayerRequest,
            crate::dto::player::PlayerRecord,
            crate::dto::player::PlayerResponse,
            crate::dto::player::LeaderboardResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "players", description = "Score submission"),
        (name = "leaderboard", description = "Ranked results"),
    )
)]
pub struct ApiDoc;

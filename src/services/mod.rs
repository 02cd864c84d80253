/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Player submission and leaderboard queries.
pub mod score_service;
/// Storage connection supervisor driving degraded mode.
pub mod storage_supervisor;

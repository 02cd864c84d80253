use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::dao::models::PlayerEntity;

/// Stored shape of a player, field names matching the public API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MongoPlayerDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    department: String,
    time_taken: u32,
    score: u32,
    created_at: DateTime,
}

impl From<PlayerEntity> for MongoPlayerDocument {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            department: value.department,
            time_taken: value.time_taken,
            score: value.score,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl From<MongoPlayerDocument> for PlayerEntity {
    fn from(value: MongoPlayerDocument) -> Self {
        Self {
            id: value.id,
            name: value.name,
            department: value.department,
            time_taken: value.time_taken,
            score: value.score,
            created_at: value.created_at.to_system_time(),
        }
    }
}

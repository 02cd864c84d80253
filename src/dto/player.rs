use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::PlayerEntity,
    dto::{
        format_system_time,
        validation::{validate_profile_text, validate_time_taken},
    },
};

/// Message returned when any of the three fields is absent.
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields: name, department or timeTaken";

/// Payload posted when a player finishes the puzzle sequence.
///
/// Any `score` sent by the client is ignored; the server computes it from `timeTaken`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPlayerRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    /// Seconds spent in the puzzle window, 0 to 600.
    #[serde(default)]
    #[schema(value_type = u32)]
    pub time_taken: Option<i64>,
}

impl SubmitPlayerRequest {
    /// Whether a required field is absent or blank.
    pub fn has_missing_fields(&self) -> bool {
        let blank = |value: &Option<String>| value.as_deref().is_none_or(|text| text.trim().is_empty());
        blank(&self.name) || blank(&self.department) || self.time_taken.is_none()
    }
}

impl Validate for SubmitPlayerRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(ref name) = self.name {
            if let Err(e) = validate_profile_text(name) {
                errors.add("name", e);
            }
        }
        if let Some(ref department) = self.department {
            if let Err(e) = validate_profile_text(department) {
                errors.add("department", e);
            }
        }
        if let Some(time_taken) = self.time_taken {
            if let Err(e) = validate_time_taken(time_taken) {
                errors.add("timeTaken", e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Stored player as exposed by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub department: String,
    pub time_taken: u32,
    pub score: u32,
    /// RFC 3339 insert timestamp.
    pub created_at: String,
    /// One-based leaderboard position; only present in leaderboard listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

impl From<PlayerEntity> for PlayerRecord {
    fn from(entity: PlayerEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            department: entity.department,
            time_taken: entity.time_taken,
            score: entity.score,
            created_at: format_system_time(entity.created_at),
            rank: None,
        }
    }
}

/// `{success: true, data}` envelope returned by `POST /api/players`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerResponse {
    pub success: bool,
    pub data: PlayerRecord,
}

impl PlayerResponse {
    /// Wrap a freshly stored record.
    pub fn ok(data: PlayerRecord) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `{success: true, data}` envelope returned by `GET /api/leaderboard`.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    pub success: bool,
    /// Best players first, each carrying its rank.
    pub data: Vec<PlayerRecord>,
}

impl LeaderboardResponse {
    /// Wrap a ranked listing.
    pub fn ok(data: Vec<PlayerRecord>) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use serde_json::json;

    use super::*;

    fn request(value: serde_json::Value) -> SubmitPlayerRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn missing_or_blank_fields_are_detected() {
        assert!(request(json!({"name": "Ada", "department": "CS"})).has_missing_fields());
        assert!(
            request(json!({"name": "  ", "department": "CS", "timeTaken": 10}))
                .has_missing_fields()
        );
        assert!(
            !request(json!({"name": "Ada", "department": "CS", "timeTaken": 0}))
                .has_missing_fields()
        );
    }

    #[test]
    fn out_of_range_time_fails_validation() {
        let payload = request(json!({"name": "Ada", "department": "CS", "timeTaken": 601}));
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("timeTaken"));

        let payload = request(json!({"name": "Ada", "department": "CS", "timeTaken": -3}));
        assert!(payload.validate().is_err());
    }

    #[test]
    fn client_score_is_ignored() {
        let payload = request(json!({"name": "Ada", "department": "CS", "timeTaken": 5, "score": 9999}));
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn record_serializes_with_api_field_names() {
        let record = PlayerRecord::from(PlayerEntity {
            id: "abc".into(),
            name: "Ada".into(),
            department: "CS".into(),
            time_taken: 60,
            score: 810,
            created_at: SystemTime::UNIX_EPOCH + Duration::from_secs(86_400),
        });
        let value = serde_json::to_value(PlayerResponse::ok(record)).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["_id"], "abc");
        assert_eq!(value["data"]["timeTaken"], 60);
        assert_eq!(value["data"]["createdAt"], "1970-01-02T00:00:00Z");
        assert!(value["data"].get("rank").is_none());
    }
}

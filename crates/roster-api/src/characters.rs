//! Handlers for `/characters/:id` and its last-seen record.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/characters/:id` | 404 if not found |
//! | `PUT`  | `/characters/:id` | Body: `{"name":"Foo","level":220,"profession":"Doctor"}` |
//! | `GET`  | `/characters/:id/last-seen` | Whole alt group, most recent first |
//! | `PUT`  | `/characters/:id/last-seen` | Body: `{"at":"2024-01-01T00:00:00Z"}` |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use chrono::{DateTime, Utc};
use roster_core::{
  alt::CharId,
  character::{Character, LastSeen},
  store::{ActivityStore, CharacterLoader},
};
use serde::Deserialize;

use crate::{ApiState, RosterStore, error::ApiError};

/// `GET /characters/:id`
pub async fn get_one<S: RosterStore>(
  State(state): State<ApiState<S>>,
  Path(char_id): Path<CharId>,
) -> Result<Json<Character>, ApiError> {
  let character = state
    .store
    .get_character(char_id)
    .await
    .map_err(roster_core::Error::store)?
    .ok_or_else(|| ApiError::NotFound(format!("character {char_id} not found")))?;
  Ok(Json(character))
}

#[derive(Debug, Deserialize)]
pub struct UpsertBody {
  pub name:       String,
  #[serde(default)]
  pub level:      u32,
  #[serde(default)]
  pub profession: Option<String>,
}

/// `PUT /characters/:id`
pub async fn upsert<S: RosterStore>(
  State(state): State<ApiState<S>>,
  Path(char_id): Path<CharId>,
  Json(body): Json<UpsertBody>,
) -> Result<StatusCode, ApiError> {
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("name must not be empty".into()));
  }

  state
    .store
    .upsert_character(Character {
      char_id,
      name: body.name,
      level: body.level,
      profession: body.profession,
    })
    .await
    .map_err(roster_core::Error::store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /characters/:id/last-seen`
pub async fn last_seen<S: RosterStore>(
  State(state): State<ApiState<S>>,
  Path(char_id): Path<CharId>,
) -> Result<Json<Vec<LastSeen>>, ApiError> {
  let seen = state
    .store
    .last_seen(char_id)
    .await
    .map_err(roster_core::Error::store)?;
  Ok(Json(seen))
}

#[derive(Debug, Deserialize)]
pub struct LastSeenBody {
  pub at: DateTime<Utc>,
}

/// `PUT /characters/:id/last-seen`
pub async fn record_last_seen<S: RosterStore>(
  State(state): State<ApiState<S>>,
  Path(char_id): Path<CharId>,
  Json(body): Json<LastSeenBody>,
) -> Result<StatusCode, ApiError> {
  state
    .store
    .record_last_seen(char_id, body.at)
    .await
    .map_err(roster_core::Error::store)?;
  Ok(StatusCode::NO_CONTENT)
}

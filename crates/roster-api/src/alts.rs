//! Handlers for alt-group endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/characters/:id/alts` | Optional `?min_status=unconfirmed\|confirmed\|main` |
//! | `POST`   | `/characters/:id/alts` | Body: `{"alt_id":200,"status":"unconfirmed"}` |
//! | `DELETE` | `/characters/:id/alts/:alt_id` | |
//! | `POST`   | `/characters/:id/alts/:alt_id/confirm` | |
//! | `GET`    | `/characters/:id/main` | 404 if the character is unknown |
//!
//! Rule violations are not HTTP errors: mutations always answer 200 with
//! `{"result": "<outcome>", "success": <bool>}`.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use roster_core::alt::{AltOutcome, AltStatus, CharId, GroupMember};
use serde::{Deserialize, Serialize};

use crate::{ApiState, RosterStore, error::ApiError};

/// Response body for every alt mutation.
#[derive(Debug, Serialize, Deserialize)]
pub struct OutcomeBody {
  pub result:  AltOutcome,
  pub success: bool,
}

impl From<AltOutcome> for OutcomeBody {
  fn from(outcome: AltOutcome) -> Self {
    let (result, success) = outcome.into_pair();
    Self { result, success }
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub min_status: Option<AltStatus>,
}

/// `GET /characters/:id/alts[?min_status=<status>]`
pub async fn list<S: RosterStore>(
  State(state): State<ApiState<S>>,
  Path(char_id): Path<CharId>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<GroupMember>>, ApiError> {
  let min_status = params.min_status.unwrap_or(AltStatus::Confirmed);
  Ok(Json(state.alts.list_group(char_id, min_status).await?))
}

// ─── Add ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AddBody {
  pub alt_id: CharId,
  /// Omit to let the service pick the status from the sender's own.
  #[serde(default)]
  pub status: Option<AltStatus>,
}

/// `POST /characters/:id/alts`
pub async fn add<S: RosterStore>(
  State(state): State<ApiState<S>>,
  Path(sender_id): Path<CharId>,
  Json(body): Json<AddBody>,
) -> Result<Json<OutcomeBody>, ApiError> {
  let outcome = state.alts.add_alt(sender_id, body.alt_id, body.status).await?;
  Ok(Json(outcome.into()))
}

// ─── Remove / confirm ─────────────────────────────────────────────────────────

/// `DELETE /characters/:id/alts/:alt_id`
pub async fn remove<S: RosterStore>(
  State(state): State<ApiState<S>>,
  Path((sender_id, alt_id)): Path<(CharId, CharId)>,
) -> Result<Json<OutcomeBody>, ApiError> {
  let outcome = state.alts.remove_alt(sender_id, alt_id).await?;
  Ok(Json(outcome.into()))
}

/// `POST /characters/:id/alts/:alt_id/confirm`
pub async fn confirm<S: RosterStore>(
  State(state): State<ApiState<S>>,
  Path((sender_id, alt_id)): Path<(CharId, CharId)>,
) -> Result<Json<OutcomeBody>, ApiError> {
  let outcome = state.alts.confirm_alt(sender_id, alt_id).await?;
  Ok(Json(outcome.into()))
}

// ─── Main ─────────────────────────────────────────────────────────────────────

/// `GET /characters/:id/main`
pub async fn main<S: RosterStore>(
  State(state): State<ApiState<S>>,
  Path(char_id): Path<CharId>,
) -> Result<Json<GroupMember>, ApiError> {
  let main = state
    .alts
    .get_main(char_id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("character {char_id} not found")))?;
  Ok(Json(main))
}

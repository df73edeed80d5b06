//! Handlers for public channel state and packet ingestion.
//!
//! The protocol layer decodes channel packets and forwards them to
//! `POST /packets` as JSON, e.g.
//! `{"type":"public_channel_joined","channel_id":42,"name":"OOC"}`.

use axum::{Json, extract::State, http::StatusCode};
use roster_core::channel::{Channel, OrgInfo, ServerPacket};

use crate::{ApiState, RosterStore, error::ApiError};

/// `GET /channels`
pub async fn list<S: RosterStore>(
  State(state): State<ApiState<S>>,
) -> Json<Vec<Channel>> {
  Json(state.channels.channels())
}

/// `GET /org`
pub async fn org<S: RosterStore>(State(state): State<ApiState<S>>) -> Json<OrgInfo> {
  Json(state.channels.org())
}

/// `POST /packets`
pub async fn ingest<S: RosterStore>(
  State(state): State<ApiState<S>>,
  Json(packet): Json<ServerPacket>,
) -> Result<StatusCode, ApiError> {
  state.channels.handle(&packet)?;
  Ok(StatusCode::NO_CONTENT)
}

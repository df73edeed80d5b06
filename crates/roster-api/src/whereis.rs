//! Handler for `GET /whereis?q=<text>`.

use axum::{
  Json,
  extract::{Query, State},
};
use roster_core::{location::WhereisEntry, store::LocationStore};
use serde::Deserialize;

use crate::{ApiState, RosterStore, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub q: String,
}

/// `GET /whereis?q=<text>` — entries matching every word of `q`.
pub async fn search<S: RosterStore>(
  State(state): State<ApiState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<WhereisEntry>>, ApiError> {
  if params.q.trim().is_empty() {
    return Err(ApiError::BadRequest("query parameter `q` is empty".into()));
  }

  let entries = state
    .store
    .search_whereis(&params.q)
    .await
    .map_err(roster_core::Error::store)?;
  Ok(Json(entries))
}

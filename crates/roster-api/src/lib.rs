//! JSON REST API for the roster services.
//!
//! Exposes an axum [`Router`] backed by any store implementing the
//! [`roster_core::store`] traits. Auth, TLS, and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", roster_api::api_router(state))
//! ```

pub mod alts;
pub mod channels;
pub mod characters;
pub mod error;
pub mod whereis;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use roster_core::{
  alts::AltGroupService,
  channel::PublicChannelRegistry,
  event::EventBus,
  store::{ActivityStore, AltStore, CharacterLoader, LocationStore},
};

pub use error::ApiError;

/// Everything the handlers need from a storage backend.
pub trait RosterStore:
  AltStore + CharacterLoader + ActivityStore + LocationStore + 'static
{
}

impl<T> RosterStore for T where
  T: AltStore + CharacterLoader + ActivityStore + LocationStore + 'static
{
}

/// The alt service as wired by the server: one store serves as both the alt
/// relation and the character loader.
pub type AltService<S> = AltGroupService<S, S, EventBus>;

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:    Arc<S>,
  pub alts:     Arc<AltService<S>>,
  pub channels: Arc<PublicChannelRegistry<EventBus>>,
}

impl<S: RosterStore> ApiState<S> {
  /// Build the services on top of `store`, declaring their events on `bus`.
  pub fn new(store: Arc<S>, bus: Arc<EventBus>) -> Self {
    Self {
      alts:     Arc::new(AltGroupService::new(
        store.clone(),
        store.clone(),
        bus.clone(),
      )),
      channels: Arc::new(PublicChannelRegistry::new(bus)),
      store,
    }
  }
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:    self.store.clone(),
      alts:     self.alts.clone(),
      channels: self.channels.clone(),
    }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S: RosterStore>(state: ApiState<S>) -> Router<()> {
  Router::new()
    // Alt groups
    .route(
      "/characters/{id}/alts",
      get(alts::list::<S>).post(alts::add::<S>),
    )
    .route("/characters/{id}/alts/{alt_id}", delete(alts::remove::<S>))
    .route("/characters/{id}/alts/{alt_id}/confirm", post(alts::confirm::<S>))
    .route("/characters/{id}/main", get(alts::main::<S>))
    // Characters
    .route(
      "/characters/{id}",
      get(characters::get_one::<S>).put(characters::upsert::<S>),
    )
    .route(
      "/characters/{id}/last-seen",
      get(characters::last_seen::<S>).put(characters::record_last_seen::<S>),
    )
    // Locations
    .route("/whereis", get(whereis::search::<S>))
    // Channels
    .route("/channels", get(channels::list::<S>))
    .route("/org", get(channels::org::<S>))
    .route("/packets", post(channels::ingest::<S>))
    .with_state(state)
}

#[cfg(test)]
mod tests;

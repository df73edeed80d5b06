//! Event declaration and dispatch.
//!
//! Services declare the event types they emit once at construction and then
//! fire them without waiting for any acknowledgement.

use std::{
  collections::HashSet,
  sync::{Arc, PoisonError, RwLock},
};

use serde_json::Value;

use crate::{Error, Result};

/// Fired by the alt service when a character stops or starts anchoring a
/// group. Payload: [`crate::alt::MainChanged`].
pub const MAIN_CHANGED: &str = "main_changed";

/// Fired for every message seen on the org channel. Payload: the
/// [`crate::channel::ServerPacket`] that carried it.
pub const ORG_MESSAGE: &str = "org_message";

/// Destination for fire-and-forget events.
pub trait EventSink: Send + Sync {
  /// Declare an event type. Idempotent.
  fn register_event_type(&self, event_type: &str);

  /// Deliver an event. Fails only if `event_type` was never registered.
  fn fire_event(&self, event_type: &str, payload: Value) -> Result<()>;
}

type Handler = Arc<dyn Fn(&str, &Value) + Send + Sync>;

/// In-process [`EventSink`] that calls every subscriber synchronously.
#[derive(Default)]
pub struct EventBus {
  types:    RwLock<HashSet<String>>,
  handlers: RwLock<Vec<Handler>>,
}

impl EventBus {
  pub fn new() -> Self { Self::default() }

  /// Add a handler that receives every event fired from now on.
  pub fn subscribe<F>(&self, handler: F)
  where
    F: Fn(&str, &Value) + Send + Sync + 'static,
  {
    self
      .handlers
      .write()
      .unwrap_or_else(PoisonError::into_inner)
      .push(Arc::new(handler));
  }

  pub fn is_registered(&self, event_type: &str) -> bool {
    self
      .types
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .contains(event_type)
  }
}

impl EventSink for EventBus {
  fn register_event_type(&self, event_type: &str) {
    self
      .types
      .write()
      .unwrap_or_else(PoisonError::into_inner)
      .insert(event_type.to_owned());
  }

  fn fire_event(&self, event_type: &str, payload: Value) -> Result<()> {
    if !self.is_registered(event_type) {
      return Err(Error::UnknownEventType(event_type.to_owned()));
    }

    // Clone the handler list so handlers may subscribe without deadlocking.
    let handlers: Vec<Handler> = self
      .handlers
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .clone();

    tracing::trace!(event_type, handlers = handlers.len(), "firing event");
    for handler in handlers {
      handler(event_type, &payload);
    }
    Ok(())
  }
}

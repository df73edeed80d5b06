//! Public channel bookkeeping.
//!
//! The chat server announces every public channel the bot joins or leaves.
//! [`PublicChannelRegistry`] mirrors those announcements as an id <-> name
//! map, remembers which channel belongs to the bot's org, and re-announces
//! org channel messages as [`ORG_MESSAGE`] events.

use std::{
  collections::HashMap,
  sync::{Arc, PoisonError, RwLock},
};

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  alt::CharId,
  event::{EventSink, ORG_MESSAGE},
};

/// Name the server reports for an org channel before the org has a name.
pub const UNKNOWN_ORG_NAME: &str = "Clan (name unknown)";

/// Channel type stored in the upper 32 bits of an org channel id.
const ORG_CHANNEL_TYPE: u64 = 3;

// ─── Packets ─────────────────────────────────────────────────────────────────

/// Decoded public channel packets delivered by the protocol layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerPacket {
  PublicChannelJoined { channel_id: u64, name: String },
  PublicChannelLeft { channel_id: u64 },
  PublicChannelMessage {
    channel_id: u64,
    sender_id:  CharId,
    message:    String,
  },
}

/// A joined public channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
  pub channel_id: u64,
  pub name:       String,
}

/// What is known about the bot's org from its channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgInfo {
  pub org_id:         Option<u32>,
  pub org_name:       Option<String>,
  pub org_channel_id: Option<u64>,
}

/// True if `channel_id` is an org channel.
pub fn is_org_channel_id(channel_id: u64) -> bool {
  channel_id >> 32 == ORG_CHANNEL_TYPE
}

// ─── Registry ────────────────────────────────────────────────────────────────

#[derive(Default)]
struct State {
  id_to_name: HashMap<u64, String>,
  name_to_id: HashMap<String, u64>,
  org:        OrgInfo,
}

pub struct PublicChannelRegistry<E> {
  state:  RwLock<State>,
  events: Arc<E>,
}

impl<E: EventSink> PublicChannelRegistry<E> {
  /// Create an empty registry and declare [`ORG_MESSAGE`] on `events`.
  pub fn new(events: Arc<E>) -> Self {
    events.register_event_type(ORG_MESSAGE);
    Self { state: RwLock::new(State::default()), events }
  }

  /// Route an inbound packet to its handler.
  pub fn handle(&self, packet: &ServerPacket) -> Result<()> {
    match packet {
      ServerPacket::PublicChannelJoined { channel_id, name } => {
        self.add(*channel_id, name);
        Ok(())
      }
      ServerPacket::PublicChannelLeft { channel_id } => self.remove(*channel_id),
      ServerPacket::PublicChannelMessage { channel_id, .. } => {
        if is_org_channel_id(*channel_id) {
          self
            .events
            .fire_event(ORG_MESSAGE, serde_json::to_value(packet)?)?;
        }
        Ok(())
      }
    }
  }

  /// Record a joined channel.
  pub fn add(&self, channel_id: u64, name: &str) {
    let mut state = self.write();
    state.id_to_name.insert(channel_id, name.to_owned());
    state.name_to_id.insert(name.to_owned(), channel_id);

    if is_org_channel_id(channel_id) {
      let org_id = (channel_id & 0xffff_ffff) as u32;
      state.org.org_channel_id = Some(channel_id);
      state.org.org_id = Some(org_id);

      tracing::debug!(org_id, org_name = name, "joined org channel");

      if name != UNKNOWN_ORG_NAME {
        state.org.org_name = Some(name.to_owned());
      }
    }
  }

  /// Forget a channel the bot has left.
  pub fn remove(&self, channel_id: u64) -> Result<()> {
    let mut state = self.write();
    let name = state
      .id_to_name
      .remove(&channel_id)
      .ok_or(Error::ChannelNotFound(channel_id))?;
    state.name_to_id.remove(&name);
    Ok(())
  }

  pub fn channel_id(&self, name: &str) -> Option<u64> {
    self.read().name_to_id.get(name).copied()
  }

  pub fn channel_name(&self, channel_id: u64) -> Option<String> {
    self.read().id_to_name.get(&channel_id).cloned()
  }

  /// Every joined channel, ordered by id.
  pub fn channels(&self) -> Vec<Channel> {
    let mut channels: Vec<Channel> = self
      .read()
      .id_to_name
      .iter()
      .map(|(id, name)| Channel { channel_id: *id, name: name.clone() })
      .collect();
    channels.sort_by_key(|c| c.channel_id);
    channels
  }

  pub fn org(&self) -> OrgInfo { self.read().org.clone() }

  pub fn org_id(&self) -> Option<u32> { self.read().org.org_id }

  pub fn org_name(&self) -> Option<String> { self.read().org.org_name.clone() }

  pub fn org_channel_id(&self) -> Option<u64> {
    self.read().org.org_channel_id
  }

  fn read(&self) -> std::sync::RwLockReadGuard<'_, State> {
    self.state.read().unwrap_or_else(PoisonError::into_inner)
  }

  fn write(&self) -> std::sync::RwLockWriteGuard<'_, State> {
    self.state.write().unwrap_or_else(PoisonError::into_inner)
  }
}

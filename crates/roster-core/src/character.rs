//! Character info as cached in the `player` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alt::CharId;

/// Basic character info used to order and display group listings.
///
/// Rows created by [`crate::store::CharacterLoader::ensure_loaded`] carry an
/// empty name and level 0 until real info is supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
  pub char_id:    CharId,
  pub name:       String,
  pub level:      u32,
  pub profession: Option<String>,
}

impl Character {
  /// A placeholder for a character whose info has not been fetched yet.
  pub fn placeholder(char_id: CharId) -> Self {
    Self { char_id, name: String::new(), level: 0, profession: None }
  }
}

/// When a member of a character's group was last seen in the org.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastSeen {
  pub character: Character,
  pub last_seen: DateTime<Utc>,
}

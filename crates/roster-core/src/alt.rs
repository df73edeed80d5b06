//! Alt-group types: records, statuses and operation outcomes.
//!
//! Every character that has been linked to another is stored as one
//! [`AltRecord`]. Records sharing a `group_id` belong to one real-world
//! player. A character with no record is an unlinked main with no alts.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{Error, Result, character::Character};

/// Identifier of a game character.
pub type CharId = u32;

/// Identifier shared by all characters of one player.
pub type GroupId = i64;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Link status of a character inside its group.
///
/// Ordered: `Unconfirmed < Confirmed < Main`. Stored as its integer code.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AltStatus {
  /// Proposed by another group member but not yet accepted.
  Unconfirmed,
  Confirmed,
  /// The character the group is anchored to.
  Main,
}

impl AltStatus {
  /// The integer code persisted in the `status` column.
  pub fn code(self) -> i64 {
    match self {
      Self::Unconfirmed => 0,
      Self::Confirmed => 1,
      Self::Main => 2,
    }
  }

  pub fn from_code(code: i64) -> Result<Self> {
    match code {
      0 => Ok(Self::Unconfirmed),
      1 => Ok(Self::Confirmed),
      2 => Ok(Self::Main),
      other => Err(Error::UnknownAltStatus(other)),
    }
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// One row of the `alts` relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AltRecord {
  pub char_id:  CharId,
  pub group_id: GroupId,
  pub status:   AltStatus,
}

/// A character as listed in a group, with its link if it has one.
///
/// `group_id` and `status` are both `None` for an unlinked character listing
/// itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
  pub character: Character,
  pub group_id:  Option<GroupId>,
  pub status:    Option<AltStatus>,
}

impl GroupMember {
  pub fn char_id(&self) -> CharId { self.character.char_id }

  pub fn is_main(&self) -> bool { self.status == Some(AltStatus::Main) }
}

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Result of an alt-group mutation. Rule violations are reported here rather
/// than as errors.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AltOutcome {
  Success,
  /// The two characters are not in the same group.
  NotAlt,
  /// The alt already anchors a group of its own.
  AnotherMain,
  /// The sender is not confirmed in its group.
  UnconfirmedSender,
  /// Mains cannot be removed from their group.
  RemoveMain,
  AlreadyConfirmed,
}

impl AltOutcome {
  pub fn is_success(self) -> bool { matches!(self, Self::Success) }

  /// The `(code, success)` pair reported to callers.
  pub fn into_pair(self) -> (Self, bool) { (self, self.is_success()) }
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// Payload of the `main_changed` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainChanged {
  pub old_main_id: CharId,
  pub new_main_id: CharId,
}

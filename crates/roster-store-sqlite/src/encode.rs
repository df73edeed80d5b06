//! Decoding helpers between SQLite rows and roster domain types.
//!
//! Statuses are stored as their integer codes and timestamps as Unix seconds.

use chrono::{DateTime, Utc};
use roster_core::{
  alt::{AltRecord, AltStatus, CharId, GroupId, GroupMember},
  character::{Character, LastSeen},
};

use crate::{Error, Result};

// ─── Timestamps ──────────────────────────────────────────────────────────────

pub fn encode_ts(at: DateTime<Utc>) -> i64 { at.timestamp() }

pub fn decode_ts(secs: i64) -> Result<DateTime<Utc>> {
  DateTime::from_timestamp(secs, 0).ok_or(Error::Timestamp(secs))
}

// ─── LIKE patterns ───────────────────────────────────────────────────────────

/// `%word%` with LIKE wildcards in `word` escaped by `\`.
pub fn contains_pattern(word: &str) -> String {
  let mut pattern = String::with_capacity(word.len() + 2);
  pattern.push('%');
  for c in word.chars() {
    if matches!(c, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Columns of a `player` row, in select order.
pub struct RawCharacter {
  pub char_id:    CharId,
  pub name:       String,
  pub level:      u32,
  pub profession: Option<String>,
}

impl RawCharacter {
  /// Read the first four columns of `row`.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      char_id:    row.get(0)?,
      name:       row.get(1)?,
      level:      row.get(2)?,
      profession: row.get(3)?,
    })
  }

  pub fn into_character(self) -> Character {
    Character {
      char_id:    self.char_id,
      name:       self.name,
      level:      self.level,
      profession: self.profession,
    }
  }
}

/// A `player` row left-joined with `alts`.
pub struct RawMember {
  pub character: RawCharacter,
  pub group_id:  Option<GroupId>,
  pub status:    Option<i64>,
}

impl RawMember {
  pub fn into_member(self) -> Result<GroupMember> {
    Ok(GroupMember {
      character: self.character.into_character(),
      group_id:  self.group_id,
      status:    self.status.map(AltStatus::from_code).transpose()?,
    })
  }
}

/// A raw `alts` row.
pub struct RawRecord {
  pub char_id:  CharId,
  pub group_id: GroupId,
  pub status:   i64,
}

impl RawRecord {
  pub fn into_record(self) -> Result<AltRecord> {
    Ok(AltRecord {
      char_id:  self.char_id,
      group_id: self.group_id,
      status:   AltStatus::from_code(self.status)?,
    })
  }
}

/// A `player` row joined with its `org_member` last-seen time.
pub struct RawLastSeen {
  pub character: RawCharacter,
  pub last_seen: i64,
}

impl RawLastSeen {
  pub fn into_last_seen(self) -> Result<LastSeen> {
    Ok(LastSeen {
      character: self.character.into_character(),
      last_seen: decode_ts(self.last_seen)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn like_wildcards_are_escaped() {
    assert_eq!(contains_pattern("tower"), "%tower%");
    assert_eq!(contains_pattern("100%_"), "%100\\%\\_%");
  }

  #[test]
  fn timestamps_use_unix_seconds() {
    let at = decode_ts(1_700_000_000).unwrap();
    assert_eq!(encode_ts(at), 1_700_000_000);
  }
}

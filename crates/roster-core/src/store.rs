//! Store traits consumed by the services.
//!
//! The traits are implemented by storage backends (e.g.
//! `roster-store-sqlite`). Services and the HTTP layer depend on these
//! abstractions, not on any concrete backend.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  alt::{AltRecord, AltStatus, CharId, GroupId, GroupMember},
  character::{Character, LastSeen},
  location::{NewWhereis, Playfield, WhereisEntry},
};

// ─── Alts ────────────────────────────────────────────────────────────────────

/// The persisted `(char_id, group_id, status)` relation.
pub trait AltStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The record for `char_id`, or `None` if the character is unlinked.
  fn get_record(
    &self,
    char_id: CharId,
  ) -> impl Future<Output = Result<Option<AltRecord>, Self::Error>> + Send + '_;

  /// The character itself plus every member of its group.
  ///
  /// The group is only resolved when the character's own status is at least
  /// `min_status`. Ordered by status descending, then level descending, then
  /// char id ascending.
  fn list_group(
    &self,
    char_id: CharId,
    min_status: AltStatus,
  ) -> impl Future<Output = Result<Vec<GroupMember>, Self::Error>> + Send + '_;

  /// Number of records in `char_id`'s group, whatever their status. Zero if
  /// the character has no record.
  fn group_size(
    &self,
    char_id: CharId,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Allocate a group id that has never been handed out before.
  fn next_group_id(
    &self,
  ) -> impl Future<Output = Result<GroupId, Self::Error>> + Send + '_;

  fn insert_record(
    &self,
    record: AltRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete `char_id`'s record; a no-op if there is none.
  fn delete_record(
    &self,
    char_id: CharId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn set_status(
    &self,
    char_id: CharId,
    status: AltStatus,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Characters ──────────────────────────────────────────────────────────────

/// Keeps the character table populated so group listings can join against it.
pub trait CharacterLoader: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Make sure a row exists for `char_id`. Idempotent; existing info is left
  /// untouched.
  fn ensure_loaded(
    &self,
    char_id: CharId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Insert or replace the info for a character.
  fn upsert_character(
    &self,
    character: Character,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_character(
    &self,
    char_id: CharId,
  ) -> impl Future<Output = Result<Option<Character>, Self::Error>> + Send + '_;
}

// ─── Org activity ────────────────────────────────────────────────────────────

/// Org-membership activity, tracked per character.
pub trait ActivityStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn record_last_seen(
    &self,
    char_id: CharId,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Last-seen times for `char_id` and every member of its group. Members
  /// never seen are skipped. Most recent first, then by name.
  fn last_seen(
    &self,
    char_id: CharId,
  ) -> impl Future<Output = Result<Vec<LastSeen>, Self::Error>> + Send + '_;
}

// ─── Locations ───────────────────────────────────────────────────────────────

/// The whereis location table.
pub trait LocationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn add_playfield(
    &self,
    playfield: Playfield,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Insert an entry, replacing any entry with the same playfield and name.
  fn add_whereis(
    &self,
    entry: NewWhereis,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Entries whose name, or whose keywords, contain every word of `text`.
  /// Blank text matches nothing.
  fn search_whereis<'a>(
    &'a self,
    text: &'a str,
  ) -> impl Future<Output = Result<Vec<WhereisEntry>, Self::Error>> + Send + 'a;
}

//! [`SqliteStore`] — the SQLite implementation of the roster store traits.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;

use roster_core::{
  alt::{AltRecord, AltStatus, CharId, GroupId, GroupMember},
  character::{Character, LastSeen},
  location::{NewWhereis, Playfield, WhereisEntry, search_words},
  store::{ActivityStore, AltStore, CharacterLoader, LocationStore},
};

use crate::{
  Result,
  encode::{
    RawCharacter, RawLastSeen, RawMember, RawRecord, contains_pattern, encode_ts,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A roster store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Every record in the `alts` table, ordered by char id.
  #[cfg(test)]
  pub(crate) async fn all_records(&self) -> Result<Vec<AltRecord>> {
    let raws: Vec<RawRecord> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT char_id, group_id, status FROM alts ORDER BY char_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawRecord {
              char_id:  row.get(0)?,
              group_id: row.get(1)?,
              status:   row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }
}

// ─── AltStore impl ───────────────────────────────────────────────────────────

impl AltStore for SqliteStore {
  type Error = crate::Error;

  async fn get_record(&self, char_id: CharId) -> Result<Option<AltRecord>> {
    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT char_id, group_id, status FROM alts WHERE char_id = ?1",
              rusqlite::params![char_id],
              |row| {
                Ok(RawRecord {
                  char_id:  row.get(0)?,
                  group_id: row.get(1)?,
                  status:   row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn list_group(
    &self,
    char_id:    CharId,
    min_status: AltStatus,
  ) -> Result<Vec<GroupMember>> {
    let min_code = min_status.code();

    let raws: Vec<RawMember> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT p.char_id, p.name, p.level, p.profession, a.group_id, a.status
           FROM player p
           LEFT JOIN alts a ON a.char_id = p.char_id
           WHERE p.char_id = ?1
              OR a.group_id = (
                   SELECT group_id FROM alts WHERE char_id = ?1 AND status >= ?2
                 )
           ORDER BY a.status DESC, p.level DESC, p.char_id ASC",
        )?;

        let rows = stmt
          .query_map(rusqlite::params![char_id, min_code], |row| {
            Ok(RawMember {
              character: RawCharacter::from_row(row)?,
              group_id:  row.get(4)?,
              status:    row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMember::into_member).collect()
  }

  async fn group_size(&self, char_id: CharId) -> Result<usize> {
    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM alts
           WHERE group_id = (SELECT group_id FROM alts WHERE char_id = ?1)",
          rusqlite::params![char_id],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count as usize)
  }

  async fn next_group_id(&self) -> Result<GroupId> {
    let next = self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        let next: GroupId = tx.query_row(
          "SELECT MAX(
             COALESCE((SELECT last_group_id FROM group_id_seq WHERE id = 1), 0),
             COALESCE((SELECT MAX(group_id) FROM alts), 0)
           ) + 1",
          [],
          |row| row.get(0),
        )?;
        tx.execute(
          "INSERT INTO group_id_seq (id, last_group_id) VALUES (1, ?1)
           ON CONFLICT (id) DO UPDATE SET last_group_id = excluded.last_group_id",
          rusqlite::params![next],
        )?;
        tx.commit()?;
        Ok(next)
      })
      .await?;

    tracing::debug!(group_id = next, "allocated group id");
    Ok(next)
  }

  async fn insert_record(&self, record: AltRecord) -> Result<()> {
    let status = record.status.code();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO alts (char_id, group_id, status) VALUES (?1, ?2, ?3)",
          rusqlite::params![record.char_id, record.group_id, status],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_record(&self, char_id: CharId) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM alts WHERE char_id = ?1",
          rusqlite::params![char_id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn set_status(&self, char_id: CharId, status: AltStatus) -> Result<()> {
    let code = status.code();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE alts SET status = ?1 WHERE char_id = ?2",
          rusqlite::params![code, char_id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CharacterLoader impl ────────────────────────────────────────────────────

impl CharacterLoader for SqliteStore {
  type Error = crate::Error;

  /// Unknown characters get a [`Character::placeholder`] row until their
  /// info is upserted.
  async fn ensure_loaded(&self, char_id: CharId) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        insert_placeholder(conn, char_id)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn upsert_character(&self, character: Character) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO player (char_id, name, level, profession)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (char_id) DO UPDATE SET
             name       = excluded.name,
             level      = excluded.level,
             profession = excluded.profession",
          rusqlite::params![
            character.char_id,
            character.name,
            character.level,
            character.profession,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_character(&self, char_id: CharId) -> Result<Option<Character>> {
    let raw: Option<RawCharacter> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT char_id, name, level, profession FROM player WHERE char_id = ?1",
              rusqlite::params![char_id],
              RawCharacter::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawCharacter::into_character))
  }
}

fn insert_placeholder(
  conn: &rusqlite::Connection,
  char_id: CharId,
) -> rusqlite::Result<()> {
  let placeholder = Character::placeholder(char_id);
  conn.execute(
    "INSERT OR IGNORE INTO player (char_id, name, level, profession)
     VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![
      placeholder.char_id,
      placeholder.name,
      placeholder.level,
      placeholder.profession,
    ],
  )?;
  Ok(())
}

// ─── ActivityStore impl ──────────────────────────────────────────────────────

impl ActivityStore for SqliteStore {
  type Error = crate::Error;

  async fn record_last_seen(&self, char_id: CharId, at: DateTime<Utc>) -> Result<()> {
    let secs = encode_ts(at);

    self
      .conn
      .call(move |conn| {
        // Org members always get a player row so they show up in joins.
        insert_placeholder(conn, char_id)?;
        conn.execute(
          "INSERT INTO org_member (char_id, last_seen) VALUES (?1, ?2)
           ON CONFLICT (char_id) DO UPDATE SET last_seen = excluded.last_seen",
          rusqlite::params![char_id, secs],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn last_seen(&self, char_id: CharId) -> Result<Vec<LastSeen>> {
    let raws: Vec<RawLastSeen> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT p.char_id, p.name, p.level, p.profession, o.last_seen
           FROM player p
           LEFT JOIN alts a ON a.char_id = p.char_id
           JOIN org_member o ON o.char_id = p.char_id
           WHERE o.last_seen != 0
             AND (
               p.char_id = ?1
               OR a.group_id = (SELECT group_id FROM alts WHERE char_id = ?1)
             )
           ORDER BY o.last_seen DESC, p.name ASC, p.level DESC",
        )?;

        let rows = stmt
          .query_map(rusqlite::params![char_id], |row| {
            Ok(RawLastSeen {
              character: RawCharacter::from_row(row)?,
              last_seen: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLastSeen::into_last_seen).collect()
  }
}

// ─── LocationStore impl ──────────────────────────────────────────────────────

impl LocationStore for SqliteStore {
  type Error = crate::Error;

  async fn add_playfield(&self, playfield: Playfield) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO playfields (id, long_name, short_name)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![playfield.id, playfield.long_name, playfield.short_name],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn add_whereis(&self, entry: NewWhereis) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO whereis (playfield_id, name, answer, keywords, xcoord, ycoord)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT (playfield_id, name) DO UPDATE SET
             answer   = excluded.answer,
             keywords = excluded.keywords,
             xcoord   = excluded.xcoord,
             ycoord   = excluded.ycoord",
          rusqlite::params![
            entry.playfield_id,
            entry.name,
            entry.answer,
            entry.keywords,
            entry.xcoord,
            entry.ycoord,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn search_whereis(&self, text: &str) -> Result<Vec<WhereisEntry>> {
    let patterns: Vec<String> =
      search_words(text).into_iter().map(contains_pattern).collect();
    if patterns.is_empty() {
      return Ok(Vec::new());
    }

    let all_words = |column: &str| {
      (1..=patterns.len())
        .map(|i| format!("{column} LIKE ?{i} ESCAPE '\\'"))
        .collect::<Vec<_>>()
        .join(" AND ")
    };
    let sql = format!(
      "SELECT w.playfield_id, w.name, w.answer, w.xcoord, w.ycoord, p.short_name
       FROM whereis w
       LEFT JOIN playfields p ON p.id = w.playfield_id
       WHERE ({}) OR ({})
       ORDER BY w.name ASC, w.id ASC",
      all_words("w.name"),
      all_words("w.keywords"),
    );

    let entries = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(patterns.iter()), |row| {
            Ok(WhereisEntry {
              playfield_id:         row.get(0)?,
              name:                 row.get(1)?,
              answer:               row.get(2)?,
              xcoord:               row.get(3)?,
              ycoord:               row.get(4)?,
              playfield_short_name: row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    Ok(entries)
  }
}

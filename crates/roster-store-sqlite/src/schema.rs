//! SQL schema for the roster SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Cached character info; rows may be placeholders with an empty name.
CREATE TABLE IF NOT EXISTS player (
    char_id     INTEGER PRIMARY KEY,
    name        TEXT    NOT NULL DEFAULT '',
    level       INTEGER NOT NULL DEFAULT 0,
    profession  TEXT
);

-- One row per linked character. status: 0 unconfirmed, 1 confirmed, 2 main.
CREATE TABLE IF NOT EXISTS alts (
    char_id   INTEGER PRIMARY KEY,
    group_id  INTEGER NOT NULL,
    status    INTEGER NOT NULL CHECK (status IN (0, 1, 2))
);

-- High-water mark for group ids, so ids of emptied groups are never reused.
CREATE TABLE IF NOT EXISTS group_id_seq (
    id             INTEGER PRIMARY KEY CHECK (id = 1),
    last_group_id  INTEGER NOT NULL
);

-- last_seen is a Unix timestamp; 0 means never seen.
CREATE TABLE IF NOT EXISTS org_member (
    char_id    INTEGER PRIMARY KEY,
    last_seen  INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS playfields (
    id          INTEGER PRIMARY KEY,
    long_name   TEXT NOT NULL,
    short_name  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS whereis (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    playfield_id  INTEGER NOT NULL,
    name          TEXT    NOT NULL,
    answer        TEXT    NOT NULL,
    keywords      TEXT    NOT NULL DEFAULT '',
    xcoord        INTEGER NOT NULL DEFAULT 0,
    ycoord        INTEGER NOT NULL DEFAULT 0,
    UNIQUE (playfield_id, name)
);

CREATE INDEX IF NOT EXISTS alts_group_idx ON alts(group_id);

PRAGMA user_version = 1;
";

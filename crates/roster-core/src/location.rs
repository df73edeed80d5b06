//! Known in-game locations for the whereis lookup.

use serde::{Deserialize, Serialize};

/// A playfield (zone) that locations belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playfield {
  pub id:         i64,
  pub long_name:  String,
  pub short_name: String,
}

/// Input to [`crate::store::LocationStore::add_whereis`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWhereis {
  pub playfield_id: i64,
  pub name:         String,
  pub answer:       String,
  /// Extra search terms, matched like `name`.
  #[serde(default)]
  pub keywords:     String,
  #[serde(default)]
  pub xcoord:       i64,
  #[serde(default)]
  pub ycoord:       i64,
}

/// One whereis search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhereisEntry {
  pub playfield_id:         i64,
  pub name:                 String,
  pub answer:               String,
  pub xcoord:               i64,
  pub ycoord:               i64,
  /// `None` when the entry points at a playfield that is not in the table.
  pub playfield_short_name: Option<String>,
}

/// Split a search string into the words that must all match.
pub fn search_words(text: &str) -> Vec<&str> {
  text.split_whitespace().collect()
}

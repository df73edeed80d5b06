//! Loading the whereis tables from a JSON seed file.

use std::path::Path;

use anyhow::Context as _;
use roster_core::{
  location::{NewWhereis, Playfield},
  store::LocationStore,
};
use serde::Deserialize;

/// Shape of the seed file.
#[derive(Debug, Default, Deserialize)]
pub struct WhereisSeed {
  #[serde(default)]
  pub playfields: Vec<Playfield>,
  #[serde(default)]
  pub whereis:    Vec<NewWhereis>,
}

impl WhereisSeed {
  pub fn read(path: &Path) -> anyhow::Result<Self> {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading whereis seed {}", path.display()))?;
    serde_json::from_str(&raw).context("parsing whereis seed")
  }

  /// Write every playfield and entry; re-applying the same seed is a no-op.
  pub async fn apply<S: LocationStore>(self, store: &S) -> anyhow::Result<()> {
    let (playfields, entries) = (self.playfields.len(), self.whereis.len());

    for playfield in self.playfields {
      store.add_playfield(playfield).await?;
    }
    for entry in self.whereis {
      store.add_whereis(entry).await?;
    }

    tracing::info!(playfields, entries, "loaded whereis seed");
    Ok(())
  }
}

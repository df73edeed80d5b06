//! [`AltGroupService`]: the rules for linking characters into alt groups.
//!
//! The service keeps no state of its own. Each operation is a short sequence
//! of reads and writes against an [`AltStore`]; no transaction spans the
//! sequence, so an event fired before a failing write is not undone.

use std::sync::Arc;

use crate::{
  Error, Result,
  alt::{AltOutcome, AltRecord, AltStatus, CharId, GroupId, GroupMember, MainChanged},
  event::{EventSink, MAIN_CHANGED},
  store::{AltStore, CharacterLoader},
};

pub struct AltGroupService<S, L, E> {
  store:  Arc<S>,
  loader: Arc<L>,
  events: Arc<E>,
}

impl<S, L, E> AltGroupService<S, L, E>
where
  S: AltStore,
  L: CharacterLoader,
  E: EventSink,
{
  /// Build the service and declare [`MAIN_CHANGED`] on `events`.
  pub fn new(store: Arc<S>, loader: Arc<L>, events: Arc<E>) -> Self {
    events.register_event_type(MAIN_CHANGED);
    Self { store, loader, events }
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// `char_id` and, if its own status is at least `min_status`, the rest of
  /// its group. Highest status first.
  pub async fn list_group(
    &self,
    char_id: CharId,
    min_status: AltStatus,
  ) -> Result<Vec<GroupMember>> {
    self
      .store
      .list_group(char_id, min_status)
      .await
      .map_err(Error::store)
  }

  /// The member that sorts first in `char_id`'s confirmed group listing.
  ///
  /// That is the MAIN whenever the group has one. A group that lost its MAIN
  /// yields its highest-status member instead.
  pub async fn get_main(&self, char_id: CharId) -> Result<Option<GroupMember>> {
    let main = self
      .list_group(char_id, AltStatus::Confirmed)
      .await?
      .into_iter()
      .next();

    if let Some(member) = &main
      && member.group_id.is_some()
      && !member.is_main()
    {
      tracing::warn!(
        char_id,
        group_id = member.group_id,
        fallback = member.char_id(),
        "group has no main, using highest-status member"
      );
    }
    Ok(main)
  }

  pub async fn get_alt_status(&self, char_id: CharId) -> Result<Option<AltRecord>> {
    self.store.get_record(char_id).await.map_err(Error::store)
  }

  pub async fn next_group_id(&self) -> Result<GroupId> {
    self.store.next_group_id().await.map_err(Error::store)
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  /// Link `alt_id` into `sender_id`'s group, creating the group with the
  /// sender as main if the sender is unlinked.
  ///
  /// Without an explicit `status` the alt is confirmed when the sender is,
  /// and always confirmed in a freshly created group.
  pub async fn add_alt(
    &self,
    sender_id: CharId,
    alt_id: CharId,
    status: Option<AltStatus>,
  ) -> Result<AltOutcome> {
    let alt_group_size = self.store.group_size(alt_id).await.map_err(Error::store)?;
    if alt_group_size > 1 {
      return Ok(AltOutcome::AnotherMain);
    }

    let sender = self.get_alt_status(sender_id).await?;
    let (group_id, status) = match sender {
      Some(sender) => {
        // A lone record is released so the alt can move to this group.
        if alt_group_size == 1 {
          let new_main_id = self
            .get_main(sender_id)
            .await?
            .map_or(sender_id, |m| m.char_id());
          self.main_changed(alt_id, new_main_id)?;
          self.store.delete_record(alt_id).await.map_err(Error::store)?;
        }

        let status = status.unwrap_or(if sender.status >= AltStatus::Confirmed {
          AltStatus::Confirmed
        } else {
          AltStatus::Unconfirmed
        });
        (sender.group_id, status)
      }
      None => {
        if alt_group_size == 1 {
          self.store.delete_record(alt_id).await.map_err(Error::store)?;
        }

        let group_id = self.next_group_id().await?;
        self
          .store
          .insert_record(AltRecord {
            char_id: sender_id,
            group_id,
            status: AltStatus::Main,
          })
          .await
          .map_err(Error::store)?;

        self.main_changed(alt_id, sender_id)?;
        self.loader.ensure_loaded(sender_id).await.map_err(Error::store)?;

        (group_id, status.unwrap_or(AltStatus::Confirmed))
      }
    };

    self.loader.ensure_loaded(alt_id).await.map_err(Error::store)?;
    self
      .store
      .insert_record(AltRecord { char_id: alt_id, group_id, status })
      .await
      .map_err(Error::store)?;

    tracing::debug!(sender_id, alt_id, group_id, %status, "alt added");
    Ok(AltOutcome::Success)
  }

  /// Unlink `alt_id` from the group it shares with `sender_id`.
  pub async fn remove_alt(
    &self,
    sender_id: CharId,
    alt_id: CharId,
  ) -> Result<AltOutcome> {
    let (sender, alt) = match self.shared_group(sender_id, alt_id).await? {
      Some(pair) => pair,
      None => return Ok(AltOutcome::NotAlt),
    };

    if sender.status == AltStatus::Unconfirmed {
      return Ok(AltOutcome::UnconfirmedSender);
    }
    if alt.status == AltStatus::Main {
      return Ok(AltOutcome::RemoveMain);
    }

    self.store.delete_record(alt_id).await.map_err(Error::store)?;
    tracing::debug!(sender_id, alt_id, group_id = alt.group_id, "alt removed");
    Ok(AltOutcome::Success)
  }

  /// Accept an unconfirmed alt on behalf of a confirmed group member.
  pub async fn confirm_alt(
    &self,
    sender_id: CharId,
    alt_id: CharId,
  ) -> Result<AltOutcome> {
    let (sender, alt) = match self.shared_group(sender_id, alt_id).await? {
      Some(pair) => pair,
      None => return Ok(AltOutcome::NotAlt),
    };

    if sender.status < AltStatus::Confirmed {
      return Ok(AltOutcome::UnconfirmedSender);
    }
    if alt.status >= AltStatus::Confirmed {
      return Ok(AltOutcome::AlreadyConfirmed);
    }

    self
      .store
      .set_status(alt_id, AltStatus::Confirmed)
      .await
      .map_err(Error::store)?;
    Ok(AltOutcome::Success)
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  /// Both records, if both exist and share a group.
  async fn shared_group(
    &self,
    sender_id: CharId,
    alt_id: CharId,
  ) -> Result<Option<(AltRecord, AltRecord)>> {
    let alt = self.get_alt_status(alt_id).await?;
    let sender = self.get_alt_status(sender_id).await?;

    Ok(match (sender, alt) {
      (Some(sender), Some(alt)) if sender.group_id == alt.group_id => {
        Some((sender, alt))
      }
      _ => None,
    })
  }

  fn main_changed(&self, old_main_id: CharId, new_main_id: CharId) -> Result<()> {
    tracing::debug!(old_main_id, new_main_id, "main changed");
    let payload = serde_json::to_value(MainChanged { old_main_id, new_main_id })?;
    self.events.fire_event(MAIN_CHANGED, payload)
  }
}

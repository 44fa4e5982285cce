//! Playlist mutation engine.
//!
//! The catalog edits playlists through anchor-based actions only:
//!
//! - `Add(video)` appends at the tail and mints a fresh set id
//! - `Remove(video, set_id)` drops one slot
//! - `Move(set_id, before_set_id)` places a slot right before another
//!
//! There is no "move to end" action. This module translates index-based
//! edits against a caller-supplied snapshot of the track list into those
//! actions ([planners](plan_removals)), then sends them through
//! [`Session::with_auth`] ([`PlaylistEditor`]).
//!
//! Batches are not rolled back: if the second batch of an insert fails, the
//! added tracks stay at the tail.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::auth::Session;
use crate::client::CatalogClient;
use crate::error::{Error, Result};
use crate::model::Track;
use crate::raw::EditOutcome;

/// One remote playlist edit action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action")]
pub enum EditAction {
    /// Append a video at the tail.
    #[serde(rename = "ACTION_ADD_VIDEO")]
    Add {
        /// Video to add.
        #[serde(rename = "addedVideoId")]
        video_id: String,
    },
    /// Remove one slot.
    #[serde(rename = "ACTION_REMOVE_VIDEO")]
    Remove {
        /// Video in the slot.
        #[serde(rename = "removedVideoId")]
        video_id: String,
        /// The slot.
        #[serde(rename = "setVideoId")]
        set_id: String,
    },
    /// Move a slot right before another.
    #[serde(rename = "ACTION_MOVE_VIDEO_BEFORE")]
    Move {
        /// The slot to move.
        #[serde(rename = "setVideoId")]
        set_id: String,
        /// The anchor slot.
        #[serde(rename = "movedSetVideoIdSuccessor")]
        before_set_id: String,
    },
    /// Rename the playlist.
    #[serde(rename = "ACTION_SET_PLAYLIST_NAME")]
    SetTitle {
        /// New title.
        #[serde(rename = "playlistName")]
        title: String,
    },
    /// Replace the playlist description.
    #[serde(rename = "ACTION_SET_PLAYLIST_DESCRIPTION")]
    SetDescription {
        /// New description.
        #[serde(rename = "playlistDescription")]
        description: String,
    },
}

fn slot_at(tracks: &[Track], index: usize) -> Result<(&Track, &str)> {
    let track = tracks.get(index).ok_or_else(|| {
        Error::invalid_input(format!(
            "Index {index} out of range for {} tracks",
            tracks.len()
        ))
    })?;
    let set_id = track
        .set_id()
        .ok_or_else(|| Error::invalid_input(format!("Track {} has no setId", track.id)))?;
    Ok((track, set_id))
}

/// One `Remove` per index, resolved against the snapshot as given.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if an index is out of range or its track
/// was not loaded from a playlist.
pub fn plan_removals(tracks: &[Track], indexes: &[usize]) -> Result<Vec<EditAction>> {
    indexes
        .iter()
        .map(|&index| {
            let (track, set_id) = slot_at(tracks, index)?;
            Ok(EditAction::Remove {
                video_id: track.id.clone(),
                set_id: set_id.to_string(),
            })
        })
        .collect()
}

/// One `Add` per new track, in order.
#[must_use]
pub fn plan_additions(new_tracks: &[Track]) -> Vec<EditAction> {
    new_tracks
        .iter()
        .map(|t| EditAction::Add {
            video_id: t.id.clone(),
        })
        .collect()
}

/// Moves placing freshly added slots before `index` of the pre-insert list.
///
/// Every move reuses the same anchor, which keeps the added slots in order
/// as one block. Returns `None` when there is no anchor (append at end).
#[must_use]
pub fn plan_insert_moves(
    tracks: &[Track],
    index: usize,
    added_set_ids: &[String],
) -> Option<Vec<EditAction>> {
    let anchor = tracks.get(index)?.set_id()?;
    Some(
        added_set_ids
            .iter()
            .map(|set_id| EditAction::Move {
                set_id: set_id.clone(),
                before_set_id: anchor.to_string(),
            })
            .collect(),
    )
}

/// Index of the anchor for moving `from` to `to` in the pre-move list.
///
/// `None` when the anchor index is not representable.
#[must_use]
pub const fn move_anchor_index(from: usize, to: usize) -> Option<usize> {
    if from > to { Some(to) } else { to.checked_add(1) }
}

/// The single move for relocating `from` to `to`.
///
/// Returns `Ok(None)` when the anchor falls past the tail: the catalog has no
/// "move to end" action, so such moves are skipped.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `from` is out of range or has no setId.
pub fn plan_move(tracks: &[Track], from: usize, to: usize) -> Result<Option<EditAction>> {
    let (_, set_id) = slot_at(tracks, from)?;
    let anchor_index = move_anchor_index(from, to);
    let Some(anchor) = anchor_index
        .and_then(|i| tracks.get(i))
        .and_then(Track::set_id)
    else {
        debug!(
            "Skipping move {} -> {}: no anchor at index {:?}",
            from, to, anchor_index
        );
        return Ok(None);
    };
    Ok(Some(EditAction::Move {
        set_id: set_id.to_string(),
        before_set_id: anchor.to_string(),
    }))
}

/// Metadata edit actions.
#[must_use]
pub fn plan_metadata(title: &str, description: Option<&str>) -> Vec<EditAction> {
    let mut actions = vec![EditAction::SetTitle {
        title: title.to_string(),
    }];
    if let Some(description) = description {
        actions.push(EditAction::SetDescription {
            description: description.to_string(),
        });
    }
    actions
}

/// Sends planned edits for the session's playlists.
#[derive(Clone)]
pub struct PlaylistEditor {
    client: Arc<dyn CatalogClient>,
    session: Arc<Session>,
}

impl std::fmt::Debug for PlaylistEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaylistEditor").finish_non_exhaustive()
    }
}

impl PlaylistEditor {
    /// Create an editor.
    pub fn new(client: Arc<dyn CatalogClient>, session: Arc<Session>) -> Self {
        Self { client, session }
    }

    async fn apply(&self, playlist_id: &str, actions: Vec<EditAction>) -> Result<EditOutcome> {
        debug!(
            "Sending {} edit actions to playlist {}",
            actions.len(),
            playlist_id
        );
        let client = Arc::clone(&self.client);
        let playlist_id = playlist_id.to_string();
        self.session
            .with_auth(|auth| async move {
                client.edit_playlist(&auth, playlist_id, actions).await
            })
            .await
    }

    /// Remove the tracks at `indexes` of the snapshot.
    ///
    /// # Errors
    ///
    /// Fails before any remote call if an index cannot be resolved;
    /// otherwise propagates remote and auth errors.
    pub async fn remove_tracks(
        &self,
        playlist_id: &str,
        tracks: &[Track],
        indexes: &[usize],
    ) -> Result<()> {
        let actions = plan_removals(tracks, indexes)?;
        if actions.is_empty() {
            return Ok(());
        }
        self.apply(playlist_id, actions).await?;
        info!("Removed {} tracks from {}", indexes.len(), playlist_id);
        Ok(())
    }

    /// Insert `new_tracks` before `index` of the snapshot.
    ///
    /// Adds them in one batch, then moves the minted slots before the anchor
    /// in a second batch. An `index` past the tail skips the second batch.
    ///
    /// # Errors
    ///
    /// Propagates remote and auth errors of either batch.
    pub async fn add_tracks(
        &self,
        playlist_id: &str,
        tracks: &[Track],
        index: usize,
        new_tracks: &[Track],
    ) -> Result<()> {
        if new_tracks.is_empty() {
            return Ok(());
        }
        let outcome = self
            .apply(playlist_id, plan_additions(new_tracks))
            .await?;
        info!("Added {} tracks to {}", new_tracks.len(), playlist_id);

        match plan_insert_moves(tracks, index, &outcome.added_set_ids) {
            Some(moves) if !moves.is_empty() => {
                self.apply(playlist_id, moves).await?;
            }
            _ => debug!("Added tracks stay at the tail of {}", playlist_id),
        }
        Ok(())
    }

    /// Move the track at `from` to `to`.
    ///
    /// # Errors
    ///
    /// Fails before any remote call if `from` cannot be resolved; otherwise
    /// propagates remote and auth errors.
    pub async fn move_track(
        &self,
        playlist_id: &str,
        tracks: &[Track],
        from: usize,
        to: usize,
    ) -> Result<()> {
        if let Some(action) = plan_move(tracks, from, to)? {
            self.apply(playlist_id, vec![action]).await?;
        }
        Ok(())
    }

    /// Set the title and, when given, the description.
    ///
    /// # Errors
    ///
    /// Propagates remote and auth errors.
    pub async fn edit_metadata(
        &self,
        playlist_id: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<()> {
        self.apply(playlist_id, plan_metadata(title, description))
            .await?;
        Ok(())
    }
}

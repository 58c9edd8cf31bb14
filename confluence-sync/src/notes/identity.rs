//! Stable per-note identifiers.
//!
//! A note gets a UUID in its front matter the first time it is synced or
//! connected. The identifier survives renames and moves and is never
//! regenerated once present.

use uuid::Uuid;

use super::file_ops::Note;
use super::frontmatter::{self, UNIQUE_ID_KEY};
use crate::error::SyncError;
use crate::models::SettingsRepository;

/// Identifier stored in the note's front matter, if any
pub fn read_unique_id(content: &str) -> Option<String> {
    frontmatter::split(content)
        .front_matter
        .and_then(|fm| fm.get(UNIQUE_ID_KEY))
        .filter(|id| !id.is_empty())
}

/// Return the note's identifier, assigning one when it has none.
///
/// A new identifier is written into the note file and gets an empty mapping
/// entry, which is persisted before returning. Notes that already carry an
/// identifier are not touched.
pub fn ensure_unique_id(
    note: &mut Note,
    settings: &mut SettingsRepository,
) -> Result<String, SyncError> {
    if let Some(existing) = read_unique_id(&note.content) {
        return Ok(existing);
    }

    let unique_id = Uuid::new_v4().to_string();

    let mut doc = frontmatter::split(&note.content);
    doc.front_matter_mut().set(UNIQUE_ID_KEY, &unique_id);
    note.content = doc.render();
    note.save()?;

    settings.insert_slot(&unique_id)?;

    log::info!(
        "[NOTES] Assigned identifier {} to {:?}",
        unique_id,
        note.path
    );
    Ok(unique_id)
}

use crate::diary_entry::DiaryEntry;
use crate::remote::RemoteSource;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// Derived counts over a collection of entries. Percentages are rounded to
/// the nearest integer and are 0 for an empty collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryStats {
    pub total: usize,
    pub has_images: usize,
    pub has_location: usize,
    pub has_mood: usize,
    pub image_percentage: u32,
    pub location_percentage: u32,
    pub mood_percentage: u32,
}

/// Read-only access to a fixed collection of diary entries, with an optional
/// remote source that is preferred over the local data when it responds.
///
/// The local collection is set at construction and never mutated; every
/// query works over a copy or a borrow, so concurrent reads are safe.
pub struct DiaryStore {
    entries: Vec<DiaryEntry>,
    remote: RemoteSource,
}

impl DiaryStore {
    /// Store over local data only. The remote address defaults to the empty
    /// placeholder, so the remote path always falls back to local entries.
    pub fn new(entries: Vec<DiaryEntry>) -> Self {
        Self::with_remote(entries, "")
    }

    pub fn with_remote(entries: Vec<DiaryEntry>, remote_url: impl Into<String>) -> Self {
        DiaryStore {
            entries,
            remote: RemoteSource::new(remote_url),
        }
    }

    /// Seed a store from a JSON array of entries.
    pub fn from_json(data: &str) -> Result<Self> {
        let entries: Vec<DiaryEntry> = serde_json::from_str(data)?;
        Ok(Self::new(entries))
    }

    pub fn entries(&self) -> &[DiaryEntry] {
        &self.entries
    }

    pub fn stats(&self) -> DiaryStats {
        compute_stats(&self.entries)
    }

    /// Entries sorted most recent first. `limit` truncates the result when
    /// it is `Some(n)` with `n > 0`; `None` and `Some(0)` return everything.
    pub fn list(&self, limit: Option<usize>) -> Vec<DiaryEntry> {
        sort_by_date_desc(self.entries.clone(), limit)
    }

    pub fn latest(&self) -> Option<DiaryEntry> {
        self.list(Some(1)).into_iter().next()
    }

    pub fn by_id(&self, id: usize) -> Option<&DiaryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entries with at least one image, in original collection order.
    pub fn with_images(&self) -> Vec<DiaryEntry> {
        self.entries
            .iter()
            .filter(|e| e.has_images())
            .cloned()
            .collect()
    }

    /// Entries carrying `tag`, sorted most recent first.
    pub fn by_tag(&self, tag: &str) -> Vec<DiaryEntry> {
        let matched = self
            .entries
            .iter()
            .filter(|e| e.has_tag(tag))
            .cloned()
            .collect();
        sort_by_date_desc(matched, None)
    }

    /// Every tag used by any entry, deduplicated and sorted ascending.
    pub fn all_tags(&self) -> Vec<String> {
        let mut tags = BTreeSet::new();
        for entry in &self.entries {
            if let Some(entry_tags) = &entry.tags {
                for tag in entry_tags {
                    tags.insert(tag.clone());
                }
            }
        }
        tags.into_iter().collect()
    }

    /// Case-insensitive substring search over content, title and tags.
    pub fn search(&self, query: &str) -> Vec<DiaryEntry> {
        let query = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| {
                e.content.to_lowercase().contains(&query)
                    || e.title
                        .as_deref()
                        .is_some_and(|t| t.to_lowercase().contains(&query))
                    || e.tags
                        .as_ref()
                        .is_some_and(|tags| tags.iter().any(|t| t.to_lowercase().contains(&query)))
            })
            .cloned()
            .collect()
    }

    /// Like [`list`](Self::list), but preferring the remote source. Any
    /// remote failure is reported and absorbed by falling back to the local
    /// collection; the call itself never fails.
    pub async fn list_remote(&self, limit: Option<usize>) -> Vec<DiaryEntry> {
        match self.remote.fetch().await {
            Ok(entries) => sort_by_date_desc(entries, limit),
            Err(e) => {
                eprintln!(
                    "remote diary fetch failed, falling back to local entries: {e}"
                );
                self.list(limit)
            }
        }
    }

    /// Stats over the remote collection when available, local otherwise.
    pub async fn stats_remote(&self) -> DiaryStats {
        compute_stats(&self.list_remote(None).await)
    }
}

fn compute_stats(entries: &[DiaryEntry]) -> DiaryStats {
    let total = entries.len();
    let has_images = entries.iter().filter(|e| e.has_images()).count();
    let has_location = entries.iter().filter(|e| e.has_location()).count();
    let has_mood = entries.iter().filter(|e| e.has_mood()).count();

    DiaryStats {
        total,
        has_images,
        has_location,
        has_mood,
        image_percentage: percentage(has_images, total),
        location_percentage: percentage(has_location, total),
        mood_percentage: percentage(has_mood, total),
    }
}

fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        (count as f64 / total as f64 * 100.0).round() as u32
    }
}

// Stable sort, so entries with equal timestamps keep their input order.
// Unparsable dates compare as `None`, placing them after every dated entry.
fn sort_by_date_desc(mut entries: Vec<DiaryEntry>, limit: Option<usize>) -> Vec<DiaryEntry> {
    entries.sort_by_cached_key(|e| Reverse(e.timestamp()));
    if let Some(n) = limit {
        if n > 0 {
            entries.truncate(n);
        }
    }
    entries
}

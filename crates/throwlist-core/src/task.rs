//! Task records and read-time normalization of persisted rows.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use time::OffsetDateTime;

use crate::date::DateOnly;
use crate::id::TaskId;

/// Manual priority band (`sortOrder`); 1 is the highest priority, 24 the lowest.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Band(u8);

impl Band {
    /// Highest priority band.
    pub const HIGHEST: Self = Self(1);
    /// Lowest priority band, also the default for new and legacy tasks.
    pub const LOWEST: Self = Self(24);

    /// Build a band, clamping out-of-range input into `1..=24`.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        let clamped = value.clamp(i64::from(Self::HIGHEST.0), i64::from(Self::LOWEST.0));
        Self(u8::try_from(clamped).unwrap_or(Self::LOWEST.0))
    }

    /// Numeric value in `1..=24`.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for Band {
    fn default() -> Self {
        Self::LOWEST
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Normalized task as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-issued identifier.
    pub id: TaskId,
    /// Owner of the task list.
    pub owner: String,
    /// Trimmed, non-empty title.
    pub title: String,
    /// Day the task is due; decides Today versus Future.
    pub due_date: DateOnly,
    /// Removed tasks only show up in the Removed view.
    pub removed: bool,
    /// Number of completions.
    pub done_count: u32,
    /// Reference date of the latest completion.
    pub last_done_date: Option<DateOnly>,
    /// Number of forceful transitions (advance, reschedule, throw).
    pub throw_count: u32,
    /// Manual priority band.
    pub sort_order: Band,
    /// Position key inside the band.
    pub sorter: i64,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Last write time in milliseconds since the Unix epoch.
    pub updated_at: i64,
}

impl Task {
    /// Normalize a persisted row, repairing fields written by older schemas.
    ///
    /// - missing `sortOrder` becomes band 24, out-of-range values are clamped
    /// - missing or non-integer `sorter` falls back to `createdAt`
    /// - missing or malformed `dueDate` becomes [`DateOnly::FAR_FUTURE`]
    #[must_use]
    pub fn from_stored(stored: StoredTask) -> Self {
        let created_at = stored.created_at.unwrap_or_default();
        Self {
            id: stored.id,
            owner: stored.owner,
            title: stored.title,
            due_date: stored
                .due_date
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(DateOnly::FAR_FUTURE),
            removed: stored.removed.unwrap_or(false),
            done_count: stored.done_count.unwrap_or(0),
            last_done_date: stored.last_done_date.and_then(|raw| raw.parse().ok()),
            throw_count: stored.throw_count.unwrap_or(0),
            sort_order: stored.sort_order.map_or_else(Band::default, Band::clamped),
            sorter: stored.sorter.unwrap_or(created_at),
            created_at,
            updated_at: stored.updated_at.unwrap_or(created_at),
        }
    }
}

/// Persisted shape of a task. Every field that drifted across schema versions
/// is optional and tolerant of wrongly typed values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTask {
    /// Store-issued identifier.
    pub id: TaskId,
    /// Owner of the task list.
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub owner: String,
    /// Task title.
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub title: String,
    /// `YYYY-MM-DD` due date.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Removal flag.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub removed: Option<bool>,
    /// Completion counter.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub done_count: Option<u32>,
    /// `YYYY-MM-DD` date of the latest completion.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub last_done_date: Option<String>,
    /// Forceful transition counter.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub throw_count: Option<u32>,
    /// Manual priority band.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
    /// Position key inside the band.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub sorter: Option<i64>,
    /// Creation time in milliseconds.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// Last write time in milliseconds.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl From<&Task> for StoredTask {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            owner: task.owner.clone(),
            title: task.title.clone(),
            due_date: Some(task.due_date.to_string()),
            removed: Some(task.removed),
            done_count: Some(task.done_count),
            last_done_date: task.last_done_date.map(|date| date.to_string()),
            throw_count: Some(task.throw_count),
            sort_order: Some(i64::from(task.sort_order.get())),
            sorter: Some(task.sorter),
            created_at: Some(task.created_at),
            updated_at: Some(task.updated_at),
        }
    }
}

/// Read a value, treating anything of the wrong type as absent.
fn lenient<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose<T> {
        Valid(T),
        Invalid(IgnoredAny),
    }

    Ok(match Option::<Loose<T>>::deserialize(d)? {
        Some(Loose::Valid(value)) => Some(value),
        Some(Loose::Invalid(_)) | None => None,
    })
}

fn lenient_or_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    lenient(d).map(Option::unwrap_or_default)
}

/// Current wall-clock time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    i64::try_from(nanos).unwrap_or(i64::MAX)
}

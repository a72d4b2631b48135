//! Feed data shared by every retriever.
//!
//! A retriever converts whatever format it reads (RSS, Atom, a test fixture)
//! into a [`Feed`] of [`RawEntry`] values, so the rest of the pipeline stays
//! format-agnostic.

use chrono::{DateTime, Utc};

/// A parsed feed: its title and entries in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feed {
    pub title: String,
    pub entries: Vec<RawEntry>,
}

/// One feed item as delivered by a retriever, before any filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// Headline, exactly as the feed encoded it (possibly mis-decoded).
    pub title: String,

    /// Link to the full content.  Empty when the feed gave none.
    pub link: String,

    /// When the entry was first published.
    pub published: Option<DateTime<Utc>>,

    /// When the entry was last updated.
    pub updated: Option<DateTime<Utc>>,

    /// Optional longer description or summary text.
    pub description: Option<String>,
}

impl RawEntry {
    /// The timestamp the window filter judges this entry by.
    ///
    /// Publication time wins; update time is the fallback.  `None` means the
    /// entry cannot be placed in time at all.
    pub fn effective_timestamp(&self) -> Option<DateTime<Utc>> {
        self.published.or(self.updated)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(published: Option<DateTime<Utc>>, updated: Option<DateTime<Utc>>) -> RawEntry {
        RawEntry {
            title: "t".to_string(),
            link: "http://example.com".to_string(),
            published,
            updated,
            description: None,
        }
    }

    #[test]
    fn published_is_preferred_over_updated() {
        let published = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let updated = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(
            entry(Some(published), Some(updated)).effective_timestamp(),
            Some(published)
        );
    }

    #[test]
    fn updated_is_used_when_published_is_absent() {
        let updated = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(entry(None, Some(updated)).effective_timestamp(), Some(updated));
    }

    #[test]
    fn no_timestamps_means_no_effective_timestamp() {
        assert_eq!(entry(None, None).effective_timestamp(), None);
    }
}

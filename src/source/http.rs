//! HTTP feed retrieval for RSS 2.0 and Atom.
//!
//! The body is tried as RSS first (via the [`rss`] crate) and then as Atom
//! (via [`atom_syndication`]).  A body that is neither is reported as
//! [`FetchError::Malformed`].

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use super::{Feed, FeedRetriever, RawEntry};
use crate::error::FetchError;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fetches feeds over HTTP with a shared client.
pub struct HttpRetriever {
    client: reqwest::Client,
}

impl HttpRetriever {
    /// Build a retriever whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Parse a fetched body as RSS, falling back to Atom.
    ///
    /// Pure (no I/O) so the format handling can be tested without a network.
    pub fn parse_body(body: &[u8]) -> Result<Feed, FetchError> {
        let rss_err = match rss::Channel::read_from(body) {
            Ok(channel) => return Ok(Self::parse_channel(&channel)),
            Err(e) => e,
        };

        match atom_syndication::Feed::read_from(body) {
            Ok(feed) => Ok(Self::parse_atom(&feed)),
            Err(atom_err) => Err(FetchError::Malformed(format!(
                "not RSS ({rss_err}) and not Atom ({atom_err})"
            ))),
        }
    }

    /// Convert an [`rss::Channel`] into a [`Feed`].
    pub fn parse_channel(channel: &rss::Channel) -> Feed {
        let entries = channel
            .items()
            .iter()
            .map(|item| {
                // <link>, else a permalink <guid>, else nothing.
                let link = item
                    .link()
                    .map(String::from)
                    .or_else(|| {
                        item.guid()
                            .filter(|g| g.is_permalink())
                            .map(|g| g.value().to_string())
                    })
                    .unwrap_or_default();

                let updated = item
                    .dublin_core_ext()
                    .and_then(|dc| dc.dates().first())
                    .and_then(|d| parse_timestamp(d));

                RawEntry {
                    title: item.title().unwrap_or("(untitled)").to_string(),
                    link,
                    published: item.pub_date().and_then(parse_timestamp),
                    updated,
                    description: item.description().map(String::from),
                }
            })
            .collect();

        Feed {
            title: channel.title().to_string(),
            entries,
        }
    }

    /// Convert an [`atom_syndication::Feed`] into a [`Feed`].
    pub fn parse_atom(feed: &atom_syndication::Feed) -> Feed {
        let entries = feed
            .entries()
            .iter()
            .map(|entry| {
                let link = entry
                    .links()
                    .iter()
                    .find(|l| l.rel() == "alternate")
                    .or_else(|| entry.links().first())
                    .map(|l| l.href().to_string())
                    .unwrap_or_default();

                let description = entry
                    .summary()
                    .map(|s| s.as_str().to_string())
                    .or_else(|| entry.content().and_then(|c| c.value()).map(String::from));

                let title = entry.title().as_str();
                RawEntry {
                    title: if title.is_empty() { "(untitled)" } else { title }.to_string(),
                    link,
                    published: entry.published().map(|d| d.with_timezone(&Utc)),
                    updated: Some(entry.updated().with_timezone(&Utc)),
                    description,
                }
            })
            .collect();

        Feed {
            title: feed.title().as_str().to_string(),
            entries,
        }
    }
}

#[async_trait]
impl FeedRetriever for HttpRetriever {
    async fn retrieve(&self, address: &str) -> Result<Feed, FetchError> {
        let response = self.client.get(address).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        debug!(%address, bytes = body.len(), "fetched feed body");
        Self::parse_body(&body)
    }
}

/// Parse an RFC 2822 timestamp, falling back to RFC 3339.
///
/// Unparseable input degrades to `None` rather than failing the entry.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_rss_extracts_items() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <item>
      <title>First Post</title>
      <link>https://example.com/1?utm_source=rss</link>
      <guid>guid-1</guid>
      <pubDate>Mon, 01 Jan 2024 00:00:00 +0000</pubDate>
      <description>First description</description>
    </item>
    <item>
      <title>Second Post</title>
      <link>https://example.com/2</link>
      <pubDate>Tue, 02 Jan 2024 12:00:00 +0000</pubDate>
    </item>
  </channel>
</rss>"#;

        let feed = HttpRetriever::parse_body(xml.as_bytes()).unwrap();

        assert_eq!(feed.title, "Test Feed");
        assert_eq!(feed.entries.len(), 2);

        let first = &feed.entries[0];
        assert_eq!(first.title, "First Post");
        assert_eq!(first.link, "https://example.com/1?utm_source=rss");
        assert_eq!(first.description.as_deref(), Some("First description"));
        assert_eq!(
            first.published,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert!(first.updated.is_none());

        assert_eq!(feed.entries[1].title, "Second Post");
        assert!(feed.entries[1].description.is_none());
    }

    #[test]
    fn rss_dublin_core_date_is_the_update_time() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>DC</title>
    <item>
      <title>Dated by dc</title>
      <link>https://example.com/dc</link>
      <dc:date>2024-03-05T10:30:00Z</dc:date>
    </item>
  </channel>
</rss>"#;

        let feed = HttpRetriever::parse_body(xml.as_bytes()).unwrap();
        let entry = &feed.entries[0];

        assert!(entry.published.is_none());
        assert_eq!(
            entry.updated,
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 10, 30, 0).unwrap())
        );
    }

    #[test]
    fn rss_missing_title_and_link_fall_back() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test</title>
    <item>
      <guid isPermaLink="true">https://example.com/permalink</guid>
    </item>
  </channel>
</rss>"#;

        let feed = HttpRetriever::parse_body(xml.as_bytes()).unwrap();

        assert_eq!(feed.entries[0].title, "(untitled)");
        assert_eq!(feed.entries[0].link, "https://example.com/permalink");
    }

    #[test]
    fn rss_invalid_date_becomes_none() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test</title>
    <item>
      <title>Bad Date</title>
      <pubDate>not-a-real-date</pubDate>
    </item>
  </channel>
</rss>"#;

        let feed = HttpRetriever::parse_body(xml.as_bytes()).unwrap();
        assert!(feed.entries[0].published.is_none());
    }

    #[test]
    fn parse_atom_extracts_entries() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Feed</title>
  <id>urn:feed</id>
  <updated>2024-02-01T00:00:00Z</updated>
  <entry>
    <title>Atom Entry</title>
    <id>urn:entry:1</id>
    <link rel="self" href="https://example.com/self"/>
    <link rel="alternate" href="https://example.com/post?ref=feed#top"/>
    <published>2024-01-31T08:00:00Z</published>
    <updated>2024-02-01T09:00:00Z</updated>
    <summary>Short summary</summary>
  </entry>
  <entry>
    <title>Only Updated</title>
    <id>urn:entry:2</id>
    <link href="https://example.com/other"/>
    <updated>2024-02-01T10:00:00Z</updated>
  </entry>
</feed>"#;

        let feed = HttpRetriever::parse_body(xml.as_bytes()).unwrap();

        assert_eq!(feed.title, "Atom Feed");
        assert_eq!(feed.entries.len(), 2);

        let first = &feed.entries[0];
        assert_eq!(first.title, "Atom Entry");
        assert_eq!(first.link, "https://example.com/post?ref=feed#top");
        assert_eq!(first.description.as_deref(), Some("Short summary"));
        assert_eq!(
            first.effective_timestamp(),
            Some(Utc.with_ymd_and_hms(2024, 1, 31, 8, 0, 0).unwrap())
        );

        let second = &feed.entries[1];
        assert_eq!(second.link, "https://example.com/other");
        assert!(second.published.is_none());
        assert_eq!(
            second.effective_timestamp(),
            Some(Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn garbage_is_malformed() {
        let err = HttpRetriever::parse_body(b"<html><body>not a feed</body></html>").unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn timestamp_parser_accepts_both_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_timestamp("Mon, 01 Jan 2024 12:00:00 +0000"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T12:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp(" 2024-01-01T13:00:00+01:00 "), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}

//! Digest emission.
//!
//! Each source produces one [`Section`], written twice: once to the
//! persisted digest (plain UTF-8 lines) and once to the interactive stream
//! (coloured when it is a terminal).
//!
//! Persisted line formats:
//!
//! ```text
//! <title> | <link>
//! No recent entries for <source>.
//! No feed content to display for <source>.
//! ```
//!
//! Descriptions are only ever shown on the interactive stream.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

use crate::error::DigestError;
use crate::registry::Source;

/// A title/link pair ready for output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEntry {
    /// Encoding-repaired, NFC-composed title.
    pub title: String,
    /// Link with its query component removed.
    pub link: String,
    /// Shown on the interactive stream only.
    pub description: Option<String>,
}

/// What one source contributes to the digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    /// The feed could not be fetched or parsed.
    FetchFailed,
    /// The feed parsed but nothing fell inside the window.
    NoRecentEntries,
    /// Recent entries, in feed order.  Never empty.
    Entries(Vec<NormalizedEntry>),
}

impl Section {
    /// Build a section from filtered entries, choosing the sentinel when
    /// there are none.
    pub fn from_entries(entries: Vec<NormalizedEntry>) -> Self {
        if entries.is_empty() {
            Self::NoRecentEntries
        } else {
            Self::Entries(entries)
        }
    }
}

/// Writes sections to the digest and the interactive stream.
///
/// `D` is the persisted digest (a file in production), `S` the interactive
/// stream (stdout in production).
pub struct DigestEmitter<D: Write, S: Write> {
    digest: D,
    digest_path: PathBuf,
    stream: S,
    styled: bool,
    show_descriptions: bool,
}

impl<D: Write, S: Write> DigestEmitter<D, S> {
    /// `digest_path` is only used to label errors.
    pub fn new(digest: D, digest_path: impl AsRef<Path>, stream: S) -> Self {
        Self {
            digest,
            digest_path: digest_path.as_ref().to_path_buf(),
            stream,
            styled: false,
            show_descriptions: false,
        }
    }

    /// Colour the interactive stream.
    pub fn styled(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    /// Echo entry descriptions to the interactive stream.
    pub fn show_descriptions(mut self, show: bool) -> Self {
        self.show_descriptions = show;
        self
    }

    /// Progress line shown before a source's section.
    pub fn announce(&mut self, source: &Source) -> Result<(), DigestError> {
        let line = format!("\nFetching feed: {} ({})", source.name, source.address);
        self.paint(&line, Color::Cyan).map_err(DigestError::Stream)
    }

    /// Write `section` for the source called `name`.
    ///
    /// Returns the number of entry lines written to the digest.
    pub fn emit(&mut self, name: &str, section: &Section) -> Result<usize, DigestError> {
        match section {
            Section::FetchFailed => {
                self.sentinel(&format!("No feed content to display for {name}."))?;
                Ok(0)
            }
            Section::NoRecentEntries => {
                self.sentinel(&format!("No recent entries for {name}."))?;
                Ok(0)
            }
            Section::Entries(entries) => {
                for entry in entries {
                    self.entry(entry)?;
                }
                Ok(entries.len())
            }
        }
    }

    /// Flush both outputs and hand the digest writer back.
    pub fn finish(mut self) -> Result<D, DigestError> {
        self.stream.flush().map_err(DigestError::Stream)?;
        let path = self.digest_path;
        self.digest
            .flush()
            .map_err(|source| DigestError::Io { path, source })?;
        Ok(self.digest)
    }

    fn entry(&mut self, entry: &NormalizedEntry) -> Result<(), DigestError> {
        let title = single_line(&entry.title);
        self.persist(&format!("{title} | {}", entry.link))?;

        self.paint(&title, Color::White)
            .and_then(|_| self.paint(&format!("  {}", entry.link), Color::DarkGrey))
            .map_err(DigestError::Stream)?;

        if self.show_descriptions {
            if let Some(desc) = entry.description.as_deref().filter(|d| !d.trim().is_empty()) {
                self.paint(&format!("  {}", single_line(desc)), Color::Grey)
                    .map_err(DigestError::Stream)?;
            }
        }
        Ok(())
    }

    fn sentinel(&mut self, line: &str) -> Result<(), DigestError> {
        self.persist(line)?;
        self.paint(line, Color::Yellow).map_err(DigestError::Stream)
    }

    fn persist(&mut self, line: &str) -> Result<(), DigestError> {
        writeln!(self.digest, "{line}").map_err(|source| DigestError::Io {
            path: self.digest_path.clone(),
            source,
        })
    }

    fn paint(&mut self, line: &str, color: Color) -> io::Result<()> {
        if self.styled {
            queue!(
                self.stream,
                SetForegroundColor(color),
                Print(line),
                ResetColor,
                Print("\n")
            )
        } else {
            writeln!(self.stream, "{line}")
        }
    }
}

/// Collapse every whitespace run (line breaks included) to one space and
/// trim the ends, so one entry stays on one digest line.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

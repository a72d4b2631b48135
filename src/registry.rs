//! Source registry parsing.
//!
//! The registry is a line-oriented text file with one source per line:
//!
//! ```text
//! # comments start with '#'
//! [Rust Blog] [https://blog.rust-lang.org/feed.xml]
//! [LWN][https://lwn.net/headlines/rss]
//! ```
//!
//! Both fields are bracket-delimited; the separator is `]`, optional
//! whitespace, then `[`.  Lines that do not match are reported and skipped.
//! A name that appears twice keeps its first position but takes the address
//! from the later line.

use std::collections::HashMap;
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::RegistryError;

/// A named feed endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub address: String,
}

/// Ordered mapping from source name to address.
///
/// Iteration follows the order in which names were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRegistry {
    sources: Vec<Source>,
    index: HashMap<String, usize>,
}

impl SourceRegistry {
    /// Add a source, replacing the address of an existing one with the same
    /// name in place.
    pub fn insert(&mut self, name: String, address: String) {
        match self.index.get(&name) {
            Some(&i) => {
                debug!(%name, "duplicate source name, later address wins");
                self.sources[i].address = address;
            }
            None => {
                self.index.insert(name.clone(), self.sources.len());
                self.sources.push(Source { name, address });
            }
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Source> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Parse registry text.  Never fails: bad lines are logged and skipped.
    pub fn parse(text: &str) -> Self {
        let mut registry = Self::default();

        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match parse_line(line) {
                Some((name, address)) => registry.insert(name.to_string(), address.to_string()),
                None => warn!(line = lineno + 1, content = %line, "invalid registry line, skipping"),
            }
        }

        registry
    }

    /// Read and parse the registry at `path`.
    ///
    /// A missing file yields an empty registry and a warning; any other I/O
    /// failure is returned.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Self::parse(&text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "registry file not found");
                Ok(Self::default())
            }
            Err(source) => Err(RegistryError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Split a trimmed `[name] [address]` line into its two trimmed fields.
///
/// Returns `None` unless the line is bracketed at both ends and contains
/// exactly one `]<whitespace>[` separator, and both fields are non-empty.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;

    let mut separators = separator_spans(inner);
    let (start, end) = separators.next()?;
    if separators.next().is_some() {
        return None;
    }

    let name = inner[..start].trim();
    let address = inner[end..].trim();
    if name.is_empty() || address.is_empty() {
        return None;
    }
    Some((name, address))
}

/// Byte spans of every `]`, optional whitespace, `[` run in `s`.
fn separator_spans(s: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    s.match_indices(']').filter_map(move |(start, _)| {
        let rest = &s[start + 1..];
        let after_ws = rest.trim_start();
        after_ws
            .starts_with('[')
            .then(|| (start, s.len() - after_ws.len() + 1))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

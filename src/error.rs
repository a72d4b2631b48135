//! Error types for the digest pipeline.
//!
//! Every error here is local to one registry line or one source.  The
//! pipeline turns them into log lines or digest sentinels; none of them ends
//! the run on its own.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Reading the source registry failed.
///
/// A registry file that simply does not exist is *not* an error: the parser
/// reports it and returns an empty registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("failed to read registry {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Retrieving or parsing a single feed failed.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport failure or a non-success HTTP status.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint did not answer within the configured timeout.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// The body parsed as neither RSS nor Atom.
    #[error("malformed feed content: {0}")]
    Malformed(String),
}

/// Writing the persisted digest failed.
#[derive(Error, Debug)]
pub enum DigestError {
    #[error("failed to write digest {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing to the interactive stream failed.
    #[error("failed to write to the interactive stream: {0}")]
    Stream(#[source] io::Error),
}

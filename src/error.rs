//! Typed errors for each failure mode of the conformance layer.
//!
//! "Not found" is never represented here: an unknown team name is a valid
//! `None` from `Conformer::conform` / `Conformer::get_id`. Everything in this
//! module is either fatal (load) or a real failure the caller must see.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::conformer::TeamId;

/// Fatal at construction: the durable stores cannot back a Conformer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed table {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: missing column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{}, line {line}: {reason}", path.display())]
    BadRow { path: PathBuf, line: u64, reason: String },

    #[error("{}: duplicate team id {id}", path.display())]
    DuplicateId { path: PathBuf, id: TeamId },

    #[error("alias '{alias}' points at team {id}, which is not in the registry")]
    DanglingAlias { alias: String, id: TeamId },

    #[error("store is locked by another process (remove {} if stale)", path.display())]
    Locked { path: PathBuf },
}

/// A durable append failed. In-memory state already reflects the change.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot append to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot encode row: {0}")]
    Csv(#[from] csv::Error),

    #[error("'{0}' is not representable in ISO-8859-1")]
    Unencodable(String),
}

/// The resolution provider could not produce an answer.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("prompt I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("input closed while waiting for an answer")]
    Closed,
}

#[derive(Debug, Error)]
pub enum ConformError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("unknown team id {0}")]
    UnknownTeam(TeamId),
}

/// A result field that is present but cannot be read.
#[derive(Debug, Error)]
pub enum ResultError {
    #[error("bad score '{0}'")]
    Score(String),

    #[error("bad game time '{0}'")]
    GameTime(String),

    #[error("results table {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("results file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Conform(#[from] ConformError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid options in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

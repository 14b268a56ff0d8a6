//! mf-store: forcing configuration and the extracted hourly table.
//!
//! A [`ForcingStore`] owns a validated [`ForcingConfig`] and, once
//! [`ForcingStore::read_forcing`] has run, a [`ForcingTable`] holding exactly
//! the archive rows that fall inside the configured date window.

pub mod config;
pub mod store;
pub mod table;

pub use config::{EndDate, ForcingConfig};
pub use store::ForcingStore;
pub use table::ForcingTable;

use std::path::PathBuf;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Configuration error: {what}")]
    Config { what: String },

    #[error("Failed to read configuration file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported archive time units: {units:?} (expected \"hours since <timestamp>\")")]
    UnsupportedUnits { units: String },

    #[error("Out of range: {what}")]
    OutOfRange { what: String },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },

    #[error("Forcing already read for this store")]
    AlreadyLoaded,

    #[error("Archive error: {0}")]
    Archive(#[from] mf_archive::ArchiveError),
}

impl StoreError {
    pub(crate) fn config(what: impl Into<String>) -> Self {
        StoreError::Config { what: what.into() }
    }
}

impl From<mf_core::CoreError> for StoreError {
    fn from(err: mf_core::CoreError) -> Self {
        use mf_core::CoreError;
        match err {
            CoreError::UnsupportedUnits { units } => StoreError::UnsupportedUnits { units },
            CoreError::NegativeOffset { what, offset } => StoreError::OutOfRange {
                what: format!("{what} (row offset {offset})"),
            },
            other => StoreError::config(other.to_string()),
        }
    }
}

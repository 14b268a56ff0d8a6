//! mf-archive: read access to hourly forcing archives.
//!
//! An archive is a single hourly time axis plus one column per forcing
//! variable. Backends:
//! - [`MemoryArchive`]: owned, in-process data
//! - [`JsonArchive`]: JSON document on disk
//! - `NetcdfArchive`: NetCDF file (requires the `netcdf` feature)

pub mod archive;
pub mod json;
pub mod memory;
#[cfg(feature = "netcdf")]
pub mod netcdf_file;

pub use archive::{ForcingArchive, VariableAttributes, open_archive};
pub use json::{JsonArchive, JsonTimeAxis, JsonVariable};
pub use memory::MemoryArchive;
#[cfg(feature = "netcdf")]
pub use netcdf_file::NetcdfArchive;

pub type ArchiveResult<T> = Result<T, ArchiveError>;

#[derive(thiserror::Error, Debug)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    Netcdf(#[from] netcdf::Error),

    #[error("Missing variable: {0}")]
    MissingVariable(String),

    #[error("Missing attribute {attribute:?} on variable {variable}")]
    MissingAttribute { variable: String, attribute: String },

    #[error("Variable {variable} has {len} rows, time axis has {expected}")]
    LengthMismatch {
        variable: String,
        len: usize,
        expected: usize,
    },

    #[error("Rows {start}..{end} outside archive of {len} rows")]
    RowRange { start: usize, end: usize, len: usize },

    #[error("Unsupported archive format: {path}")]
    UnsupportedFormat { path: String },

    #[error("NetCDF support not enabled (rebuild with the `netcdf` feature)")]
    FeatureDisabled,
}

/// Check `start..end` against an archive of `len` rows.
pub(crate) fn check_rows(start: usize, end: usize, len: usize) -> ArchiveResult<()> {
    if start > end || end > len {
        return Err(ArchiveError::RowRange { start, end, len });
    }
    Ok(())
}

//! The archive trait and format dispatch.

use std::ops::Range;
use std::path::Path;

use mf_core::ForcingVariable;

use crate::json::JsonArchive;
use crate::{ArchiveError, ArchiveResult};

/// Descriptive attributes an archive stores alongside each variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableAttributes {
    pub long_name: String,
    pub units: String,
}

/// Read-only view of an hourly forcing archive.
///
/// Implementations must expose every [`ForcingVariable`] with exactly
/// [`row_count`](ForcingArchive::row_count) rows aligned to the time axis.
pub trait ForcingArchive {
    /// The time axis `units` attribute, e.g. `"hours since 2007-01-01 00:00:00"`.
    fn time_units(&self) -> &str;

    /// Number of rows on the time axis.
    fn row_count(&self) -> usize;

    /// `long_name` and `units` attributes of a variable.
    fn attributes(&self, var: ForcingVariable) -> ArchiveResult<VariableAttributes>;

    /// Copy rows `rows` of a variable, in archive order.
    ///
    /// Fails with [`ArchiveError::RowRange`] if `rows` reaches past the last row.
    fn read_rows(&self, var: ForcingVariable, rows: Range<usize>) -> ArchiveResult<Vec<f64>>;
}

/// Open an archive file, choosing the backend from its extension.
pub fn open_archive(path: &Path) -> ArchiveResult<Box<dyn ForcingArchive>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    tracing::debug!(path = %path.display(), "opening forcing archive");

    match extension.as_deref() {
        Some("json") => Ok(Box::new(JsonArchive::load(path)?)),
        Some("nc" | "nc4") => open_netcdf(path),
        _ => Err(ArchiveError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

#[cfg(feature = "netcdf")]
fn open_netcdf(path: &Path) -> ArchiveResult<Box<dyn ForcingArchive>> {
    Ok(Box::new(crate::netcdf_file::NetcdfArchive::open(path)?))
}

#[cfg(not(feature = "netcdf"))]
fn open_netcdf(_path: &Path) -> ArchiveResult<Box<dyn ForcingArchive>> {
    Err(ArchiveError::FeatureDisabled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_extension_is_rejected() {
        let err = open_archive(Path::new("forcing.csv")).err().unwrap();
        assert!(matches!(err, ArchiveError::UnsupportedFormat { .. }));
    }

    #[test]
    fn missing_extension_is_rejected() {
        let err = open_archive(Path::new("forcing")).err().unwrap();
        assert!(matches!(err, ArchiveError::UnsupportedFormat { .. }));
    }

    #[cfg(not(feature = "netcdf"))]
    #[test]
    fn netcdf_without_feature() {
        let err = open_archive(Path::new("forcing.nc")).err().unwrap();
        assert!(matches!(err, ArchiveError::FeatureDisabled));
    }
}

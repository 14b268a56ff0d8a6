//! Error types for the coupling interface.

use thiserror::Error;

/// Errors returned by [`Bmi`](crate::Bmi) operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BmiError {
    #[error("Configuration error: {what}")]
    Config { what: String },

    #[error("Unsupported time units: {units:?}")]
    UnsupportedUnits { units: String },

    #[error("Out of range: {what}")]
    OutOfRange { what: String },

    #[error("Unknown variable: {name}")]
    UnknownVariable { name: String },

    #[error("Component is not initialized")]
    NotInitialized,

    #[error("Component is already initialized")]
    AlreadyInitialized,

    #[error("Unsupported operation: {what}")]
    UnsupportedOperation { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Archive error: {message}")]
    Archive { message: String },
}

pub type BmiResult<T> = Result<T, BmiError>;

impl BmiError {
    pub(crate) fn index_oob(what: &str, index: usize, len: usize) -> Self {
        BmiError::OutOfRange {
            what: format!("{what} (index={index}, len={len})"),
        }
    }
}

impl From<mf_store::StoreError> for BmiError {
    fn from(e: mf_store::StoreError) -> Self {
        use mf_store::StoreError;
        match e {
            StoreError::Config { what } => BmiError::Config { what },
            read @ StoreError::ConfigRead { .. } => BmiError::Config {
                what: read.to_string(),
            },
            StoreError::UnsupportedUnits { units } => BmiError::UnsupportedUnits { units },
            StoreError::OutOfRange { what } => BmiError::OutOfRange { what },
            StoreError::Invariant { what } => BmiError::Archive { message: what },
            StoreError::AlreadyLoaded => BmiError::AlreadyInitialized,
            StoreError::Archive(inner) => BmiError::Archive {
                message: inner.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mf_store::StoreError;

    #[test]
    fn store_errors_keep_their_category() {
        let units = StoreError::UnsupportedUnits {
            units: "days since 2000-01-01".to_string(),
        };
        assert!(matches!(BmiError::from(units), BmiError::UnsupportedUnits { .. }));

        let oob = StoreError::OutOfRange {
            what: "rows".to_string(),
        };
        assert!(matches!(BmiError::from(oob), BmiError::OutOfRange { .. }));

        let ragged = StoreError::Invariant {
            what: "column T2D has 3 rows, expected 4".to_string(),
        };
        assert!(matches!(BmiError::from(ragged), BmiError::Archive { .. }));

        let read = StoreError::ConfigRead {
            path: "missing.yaml".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let err = BmiError::from(read);
        assert!(matches!(err, BmiError::Config { ref what } if what.contains("missing.yaml")));
    }
}

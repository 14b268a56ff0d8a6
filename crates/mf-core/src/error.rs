use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Unparseable timestamp: {value:?}")]
    InvalidTimestamp { value: String },

    #[error("Unsupported time units: {units:?} (expected \"hours since <timestamp>\")")]
    UnsupportedUnits { units: String },

    #[error("Row offset out of range: {what} (offset={offset})")]
    NegativeOffset { what: &'static str, offset: i64 },

    #[error("Invalid window: {what}")]
    InvalidWindow { what: &'static str },
}

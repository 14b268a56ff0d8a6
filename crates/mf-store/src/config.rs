//! Forcing configuration document.
//!
//! YAML keys are `standalone`, `startTimeDate`, `endTimeDate`, `archiveFile`
//! and `debug`. The legacy keys `STAND_ALONE`, `start_time_date`,
//! `end_time_date`, `Netcdf_File` and `Debug` are accepted as aliases.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use mf_core::{floor_hours_between, parse_timestamp};
use serde::Deserialize;

use crate::{StoreError, StoreResult};

/// Legacy value of `endTimeDate` selecting a single row at the start date.
pub const SINGLE_INSTANT_SENTINEL: i64 = -9;

/// End of the configured window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndDate {
    /// Only the row at the start date.
    SingleInstant,
    At(NaiveDateTime),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForcingConfig {
    pub standalone: bool,
    pub start_time: NaiveDateTime,
    pub end_time: EndDate,
    pub archive_file: Option<PathBuf>,
    pub debug: bool,
}

impl Default for ForcingConfig {
    /// Nine-day window starting 2007-01-01 05:00, no archive location.
    fn default() -> Self {
        let january = |day: u32, hour: u32| {
            chrono::NaiveDate::from_ymd_opt(2007, 1, day)
                .and_then(|d| d.and_hms_opt(hour, 0, 0))
                .unwrap_or_default()
        };
        Self {
            standalone: true,
            start_time: january(1, 5),
            end_time: EndDate::At(january(10, 5)),
            archive_file: None,
            debug: true,
        }
    }
}

impl ForcingConfig {
    /// Parse and validate a YAML configuration document.
    pub fn from_yaml_str(content: &str) -> StoreResult<Self> {
        let document: ConfigDocument = serde_yaml::from_str(content)
            .map_err(|e| StoreError::config(format!("failed to parse configuration YAML: {e}")))?;
        let config = document.into_config()?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML configuration file.
    ///
    /// A relative `archiveFile` is resolved against the file's directory.
    pub fn from_yaml_file(path: &Path) -> StoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| StoreError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config = Self::from_yaml_str(&content)?;

        if let (Some(archive), Some(dir)) = (&config.archive_file, path.parent())
            && archive.is_relative()
        {
            config.archive_file = Some(dir.join(archive));
        }
        Ok(config)
    }

    pub fn validate(&self) -> StoreResult<()> {
        if let EndDate::At(end) = self.end_time
            && end < self.start_time
        {
            return Err(StoreError::config(format!(
                "endTimeDate {end} precedes startTimeDate {}",
                self.start_time
            )));
        }
        Ok(())
    }

    /// End of the window, or `None` for a single instant.
    pub fn end_time_opt(&self) -> Option<NaiveDateTime> {
        match self.end_time {
            EndDate::SingleInstant => None,
            EndDate::At(t) => Some(t),
        }
    }

    /// Whole hours from start to end (0 for a single instant).
    pub fn duration_hours(&self) -> i64 {
        match self.end_time {
            EndDate::SingleInstant => 0,
            EndDate::At(end) => floor_hours_between(self.start_time, end),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ConfigDocument {
    #[serde(default, alias = "STAND_ALONE")]
    standalone: Option<Flag>,
    #[serde(alias = "start_time_date")]
    start_time_date: String,
    #[serde(alias = "end_time_date")]
    end_time_date: EndDateDef,
    #[serde(alias = "Netcdf_File")]
    archive_file: Option<String>,
    #[serde(default, alias = "Debug")]
    debug: Option<Flag>,
}

/// Boolean written either as a YAML bool or as 0/1.
#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EndDateDef {
    Sentinel(i64),
    Date(String),
}

impl Flag {
    fn resolve(self, key: &str) -> StoreResult<bool> {
        match self {
            Flag::Bool(b) => Ok(b),
            Flag::Int(0) => Ok(false),
            Flag::Int(1) => Ok(true),
            Flag::Int(other) => Err(StoreError::config(format!(
                "{key} must be a boolean or 0/1, got {other}"
            ))),
        }
    }
}

impl ConfigDocument {
    fn into_config(self) -> StoreResult<ForcingConfig> {
        let defaults = ForcingConfig::default();

        let timestamp = |key: &str, value: &str| {
            parse_timestamp(value)
                .map_err(|_| StoreError::config(format!("{key} is not a valid timestamp: {value:?}")))
        };

        let start_time = timestamp("startTimeDate", &self.start_time_date)?;
        let end_time = match self.end_time_date {
            EndDateDef::Sentinel(SINGLE_INSTANT_SENTINEL) => EndDate::SingleInstant,
            EndDateDef::Sentinel(other) => {
                return Err(StoreError::config(format!(
                    "endTimeDate must be a timestamp or {SINGLE_INSTANT_SENTINEL}, got {other}"
                )));
            }
            EndDateDef::Date(value) => EndDate::At(timestamp("endTimeDate", &value)?),
        };

        let archive_file = match self.archive_file {
            Some(path) if path.trim().is_empty() => {
                return Err(StoreError::config("archiveFile must not be empty"));
            }
            other => other.map(PathBuf::from),
        };

        Ok(ForcingConfig {
            standalone: match self.standalone {
                Some(flag) => flag.resolve("standalone")?,
                None => defaults.standalone,
            },
            start_time,
            end_time,
            archive_file,
            debug: match self.debug {
                Some(flag) => flag.resolve("debug")?,
                None => defaults.debug,
            },
        })
    }
}

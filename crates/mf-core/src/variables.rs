//! The fixed set of forcing variables.
//!
//! Each variable pairs a CSDMS standard name with the short name used inside
//! the archive, plus the units the coupling side sees. The map is pure data:
//! lookups are `match`es over a closed enum, so there is nothing to build or
//! share at runtime.

use core::fmt;

/// Number of forcing variables carried by every archive and table.
pub const VARIABLE_COUNT: usize = 8;

/// One of the eight hourly forcing variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ForcingVariable {
    LongwaveDown,
    SurfacePressure,
    SpecificHumidity,
    RainRate,
    ShortwaveDown,
    AirTemperature,
    WindU,
    WindV,
}

impl ForcingVariable {
    /// All variables, in the order output names are reported.
    pub const ALL: [ForcingVariable; VARIABLE_COUNT] = [
        ForcingVariable::LongwaveDown,
        ForcingVariable::SurfacePressure,
        ForcingVariable::SpecificHumidity,
        ForcingVariable::RainRate,
        ForcingVariable::ShortwaveDown,
        ForcingVariable::AirTemperature,
        ForcingVariable::WindU,
        ForcingVariable::WindV,
    ];

    /// Position of this variable in [`ForcingVariable::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn standard_name(self) -> &'static str {
        match self {
            Self::LongwaveDown => "land_surface_radiation~incoming~longwave__energy_flux",
            Self::SurfacePressure => "land_surface_air__pressure",
            Self::SpecificHumidity => "atmosphere_air_water~vapor__relative_saturation",
            Self::RainRate => "atmosphere_water__liquid_equivalent_precipitation_rate",
            Self::ShortwaveDown => "land_surface_radiation~incoming~shortwave__energy_flux",
            Self::AirTemperature => "land_surface_air__temperature",
            Self::WindU => "land_surface_wind__x_component_of_velocity",
            Self::WindV => "land_surface_wind__y_component_of_velocity",
        }
    }

    /// Variable name inside the archive.
    pub fn short_name(self) -> &'static str {
        match self {
            Self::LongwaveDown => "LWDOWN",
            Self::SurfacePressure => "PSFC",
            Self::SpecificHumidity => "Q2D",
            Self::RainRate => "RAINRATE",
            Self::ShortwaveDown => "SWDOWN",
            Self::AirTemperature => "T2D",
            Self::WindU => "U2D",
            Self::WindV => "V2D",
        }
    }

    pub fn units(self) -> &'static str {
        match self {
            Self::LongwaveDown | Self::ShortwaveDown => "W m-2",
            Self::SurfacePressure => "Pa",
            Self::SpecificHumidity => "kg kg-1",
            Self::RainRate => "kg m-2",
            Self::AirTemperature => "K",
            Self::WindU | Self::WindV => "m s-1",
        }
    }

    pub fn from_standard_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.standard_name() == name)
    }

    pub fn from_short_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.short_name() == name)
    }

    /// Standard names of all variables, in reporting order.
    pub fn standard_names() -> [&'static str; VARIABLE_COUNT] {
        Self::ALL.map(Self::standard_name)
    }
}

impl fmt::Display for ForcingVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

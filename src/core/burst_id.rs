use crate::types::{ProductAttributes, SarError, SarResult};
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// Geography-based burst identifier, rendered as `R168-N471-E0118`.
///
/// Position is kept in tenths of a degree, rounded half away from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BurstId {
    pub relative_orbit: u32,
    pub north: bool,
    pub lat_tenths: u32,
    pub east: bool,
    pub lon_tenths: u32,
}

impl BurstId {
    /// Build the identifier of a burst centred on (`latitude`, `longitude`)
    pub fn new(relative_orbit: u32, latitude: f64, longitude: f64) -> SarResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(SarError::InvalidCoordinate(format!(
                "latitude {} outside [-90, 90]",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(SarError::InvalidCoordinate(format!(
                "longitude {} outside [-180, 180]",
                longitude
            )));
        }

        Ok(Self {
            relative_orbit,
            north: latitude >= 0.0,
            lat_tenths: to_tenths(latitude),
            east: longitude >= 0.0,
            lon_tenths: to_tenths(longitude),
        })
    }

    /// Signed latitude in degrees at 0.1° resolution
    pub fn latitude(&self) -> f64 {
        let lat = self.lat_tenths as f64 / 10.0;
        if self.north { lat } else { -lat }
    }

    /// Signed longitude in degrees at 0.1° resolution
    pub fn longitude(&self) -> f64 {
        let lon = self.lon_tenths as f64 / 10.0;
        if self.east { lon } else { -lon }
    }
}

fn to_tenths(degrees: f64) -> u32 {
    (degrees.abs() * 10.0).round() as u32
}

impl fmt::Display for BurstId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "R{:03}-{}{:03}-{}{:04}",
            self.relative_orbit,
            if self.north { 'N' } else { 'S' },
            self.lat_tenths,
            if self.east { 'E' } else { 'W' },
            self.lon_tenths
        )
    }
}

impl FromStr for BurstId {
    type Err = SarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let re = Regex::new(r"^R(\d{3,})-([NS])(\d{3})-([EW])(\d{4})$")
            .map_err(|e| SarError::InvalidFormat(format!("Burst id pattern: {}", e)))?;
        let caps = re
            .captures(s)
            .ok_or_else(|| SarError::InvalidFormat(format!("Not a burst id: {}", s)))?;

        let number = |i: usize| -> SarResult<u32> {
            caps[i]
                .parse()
                .map_err(|e| SarError::InvalidFormat(format!("Burst id {}: {}", s, e)))
        };

        let id = Self {
            relative_orbit: number(1)?,
            north: &caps[2] == "N",
            lat_tenths: number(3)?,
            east: &caps[4] == "E",
            lon_tenths: number(5)?,
        };
        if id.lat_tenths > 900 || id.lon_tenths > 1800 {
            return Err(SarError::InvalidCoordinate(format!("Burst id out of range: {}", s)));
        }
        Ok(id)
    }
}

/// Identifier of the burst centred on (`latitude`, `longitude`) in a product
pub fn build_burst_id(product_attrs: &ProductAttributes, latitude: f64, longitude: f64) -> SarResult<BurstId> {
    BurstId::new(product_attrs.relative_orbit()?, latitude, longitude)
}

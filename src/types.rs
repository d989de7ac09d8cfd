use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

/// Polarization modes for Sentinel-1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Polarization {
    VV,
    VH,
    HV,
    HH,
}

impl std::fmt::Display for Polarization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Polarization::VV => write!(f, "VV"),
            Polarization::VH => write!(f, "VH"),
            Polarization::HV => write!(f, "HV"),
            Polarization::HH => write!(f, "HH"),
        }
    }
}

impl FromStr for Polarization {
    type Err = SarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "VV" => Ok(Polarization::VV),
            "VH" => Ok(Polarization::VH),
            "HV" => Ok(Polarization::HV),
            "HH" => Ok(Polarization::HH),
            _ => Err(SarError::InvalidFormat(format!("Invalid polarization: {}", s))),
        }
    }
}

/// Scalar value of a product attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

/// Product-level attributes (STAC-like `"sat:relative_orbit"` keys)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductAttributes {
    pub attrs: BTreeMap<String, AttributeValue>,
}

impl ProductAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes carrying only the relative orbit number
    pub fn with_relative_orbit(relative_orbit: u32) -> Self {
        let mut attrs = Self::new();
        attrs.insert("sat:relative_orbit", AttributeValue::Int(relative_orbit as i64));
        attrs
    }

    pub fn insert(&mut self, key: &str, value: impl Into<AttributeValue>) {
        self.attrs.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attrs.get(key)
    }

    /// Relative orbit number of the product.
    ///
    /// Prefers `sat:relative_orbit`, otherwise takes the first
    /// `<platform>:relative_orbit` key.
    pub fn relative_orbit(&self) -> SarResult<u32> {
        let (key, value) = match self.attrs.get_key_value("sat:relative_orbit") {
            Some(entry) => entry,
            None => self
                .attrs
                .iter()
                .find(|(k, _)| k.ends_with(":relative_orbit"))
                .ok_or_else(|| {
                    SarError::MissingAttribute("relative orbit (sat:relative_orbit)".to_string())
                })?,
        };

        match value {
            AttributeValue::Int(orbit) if *orbit >= 0 && *orbit <= u32::MAX as i64 => Ok(*orbit as u32),
            AttributeValue::Float(orbit)
                if orbit.fract() == 0.0 && *orbit >= 0.0 && *orbit <= u32::MAX as f64 =>
            {
                Ok(*orbit as u32)
            }
            other => Err(SarError::MissingAttribute(format!(
                "{} is not a non-negative integer: {:?}",
                key, other
            ))),
        }
    }
}

/// Paths of one ancillary category, keyed by polarization
pub type PolarizationPaths = BTreeMap<Polarization, PathBuf>;

/// Ancillary data files of one sub-swath: category (e.g. `annotation_path`,
/// `calibration_path`) -> polarization -> file path.
///
/// Paths may or may not exist on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AncillaryDataPaths {
    pub categories: BTreeMap<String, PolarizationPaths>,
}

impl AncillaryDataPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: &str, pol: Polarization, path: impl Into<PathBuf>) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(pol, path.into());
    }

    pub fn category(&self, category: &str) -> Option<&PolarizationPaths> {
        self.categories.get(category)
    }
}

/// Ancillary data of a whole product, keyed by sub-swath id (`iw1`, `iw2`, ...)
pub type ProductPaths = BTreeMap<String, AncillaryDataPaths>;

/// Ground control point grid sampled on (azimuth line, range sample)
#[derive(Debug, Clone)]
pub struct GcpGrid {
    pub latitude: Array2<f64>,
    pub longitude: Array2<f64>,
    /// Raster line of each azimuth sample
    pub line: Vec<u32>,
    /// Raster pixel of each range sample
    pub pixel: Vec<u32>,
    pub burst_count: usize,
}

impl GcpGrid {
    /// Build a grid from latitude/longitude samples.
    ///
    /// The azimuth dimension must hold exactly `burst_count + 1` lines.
    pub fn new(latitude: Array2<f64>, longitude: Array2<f64>, burst_count: usize) -> SarResult<Self> {
        if burst_count == 0 {
            return Err(SarError::Metadata("GCP grid burst_count must be positive".to_string()));
        }
        if latitude.dim() != longitude.dim() {
            return Err(SarError::Metadata(format!(
                "GCP latitude shape {:?} differs from longitude shape {:?}",
                latitude.dim(),
                longitude.dim()
            )));
        }

        let (azimuth_lines, range_samples) = latitude.dim();
        if range_samples == 0 {
            return Err(SarError::Metadata("GCP grid has no range samples".to_string()));
        }
        if azimuth_lines != burst_count + 1 {
            return Err(SarError::Metadata(format!(
                "GCP grid has {} azimuth lines, expected burst_count + 1 = {}",
                azimuth_lines,
                burst_count + 1
            )));
        }

        Ok(Self {
            line: (0..azimuth_lines as u32).collect(),
            pixel: (0..range_samples as u32).collect(),
            latitude,
            longitude,
            burst_count,
        })
    }

    pub fn dim(&self) -> (usize, usize) {
        self.latitude.dim()
    }
}

/// Geographic centre of every burst of a sub-swath
#[derive(Debug, Clone)]
pub struct BurstCentres {
    pub latitude: Array1<f64>,
    pub longitude: Array1<f64>,
}

impl BurstCentres {
    pub fn len(&self) -> usize {
        self.latitude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latitude.is_empty()
    }

    /// (latitude, longitude) of burst `index`
    pub fn get(&self, index: usize) -> Option<(f64, f64)> {
        Some((*self.latitude.get(index)?, *self.longitude.get(index)?))
    }
}

/// Per-burst raster geometry reported by the annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurstGeometry {
    pub burst_pos: usize,
    pub lines_per_burst: usize,
    pub samples_per_burst: usize,
}

/// Everything the burst catalog needs from one annotation file
#[derive(Debug, Clone)]
pub struct SwathAnnotation {
    pub gcp: GcpGrid,
    pub bursts: Vec<BurstGeometry>,
}

/// Raster extent and geographic centre of one burst
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurstInfoRecord {
    pub burst_pos: usize,
    pub burst_first_line: usize,
    pub burst_last_line: usize,
    pub burst_first_pixel: usize,
    pub burst_last_pixel: usize,
    pub burst_centre_latitude: f64,
    pub burst_centre_longitude: f64,
}

/// Error types for SAR catalog operations
#[derive(Debug, thiserror::Error)]
pub enum SarError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("XML parsing error: {0}")]
    XmlParsing(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Missing attribute: {0}")]
    MissingAttribute(String),
}

/// Result type for SAR operations
pub type SarResult<T> = Result<T, SarError>;

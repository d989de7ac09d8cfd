use crate::types::{BurstGeometry, GcpGrid, SarError, SarResult, SwathAnnotation};
use ndarray::Array2;
use quick_xml::de::from_str;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Subset of the Sentinel-1 annotation `<product>` element used for burst indexing
#[derive(Debug, Deserialize)]
pub struct AnnotationRoot {
    #[serde(rename = "adsHeader")]
    pub ads_header: Option<AdsHeader>,
    #[serde(rename = "swathTiming")]
    pub swath_timing: Option<SwathTiming>,
    #[serde(rename = "geolocationGrid")]
    pub geolocation_grid: Option<GeolocationGrid>,
}

#[derive(Debug, Deserialize)]
pub struct AdsHeader {
    #[serde(rename = "missionId")]
    pub mission_id: Option<String>,
    #[serde(rename = "swath")]
    pub swath: Option<String>,
    #[serde(rename = "polarisation")]
    pub polarisation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SwathTiming {
    #[serde(rename = "linesPerBurst")]
    pub lines_per_burst: usize,
    #[serde(rename = "samplesPerBurst")]
    pub samples_per_burst: usize,
    #[serde(rename = "burstList")]
    pub burst_list: BurstList,
}

#[derive(Debug, Deserialize)]
pub struct BurstList {
    #[serde(rename = "burst", default)]
    pub bursts: Vec<Burst>,
}

#[derive(Debug, Deserialize)]
pub struct Burst {
    #[serde(rename = "azimuthTime")]
    pub azimuth_time: Option<String>,
    #[serde(rename = "byteOffset")]
    pub byte_offset: Option<u64>,
}

/// Geolocation grid for geographic coordinate extraction
#[derive(Debug, Deserialize)]
pub struct GeolocationGrid {
    #[serde(rename = "geolocationGridPointList")]
    pub geolocation_grid_point_list: GeolocationGridPointList,
}

#[derive(Debug, Deserialize)]
pub struct GeolocationGridPointList {
    #[serde(rename = "geolocationGridPoint", default)]
    pub geolocation_grid_points: Vec<GeolocationGridPoint>,
}

#[derive(Debug, Deserialize)]
pub struct GeolocationGridPoint {
    #[serde(rename = "line")]
    pub line: u32,
    #[serde(rename = "pixel")]
    pub pixel: u32,
    #[serde(rename = "latitude")]
    pub latitude: f64,
    #[serde(rename = "longitude")]
    pub longitude: f64,
}

/// Source of per-swath burst geometry and GCP grid
pub trait AnnotationReader: Sync {
    fn read_swath_annotation(&self, path: &Path) -> SarResult<SwathAnnotation>;
}

/// Reads Sentinel-1 annotation XML files from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlAnnotationReader;

impl AnnotationReader for XmlAnnotationReader {
    fn read_swath_annotation(&self, path: &Path) -> SarResult<SwathAnnotation> {
        log::debug!("Reading annotation {}", path.display());
        let xml_content = std::fs::read_to_string(path)?;
        let annotation = AnnotationParser::parse_annotation(&xml_content)?;
        AnnotationParser::extract_swath_annotation(&annotation)
    }
}

/// Parser for Sentinel-1 annotation XML files
pub struct AnnotationParser;

impl AnnotationParser {
    /// Parse complete annotation XML
    pub fn parse_annotation(xml_content: &str) -> SarResult<AnnotationRoot> {
        from_str::<AnnotationRoot>(xml_content)
            .map_err(|e| SarError::XmlParsing(format!("Failed to parse annotation XML: {}", e)))
    }

    /// Burst geometry and GCP grid of the annotated sub-swath
    pub fn extract_swath_annotation(annotation: &AnnotationRoot) -> SarResult<SwathAnnotation> {
        let swath_timing = annotation.swath_timing.as_ref().ok_or_else(|| {
            SarError::Metadata("No swathTiming found in annotation".to_string())
        })?;

        let bursts = Self::extract_bursts(swath_timing);
        let gcp = Self::extract_gcp_grid(annotation, bursts.len())?;

        Ok(SwathAnnotation { gcp, bursts })
    }

    /// One geometry record per `<burst>`, in annotation order
    pub fn extract_bursts(swath_timing: &SwathTiming) -> Vec<BurstGeometry> {
        (0..swath_timing.burst_list.bursts.len())
            .map(|burst_pos| BurstGeometry {
                burst_pos,
                lines_per_burst: swath_timing.lines_per_burst,
                samples_per_burst: swath_timing.samples_per_burst,
            })
            .collect()
    }

    /// Arrange the geolocation grid points on (line, pixel) axes
    pub fn extract_gcp_grid(annotation: &AnnotationRoot, burst_count: usize) -> SarResult<GcpGrid> {
        let points = annotation
            .geolocation_grid
            .as_ref()
            .map(|grid| &grid.geolocation_grid_point_list.geolocation_grid_points)
            .filter(|points| !points.is_empty())
            .ok_or_else(|| SarError::Metadata("No geolocation grid points found".to_string()))?;

        let lines: Vec<u32> = points.iter().map(|p| p.line).collect::<BTreeSet<_>>().into_iter().collect();
        let pixels: Vec<u32> = points.iter().map(|p| p.pixel).collect::<BTreeSet<_>>().into_iter().collect();
        let line_index: BTreeMap<u32, usize> = lines.iter().enumerate().map(|(i, &l)| (l, i)).collect();
        let pixel_index: BTreeMap<u32, usize> = pixels.iter().enumerate().map(|(i, &p)| (p, i)).collect();

        let shape = (lines.len(), pixels.len());
        let mut latitude = Array2::from_elem(shape, f64::NAN);
        let mut longitude = Array2::from_elem(shape, f64::NAN);
        let mut filled = Array2::from_elem(shape, false);

        for point in points {
            let idx = [line_index[&point.line], pixel_index[&point.pixel]];
            latitude[idx] = point.latitude;
            longitude[idx] = point.longitude;
            filled[idx] = true;
        }

        let missing = filled.iter().filter(|f| !**f).count();
        if missing > 0 {
            return Err(SarError::Metadata(format!(
                "Geolocation grid {}x{} is missing {} points",
                shape.0, shape.1, missing
            )));
        }

        let mut grid = GcpGrid::new(latitude, longitude, burst_count)?;
        grid.line = lines;
        grid.pixel = pixels;
        Ok(grid)
    }
}

use crate::core::burst_centre::compute_burst_centre;
use crate::core::burst_id::BurstId;
use crate::io::annotation::{AnnotationReader, XmlAnnotationReader};
use crate::types::{
    AncillaryDataPaths, BurstInfoRecord, ProductAttributes, SarError, SarResult, SwathAnnotation,
};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Ancillary category holding the annotation XML files
pub const ANNOTATION_CATEGORY: &str = "annotation_path";

/// Burst records of one sub-swath, keyed by burst identifier
pub type BurstInfoMap = BTreeMap<BurstId, BurstInfoRecord>;

/// Builds per-burst raster extents and identifiers for a sub-swath
#[derive(Debug, Clone)]
pub struct BurstInfoExtractor<R> {
    reader: R,
    annotation_category: String,
}

impl<R: AnnotationReader> BurstInfoExtractor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            annotation_category: ANNOTATION_CATEGORY.to_string(),
        }
    }

    pub fn with_annotation_category(mut self, category: &str) -> Self {
        self.annotation_category = category.to_string();
        self
    }

    pub fn annotation_category(&self) -> &str {
        &self.annotation_category
    }

    /// First annotation file of the sub-swath that exists on disk.
    ///
    /// All polarizations of a sub-swath share the same burst geometry, so any
    /// one of them will do.
    pub fn annotation_path(&self, subswath_data: &AncillaryDataPaths) -> Option<PathBuf> {
        subswath_data
            .available()
            .categories
            .remove(&self.annotation_category)
            .and_then(|paths| paths.into_values().next())
    }

    /// Burst records of a sub-swath, or `None` when no annotation file is available
    pub fn extract(
        &self,
        product_attrs: &ProductAttributes,
        subswath_data: &AncillaryDataPaths,
    ) -> SarResult<Option<BurstInfoMap>> {
        let annotation_path = match self.annotation_path(subswath_data) {
            Some(path) => path,
            None => {
                log::debug!("No {} available for sub-swath", self.annotation_category);
                return Ok(None);
            }
        };

        let relative_orbit = product_attrs.relative_orbit()?;
        log::info!("Extracting burst info from {}", annotation_path.display());
        let annotation = self.reader.read_swath_annotation(&annotation_path)?;

        let burst_info = build_burst_info(relative_orbit, &annotation)?;
        log::info!("Extracted {} bursts", burst_info.len());
        Ok(Some(burst_info))
    }
}

impl Default for BurstInfoExtractor<XmlAnnotationReader> {
    fn default() -> Self {
        Self::new(XmlAnnotationReader)
    }
}

/// Combine annotation burst geometry with GCP-derived centres.
///
/// Identifiers that collide overwrite earlier bursts.
pub fn build_burst_info(relative_orbit: u32, annotation: &SwathAnnotation) -> SarResult<BurstInfoMap> {
    let gcp = &annotation.gcp;
    if annotation.bursts.len() != gcp.burst_count {
        return Err(SarError::Metadata(format!(
            "Annotation lists {} bursts but GCP grid spans {}",
            annotation.bursts.len(),
            gcp.burst_count
        )));
    }

    let centres = compute_burst_centre(gcp)?;
    let mut burst_info = BTreeMap::new();

    for burst in &annotation.bursts {
        let (latitude, longitude) = centres.get(burst.burst_pos).ok_or_else(|| {
            SarError::Metadata(format!(
                "Burst position {} outside GCP grid of {} bursts",
                burst.burst_pos, gcp.burst_count
            ))
        })?;
        if burst.lines_per_burst == 0 || burst.samples_per_burst == 0 {
            return Err(SarError::Metadata(format!(
                "Burst {} has empty extent ({} lines, {} samples)",
                burst.burst_pos, burst.lines_per_burst, burst.samples_per_burst
            )));
        }

        let burst_id = BurstId::new(relative_orbit, latitude, longitude)?;
        let first_line = burst.burst_pos * burst.lines_per_burst;
        let record = BurstInfoRecord {
            burst_pos: burst.burst_pos,
            burst_first_line: first_line,
            burst_last_line: first_line + burst.lines_per_burst,
            burst_first_pixel: 0,
            burst_last_pixel: burst.samples_per_burst - 1,
            burst_centre_latitude: latitude,
            burst_centre_longitude: longitude,
        };

        if burst_info.insert(burst_id, record).is_some() {
            log::warn!("Burst id {} is shared by more than one burst", burst_id);
        }
    }

    Ok(burst_info)
}

/// Burst records of a sub-swath read from its annotation XML
pub fn get_burst_info(
    product_attrs: &ProductAttributes,
    subswath_data: &AncillaryDataPaths,
) -> SarResult<Option<BurstInfoMap>> {
    BurstInfoExtractor::default().extract(product_attrs, subswath_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BurstGeometry, GcpGrid, Polarization};
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn two_burst_annotation() -> SwathAnnotation {
        let lat = array![[47.2, 47.0], [47.0, 46.8], [46.8, 46.6]];
        let lon = array![[11.9, 11.7], [11.85, 11.65], [11.8, 11.6]];
        SwathAnnotation {
            gcp: GcpGrid::new(lat, lon, 2).unwrap(),
            bursts: (0..2)
                .map(|burst_pos| BurstGeometry {
                    burst_pos,
                    lines_per_burst: 1500,
                    samples_per_burst: 21632,
                })
                .collect(),
        }
    }

    struct FixedReader {
        calls: AtomicUsize,
    }

    impl AnnotationReader for FixedReader {
        fn read_swath_annotation(&self, _path: &Path) -> SarResult<SwathAnnotation> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(two_burst_annotation())
        }
    }

    #[test]
    fn test_build_burst_info() {
        let info = build_burst_info(168, &two_burst_annotation()).unwrap();
        assert_eq!(info.len(), 2);

        let first = &info[&"R168-N470-E0118".parse::<BurstId>().unwrap()];
        assert_eq!(first.burst_pos, 0);
        assert_eq!(first.burst_first_line, 0);
        assert_eq!(first.burst_last_line, 1500);
        assert_eq!(first.burst_first_pixel, 0);
        assert_eq!(first.burst_last_pixel, 21631);
        assert_abs_diff_eq!(first.burst_centre_latitude, 47.0, epsilon = 1e-9);
        assert_abs_diff_eq!(first.burst_centre_longitude, 11.775, epsilon = 1e-9);

        let second = &info[&"R168-N468-E0117".parse::<BurstId>().unwrap()];
        assert_eq!(second.burst_pos, 1);
        assert_eq!(second.burst_first_line, 1500);
        assert_eq!(second.burst_last_line, 3000);
    }

    #[test]
    fn test_colliding_burst_ids_keep_last_burst() {
        let annotation = SwathAnnotation {
            gcp: GcpGrid::new(array![[10.0], [10.0], [10.0]], array![[20.0], [20.0], [20.0]], 2).unwrap(),
            bursts: (0..2)
                .map(|burst_pos| BurstGeometry {
                    burst_pos,
                    lines_per_burst: 10,
                    samples_per_burst: 20,
                })
                .collect(),
        };

        let info = build_burst_info(3, &annotation).unwrap();
        assert_eq!(info.len(), 1);
        let record = &info[&"R003-N100-E0200".parse::<BurstId>().unwrap()];
        assert_eq!(record.burst_pos, 1);
        assert_eq!(record.burst_first_line, 10);
        assert_eq!(record.burst_last_line, 20);
    }

    #[test]
    fn test_burst_count_mismatch_is_fatal() {
        let mut annotation = two_burst_annotation();
        annotation.bursts.pop();
        assert!(matches!(build_burst_info(1, &annotation), Err(SarError::Metadata(_))));

        let mut annotation = two_burst_annotation();
        annotation.bursts[1].burst_pos = 5;
        assert!(matches!(build_burst_info(1, &annotation), Err(SarError::Metadata(_))));
    }

    #[test]
    fn test_missing_annotation_yields_none() {
        let reader = FixedReader { calls: AtomicUsize::new(0) };
        let extractor = BurstInfoExtractor::new(reader);
        let mut paths = AncillaryDataPaths::new();
        paths.insert(ANNOTATION_CATEGORY, Polarization::VV, "/nonexistent/s1b-iw1-slc-vv.xml");

        let attrs = ProductAttributes::with_relative_orbit(168);
        assert!(extractor.extract(&attrs, &paths).unwrap().is_none());
        assert!(extractor.extract(&attrs, &AncillaryDataPaths::new()).unwrap().is_none());
        assert_eq!(extractor.reader.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_extract_reads_one_polarization() {
        let dir = tempfile::TempDir::new().unwrap();
        let vh = dir.path().join("s1b-iw1-slc-vh.xml");
        let vv = dir.path().join("s1b-iw1-slc-vv.xml");
        std::fs::write(&vh, "").unwrap();
        std::fs::write(&vv, "").unwrap();

        let mut paths = AncillaryDataPaths::new();
        paths.insert(ANNOTATION_CATEGORY, Polarization::VV, &vv);
        paths.insert(ANNOTATION_CATEGORY, Polarization::VH, &vh);

        let extractor = BurstInfoExtractor::new(FixedReader { calls: AtomicUsize::new(0) });
        let attrs = ProductAttributes::with_relative_orbit(168);
        let first = extractor.extract(&attrs, &paths).unwrap().unwrap();
        let second = extractor.extract(&attrs, &paths).unwrap().unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(extractor.reader.calls.load(Ordering::SeqCst), 2);
    }
}

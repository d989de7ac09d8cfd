use crate::core::burst_id::BurstId;
use crate::core::burst_info::{BurstInfoExtractor, ANNOTATION_CATEGORY};
use crate::io::annotation::{AnnotationReader, XmlAnnotationReader};
use crate::types::{AncillaryDataPaths, ProductAttributes, ProductPaths, SarError, SarResult};
use std::collections::BTreeSet;

/// Catalog construction parameters
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Ancillary category whose files decide whether a sub-swath is present
    pub annotation_category: String,
    /// Datasets exposed under every present sub-swath
    pub ancillary_groups: Vec<String>,
    /// Build sub-swaths concurrently (requires the `parallel` feature)
    pub parallel: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            annotation_category: ANNOTATION_CATEGORY.to_string(),
            ancillary_groups: vec!["attitude".to_string(), "gcp".to_string(), "orbit".to_string()],
            parallel: true,
        }
    }
}

/// Kind of dataset a group name refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupName {
    /// Bare sub-swath, e.g. `IW1`
    Swath(String),
    /// Per-swath ancillary dataset, e.g. `IW1/orbit`
    Ancillary { swath: String, dataset: String },
    /// Single burst, e.g. `IW1/R168-N471-E0118`
    Burst { swath: String, burst_id: BurstId },
}

impl GroupName {
    /// Classify a slash-delimited group name
    pub fn parse(name: &str) -> SarResult<Self> {
        let mut parts = name.split('/');
        let swath = match parts.next() {
            Some(swath) if !swath.is_empty() => swath.to_string(),
            _ => return Err(SarError::InvalidFormat(format!("Empty group name: '{}'", name))),
        };

        match (parts.next(), parts.next()) {
            (None, _) => Ok(GroupName::Swath(swath)),
            (Some(leaf), None) if !leaf.is_empty() => match leaf.parse::<BurstId>() {
                Ok(burst_id) => Ok(GroupName::Burst { swath, burst_id }),
                Err(_) => Ok(GroupName::Ancillary {
                    swath,
                    dataset: leaf.to_string(),
                }),
            },
            _ => Err(SarError::InvalidFormat(format!("Unsupported group name: '{}'", name))),
        }
    }

    pub fn swath(&self) -> &str {
        match self {
            GroupName::Swath(swath) => swath,
            GroupName::Ancillary { swath, .. } => swath,
            GroupName::Burst { swath, .. } => swath,
        }
    }
}

impl std::fmt::Display for GroupName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupName::Swath(swath) => write!(f, "{}", swath),
            GroupName::Ancillary { swath, dataset } => write!(f, "{}/{}", swath, dataset),
            GroupName::Burst { swath, burst_id } => write!(f, "{}/{}", swath, burst_id),
        }
    }
}

/// Enumerates the logical groups a product can expose
#[derive(Debug, Clone)]
pub struct GroupCatalogBuilder<R> {
    extractor: BurstInfoExtractor<R>,
    config: CatalogConfig,
}

impl<R: AnnotationReader> GroupCatalogBuilder<R> {
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, CatalogConfig::default())
    }

    pub fn with_config(reader: R, config: CatalogConfig) -> Self {
        let extractor = BurstInfoExtractor::new(reader).with_annotation_category(&config.annotation_category);
        Self { extractor, config }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Group names of every sub-swath that has at least one annotation file.
    ///
    /// Sub-swaths without annotation contribute nothing, not even their bare
    /// name.
    pub fn find_available_groups(
        &self,
        product_paths: &ProductPaths,
        product_attrs: &ProductAttributes,
    ) -> SarResult<BTreeSet<String>> {
        let per_swath: Vec<Vec<String>> = if self.run_parallel() {
            self.collect_parallel(product_paths, product_attrs)?
        } else {
            product_paths
                .iter()
                .map(|(swath, data)| self.swath_groups(swath, data, product_attrs))
                .collect::<SarResult<_>>()?
        };

        let groups: BTreeSet<String> = per_swath.into_iter().flatten().collect();
        log::info!(
            "Catalog lists {} groups across {} sub-swaths",
            groups.len(),
            product_paths.len()
        );
        Ok(groups)
    }

    #[cfg(feature = "parallel")]
    fn run_parallel(&self) -> bool {
        self.config.parallel
    }

    #[cfg(not(feature = "parallel"))]
    fn run_parallel(&self) -> bool {
        false
    }

    #[cfg(feature = "parallel")]
    fn collect_parallel(
        &self,
        product_paths: &ProductPaths,
        product_attrs: &ProductAttributes,
    ) -> SarResult<Vec<Vec<String>>> {
        use rayon::prelude::*;

        product_paths
            .par_iter()
            .map(|(swath, data)| self.swath_groups(swath, data, product_attrs))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn collect_parallel(
        &self,
        _product_paths: &ProductPaths,
        _product_attrs: &ProductAttributes,
    ) -> SarResult<Vec<Vec<String>>> {
        Ok(Vec::new())
    }

    /// Groups contributed by one sub-swath
    fn swath_groups(
        &self,
        swath: &str,
        subswath_data: &AncillaryDataPaths,
        product_attrs: &ProductAttributes,
    ) -> SarResult<Vec<String>> {
        let swath_name = swath.to_uppercase();
        let burst_info = match self.extractor.extract(product_attrs, subswath_data)? {
            Some(burst_info) => burst_info,
            None => {
                log::warn!("Sub-swath {} has no available annotation, skipping", swath_name);
                return Ok(Vec::new());
            }
        };

        let mut groups = Vec::with_capacity(1 + self.config.ancillary_groups.len() + burst_info.len());
        groups.push(GroupName::Swath(swath_name.clone()).to_string());
        groups.extend(self.config.ancillary_groups.iter().map(|dataset| {
            GroupName::Ancillary {
                swath: swath_name.clone(),
                dataset: dataset.clone(),
            }
            .to_string()
        }));
        groups.extend(burst_info.into_keys().map(|burst_id| {
            GroupName::Burst {
                swath: swath_name.clone(),
                burst_id,
            }
            .to_string()
        }));

        log::debug!("Sub-swath {} exposes {} groups", swath_name, groups.len());
        Ok(groups)
    }
}

impl Default for GroupCatalogBuilder<XmlAnnotationReader> {
    fn default() -> Self {
        Self::new(XmlAnnotationReader)
    }
}

/// Group names of a product whose annotation files are Sentinel-1 XML on disk
pub fn find_available_groups(
    product_paths: &ProductPaths,
    product_attrs: &ProductAttributes,
) -> SarResult<BTreeSet<String>> {
    GroupCatalogBuilder::default().find_available_groups(product_paths, product_attrs)
}

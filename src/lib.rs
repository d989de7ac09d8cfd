//! sarindex: geolocation-keyed burst catalog for Sentinel-1 SLC products
//!
//! Sub-swaths of a Level-1 product are split into bursts; this library names
//! every burst by orbit and rounded geographic centre (`R168-N471-E0118`) and
//! lists the logical groups (`IW1`, `IW1/orbit`, `IW1/R168-N471-E0118`, ...)
//! that a lazy dataset backend can open on demand.

pub mod types;
pub mod io;
pub mod core;

#[cfg(feature = "python")]
mod python;

// Re-export main types and functions for easier access
pub use crate::types::{
    AncillaryDataPaths, AttributeValue, BurstCentres, BurstGeometry, BurstInfoRecord, GcpGrid,
    Polarization, ProductAttributes, ProductPaths, SarError, SarResult, SwathAnnotation,
};

pub use crate::io::{filter_missing_path, AnnotationReader, XmlAnnotationReader};
pub use crate::core::{
    build_burst_id, compute_burst_centre, find_available_groups, get_burst_info, BurstId,
    BurstInfoExtractor, CatalogConfig, GroupCatalogBuilder, GroupName,
};

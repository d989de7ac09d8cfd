//! Burst geolocation and group catalog

pub mod burst_centre;
pub mod burst_id;
pub mod burst_info;
pub mod catalog;

// Re-export main types
pub use burst_centre::compute_burst_centre;
pub use burst_id::{build_burst_id, BurstId};
pub use burst_info::{build_burst_info, get_burst_info, BurstInfoExtractor, BurstInfoMap, ANNOTATION_CATEGORY};
pub use catalog::{find_available_groups, CatalogConfig, GroupCatalogBuilder, GroupName};

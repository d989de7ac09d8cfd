//! I/O modules: ancillary file availability and annotation reading

pub mod annotation;
pub mod paths;

pub use annotation::{AnnotationParser, AnnotationReader, XmlAnnotationReader};
pub use paths::filter_missing_path;

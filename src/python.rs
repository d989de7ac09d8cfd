//! Python bindings for the lazy dataset backend

use crate::types::{AncillaryDataPaths, AttributeValue, GcpGrid, Polarization, ProductAttributes, SarError};
use numpy::{IntoPyArray, PyArray1, PyReadonlyArray2};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict};
use std::collections::BTreeMap;
use std::path::PathBuf;

type PyNestedPaths = BTreeMap<String, BTreeMap<String, PathBuf>>;

impl From<SarError> for PyErr {
    fn from(err: SarError) -> PyErr {
        match err {
            SarError::InvalidFormat(_) | SarError::InvalidCoordinate(_) | SarError::MissingAttribute(_) => {
                PyValueError::new_err(err.to_string())
            }
            _ => PyRuntimeError::new_err(err.to_string()),
        }
    }
}

/// Python module definition
#[pymodule]
fn _core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(filter_missing_path, m)?)?;
    m.add_function(wrap_pyfunction!(build_burst_id, m)?)?;
    m.add_function(wrap_pyfunction!(compute_burst_centre, m)?)?;
    m.add_function(wrap_pyfunction!(get_burst_info, m)?)?;
    m.add_function(wrap_pyfunction!(find_available_groups, m)?)?;
    Ok(())
}

fn product_attributes(attrs: &PyDict) -> PyResult<ProductAttributes> {
    let mut product_attrs = ProductAttributes::new();
    for (key, value) in attrs.iter() {
        let key: String = key.extract()?;
        let value = if let Ok(flag) = value.downcast::<PyBool>() {
            AttributeValue::Bool(flag.is_true())
        } else if let Ok(int) = value.extract::<i64>() {
            AttributeValue::Int(int)
        } else if let Ok(float) = value.extract::<f64>() {
            AttributeValue::Float(float)
        } else {
            AttributeValue::Text(value.str()?.to_string())
        };
        product_attrs.insert(&key, value);
    }
    Ok(product_attrs)
}

fn ancillary_paths(data: PyNestedPaths) -> PyResult<AncillaryDataPaths> {
    let mut paths = AncillaryDataPaths::new();
    for (category, entries) in data {
        paths.categories.entry(category.clone()).or_default();
        for (pol, path) in entries {
            paths.insert(&category, pol.parse::<Polarization>()?, path);
        }
    }
    Ok(paths)
}

#[pyfunction]
fn filter_missing_path(py: Python, paths: PyNestedPaths) -> PyNestedPaths {
    py.allow_threads(|| crate::io::filter_missing_path(&paths))
}

#[pyfunction]
fn build_burst_id(product_attrs: &PyDict, latitude: f64, longitude: f64) -> PyResult<String> {
    let attrs = product_attributes(product_attrs)?;
    Ok(crate::core::build_burst_id(&attrs, latitude, longitude)?.to_string())
}

/// Returns (latitude, longitude) arrays of length `burst_count`
#[pyfunction]
fn compute_burst_centre<'py>(
    py: Python<'py>,
    latitude: PyReadonlyArray2<f64>,
    longitude: PyReadonlyArray2<f64>,
    burst_count: usize,
) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>)> {
    let gcp = GcpGrid::new(latitude.as_array().to_owned(), longitude.as_array().to_owned(), burst_count)?;
    let centres = crate::core::compute_burst_centre(&gcp)?;
    Ok((centres.latitude.into_pyarray(py), centres.longitude.into_pyarray(py)))
}

#[pyfunction]
fn get_burst_info(py: Python, product_attrs: &PyDict, subswath_data: PyNestedPaths) -> PyResult<Option<PyObject>> {
    let attrs = product_attributes(product_attrs)?;
    let paths = ancillary_paths(subswath_data)?;
    let burst_info = py.allow_threads(|| crate::core::get_burst_info(&attrs, &paths))?;

    let burst_info = match burst_info {
        Some(burst_info) => burst_info,
        None => return Ok(None),
    };

    let out = PyDict::new(py);
    for (burst_id, record) in burst_info {
        let entry = PyDict::new(py);
        entry.set_item("burst_centre_latitude", record.burst_centre_latitude)?;
        entry.set_item("burst_centre_longitude", record.burst_centre_longitude)?;
        entry.set_item("burst_pos", record.burst_pos)?;
        entry.set_item("burst_first_line", record.burst_first_line)?;
        entry.set_item("burst_last_line", record.burst_last_line)?;
        entry.set_item("burst_first_pixel", record.burst_first_pixel)?;
        entry.set_item("burst_last_pixel", record.burst_last_pixel)?;
        out.set_item(burst_id.to_string(), entry)?;
    }
    Ok(Some(out.to_object(py)))
}

#[pyfunction]
fn find_available_groups(
    py: Python,
    ancillary_data_paths: BTreeMap<String, PyNestedPaths>,
    product_attrs: &PyDict,
) -> PyResult<Vec<String>> {
    let attrs = product_attributes(product_attrs)?;
    let product_paths = ancillary_data_paths
        .into_iter()
        .map(|(swath, data)| Ok((swath, ancillary_paths(data)?)))
        .collect::<PyResult<BTreeMap<_, _>>>()?;

    let groups = py.allow_threads(|| crate::core::find_available_groups(&product_paths, &attrs))?;
    Ok(groups.into_iter().collect())
}

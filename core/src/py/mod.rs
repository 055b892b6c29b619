// Python-binding (maturin). Tynt lag over `json_api`: JSON-streng inn,
// JSON-streng ut, feil som ValueError med sti til feltet som feilet.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::error::MetricsError;
use crate::json_api;
use crate::telemetry;

fn to_py_err(e: MetricsError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

#[pyfunction]
fn sleep_series_json(json_str: &str) -> PyResult<String> {
    json_api::sleep_series_from_json(json_str).map_err(to_py_err)
}

#[pyfunction]
fn readiness_json(json_str: &str) -> PyResult<String> {
    json_api::readiness_from_json(json_str).map_err(to_py_err)
}

#[pyfunction]
fn team_stats_json(py: Python<'_>, json_str: &str) -> PyResult<String> {
    // Kohortberegningen holder ikke GIL
    let owned = json_str.to_string();
    py.allow_threads(move || json_api::team_stats_from_json(&owned))
        .map_err(to_py_err)
}

#[pyfunction]
fn trait_scores_json(json_str: &str) -> PyResult<String> {
    json_api::trait_scores_from_json(json_str).map_err(to_py_err)
}

#[pyfunction]
fn metrics_text() -> String {
    telemetry::gather_text()
}

pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(sleep_series_json, m)?)?;
    m.add_function(wrap_pyfunction!(readiness_json, m)?)?;
    m.add_function(wrap_pyfunction!(team_stats_json, m)?)?;
    m.add_function(wrap_pyfunction!(trait_scores_json, m)?)?;
    m.add_function(wrap_pyfunction!(metrics_text, m)?)?;
    Ok(())
}

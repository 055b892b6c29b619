//! RecoveryGraph core: avledede metrikker for restitusjon og genetikk.
//!
//! Søvnrekonstruksjon, readiness, lagaggregat og genetisk trekkscore.
//! Alle beregninger er rene funksjoner over data som allerede er hentet.

pub mod cohort;
pub mod config;
pub mod error;
pub mod genetics;
pub mod json_api;
pub mod readiness;
pub mod roster;
pub mod sleep;
pub mod storage;
pub mod telemetry;
pub mod types;

#[cfg(feature = "python")]
mod py;

pub use cohort::{AlertClassifier, BiometricHistoryProvider, CohortAggregator, NoAlerts};
pub use config::{EngineCfg, ReadinessCfg, ReadinessWeights, RecencyCfg};
pub use error::{MetricsError, MetricsResult};
pub use genetics::{GeneCatalog, GeneticTraitScorer};
pub use roster::{Athlete, Roster};
pub use sleep::{aggregate_by_date, duration_hours, parse_clock_time, sleep_for_date};
pub use storage::{load_catalog, load_config, save_catalog, save_config};
pub use types::*;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn recoverygraph_core(_py: Python, m: &PyModule) -> PyResult<()> {
    py::register(m)
}

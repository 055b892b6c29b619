//! Prometheus-tellere for degraderte beregningsstier.
//!
//! Kjernen installerer ingen exporter selv; vertsprosessen henter tekstformat
//! via [`gather_text`] eller registrerer [`registry`] i sin egen server.

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// Tellerne kjernen eier, registrert samlet.
struct CoreCounters {
    cohort_fetch_failures: IntCounter,
    unknown_impact: IntCounter,
    readiness_no_data: IntCounter,
    payload_parse_errors: IntCounter,
}

fn registered(registry: &Registry, name: &str, help: &str) -> prometheus::Result<IntCounter> {
    let c = IntCounter::new(name, help)?;
    registry.register(Box::new(c.clone()))?;
    Ok(c)
}

impl CoreCounters {
    fn new(registry: &Registry) -> prometheus::Result<Self> {
        Ok(Self {
            cohort_fetch_failures: registered(
                registry,
                "recoverygraph_cohort_fetch_failures_total",
                "Per-athlete history fetches that failed during cohort aggregation",
            )?,
            unknown_impact: registered(
                registry,
                "recoverygraph_unknown_impact_total",
                "Gene/genotype pairs not found in any category table",
            )?,
            readiness_no_data: registered(
                registry,
                "recoverygraph_readiness_no_data_total",
                "Readiness lookups where no record produced a non-zero score",
            )?,
            payload_parse_errors: registered(
                registry,
                "recoverygraph_payload_parse_errors_total",
                "Genotype payload entries dropped as unparseable",
            )?,
        })
    }
}

// Feiler registreringen logges det én gang; beregningene går videre uten tellere.
static COUNTERS: Lazy<Option<CoreCounters>> = Lazy::new(|| match CoreCounters::new(&REGISTRY) {
    Ok(c) => Some(c),
    Err(e) => {
        log::warn!("telemetry counters not registered: {e}");
        None
    }
});

fn bump(pick: fn(&CoreCounters) -> &IntCounter) {
    if let Some(c) = COUNTERS.as_ref() {
        pick(c).inc();
    }
}

pub fn record_cohort_fetch_failure() {
    bump(|c| &c.cohort_fetch_failures);
}

pub fn record_unknown_impact() {
    bump(|c| &c.unknown_impact);
}

pub fn record_readiness_no_data() {
    bump(|c| &c.readiness_no_data);
}

pub fn record_payload_parse_error() {
    bump(|c| &c.payload_parse_errors);
}

pub fn registry() -> &'static Registry {
    // Sørg for at tellerne er registrert før første gather
    Lazy::force(&COUNTERS);
    &REGISTRY
}

/// Prometheus tekstformat for alle kjernetellere.
pub fn gather_text() -> String {
    let mut buf = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(e) = encoder.encode(&registry().gather(), &mut buf) {
        log::warn!("telemetry encode failed: {e}");
        return String::new();
    }
    String::from_utf8(buf).unwrap_or_default()
}

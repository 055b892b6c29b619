// JSON inn / JSON ut for presentasjonsflatene (Python-bindingen bruker disse).
//
// Alle visninger går gjennom de samme beregningene her; ingen flate skal ha
// sin egen kopi av søvn- eller readiness-logikken.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use serde_path_to_error as spte;

use crate::cohort::{AlertClassifier, BiometricHistoryProvider, CohortAggregator};
use crate::config::EngineCfg;
use crate::error::{MetricsError, MetricsResult};
use crate::genetics::{default_traits, normalize_profile, CategorySummary, GeneCatalog, GeneticTraitScorer};
use crate::readiness::{breakdown, latest_readiness, trend};
use crate::roster::Athlete;
use crate::sleep::{aggregate_by_date, series_for_range};
use crate::types::{BiometricRecord, TraitDefinition};

fn parse_input<T: DeserializeOwned>(json_in: &str) -> MetricsResult<T> {
    let de = &mut serde_json::Deserializer::from_str(json_in);
    spte::deserialize(de).map_err(|e| MetricsError::InvalidPayload {
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })
}

fn to_json<T: Serialize>(v: &T) -> MetricsResult<String> {
    serde_json::to_string(v).map_err(|e| MetricsError::Parse(e.to_string()))
}

// ──────────────────────────────────────────────────────────────────────────────
// Søvn
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SleepIn {
    records: Vec<BiometricRecord>,
    #[serde(default)]
    start: Option<NaiveDate>,
    #[serde(default)]
    end: Option<NaiveDate>,
}

/// `{records, start?, end?}` -> `[SleepDay]` (nullfylt når start/end er satt).
pub fn sleep_series_from_json(json_in: &str) -> MetricsResult<String> {
    let input: SleepIn = parse_input(json_in)?;
    let days = match (input.start, input.end) {
        (Some(s), Some(e)) => series_for_range(&input.records, s, e),
        _ => aggregate_by_date(&input.records),
    };
    to_json(&days)
}

// ──────────────────────────────────────────────────────────────────────────────
// Readiness
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ReadinessIn {
    athlete_id: String,
    records: Vec<BiometricRecord>,
    #[serde(default)]
    cfg: Option<EngineCfg>,
}

/// Siste ikke-null readiness med nedbrytning og trend.
pub fn readiness_from_json(json_in: &str) -> MetricsResult<String> {
    let input: ReadinessIn = parse_input(json_in)?;
    let cfg = input.cfg.unwrap_or_default();
    let latest = latest_readiness(&input.athlete_id, &input.records, &cfg.readiness);

    let detail = latest.as_ref().and_then(|s| {
        input
            .records
            .iter()
            .filter(|r| r.date == s.date)
            .map(|r| breakdown(&input.records, r, &cfg.readiness))
            .max_by_key(|b| b.value)
    });

    to_json(&json!({
        "athlete_id": input.athlete_id,
        "value": latest.as_ref().map(|s| s.value).unwrap_or(0),
        "date": latest.as_ref().map(|s| s.date),
        "breakdown": detail,
        "trend": trend(&input.records, &cfg.readiness),
    }))
}

// ──────────────────────────────────────────────────────────────────────────────
// Lag
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TeamIn {
    today: NaiveDate,
    roster: Vec<Athlete>,
    // Rå per utøver: en ugyldig historikk skal bare ramme den ene utøveren
    #[serde(default)]
    histories: HashMap<String, Value>,
    #[serde(default)]
    alerts: HashMap<String, String>,
    #[serde(default)]
    cfg: Option<EngineCfg>,
}

/// Historikk slik klienten sender den: liste med registreringer eller `{"error": ...}`.
fn parse_history(raw: &Value) -> Result<Vec<BiometricRecord>, String> {
    if let Some(error) = raw.get("error") {
        return Err(error.as_str().map(str::to_string).unwrap_or_else(|| error.to_string()));
    }
    spte::deserialize(raw).map_err(|e| format!("invalid history at `{}`: {}", e.path(), e.inner()))
}

struct SuppliedHistories<'a>(&'a HashMap<String, Value>);

impl BiometricHistoryProvider for SuppliedHistories<'_> {
    fn history(&self, athlete_id: &str) -> MetricsResult<Vec<BiometricRecord>> {
        let raw = self
            .0
            .get(athlete_id)
            .ok_or_else(|| MetricsError::upstream(athlete_id, "no history supplied"))?;
        parse_history(raw).map_err(|reason| MetricsError::upstream(athlete_id, reason))
    }
}

struct SuppliedAlerts<'a>(&'a HashMap<String, String>);

impl AlertClassifier for SuppliedAlerts<'_> {
    fn alert_tag(&self, athlete_id: &str, _latest: Option<&BiometricRecord>) -> Option<String> {
        self.0.get(athlete_id).cloned()
    }
}

pub fn team_stats_from_json(json_in: &str) -> MetricsResult<String> {
    let input: TeamIn = parse_input(json_in)?;
    let cfg = input.cfg.unwrap_or_default();
    let summary = CohortAggregator::new(&cfg, input.today).aggregate(
        &input.roster,
        &SuppliedHistories(&input.histories),
        &SuppliedAlerts(&input.alerts),
    );
    to_json(&summary)
}

// ──────────────────────────────────────────────────────────────────────────────
// Genetikk
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TraitsIn {
    profile: Vec<CategorySummary>,
    #[serde(default)]
    traits: Option<Vec<TraitDefinition>>,
    #[serde(default)]
    catalog: Option<GeneCatalog>,
}

pub fn trait_scores_from_json(json_in: &str) -> MetricsResult<String> {
    let input: TraitsIn = parse_input(json_in)?;
    let catalog = input.catalog.unwrap_or_else(|| GeneCatalog::builtin().clone());
    let scorer = GeneticTraitScorer::new(&catalog);
    let observations = normalize_profile(&input.profile);
    let traits: &[TraitDefinition] = match &input.traits {
        Some(t) => t,
        None => default_traits(),
    };

    to_json(&json!({
        "observations": observations,
        "traits": scorer.score_traits(&observations, traits),
        "categories": scorer.category_coverage(&observations),
    }))
}

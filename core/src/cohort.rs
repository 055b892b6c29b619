//! Lagnivå-aggregat over en utøverstall.
//!
//! Hver utøver hentes og beregnes uavhengig. Feiler én henting, erstattes
//! utøveren lokalt med en "ukjent"-rad; resten av kohorten beregnes som
//! normalt. Sekvensiell og parallell kjøring gir identisk resultat.

use chrono::NaiveDate;
use rayon::prelude::*;

use crate::config::{EngineCfg, RecencyCfg};
use crate::error::MetricsResult;
use crate::readiness::latest_nonzero;
use crate::roster::Athlete;
use crate::sleep::sleep_for_date;
use crate::telemetry;
use crate::types::{
    positive, AlertBucket, AlertCounts, AthleteMetrics, BiometricRecord, FetchStatus, Recency,
    TeamStatsSummary,
};

/// Leverandør av biometrisk historikk per utøver (ekstern samarbeidspart).
pub trait BiometricHistoryProvider {
    fn history(&self, athlete_id: &str) -> MetricsResult<Vec<BiometricRecord>>;
}

/// Regelmotor for varsler; kun taggen brukes her.
pub trait AlertClassifier {
    fn alert_tag(&self, athlete_id: &str, latest: Option<&BiometricRecord>) -> Option<String>;
}

/// Klassifiserer ingenting (for visninger uten varselregler).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAlerts;

impl AlertClassifier for NoAlerts {
    fn alert_tag(&self, _athlete_id: &str, _latest: Option<&BiometricRecord>) -> Option<String> {
        None
    }
}

/// Fast tag -> bøtte-mapping. Ukjente tagger telles ikke.
pub fn alert_bucket(tag: &str) -> Option<AlertBucket> {
    match tag.trim().to_lowercase().as_str() {
        "critical" | "high" | "overtraining" | "injury_risk" => Some(AlertBucket::High),
        "warning" | "medium" | "moderate" | "monitor" => Some(AlertBucket::Medium),
        "optimal" | "ok" | "normal" | "good" => Some(AlertBucket::Optimal),
        _ => None,
    }
}

/// Dager siden siste synk -> visningsstatus.
pub fn classify_recency(last: Option<NaiveDate>, today: NaiveDate, cfg: &RecencyCfg) -> Recency {
    let Some(last) = last else { return Recency::Stale };
    let days = (today - last).num_days();
    if days < cfg.warn_after_days {
        Recency::Fresh
    } else if days <= cfg.stale_after_days {
        Recency::Warn
    } else {
        Recency::Stale
    }
}

/// Siste dato der enheten faktisk rapporterte puls (snitt eller hvile).
pub fn last_synced_date(records: &[BiometricRecord]) -> Option<NaiveDate> {
    records.iter().filter(|r| r.has_heart_rate()).map(|r| r.date).max()
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        0.0
    } else {
        xs.iter().sum::<f64>() / xs.len() as f64
    }
}

pub struct CohortAggregator<'a> {
    cfg: &'a EngineCfg,
    today: NaiveDate,
}

impl<'a> CohortAggregator<'a> {
    pub fn new(cfg: &'a EngineCfg, today: NaiveDate) -> Self {
        Self { cfg, today }
    }

    /// Beregn én utøver fra allerede hentet historikk.
    pub fn athlete_metrics(
        &self,
        athlete: &Athlete,
        records: &[BiometricRecord],
        alerts: &dyn AlertClassifier,
    ) -> AthleteMetrics {
        // Flere registreringer kan dele siste dato (hovedsøvn + lur); foretrekk
        // den som har HRV så en lur uten puls ikke gir 0.
        let latest_date = records.iter().map(|r| r.date).max();
        let on_latest: Vec<&BiometricRecord> =
            records.iter().filter(|r| Some(r.date) == latest_date).collect();
        let latest = on_latest
            .iter()
            .copied()
            .find(|r| positive(r.hrv_ms).is_some())
            .or_else(|| on_latest.last().copied());
        let hrv_ms = on_latest
            .iter()
            .filter_map(|r| positive(r.hrv_ms))
            .fold(0.0, f64::max);
        let readiness = latest_nonzero(records, &self.cfg.readiness);
        let last_synced = last_synced_date(records);

        let alert = alerts
            .alert_tag(&athlete.id, latest)
            .and_then(|tag| {
                let bucket = alert_bucket(&tag);
                if bucket.is_none() {
                    log::debug!("unmapped alert tag {tag:?} for {}", athlete.id);
                }
                bucket
            });

        AthleteMetrics {
            athlete_id: athlete.id.clone(),
            name: athlete.name.clone(),
            latest_date,
            hrv_ms,
            sleep_hours: latest_date.map(|d| sleep_for_date(records, d)).unwrap_or(0.0),
            readiness,
            last_synced,
            recency: classify_recency(last_synced, self.today, &self.cfg.recency),
            alert,
            status: FetchStatus::Ok,
        }
    }

    /// Erstatningsrad når henting feiler: null/ukjent overalt.
    fn unavailable(&self, athlete: &Athlete, reason: String) -> AthleteMetrics {
        AthleteMetrics {
            athlete_id: athlete.id.clone(),
            name: athlete.name.clone(),
            latest_date: None,
            hrv_ms: 0.0,
            sleep_hours: 0.0,
            readiness: 0,
            last_synced: None,
            recency: Recency::Stale,
            alert: None,
            status: FetchStatus::Failed(reason),
        }
    }

    fn fetch_and_compute(
        &self,
        athlete: &Athlete,
        provider: &dyn BiometricHistoryProvider,
        alerts: &dyn AlertClassifier,
    ) -> AthleteMetrics {
        match provider.history(&athlete.id) {
            Ok(records) => self.athlete_metrics(athlete, &records, alerts),
            Err(e) => {
                log::warn!("history fetch failed for {}: {e}", athlete.id);
                telemetry::record_cohort_fetch_failure();
                self.unavailable(athlete, e.to_string())
            }
        }
    }

    /// Sekvensiell aggregering i stallens rekkefølge.
    pub fn aggregate(
        &self,
        roster: &[Athlete],
        provider: &dyn BiometricHistoryProvider,
        alerts: &dyn AlertClassifier,
    ) -> TeamStatsSummary {
        let rows: Vec<AthleteMetrics> = roster
            .iter()
            .map(|a| self.fetch_and_compute(a, provider, alerts))
            .collect();
        self.summarize(rows)
    }

    /// Parallell aggregering med rayon; rekkefølgen på radene bevares.
    pub fn aggregate_parallel<P, A>(&self, roster: &[Athlete], provider: &P, alerts: &A) -> TeamStatsSummary
    where
        P: BiometricHistoryProvider + Sync,
        A: AlertClassifier + Sync,
    {
        let rows: Vec<AthleteMetrics> = roster
            .par_iter()
            .map(|a| self.fetch_and_compute(a, provider, alerts))
            .collect();
        self.summarize(rows)
    }

    /// Slår sammen ferdige rader til lagssammendrag.
    pub fn summarize(&self, rows: Vec<AthleteMetrics>) -> TeamStatsSummary {
        // Bare utøvere med siste registrering og readiness > 0 teller i snittene
        let reporting: Vec<&AthleteMetrics> = rows
            .iter()
            .filter(|m| m.latest_date.is_some() && m.readiness > 0)
            .collect();

        let hrv: Vec<f64> = reporting.iter().map(|m| m.hrv_ms).collect();
        let sleep: Vec<f64> = reporting.iter().map(|m| m.sleep_hours).collect();
        let ready: Vec<f64> = reporting.iter().map(|m| m.readiness as f64).collect();

        let mut alert_counts = AlertCounts::default();
        for bucket in rows.iter().filter_map(|m| m.alert) {
            alert_counts.add(bucket);
        }

        let last_synced_date = rows.iter().filter_map(|m| m.last_synced).max();
        let failed_athletes = rows
            .iter()
            .filter(|m| matches!(m.status, FetchStatus::Failed(_)))
            .count();

        TeamStatsSummary {
            total_athletes: rows.len(),
            reporting_athletes: reporting.len(),
            failed_athletes,
            avg_hrv: mean(&hrv),
            avg_sleep: mean(&sleep),
            avg_readiness: mean(&ready),
            last_synced_date,
            recency: classify_recency(last_synced_date, self.today, &self.cfg.recency),
            alert_counts,
            athlete_metrics: rows,
        }
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::{ReadinessCfg, ReadinessWeights};
use crate::sleep::sleep_for_date;
use crate::telemetry;
use crate::types::{positive, BiometricRecord, ReadinessScore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Hrv,
    RestingHr,
    Sleep,
    Spo2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    pub component: Component,
    pub raw: f64,
    /// 0–100 mot målbåndet
    pub score: f64,
    /// Effektiv vekt etter re-vekting over tilstedeværende felt
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReadinessBreakdown {
    pub date: Option<NaiveDate>,
    pub components: Vec<ComponentScore>,
    pub value: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ReadinessTrend {
    pub last3_avg: Option<f64>,
    pub delta_vs_last3: Option<f64>,
}

/// Kombiner komponentscore ut fra vekter, re-vekt over feltene som finnes.
///
/// Felt som mangler eller er 0 er allerede filtrert bort av kalleren; de
/// trekker dermed ikke scoren ned. Summerer vektene til 0 faller vi tilbake
/// til standardvektene.
fn combine(parts: &[(Component, f64, f64)], weights: &ReadinessWeights) -> (f64, Vec<ComponentScore>) {
    let weight_of = |w: &ReadinessWeights, c: Component| match c {
        Component::Hrv => w.hrv,
        Component::RestingHr => w.resting_hr,
        Component::Sleep => w.sleep,
        Component::Spo2 => w.spo2,
    };

    let mut sum: f64 = parts.iter().map(|(c, _, _)| weight_of(weights, *c).max(0.0)).sum();
    let mut w = *weights;
    if !(sum > 0.0) {
        w = ReadinessWeights::default();
        sum = parts.iter().map(|(c, _, _)| weight_of(&w, *c)).sum();
    }
    if !(sum > 0.0) {
        return (0.0, Vec::new());
    }

    let mut total = 0.0;
    let mut used = Vec::with_capacity(parts.len());
    for &(component, raw, score) in parts {
        let eff = weight_of(&w, component).max(0.0) / sum;
        total += eff * score;
        used.push(ComponentScore { component, raw, score, weight: eff });
    }
    (total.clamp(0.0, 100.0), used)
}

/// Full nedbrytning for én registrering i en serie.
///
/// Søvntimer hentes for hele rapportdatoen (lurer teller med), ikke bare
/// fra denne registreringen.
pub fn breakdown(series: &[BiometricRecord], record: &BiometricRecord, cfg: &ReadinessCfg) -> ReadinessBreakdown {
    let bands = &cfg.bands;
    let mut parts: Vec<(Component, f64, f64)> = Vec::with_capacity(4);

    if let Some(hrv) = positive(record.hrv_ms) {
        parts.push((Component::Hrv, hrv, bands.hrv_ms.score_higher_better(hrv)));
    }
    if let Some(rhr) = positive(record.resting_hr_bpm) {
        parts.push((Component::RestingHr, rhr, bands.resting_hr_bpm.score_lower_better(rhr)));
    }
    let sleep_h = sleep_for_date(series, record.date);
    if sleep_h > 0.0 {
        parts.push((Component::Sleep, sleep_h, bands.sleep_hours.score_higher_better(sleep_h)));
    }
    if let Some(spo2) = positive(record.spo2_pct) {
        parts.push((Component::Spo2, spo2, bands.spo2_pct.score_higher_better(spo2)));
    }

    let (total, components) = combine(&parts, &cfg.weights());
    ReadinessBreakdown {
        date: Some(record.date),
        components,
        value: total.round() as u8,
    }
}

/// Readiness 0–100 for én registrering.
pub fn score_record(series: &[BiometricRecord], record: &BiometricRecord, cfg: &ReadinessCfg) -> u8 {
    breakdown(series, record, cfg).value
}

fn sorted_by_date(series: &[BiometricRecord]) -> Vec<&BiometricRecord> {
    let mut out: Vec<&BiometricRecord> = series.iter().collect();
    out.sort_by_key(|r| r.date);
    out
}

/// Nyeste registrering med score > 0 (skanner bakover fra siste dato).
fn latest_nonzero_with_date(series: &[BiometricRecord], cfg: &ReadinessCfg) -> Option<(NaiveDate, u8)> {
    sorted_by_date(series)
        .into_iter()
        .rev()
        .map(|r| (r.date, score_record(series, r, cfg)))
        .find(|(_, v)| *v > 0)
}

/// Siste ikke-null readiness; 0 hvis ingen registrering gir score.
///
/// En gammel/ufullstendig synk skal ikke rapportere 0 % når en tidligere
/// natt har gyldige data.
pub fn latest_nonzero(series: &[BiometricRecord], cfg: &ReadinessCfg) -> u8 {
    match latest_nonzero_with_date(series, cfg) {
        Some((_, v)) => v,
        None => {
            telemetry::record_readiness_no_data();
            0
        }
    }
}

pub fn latest_readiness(athlete_id: &str, series: &[BiometricRecord], cfg: &ReadinessCfg) -> Option<ReadinessScore> {
    latest_nonzero_with_date(series, cfg).map(|(date, value)| ReadinessScore {
        athlete_id: athlete_id.to_string(),
        date,
        value,
    })
}

/// Én score per dato (beste registrering den dagen), kronologisk.
pub fn daily_scores(series: &[BiometricRecord], cfg: &ReadinessCfg) -> Vec<(NaiveDate, u8)> {
    let mut out: Vec<(NaiveDate, u8)> = Vec::new();
    for r in sorted_by_date(series) {
        let v = score_record(series, r, cfg);
        match out.last_mut() {
            Some((d, best)) if *d == r.date => *best = (*best).max(v),
            _ => out.push((r.date, v)),
        }
    }
    out
}

/// Siste ikke-null dagsscore mot snittet av de tre foregående.
pub fn trend(series: &[BiometricRecord], cfg: &ReadinessCfg) -> ReadinessTrend {
    let nonzero: Vec<f64> = daily_scores(series, cfg)
        .into_iter()
        .filter(|(_, v)| *v > 0)
        .map(|(_, v)| v as f64)
        .collect();

    let Some((last, earlier)) = nonzero.split_last() else {
        return ReadinessTrend::default();
    };
    let prev: Vec<f64> = earlier.iter().rev().take(3).copied().collect();
    if prev.is_empty() {
        return ReadinessTrend::default();
    }
    let avg = prev.iter().sum::<f64>() / prev.len() as f64;
    ReadinessTrend {
        last3_avg: Some(avg),
        delta_vs_last3: Some(last - avg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Band, ReadinessBands};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
    }

    #[test]
    fn zero_weights_fall_back_to_defaults() {
        let cfg = ReadinessCfg {
            weights: Some(ReadinessWeights { hrv: 0.0, resting_hr: 0.0, sleep: 0.0, spo2: 0.0 }),
            bands: ReadinessBands::default(),
        };
        let mut r = BiometricRecord::on(d(1));
        r.hrv_ms = Some(100.0);
        assert_eq!(score_record(&[r.clone()], &r, &cfg), 100);
    }

    #[test]
    fn degenerate_band_scores_zero() {
        let b = Band::new(5.0, 5.0);
        assert_eq!(b.score_higher_better(7.0), 0.0);
    }
}

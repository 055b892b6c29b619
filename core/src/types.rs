use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Én rå biometrisk registrering fra wearable (hovedsøvn eller lur).
///
/// `date` er rapportdatoen søvnen tilskrives, ikke nødvendigvis datoen
/// søvnen startet. Flere registreringer kan dele samme dato.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BiometricRecord {
    #[serde(alias = "report_date", alias = "day")]
    pub date: NaiveDate,
    #[serde(default, alias = "sleep_onset", alias = "bedtime", alias = "onset")]
    pub onset_time: Option<String>,
    #[serde(default, alias = "sleep_wake", alias = "wake", alias = "wakeup_time")]
    pub wake_time: Option<String>,
    #[serde(default, alias = "sleep_hours", alias = "sleep_duration_hours")]
    pub duration_hours: Option<f64>,
    #[serde(default, alias = "hrv")]
    pub hrv_ms: Option<f64>,
    #[serde(default, alias = "rhr", alias = "resting_hr")]
    pub resting_hr_bpm: Option<f64>,
    #[serde(default, alias = "avg_hr", alias = "heart_rate")]
    pub avg_hr_bpm: Option<f64>,
    #[serde(default, alias = "spo2")]
    pub spo2_pct: Option<f64>,
    #[serde(default, alias = "resp_rate")]
    pub respiratory_rate: Option<f64>,
    #[serde(default, alias = "temperature", alias = "skin_temp_c")]
    pub temperature_c: Option<f64>,
    #[serde(default, alias = "training_load")]
    pub training_load_pct: Option<f64>,
}

impl BiometricRecord {
    /// Tom registrering for en dato (brukes mye i tester og som byggestein).
    pub fn on(date: NaiveDate) -> Self {
        Self { date, ..Default::default() }
    }

    /// Har enheten faktisk rapportert puls denne dagen?
    pub fn has_heart_rate(&self) -> bool {
        positive(self.avg_hr_bpm).is_some() || positive(self.resting_hr_bpm).is_some()
    }
}

/// Verdier som mangler, er 0 eller ikke-finite regnes som "ikke målt".
#[inline]
pub fn positive(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite() && *x > 0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepDay {
    pub date: NaiveDate,
    pub total_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessScore {
    pub athlete_id: String,
    pub date: NaiveDate,
    pub value: u8, // 0–100
}

/// Påvirkning for ett (gen, genotype)-par.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Beneficial,
    Neutral,
    Challenging,
    Unknown,
}

impl Impact {
    /// -1 / 0 / +1 for snittberegning; ukjent teller som nøytral.
    pub fn weight(self) -> f64 {
        match self {
            Impact::Beneficial => 1.0,
            Impact::Challenging => -1.0,
            Impact::Neutral | Impact::Unknown => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactResolution {
    pub impact: Impact,
    pub description: String,
    /// Kategorien som faktisk ga treffet (None for ukjent)
    pub matched_category: Option<String>,
}

/// Kanonisk genobservasjon etter normalisering av payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneObservation {
    pub gene: String,
    pub genotype: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitDefinition {
    pub name: String,
    #[serde(alias = "genes")]
    pub gene_list: Vec<String>,
}

impl TraitDefinition {
    pub fn new(name: &str, genes: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            gene_list: genes.iter().map(|g| g.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TraitScore {
    pub trait_name: String,
    pub score: u8,
    pub beneficial_count: usize,
    pub challenging_count: usize,
    pub genes_present: usize,
}

/// Dekningsgrad og score for én genkategori.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CategoryScore {
    pub category: String,
    /// min(distinkte gener funnet, gener definert)
    pub genes_present: usize,
    pub genes_defined: usize,
    pub score: u8,
    pub beneficial_count: usize,
    pub challenging_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recency {
    Fresh,
    Warn,
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertBucket {
    High,
    Medium,
    Optimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AlertCounts {
    pub high: usize,
    pub medium: usize,
    pub optimal: usize,
}

impl AlertCounts {
    pub fn add(&mut self, bucket: AlertBucket) {
        match bucket {
            AlertBucket::High => self.high += 1,
            AlertBucket::Medium => self.medium += 1,
            AlertBucket::Optimal => self.optimal += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum FetchStatus {
    Ok,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteMetrics {
    pub athlete_id: String,
    pub name: String,
    pub latest_date: Option<NaiveDate>,
    pub hrv_ms: f64,
    pub sleep_hours: f64,
    pub readiness: u8,
    pub last_synced: Option<NaiveDate>,
    pub recency: Recency,
    pub alert: Option<AlertBucket>,
    pub status: FetchStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStatsSummary {
    pub total_athletes: usize,
    /// Utøvere med siste registrering og readiness > 0 (grunnlaget for snittene)
    pub reporting_athletes: usize,
    pub failed_athletes: usize,
    pub avg_hrv: f64,
    pub avg_sleep: f64,
    pub avg_readiness: f64,
    pub last_synced_date: Option<NaiveDate>,
    pub recency: Recency,
    pub alert_counts: AlertCounts,
    pub athlete_metrics: Vec<AthleteMetrics>,
}

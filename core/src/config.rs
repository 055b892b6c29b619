use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadinessWeights {
    pub hrv: f64,        // typ 0.35
    pub resting_hr: f64, // typ 0.25
    pub sleep: f64,      // typ 0.25
    pub spo2: f64,       // typ 0.15
}

impl Default for ReadinessWeights {
    fn default() -> Self {
        Self { hrv: 0.35, resting_hr: 0.25, sleep: 0.25, spo2: 0.15 }
    }
}

/// Målbånd for normalisering: `low` gir 0, `high` gir 100 (lineært, klemt).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// 0–100 der høyere verdi er bedre.
    pub fn score_higher_better(&self, v: f64) -> f64 {
        let span = self.high - self.low;
        if !(span > 0.0) || !v.is_finite() {
            return 0.0;
        }
        (100.0 * (v - self.low) / span).clamp(0.0, 100.0)
    }

    /// 0–100 der lavere verdi er bedre (hvilepuls).
    pub fn score_lower_better(&self, v: f64) -> f64 {
        let span = self.high - self.low;
        if !(span > 0.0) || !v.is_finite() {
            return 0.0;
        }
        (100.0 * (self.high - v) / span).clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadinessBands {
    pub hrv_ms: Band,
    pub resting_hr_bpm: Band,
    pub sleep_hours: Band,
    pub spo2_pct: Band,
}

impl Default for ReadinessBands {
    fn default() -> Self {
        Self {
            hrv_ms: Band::new(20.0, 100.0),
            resting_hr_bpm: Band::new(40.0, 80.0),
            sleep_hours: Band::new(4.0, 8.0),
            spo2_pct: Band::new(90.0, 98.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReadinessCfg {
    /// None => standardvekter
    pub weights: Option<ReadinessWeights>,
    pub bands: ReadinessBands,
}

impl ReadinessCfg {
    pub fn weights(&self) -> ReadinessWeights {
        self.weights.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecencyCfg {
    pub warn_after_days: i64,
    pub stale_after_days: i64,
}

impl Default for RecencyCfg {
    fn default() -> Self {
        Self { warn_after_days: 1, stale_after_days: 3 }
    }
}

/// Samlet konfigurasjon for beregningskjernen (lastes fra JSON via `storage`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineCfg {
    pub readiness: ReadinessCfg,
    pub recency: RecencyCfg,
}

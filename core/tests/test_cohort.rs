use std::collections::HashMap;

use chrono::NaiveDate;
use recoverygraph_core::cohort::{alert_bucket, classify_recency, last_synced_date};
use recoverygraph_core::{
    AlertBucket, AlertClassifier, Athlete, BiometricHistoryProvider, BiometricRecord,
    CohortAggregator, EngineCfg, FetchStatus, MetricsError, MetricsResult, NoAlerts, Recency,
    RecencyCfg,
};

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
}

/// Testleverandør: utøver-id -> historikk eller feilmelding.
#[derive(Default)]
struct FakeProvider {
    data: HashMap<String, Result<Vec<BiometricRecord>, String>>,
}

impl FakeProvider {
    fn ok(mut self, id: &str, records: Vec<BiometricRecord>) -> Self {
        self.data.insert(id.to_string(), Ok(records));
        self
    }

    fn failing(mut self, id: &str) -> Self {
        self.data.insert(id.to_string(), Err("timeout".to_string()));
        self
    }
}

impl BiometricHistoryProvider for FakeProvider {
    fn history(&self, athlete_id: &str) -> MetricsResult<Vec<BiometricRecord>> {
        match self.data.get(athlete_id) {
            Some(Ok(r)) => Ok(r.clone()),
            Some(Err(msg)) => Err(MetricsError::upstream(athlete_id, msg.clone())),
            None => Err(MetricsError::upstream(athlete_id, "unknown athlete")),
        }
    }
}

struct TagMap(HashMap<&'static str, &'static str>);

impl AlertClassifier for TagMap {
    fn alert_tag(&self, athlete_id: &str, _latest: Option<&BiometricRecord>) -> Option<String> {
        self.0.get(athlete_id).map(|t| t.to_string())
    }
}

fn night(day: u32, hrv: f64, rhr: f64) -> BiometricRecord {
    BiometricRecord {
        onset_time: Some("23:00".into()),
        wake_time: Some("07:00".into()),
        hrv_ms: Some(hrv),
        resting_hr_bpm: Some(rhr),
        ..BiometricRecord::on(d(day))
    }
}

fn roster() -> Vec<Athlete> {
    vec![Athlete::new("a1", "Ada"), Athlete::new("a2", "Bo"), Athlete::new("a3", "Cy")]
}

#[test]
fn one_failed_fetch_does_not_abort_aggregation() {
    let cfg = EngineCfg::default();
    let provider = FakeProvider::default()
        .ok("a1", vec![night(9, 60.0, 55.0)])
        .failing("a2")
        .ok("a3", vec![night(9, 80.0, 50.0)]);

    let summary = CohortAggregator::new(&cfg, d(10)).aggregate(&roster(), &provider, &NoAlerts);

    assert_eq!(summary.total_athletes, 3);
    assert_eq!(summary.athlete_metrics.len(), 3);
    assert_eq!(summary.failed_athletes, 1);
    assert_eq!(summary.reporting_athletes, 2);

    let failed = &summary.athlete_metrics[1];
    assert_eq!(failed.athlete_id, "a2");
    assert!(matches!(failed.status, FetchStatus::Failed(_)));
    assert_eq!(failed.readiness, 0);
    assert_eq!(failed.recency, Recency::Stale);

    // Snittet bare over de to som rapporterte
    assert!((summary.avg_hrv - 70.0).abs() < 1e-9);
    assert!((summary.avg_sleep - 8.0).abs() < 1e-9);
}

#[test]
fn unsynced_athletes_do_not_drag_averages_down() {
    let cfg = EngineCfg::default();
    let provider = FakeProvider::default()
        .ok("a1", vec![night(9, 60.0, 55.0)])
        .ok("a2", vec![]) // aldri synket
        .ok("a3", vec![BiometricRecord::on(d(9))]); // tom registrering -> readiness 0

    let summary = CohortAggregator::new(&cfg, d(9)).aggregate(&roster(), &provider, &NoAlerts);
    let a1 = &summary.athlete_metrics[0];

    assert_eq!(summary.reporting_athletes, 1);
    assert!((summary.avg_readiness - a1.readiness as f64).abs() < 1e-9);
    assert!((summary.avg_hrv - 60.0).abs() < 1e-9);
    assert_eq!(summary.failed_athletes, 0);
}

#[test]
fn nap_on_latest_date_keeps_main_sleep_hrv() {
    let cfg = EngineCfg::default();
    let nap = BiometricRecord { duration_hours: Some(0.5), ..BiometricRecord::on(d(9)) };
    let provider = FakeProvider::default().ok("a1", vec![night(9, 80.0, 50.0), nap.clone()]);
    let athletes = vec![Athlete::new("a1", "Ada")];

    let summary = CohortAggregator::new(&cfg, d(9)).aggregate(&athletes, &provider, &NoAlerts);
    let a1 = &summary.athlete_metrics[0];
    assert!(a1.readiness > 0);
    assert_eq!(a1.hrv_ms, 80.0);
    assert_eq!(summary.avg_hrv, 80.0);
    assert!((a1.sleep_hours - 8.5).abs() < 1e-9);

    // Rekkefølgen på registreringene skal ikke spille inn
    let provider = FakeProvider::default().ok("a1", vec![nap, night(9, 80.0, 50.0)]);
    let summary = CohortAggregator::new(&cfg, d(9)).aggregate(&athletes, &provider, &NoAlerts);
    assert_eq!(summary.avg_hrv, 80.0);
}

#[test]
fn empty_cohort_has_zero_averages() {
    let cfg = EngineCfg::default();
    let summary = CohortAggregator::new(&cfg, d(9)).aggregate(&[], &FakeProvider::default(), &NoAlerts);
    assert_eq!(summary.total_athletes, 0);
    assert_eq!(summary.avg_readiness, 0.0);
    assert_eq!(summary.last_synced_date, None);
    assert_eq!(summary.recency, Recency::Stale);
}

#[test]
fn last_synced_requires_heart_rate() {
    let records = vec![
        night(3, 60.0, 52.0),
        BiometricRecord { avg_hr_bpm: Some(64.0), ..BiometricRecord::on(d(5)) },
        BiometricRecord { duration_hours: Some(7.0), ..BiometricRecord::on(d(7)) }, // ingen puls
    ];
    assert_eq!(last_synced_date(&records), Some(d(5)));
    assert_eq!(last_synced_date(&[BiometricRecord::on(d(1))]), None);
}

#[test]
fn recency_thresholds() {
    let cfg = RecencyCfg::default();
    assert_eq!(classify_recency(Some(d(10)), d(10), &cfg), Recency::Fresh);
    assert_eq!(classify_recency(Some(d(9)), d(10), &cfg), Recency::Warn);
    assert_eq!(classify_recency(Some(d(7)), d(10), &cfg), Recency::Warn);
    assert_eq!(classify_recency(Some(d(6)), d(10), &cfg), Recency::Stale);
    assert_eq!(classify_recency(None, d(10), &cfg), Recency::Stale);
}

#[test]
fn team_last_synced_is_max_across_athletes() {
    let cfg = EngineCfg::default();
    let provider = FakeProvider::default()
        .ok("a1", vec![night(4, 60.0, 55.0)])
        .ok("a2", vec![night(8, 60.0, 55.0)])
        .failing("a3");
    let summary = CohortAggregator::new(&cfg, d(10)).aggregate(&roster(), &provider, &NoAlerts);
    assert_eq!(summary.last_synced_date, Some(d(8)));
    assert_eq!(summary.recency, Recency::Warn);
    assert_eq!(summary.athlete_metrics[0].recency, Recency::Stale);
}

#[test]
fn alert_tags_are_tallied_into_buckets() {
    assert_eq!(alert_bucket("Overtraining"), Some(AlertBucket::High));
    assert_eq!(alert_bucket(" monitor "), Some(AlertBucket::Medium));
    assert_eq!(alert_bucket("ok"), Some(AlertBucket::Optimal));
    assert_eq!(alert_bucket("something-else"), None);

    let cfg = EngineCfg::default();
    let provider = FakeProvider::default()
        .ok("a1", vec![night(9, 60.0, 55.0)])
        .ok("a2", vec![night(9, 40.0, 70.0)])
        .failing("a3");
    let tags = TagMap(HashMap::from([("a1", "optimal"), ("a2", "critical"), ("a3", "warning")]));

    let summary = CohortAggregator::new(&cfg, d(9)).aggregate(&roster(), &provider, &tags);
    assert_eq!(summary.alert_counts.high, 1);
    assert_eq!(summary.alert_counts.optimal, 1);
    // Feilet henting gir ingen varseltag
    assert_eq!(summary.alert_counts.medium, 0);
}

#[test]
fn parallel_and_sequential_agree() {
    let cfg = EngineCfg::default();
    let mut provider = FakeProvider::default();
    let mut athletes = Vec::new();
    for i in 0..24u32 {
        let id = format!("a{i}");
        athletes.push(Athlete::new(&id, &format!("Athlete {i}")));
        provider = if i % 5 == 0 {
            provider.failing(&id)
        } else {
            provider.ok(&id, vec![night(1 + i % 9, 40.0 + i as f64, 48.0 + (i % 7) as f64)])
        };
    }
    let tags = TagMap(HashMap::from([("a1", "high"), ("a2", "ok"), ("a3", "medium")]));

    let agg = CohortAggregator::new(&cfg, d(10));
    let seq = agg.aggregate(&athletes, &provider, &tags);
    let par = agg.aggregate_parallel(&athletes, &provider, &tags);
    assert_eq!(seq, par);
    assert_eq!(par.total_athletes, 24);
    assert_eq!(par.failed_athletes, 5);
}

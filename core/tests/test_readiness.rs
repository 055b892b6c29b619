use chrono::NaiveDate;
use recoverygraph_core::readiness::{
    breakdown, daily_scores, latest_nonzero, latest_readiness, score_record, trend, Component,
};
use recoverygraph_core::{BiometricRecord, ReadinessCfg, ReadinessWeights};

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
}

fn with_hrv(day: u32, hrv: f64) -> BiometricRecord {
    BiometricRecord { hrv_ms: Some(hrv), ..BiometricRecord::on(d(day)) }
}

fn cfg() -> ReadinessCfg {
    ReadinessCfg::default()
}

#[test]
fn latest_nonzero_skips_stale_syncs() {
    // Per-registrering score [0, 0, 62, 0], nyeste sist
    let series = vec![
        BiometricRecord::on(d(1)),
        BiometricRecord::on(d(2)),
        with_hrv(3, 69.6), // (69.6 - 20) / 80 * 100 = 62
        BiometricRecord::on(d(4)),
    ];
    let per_record: Vec<u8> = series.iter().map(|r| score_record(&series, r, &cfg())).collect();
    assert_eq!(per_record, vec![0, 0, 62, 0]);
    assert_eq!(latest_nonzero(&series, &cfg()), 62);
}

#[test]
fn latest_nonzero_is_zero_without_any_score() {
    let series = vec![BiometricRecord::on(d(1)), BiometricRecord::on(d(2))];
    assert_eq!(latest_nonzero(&series, &cfg()), 0);
    assert_eq!(latest_nonzero(&[], &cfg()), 0);
    assert!(latest_readiness("a1", &series, &cfg()).is_none());
}

#[test]
fn input_order_does_not_matter() {
    let mut series = vec![with_hrv(1, 100.0), with_hrv(2, 60.0), BiometricRecord::on(d(3))];
    let forward = latest_readiness("a1", &series, &cfg()).unwrap();
    series.reverse();
    let backward = latest_readiness("a1", &series, &cfg()).unwrap();
    assert_eq!(forward, backward);
    assert_eq!(forward.date, d(2));
    assert_eq!(forward.value, 50);
}

#[test]
fn missing_fields_are_excluded_not_zeroed() {
    let only_hrv = with_hrv(1, 100.0);
    assert_eq!(score_record(&[only_hrv.clone()], &only_hrv, &cfg()), 100);

    // Eksplisitt 0 i SpO2 betyr "ikke målt" og skal ikke trekke ned
    let zero_spo2 = BiometricRecord { spo2_pct: Some(0.0), ..only_hrv.clone() };
    assert_eq!(score_record(&[zero_spo2.clone()], &zero_spo2, &cfg()), 100);
}

#[test]
fn all_components_mid_band_score_fifty() {
    let r = BiometricRecord {
        onset_time: Some("23:00".into()),
        wake_time: Some("05:00".into()), // 6 t
        hrv_ms: Some(60.0),
        resting_hr_bpm: Some(60.0),
        spo2_pct: Some(94.0),
        ..BiometricRecord::on(d(1))
    };
    let b = breakdown(&[r.clone()], &r, &cfg());
    assert_eq!(b.value, 50);
    assert_eq!(b.components.len(), 4);
    let wsum: f64 = b.components.iter().map(|c| c.weight).sum();
    assert!((wsum - 1.0).abs() < 1e-9);
}

#[test]
fn naps_count_toward_sleep_component() {
    let main = BiometricRecord {
        onset_time: Some("23:00".into()),
        wake_time: Some("05:00".into()),
        ..BiometricRecord::on(d(1))
    };
    let nap = BiometricRecord { duration_hours: Some(1.0), ..BiometricRecord::on(d(1)) };
    let series = vec![main.clone(), nap];

    let b = breakdown(&series, &main, &cfg());
    let sleep = b.components.iter().find(|c| c.component == Component::Sleep).unwrap();
    assert!((sleep.raw - 7.0).abs() < 1e-12);
    assert_eq!(b.value, 75);
}

#[test]
fn lower_resting_hr_is_better() {
    let low = BiometricRecord { resting_hr_bpm: Some(45.0), ..BiometricRecord::on(d(1)) };
    let high = BiometricRecord { resting_hr_bpm: Some(75.0), ..BiometricRecord::on(d(1)) };
    assert!(score_record(&[low.clone()], &low, &cfg()) > score_record(&[high.clone()], &high, &cfg()));
}

#[test]
fn custom_weights_change_the_blend() {
    let r = BiometricRecord { hrv_ms: Some(100.0), spo2_pct: Some(90.0), ..BiometricRecord::on(d(1)) };
    let hrv_only = ReadinessCfg {
        weights: Some(ReadinessWeights { hrv: 1.0, resting_hr: 0.0, sleep: 0.0, spo2: 0.0 }),
        ..ReadinessCfg::default()
    };
    assert_eq!(score_record(&[r.clone()], &r, &hrv_only), 100);
    // standard: 0.35/(0.35+0.15) * 100 = 70
    assert_eq!(score_record(&[r.clone()], &r, &cfg()), 70);
}

#[test]
fn scores_stay_in_range() {
    let extreme = BiometricRecord {
        hrv_ms: Some(400.0),
        resting_hr_bpm: Some(20.0),
        duration_hours: Some(23.0),
        spo2_pct: Some(100.0),
        ..BiometricRecord::on(d(1))
    };
    assert_eq!(score_record(&[extreme.clone()], &extreme, &cfg()), 100);
}

#[test]
fn trend_compares_with_three_previous_days() {
    // 40, 50, 60, 80
    let series = vec![with_hrv(1, 52.0), with_hrv(2, 60.0), with_hrv(3, 68.0), with_hrv(4, 84.0)];
    let days = daily_scores(&series, &cfg());
    assert_eq!(days.iter().map(|(_, v)| *v).collect::<Vec<_>>(), vec![40, 50, 60, 80]);

    let t = trend(&series, &cfg());
    assert!((t.last3_avg.unwrap() - 50.0).abs() < 1e-9);
    assert!((t.delta_vs_last3.unwrap() - 30.0).abs() < 1e-9);

    let single = trend(&series[..1], &cfg());
    assert!(single.last3_avg.is_none());
}

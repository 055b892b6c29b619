use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::types::{positive, BiometricRecord, SleepDay};

const MINUTES_PER_DAY: i32 = 1440;

/// "HH:MM" (eller "HH:MM:SS") -> minutter siden midnatt.
///
/// "00:00" er sensorens "ikke registrert"-verdi og regnes som fraværende,
/// aldri som et gyldig tidspunkt.
pub fn parse_clock_time(s: Option<&str>) -> Option<u32> {
    let raw = s?.trim();
    if raw.is_empty() {
        return None;
    }
    let t = NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|e| log::debug!("unparseable clock time {raw:?}: {e}"))
        .ok()?;
    let minutes = t.hour() * 60 + t.minute();
    if minutes == 0 {
        return None;
    }
    Some(minutes)
}

/// Varighet (timer) for ett søvnsegment, alltid i [0, 24).
///
/// Onset/wake vinner når begge kan tolkes (negativ differanse = krysset
/// midnatt). Ellers brukes `fallback` hvis den er et gyldig positivt tall.
pub fn duration_hours(onset: Option<&str>, wake: Option<&str>, fallback: Option<f64>) -> f64 {
    if let (Some(on), Some(wk)) = (parse_clock_time(onset), parse_clock_time(wake)) {
        let mut minutes = wk as i32 - on as i32;
        if minutes < 0 {
            minutes += MINUTES_PER_DAY;
        }
        return minutes as f64 / 60.0;
    }
    match positive(fallback) {
        Some(h) if h < 24.0 => h,
        Some(h) => {
            log::debug!("fallback duration {h}h out of range, using 0");
            0.0
        }
        None => 0.0,
    }
}

#[inline]
pub fn record_hours(r: &BiometricRecord) -> f64 {
    duration_hours(r.onset_time.as_deref(), r.wake_time.as_deref(), r.duration_hours)
}

/// Total søvn for en rapportdato: summen av alle segmenter (hovedsøvn + lurer).
pub fn sleep_for_date(records: &[BiometricRecord], date: NaiveDate) -> f64 {
    records
        .iter()
        .filter(|r| r.date == date)
        .map(record_hours)
        .sum()
}

/// Grupperer per dato, summerer, og returnerer kronologisk uten duplikater.
pub fn aggregate_by_date(records: &[BiometricRecord]) -> Vec<SleepDay> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for r in records {
        *by_date.entry(r.date).or_insert(0.0) += record_hours(r);
    }
    by_date
        .into_iter()
        .map(|(date, total_hours)| SleepDay { date, total_hours })
        .collect()
}

/// Én SleepDay per kalenderdag i [start, end], 0 for dager uten data.
pub fn series_for_range(records: &[BiometricRecord], start: NaiveDate, end: NaiveDate) -> Vec<SleepDay> {
    if end < start {
        return Vec::new();
    }
    let known: BTreeMap<NaiveDate, f64> = aggregate_by_date(records)
        .into_iter()
        .map(|d| (d.date, d.total_hours))
        .collect();

    start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|date| SleepDay {
            date,
            total_hours: known.get(&date).copied().unwrap_or(0.0),
        })
        .collect()
}

/// Snitt over dager som faktisk har søvn registrert.
pub fn average_hours(days: &[SleepDay]) -> Option<f64> {
    let vals: Vec<f64> = days
        .iter()
        .map(|d| d.total_hours)
        .filter(|h| *h > 0.0)
        .collect();
    if vals.is_empty() {
        None
    } else {
        Some(vals.iter().sum::<f64>() / vals.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_and_garbage_are_absent() {
        assert_eq!(parse_clock_time(Some("00:00")), None);
        assert_eq!(parse_clock_time(Some("25:10")), None);
        assert_eq!(parse_clock_time(Some("")), None);
        assert_eq!(parse_clock_time(None), None);
        assert_eq!(parse_clock_time(Some(" 07:05 ")), Some(425));
        assert_eq!(parse_clock_time(Some("22:30:59")), Some(1350));
    }

    #[test]
    fn fallback_only_when_clock_missing() {
        assert_eq!(duration_hours(Some("00:00"), Some("07:00"), Some(6.5)), 6.5);
        assert_eq!(duration_hours(None, None, Some(0.0)), 0.0);
        assert_eq!(duration_hours(None, None, Some(-2.0)), 0.0);
        assert_eq!(duration_hours(None, None, Some(30.0)), 0.0);
    }
}

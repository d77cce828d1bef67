//! Synthesized sensor values. Connectivity here is simulated, so readings
//! are generated with plausible per-type behavior: flat ranges for spot
//! values and daily curves for historical series.

use crate::models::{Reading, SensorType};
use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use rand::Rng;

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// A single spot value for a sensor type, uniform within its normal range.
pub fn spot_value(kind: SensorType) -> f64 {
    let mut rng = rand::thread_rng();
    match kind {
        SensorType::Temperature => round1(rng.gen_range(18.0..26.0)),
        SensorType::Humidity => round1(rng.gen_range(30.0..70.0)),
        SensorType::Pressure => round1(rng.gen_range(980.0..1020.0)),
        SensorType::Light => rng.gen_range(0.0f64..1000.0).round(),
        SensorType::Co2 => rng.gen_range(400.0f64..1200.0).round(),
        SensorType::Motion => f64::from(rng.gen_range(0..=1u8)),
        SensorType::Occupancy => f64::from(rng.gen_range(0..=10u8)),
        SensorType::Other => round1(rng.gen_range(0.0..100.0)),
    }
}

/// A value for `at` following the sensor type's daily pattern: temperature
/// tracks the hour, light follows a day/night cycle, CO₂ and occupancy climb
/// during working hours.
pub fn curve_value(kind: SensorType, at: DateTime<Utc>) -> f64 {
    let mut rng = rand::thread_rng();
    let hour = at.hour();
    let weekday = at.weekday().num_days_from_monday();

    match kind {
        SensorType::Temperature => {
            let base = if hour > 12 {
                20.0 + (hour as f64 - 12.0) * 0.5
            } else {
                20.0 - (12.0 - hour as f64) * 0.2
            };
            round1(base + rng.gen_range(-1.0..1.0))
        }
        SensorType::Light => {
            if (6..=18).contains(&hour) {
                rng.gen_range(300.0f64..1000.0).round()
            } else {
                rng.gen_range(0.0f64..50.0).round()
            }
        }
        SensorType::Co2 => {
            if (8..=18).contains(&hour) {
                rng.gen_range(600.0f64..1200.0).round()
            } else {
                rng.gen_range(400.0f64..600.0).round()
            }
        }
        SensorType::Occupancy => {
            if weekday < 5 && (8..=18).contains(&hour) {
                f64::from(rng.gen_range(1..=10u8))
            } else {
                f64::from(rng.gen_range(0..=2u8))
            }
        }
        SensorType::Motion => {
            let active = if weekday < 5 && (8..=18).contains(&hour) {
                rng.gen_bool(0.75)
            } else {
                rng.gen_bool(0.25)
            };
            f64::from(u8::from(active))
        }
        // Spot behavior is already flat for the rest.
        other => spot_value(other),
    }
}

/// Historical series between `start` and `end` inclusive, sampled at
/// irregular steps of `step_min..=step_max` minutes the way real device
/// feeds arrive.
pub fn historical_series(
    sensor_id: &str,
    kind: SensorType,
    unit: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step_min: i64,
    step_max: i64,
) -> Vec<Reading> {
    let mut readings = Vec::new();
    let mut current = start;

    while current <= end {
        readings.push(Reading::new(sensor_id, current, curve_value(kind, current), unit));
        let step = rand::thread_rng().gen_range(step_min..=step_max);
        current += Duration::minutes(step);
    }

    readings
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_spot_values_stay_in_range() {
        for _ in 0..50 {
            let t = spot_value(SensorType::Temperature);
            assert!((18.0..=26.0).contains(&t));

            let m = spot_value(SensorType::Motion);
            assert!(m == 0.0 || m == 1.0);

            let co2 = spot_value(SensorType::Co2);
            assert_eq!(co2, co2.round());
        }
    }

    #[test]
    fn test_light_curve_day_vs_night() {
        let noon = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let midnight = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        for _ in 0..20 {
            assert!(curve_value(SensorType::Light, noon) >= 300.0);
            assert!(curve_value(SensorType::Light, midnight) <= 50.0);
        }
    }

    #[test]
    fn test_historical_series_bounds_and_order() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap();
        let series =
            historical_series("s1", SensorType::Temperature, "°C", start, end, 1, 5);

        assert!(!series.is_empty());
        assert_eq!(series[0].timestamp, start);
        for pair in series.windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
        }
        assert!(series.iter().all(|r| r.timestamp <= end));
        assert!(series.iter().all(|r| r.sensor_id == "s1" && r.unit == "°C"));
    }
}

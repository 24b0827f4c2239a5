//! Synthetic weather: randomized values whose ranges depend on a coarse
//! climate zone picked from the location-name hint.

use std::{collections::BTreeMap, ops::RangeInclusive, sync::Mutex, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use sunrise::{SolarDay, SolarEvent};
use tracing::debug;

use crate::{
    config::MockConfig,
    error::Result,
    model::{
        AirQualitySample, AqiIndex, ClimateZone, Coordinates, CurrentConditions, ForecastPoint,
        Pollutant,
    },
    registry,
};

use super::WeatherProvider;

/// Number of points in a forecast.
pub const FORECAST_LEN: usize = 40;
/// Spacing between forecast points.
pub const FORECAST_STEP_SECS: i64 = 3600;

const CONDITIONS: &[(&str, &str)] =
    &[("Clear", "clear sky"), ("Clouds", "few clouds"), ("Rain", "light rain")];
const DRY_CONDITIONS: &[(&str, &str)] = &[("Clear", "clear sky"), ("Clouds", "few clouds")];
const COLD_CONDITIONS: &[(&str, &str)] =
    &[("Clear", "clear sky"), ("Clouds", "few clouds"), ("Snow", "light snow")];

/// Temperature and moisture profile for one climate zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateProfile {
    pub base_temp: f64,
    pub humidity: (f64, f64),
    pub max_precip: f64,
    pub uv_peak: f64,
}

impl ClimateProfile {
    pub fn for_zone(zone: ClimateZone) -> Self {
        let base_temp = match zone {
            ClimateZone::Arctic => -10.0,
            ClimateZone::Tropical => 28.0,
            ClimateZone::Desert => 35.0,
            _ => 20.0,
        };
        let uv_peak = match zone {
            ClimateZone::Arctic => 2.0,
            ClimateZone::Tropical | ClimateZone::Desert => 11.0,
            _ => 7.0,
        };
        if zone == ClimateZone::Desert {
            Self {
                base_temp,
                humidity: (20.0, 50.0),
                max_precip: 0.10,
                uv_peak,
            }
        } else {
            Self {
                base_temp,
                humidity: (50.0, 90.0),
                max_precip: 0.50,
                uv_peak,
            }
        }
    }

    fn conditions(zone: ClimateZone) -> &'static [(&'static str, &'static str)] {
        match zone {
            ClimateZone::Desert => DRY_CONDITIONS,
            ClimateZone::Arctic => COLD_CONDITIONS,
            _ => CONDITIONS,
        }
    }
}

/// Stand-in for a real weather backend.
#[derive(Debug)]
pub struct MockProvider {
    rng: Mutex<StdRng>,
    latency_ms: RangeInclusive<u64>,
}

impl MockProvider {
    pub fn from_config(config: &MockConfig) -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
            latency_ms: config.latency_min_ms..=config.latency_max_ms,
        }
    }

    /// Reproducible output; no simulated latency.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            latency_ms: 0..=0,
        }
    }

    pub fn with_latency(mut self, latency_ms: RangeInclusive<u64>) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A panic while holding the lock cannot leave the RNG in a bad state.
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }

    async fn simulate_latency(&self) {
        let (lo, hi) = (*self.latency_ms.start(), *self.latency_ms.end());
        if hi == 0 {
            return;
        }
        let ms = self.with_rng(|rng| rng.random_range(lo..=hi.max(lo)));
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    fn generate(&self, zone: ClimateZone, start: i64) -> Vec<ForecastPoint> {
        self.with_rng(|rng| generate_forecast(rng, zone, start))
    }
}

/// Start of the current hour, in epoch seconds.
fn current_hour_start(now: DateTime<Utc>) -> i64 {
    now.timestamp() - i64::from(now.minute() * 60 + now.second())
}

/// Independently drawn hourly points; no smoothing between neighbours.
pub fn generate_forecast<R: Rng>(
    rng: &mut R,
    zone: ClimateZone,
    start: i64,
) -> Vec<ForecastPoint> {
    let profile = ClimateProfile::for_zone(zone);
    let conditions = ClimateProfile::conditions(zone);
    let base = profile.base_temp;

    (0..FORECAST_LEN)
        .map(|i| {
            let &(main, description) = conditions.choose(rng).unwrap_or(&CONDITIONS[0]);
            let clouds = match main {
                "Clear" => rng.random_range(0..20),
                "Clouds" => rng.random_range(20..90),
                _ => rng.random_range(60..=100),
            };

            ForecastPoint {
                timestamp: start + i as i64 * FORECAST_STEP_SECS,
                temp: base + rng.random_range(0.0..10.0),
                temp_min: base - 2.0 + rng.random_range(0.0..8.0),
                temp_max: base + 2.0 + rng.random_range(0.0..12.0),
                humidity_pct: rng
                    .random_range(profile.humidity.0..=profile.humidity.1)
                    .round() as u8,
                pressure: rng.random_range(1005.0..1025.0_f64).round(),
                condition_main: main.to_string(),
                description: description.to_string(),
                wind_speed: rng.random_range(0.0..5.0),
                wind_degrees: rng.random_range(0..360),
                clouds_pct: clouds,
                precip_probability: rng.random_range(0.0..=profile.max_precip),
            }
        })
        .collect()
}

/// Steadman apparent temperature (shade, no radiation term).
pub fn apparent_temperature(temp_c: f64, humidity_pct: f64, wind_ms: f64) -> f64 {
    let vapour_pressure =
        humidity_pct / 100.0 * 6.105 * ((17.27 * temp_c) / (237.7 + temp_c)).exp();
    temp_c + 0.33 * vapour_pressure - 0.70 * wind_ms - 4.0
}

/// Sunrise and sunset for the date; 06:00/19:00 UTC when the sun does not
/// rise or set (polar day and night).
pub fn sun_times(coords: Coordinates, date: NaiveDate) -> (i64, i64) {
    let at_hour = |h: u32| {
        date.and_hms_opt(h, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or_default()
    };

    let Some(position) = sunrise::Coordinates::new(coords.lat(), coords.lon()) else {
        return (at_hour(6), at_hour(19));
    };
    let day = SolarDay::new(position, date);

    let rise = day.event_time(SolarEvent::Sunrise).map(|t| t.timestamp());
    let set = day.event_time(SolarEvent::Sunset).map(|t| t.timestamp());
    (rise.unwrap_or_else(|| at_hour(6)), set.unwrap_or_else(|| at_hour(19)))
}

/// Conditions reported when no location hint is available.
pub fn baseline_conditions(sunrise: i64, sunset: i64) -> CurrentConditions {
    CurrentConditions {
        temperature: 22.0,
        feels_like: 24.0,
        temp_min: 18.0,
        temp_max: 26.0,
        pressure: 1013.0,
        humidity_pct: 65,
        visibility_meters: 10_000,
        wind_speed: 3.5,
        wind_degrees: 180,
        uv_index: Some(5.0),
        description: "partly cloudy".to_string(),
        condition_main: "Clouds".to_string(),
        sunrise,
        sunset,
    }
}

fn conditions_from_point(
    point: &ForecastPoint,
    zone: ClimateZone,
    sunrise: i64,
    sunset: i64,
) -> CurrentConditions {
    let profile = ClimateProfile::for_zone(zone);
    let visibility_meters = match point.condition_main.as_str() {
        "Rain" | "Snow" => 6_000,
        _ => 10_000,
    };
    let uv = profile.uv_peak * (1.0 - f64::from(point.clouds_pct) / 100.0);

    CurrentConditions {
        temperature: point.temp,
        feels_like: apparent_temperature(
            point.temp,
            f64::from(point.humidity_pct),
            point.wind_speed,
        ),
        temp_min: point.temp_min,
        temp_max: point.temp_max,
        pressure: point.pressure,
        humidity_pct: point.humidity_pct,
        visibility_meters,
        wind_speed: point.wind_speed,
        wind_degrees: point.wind_degrees,
        uv_index: Some(uv.round()),
        description: point.description.clone(),
        condition_main: point.condition_main.clone(),
        sunrise,
        sunset,
    }
}

fn zone_for(hint: Option<&str>) -> ClimateZone {
    hint.map(registry::climate_zone_of).unwrap_or_default()
}

#[async_trait]
impl WeatherProvider for MockProvider {
    async fn current_conditions(
        &self,
        coords: Coordinates,
        hint: Option<&str>,
    ) -> Result<CurrentConditions> {
        self.simulate_latency().await;

        let now = Utc::now();
        let (sunrise, sunset) = sun_times(coords, now.date_naive());

        let Some(hint) = hint else {
            debug!(%coords, "mock current conditions: baseline");
            return Ok(baseline_conditions(sunrise, sunset));
        };

        let zone = zone_for(Some(hint));
        let forecast = self.generate(zone, current_hour_start(now));
        debug!(%coords, hint, zone = %zone, "mock current conditions");

        Ok(match forecast.first() {
            Some(point) => conditions_from_point(point, zone, sunrise, sunset),
            None => baseline_conditions(sunrise, sunset),
        })
    }

    async fn forecast(
        &self,
        coords: Coordinates,
        hint: Option<&str>,
    ) -> Result<Vec<ForecastPoint>> {
        self.simulate_latency().await;

        let zone = zone_for(hint);
        let forecast = self.generate(zone, current_hour_start(Utc::now()));
        debug!(%coords, zone = %zone, points = forecast.len(), "mock forecast");
        Ok(forecast)
    }

    async fn air_quality(&self, coords: Coordinates) -> Result<AirQualitySample> {
        self.simulate_latency().await;

        let index = self.with_rng(|rng| rng.random_range(AqiIndex::MIN..=AqiIndex::MAX));
        let aqi = AqiIndex::new(index)?;
        debug!(%coords, aqi = index, "mock air quality");

        let pollutants = BTreeMap::from([
            (Pollutant::Co, 233.4),
            (Pollutant::No2, 15.3),
            (Pollutant::O3, 68.9),
            (Pollutant::Pm2_5, 12.1),
            (Pollutant::Pm10, 18.7),
        ]);

        Ok(AirQualitySample { aqi, pollutants })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Location;

    fn coords() -> Coordinates {
        Coordinates::new(51.5074, -0.1278).unwrap()
    }

    fn mean_temp(points: &[ForecastPoint]) -> f64 {
        points.iter().map(|p| p.temp).sum::<f64>() / points.len() as f64
    }

    #[tokio::test]
    async fn forecast_is_fixed_length_hourly() {
        let provider = MockProvider::seeded(1);
        let forecast = provider.forecast(coords(), Some("London")).await.unwrap();

        assert_eq!(forecast.len(), FORECAST_LEN);
        for pair in forecast.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, FORECAST_STEP_SECS);
        }
        assert_eq!(forecast[0].timestamp % FORECAST_STEP_SECS, 0);
    }

    #[tokio::test]
    async fn forecast_valid_at_coordinate_extremes() {
        let provider = MockProvider::seeded(2);
        for (lat, lon) in [(90.0, 180.0), (-90.0, -180.0), (0.0, 0.0), (78.2, 15.6)] {
            let c = Coordinates::new(lat, lon).unwrap();
            let forecast = provider.forecast(c, None).await.unwrap();
            assert_eq!(forecast.len(), FORECAST_LEN);
            provider.current_conditions(c, Some("Longyearbyen")).await.unwrap();
        }
    }

    #[tokio::test]
    async fn arctic_hint_is_colder_than_tropical() {
        let provider = MockProvider::seeded(3);
        let arctic = provider.forecast(coords(), Some("Reykjavik")).await.unwrap();
        let tropical = provider.forecast(coords(), Some("Singapore")).await.unwrap();

        assert_eq!(arctic.len(), tropical.len());
        assert!(mean_temp(&arctic) < mean_temp(&tropical));
    }

    #[test]
    fn zone_ranges_are_respected() {
        let mut rng = StdRng::seed_from_u64(4);
        let desert = generate_forecast(&mut rng, ClimateZone::Desert, 0);
        for p in &desert {
            assert!((35.0..45.0).contains(&p.temp));
            assert!((20..=50).contains(&p.humidity_pct));
            assert!(p.precip_probability <= 0.10);
            assert_ne!(p.condition_main, "Rain");
        }

        let temperate = generate_forecast(&mut rng, ClimateZone::Temperate, 0);
        for p in &temperate {
            assert!((20.0..30.0).contains(&p.temp));
            assert!((50..=90).contains(&p.humidity_pct));
            assert!(p.precip_probability <= 0.50);
        }

        let arctic = generate_forecast(&mut rng, ClimateZone::Arctic, 0);
        assert!(arctic.iter().all(|p| p.temp < 0.0 && p.condition_main != "Rain"));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = generate_forecast(&mut StdRng::seed_from_u64(9), ClimateZone::Oceanic, 100);
        let b = generate_forecast(&mut StdRng::seed_from_u64(9), ClimateZone::Oceanic, 100);
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn current_without_hint_is_baseline() {
        let provider = MockProvider::seeded(5);
        let current = provider.current_conditions(coords(), None).await.unwrap();

        assert_eq!(current.temperature, 22.0);
        assert_eq!(current.humidity_pct, 65);
        assert_eq!(current.description, "partly cloudy");
        assert!(current.sunrise < current.sunset);
    }

    #[tokio::test]
    async fn current_with_hint_follows_zone() {
        let provider = MockProvider::seeded(6);
        let current = provider.current_conditions(coords(), Some("Dubai")).await.unwrap();

        assert!(current.temperature >= 35.0);
        assert!(current.humidity_pct <= 50);
    }

    #[tokio::test]
    async fn air_quality_uses_categorical_scale() {
        let provider = MockProvider::seeded(7);
        for _ in 0..20 {
            let sample = provider.air_quality(coords()).await.unwrap();
            assert!((1..=5).contains(&sample.aqi.value()));
            assert_eq!(sample.pollutants.get(&Pollutant::Pm2_5), Some(&12.1));
        }
    }

    #[tokio::test]
    async fn default_location_roundtrip_never_fails_validation() {
        let provider = MockProvider::seeded(8);
        let location = Location::default_location();
        provider.current_conditions(location.coordinates, Some(&location.name)).await.unwrap();
        provider.forecast(location.coordinates, Some(&location.name)).await.unwrap();
    }

    #[tokio::test]
    async fn latency_window_is_applied() {
        let provider = MockProvider::seeded(10).with_latency(20..=30);
        let started = std::time::Instant::now();
        provider.air_quality(coords()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn apparent_temperature_is_plausible() {
        let hot_humid = apparent_temperature(30.0, 80.0, 1.0);
        assert!(hot_humid > 30.0);
        let cold_windy = apparent_temperature(0.0, 50.0, 10.0);
        assert!(cold_windy < 0.0);
    }

    #[test]
    fn sun_times_fall_on_the_requested_day() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let (rise, set) = sun_times(coords(), date);
        let midnight = date.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();

        assert!(rise < set);
        assert!((midnight..midnight + 86_400).contains(&rise));
        assert!((midnight..midnight + 86_400).contains(&set));
    }
}

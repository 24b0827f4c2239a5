//! Display-ready values derived from weather records. No I/O.

use chrono::DateTime;
use serde::Serialize;

use crate::model::{
    AirQualitySample, AqiIndex, CurrentConditions, ForecastPoint, Location, Pollutant,
};

/// Points shown in the hourly strip.
pub const HOURLY_SLICE_LEN: usize = 8;
/// Stride used to sample the daily chart from the forecast.
pub const DAILY_STRIDE: usize = 8;
pub const MAX_DAYS: usize = 7;

/// Whole degrees, halves rounded up (-7.5 shows as -7).
pub fn round_temp(celsius: f64) -> i32 {
    (celsius + 0.5).floor() as i32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WeatherIcon {
    Rain,
    Clouds,
    Clear,
    Snow,
    Thunder,
    PartlyCloudy,
}

impl WeatherIcon {
    /// Checked in order: rain, cloud, sun/clear, snow, thunder.
    pub fn from_description(description: &str) -> Self {
        let desc = description.to_lowercase();
        if desc.contains("rain") {
            WeatherIcon::Rain
        } else if desc.contains("cloud") {
            WeatherIcon::Clouds
        } else if desc.contains("sun") || desc.contains("clear") {
            WeatherIcon::Clear
        } else if desc.contains("snow") {
            WeatherIcon::Snow
        } else if desc.contains("thunder") {
            WeatherIcon::Thunder
        } else {
            WeatherIcon::PartlyCloudy
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            WeatherIcon::Rain => "🌧️",
            WeatherIcon::Clouds => "☁️",
            WeatherIcon::Clear => "☀️",
            WeatherIcon::Snow => "❄️",
            WeatherIcon::Thunder => "⛈️",
            WeatherIcon::PartlyCloudy => "🌤️",
        }
    }
}

/// Severity tier of the 1–5 AQI scale; variants are ordered least to most
/// severe, so `Ord` follows severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AqiTier {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
}

impl AqiTier {
    pub fn from_index(index: AqiIndex) -> Self {
        match index.value() {
            1 => AqiTier::Good,
            2 => AqiTier::Fair,
            3 => AqiTier::Moderate,
            4 => AqiTier::Poor,
            _ => AqiTier::VeryPoor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiTier::Good => "Good",
            AqiTier::Fair => "Fair",
            AqiTier::Moderate => "Moderate",
            AqiTier::Poor => "Poor",
            AqiTier::VeryPoor => "Very Poor",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            AqiTier::Good => "#2ecc71",
            AqiTier::Fair => "#f1c40f",
            AqiTier::Moderate => "#e67e22",
            AqiTier::Poor => "#e74c3c",
            AqiTier::VeryPoor => "#8e44ad",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AqiTier::Good => "Air quality is satisfactory",
            AqiTier::Fair => "Air quality is acceptable",
            AqiTier::Moderate => "May cause issues for sensitive people",
            AqiTier::Poor => "Health effects for everyone",
            AqiTier::VeryPoor => "Serious health effects",
        }
    }

    /// Whether the tier warrants a warning marker rather than a check mark.
    pub fn is_alert(&self) -> bool {
        *self >= AqiTier::Moderate
    }
}

/// Global-map temperature band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum TemperatureBand {
    Arctic,
    VeryCold,
    Cold,
    Mild,
    Warm,
    Hot,
    VeryHot,
}

impl TemperatureBand {
    pub fn from_celsius(temp: f64) -> Self {
        if temp < -20.0 {
            TemperatureBand::Arctic
        } else if temp < 0.0 {
            TemperatureBand::VeryCold
        } else if temp < 10.0 {
            TemperatureBand::Cold
        } else if temp < 20.0 {
            TemperatureBand::Mild
        } else if temp < 30.0 {
            TemperatureBand::Warm
        } else if temp < 40.0 {
            TemperatureBand::Hot
        } else {
            TemperatureBand::VeryHot
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            TemperatureBand::Arctic => "#1e40af",
            TemperatureBand::VeryCold => "#3b82f6",
            TemperatureBand::Cold => "#06b6d4",
            TemperatureBand::Mild => "#10b981",
            TemperatureBand::Warm => "#f59e0b",
            TemperatureBand::Hot => "#ef4444",
            TemperatureBand::VeryHot => "#dc2626",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TemperatureBand::Arctic => "Arctic",
            TemperatureBand::VeryCold => "Very Cold",
            TemperatureBand::Cold => "Cold",
            TemperatureBand::Mild => "Mild",
            TemperatureBand::Warm => "Warm",
            TemperatureBand::Hot => "Hot",
            TemperatureBand::VeryHot => "Very Hot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailTile {
    pub label: &'static str,
    pub value: String,
}

/// Main weather card plus the detail tiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentSummary {
    pub temperature: i32,
    pub high: i32,
    pub low: i32,
    pub icon: WeatherIcon,
    pub description: String,
    pub details: Vec<DetailTile>,
}

impl CurrentSummary {
    pub fn from_conditions(current: &CurrentConditions) -> Self {
        let uv = match current.uv_index {
            Some(uv) if uv > 0.0 => format!("{}", uv.round()),
            _ => "N/A".to_string(),
        };
        let details = vec![
            DetailTile {
                label: "Feels Like",
                value: format!("{}°C", round_temp(current.feels_like)),
            },
            DetailTile {
                label: "Humidity",
                value: format!("{}%", current.humidity_pct),
            },
            DetailTile {
                label: "Wind Speed",
                value: format!("{} m/s", current.wind_speed.round() as i64),
            },
            DetailTile {
                label: "Visibility",
                value: format!("{:.1} km", f64::from(current.visibility_meters) / 1000.0),
            },
            DetailTile {
                label: "Pressure",
                value: format!("{} hPa", current.pressure.round() as i64),
            },
            DetailTile {
                label: "UV Index",
                value: uv,
            },
        ];

        Self {
            temperature: round_temp(current.temperature),
            high: round_temp(current.temp_max),
            low: round_temp(current.temp_min),
            icon: WeatherIcon::from_description(&current.description),
            description: current.description.clone(),
            details,
        }
    }

    pub fn detail(&self, label: &str) -> Option<&str> {
        self.details.iter().find(|d| d.label == label).map(|d| d.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyItem {
    /// `HH:00`, UTC.
    pub hour: String,
    pub icon: WeatherIcon,
    pub temp: i32,
}

/// First [`HOURLY_SLICE_LEN`] points for the hourly strip.
pub fn hourly_slice(forecast: &[ForecastPoint]) -> Vec<HourlyItem> {
    forecast
        .iter()
        .take(HOURLY_SLICE_LEN)
        .map(|p| HourlyItem {
            hour: DateTime::from_timestamp(p.timestamp, 0)
                .map(|t| t.format("%H:00").to_string())
                .unwrap_or_else(|| "--:00".to_string()),
            icon: WeatherIcon::from_description(&p.description),
            temp: round_temp(p.temp),
        })
        .collect()
}

/// Chart series sampled every [`DAILY_STRIDE`] points, at most [`MAX_DAYS`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub temperatures: Vec<i32>,
    pub humidity: Vec<u8>,
}

pub fn daily_series(forecast: &[ForecastPoint]) -> ChartSeries {
    let mut series = ChartSeries::default();
    for p in forecast.iter().step_by(DAILY_STRIDE).take(MAX_DAYS) {
        series.labels.push(
            DateTime::from_timestamp(p.timestamp, 0)
                .map(|t| t.format("%a").to_string())
                .unwrap_or_default(),
        );
        series.temperatures.push(round_temp(p.temp));
        series.humidity.push(p.humidity_pct);
    }
    series
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantReading {
    pub name: &'static str,
    pub value: String,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AqiSummary {
    pub index: u8,
    pub tier: AqiTier,
    pub label: &'static str,
    pub color: &'static str,
    pub description: &'static str,
    pub pollutants: Vec<PollutantReading>,
}

/// Pollutants shown on the AQI card, in display order.
const DISPLAYED_POLLUTANTS: &[Pollutant] =
    &[Pollutant::Pm2_5, Pollutant::Pm10, Pollutant::Co, Pollutant::No2, Pollutant::O3];

impl AqiSummary {
    pub fn from_sample(sample: &AirQualitySample) -> Self {
        let tier = AqiTier::from_index(sample.aqi);
        let pollutants = DISPLAYED_POLLUTANTS
            .iter()
            .filter_map(|p| {
                sample.pollutants.get(p).map(|v| PollutantReading {
                    name: p.label(),
                    value: format!("{v:.1}"),
                    unit: "µg/m³",
                })
            })
            .collect();

        Self {
            index: sample.aqi.value(),
            tier,
            label: tier.label(),
            color: tier.color(),
            description: tier.description(),
            pollutants,
        }
    }
}

/// Everything the dashboard screen shows for one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub location: String,
    pub current: CurrentSummary,
    pub hourly: Vec<HourlyItem>,
    pub daily: ChartSeries,
    pub air_quality: AqiSummary,
}

impl DashboardView {
    pub fn build(
        location: &Location,
        current: &CurrentConditions,
        forecast: &[ForecastPoint],
        air_quality: &AirQualitySample,
    ) -> Self {
        Self {
            location: location.name.clone(),
            current: CurrentSummary::from_conditions(current),
            hourly: hourly_slice(forecast),
            daily: daily_series(forecast),
            air_quality: AqiSummary::from_sample(air_quality),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::{FORECAST_STEP_SECS, baseline_conditions};
    use rstest::rstest;
    use std::collections::BTreeMap;

    fn point(timestamp: i64, temp: f64, description: &str) -> ForecastPoint {
        ForecastPoint {
            timestamp,
            temp,
            temp_min: temp - 1.0,
            temp_max: temp + 1.0,
            humidity_pct: 60,
            pressure: 1013.0,
            condition_main: "Clouds".into(),
            description: description.into(),
            wind_speed: 1.0,
            wind_degrees: 90,
            clouds_pct: 40,
            precip_probability: 0.1,
        }
    }

    #[rstest]
    #[case(21.4, 21)]
    #[case(21.5, 22)]
    #[case(-7.5, -7)]
    #[case(-7.51, -8)]
    #[case(-0.4, 0)]
    fn temperatures_round_half_up(#[case] celsius: f64, #[case] expected: i32) {
        assert_eq!(round_temp(celsius), expected);
    }

    #[rstest]
    #[case("light rain", WeatherIcon::Rain)]
    #[case("Few Clouds", WeatherIcon::Clouds)]
    #[case("clear sky", WeatherIcon::Clear)]
    #[case("sunny", WeatherIcon::Clear)]
    #[case("light snow", WeatherIcon::Snow)]
    #[case("thunderstorm", WeatherIcon::Thunder)]
    #[case("thunderstorm with rain", WeatherIcon::Rain)]
    #[case("mist", WeatherIcon::PartlyCloudy)]
    fn icon_classification(#[case] description: &str, #[case] expected: WeatherIcon) {
        assert_eq!(WeatherIcon::from_description(description), expected);
    }

    #[test]
    fn aqi_tiers_are_monotonic() {
        let tiers: Vec<AqiTier> = (AqiIndex::MIN..=AqiIndex::MAX)
            .map(|v| AqiTier::from_index(AqiIndex::new(v).unwrap()))
            .collect();
        for pair in tiers.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(tiers.first(), Some(&AqiTier::Good));
        assert_eq!(tiers.last(), Some(&AqiTier::VeryPoor));
    }

    #[test]
    fn aqi_summary_lists_display_pollutants() {
        let sample = AirQualitySample {
            aqi: AqiIndex::new(3).unwrap(),
            pollutants: BTreeMap::from([
                (Pollutant::Pm2_5, 12.14),
                (Pollutant::So2, 3.0),
                (Pollutant::O3, 68.9),
            ]),
        };
        let summary = AqiSummary::from_sample(&sample);

        assert_eq!(summary.label, "Moderate");
        assert_eq!(summary.color, "#e67e22");
        assert!(summary.tier.is_alert());
        let names: Vec<_> = summary.pollutants.iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["PM2.5", "O₃"]);
        assert_eq!(summary.pollutants[0].value, "12.1");
    }

    #[test]
    fn temperature_bands_cover_the_scale() {
        assert_eq!(TemperatureBand::from_celsius(-30.0), TemperatureBand::Arctic);
        assert_eq!(TemperatureBand::from_celsius(-20.0), TemperatureBand::VeryCold);
        assert_eq!(TemperatureBand::from_celsius(0.0), TemperatureBand::Cold);
        assert_eq!(TemperatureBand::from_celsius(19.9), TemperatureBand::Mild);
        assert_eq!(TemperatureBand::from_celsius(25.0), TemperatureBand::Warm);
        assert_eq!(TemperatureBand::from_celsius(39.0), TemperatureBand::Hot);
        assert_eq!(TemperatureBand::from_celsius(40.0).description(), "Very Hot");
    }

    #[test]
    fn summary_formats_details() {
        let current = baseline_conditions(0, 0);
        let summary = CurrentSummary::from_conditions(&current);

        assert_eq!(summary.temperature, 22);
        assert_eq!(summary.high, 26);
        assert_eq!(summary.low, 18);
        assert_eq!(summary.icon, WeatherIcon::Clouds);
        assert_eq!(summary.detail("Feels Like"), Some("24°C"));
        assert_eq!(summary.detail("Humidity"), Some("65%"));
        assert_eq!(summary.detail("Wind Speed"), Some("4 m/s"));
        assert_eq!(summary.detail("Visibility"), Some("10.0 km"));
        assert_eq!(summary.detail("Pressure"), Some("1013 hPa"));
        assert_eq!(summary.detail("UV Index"), Some("5"));
    }

    #[test]
    fn missing_uv_shows_na() {
        let mut current = baseline_conditions(0, 0);
        current.uv_index = None;
        let summary = CurrentSummary::from_conditions(&current);
        assert_eq!(summary.detail("UV Index"), Some("N/A"));
    }

    #[test]
    fn hourly_slice_takes_first_eight() {
        let forecast: Vec<_> = (0..40)
            .map(|i| point(i * FORECAST_STEP_SECS, 20.4 + i as f64, "clear sky"))
            .collect();
        let hourly = hourly_slice(&forecast);

        assert_eq!(hourly.len(), HOURLY_SLICE_LEN);
        assert_eq!(hourly[0].hour, "00:00");
        assert_eq!(hourly[3].hour, "03:00");
        assert_eq!(hourly[0].temp, 20);
        assert_eq!(hourly[0].icon, WeatherIcon::Clear);
    }

    #[test]
    fn daily_series_samples_every_eighth() {
        let forecast: Vec<_> = (0..60)
            .map(|i| point(i * FORECAST_STEP_SECS, i as f64, "few clouds"))
            .collect();
        let series = daily_series(&forecast);

        assert_eq!(series.temperatures, vec![0, 8, 16, 24, 32, 40, 48]);
        assert_eq!(series.labels.len(), MAX_DAYS);
        // 1970-01-01 was a Thursday.
        assert_eq!(series.labels[0], "Thu");
    }

    #[test]
    fn short_forecast_yields_short_series() {
        let forecast = vec![point(0, 1.0, "x"), point(3600, 2.0, "x")];
        assert_eq!(daily_series(&forecast).temperatures, vec![1]);
        assert_eq!(hourly_slice(&forecast).len(), 2);
        assert!(daily_series(&[]).labels.is_empty());
    }
}

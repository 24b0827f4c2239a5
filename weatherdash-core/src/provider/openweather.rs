use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, error};

use crate::{
    error::{DashboardError, Result},
    geocoder::truncate_body,
    model::{AirQualitySample, AqiIndex, Coordinates, CurrentConditions, ForecastPoint, Pollutant},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_owned(),
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        coords: Coordinates,
    ) -> Result<T> {
        let url = format!("{}/data/2.5/{}", self.base_url, path);
        let lat = coords.lat().to_string();
        let lon = coords.lon().to_string();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| {
                // The request URL carries the API key.
                let e = e.without_url();
                error!(operation, %coords, error = %e, "OpenWeather request failed");
                DashboardError::remote(operation, e.to_string())
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            let e = e.without_url();
            error!(operation, %coords, error = %e, "failed to read OpenWeather body");
            DashboardError::remote(operation, format!("failed to read body: {e}"))
        })?;

        if !status.is_success() {
            error!(operation, %coords, %status, "OpenWeather returned an error status");
            return Err(DashboardError::remote(
                operation,
                format!("status {}: {}", status, truncate_body(&body)),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(operation, %coords, error = %e, "unexpected OpenWeather payload");
            DashboardError::malformed(operation, e.to_string())
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    #[serde(default)]
    deg: u16,
}

#[derive(Debug, Deserialize, Default)]
struct OwClouds {
    all: u8,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default = "default_visibility")]
    visibility: u32,
    sys: OwSys,
}

fn default_visibility() -> u32 {
    10_000
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    clouds: OwClouds,
    #[serde(default)]
    pop: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwAirMain {
    aqi: u8,
}

#[derive(Debug, Deserialize)]
struct OwAirEntry {
    main: OwAirMain,
    components: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct OwAirResponse {
    list: Vec<OwAirEntry>,
}

fn condition(weather: &[OwWeather]) -> (String, String) {
    weather
        .first()
        .map(|w| (w.main.clone(), w.description.clone()))
        .unwrap_or_else(|| ("Unknown".to_string(), "Unknown".to_string()))
}

fn pollutant_from_key(key: &str) -> Option<Pollutant> {
    Some(match key {
        "pm2_5" => Pollutant::Pm2_5,
        "pm10" => Pollutant::Pm10,
        "co" => Pollutant::Co,
        "no" => Pollutant::No,
        "no2" => Pollutant::No2,
        "o3" => Pollutant::O3,
        "so2" => Pollutant::So2,
        "nh3" => Pollutant::Nh3,
        _ => return None,
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_conditions(
        &self,
        coords: Coordinates,
        _hint: Option<&str>,
    ) -> Result<CurrentConditions> {
        let parsed: OwCurrentResponse = self.get_json("current weather", "weather", coords).await?;
        let (condition_main, description) = condition(&parsed.weather);
        debug!(%coords, %description, "OpenWeather current conditions");

        Ok(CurrentConditions {
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            temp_min: parsed.main.temp_min,
            temp_max: parsed.main.temp_max,
            pressure: parsed.main.pressure,
            humidity_pct: parsed.main.humidity,
            visibility_meters: parsed.visibility,
            wind_speed: parsed.wind.speed,
            wind_degrees: parsed.wind.deg,
            // Not part of the 2.5 current-weather payload.
            uv_index: None,
            description,
            condition_main,
            sunrise: parsed.sys.sunrise,
            sunset: parsed.sys.sunset,
        })
    }

    async fn forecast(
        &self,
        coords: Coordinates,
        _hint: Option<&str>,
    ) -> Result<Vec<ForecastPoint>> {
        const OP: &str = "forecast";
        let parsed: OwForecastResponse = self.get_json(OP, "forecast", coords).await?;

        if parsed.list.is_empty() {
            error!(%coords, "OpenWeather forecast response contained no data");
            return Err(DashboardError::malformed(OP, "forecast list is empty"));
        }

        let mut points: Vec<ForecastPoint> = parsed
            .list
            .into_iter()
            .map(|entry| {
                let (condition_main, description) = condition(&entry.weather);
                ForecastPoint {
                    timestamp: entry.dt,
                    temp: entry.main.temp,
                    temp_min: entry.main.temp_min,
                    temp_max: entry.main.temp_max,
                    humidity_pct: entry.main.humidity,
                    pressure: entry.main.pressure,
                    condition_main,
                    description,
                    wind_speed: entry.wind.speed,
                    wind_degrees: entry.wind.deg,
                    clouds_pct: entry.clouds.all,
                    precip_probability: entry.pop.clamp(0.0, 1.0),
                }
            })
            .collect();
        points.sort_by_key(|p| p.timestamp);

        debug!(%coords, points = points.len(), "OpenWeather forecast");
        Ok(points)
    }

    async fn air_quality(&self, coords: Coordinates) -> Result<AirQualitySample> {
        const OP: &str = "air quality";
        let parsed: OwAirResponse = self.get_json(OP, "air_pollution", coords).await?;

        let entry = parsed
            .list
            .into_iter()
            .next()
            .ok_or_else(|| DashboardError::malformed(OP, "air pollution list is empty"))?;

        let aqi = AqiIndex::new(entry.main.aqi)
            .map_err(|e| DashboardError::malformed(OP, e.to_string()))?;

        let pollutants = entry
            .components
            .iter()
            .filter_map(|(key, value)| pollutant_from_key(key).map(|p| (p, *value)))
            .collect();

        Ok(AirQualitySample { aqi, pollutants })
    }
}

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

/// A latitude/longitude pair that is always inside the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct RawCoordinates {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = DashboardError;

    fn try_from(raw: RawCoordinates) -> Result<Self> {
        Coordinates::new(raw.lat, raw.lon)
    }
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(DashboardError::validation(format!(
                "latitude {lat} outside [-90, 90]"
            )));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(DashboardError::validation(format!(
                "longitude {lon} outside [-180, 180]"
            )));
        }
        Ok(Self { lat, lon })
    }

    /// Used for compiled-in tables whose values are known to be in range.
    pub(crate) const fn new_unchecked(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub const fn origin() -> Self {
        Self { lat: 0.0, lon: 0.0 }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Both axes differ by less than `degrees`.
    pub fn is_near(&self, other: &Coordinates, degrees: f64) -> bool {
        (self.lat - other.lat).abs() < degrees && (self.lon - other.lon).abs() < degrees
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Country,
    City,
    Territory,
    Region,
    Dependency,
    Point,
}

impl LocationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationKind::Country => "country",
            LocationKind::City => "city",
            LocationKind::Territory => "territory",
            LocationKind::Region => "region",
            LocationKind::Dependency => "dependency",
            LocationKind::Point => "point",
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A named place with coordinates, produced by the resolver or by the user
/// picking a point directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub coordinates: Coordinates,
    pub kind: LocationKind,
    pub country_name: Option<String>,
    pub country_code: Option<String>,
}

impl Location {
    pub fn new(name: impl Into<String>, coordinates: Coordinates, kind: LocationKind) -> Self {
        Self {
            name: name.into(),
            coordinates,
            kind,
            country_name: None,
            country_code: None,
        }
    }

    pub fn with_country(mut self, name: impl Into<String>, code: Option<&str>) -> Self {
        self.country_name = Some(name.into());
        self.country_code = code.map(str::to_owned);
        self
    }

    /// A point picked on the map; named after its own coordinates.
    pub fn from_map_click(lat: f64, lon: f64) -> Result<Self> {
        let coordinates = Coordinates::new(lat, lon)?;
        Ok(Self::new(coordinates.to_string(), coordinates, LocationKind::Point))
    }

    /// The device position reported by geolocation.
    pub fn current_position(lat: f64, lon: f64) -> Result<Self> {
        Ok(Self::new("Your Location", Coordinates::new(lat, lon)?, LocationKind::Point))
    }

    /// Fallback when no position is available.
    pub fn default_location() -> Self {
        Self::new(
            "New York",
            Coordinates::new_unchecked(40.7128, -74.0060),
            LocationKind::City,
        )
        .with_country("United States", Some("US"))
    }

    pub fn lat(&self) -> f64 {
        self.coordinates.lat()
    }

    pub fn lon(&self) -> f64 {
        self.coordinates.lon()
    }

    /// "Name, Country" when the country is known.
    pub fn full_name(&self) -> String {
        match &self.country_name {
            Some(country) if *country != self.name => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }
}

/// Coarse climate classification used to bias synthetic weather.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClimateZone {
    Tropical,
    Desert,
    Mediterranean,
    Continental,
    Oceanic,
    Arctic,
    Subtropical,
    #[default]
    Temperate,
}

impl ClimateZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClimateZone::Tropical => "tropical",
            ClimateZone::Desert => "desert",
            ClimateZone::Mediterranean => "mediterranean",
            ClimateZone::Continental => "continental",
            ClimateZone::Oceanic => "oceanic",
            ClimateZone::Arctic => "arctic",
            ClimateZone::Subtropical => "subtropical",
            ClimateZone::Temperate => "temperate",
        }
    }
}

impl fmt::Display for ClimateZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Current observation for one location. Temperatures in °C, wind in m/s,
/// sunrise/sunset in epoch seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    pub humidity_pct: u8,
    pub visibility_meters: u32,
    pub wind_speed: f64,
    pub wind_degrees: u16,
    pub uv_index: Option<f64>,
    pub description: String,
    pub condition_main: String,
    pub sunrise: i64,
    pub sunset: i64,
}

/// One step of a forecast sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: i64,
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity_pct: u8,
    pub pressure: f64,
    pub condition_main: String,
    pub description: String,
    pub wind_speed: f64,
    pub wind_degrees: u16,
    pub clouds_pct: u8,
    /// Probability of precipitation in `0.0..=1.0`.
    pub precip_probability: f64,
}

/// OpenWeatherMap-style categorical air quality index, 1 (good) to 5 (very poor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct AqiIndex(u8);

impl AqiIndex {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DashboardError::validation(format!(
                "AQI index {value} outside {}..={}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for AqiIndex {
    type Error = DashboardError;

    fn try_from(value: u8) -> Result<Self> {
        AqiIndex::new(value)
    }
}

impl From<AqiIndex> for u8 {
    fn from(index: AqiIndex) -> u8 {
        index.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pollutant {
    Pm2_5,
    Pm10,
    Co,
    No,
    No2,
    O3,
    So2,
    Nh3,
}

impl Pollutant {
    pub fn label(&self) -> &'static str {
        match self {
            Pollutant::Pm2_5 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::Co => "CO",
            Pollutant::No => "NO",
            Pollutant::No2 => "NO₂",
            Pollutant::O3 => "O₃",
            Pollutant::So2 => "SO₂",
            Pollutant::Nh3 => "NH₃",
        }
    }
}

/// Air quality at one location; concentrations in µg/m³.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualitySample {
    pub aqi: AqiIndex,
    pub pollutants: BTreeMap<Pollutant, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_reject_out_of_range() {
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
        assert!(matches!(
            Coordinates::new(90.5, 0.0),
            Err(DashboardError::Validation { .. })
        ));
        assert!(Coordinates::new(0.0, -180.1).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn coordinates_deserialize_validates() {
        let ok: Coordinates = serde_json::from_str(r#"{"lat": 10.0, "lon": 20.0}"#).unwrap();
        assert_eq!(ok.lat(), 10.0);

        let bad = serde_json::from_str::<Coordinates>(r#"{"lat": 100.0, "lon": 20.0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn map_click_is_named_after_coordinates() {
        let loc = Location::from_map_click(48.85661, 2.35222).unwrap();
        assert_eq!(loc.name, "48.8566, 2.3522");
        assert_eq!(loc.kind, LocationKind::Point);
    }

    #[test]
    fn default_location_is_new_york() {
        let loc = Location::default_location();
        assert_eq!(loc.name, "New York");
        assert_eq!(loc.full_name(), "New York, United States");
    }

    #[test]
    fn aqi_index_bounds() {
        assert!(AqiIndex::new(0).is_err());
        assert_eq!(AqiIndex::new(3).unwrap().value(), 3);
        assert!(AqiIndex::new(6).is_err());
        assert!(serde_json::from_str::<AqiIndex>("7").is_err());
    }
}

//! Core library for the `weatherdash` dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The compiled-in location registry and the search resolver
//! - Abstraction over weather providers (mock and OpenWeatherMap)
//! - Display transformations, the chat responder and emergency helpers
//!
//! It is used by `weatherdash-cli`, but can also be reused by other binaries or services.

pub mod chat;
pub mod config;
pub mod dashboard;
pub mod emergency;
pub mod error;
pub mod geocoder;
pub mod model;
pub mod presentation;
pub mod provider;
pub mod registry;
pub mod resolver;

pub use chat::{KeywordResponder, Responder};
pub use config::{Config, GeocoderConfig, MockConfig, ProviderConfig};
pub use error::DashboardError;
pub use geocoder::{Geocoder, NominatimGeocoder};
pub use model::{
    AirQualitySample, AqiIndex, ClimateZone, Coordinates, CurrentConditions, ForecastPoint,
    Location, LocationKind, Pollutant,
};
pub use provider::{ProviderId, WeatherProvider};
pub use resolver::{LocationResolver, SearchSession};

/// Resolver wired to the configured geocoder.
pub fn resolver_from_config(config: &Config) -> LocationResolver {
    LocationResolver::new(Box::new(NominatimGeocoder::new(&config.geocoder)))
        .with_timeout(config.geocoder.timeout())
}

use crate::{
    Config,
    error::{DashboardError, Result},
    model::{AirQualitySample, Coordinates, CurrentConditions, ForecastPoint},
    provider::{mock::MockProvider, openweather::OpenWeatherProvider},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod mock;
pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Mock,
    OpenWeather,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Mock => "mock",
            ProviderId::OpenWeather => "openweather",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::Mock, ProviderId::OpenWeather]
    }

    /// Whether the provider needs an API key.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderId::OpenWeather)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "mock" => Ok(ProviderId::Mock),
            "openweather" => Ok(ProviderId::OpenWeather),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: mock, openweather."
            )),
        }
    }
}

/// Source of weather and air-quality data for a coordinate.
///
/// `hint` is a place name used only to pick a climate bias; real backends
/// ignore it.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_conditions(
        &self,
        coords: Coordinates,
        hint: Option<&str>,
    ) -> Result<CurrentConditions>;

    /// Ordered, non-empty, evenly spaced.
    async fn forecast(&self, coords: Coordinates, hint: Option<&str>) -> Result<Vec<ForecastPoint>>;

    async fn air_quality(&self, coords: Coordinates) -> Result<AirQualitySample>;
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(id: ProviderId, config: &Config) -> Result<Box<dyn WeatherProvider>> {
    let boxed: Box<dyn WeatherProvider> = match id {
        ProviderId::Mock => Box::new(MockProvider::from_config(&config.mock)),
        ProviderId::OpenWeather => {
            let api_key = config.provider_api_key(id).ok_or_else(|| {
                DashboardError::configuration(format!(
                    "No API key configured for provider '{id}'.\n\
                     Hint: run `weatherdash configure {id}` or set {}.",
                    crate::config::API_KEY_ENV
                ))
            })?;
            Box::new(OpenWeatherProvider::new(api_key.to_owned()))
        }
    };

    Ok(boxed)
}

/// Construct the provider the configuration selects.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let id = config.effective_provider_id()?;
    Ok(provider_from_config(id, config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in ProviderId::all() {
            let s = id.as_str();
            let parsed = ProviderId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("weatherapi").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn openweather_without_key_is_configuration_error() {
        let cfg = Config::default();
        let err = provider_from_config(ProviderId::OpenWeather, &cfg).unwrap_err();
        assert!(matches!(err, DashboardError::Configuration { .. }));
        assert!(err.to_string().contains("No API key configured for provider"));
    }

    #[test]
    fn mock_never_needs_configuration() {
        let cfg = Config::default();
        assert!(provider_from_config(ProviderId::Mock, &cfg).is_ok());
        assert!(!ProviderId::Mock.requires_api_key());
    }

    #[test]
    fn default_provider_from_config_works_when_key_present() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "KEY".to_string());

        let provider = default_provider_from_config(&cfg).unwrap();
        assert!(format!("{provider:?}").contains("OpenWeatherProvider"));
    }

    #[test]
    fn default_provider_from_config_propagates_missing_key() {
        let mut cfg = Config::default();
        cfg.set_default_provider(ProviderId::OpenWeather);

        let err = default_provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("Hint: run `weatherdash configure"));
    }
}

//! Loads everything the dashboard needs for one location.

use tracing::{error, info};

use crate::{
    error::Result,
    model::{AirQualitySample, CurrentConditions, ForecastPoint, Location},
    presentation::DashboardView,
    provider::WeatherProvider,
};

/// Raw records fetched for one location.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub location: Location,
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastPoint>,
    pub air_quality: AirQualitySample,
}

impl DashboardData {
    pub fn view(&self) -> DashboardView {
        DashboardView::build(&self.location, &self.current, &self.forecast, &self.air_quality)
    }
}

/// Fetch current conditions, forecast and air quality concurrently. The
/// first error from any of the three is returned; nothing is substituted.
pub async fn load(provider: &dyn WeatherProvider, location: &Location) -> Result<DashboardData> {
    let coords = location.coordinates;
    let hint = Some(location.name.as_str());

    let fetched = tokio::try_join!(
        provider.current_conditions(coords, hint),
        provider.forecast(coords, hint),
        provider.air_quality(coords),
    );

    match fetched {
        Ok((current, forecast, air_quality)) => {
            info!(
                location = %location.name,
                %coords,
                forecast_points = forecast.len(),
                "dashboard data loaded"
            );
            Ok(DashboardData {
                location: location.clone(),
                current,
                forecast,
                air_quality,
            })
        }
        Err(e) => {
            error!(location = %location.name, %coords, error = %e, "unable to load weather data");
            Err(e)
        }
    }
}

//! Remote free-text geocoding.

use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    config::GeocoderConfig,
    error::{DashboardError, Result},
    model::{Coordinates, Location, LocationKind},
};

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Up to `limit` candidates for a free-text query. Every returned
    /// location has in-range coordinates.
    async fn geocode(&self, query: &str, limit: usize) -> Result<Vec<Location>>;
}

/// OpenStreetMap Nominatim search endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    base_url: String,
    user_agent: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            user_agent: config.user_agent.clone(),
            http: Client::new(),
        }
    }
}

impl NominatimPlace {
    /// `None` when the coordinates do not parse or are out of range.
    fn into_location(self) -> Option<Location> {
        let lat = self.lat.trim().parse::<f64>().ok()?;
        let lon = self.lon.trim().parse::<f64>().ok()?;
        let coordinates = Coordinates::new(lat, lon).ok()?;

        let mut parts = self.display_name.split(',').map(str::trim);
        let name = parts.next().filter(|s| !s.is_empty())?.to_owned();
        let country = parts.next_back();

        let location = Location::new(name, coordinates, LocationKind::Point);
        Some(match country {
            Some(country) => location.with_country(country, None),
            None => location,
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str, limit: usize) -> Result<Vec<Location>> {
        const OP: &str = "geocode";
        let url = format!("{}/search", self.base_url);
        let limit = limit.to_string();

        let res = self
            .http
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&[("format", "json"), ("q", query), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(|e| DashboardError::remote(OP, e.without_url().to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| {
                DashboardError::remote(OP, format!("failed to read body: {}", e.without_url()))
            })?;

        if !status.is_success() {
            return Err(DashboardError::remote(
                OP,
                format!("status {status}: {}", truncate_body(&body)),
            ));
        }

        let places: Vec<NominatimPlace> =
            serde_json::from_str(&body).map_err(|e| DashboardError::malformed(OP, e.to_string()))?;

        let total = places.len();
        let locations: Vec<Location> = places
            .into_iter()
            .filter_map(|place| {
                let label = place.display_name.clone();
                let location = place.into_location();
                if location.is_none() {
                    warn!(
                        query,
                        place = %label,
                        "dropping geocoder result with invalid coordinates"
                    );
                }
                location
            })
            .collect();

        debug!(query, total, kept = locations.len(), "geocoder answered");
        Ok(locations)
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn geocoder(server: &MockServer) -> NominatimGeocoder {
        NominatimGeocoder::new(&GeocoderConfig {
            base_url: server.base_url(),
            ..GeocoderConfig::default()
        })
    }

    #[tokio::test]
    async fn parses_places_and_splits_display_name() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/search")
                    .query_param("format", "json")
                    .query_param("q", "Lyon")
                    .query_param("limit", "5");
                then.status(200).json_body(json!([
                    {
                        "display_name": "Lyon, Métropole de Lyon, Rhône, France",
                        "lat": "45.7578137",
                        "lon": "4.8320114"
                    }
                ]));
            })
            .await;

        let found = geocoder(&server).geocode("Lyon", 5).await.unwrap();

        mock.assert_async().await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Lyon");
        assert_eq!(found[0].country_name.as_deref(), Some("France"));
        assert_eq!(found[0].kind, LocationKind::Point);
        assert!((found[0].lat() - 45.7578137).abs() < 1e-9);
    }

    #[tokio::test]
    async fn drops_invalid_coordinates() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(200).json_body(json!([
                    { "display_name": "Nowhere", "lat": "123.0", "lon": "10.0" },
                    { "display_name": "Garbage", "lat": "abc", "lon": "10.0" },
                    { "display_name": "Oslo, Norway", "lat": "59.91", "lon": "10.75" }
                ]));
            })
            .await;

        let found = geocoder(&server).geocode("o", 5).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Oslo");
    }

    #[tokio::test]
    async fn non_success_status_is_remote_unavailable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(503).body("busy");
            })
            .await;

        let err = geocoder(&server).geocode("Paris", 5).await.unwrap_err();
        assert!(matches!(err, DashboardError::RemoteUnavailable { .. }));
    }

    #[tokio::test]
    async fn unexpected_shape_is_malformed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(200).json_body(json!({ "error": "nope" }));
            })
            .await;

        let err = geocoder(&server).geocode("Paris", 5).await.unwrap_err();
        assert!(matches!(err, DashboardError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn transport_error_omits_request_url() {
        let geocoder = NominatimGeocoder::new(&GeocoderConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..GeocoderConfig::default()
        });

        let err = geocoder.geocode("Lyon", 5).await.unwrap_err();

        assert!(matches!(err, DashboardError::RemoteUnavailable { .. }));
        assert!(!err.to_string().contains("/search?"), "{err}");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let short = truncate_body(&long);
        assert!(short.ends_with("..."));
        assert_eq!(short.chars().count(), 203);
    }
}

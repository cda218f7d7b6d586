//! OpenCage forward geocoding over HTTP.

use async_trait::async_trait;
use kundali_config::GeocoderSettings;
use serde::Deserialize;

use crate::ephemeris::GeoLocation;
use crate::error::{KundaliError, LookupError};
use crate::geocode::Geocoder;

#[derive(Debug, Deserialize)]
struct ForwardResponse {
    #[serde(default)]
    results: Vec<ForwardResult>,
}

#[derive(Debug, Deserialize)]
struct ForwardResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    lat: f64,
    lng: f64,
}

impl ForwardResponse {
    /// Results come ranked by confidence; only the best one is used.
    fn best_location(&self) -> Option<GeoLocation> {
        self.results.first().map(|r| GeoLocation {
            lat: r.geometry.lat,
            lon: r.geometry.lng,
        })
    }
}

/// [`Geocoder`] backed by the OpenCage `geocode/v1/json` endpoint.
pub struct OpenCageGeocoder {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl OpenCageGeocoder {
    pub fn new(settings: &GeocoderSettings) -> Result<Self, KundaliError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| KundaliError::Configuration(format!("geocoder HTTP client: {}", e)))?;
        Self::with_client(client, settings)
    }

    pub fn with_client(client: reqwest::Client, settings: &GeocoderSettings) -> Result<Self, KundaliError> {
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| KundaliError::Configuration("geocoder.api_key is not set".to_string()))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for OpenCageGeocoder {
    async fn locate(&self, place: &str) -> Result<GeoLocation, LookupError> {
        let unavailable = |message: String| LookupError::Unavailable {
            place: place.to_string(),
            message,
        };

        log::debug!("OpenCage lookup for '{}'", place);

        // The key travels in the query string, so errors are stripped of their URL.
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", place),
                ("key", self.api_key.as_str()),
                ("limit", "1"),
                ("no_annotations", "1"),
            ])
            .send()
            .await
            .map_err(|e| unavailable(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(unavailable(format!("HTTP {}: {}", status, body.trim())));
        }

        let body: ForwardResponse = response
            .json()
            .await
            .map_err(|e| unavailable(format!("unreadable response: {}", e.without_url())))?;

        body.best_location().ok_or_else(|| LookupError::NotFound {
            place: place.to_string(),
        })
    }
}

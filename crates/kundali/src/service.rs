//! End-to-end chart calculation from user-entered birth details.

use chrono::{DateTime, Utc};
use kundali_config::KundaliSettings;
use std::sync::Arc;
use std::time::Duration;

use crate::birth::BirthDetails;
use crate::ephemeris::{julian_day, Ephemeris};
use crate::error::KundaliError;
use crate::geocode::{GeocodeCache, Geocoder};
use crate::report::{assemble_report, Report};

/// Runs birth parsing, geocoding, the ephemeris and report assembly in turn.
///
/// Collaborator failures surface unchanged; nothing is retried.
pub struct KundaliService {
    geocode_cache: GeocodeCache,
    ephemeris: Arc<dyn Ephemeris>,
    ephemeris_timeout: Duration,
}

impl KundaliService {
    pub fn new(geocoder: Arc<dyn Geocoder>, ephemeris: Arc<dyn Ephemeris>, settings: &KundaliSettings) -> Self {
        Self {
            geocode_cache: GeocodeCache::new(geocoder, &settings.geocoder),
            ephemeris,
            ephemeris_timeout: settings.ephemeris.timeout(),
        }
    }

    pub fn geocode_cache(&self) -> &GeocodeCache {
        &self.geocode_cache
    }

    pub async fn calculate(&self, details: &BirthDetails) -> Result<Report, KundaliError> {
        self.calculate_at(details, Utc::now()).await
    }

    /// Same as [`calculate`](Self::calculate) with current periods taken at `now`.
    pub async fn calculate_at(&self, details: &BirthDetails, now: DateTime<Utc>) -> Result<Report, KundaliError> {
        let birth = details.moment()?;
        let location = self.geocode_cache.coordinates(&details.place).await?;
        let jd = julian_day(birth);

        let chart = match tokio::time::timeout(self.ephemeris_timeout, self.ephemeris.sidereal_chart(jd, location)).await {
            Ok(result) => result.map_err(|e| {
                log::warn!("ephemeris failed at JD {:.5}: {}", jd, e);
                KundaliError::from(e)
            })?,
            Err(_) => {
                log::warn!("ephemeris timed out after {:?}", self.ephemeris_timeout);
                return Err(KundaliError::Timeout {
                    collaborator: "ephemeris",
                    after: self.ephemeris_timeout,
                });
            }
        };

        let report = assemble_report(&chart, birth, now)?;
        log::info!(
            "kundali for {} {} at '{}': ascendant {}, current mahadasha {}",
            details.date,
            details.time,
            details.place.trim(),
            report.ascendant_sign,
            report
                .current_mahadasha
                .as_ref()
                .map(|p| p.lord.to_string())
                .unwrap_or_else(|| "none".to_string())
        );
        Ok(report)
    }
}

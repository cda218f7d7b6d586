use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EphemerisError;
use crate::graha::{ketu_longitude, Planet};
use crate::zodiac::normalize_degrees;

/// Geographic location coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
}

/// Sidereal longitudes (degrees) at one instant and place.
///
/// Ketu has no field: it is always derived from Rahu.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiderealChart {
    pub ascendant: f64,
    pub sun: f64,
    pub moon: f64,
    pub mars: f64,
    pub mercury: f64,
    pub jupiter: f64,
    pub venus: f64,
    pub saturn: f64,
    pub rahu: f64,
}

impl SiderealChart {
    /// Longitude of `planet`, normalized to [0, 360).
    pub fn longitude(&self, planet: Planet) -> f64 {
        let raw = match planet {
            Planet::Sun => self.sun,
            Planet::Moon => self.moon,
            Planet::Mars => self.mars,
            Planet::Mercury => self.mercury,
            Planet::Jupiter => self.jupiter,
            Planet::Venus => self.venus,
            Planet::Saturn => self.saturn,
            Planet::Rahu => self.rahu,
            Planet::Ketu => return ketu_longitude(self.rahu),
        };
        normalize_degrees(raw)
    }

    pub fn ascendant_longitude(&self) -> f64 {
        normalize_degrees(self.ascendant)
    }
}

/// Source of sidereal positions for a Julian day and location.
#[async_trait]
pub trait Ephemeris: Send + Sync {
    async fn sidereal_chart(
        &self,
        julian_day: f64,
        location: GeoLocation,
    ) -> Result<SiderealChart, EphemerisError>;
}

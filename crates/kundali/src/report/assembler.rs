//! Composition of placements, house rulers and dasha periods into a report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ephemeris::SiderealChart;
use crate::error::KundaliError;
use crate::graha::Planet;
use crate::report::summary::render_summary;
use crate::strength::{evaluate, Strength};
use crate::vedic::{compute_antardashas, compute_mahadashas, find_period, subdivide_period, DashaPeriod};
use crate::zodiac::{determine_house_rulers, house_of, sign_of, HouseRuler, ZodiacSign};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetPlacement {
    pub planet: Planet,
    pub longitude: f64,
    pub sign: ZodiacSign,
    pub house: u8,
    /// Ruler of the house the planet occupies.
    #[serde(rename = "houseRuler")]
    pub house_ruler: Planet,
    pub strength: Strength,
    #[serde(rename = "isBenefic")]
    pub is_benefic: bool,
}

/// Natal report for one birth moment, evaluated at one query instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(rename = "ascendantLongitude")]
    pub ascendant_longitude: f64,
    #[serde(rename = "ascendantSign")]
    pub ascendant_sign: ZodiacSign,
    pub placements: Vec<PlanetPlacement>,
    #[serde(rename = "houseRulers")]
    pub house_rulers: Vec<HouseRuler>,
    pub mahadashas: Vec<DashaPeriod>,
    /// Antardashas of the current Mahadasha; empty when there is none.
    pub antardashas: Vec<DashaPeriod>,
    #[serde(rename = "currentMahadasha")]
    pub current_mahadasha: Option<DashaPeriod>,
    #[serde(rename = "currentAntardasha")]
    pub current_antardasha: Option<DashaPeriod>,
    #[serde(rename = "currentPratyantardasha")]
    pub current_pratyantardasha: Option<DashaPeriod>,
    pub summary: String,
}

impl Report {
    pub fn placement(&self, planet: Planet) -> Option<&PlanetPlacement> {
        self.placements.iter().find(|p| p.planet == planet)
    }

    pub fn house_ruler(&self, house: u8) -> Option<Planet> {
        self.house_rulers.iter().find(|r| r.house == house).map(|r| r.ruler)
    }
}

pub fn build_placements(chart: &SiderealChart, house_rulers: &[HouseRuler; 12]) -> Vec<PlanetPlacement> {
    let ascendant_sign = sign_of(chart.ascendant_longitude());
    Planet::ALL
        .iter()
        .map(|&planet| {
            let longitude = chart.longitude(planet);
            let sign = sign_of(longitude);
            let house = house_of(ascendant_sign, sign);
            let (strength, is_benefic) = evaluate(planet, sign);
            PlanetPlacement {
                planet,
                longitude,
                sign,
                house,
                house_ruler: house_rulers[house as usize - 1].ruler,
                strength,
                is_benefic,
            }
        })
        .collect()
}

/// Build the full report for a chart cast at `birth`, with the current
/// periods taken at `now`.
pub fn assemble_report(
    chart: &SiderealChart,
    birth: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Report, KundaliError> {
    let ascendant_longitude = chart.ascendant_longitude();
    let ascendant_sign = sign_of(ascendant_longitude);
    let house_rulers = determine_house_rulers(ascendant_sign);
    let placements = build_placements(chart, &house_rulers);

    let mahadashas = compute_mahadashas(chart.longitude(Planet::Moon), birth);
    let current_mahadasha = find_period(&mahadashas, now).cloned();

    let antardashas = match &current_mahadasha {
        Some(mahadasha) => compute_antardashas(mahadasha)?,
        None => Vec::new(),
    };
    let current_antardasha = find_period(&antardashas, now).cloned();

    let current_pratyantardasha = match &current_antardasha {
        Some(antardasha) => find_period(&subdivide_period(antardasha)?, now).cloned(),
        None => None,
    };

    let summary = render_summary(
        ascendant_sign,
        ascendant_longitude,
        &placements,
        current_mahadasha.as_ref(),
        current_antardasha.as_ref(),
    );

    Ok(Report {
        ascendant_longitude,
        ascendant_sign,
        placements,
        house_rulers: house_rulers.to_vec(),
        mahadashas,
        antardashas,
        current_mahadasha,
        current_antardasha,
        current_pratyantardasha,
        summary,
    })
}

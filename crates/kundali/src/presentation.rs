//! Display-oriented projection of a [`Report`].
//!
//! Numbers are pre-formatted and dates are reduced to `YYYY-MM-DD`, so a
//! screen can render the JSON without knowing anything about the report types.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use crate::graha::Planet;
use crate::report::{Report, NO_CURRENT_ANTARDASHA, NO_CURRENT_MAHADASHA, SUMMARY_DATE_FORMAT};
use crate::strength::Strength;
use crate::vedic::DashaPeriod;
use crate::zodiac::ZodiacSign;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AscendantInfo {
    #[serde(rename = "Ascendant Sign")]
    pub ascendant_sign: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanetPosition {
    #[serde(rename = "Position")]
    pub position: String,
    #[serde(rename = "Sign")]
    pub sign: ZodiacSign,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HousePlacement {
    #[serde(rename = "House")]
    pub house: u8,
    #[serde(rename = "House Ruler")]
    pub house_ruler: Planet,
    #[serde(rename = "Strength")]
    pub strength: Strength,
    #[serde(rename = "Nature")]
    pub nature: &'static str,
    #[serde(rename = "Sign")]
    pub sign: ZodiacSign,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodInfo {
    #[serde(rename = "Planet")]
    pub planet: Planet,
    #[serde(rename = "Start Date")]
    pub start_date: String,
    #[serde(rename = "End Date")]
    pub end_date: String,
}

impl From<&DashaPeriod> for PeriodInfo {
    fn from(period: &DashaPeriod) -> Self {
        Self {
            planet: period.lord,
            start_date: period.start.format(SUMMARY_DATE_FORMAT).to_string(),
            end_date: period.end.format(SUMMARY_DATE_FORMAT).to_string(),
        }
    }
}

/// House rulers in house order, serialized as a `"House N"` keyed map.
#[derive(Debug, Clone, PartialEq)]
pub struct HouseRulerMap(Vec<(u8, Planet)>);

impl HouseRulerMap {
    pub fn get(&self, house: u8) -> Option<Planet> {
        self.0.iter().find(|(h, _)| *h == house).map(|(_, ruler)| *ruler)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for HouseRulerMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (house, ruler) in &self.0 {
            map.serialize_entry(&format!("House {}", house), ruler)?;
        }
        map.end()
    }
}

/// A current period, or the message shown when there is none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PeriodView {
    Found(PeriodInfo),
    Missing(&'static str),
}

impl PeriodView {
    fn from_option(period: Option<&DashaPeriod>, missing: &'static str) -> Self {
        match period {
            Some(p) => PeriodView::Found(PeriodInfo::from(p)),
            None => PeriodView::Missing(missing),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KundaliResponse {
    pub ascendant_info: AscendantInfo,
    pub planetary_info: BTreeMap<Planet, PlanetPosition>,
    pub planets_in_houses: BTreeMap<Planet, HousePlacement>,
    pub house_rulers: HouseRulerMap,
    pub dasha_periods: Vec<PeriodInfo>,
    pub current_dasha: PeriodView,
    pub current_antardasha: PeriodView,
    pub summary: String,
}

impl KundaliResponse {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&Report> for KundaliResponse {
    fn from(report: &Report) -> Self {
        let planetary_info = report
            .placements
            .iter()
            .map(|p| {
                let position = PlanetPosition {
                    position: format!("{:.2}°", p.longitude),
                    sign: p.sign,
                };
                (p.planet, position)
            })
            .collect();

        let planets_in_houses = report
            .placements
            .iter()
            .map(|p| {
                let placement = HousePlacement {
                    house: p.house,
                    house_ruler: p.house_ruler,
                    strength: p.strength,
                    nature: if p.is_benefic { "Benefic" } else { "Malefic" },
                    sign: p.sign,
                };
                (p.planet, placement)
            })
            .collect();

        let mut house_rulers: Vec<(u8, Planet)> = report.house_rulers.iter().map(|r| (r.house, r.ruler)).collect();
        house_rulers.sort_by_key(|(house, _)| *house);

        Self {
            ascendant_info: AscendantInfo {
                ascendant_sign: format!("{} ({:.2}°)", report.ascendant_sign, report.ascendant_longitude),
            },
            planetary_info,
            planets_in_houses,
            house_rulers: HouseRulerMap(house_rulers),
            dasha_periods: report.mahadashas.iter().map(PeriodInfo::from).collect(),
            current_dasha: PeriodView::from_option(report.current_mahadasha.as_ref(), NO_CURRENT_MAHADASHA),
            current_antardasha: PeriodView::from_option(
                report.current_antardasha.as_ref(),
                NO_CURRENT_ANTARDASHA,
            ),
            summary: report.summary.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::SiderealChart;
    use crate::report::assemble_report;
    use chrono::{Duration, TimeZone, Utc};

    fn report(years_after_birth: i64) -> Report {
        let chart = SiderealChart {
            ascendant: 130.0,
            sun: 15.0,
            moon: 206.0,
            mars: 280.0,
            mercury: 170.0,
            jupiter: 95.0,
            venus: 345.0,
            saturn: 190.0,
            rahu: 45.0,
        };
        let birth = Utc.with_ymd_and_hms(1990, 6, 15, 4, 30, 0).unwrap();
        assemble_report(&chart, birth, birth + Duration::days(365 * years_after_birth)).unwrap()
    }

    #[test]
    fn test_response_fields() {
        let response = KundaliResponse::from(&report(20));
        assert_eq!(response.ascendant_info.ascendant_sign, "Leo (130.00°)");
        assert_eq!(response.planetary_info[&Planet::Sun].position, "15.00°");
        assert_eq!(response.planets_in_houses[&Planet::Ketu].house, 4);
        assert_eq!(response.planets_in_houses[&Planet::Ketu].nature, "Malefic");
        assert_eq!(response.house_rulers.get(1), Some(Planet::Sun));
        assert_eq!(response.house_rulers.len(), 12);
        assert_eq!(response.dasha_periods.len(), 9);
        assert!(matches!(response.current_dasha, PeriodView::Found(_)));
    }

    #[test]
    fn test_missing_periods_serialize_as_messages() {
        let response = KundaliResponse::from(&report(130));
        let json: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
        assert_eq!(json["current_dasha"], "No current Mahadasha found.");
        assert_eq!(json["current_antardasha"], "No current Antardasha found.");
        assert_eq!(json["ascendant_info"]["Ascendant Sign"], "Leo (130.00°)");
        assert_eq!(json["house_rulers"]["House 10"], "Venus");
        assert_eq!(json["house_rulers"].as_object().unwrap().len(), 12);
        assert_eq!(json["planets_in_houses"]["Sun"]["House Ruler"], "Mars");
    }

    #[test]
    fn test_house_rulers_serialize_in_house_order() {
        let json = KundaliResponse::from(&report(20)).to_json().unwrap();
        let positions: Vec<usize> = (1..=12)
            .map(|house| json.find(&format!("\"House {}\"", house)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{json}");
    }
}

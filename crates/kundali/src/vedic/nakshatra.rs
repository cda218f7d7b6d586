//! Nakshatra utilities for Vedic astrology.
//!
//! Nakshatras are 27 lunar mansions, each spanning 13°20' (360/27 degrees).
//! Each nakshatra is divided into 4 padas (quarters).

use serde::{Deserialize, Serialize};

use crate::graha::Planet;
use crate::zodiac::normalize_degrees;

pub const NAKSHATRA_COUNT: usize = 27;
pub const NAKSHATRA_SEGMENT_SIZE: f64 = 360.0 / 27.0;

// (display_name, planetary lord)
const NAKSHATRA_ORDER: [(&str, Planet); NAKSHATRA_COUNT] = [
    ("Ashwini", Planet::Ketu),
    ("Bharani", Planet::Venus),
    ("Krittika", Planet::Sun),
    ("Rohini", Planet::Moon),
    ("Mrigashira", Planet::Mars),
    ("Ardra", Planet::Rahu),
    ("Punarvasu", Planet::Jupiter),
    ("Pushya", Planet::Saturn),
    ("Ashlesha", Planet::Mercury),
    ("Magha", Planet::Ketu),
    ("Purva Phalguni", Planet::Venus),
    ("Uttara Phalguni", Planet::Sun),
    ("Hasta", Planet::Moon),
    ("Chitra", Planet::Mars),
    ("Swati", Planet::Rahu),
    ("Vishakha", Planet::Jupiter),
    ("Anuradha", Planet::Saturn),
    ("Jyeshtha", Planet::Mercury),
    ("Mula", Planet::Ketu),
    ("Purva Ashadha", Planet::Venus),
    ("Uttara Ashadha", Planet::Sun),
    ("Shravana", Planet::Moon),
    ("Dhanishta", Planet::Mars),
    ("Shatabhisha", Planet::Rahu),
    ("Purva Bhadrapada", Planet::Jupiter),
    ("Uttara Bhadrapada", Planet::Saturn),
    ("Revati", Planet::Mercury),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NakshatraRecord {
    pub index: usize,
    pub name: String,
    pub lord: Planet,
    pub start: f64,
    pub end: f64,
}

/// Where a longitude falls among the nakshatras.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NakshatraPosition {
    #[serde(flatten)]
    pub record: NakshatraRecord,
    pub longitude: f64,
    /// Portion of the nakshatra already traversed, in [0, 1).
    #[serde(rename = "elapsedFraction")]
    pub elapsed_fraction: f64,
    pub pada: u8,
}

fn build_nakshatra_table() -> Vec<NakshatraRecord> {
    NAKSHATRA_ORDER
        .iter()
        .enumerate()
        .map(|(idx, (name, lord))| {
            let start = idx as f64 * NAKSHATRA_SEGMENT_SIZE;
            NakshatraRecord {
                index: idx,
                name: name.to_string(),
                lord: *lord,
                start,
                end: start + NAKSHATRA_SEGMENT_SIZE,
            }
        })
        .collect()
}

lazy_static::lazy_static! {
    static ref NAKSHATRA_TABLE: Vec<NakshatraRecord> = build_nakshatra_table();
}

pub fn nakshatra_table() -> &'static [NakshatraRecord] {
    &NAKSHATRA_TABLE
}

/// Locate the nakshatra containing `longitude`.
///
/// The position is measured in nakshatra units (`lon * 27 / 360`) rather than
/// by dividing by the rounded segment width, so longitudes sitting exactly on a
/// boundary (e.g. 200°) resolve to the nakshatra that starts there.
pub fn nakshatra_of(longitude: f64) -> NakshatraPosition {
    let lon = normalize_degrees(longitude);
    let units = lon * NAKSHATRA_COUNT as f64 / 360.0;
    let whole = units.floor();
    let index = whole as usize % NAKSHATRA_COUNT;
    let elapsed_fraction = (units - whole).clamp(0.0, 1.0 - f64::EPSILON);
    let pada = ((elapsed_fraction * 4.0).floor() as u8 + 1).min(4);

    NakshatraPosition {
        record: NAKSHATRA_TABLE[index].clone(),
        longitude: lon,
        elapsed_fraction,
        pada,
    }
}

//! Whole-sign houses and their rulers.
//!
//! The sign holding the ascendant is always the first house; the following
//! signs take houses 2 through 12 in zodiacal order, regardless of degree.

use serde::{Deserialize, Serialize};

use crate::graha::Planet;
use crate::zodiac::sign::ZodiacSign;

/// Traditional rulers, indexed by sign ordinal - 1.
const SIGN_RULERS: [Planet; 12] = [
    Planet::Mars,    // Aries
    Planet::Venus,   // Taurus
    Planet::Mercury, // Gemini
    Planet::Moon,    // Cancer
    Planet::Sun,     // Leo
    Planet::Mercury, // Virgo
    Planet::Venus,   // Libra
    Planet::Mars,    // Scorpio
    Planet::Jupiter, // Sagittarius
    Planet::Saturn,  // Capricorn
    Planet::Saturn,  // Aquarius
    Planet::Jupiter, // Pisces
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseRuler {
    pub house: u8,
    pub sign: ZodiacSign,
    pub ruler: Planet,
}

pub fn sign_ruler(sign: ZodiacSign) -> Planet {
    SIGN_RULERS[sign.ordinal() as usize - 1]
}

/// Whole-sign house (1..=12) of a planet in `planet_sign`.
pub fn house_of(ascendant_sign: ZodiacSign, planet_sign: ZodiacSign) -> u8 {
    let diff = planet_sign.ordinal() as i32 - ascendant_sign.ordinal() as i32;
    (diff.rem_euclid(12) + 1) as u8
}

/// Sign and ruler for each house 1..=12.
pub fn determine_house_rulers(ascendant_sign: ZodiacSign) -> [HouseRuler; 12] {
    std::array::from_fn(|i| {
        let sign = ascendant_sign.advance(i as u8);
        HouseRuler {
            house: i as u8 + 1,
            sign,
            ruler: sign_ruler(sign),
        }
    })
}

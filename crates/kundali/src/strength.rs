//! Planetary dignity and benefic/malefic nature.
//!
//! Classification is table driven: each graha has an exaltation sign, a
//! debilitation sign and its own signs. The lunar nodes have none of these
//! and are judged only by the weak-sign rules.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::graha::Planet;
use crate::zodiac::ZodiacSign;
use crate::zodiac::ZodiacSign::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strength {
    Exalted,
    Debilitated,
    Strong,
    Weak,
    Neutral,
}

impl Strength {
    pub fn label(self) -> &'static str {
        match self {
            Strength::Exalted => "Exalted",
            Strength::Debilitated => "Debilitated",
            Strength::Strong => "Strong",
            Strength::Weak => "Weak",
            Strength::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct DignityEntry {
    exaltation: Option<ZodiacSign>,
    debilitation: Option<ZodiacSign>,
    own_signs: &'static [ZodiacSign],
    benefic: bool,
}

// Indexed in `Planet::ALL` order.
const DIGNITIES: [DignityEntry; 9] = [
    // Sun
    DignityEntry { exaltation: Some(Aries), debilitation: Some(Libra), own_signs: &[Leo], benefic: true },
    // Moon
    DignityEntry { exaltation: Some(Taurus), debilitation: Some(Scorpio), own_signs: &[Cancer], benefic: true },
    // Mars
    DignityEntry { exaltation: Some(Capricorn), debilitation: Some(Cancer), own_signs: &[Aries, Scorpio], benefic: false },
    // Mercury
    DignityEntry { exaltation: Some(Virgo), debilitation: Some(Pisces), own_signs: &[Gemini, Virgo], benefic: true },
    // Jupiter
    DignityEntry { exaltation: Some(Cancer), debilitation: Some(Capricorn), own_signs: &[Sagittarius, Pisces], benefic: true },
    // Venus
    DignityEntry { exaltation: Some(Pisces), debilitation: Some(Virgo), own_signs: &[Taurus, Libra], benefic: true },
    // Saturn
    DignityEntry { exaltation: Some(Libra), debilitation: Some(Aries), own_signs: &[Capricorn, Aquarius], benefic: false },
    // Rahu
    DignityEntry { exaltation: None, debilitation: None, own_signs: &[], benefic: false },
    // Ketu
    DignityEntry { exaltation: None, debilitation: None, own_signs: &[], benefic: false },
];

const MALEFIC_WEAK_SIGNS: &[ZodiacSign] = &[Cancer, Capricorn, Virgo, Pisces];
const BENEFIC_WEAK_SIGNS: &[ZodiacSign] = &[Scorpio, Libra, Capricorn, Aquarius];

fn entry(planet: Planet) -> &'static DignityEntry {
    &DIGNITIES[planet as usize]
}

pub fn exaltation_sign(planet: Planet) -> Option<ZodiacSign> {
    entry(planet).exaltation
}

pub fn debilitation_sign(planet: Planet) -> Option<ZodiacSign> {
    entry(planet).debilitation
}

pub fn own_signs(planet: Planet) -> &'static [ZodiacSign] {
    entry(planet).own_signs
}

pub fn is_benefic(planet: Planet) -> bool {
    entry(planet).benefic
}

/// Strength of `planet` in `sign`, plus whether the planet is a natural benefic.
/// The first matching rule wins.
pub fn evaluate(planet: Planet, sign: ZodiacSign) -> (Strength, bool) {
    let benefic = is_benefic(planet);
    let strength = if exaltation_sign(planet) == Some(sign) {
        Strength::Exalted
    } else if debilitation_sign(planet) == Some(sign) {
        Strength::Debilitated
    } else if own_signs(planet).contains(&sign) {
        Strength::Strong
    } else if !benefic && MALEFIC_WEAK_SIGNS.contains(&sign) {
        Strength::Weak
    } else if benefic && BENEFIC_WEAK_SIGNS.contains(&sign) {
        Strength::Weak
    } else {
        Strength::Neutral
    };
    (strength, benefic)
}

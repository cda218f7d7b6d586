//! Vimshottari dasha calculations.
//!
//! Dashas are time periods ruled by planets, calculated based on the Moon's
//! nakshatra at birth. The nine lords repeat in a fixed 120-year cycle; the
//! first period is cut short by the part of the birth nakshatra the Moon has
//! already crossed.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::KundaliError;
use crate::graha::Planet;
use crate::vedic::nakshatra::nakshatra_of;

pub const VIMSHOTTARI_TOTAL_YEARS: f64 = 120.0;
pub const DAYS_PER_YEAR: f64 = 365.25;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// A birth balance shorter than this is treated as already elapsed and the
/// chain starts with the next lord. Keeps every period, down to
/// Pratyantardashas of the shortest lords, at least a millisecond long.
pub const MIN_BALANCE: Duration = Duration::seconds(1);

type PlanetYears = (Planet, f64);

pub const VIMSHOTTARI_SEQUENCE: [PlanetYears; 9] = [
    (Planet::Ketu, 7.0),
    (Planet::Venus, 20.0),
    (Planet::Sun, 6.0),
    (Planet::Moon, 10.0),
    (Planet::Mars, 7.0),
    (Planet::Rahu, 18.0),
    (Planet::Jupiter, 16.0),
    (Planet::Saturn, 19.0),
    (Planet::Mercury, 17.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashaLevel {
    Mahadasha,
    Antardasha,
    Pratyantardasha,
}

impl DashaLevel {
    /// Level produced by subdividing a period of this level.
    pub fn child(self) -> Option<DashaLevel> {
        match self {
            DashaLevel::Mahadasha => Some(DashaLevel::Antardasha),
            DashaLevel::Antardasha => Some(DashaLevel::Pratyantardasha),
            DashaLevel::Pratyantardasha => None,
        }
    }
}

impl fmt::Display for DashaLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DashaLevel::Mahadasha => "Mahadasha",
            DashaLevel::Antardasha => "Antardasha",
            DashaLevel::Pratyantardasha => "Pratyantardasha",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashaPeriod {
    pub lord: Planet,
    pub level: DashaLevel,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DashaPeriod {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_days(&self) -> f64 {
        self.duration().num_milliseconds() as f64 / MILLIS_PER_DAY
    }

    /// Closed-interval containment.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Values derived from the Moon's birth longitude that seed the chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashaSeed {
    #[serde(rename = "nakshatraIndex")]
    pub nakshatra_index: usize,
    #[serde(rename = "startingLord")]
    pub starting_lord: Planet,
    #[serde(rename = "sequenceIndex")]
    pub sequence_index: usize,
    #[serde(rename = "elapsedFraction")]
    pub elapsed_fraction: f64,
    #[serde(rename = "balanceYears")]
    pub balance_years: f64,
}

fn sequence_position(lord: Planet) -> Result<usize, KundaliError> {
    VIMSHOTTARI_SEQUENCE
        .iter()
        .position(|(p, _)| *p == lord)
        .ok_or_else(|| KundaliError::Logic(format!("Planet '{}' not found in sequence", lord)))
}

fn years_to_duration(years: f64) -> Duration {
    Duration::milliseconds((years * DAYS_PER_YEAR * MILLIS_PER_DAY).round() as i64)
}

pub fn dasha_seed(moon_longitude: f64) -> DashaSeed {
    let nakshatra = nakshatra_of(moon_longitude);
    let sequence_index = nakshatra.record.index % VIMSHOTTARI_SEQUENCE.len();
    let (starting_lord, years) = VIMSHOTTARI_SEQUENCE[sequence_index];
    let elapsed_fraction = nakshatra.elapsed_fraction;

    DashaSeed {
        nakshatra_index: nakshatra.record.index,
        starting_lord,
        sequence_index,
        elapsed_fraction,
        balance_years: years * (1.0 - elapsed_fraction),
    }
}

/// Compute the nine Mahadasha periods following birth.
pub fn compute_mahadashas(moon_longitude: f64, birth: DateTime<Utc>) -> Vec<DashaPeriod> {
    let seed = dasha_seed(moon_longitude);
    log::debug!(
        "dasha seed: nakshatra {} lord {} balance {:.4}y",
        seed.nakshatra_index,
        seed.starting_lord,
        seed.balance_years
    );

    let balance = years_to_duration(seed.balance_years);
    let first_offset = if balance < MIN_BALANCE {
        log::debug!("balance of {} is under {:?}, starting with the next lord", seed.starting_lord, MIN_BALANCE);
        1
    } else {
        0
    };

    let mut current_start = birth;
    let mut periods = Vec::with_capacity(VIMSHOTTARI_SEQUENCE.len());

    for offset in first_offset..first_offset + VIMSHOTTARI_SEQUENCE.len() {
        let seq_index = (seed.sequence_index + offset) % VIMSHOTTARI_SEQUENCE.len();
        let (lord, years) = VIMSHOTTARI_SEQUENCE[seq_index];

        // First period is partial depending on Moon's position within the nakshatra
        let duration = if offset == 0 { balance } else { years_to_duration(years) };

        let end = current_start + duration;
        periods.push(DashaPeriod {
            lord,
            level: DashaLevel::Mahadasha,
            start: current_start,
            end,
        });
        current_start = end;
    }

    periods
}

/// Split `parent` into nine sub-periods proportional to the canonical lengths,
/// starting from the parent's own lord.
///
/// Proportions apply to the parent's actual span, which for the first
/// Mahadasha is the truncated balance rather than the full canonical length.
/// Boundaries come from cumulative proportions and the last child ends exactly
/// at the parent's end, so the children always sum to the parent.
pub fn subdivide_period(parent: &DashaPeriod) -> Result<Vec<DashaPeriod>, KundaliError> {
    let level = parent.level.child().ok_or_else(|| {
        KundaliError::Logic(format!("{} periods cannot be subdivided", parent.level))
    })?;
    let start_index = sequence_position(parent.lord)?;
    let span_ms = parent.duration().num_milliseconds() as f64;

    let mut children = Vec::with_capacity(VIMSHOTTARI_SEQUENCE.len());
    let mut child_start = parent.start;
    let mut cumulative_years = 0.0;

    for offset in 0..VIMSHOTTARI_SEQUENCE.len() {
        let (lord, years) = VIMSHOTTARI_SEQUENCE[(start_index + offset) % VIMSHOTTARI_SEQUENCE.len()];
        cumulative_years += years;

        let child_end = if offset + 1 == VIMSHOTTARI_SEQUENCE.len() {
            parent.end
        } else {
            let elapsed_ms = (span_ms * cumulative_years / VIMSHOTTARI_TOTAL_YEARS).round() as i64;
            parent.start + Duration::milliseconds(elapsed_ms)
        };

        children.push(DashaPeriod {
            lord,
            level,
            start: child_start,
            end: child_end,
        });
        child_start = child_end;
    }

    Ok(children)
}

/// Antardasha periods of one Mahadasha.
pub fn compute_antardashas(mahadasha: &DashaPeriod) -> Result<Vec<DashaPeriod>, KundaliError> {
    if mahadasha.level != DashaLevel::Mahadasha {
        return Err(KundaliError::Logic(format!(
            "expected a Mahadasha period, got {}",
            mahadasha.level
        )));
    }
    subdivide_period(mahadasha)
}

/// First period whose closed range contains `instant`.
pub fn find_period(periods: &[DashaPeriod], instant: DateTime<Utc>) -> Option<&DashaPeriod> {
    periods.iter().find(|p| p.contains(instant))
}

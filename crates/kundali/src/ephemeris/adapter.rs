use async_trait::async_trait;
use kundali_config::EphemerisSettings;
use libswisseph_sys::tuple_result::{swe_set_ephe_path, swe_set_sid_mode};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use swisseph::swe::{calc_ut, houses_ex};
use swisseph::AscMc;

use crate::ephemeris::types::{Ephemeris, GeoLocation, SiderealChart};
use crate::error::EphemerisError;

const DEFAULT_EPHEMERIS_PATH: &str = "/usr/local/share/swisseph";

// Swiss Ephemeris flags
const FLG_SWIEPH: i32 = 2;
const FLG_SIDEREAL: i32 = 64;

// Swiss Ephemeris body codes. Rahu is the true node.
const SUN: i32 = 0;
const MOON: i32 = 1;
const MERCURY: i32 = 2;
const VENUS: i32 = 3;
const MARS: i32 = 4;
const JUPITER: i32 = 5;
const SATURN: i32 = 6;
const TRUE_NODE: i32 = 11;

const WHOLE_SIGN: u8 = b'W';

// The binding copies the path into a 256-byte C buffer that must stay NUL terminated.
const MAX_EPHEMERIS_PATH_LEN: usize = 255;

/// Ayanamsa mapping - Swiss Ephemeris SIDM_* constants
const AYANAMSAS: &[(&str, i32)] = &[
    ("fagan_bradley", 0),
    ("lahiri", 1),
    ("chitrapaksha", 1),
    ("de_luce", 2),
    ("raman", 3),
    ("ushashashi", 4),
    ("krishnamurti", 5),
    ("djwhal_khul", 6),
    ("yukteshwar", 7),
    ("true_citra", 27),
    ("true_revati", 28),
];

/// Path and sidereal mode last handed to the library.
type LibraryConfig = Option<(String, i32)>;

lazy_static::lazy_static! {
    // The C library keeps the ephemeris path and sidereal mode in process-wide state.
    static ref SWISSEPH_LOCK: Mutex<LibraryConfig> = Mutex::new(None);
}

/// Swiss Ephemeris backed source of sidereal charts.
pub struct SwissEphemerisAdapter {
    ephemeris_path: String,
    sidereal_mode: i32,
}

impl SwissEphemerisAdapter {
    pub fn new(settings: &EphemerisSettings) -> Result<Self, EphemerisError> {
        let path = settings
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EPHEMERIS_PATH));

        if !path.exists() {
            return Err(EphemerisError::FileNotFound {
                path: path.display().to_string(),
                message: "Ephemeris path does not exist. Please ensure Swiss Ephemeris data files are installed.".to_string(),
            });
        }

        let ephemeris_path = path
            .to_str()
            .ok_or_else(|| EphemerisError::FileNotFound {
                path: path.display().to_string(),
                message: "Ephemeris path is not valid UTF-8.".to_string(),
            })?
            .to_string();
        if ephemeris_path.len() >= MAX_EPHEMERIS_PATH_LEN {
            return Err(EphemerisError::FileNotFound {
                path: ephemeris_path,
                message: format!("Ephemeris path must be shorter than {} bytes.", MAX_EPHEMERIS_PATH_LEN),
            });
        }

        let sidereal_mode = resolve_ayanamsa(&settings.ayanamsa)?;
        log::info!(
            "Swiss Ephemeris ready at {} (ayanamsa {}, mode {})",
            path.display(),
            settings.ayanamsa,
            sidereal_mode
        );

        let adapter = Self {
            ephemeris_path,
            sidereal_mode,
        };
        let mut config = SWISSEPH_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        adapter.configure_library(&mut config);
        Ok(adapter)
    }

    /// Point the library at this adapter's files and ayanamsa unless it already is.
    fn configure_library(&self, config: &mut LibraryConfig) {
        let wanted = (self.ephemeris_path.clone(), self.sidereal_mode);
        if config.as_ref() == Some(&wanted) {
            return;
        }
        // SAFETY: both calls only copy their arguments into the library's global
        // settings, and `new` keeps the path short enough for the binding's buffer.
        unsafe {
            swe_set_ephe_path(&self.ephemeris_path);
            swe_set_sid_mode(self.sidereal_mode, 0.0, 0.0);
        }
        log::debug!("Swiss Ephemeris switched to {} (mode {})", wanted.0, wanted.1);
        *config = Some(wanted);
    }

    fn body_longitude(&self, body: &str, code: i32, jd: f64, flags: i32) -> Result<f64, EphemerisError> {
        let result = calc_ut(jd, code as u32, flags as u32).map_err(|e| {
            EphemerisError::CalculationFailed {
                body: body.to_string(),
                julian_day: jd,
                message: format!("Swiss Ephemeris error: {}", e),
            }
        })?;
        let longitude = result.out[0];
        if !longitude.is_finite() {
            return Err(EphemerisError::CalculationFailed {
                body: body.to_string(),
                julian_day: jd,
                message: "non-finite longitude".to_string(),
            });
        }
        Ok(longitude.rem_euclid(360.0))
    }
}

fn resolve_ayanamsa(name: &str) -> Result<i32, EphemerisError> {
    let wanted = name.trim().to_lowercase();
    AYANAMSAS
        .iter()
        .find(|(candidate, _)| *candidate == wanted)
        .map(|(_, mode)| *mode)
        .ok_or_else(|| EphemerisError::InvalidAyanamsa {
            ayanamsa: name.to_string(),
            valid: AYANAMSAS.iter().map(|(n, _)| n.to_string()).collect(),
        })
}

#[async_trait]
impl Ephemeris for SwissEphemerisAdapter {
    async fn sidereal_chart(
        &self,
        julian_day: f64,
        location: GeoLocation,
    ) -> Result<SiderealChart, EphemerisError> {
        let flags = FLG_SWIEPH | FLG_SIDEREAL;

        // Another adapter may have switched the global mode since construction.
        let mut config = SWISSEPH_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        self.configure_library(&mut config);

        let (_cusps, ascmc) = houses_ex(
            julian_day,
            flags,
            location.lat,
            location.lon,
            WHOLE_SIGN as i32,
        );
        let ascendant = AscMc::from_array(ascmc).ascendant.rem_euclid(360.0);

        Ok(SiderealChart {
            ascendant,
            sun: self.body_longitude("Sun", SUN, julian_day, flags)?,
            moon: self.body_longitude("Moon", MOON, julian_day, flags)?,
            mars: self.body_longitude("Mars", MARS, julian_day, flags)?,
            mercury: self.body_longitude("Mercury", MERCURY, julian_day, flags)?,
            jupiter: self.body_longitude("Jupiter", JUPITER, julian_day, flags)?,
            venus: self.body_longitude("Venus", VENUS, julian_day, flags)?,
            saturn: self.body_longitude("Saturn", SATURN, julian_day, flags)?,
            rahu: self.body_longitude("Rahu", TRUE_NODE, julian_day, flags)?,
        })
    }
}

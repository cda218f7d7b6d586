pub mod dashas;
pub mod nakshatra;

pub use dashas::{
    compute_antardashas, compute_mahadashas, dasha_seed, find_period, subdivide_period, DashaLevel,
    DashaPeriod, DashaSeed, DAYS_PER_YEAR, MIN_BALANCE, VIMSHOTTARI_SEQUENCE, VIMSHOTTARI_TOTAL_YEARS,
};
pub use nakshatra::{nakshatra_of, nakshatra_table, NakshatraPosition, NakshatraRecord};

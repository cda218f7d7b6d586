pub mod julian;
pub mod types;

#[cfg(feature = "swisseph")]
pub mod adapter;

#[cfg(feature = "swisseph")]
pub use adapter::SwissEphemerisAdapter;
pub use julian::{datetime_from_julian_day, julian_day};
pub use types::{Ephemeris, GeoLocation, SiderealChart};

//! Kundali: Vedic natal charts and Vimshottari dasha timelines.
//!
//! The computation core (signs, houses, dignities, nakshatras, dashas and the
//! report) is synchronous and pure. Geocoding, the ephemeris and the chat
//! backend are async collaborators behind traits, with HTTP implementations
//! in [`opencage`] and [`openai`]; [`KundaliService`] wires them together.

pub mod birth;
pub mod chat;
pub mod ephemeris;
pub mod error;
pub mod geocode;
pub mod graha;
pub mod openai;
pub mod opencage;
pub mod presentation;
pub mod report;
pub mod service;
pub mod strength;
pub mod vedic;
pub mod zodiac;

pub use birth::{parse_birth_moment, BirthDetails};
pub use chat::{build_chat_request, ChatBackend, ChatMessage, ChatRequest, ChatRole, Chatbot};
pub use ephemeris::{julian_day, Ephemeris, GeoLocation, SiderealChart};
pub use error::{ChatError, EphemerisError, KundaliError, LookupError};
pub use geocode::{GeocodeCache, Geocoder};
pub use graha::Planet;
pub use openai::OpenAiChatBackend;
pub use opencage::OpenCageGeocoder;
pub use presentation::KundaliResponse;
pub use report::{assemble_report, render_summary, PlanetPlacement, Report};
pub use service::KundaliService;
pub use strength::{evaluate, Strength};
pub use vedic::{compute_antardashas, compute_mahadashas, find_period, subdivide_period, DashaLevel, DashaPeriod};
pub use zodiac::{determine_house_rulers, house_of, sign_of, HouseRuler, ZodiacSign};

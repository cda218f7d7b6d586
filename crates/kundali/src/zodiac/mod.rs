pub mod houses;
pub mod sign;

pub use houses::{determine_house_rulers, house_of, sign_ruler, HouseRuler};
pub use sign::{normalize_degrees, sign_of, ZodiacSign, SIGN_SPAN};

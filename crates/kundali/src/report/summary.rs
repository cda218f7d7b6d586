//! Plain-text report summary.
//!
//! The wording and line order here are read by the chat collaborator and by
//! display layers; keep them stable.

use crate::report::assembler::PlanetPlacement;
use crate::vedic::DashaPeriod;
use crate::zodiac::ZodiacSign;

pub const SUMMARY_DATE_FORMAT: &str = "%Y-%m-%d";
pub const NO_CURRENT_MAHADASHA: &str = "No current Mahadasha found.";
pub const NO_CURRENT_ANTARDASHA: &str = "No current Antardasha found.";

pub fn render_summary(
    ascendant_sign: ZodiacSign,
    ascendant_longitude: f64,
    placements: &[PlanetPlacement],
    current_mahadasha: Option<&DashaPeriod>,
    current_antardasha: Option<&DashaPeriod>,
) -> String {
    let mut summary = String::from("Kundali Report Summary:\n");
    summary.push_str(&format!(
        "Ascendant (Lagna): {} ({:.2}°)\n\n",
        ascendant_sign, ascendant_longitude
    ));

    summary.push_str("Planetary Positions:\n");
    for placement in placements {
        summary.push_str(&format!(
            "{}: {:.2}° in {}, House {} ({}), Strength: {}, Nature: {}\n",
            placement.planet,
            placement.longitude,
            placement.sign,
            placement.house,
            placement.house_ruler,
            placement.strength,
            if placement.is_benefic { "Benefic" } else { "Malefic" },
        ));
    }
    summary.push('\n');

    summary.push_str(&period_line("Mahadasha", current_mahadasha, NO_CURRENT_MAHADASHA));
    summary.push_str(&period_line("Antardasha", current_antardasha, NO_CURRENT_ANTARDASHA));
    summary
}

fn period_line(label: &str, period: Option<&DashaPeriod>, missing: &str) -> String {
    match period {
        Some(p) => format!(
            "Current {}: {} (from {} to {})\n",
            label,
            p.lord,
            p.start.format(SUMMARY_DATE_FORMAT),
            p.end.format(SUMMARY_DATE_FORMAT)
        ),
        None => format!("Current {}: {}\n", label, missing),
    }
}

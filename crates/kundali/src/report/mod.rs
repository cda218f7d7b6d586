pub mod assembler;
pub mod summary;

pub use assembler::{assemble_report, build_placements, PlanetPlacement, Report};
pub use summary::{
    render_summary, NO_CURRENT_ANTARDASHA, NO_CURRENT_MAHADASHA, SUMMARY_DATE_FORMAT,
};

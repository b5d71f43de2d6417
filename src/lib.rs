//! Conceptual sizing of eVTOL aircraft.
//!
//! The member crates hold the models; this façade re-exports them under short names and
//! adds [`study`], the load → size → hinge → export workflow shared by the front-ends.

pub mod study;

pub use evtol_aircraft as aircraft;
pub use evtol_config as config;
pub use evtol_core as base;
pub use evtol_export as export;
pub use evtol_hinge as hinge;
pub use evtol_mass as mass;
pub use evtol_mission as mission;
pub use evtol_sizing as sizing;
pub use evtol_weights as weights;

pub use study::{Study, StudyError, StudyOutcome};

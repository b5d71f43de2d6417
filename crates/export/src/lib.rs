//! Export helpers: versioned concept store, CSV tables, and the convergence plot.

pub mod plot;
pub mod store;
pub mod tables;

use thiserror::Error;

pub use plot::plot_convergence;
pub use store::{ConceptStore, StoredConcept};
pub use tables::{
    MassRow, mass_rows, write_hinge_distribution, write_history, write_mass_breakdown, write_mission,
    writer_for_path,
};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("plotting failed: {0}")]
    Plot(String),
    #[error("no stored concept '{name}'{}", .version.map(|v| format!(" version {v}")).unwrap_or_default())]
    NotFound { name: String, version: Option<u32> },
    #[error("'{0}' cannot be used as a concept file name")]
    InvalidName(String),
}

//! How distributed lift and engine point loads are combined, per concept.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Combination of the distributed and point-load contributions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combination {
    /// Engine weight relieves the lift shear: `V = V_d - V_p`.
    #[default]
    Superpose,
    /// Envelope of the two cases taken separately: `V = max(V_d, V_p)`.
    MaxOfComponents,
}

/// Per-concept exceptions to the default policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConceptOverride {
    pub combination: Option<Combination>,
    /// Half-wing engine stations (η), replacing the table keyed by engine count.
    pub engine_stations: Option<Vec<f64>>,
}

/// Hinge load policy: a default combination plus overrides keyed by aircraft name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HingePolicy {
    pub combination: Combination,
    pub overrides: BTreeMap<String, ConceptOverride>,
}

/// Policy in effect for one concept.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPolicy {
    pub combination: Combination,
    pub engine_stations: Option<Vec<f64>>,
}

impl HingePolicy {
    pub fn with_override(mut self, aircraft: impl Into<String>, entry: ConceptOverride) -> Self {
        self.overrides.insert(aircraft.into(), entry);
        self
    }

    pub fn resolve(&self, aircraft: &str) -> ResolvedPolicy {
        let entry = self.overrides.get(aircraft);
        ResolvedPolicy {
            combination: entry
                .and_then(|o| o.combination)
                .unwrap_or(self.combination),
            engine_stations: entry.and_then(|o| o.engine_stations.clone()),
        }
    }
}

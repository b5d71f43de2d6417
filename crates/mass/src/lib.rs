//! Mass breakdown tree with centre-of-gravity aggregation.
//!
//! A [`MassObject`] is either a leaf carrying its own mass and cg, or a group whose
//! mass and cg are the mass-weighted aggregate of its children. Trees are usually
//! built from a nested [`MassBreakdown`] mapping produced by the sizing loop, then
//! given leaf cg positions from a [`CgTable`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reserved key in a [`MassBreakdown`] group holding the group's own mass.
pub const TOTAL_KEY: &str = "total";

/// Relative tolerance used when checking a reserved total against its children.
const TOTAL_REL_TOL: f64 = 1e-6;

/// Lookup of component name to cg fraction in `[0, 1]`.
pub type CgTable = BTreeMap<String, f64>;

/// Nested `{component: mass | {...}}` mapping, masses in kilograms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MassBreakdown {
    Mass(f64),
    Group(BTreeMap<String, MassBreakdown>),
}

impl MassBreakdown {
    /// Build a group from `(name, entry)` pairs.
    pub fn group<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, MassBreakdown)>,
        S: Into<String>,
    {
        MassBreakdown::Group(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Summed mass of this entry. A reserved `total` key takes precedence over children.
    pub fn total(&self) -> f64 {
        match self {
            MassBreakdown::Mass(m) => *m,
            MassBreakdown::Group(map) => match map.get(TOTAL_KEY) {
                Some(total) => total.total(),
                None => map.values().map(MassBreakdown::total).sum(),
            },
        }
    }

    /// Mass of the entry at a dotted path (e.g. `airframe.wing`).
    pub fn get(&self, path: &str) -> Option<f64> {
        let mut node = self;
        for segment in path.split('.') {
            match node {
                MassBreakdown::Group(map) => node = map.get(segment)?,
                MassBreakdown::Mass(_) => return None,
            }
        }
        Some(node.total())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum MassError {
    #[error("component '{name}' has non-positive mass {mass}")]
    NonPositiveMass { name: String, mass: f64 },
    #[error("component '{name}' has cg {cg} outside [0, 1]")]
    CgOutOfRange { name: String, cg: f64 },
    #[error("leaf component '{name}' has no cg assigned")]
    MissingCg { name: String },
    #[error("group '{name}' declares total {total} kg but its children sum to {sum} kg")]
    InconsistentTotal { name: String, total: f64, sum: f64 },
    #[error("group '{0}' has no components")]
    EmptyGroup(String),
    #[error("no component at path '{0}'")]
    UnknownPath(String),
    #[error("component '{0}' is a group; only leaves can be edited directly")]
    NotALeaf(String),
    #[error("component name '{0}' appears more than once in the same group")]
    DuplicateChild(String),
}

/// Named node of the mass tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassObject {
    name: String,
    mass: f64,
    #[serde(default)]
    cg: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    children: BTreeMap<String, MassObject>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CgPolicy {
    /// Every leaf must have a cg.
    Strict,
    /// Groups with any cg-less leaf below them keep `cg = None`.
    Lenient,
}

impl MassObject {
    /// Leaf with an explicit cg.
    pub fn leaf(name: impl Into<String>, mass: f64, cg: f64) -> Result<Self, MassError> {
        let name = name.into();
        check_mass(&name, mass)?;
        check_cg(&name, cg)?;
        Ok(Self {
            name,
            mass,
            cg: Some(cg),
            children: BTreeMap::new(),
        })
    }

    /// Leaf whose cg will be assigned later (e.g. via [`MassObject::set_cg_from_table`]).
    pub fn leaf_without_cg(name: impl Into<String>, mass: f64) -> Result<Self, MassError> {
        let name = name.into();
        check_mass(&name, mass)?;
        Ok(Self {
            name,
            mass,
            cg: None,
            children: BTreeMap::new(),
        })
    }

    /// Group node aggregated from `children`. Children must all carry a cg and have
    /// distinct names.
    pub fn group<I>(name: impl Into<String>, children: I) -> Result<Self, MassError>
    where
        I: IntoIterator<Item = MassObject>,
    {
        let name = name.into();
        let mut by_name = BTreeMap::new();
        for child in children {
            if let Some(previous) = by_name.insert(child.name.clone(), child) {
                return Err(MassError::DuplicateChild(previous.name));
            }
        }
        let children = by_name;
        if children.is_empty() {
            return Err(MassError::EmptyGroup(name));
        }
        let mut node = Self {
            name,
            mass: 0.0,
            cg: None,
            children,
        };
        node.aggregate()?;
        Ok(node)
    }

    /// Build a tree from a nested breakdown. Leaves start without a cg; group masses
    /// are aggregated immediately.
    pub fn from_breakdown(name: impl Into<String>, breakdown: &MassBreakdown) -> Result<Self, MassError> {
        let mut node = build_node(name.into(), breakdown)?;
        node.recompute(CgPolicy::Lenient)?;
        Ok(node)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn cg(&self) -> Option<f64> {
        self.cg
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> impl Iterator<Item = &MassObject> {
        self.children.values()
    }

    /// Direct child by name.
    pub fn get_child(&self, name: &str) -> Option<&MassObject> {
        self.children.get(name)
    }

    /// Mutable direct child by name. Callers must re-aggregate after editing.
    pub fn get_child_mut(&mut self, name: &str) -> Option<&mut MassObject> {
        self.children.get_mut(name)
    }

    /// Descendant at a dotted path relative to this node (e.g. `airframe.wing`).
    pub fn find(&self, path: &str) -> Option<&MassObject> {
        path.split('.')
            .try_fold(self, |node, segment| node.children.get(segment))
    }

    fn find_mut(&mut self, path: &str) -> Option<&mut MassObject> {
        path.split('.')
            .try_fold(self, |node, segment| node.children.get_mut(segment))
    }

    /// Mass at a dotted path, or `None` when the path does not exist.
    pub fn mass_of(&self, path: &str) -> Option<f64> {
        self.find(path).map(|node| node.mass)
    }

    /// Recompute mass and cg of every node bottom-up. Every leaf must carry a cg.
    pub fn aggregate(&mut self) -> Result<(), MassError> {
        self.recompute(CgPolicy::Strict)
    }

    /// Replace the mass of the leaf at `path` and propagate the change to this node.
    pub fn set_leaf_mass(&mut self, path: &str, mass: f64) -> Result<(), MassError> {
        let node = self
            .find_mut(path)
            .ok_or_else(|| MassError::UnknownPath(path.to_string()))?;
        if !node.is_leaf() {
            return Err(MassError::NotALeaf(path.to_string()));
        }
        check_mass(&node.name, mass)?;
        node.mass = mass;
        self.recompute(CgPolicy::Lenient)
    }

    /// Replace the cg of the leaf at `path` and propagate the change to this node.
    pub fn set_leaf_cg(&mut self, path: &str, cg: f64) -> Result<(), MassError> {
        let node = self
            .find_mut(path)
            .ok_or_else(|| MassError::UnknownPath(path.to_string()))?;
        if !node.is_leaf() {
            return Err(MassError::NotALeaf(path.to_string()));
        }
        check_cg(&node.name, cg)?;
        node.cg = Some(cg);
        self.recompute(CgPolicy::Lenient)
    }

    /// Override leaf cgs by component name and re-aggregate the whole tree.
    ///
    /// Leaves missing from `table` keep their current cg; the final aggregation is
    /// strict, so every leaf must end up with one.
    pub fn set_cg_from_table(&mut self, table: &CgTable) -> Result<(), MassError> {
        self.assign_cgs(table)?;
        self.aggregate()
    }

    fn assign_cgs(&mut self, table: &CgTable) -> Result<(), MassError> {
        if self.is_leaf() {
            if let Some(&cg) = table.get(&self.name) {
                check_cg(&self.name, cg)?;
                self.cg = Some(cg);
            }
            return Ok(());
        }
        for child in self.children.values_mut() {
            child.assign_cgs(table)?;
        }
        Ok(())
    }

    /// All leaves with their dotted paths, in tree order.
    pub fn leaves(&self) -> Vec<(String, &MassObject)> {
        let mut out = Vec::new();
        for child in self.children.values() {
            child.collect_leaves(child.name.clone(), &mut out);
        }
        if self.is_leaf() {
            out.push((self.name.clone(), self));
        }
        out
    }

    fn collect_leaves<'a>(&'a self, path: String, out: &mut Vec<(String, &'a MassObject)>) {
        if self.is_leaf() {
            out.push((path, self));
            return;
        }
        for child in self.children.values() {
            child.collect_leaves(format!("{path}.{}", child.name), out);
        }
    }

    /// Convert back into a nested breakdown (without reserved totals).
    pub fn to_breakdown(&self) -> MassBreakdown {
        if self.is_leaf() {
            MassBreakdown::Mass(self.mass)
        } else {
            MassBreakdown::Group(
                self.children
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_breakdown()))
                    .collect(),
            )
        }
    }

    fn recompute(&mut self, policy: CgPolicy) -> Result<(), MassError> {
        if self.is_leaf() {
            check_mass(&self.name, self.mass)?;
            return match self.cg {
                Some(cg) => check_cg(&self.name, cg),
                None if policy == CgPolicy::Strict => Err(MassError::MissingCg {
                    name: self.name.clone(),
                }),
                None => Ok(()),
            };
        }

        let mut mass = 0.0;
        let mut moment = 0.0;
        let mut cg_known = true;
        for child in self.children.values_mut() {
            child.recompute(policy)?;
            mass += child.mass;
            match child.cg {
                Some(cg) => moment += child.mass * cg,
                None => cg_known = false,
            }
        }
        check_mass(&self.name, mass)?;
        self.mass = mass;
        self.cg = cg_known.then(|| moment / mass);
        Ok(())
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let cg = self
            .cg
            .map(|cg| format!("{cg:.3}"))
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            f,
            "{:indent$}{:<24} {:>10.2} kg  cg {}",
            "",
            self.name,
            self.mass,
            cg,
            indent = depth * 2
        )?;
        for child in self.children.values() {
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for MassObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

fn build_node(name: String, breakdown: &MassBreakdown) -> Result<MassObject, MassError> {
    let map = match breakdown {
        MassBreakdown::Mass(mass) => return MassObject::leaf_without_cg(name, *mass),
        MassBreakdown::Group(map) => map,
    };

    let declared_total = map.get(TOTAL_KEY).map(MassBreakdown::total);
    let mut children = BTreeMap::new();
    for (child_name, entry) in map.iter().filter(|(k, _)| k.as_str() != TOTAL_KEY) {
        children.insert(child_name.clone(), build_node(child_name.clone(), entry)?);
    }

    if children.is_empty() {
        return match declared_total {
            Some(total) => MassObject::leaf_without_cg(name, total),
            None => Err(MassError::EmptyGroup(name)),
        };
    }

    if let Some(total) = declared_total {
        let sum: f64 = children.values().map(|c: &MassObject| c.mass).sum();
        if (sum - total).abs() > TOTAL_REL_TOL * total.abs().max(1.0) {
            log::error!("mass group '{name}' total {total} kg disagrees with children ({sum} kg)");
            return Err(MassError::InconsistentTotal { name, total, sum });
        }
    }

    Ok(MassObject {
        name,
        mass: 0.0,
        cg: None,
        children,
    })
}

fn check_mass(name: &str, mass: f64) -> Result<(), MassError> {
    if mass > 0.0 && mass.is_finite() {
        Ok(())
    } else {
        Err(MassError::NonPositiveMass {
            name: name.to_string(),
            mass,
        })
    }
}

fn check_cg(name: &str, cg: f64) -> Result<(), MassError> {
    if (0.0..=1.0).contains(&cg) {
        Ok(())
    } else {
        Err(MassError::CgOutOfRange {
            name: name.to_string(),
            cg,
        })
    }
}

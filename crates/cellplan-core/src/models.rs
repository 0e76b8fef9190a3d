//! Core data models for the capacity planner.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::str::FromStr;

/// A deployed base station from the operator's catalog.
///
/// Constructed once per catalog entry and read-only afterwards; the
/// estimator never mutates a station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub station_id: u32,
    pub name: String,
    /// Coverage area in square kilometers (zero is legal, yields zero radius)
    pub coverage_area_sq_km: f64,
    pub frequency_hz: u64,
    pub antenna_type: String,
    /// Lower bound of the acceptable handover range
    #[serde(default)]
    pub handover_min: Option<f64>,
    /// Upper bound of the acceptable handover range
    #[serde(default)]
    pub handover_max: Option<f64>,
    /// Measured average handover value, filled by the lookup collaborator.
    /// Absent means "unknown", which is distinct from "known and failing".
    #[serde(default)]
    pub handover_avg: Option<f64>,
    /// Technology label (4G, 5G, ...)
    pub standard: String,
    /// Free-text installation coordinates, unused by the estimator
    #[serde(default)]
    pub installation_coordinates: String,
}

impl Station {
    /// Coverage radius derived from the coverage area: `sqrt(area / pi)`.
    ///
    /// Negative areas are not validated here; ingestion owns rejecting
    /// malformed input, and a negative area propagates as NaN.
    pub fn radius_km(&self) -> f64 {
        (self.coverage_area_sq_km / PI).sqrt()
    }

    /// Coverage diameter, twice the radius.
    pub fn diameter_km(&self) -> f64 {
        2.0 * self.radius_km()
    }

    /// Three-valued handover verdict for this station.
    ///
    /// `None` when the measured average or either bound is missing,
    /// `Some(true)` when the average lies within `[min, max]` inclusive,
    /// `Some(false)` when it is known and outside the bounds.
    pub fn handover_ok(&self) -> Option<bool> {
        let avg = self.handover_avg?;
        let min = self.handover_min?;
        let max = self.handover_max?;
        Some(min <= avg && avg <= max)
    }
}

/// Build-density classification of a zone.
///
/// Closed enumeration; the coefficient table is exhaustive by construction,
/// so a new classification without a coefficient fails to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildClass {
    /// Dense urban build-up
    Dense,
    /// Medium-density build-up
    Medium,
    /// Light/rural build-up
    Rural,
}

impl BuildClass {
    /// Clutter coefficient K for this classification.
    pub fn coefficient(&self) -> f64 {
        match self {
            BuildClass::Dense => 1.21,
            BuildClass::Medium => 0.90,
            BuildClass::Rural => 0.47,
        }
    }
}

impl FromStr for BuildClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dense" | "hard" => Ok(BuildClass::Dense),
            "medium" => Ok(BuildClass::Medium),
            "rural" | "light" => Ok(BuildClass::Rural),
            other => Err(format!("unknown build classification '{other}'")),
        }
    }
}

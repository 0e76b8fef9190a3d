//! Handover-quality lookup collaborator.
//!
//! The estimator core never performs network calls; this crate resolves
//! each station's measured handover average before zones are built. Any
//! transport failure resolves to either "unknown" or the best-effort
//! fallback value here, so the core sees nothing but a plain optional
//! number per station.

pub mod client;

pub use client::{ApiHandoverClient, DEFAULT_HANDOVER_AVG};

use std::collections::HashMap;

use cellplan_core::Station;

/// Source of measured handover averages, keyed by station id.
///
/// `None` means the value is unknown (station not found), which is
/// distinct from a known-failing measurement.
pub trait HandoverProvider {
    fn handover_avg(
        &self,
        station_id: u32,
    ) -> impl std::future::Future<Output = Option<f64>> + Send;
}

/// Fixed in-memory provider for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticHandoverProvider {
    averages: HashMap<u32, f64>,
}

impl StaticHandoverProvider {
    pub fn new(averages: HashMap<u32, f64>) -> Self {
        Self { averages }
    }
}

impl HandoverProvider for StaticHandoverProvider {
    async fn handover_avg(&self, station_id: u32) -> Option<f64> {
        self.averages.get(&station_id).copied()
    }
}

/// Fill each station's measured handover average from the provider.
///
/// Runs once at ingestion time; stations are read-only afterwards.
pub async fn resolve_handover_averages(
    stations: &mut [Station],
    provider: &impl HandoverProvider,
) {
    for station in stations.iter_mut() {
        station.handover_avg = provider.handover_avg(station.station_id).await;
    }
    tracing::debug!(count = stations.len(), "resolved handover averages");
}

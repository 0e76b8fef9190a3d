//! Zone estimator: turns a zone's station catalog into an estimated
//! station count via chained sub-computations (per-station cell counts,
//! their mean, frequency-diverse cluster selection, the cluster sizing
//! constant, and the handover correction).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::f64::consts::PI;

use crate::error::{EstimateError, EstimateResult};
use crate::models::{BuildClass, Station};

/// Number of stations in a frequency-reuse cluster.
pub const CLUSTER_SIZE: usize = 3;

/// Capacity penalty applied when the zone-level handover verdict fails.
pub const HANDOVER_PENALTY: f64 = 1.4;

/// A geographic service district under evaluation.
///
/// Holds an immutable snapshot of its station list; every estimator
/// operation is a read-only query and is deterministic for the same
/// list contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    pub area_km2: f64,
    pub build_class: BuildClass,
    pub stations: Vec<Station>,
}

impl Zone {
    pub fn new(
        name: impl Into<String>,
        area_km2: f64,
        build_class: BuildClass,
        stations: Vec<Station>,
    ) -> Self {
        Self {
            name: name.into(),
            area_km2,
            build_class,
            stations,
        }
    }

    /// Zone reference radius: `R0 = sqrt(area / pi)`.
    pub fn r0_km(&self) -> f64 {
        (self.area_km2 / PI).sqrt()
    }

    /// Cell count contributed by one station: `L = K * (R0 / R)^2`.
    ///
    /// A station with zero coverage radius makes the ratio undefined;
    /// that is malformed input and is surfaced as an error rather than
    /// silently defaulted.
    pub fn cell_count_for(&self, station: &Station) -> EstimateResult<f64> {
        let r = station.radius_km();
        if r == 0.0 {
            return Err(EstimateError::DivisionByZero {
                station: station.name.clone(),
            });
        }
        let ratio = self.r0_km() / r;
        Ok(self.build_class.coefficient() * ratio * ratio)
    }

    /// Arithmetic mean of the per-station cell counts.
    ///
    /// The empty-zone check comes first so the error can name the zone,
    /// instead of being inferred from a division failure.
    pub fn l_avg(&self) -> EstimateResult<f64> {
        if self.stations.is_empty() {
            return Err(EstimateError::EmptyZone {
                zone: self.name.clone(),
            });
        }
        let mut total = 0.0;
        for station in &self.stations {
            total += self.cell_count_for(station)?;
        }
        Ok(total / self.stations.len() as f64)
    }

    /// Select the 3 stations forming the frequency-reuse cluster.
    ///
    /// Stations are sorted by diameter descending (stable, so ties keep
    /// catalog order) and scanned greedily, accepting a station only if
    /// its frequency is not already used by an accepted one. The greedy
    /// order maximizes cluster footprint under the frequency-uniqueness
    /// constraint; it is a deliberate simplification, not a global
    /// optimum for the sizing constant, and is preserved as-is.
    pub fn choose_cluster_stations(&self) -> EstimateResult<[&Station; CLUSTER_SIZE]> {
        if self.stations.len() < CLUSTER_SIZE {
            return Err(EstimateError::InsufficientStations);
        }

        let mut by_diameter: Vec<&Station> = self.stations.iter().collect();
        by_diameter.sort_by(|a, b| {
            b.diameter_km()
                .partial_cmp(&a.diameter_km())
                .unwrap_or(Ordering::Equal)
        });

        let mut chosen: Vec<&Station> = Vec::with_capacity(CLUSTER_SIZE);
        let mut used_freq: HashSet<u64> = HashSet::new();

        for station in by_diameter {
            if used_freq.contains(&station.frequency_hz) {
                continue;
            }
            used_freq.insert(station.frequency_hz);
            chosen.push(station);
            if chosen.len() == CLUSTER_SIZE {
                break;
            }
        }

        chosen
            .try_into()
            .map_err(|_| EstimateError::DistinctFrequenciesUnavailable)
    }

    /// Cluster sizing constant `C = D1^(5/2) + D2^(3/2) + D3^(1/2)` over
    /// the cluster diameters in descending order.
    ///
    /// With `None` the zone's own greedy selection is scored; an explicit
    /// triple allows re-scoring an arbitrary cluster and must contain
    /// exactly 3 stations.
    pub fn cluster_c(&self, stations: Option<&[&Station]>) -> EstimateResult<f64> {
        let own;
        let cluster: &[&Station] = match stations {
            Some(list) => list,
            None => {
                own = self.choose_cluster_stations()?;
                &own
            }
        };
        if cluster.len() != CLUSTER_SIZE {
            return Err(EstimateError::InvalidClusterSize {
                len: cluster.len(),
            });
        }

        let mut diameters: Vec<f64> = cluster.iter().map(|s| s.diameter_km()).collect();
        diameters.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));

        Ok(diameters[0].powf(2.5) + diameters[1].powf(1.5) + diameters[2].powf(0.5))
    }

    /// Zone-level handover verdict.
    ///
    /// `Some(false)` as soon as any station's verdict is known-failing
    /// (a single bad station poisons the zone, a worst-case posture for
    /// capacity planning). `None` when there are no stations or nothing
    /// is known; `Some(true)` otherwise.
    pub fn is_handover_ok(&self) -> Option<bool> {
        let mut any_known = false;
        for station in &self.stations {
            match station.handover_ok() {
                Some(false) => return Some(false),
                Some(true) => any_known = true,
                None => {}
            }
        }
        if any_known {
            Some(true)
        } else {
            None
        }
    }

    /// Final station-count estimate: `n = L / C`, multiplied by
    /// [`HANDOVER_PENALTY`] when the zone-level handover verdict is
    /// known-failing. An unknown verdict applies no correction.
    ///
    /// Returns a real-valued estimate; rounding up to a whole station
    /// count is the caller's policy decision.
    pub fn n_stations(&self, cluster_stations: Option<&[&Station]>) -> EstimateResult<f64> {
        let l = self.l_avg()?;
        let c = self.cluster_c(cluster_stations)?;
        let mut n = l / c;
        if self.is_handover_ok() == Some(false) {
            n *= HANDOVER_PENALTY;
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: u32, area: f64, freq: u64, avg: Option<f64>) -> Station {
        Station {
            station_id: id,
            name: format!("S{id}"),
            coverage_area_sq_km: area,
            frequency_hz: freq,
            antenna_type: "A".to_string(),
            handover_min: Some(10.0),
            handover_max: Some(20.0),
            handover_avg: avg,
            standard: "5G".to_string(),
            installation_coordinates: String::new(),
        }
    }

    fn dense_zone(stations: Vec<Station>) -> Zone {
        Zone::new("Test Zone", 100.0, BuildClass::Dense, stations)
    }

    #[test]
    fn r0_uses_area_formula() {
        let zone = dense_zone(vec![]);
        assert!((zone.r0_km() - (100.0 / PI).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn cell_count_follows_k_times_ratio_squared() {
        let st = station(1, 10.0, 2_400_000_000, Some(15.0));
        let zone = dense_zone(vec![st.clone()]);
        let expected = 1.21 * (zone.r0_km() / st.radius_km()).powi(2);
        assert!((zone.cell_count_for(&st).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn cell_count_rejects_zero_radius() {
        let st = station(1, 0.0, 2_400_000_000, Some(15.0));
        let zone = dense_zone(vec![st.clone()]);
        let err = zone.cell_count_for(&st).unwrap_err();
        assert!(matches!(err, EstimateError::DivisionByZero { .. }));
        assert!(err.to_string().contains("S1"));
    }

    #[test]
    fn l_avg_is_arithmetic_mean() {
        let s1 = station(1, 10.0, 2_400_000_000, Some(15.0));
        let s2 = station(2, 20.0, 2_500_000_000, Some(15.0));
        let zone = dense_zone(vec![s1.clone(), s2.clone()]);
        let expected =
            (zone.cell_count_for(&s1).unwrap() + zone.cell_count_for(&s2).unwrap()) / 2.0;
        assert!((zone.l_avg().unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn l_avg_fails_on_empty_zone() {
        let zone = Zone::new("Empty Zone", 100.0, BuildClass::Dense, vec![]);
        let err = zone.l_avg().unwrap_err();
        assert!(matches!(err, EstimateError::EmptyZone { .. }));
        let msg = err.to_string();
        assert!(msg.contains("no base stations"));
        assert!(msg.contains("Empty Zone"));
    }

    #[test]
    fn cluster_selection_picks_largest_distinct_frequencies() {
        let zone = dense_zone(vec![
            station(1, 100.0, 2_400_000_000, Some(15.0)),
            station(2, 80.0, 2_500_000_000, Some(15.0)),
            station(3, 60.0, 2_600_000_000, Some(15.0)),
            station(4, 40.0, 2_400_000_000, Some(15.0)),
        ]);
        let chosen = zone.choose_cluster_stations().unwrap();
        let ids: Vec<u32> = chosen.iter().map(|s| s.station_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn cluster_selection_skips_duplicate_frequency() {
        // Diameters strictly decreasing by id; id 2 repeats id 1's frequency
        // and must be skipped in favor of the next distinct ones.
        let zone = dense_zone(vec![
            station(1, 100.0, 2_400_000_000, Some(15.0)),
            station(2, 80.0, 2_400_000_000, Some(15.0)),
            station(3, 60.0, 2_500_000_000, Some(15.0)),
            station(4, 40.0, 2_600_000_000, Some(15.0)),
        ]);
        let chosen = zone.choose_cluster_stations().unwrap();
        let ids: Vec<u32> = chosen.iter().map(|s| s.station_id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn cluster_selection_tie_break_keeps_catalog_order() {
        // Equal diameters: stable sort keeps catalog order deterministic.
        let zone = dense_zone(vec![
            station(7, 50.0, 2_400_000_000, None),
            station(5, 50.0, 2_500_000_000, None),
            station(9, 50.0, 2_600_000_000, None),
        ]);
        let chosen = zone.choose_cluster_stations().unwrap();
        let ids: Vec<u32> = chosen.iter().map(|s| s.station_id).collect();
        assert_eq!(ids, vec![7, 5, 9]);
    }

    #[test]
    fn cluster_selection_needs_three_stations() {
        let zone = dense_zone(vec![
            station(1, 100.0, 2_400_000_000, Some(15.0)),
            station(2, 80.0, 2_500_000_000, Some(15.0)),
        ]);
        let err = zone.choose_cluster_stations().unwrap_err();
        assert!(matches!(err, EstimateError::InsufficientStations));
        assert!(err.to_string().contains("at least 3"));
    }

    #[test]
    fn cluster_selection_needs_three_distinct_frequencies() {
        let zone = dense_zone(vec![
            station(1, 100.0, 2_400_000_000, Some(15.0)),
            station(2, 80.0, 2_400_000_000, Some(15.0)),
            station(3, 60.0, 2_500_000_000, Some(15.0)),
        ]);
        let err = zone.choose_cluster_stations().unwrap_err();
        assert!(matches!(err, EstimateError::DistinctFrequenciesUnavailable));
        assert!(err.to_string().contains("distinct frequencies"));
    }

    #[test]
    fn cluster_c_sums_fractional_powers_of_sorted_diameters() {
        let stations = vec![
            station(1, 100.0, 2_400_000_000, Some(15.0)),
            station(2, 80.0, 2_500_000_000, Some(15.0)),
            station(3, 60.0, 2_600_000_000, Some(15.0)),
        ];
        let zone = dense_zone(stations.clone());
        let refs: Vec<&Station> = stations.iter().collect();
        let c = zone.cluster_c(Some(&refs)).unwrap();

        let mut diameters: Vec<f64> = stations.iter().map(|s| s.diameter_km()).collect();
        diameters.sort_by(|a, b| b.partial_cmp(a).unwrap());
        let expected =
            diameters[0].powf(2.5) + diameters[1].powf(1.5) + diameters[2].powf(0.5);
        assert!((c - expected).abs() < 1e-12);
    }

    #[test]
    fn cluster_c_rejects_wrong_length() {
        let stations = vec![
            station(1, 100.0, 2_400_000_000, Some(15.0)),
            station(2, 80.0, 2_500_000_000, Some(15.0)),
        ];
        let zone = dense_zone(stations.clone());
        let refs: Vec<&Station> = stations.iter().collect();
        let err = zone.cluster_c(Some(&refs)).unwrap_err();
        assert!(matches!(err, EstimateError::InvalidClusterSize { len: 2 }));
        assert!(err.to_string().contains("length 3"));
    }

    #[test]
    fn cluster_c_defaults_to_own_selection() {
        let zone = dense_zone(vec![
            station(1, 100.0, 2_400_000_000, Some(15.0)),
            station(2, 80.0, 2_500_000_000, Some(15.0)),
            station(3, 60.0, 2_600_000_000, Some(15.0)),
        ]);
        let refs = zone.choose_cluster_stations().unwrap();
        let explicit = zone.cluster_c(Some(&refs)).unwrap();
        let defaulted = zone.cluster_c(None).unwrap();
        assert_eq!(explicit, defaulted);
    }

    #[test]
    fn zone_handover_true_when_all_known_good() {
        let zone = dense_zone(vec![
            station(1, 100.0, 2_400_000_000, Some(15.0)),
            station(2, 80.0, 2_500_000_000, Some(12.0)),
        ]);
        assert_eq!(zone.is_handover_ok(), Some(true));
    }

    #[test]
    fn zone_handover_false_when_any_station_fails() {
        let zone = dense_zone(vec![
            station(1, 100.0, 2_400_000_000, Some(15.0)),
            station(2, 80.0, 2_500_000_000, Some(25.0)),
        ]);
        assert_eq!(zone.is_handover_ok(), Some(false));
    }

    #[test]
    fn zone_handover_true_when_mixed_with_unknowns() {
        let zone = dense_zone(vec![
            station(1, 100.0, 2_400_000_000, Some(15.0)),
            station(2, 80.0, 2_500_000_000, None),
        ]);
        assert_eq!(zone.is_handover_ok(), Some(true));
    }

    #[test]
    fn zone_handover_unknown_when_nothing_known() {
        let zone = dense_zone(vec![
            station(1, 100.0, 2_400_000_000, None),
            station(2, 80.0, 2_500_000_000, None),
        ]);
        assert_eq!(zone.is_handover_ok(), None);
    }

    #[test]
    fn zone_handover_unknown_for_empty_zone() {
        let zone = dense_zone(vec![]);
        assert_eq!(zone.is_handover_ok(), None);
    }

    #[test]
    fn n_stations_is_l_over_c_when_handover_ok() {
        let zone = dense_zone(vec![
            station(1, 100.0, 2_400_000_000, Some(15.0)),
            station(2, 80.0, 2_500_000_000, Some(15.0)),
            station(3, 60.0, 2_600_000_000, Some(15.0)),
        ]);
        assert_eq!(zone.is_handover_ok(), Some(true));
        let expected = zone.l_avg().unwrap() / zone.cluster_c(None).unwrap();
        assert!((zone.n_stations(None).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn n_stations_applies_penalty_when_handover_fails() {
        let good = dense_zone(vec![
            station(1, 100.0, 2_400_000_000, Some(15.0)),
            station(2, 80.0, 2_500_000_000, Some(15.0)),
            station(3, 60.0, 2_600_000_000, Some(15.0)),
        ]);
        let bad = dense_zone(vec![
            station(1, 100.0, 2_400_000_000, Some(25.0)),
            station(2, 80.0, 2_500_000_000, Some(25.0)),
            station(3, 60.0, 2_600_000_000, Some(25.0)),
        ]);
        assert_eq!(bad.is_handover_ok(), Some(false));

        let base = good.n_stations(None).unwrap();
        let penalized = bad.n_stations(None).unwrap();
        assert!((penalized - base * HANDOVER_PENALTY).abs() < 1e-12);
    }

    #[test]
    fn n_stations_applies_no_penalty_when_verdict_unknown() {
        let zone = dense_zone(vec![
            station(1, 100.0, 2_400_000_000, None),
            station(2, 80.0, 2_500_000_000, None),
            station(3, 60.0, 2_600_000_000, None),
        ]);
        assert_eq!(zone.is_handover_ok(), None);
        let expected = zone.l_avg().unwrap() / zone.cluster_c(None).unwrap();
        assert!((zone.n_stations(None).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn n_stations_accepts_external_cluster() {
        let stations = vec![
            station(1, 100.0, 2_400_000_000, Some(15.0)),
            station(2, 80.0, 2_500_000_000, Some(15.0)),
            station(3, 60.0, 2_600_000_000, Some(15.0)),
        ];
        let zone = dense_zone(stations.clone());
        let refs: Vec<&Station> = stations.iter().collect();
        let expected = zone.l_avg().unwrap() / zone.cluster_c(Some(&refs)).unwrap();
        assert!((zone.n_stations(Some(&refs)).unwrap() - expected).abs() < 1e-12);
    }
}

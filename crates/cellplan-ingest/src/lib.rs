//! Station catalog ingestion.
//!
//! Reads the operator's CSV catalog, maps the named columns onto
//! [`Station`] records and parses the free-text handover range. The
//! measured handover average is left unset here; the handover lookup
//! collaborator fills it before zones are constructed.

use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

use cellplan_core::Station;

/// Required catalog columns, by header name.
const REQUIRED_COLUMNS: [&str; 8] = [
    "station_id",
    "name",
    "coverage_area_sq_km",
    "frequency_hz",
    "antenna_type",
    "handover_range",
    "standard",
    "installation_coordinates",
];

/// Errors raised while reading a station catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to open catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing columns: {missing:?}. Present: {present:?}")]
    MissingColumns {
        missing: Vec<String>,
        present: Vec<String>,
    },

    #[error("malformed catalog row: {0}")]
    MalformedRow(#[from] csv::Error),
}

/// One raw CSV row before conversion into a [`Station`].
#[derive(Debug, Deserialize)]
struct CatalogRow {
    station_id: u32,
    name: String,
    coverage_area_sq_km: Option<f64>,
    frequency_hz: u64,
    antenna_type: String,
    handover_range: Option<String>,
    standard: String,
    installation_coordinates: Option<String>,
}

/// Read a station catalog from a CSV file on disk.
pub fn read_catalog(path: impl AsRef<Path>) -> Result<Vec<Station>, CatalogError> {
    let file = File::open(path.as_ref())?;
    read_catalog_from(file)
}

/// Read a station catalog from any reader producing CSV with headers.
pub fn read_catalog_from(reader: impl Read) -> Result<Vec<Station>, CatalogError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let present: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !present.iter().any(|h| h == *required))
        .map(|required| required.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(CatalogError::MissingColumns { missing, present });
    }

    let mut stations = Vec::new();
    for row in csv_reader.deserialize::<CatalogRow>() {
        let row = row?;
        let (handover_min, handover_max) = match row
            .handover_range
            .as_deref()
            .and_then(parse_handover_range)
        {
            Some((min, max)) => (Some(min), Some(max)),
            None => (None, None),
        };

        stations.push(Station {
            station_id: row.station_id,
            name: row.name.trim().to_string(),
            // Blank coverage cells are treated as zero area.
            coverage_area_sq_km: row.coverage_area_sq_km.unwrap_or(0.0),
            frequency_hz: row.frequency_hz,
            antenna_type: row.antenna_type.trim().to_string(),
            handover_min,
            handover_max,
            handover_avg: None,
            standard: row.standard.trim().to_string(),
            installation_coordinates: row
                .installation_coordinates
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
        });
    }

    tracing::debug!(count = stations.len(), "loaded station catalog");
    Ok(stations)
}

/// Parse the free-text handover range column.
///
/// Accepts `"12-18"` and `"from 12 to 18"` (case-insensitive, spaces
/// ignored, decimal comma tolerated). Anything else is treated as an
/// absent range, so min and max stay jointly present or absent.
pub fn parse_handover_range(text: &str) -> Option<(f64, f64)> {
    let mut s = text.trim().to_lowercase();
    if s.is_empty() {
        return None;
    }

    s.retain(|c| !c.is_whitespace());
    s = s.replace("from", "");
    s = s.replace("to", "-");

    let (min_part, max_part) = s.split_once('-')?;
    if max_part.contains('-') {
        return None;
    }

    let min = min_part.replace(',', ".").parse::<f64>().ok()?;
    let max = max_part.replace(',', ".").parse::<f64>().ok()?;
    Some((min, max))
}

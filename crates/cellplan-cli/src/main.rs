//! CLI driver: load a station catalog, resolve handover averages and
//! estimate the station count for one service zone.

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cellplan_core::{BuildClass, Zone};
use cellplan_handover::{resolve_handover_averages, ApiHandoverClient};

/// Estimate how many base stations a service zone needs
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the station catalog CSV
    #[arg(long)]
    catalog: PathBuf,

    /// Name of the service zone
    #[arg(long)]
    zone: String,

    /// Zone area in square kilometers
    #[arg(long)]
    area_km2: f64,

    /// Build-density classification (dense, medium or rural)
    #[arg(long)]
    build: BuildClass,

    /// Base URL of the handover measurement API; without it measured
    /// averages stay unknown
    #[arg(long)]
    handover_api: Option<String>,

    /// Print the estimate as JSON instead of plain text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct EstimateReport {
    zone: String,
    area_km2: f64,
    build_class: BuildClass,
    station_count: usize,
    l_avg: f64,
    cluster_c: f64,
    handover_ok: Option<bool>,
    n_stations: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cellplan_cli=info".parse()?)
                .add_directive("cellplan_ingest=info".parse()?)
                .add_directive("cellplan_handover=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut stations = cellplan_ingest::read_catalog(&args.catalog)?;
    tracing::info!(count = stations.len(), "loaded station catalog");

    if let Some(base_url) = &args.handover_api {
        let client = ApiHandoverClient::new(base_url.clone());
        resolve_handover_averages(&mut stations, &client).await;
    }

    let station_count = stations.len();
    let zone = Zone::new(args.zone, args.area_km2, args.build, stations);

    let l_avg = zone.l_avg()?;
    let cluster_c = zone.cluster_c(None)?;
    let handover_ok = zone.is_handover_ok();
    tracing::info!(
        zone = %zone.name,
        l_avg,
        cluster_c,
        handover_ok = ?handover_ok,
        "zone estimate inputs"
    );

    let n_stations = zone.n_stations(None)?;

    if args.json {
        let report = EstimateReport {
            zone: zone.name.clone(),
            area_km2: zone.area_km2,
            build_class: zone.build_class,
            station_count,
            l_avg,
            cluster_c,
            handover_ok,
            n_stations,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("n = {n_stations}");
    }

    Ok(())
}

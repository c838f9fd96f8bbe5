//! offline — plan one route against a saved Overpass document.
//!
//! No network access: road data comes from a JSON file and the comparison
//! provider is not consulted.
//!
//!   cargo run -p offline -- 30.6921 -88.0449 30.6959 -88.0431
//!
//! Prints the route as JSON on stdout.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use rr_core::GeoPoint;
use rr_providers::FileRoadSource;
use rr_spatial::{DijkstraRouter, DuplicateEdgePolicy, RoadNetwork, SnapStrategy, plan_route};

#[derive(Parser, Debug)]
#[command(about = "Shortest road route from a saved Overpass JSON file", allow_negative_numbers = true)]
struct Cli {
    start_lat: f64,
    start_lon: f64,
    end_lat: f64,
    end_lon: f64,

    /// Overpass `[out:json]` document to route over.
    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/data/downtown.json"))]
    roads: PathBuf,

    /// Use the R-tree index instead of a linear scan for snapping.
    #[arg(long)]
    rtree: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let start = GeoPoint::try_new(cli.start_lat, cli.start_lon).context("start point")?;
    let end = GeoPoint::try_new(cli.end_lat, cli.end_lon).context("end point")?;

    // ── Load ──────────────────────────────────────────────────────────────────
    let t0 = Instant::now();
    let elements = FileRoadSource::new(&cli.roads)
        .load()
        .with_context(|| format!("loading {}", cli.roads.display()))?;
    let network = RoadNetwork::from_elements(elements, DuplicateEdgePolicy::KeepMinimum);
    eprintln!(
        "network: {} nodes, {} directed edges ({:.1} ms)",
        network.node_count(),
        network.edge_count(),
        t0.elapsed().as_secs_f64() * 1e3,
    );

    // ── Route ─────────────────────────────────────────────────────────────────
    let snap = if cli.rtree { SnapStrategy::RTree } else { SnapStrategy::Linear };
    let t1 = Instant::now();
    let route = plan_route(&network, &DijkstraRouter, snap, start, end)?;
    eprintln!("route: {:.2} ms", t1.elapsed().as_secs_f64() * 1e3);

    let out = json!({
        "startNode": route.start_node,
        "endNode": route.end_node,
        "distance": route.summary.distance_m,
        "distanceKm": route.summary.distance_km_text(),
        "nodes": route.summary.node_count,
        "coordinates": route.summary.lat_lon_pairs(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

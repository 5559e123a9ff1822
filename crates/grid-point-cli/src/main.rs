//! Grid Point - command-line front end
//!
//! Builds a grid point set covering a WGS84 envelope and prints the points
//! matching each query envelope.

mod logging;
mod settings;

use grid_point_lib::{FixedPointEnvelope, GridError, GridPointSet};
use serde::Serialize;
use settings::Settings;
use std::process::ExitCode;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of one query, as printed with `--json`
#[derive(Serialize)]
struct QueryReport<'a> {
    envelope: &'a FixedPointEnvelope,
    count: usize,
    indices: &'a [usize],
}

fn main() -> ExitCode {
    logging::setup_logging();
    let settings = Settings::from_cli();

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings) -> Result<(), CliError> {
    let grid = GridPointSet::from_wgs_envelope(settings.grid_envelope(), &settings.grid_config())?;
    tracing::info!(
        "Grid at zoom {}: {}x{} = {} points",
        grid.zoom(),
        grid.width(),
        grid.height(),
        grid.feature_count()
    );

    let results = grid.points_in_envelopes(&settings.queries)?;

    if settings.json {
        let reports: Vec<QueryReport> = settings
            .queries
            .iter()
            .zip(&results)
            .map(|(envelope, indices)| QueryReport {
                envelope,
                count: indices.len(),
                indices,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    let bounds = grid.wgs_envelope();
    println!(
        "grid: zoom {} origin ({}, {}) size {}x{} ({} points), lon {:.5}..{:.5} lat {:.5}..{:.5}",
        grid.zoom(),
        grid.west(),
        grid.north(),
        grid.width(),
        grid.height(),
        grid.feature_count(),
        bounds.min().x,
        bounds.max().x,
        bounds.min().y,
        bounds.max().y
    );
    for (envelope, indices) in settings.queries.iter().zip(&results) {
        let query = envelope.to_floating();
        println!(
            "query lon {}..{} lat {}..{}: {} points",
            query.min().x,
            query.max().x,
            query.min().y,
            query.max().y,
            indices.len()
        );
    }

    Ok(())
}

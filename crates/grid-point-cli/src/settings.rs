use clap::Parser;
use geo::{Coord, Rect};
use grid_point_lib::{Config, DEFAULT_ZOOM, FixedPointEnvelope, floating_to_fixed};

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Grid Point - Build a Web Mercator grid point set and query it with envelopes
pub struct Settings {
    /// Western edge of the grid in degrees of longitude
    #[clap(long, allow_hyphen_values = true)]
    pub west: f64,

    /// Eastern edge of the grid in degrees of longitude
    #[clap(long, allow_hyphen_values = true)]
    pub east: f64,

    /// Southern edge of the grid in degrees of latitude
    #[clap(long, allow_hyphen_values = true)]
    pub south: f64,

    /// Northern edge of the grid in degrees of latitude
    #[clap(long, allow_hyphen_values = true)]
    pub north: f64,

    /// Zoom level of the grid (one point per pixel)
    #[clap(short, long, default_value_t = DEFAULT_ZOOM, allow_hyphen_values = true)]
    pub zoom: i32,

    /// Query envelope as MIN_LON,MAX_LON,MIN_LAT,MAX_LAT (repeatable)
    #[clap(
        short,
        long = "query",
        value_name = "ENVELOPE",
        value_parser = parse_envelope,
        allow_hyphen_values = true
    )]
    pub queries: Vec<FixedPointEnvelope>,

    /// Print matching point indices as JSON instead of a summary
    #[clap(long, default_value = "false")]
    pub json: bool,
}

impl Settings {
    /// Parse settings from the command line, exiting with usage on error
    pub fn from_cli() -> Self {
        match Settings::try_parse() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    /// The grid's area as a WGS84 envelope
    pub fn grid_envelope(&self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: self.west,
                y: self.south,
            },
            Coord {
                x: self.east,
                y: self.north,
            },
        )
    }

    pub fn grid_config(&self) -> Config {
        Config { zoom: self.zoom }
    }
}

/// Parse `MIN_LON,MAX_LON,MIN_LAT,MAX_LAT` into a fixed-point envelope
///
/// Inverted bounds are rejected rather than swapped, as are values that are
/// not finite or do not fit in fixed-point degrees.
fn parse_envelope(s: &str) -> Result<FixedPointEnvelope, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f64>().map_err(|e| format!("'{v}': {e}")))
        .collect::<Result<Vec<f64>, String>>()?;

    let [min_lon, max_lon, min_lat, max_lat] = values[..] else {
        return Err(format!("expected 4 comma-separated values, got {}", values.len()));
    };

    let fixed = |degrees: f64| floating_to_fixed(degrees).map_err(|e| e.to_string());
    FixedPointEnvelope::new(
        fixed(min_lon)?,
        fixed(max_lon)?,
        fixed(min_lat)?,
        fixed(max_lat)?,
    )
    .map_err(|e| e.to_string())
}

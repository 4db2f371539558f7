#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the species map parameter engine.
//!
//! Resolves a parameter bag (from a `--config` TOML file plus `--param`
//! overrides) against a search target and prints what a map would show:
//! the overlay layers, the resolved bounds, or the sequence of operations a
//! [`MapManager`] performs on its surface. Also exposes the NBN Atlas
//! lookups: search-location resolution and occurrence popups.

mod config;
mod surface;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use species_map_atlas::AtlasClient;
use species_map_atlas::locate::LocationSource;
use species_map_atlas::occurrences::OccurrencePopup;
use species_map_boundary::BoundaryIndex;
use species_map_boundary_models::BoundaryKind;
use species_map_manager::MapManager;
use species_map_params::{CollectingReporter, GetMapUrl, Params, ParamWarning};
use species_map_params_models::{ExploreMap, LatLng, LatLngBounds, Location, Search};

use crate::config::{CliConfig, CliError};
use crate::surface::TextSurface;

/// Resolve species map parameters and query the NBN Atlas.
#[derive(Parser)]
#[command(name = "species_map")]
#[command(about = "Resolve species map parameters and query the NBN Atlas")]
struct Cli {
    /// TOML file with optional `[params]` and `[atlas]` tables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Map parameter override, e.g. `--param vc=39`. Repeatable.
    #[arg(long = "param", value_name = "KEY=VALUE", global = true)]
    params: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the overlay layers for a search target.
    Layers {
        #[command(flatten)]
        target: TargetArgs,

        /// Print the layers as JSON.
        #[arg(long)]
        json: bool,

        /// Also print a GetMap URL per layer for this box.
        #[arg(long, value_name = "S,W,N,E", allow_hyphen_values = true)]
        bbox: Option<String>,

        /// Tile size used for `--bbox`.
        #[arg(long, default_value_t = 256)]
        tile_size: u32,
    },

    /// Print the resolved map bounds and which parameter produced them.
    Bounds,

    /// List the embedded boundary table.
    Boundaries {
        /// Only list one kind (`vice-county` or `region`).
        #[arg(long)]
        kind: Option<BoundaryKind>,
    },

    /// Drive a map manager and print each operation on its surface.
    Show {
        #[command(flatten)]
        target: TargetArgs,

        /// Sample each layer's GetMap URL for this box.
        #[arg(long, value_name = "S,W,N,E", allow_hyphen_values = true)]
        bbox: Option<String>,

        /// Draw the vice-county outline when `bg=vc`.
        #[arg(long)]
        boundary: bool,
    },

    /// Resolve a postcode, grid reference or region name to a coordinate.
    Locate {
        query: String,
    },

    /// Fetch occurrences near a point and print the first popup.
    Occurrences {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        #[arg(long, default_value_t = 10.0)]
        zoom: f64,

        /// Restrict to a species group.
        #[arg(long)]
        group: Option<String>,

        /// Restrict to one species by scientific name.
        #[arg(long)]
        species: Option<String>,

        /// Zero-based record to show.
        #[arg(long, default_value_t = 0)]
        record: usize,
    },
}

/// A taxon version key, or a group/species search around a point.
#[derive(Args)]
struct TargetArgs {
    #[arg(long, conflicts_with_all = ["group", "species", "lat", "lon"])]
    tvk: Option<String>,

    #[arg(long)]
    group: Option<String>,

    #[arg(long)]
    species: Option<String>,

    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Search radius in kilometres.
    #[arg(long, default_value_t = 1.0)]
    radius: f64,

    /// Search a square rather than a circle.
    #[arg(long)]
    square: bool,
}

impl TargetArgs {
    fn search(&self) -> Result<Search, CliError> {
        if let Some(tvk) = &self.tvk {
            return Ok(Search::Tvk(tvk.clone()));
        }
        let (Some(latitude), Some(longitude)) = (self.lat, self.lon) else {
            return Err(CliError::MissingTarget);
        };
        Ok(Search::Explore(explore_map(
            self.group.as_deref(),
            self.species.as_deref(),
            Location {
                is_square: self.square,
                latitude,
                longitude,
                radius: self.radius,
            },
        )))
    }
}

fn explore_map(group: Option<&str>, species: Option<&str>, location: Location) -> ExploreMap {
    ExploreMap {
        is_group: species.is_none(),
        location,
        group_name: group.unwrap_or_default().to_string(),
        species_name: species.unwrap_or_default().to_string(),
    }
}

fn parse_bbox(raw: &str) -> Result<LatLngBounds, CliError> {
    let invalid = || CliError::InvalidBbox(raw.to_string());
    let values = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;
    let [south, west, north, east] = values[..] else {
        return Err(invalid());
    };
    Ok(LatLngBounds::from_corners(
        LatLng::new(south, west),
        LatLng::new(north, east),
    ))
}

fn print_warnings(warnings: &[ParamWarning]) {
    for warning in warnings {
        println!("{}: {warning}", warning.level());
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let reporter = Arc::new(CollectingReporter::new());
    let mut config = CliConfig::load(cli.config.as_deref(), reporter.as_ref())?;
    config.apply_overrides(&cli.params, reporter.as_ref())?;

    match cli.command {
        Commands::Layers {
            target,
            json,
            bbox,
            tile_size,
        } => cmd_layers(&config, &reporter, &target, json, bbox.as_deref(), tile_size)?,
        Commands::Bounds => cmd_bounds(&config, &reporter),
        Commands::Boundaries { kind } => cmd_boundaries(kind),
        Commands::Show {
            target,
            bbox,
            boundary,
        } => cmd_show(&config, reporter, &target, bbox.as_deref(), boundary).await?,
        Commands::Locate { query } => cmd_locate(&config, &query).await?,
        Commands::Occurrences {
            lat,
            lon,
            zoom,
            group,
            species,
            record,
        } => {
            cmd_occurrences(
                &config,
                LatLng::new(lat, lon),
                zoom,
                group.as_deref(),
                species.as_deref(),
                record,
            )
            .await?;
        }
    }

    Ok(())
}

fn cmd_layers(
    config: &CliConfig,
    reporter: &CollectingReporter,
    target: &TargetArgs,
    json: bool,
    bbox: Option<&str>,
    tile_size: u32,
) -> Result<(), CliError> {
    let bbox = bbox.map(parse_bbox).transpose()?;
    let params = Params::new(&config.params, target.search()?, reporter);
    let layers = params.derive_layers(reporter);

    if json {
        println!("{}", serde_json::to_string_pretty(&layers)?);
        return Ok(());
    }

    print_warnings(&reporter.take());
    for layer in &layers {
        println!("{}", layer.name);
        println!("  {}", layer.query_url);
        if let Some(bbox) = &bbox {
            println!("  {}", layer.get_map_url(bbox, tile_size));
        }
    }
    Ok(())
}

fn cmd_bounds(config: &CliConfig, reporter: &CollectingReporter) {
    let params = Params::new(&config.params, String::new(), reporter);
    print_warnings(&reporter.take());

    let bounds = params.bounds();
    println!("source: {}", params.boundary_source());
    println!("south-west: {}, {}", bounds.south(), bounds.west());
    println!("north-east: {}, {}", bounds.north(), bounds.east());
}

fn cmd_boundaries(kind: Option<BoundaryKind>) {
    let index = BoundaryIndex::embedded();
    for record in index
        .records()
        .iter()
        .filter(|record| kind.is_none_or(|kind| record.kind == kind))
    {
        println!(
            "{:<14} {:<40} {:>9.4} {:>9.4} {:>9.4} {:>9.4}",
            record.id, record.name, record.llat, record.llon, record.ulat, record.ulon
        );
    }
}

async fn cmd_show(
    config: &CliConfig,
    reporter: Arc<CollectingReporter>,
    target: &TargetArgs,
    bbox: Option<&str>,
    boundary: bool,
) -> Result<(), CliError> {
    let surface = match bbox.map(parse_bbox).transpose()? {
        Some(bbox) => TextSurface::with_sample(bbox, 256),
        None => TextSurface::default(),
    };
    let search = target.search()?;
    let params = Params::new(&config.params, search.clone(), reporter.as_ref());
    let mut manager = MapManager::new(params, "map", surface, reporter.clone());
    manager.show(search);

    if boundary {
        let client = AtlasClient::new(config.atlas.clone())?;
        if !manager.load_boundary(&client).await {
            log::info!("No vice-county boundary drawn");
        }
    }

    print_warnings(&reporter.take());
    for line in manager.surface().lines() {
        println!("{line}");
    }
    Ok(())
}

async fn cmd_locate(config: &CliConfig, query: &str) -> Result<(), CliError> {
    let client = AtlasClient::new(config.atlas.clone())?;
    let located = client.locate(BoundaryIndex::embedded(), query).await?;
    let source = match located.source {
        LocationSource::Postcode => "postcode",
        LocationSource::GridReference => "grid reference",
        LocationSource::Region => "region",
    };
    println!(
        "{}, {} ({source})",
        located.location.lat, located.location.lng
    );
    Ok(())
}

async fn cmd_occurrences(
    config: &CliConfig,
    location: LatLng,
    zoom: f64,
    group: Option<&str>,
    species: Option<&str>,
    record: usize,
) -> Result<(), CliError> {
    let client = AtlasClient::new(config.atlas.clone())?;
    let explore = (group.is_some() || species.is_some()).then(|| {
        explore_map(
            group,
            species,
            Location {
                is_square: false,
                latitude: location.lat,
                longitude: location.lng,
                radius: 0.0,
            },
        )
    });

    let mut popup = OccurrencePopup::new(
        client.config(),
        location.lat,
        location.lng,
        zoom,
        explore.as_ref(),
    );
    if !popup.init(&client).await? {
        println!("No occurrences found");
        return Ok(());
    }
    for _ in 0..=record {
        popup.next();
    }

    match popup.popup_content(&client).await? {
        Some(html) => println!("{html}"),
        None => println!("No occurrence record available"),
    }
    Ok(())
}

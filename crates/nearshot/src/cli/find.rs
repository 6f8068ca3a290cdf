//! The `nearshot find` command: one full pipeline run.
//!
//! Wires a location provider (picked from the flags), the Flickr client,
//! and the decoder into a pipeline, then applies the outcome to the
//! requested presentation adapters. Running this command is the user's
//! consent to locate the device; the pipeline itself never asks.

use anyhow::Context;
use clap::Args;
use image::DynamicImage;
use nearshot_core::location::{create_provider, FixSource};
use nearshot_core::pipeline::decode::format_to_string;
use nearshot_core::{
    Config, DisplayAdapter, DisplaySurface, FlickrClient, GeoBounds, GeoCoordinate, ImageDecoder,
    MapAdapter, MapRenderer, SearchOutcome, SearchPipeline,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the `find` command.
#[derive(Args, Debug)]
pub struct FindArgs {
    /// Search around this latitude instead of locating the device
    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    pub lat: Option<f64>,

    /// Search around this longitude instead of locating the device
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Search around this address instead of locating the device
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub address: Option<String>,

    /// Save the found photo to this path
    #[arg(short, long)]
    pub output: Option<String>,

    /// Drive the map adapter, logging marker and camera operations
    #[arg(long)]
    pub map: bool,
}

/// Display surface backed by a file on disk.
///
/// Presenting writes the image; clearing removes any previously written
/// file, mirroring a view being blanked.
struct FileSurface {
    path: PathBuf,
}

impl DisplaySurface for FileSurface {
    fn set_image(&mut self, image: Option<DynamicImage>) {
        match image {
            Some(image) => match image.save(&self.path) {
                Ok(()) => tracing::info!("saved photo to {}", self.path.display()),
                Err(e) => {
                    tracing::error!("failed to save photo to {}: {e}", self.path.display());
                }
            },
            None => {
                if let Err(e) = std::fs::remove_file(&self.path) {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!("failed to clear {}: {e}", self.path.display());
                    }
                }
            }
        }
    }
}

/// Map renderer that logs every operation instead of drawing.
///
/// Stands in for a real tile renderer so `--map` exercises the whole
/// marker/camera path from a terminal.
struct TracingMapRenderer;

impl MapRenderer for TracingMapRenderer {
    fn clear_markers(&mut self) {
        tracing::info!("map: markers cleared");
    }

    fn add_marker(&mut self, coordinate: GeoCoordinate, icon: Option<&DynamicImage>) {
        tracing::info!(
            lat = coordinate.lat,
            lon = coordinate.lon,
            icon = icon.is_some(),
            "map: marker placed"
        );
    }

    fn animate_to_bounds(&mut self, bounds: GeoBounds, margin_px: u32) {
        tracing::info!(
            south = bounds.south,
            west = bounds.west,
            north = bounds.north,
            east = bounds.east,
            margin_px,
            "map: camera framed"
        );
    }
}

/// Execute the find command.
pub async fn execute(args: FindArgs, config: Config) -> anyhow::Result<()> {
    let source = match (args.lat, args.lon, &args.address) {
        (Some(lat), Some(lon), _) => FixSource::Coordinate(GeoCoordinate::new(lat, lon)),
        (_, _, Some(address)) => FixSource::Address(address.clone()),
        _ => FixSource::IpLookup,
    };

    let location = create_provider(source, &config.location);
    let search = FlickrClient::from_config(&config.search, &config.limits)
        .context("search client configuration")?;
    let pipeline = SearchPipeline::new(
        Arc::from(location),
        Arc::new(search),
        ImageDecoder::new(config.limits.clone()),
    );

    let display = args.output.as_deref().map(|raw| {
        let path = PathBuf::from(shellexpand::tilde(raw).into_owned());
        DisplayAdapter::new(Box::new(FileSurface { path }))
    });
    let map = args.map.then(|| {
        let adapter = MapAdapter::new(config.map.camera_margin_px);
        adapter.attach(Box::new(TracingMapRenderer));
        adapter
    });

    // Blank the simple display while searching; the map keeps whatever it
    // last showed.
    if let Some(display) = &display {
        display.clear();
    }

    let Some(outcome) = pipeline.run().await else {
        anyhow::bail!("a search is already in flight");
    };

    if let Some(map) = &map {
        map.apply(&outcome);
    }

    match outcome {
        SearchOutcome::Found {
            record,
            image,
            coordinate,
        } => {
            let caption = if record.caption.is_empty() {
                "(untitled)"
            } else {
                record.caption.as_str()
            };
            println!("Found \"{caption}\" by {}", record.owner);
            println!("  page:  {}", record.photo_page_url());
            println!(
                "  image: {}x{} {} at ({}, {})",
                image.width,
                image.height,
                format_to_string(image.format),
                record.lat,
                record.lon
            );
            tracing::debug!(
                user_lat = coordinate.lat,
                user_lon = coordinate.lon,
                "search origin"
            );
            if let Some(display) = &display {
                display.present(image.image);
            }
        }

        SearchOutcome::Empty => {
            println!("No photos found near your location.");
        }

        SearchOutcome::Failed(e) => {
            return Err(anyhow::Error::new(e).context("search failed"));
        }
    }

    Ok(())
}

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};

use clap::Parser;

use reliefcast::pipeline::{convert_tiled_grid_to_stl, ConvertOptions, ProgressSink};
use reliefcast::raster::load_image_grid;
use reliefcast::stl::Encoding;
use reliefcast::tiling::parse_tile_format;
use reliefcast::triangulate::ScalingParams;

#[derive(Parser, Debug)]
#[command(name = "reliefcast")]
#[command(about = "Convert a heightmap into a 3D-printable STL model")]
struct Args {
    /// Input heightmap (grayscale image, e.g. PNG or TIFF)
    input: PathBuf,

    /// Output file stem; ".stl" and tile suffixes are added automatically
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Write ASCII STL instead of binary
    #[arg(long)]
    ascii: bool,

    /// Physical model size along x in output units (e.g. millimeters)
    #[arg(long, default_value = "200.0")]
    model_size_x: f64,

    /// Physical model size along y; rescaled to the grid aspect ratio
    /// unless --ensure-squared is set
    #[arg(long, default_value = "200.0")]
    model_size_y: f64,

    /// Skip resolution reduction (may be very slow on large rasters)
    #[arg(long)]
    max_res: bool,

    /// Additive z offset; omit for an automatic base at the minimum elevation
    #[arg(long)]
    z_offset: Option<f64>,

    /// Multiplier applied to scaled elevations
    #[arg(long, default_value = "1.0")]
    z_scale: f64,

    /// Pre-multiplier applied to raw elevations
    #[arg(long, default_value = "1.0")]
    elevation_scale: f64,

    /// Use the model size exactly instead of preserving the aspect ratio
    #[arg(long)]
    ensure_squared: bool,

    /// Split the area into tiles, one STL per tile (format "NxM")
    #[arg(long, default_value = "1x1")]
    tiles: String,

    /// Sample value to treat as missing data
    #[arg(long)]
    no_data: Option<f32>,
}

/// Prints one line per finished tile.
struct ConsoleProgress {
    done: AtomicUsize,
    total: usize,
}

impl ProgressSink for ConsoleProgress {
    fn advance(&self, n: usize) {
        let done = self.done.fetch_add(n, Ordering::SeqCst) + n;
        println!("  [{}/{}] tiles converted", done, self.total);
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    // Validate the tile format before doing any heavy lifting.
    let tiles = match parse_tile_format(&args.tiles) {
        Ok(tiles) => tiles,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Loading heightmap from {}...", args.input.display());
    let grid = match load_image_grid(&args.input, args.no_data) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!("Grid size: {}x{}", grid.rows, grid.cols);

    let options = ConvertOptions {
        encoding: if args.ascii { Encoding::Ascii } else { Encoding::Binary },
        model_size: (args.model_size_x, args.model_size_y),
        max_res: args.max_res,
        scaling: ScalingParams {
            z_offset: args.z_offset,
            z_scale: args.z_scale,
            elevation_scale: args.elevation_scale,
        },
        ensure_squared: args.ensure_squared,
    };

    let progress = ConsoleProgress {
        done: AtomicUsize::new(0),
        total: tiles.0 * tiles.1,
    };

    println!("Converting ({}x{} tiles)...", tiles.0, tiles.1);
    match convert_tiled_grid_to_stl(&grid, tiles, &options, &args.output, &progress) {
        Ok(paths) => {
            for path in paths {
                println!("Wrote {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

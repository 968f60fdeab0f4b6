use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use voxel_landscape::config::GenParams;
use voxel_landscape::error::{Error, ExportError};
use voxel_landscape::export::{export_preview, vox, write_vox};
use voxel_landscape::generator::Generator;
use voxel_landscape::logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "voxel_landscape")]
#[command(about = "Generate voxel landscapes by simulating plate tectonics")]
struct Args {
    /// Width of the map in voxels
    #[arg(long, required_unless_present = "config")]
    sizex: Option<usize>,

    /// Depth of the map in voxels
    #[arg(long, required_unless_present = "config")]
    sizey: Option<usize>,

    /// Simulated years
    #[arg(long, required_unless_present = "config")]
    years: Option<u64>,

    /// Output .vox file
    #[arg(short, long, default_value = "landscape.vox")]
    output: PathBuf,

    /// Number of deep sea basins (random 0-3 if not specified)
    #[arg(long)]
    basin_cnt: Option<usize>,

    /// Number of mid-ocean ridges (1 if not specified)
    #[arg(long)]
    mor_cnt: Option<usize>,

    /// Number of continental margins (random 0-2 if not specified)
    #[arg(long)]
    margin_cnt: Option<usize>,

    /// Number of tectonic plates (random 5-15 if not specified)
    #[arg(short = 'p', long)]
    plates: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Starting column height
    #[arg(long)]
    base_height: Option<u32>,

    /// Maximum Perlin height jitter (0 disables)
    #[arg(long)]
    jitter: Option<u32>,

    /// Activate every element from the first step
    #[arg(long)]
    immediate: bool,

    /// JSON parameter file; command line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write a top-down PNG preview
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Also write a JSON run summary
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Layer the command line over the config file, if any.
    fn params(&self) -> Result<GenParams, Error> {
        let mut params = match &self.config {
            Some(path) => GenParams::load(path)?,
            None => GenParams::default(),
        };

        if let Some(width) = self.sizex {
            params.width = width;
        }
        if let Some(height) = self.sizey {
            params.height = height;
        }
        if let Some(years) = self.years {
            params.years = years;
        }
        if let Some(base_height) = self.base_height {
            params.base_height = base_height;
        }
        if let Some(jitter) = self.jitter {
            params.jitter = jitter;
        }
        params.basins = self.basin_cnt.or(params.basins);
        params.ridges = self.mor_cnt.or(params.ridges);
        params.margins = self.margin_cnt.or(params.margins);
        params.plates = self.plates.or(params.plates);
        params.seed = self.seed.or(params.seed);
        params.immediate |= self.immediate;

        params.validate()?;
        Ok(params)
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let params = args.params()?;
    info!(
        width = params.width,
        height = params.height,
        years = params.years,
        output = %args.output.display(),
        "Input"
    );
    // Reject maps the model format cannot hold before simulating anything.
    vox::check_size(params.width, params.height, 0)?;

    let mut generator = Generator::new(params)?;
    generator.generate()?;

    write_vox(&generator.grid, &args.output)?;
    if let Some(path) = &args.preview {
        export_preview(&generator.grid, path)?;
    }
    if let Some(path) = &args.summary {
        let file = std::fs::File::create(path).map_err(ExportError::from)?;
        serde_json::to_writer_pretty(file, &generator.summary()).map_err(ExportError::from)?;
        info!(path = %path.display(), "Wrote run summary");
    }

    println!("Seed: {}", generator.seeds.master);
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

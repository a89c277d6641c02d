//! Command-line interface for generating a photomosaic from files on disk

use crate::algorithm::control::{CancelToken, RunControl};
use crate::algorithm::executor::MosaicGenerator;
use crate::io::configuration::{
    DEFAULT_BRIGHTNESS, DEFAULT_COLOR_TOLERANCE, DEFAULT_CONTRAST, DEFAULT_GRID_SIZE,
    DEFAULT_MATERIAL_RESOLUTION, DEFAULT_OUTPUT_RESOLUTION, DEFAULT_PREVIEW_TILE_SIZE,
    LOAD_TIMEOUT, MosaicParameters, OUTPUT_SUFFIX, PREVIEW_SUFFIX,
};
use crate::io::error::{MosaicError, Result};
use crate::io::image::{save_png, write_bytes};
use crate::io::progress::ProgressManager;
use crate::io::source::{FileSource, collect_material_paths};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Parser)]
#[command(name = "photomosaic")]
#[command(
    author,
    version,
    about = "Rebuild a target image as a mosaic of material images"
)]
/// Command-line arguments for mosaic generation
pub struct Cli {
    /// Target image to reproduce
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Material images or directories of material images
    #[arg(short, long, required = true, num_args = 1..)]
    pub materials: Vec<PathBuf>,

    /// Output PNG path (defaults to <target>_mosaic.png beside the target)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write the preview as <output>_preview.png
    #[arg(short, long)]
    pub preview: bool,

    /// Cells per grid side
    #[arg(short, long, default_value_t = DEFAULT_GRID_SIZE)]
    pub grid_size: u32,

    /// Preview tile side in pixels
    #[arg(short = 't', long, default_value_t = DEFAULT_PREVIEW_TILE_SIZE)]
    pub tile_size: u32,

    /// Color matching looseness
    #[arg(short = 'c', long, default_value_t = DEFAULT_COLOR_TOLERANCE)]
    pub color_tolerance: f64,

    /// Brightness multiplier
    #[arg(short, long, default_value_t = DEFAULT_BRIGHTNESS)]
    pub brightness: f64,

    /// Contrast multiplier
    #[arg(short = 'k', long, default_value_t = DEFAULT_CONTRAST)]
    pub contrast: f64,

    /// Material thumbnail side in pixels
    #[arg(short = 'M', long, default_value_t = DEFAULT_MATERIAL_RESOLUTION)]
    pub material_resolution: u32,

    /// Output canvas side in pixels
    #[arg(short, long, default_value_t = DEFAULT_OUTPUT_RESOLUTION)]
    pub resolution: u32,

    /// Seconds allowed for each image to load
    #[arg(long, default_value_t = LOAD_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate even if the output exists
    #[arg(short, long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if an existing output file should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Generation parameters taken from the flags
    pub const fn parameters(&self) -> MosaicParameters {
        MosaicParameters {
            grid_size: self.grid_size,
            preview_tile_size: self.tile_size,
            color_tolerance: self.color_tolerance,
            brightness: self.brightness,
            contrast: self.contrast,
            material_resolution: self.material_resolution,
            output_resolution: self.resolution,
        }
    }

    /// Where the mosaic is written
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| suffixed_path(&self.target, OUTPUT_SUFFIX))
    }

    /// Where the preview is written
    pub fn preview_path(&self) -> PathBuf {
        suffixed_path(&self.output_path(), PREVIEW_SUFFIX)
    }
}

/// `<dir>/<stem><suffix>.png` for the given path
pub fn suffixed_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default();
    let name = format!("{}{suffix}.png", stem.to_string_lossy());

    match path.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// Runs one generation from CLI arguments
pub struct MosaicRunner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl MosaicRunner {
    /// Create a runner for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Material identifiers named on the command line, directories expanded
    ///
    /// # Errors
    ///
    /// Returns a file system error if a material directory cannot be read
    pub fn material_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for path in &self.cli.materials {
            if path.is_dir() {
                ids.extend(
                    collect_material_paths(path)?
                        .iter()
                        .map(|p| p.to_string_lossy().into_owned()),
                );
            } else {
                ids.push(path.to_string_lossy().into_owned());
            }
        }
        Ok(ids)
    }

    /// Generate the mosaic and write it to disk
    ///
    /// Returns the output path, or `None` if an existing output was skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if parameters are invalid, the target cannot be read,
    /// generation fails, or the results cannot be written
    pub fn process(&self) -> Result<Option<PathBuf>> {
        let start_time = Instant::now();
        let output_path = self.cli.output_path();

        if self.cli.skip_existing() && output_path.exists() {
            info!("Skipping: {} (output exists)", output_path.display());
            return Ok(None);
        }

        let target_bytes = std::fs::read(&self.cli.target).map_err(|source| {
            MosaicError::TargetLoad {
                cause: Box::new(MosaicError::SourceFetch {
                    source_id: self.cli.target.display().to_string(),
                    source,
                }),
            }
        })?;
        let material_ids = self.material_ids()?;

        let control = RunControl::unpaced(CancelToken::new()).with_progress(
            self.progress_manager
                .clone()
                .unwrap_or_else(ProgressManager::hidden),
        );
        let source = Arc::new(FileSource::new());
        let mut generator = MosaicGenerator::new(self.cli.parameters(), source)?
            .with_control(control)
            .with_load_timeout(Duration::from_secs(self.cli.timeout));

        let output = generator.generate(&target_bytes, &material_ids)?;

        write_bytes(&output.encoded, &output_path)?;
        info!("Wrote {}", output_path.display());

        if self.cli.preview {
            let preview_path = self.cli.preview_path();
            save_png(&output.preview, &preview_path)?;
            info!("Wrote {}", preview_path.display());
        }

        info!(
            "Finished {} from {} materials in {:.1?}",
            output.resolution_label,
            output.load.loaded,
            start_time.elapsed()
        );
        Ok(Some(output_path))
    }
}

//! Pipeline orchestration from target bytes to an encoded mosaic
//!
//! A run loads the material catalog once, then performs two independent
//! grid/match/composite passes: the full-resolution output and a capped
//! preview. Every stage change is recorded so callers can observe where a
//! run stopped.

use crate::algorithm::catalog::MaterialCatalog;
use crate::algorithm::compositor::{RenderTier, composite};
use crate::algorithm::control::RunControl;
use crate::algorithm::matcher::{MatchConfig, MatchReport, match_materials};
use crate::analysis::cache::ProfileCache;
use crate::io::configuration::{LOAD_TIMEOUT, MosaicParameters};
use crate::io::error::{MosaicError, Result, WithSource};
use crate::io::image::{decode_image, encode_png};
use crate::io::loader::{LoadSummary, MaterialLoader};
use crate::io::source::MaterialSource;
use crate::raster::adjust::apply_brightness_contrast;
use crate::spatial::grid::Grid;
use image::RgbaImage;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Identifier reported for target image failures
const TARGET_SOURCE_ID: &str = "target";

/// Stage of a generation run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    /// No run started
    Idle,
    /// Resolving material sources into the catalog
    Loading,
    /// Partitioning the target into cells
    GridBuilding,
    /// Assigning materials to cells
    Matching,
    /// Drawing materials into a canvas
    Compositing,
    /// Run finished successfully
    Done,
    /// Run stopped with an error
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::GridBuilding => "grid building",
            Self::Matching => "matching",
            Self::Compositing => "compositing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Which canvas a pass renders
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassKind {
    /// Full-resolution output
    Output,
    /// Low-resolution preview
    Preview,
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Output => f.write_str("output"),
            Self::Preview => f.write_str("preview"),
        }
    }
}

/// Summary of one grid/match/composite pass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassReport {
    /// Canvas rendered
    pub kind: PassKind,
    /// Side of the canvas in pixels
    pub canvas_side: u32,
    /// Cells per grid side
    pub grid_size: u32,
    /// Matching statistics
    pub matching: MatchReport,
    /// Wall time spent on the pass
    pub elapsed: Duration,
}

/// Products of a successful run
#[derive(Clone, Debug)]
pub struct MosaicOutput {
    /// PNG-encoded output mosaic
    pub encoded: Vec<u8>,
    /// Preview canvas
    pub preview: RgbaImage,
    /// Side of the output canvas
    pub output_side: u32,
    /// Human-readable resolution such as `4K` or `1600p`
    pub resolution_label: String,
    /// Material loading counts
    pub load: LoadSummary,
    /// Output pass followed by preview pass
    pub passes: Vec<PassReport>,
}

/// Label for a square canvas of the given side
pub fn resolution_label(side: u32) -> String {
    match side {
        7680.. => "8K".to_string(),
        6400.. => "6K".to_string(),
        3840.. => "4K".to_string(),
        _ => format!("{side}p"),
    }
}

/// Runs the full pipeline for one set of parameters
pub struct MosaicGenerator {
    parameters: MosaicParameters,
    source: Arc<dyn MaterialSource>,
    control: RunControl,
    load_timeout: Duration,
    state: PipelineState,
    transitions: Vec<PipelineState>,
}

impl MosaicGenerator {
    /// Create a generator resolving materials through `source`
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if any parameter is out of range
    pub fn new(parameters: MosaicParameters, source: Arc<dyn MaterialSource>) -> Result<Self> {
        parameters.validate()?;
        Ok(Self {
            parameters,
            source,
            control: RunControl::default(),
            load_timeout: LOAD_TIMEOUT,
            state: PipelineState::Idle,
            transitions: vec![PipelineState::Idle],
        })
    }

    /// Use `control` for pacing, cancellation and progress
    #[must_use]
    pub fn with_control(mut self, control: RunControl) -> Self {
        self.control = control;
        self
    }

    /// Override the per-image load timeout
    #[must_use]
    pub const fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    /// Validated parameters of this generator
    pub const fn parameters(&self) -> &MosaicParameters {
        &self.parameters
    }

    /// Current stage
    pub const fn state(&self) -> PipelineState {
        self.state
    }

    /// Every stage entered during the latest run, starting with `Idle`
    pub fn transitions(&self) -> &[PipelineState] {
        &self.transitions
    }

    /// Generate a mosaic of `target_bytes` from the listed materials
    ///
    /// Per-material failures are skipped. On error the generator is left in
    /// [`PipelineState::Failed`].
    ///
    /// # Errors
    ///
    /// Returns `TargetLoad` if the target cannot be decoded, `NoMaterials` if
    /// no material loads, `Cancelled` if the run is cancelled, or a render or
    /// encode error from a later stage
    pub fn generate(
        &mut self,
        target_bytes: &[u8],
        material_ids: &[String],
    ) -> Result<MosaicOutput> {
        self.state = PipelineState::Idle;
        self.transitions = vec![PipelineState::Idle];

        let result = self.run(target_bytes, material_ids);
        match &result {
            Ok(output) => {
                self.transition(PipelineState::Done);
                info!(
                    "Mosaic complete: {} ({}x{}px)",
                    output.resolution_label, output.output_side, output.output_side
                );
            }
            Err(e) => {
                error!("Mosaic generation failed during {}: {e}", self.state);
                self.transition(PipelineState::Failed);
            }
        }
        self.control.progress().finish();
        result
    }

    fn run(&mut self, target_bytes: &[u8], material_ids: &[String]) -> Result<MosaicOutput> {
        self.transition(PipelineState::Loading);
        self.control.ensure_active("loading")?;

        let target = decode_image(target_bytes)
            .for_source(TARGET_SOURCE_ID)
            .map_err(|cause| MosaicError::TargetLoad {
                cause: Box::new(cause),
            })?;

        let mut cache = ProfileCache::new();
        let loader = MaterialLoader::new(
            Arc::clone(&self.source),
            self.parameters.material_resolution,
        )
        .with_timeout(self.load_timeout);
        let (mut catalog, load) = loader.load_catalog(material_ids, &mut cache, &self.control)?;

        let output_side = self.parameters.output_side();
        let (output, output_report) =
            self.run_pass(PassKind::Output, &target, &mut catalog, output_side)?;
        let preview_side = self.parameters.preview_side();
        let (preview, preview_report) =
            self.run_pass(PassKind::Preview, &target, &mut catalog, preview_side)?;

        let encoded = encode_png(&output)?;

        Ok(MosaicOutput {
            encoded,
            preview,
            output_side,
            resolution_label: resolution_label(output_side),
            load,
            passes: vec![output_report, preview_report],
        })
    }

    fn run_pass(
        &mut self,
        kind: PassKind,
        target: &RgbaImage,
        catalog: &mut MaterialCatalog,
        canvas_side: u32,
    ) -> Result<(RgbaImage, PassReport)> {
        let started = Instant::now();
        let grid_size = self.parameters.grid_size;

        self.transition(PipelineState::GridBuilding);
        info!(
            "Building {grid_size}x{grid_size} grid for {canvas_side}x{canvas_side} {kind} canvas"
        );
        let mut grid = Grid::build(target, grid_size, canvas_side, &self.control)?;

        self.transition(PipelineState::Matching);
        let matching = match_materials(
            &mut grid,
            catalog,
            MatchConfig {
                color_tolerance: self.parameters.color_tolerance,
                grid_size,
            },
        )?;
        self.control.checkpoint("matching")?;

        self.transition(PipelineState::Compositing);
        let tier = match kind {
            PassKind::Output => RenderTier::Output,
            PassKind::Preview => RenderTier::Preview {
                tile_size: self.parameters.preview_tile_size,
            },
        };
        let mut canvas = composite(&grid, catalog, tier, &self.control)?;
        apply_brightness_contrast(
            &mut canvas,
            self.parameters.brightness,
            self.parameters.contrast,
        );

        let report = PassReport {
            kind,
            canvas_side,
            grid_size,
            matching,
            elapsed: started.elapsed(),
        };
        debug!("{kind} pass finished in {:.2?}", report.elapsed);
        Ok((canvas, report))
    }

    fn transition(&mut self, next: PipelineState) {
        debug!("Pipeline state: {} -> {next}", self.state);
        self.state = next;
        self.transitions.push(next);
    }
}

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Output,
    time::Instant,
};

use clap::Args;

use crate::{
    config::{GridConfig, GRID_TILES},
    csv_output::CsvOutput,
    error::{Error, Result},
    group::{group_by_developer, DeveloperGroup},
    utils, BResult,
};

use super::{dispatch::dispatch, encode::encode_group, run_tool};

/// Filter labels of the quadrants, in `GridConfig::layout` order.
const QUADRANTS: [&str; GRID_TILES] = ["upperleft", "upperright", "lowerleft", "lowerright"];

#[derive(Args, Debug, Clone, Default)]
pub struct Opt {
    /// folder with `Dev<N>_*` images
    #[arg(short = 'i', long = "pictures", display_order = 0)]
    pictures_dir: Option<PathBuf>,
    /// output video
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// scratch folder for manifests and per-group clips
    #[arg(long = "temp")]
    temp_dir: Option<PathBuf>,
    /// ffmpeg binary
    #[arg(long)]
    ffmpeg: Option<PathBuf>,
    /// per-group clip fps
    #[arg(short = 'r', long = "fps")]
    frame_rate: Option<u32>,
    /// max images per developer group
    #[arg(short, long)]
    limit: Option<usize>,
    /// developer tag prefix
    #[arg(long)]
    prefix: Option<String>,
    /// sort images by path before grouping (default: directory order)
    #[arg(long)]
    sort: bool,
    /// number simultaneously encoded groups (0 = number of cpus)
    #[arg(long)]
    nproc: Option<usize>,
    /// json config, created with defaults if missing
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// append a per-group report to this csv table
    #[arg(long = "csv")]
    csv_path: Option<PathBuf>,
}

impl Opt {
    /// Defaults, then the config file, then command line flags.
    pub fn config(&self) -> Result<GridConfig> {
        let mut cfg = match &self.config {
            Some(path) => GridConfig::load_or_create(path)?,
            None => GridConfig::default(),
        };
        if let Some(p) = &self.pictures_dir {
            cfg.pictures_dir = p.to_owned();
        }
        if let Some(p) = &self.output {
            cfg.output = p.to_owned();
        }
        if let Some(p) = &self.temp_dir {
            cfg.temp_dir = p.to_owned();
        }
        if let Some(p) = &self.ffmpeg {
            cfg.ffmpeg = p.to_owned();
        }
        if let Some(r) = self.frame_rate {
            cfg.frame_rate = r;
        }
        if let Some(l) = self.limit {
            cfg.group_limit = Some(l);
        }
        if let Some(p) = &self.prefix {
            cfg.group_prefix = p.to_string();
        }
        if self.sort {
            cfg.sort = true;
        }
        if let Some(n) = self.nproc {
            cfg.nproc = n;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

pub fn main(opt: Opt) -> BResult<()> {
    let res = opt
        .config()
        .and_then(|cfg| run(&cfg, opt.csv_path.as_deref()));
    if let Err(e) = res {
        log::error!("{}", e);
        return Err(e.into());
    }
    Ok(())
}

/// Group the images, encode a clip per group in parallel, then compose the grid.
///
/// Composition is skipped when any group failed to encode.
pub fn run(cfg: &GridConfig, csv_path: Option<&Path>) -> Result<PathBuf> {
    let time_start = Instant::now();
    log::info!("Starting process...");

    if !cfg.pictures_dir.is_dir() {
        return Err(Error::FolderNotFound(cfg.pictures_dir.to_owned()));
    }
    // ffmpeg reads manifest entries relative to the manifest itself
    let pictures_dir = std::fs::canonicalize(&cfg.pictures_dir)?;
    let images = utils::list_images(&pictures_dir, &cfg.extensions, cfg.sort)?;

    let mut groups = group_by_developer(&images, &cfg.group_prefix, cfg.group_limit);
    if groups.len() > GRID_TILES {
        log::warn!(
            "Found {} developer groups, using the first {}",
            groups.len(),
            GRID_TILES
        );
        groups.truncate(GRID_TILES);
    }
    if groups.len() != GRID_TILES {
        return Err(Error::ClipCount {
            expected: GRID_TILES,
            got: groups.len(),
        });
    }
    for group in &groups {
        log::info!("{}: {} images", group.tag, group.images.len());
    }

    utils::mkdir(&cfg.temp_dir)?;
    log::info!("Starting to create individual videos...");
    let step_start = Instant::now();
    let clips = dispatch(&groups, cfg.nproc, |i, group| {
        encode_group(cfg, i, &group.images)
    })?;
    log::info!(
        "Time taken to create individual videos: {:.2} seconds",
        step_start.elapsed().as_secs_f64()
    );

    let mut failed = 0;
    for (i, (group, clip)) in groups.iter().zip(&clips).enumerate() {
        if let Err(e) = clip {
            log::error!("Error while creating video for group {} ({}): {}", i + 1, group.tag, e);
            failed += 1;
        }
    }

    if let Some(path) = csv_path {
        if let Err(e) = write_report(path, &groups, &clips) {
            log::error!("Can't write report {}: {}", path.display(), e);
        }
    }
    if failed > 0 {
        return Err(Error::EncodeFailed {
            failed,
            total: clips.len(),
        });
    }
    let clips = clips.into_iter().collect::<Result<Vec<PathBuf>>>()?;

    log::info!("Combining videos into a 2x2 grid...");
    let step_start = Instant::now();
    compose(cfg, &clips)?;
    log::info!(
        "Time taken to combine videos into a 2x2 grid: {:.2} seconds",
        step_start.elapsed().as_secs_f64()
    );

    log::info!(
        "Process completed in {:.2} seconds.",
        time_start.elapsed().as_secs_f64()
    );
    log::info!("Video saved to: {}", cfg.output.display());
    Ok(cfg.output.to_owned())
}

/// Run ffmpeg once over all clips to produce `cfg.output`.
pub fn compose(cfg: &GridConfig, clips: &[PathBuf]) -> Result<Output> {
    let args = grid_args(cfg, clips)?;
    let output = run_tool(&cfg.ffmpeg, args)?;
    log::debug!("ffmpeg: {}", String::from_utf8_lossy(&output.stderr));
    Ok(output)
}

/// ffmpeg arguments for the grid: one `-i` per clip, encoder settings, filter graph, output.
pub fn grid_args(cfg: &GridConfig, clips: &[PathBuf]) -> Result<Vec<OsString>> {
    if clips.len() != GRID_TILES {
        return Err(Error::ClipCount {
            expected: GRID_TILES,
            got: clips.len(),
        });
    }
    let mut args: Vec<OsString> = vec!["-y".into()];
    for clip in clips {
        args.push("-i".into());
        args.push(clip.into());
    }
    args.extend(
        [
            "-c:v".to_string(),
            cfg.codec.to_string(),
            "-preset".to_string(),
            cfg.preset.to_string(),
            "-crf".to_string(),
            cfg.crf.to_string(),
            "-filter_complex".to_string(),
            filter_graph(cfg),
        ]
        .into_iter()
        .map(OsString::from),
    );
    args.push(cfg.output.to_owned().into());
    Ok(args)
}

/// Blank canvas, every input scaled to a quarter of it, overlaid per `cfg.layout`.
pub fn filter_graph(cfg: &GridConfig) -> String {
    let (tile_w, tile_h) = cfg.tile_size();
    let mut graph = format!(
        "nullsrc=size={}x{} [base];",
        cfg.canvas_width, cfg.canvas_height
    );
    for (label, input) in QUADRANTS.iter().zip(cfg.layout) {
        graph.push_str(&format!(
            "[{}:v] setpts=PTS-STARTPTS, scale={}x{} [{}];",
            input, tile_w, tile_h, label
        ));
    }
    graph.push_str(&format!(
        "[base][{}] overlay=shortest=1 [tmp1];\
         [tmp1][{}] overlay=W/2:0 [tmp2];\
         [tmp2][{}] overlay=0:H/2 [tmp3];\
         [tmp3][{}] overlay=W/2:H/2",
        QUADRANTS[0], QUADRANTS[1], QUADRANTS[2], QUADRANTS[3]
    ));
    graph
}

fn write_report(path: &Path, groups: &[DeveloperGroup], clips: &[Result<PathBuf>]) -> Result<()> {
    let mut csv_output = CsvOutput::new(path)?;
    for (group, clip) in groups.iter().zip(clips) {
        let (clip_path, status) = match clip {
            Ok(p) => (p.display().to_string(), "ok".to_string()),
            Err(e) => (String::new(), e.to_string()),
        };
        csv_output.write_group_row(&group.tag, group.images.len(), &clip_path, &status)?;
    }
    Ok(())
}

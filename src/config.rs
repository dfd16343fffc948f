use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of clips in the 2x2 grid.
pub const GRID_TILES: usize = 4;

/// Everything `grid` needs, collected in one place so tests can swap any of it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GridConfig {
    /// ffmpeg binary (bare name is resolved through PATH)
    pub ffmpeg: PathBuf,
    pub pictures_dir: PathBuf,
    /// Manifests and per-group clips
    pub temp_dir: PathBuf,
    pub output: PathBuf,
    pub frame_rate: u32,
    /// Per-group clip width, height follows the aspect ratio
    pub clip_width: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Input index shown in each quadrant: top-left, top-right, bottom-left, bottom-right
    pub layout: [usize; GRID_TILES],
    pub group_prefix: String,
    /// Max images kept per group
    pub group_limit: Option<usize>,
    pub extensions: Vec<String>,
    pub codec: String,
    pub preset: String,
    pub crf: u32,
    /// Sort listed images by path before grouping
    pub sort: bool,
    /// Worker threads for clip encoding, 0 = host parallelism
    pub nproc: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            ffmpeg: PathBuf::from("ffmpeg"),
            pictures_dir: PathBuf::from("pictures"),
            temp_dir: PathBuf::from("temp"),
            output: PathBuf::from("dev_grouped_video.mp4"),
            frame_rate: 30,
            clip_width: 960,
            canvas_width: 1920,
            canvas_height: 1080,
            layout: [3, 0, 1, 2],
            group_prefix: "Dev".to_string(),
            group_limit: None,
            extensions: ["png", "jpg", "jpeg", "bmp", "tiff", "webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            codec: "libx264".to_string(),
            preset: "fast".to_string(),
            crf: 23,
            sort: false,
            nproc: 0,
        }
    }
}

impl GridConfig {
    /// Read config from `config_file`, writing the defaults there first if it is missing.
    pub fn load_or_create(config_file: &Path) -> Result<GridConfig> {
        if !config_file.exists() {
            let mut writer = BufWriter::new(File::create(config_file)?);
            serde_json::to_writer_pretty(&mut writer, &GridConfig::default())?;
            writer.write_all(b"\n")?;
            writer.flush()?;
            log::info!("Default config written: {}", config_file.display());
        }
        let reader = BufReader::new(File::open(config_file)?);
        let config: GridConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_rate == 0 {
            return Err(Error::Config("frame-rate must be non-zero".into()));
        }
        if self.clip_width == 0 {
            return Err(Error::Config("clip-width must be non-zero".into()));
        }
        if self.canvas_width == 0
            || self.canvas_height == 0
            || self.canvas_width % 2 != 0
            || self.canvas_height % 2 != 0
        {
            return Err(Error::Config(format!(
                "canvas {}x{} must be non-zero and even",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.group_limit == Some(0) {
            return Err(Error::Config("group-limit must be at least 1".into()));
        }
        let mut seen = [false; GRID_TILES];
        for &i in &self.layout {
            if i >= GRID_TILES || seen[i] {
                return Err(Error::Config(format!(
                    "layout {:?} is not a permutation of 0..{}",
                    self.layout, GRID_TILES
                )));
            }
            seen[i] = true;
        }
        Ok(())
    }

    /// Quarter-canvas size every clip is scaled to in the grid.
    pub fn tile_size(&self) -> (u32, u32) {
        (self.canvas_width / 2, self.canvas_height / 2)
    }

    pub fn manifest_path(&self, group_index: usize) -> PathBuf {
        self.temp_dir.join(format!("group_{}.txt", group_index))
    }

    pub fn clip_path(&self, group_index: usize) -> PathBuf {
        self.temp_dir.join(format!("group_{}.mp4", group_index))
    }
}

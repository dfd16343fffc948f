use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::{config::GridConfig, error::Result};

use super::{ffmpeg_demuxer_create_from_files, run_tool};

/// ffmpeg arguments turning a concat manifest into one clip.
pub fn encode_args(cfg: &GridConfig, manifest: &Path, clip: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-y", "-f", "concat", "-safe", "0", "-i"]
        .iter()
        .map(OsString::from)
        .collect();
    args.push(manifest.into());
    args.push("-vf".into());
    args.push(format!("scale={}:-1", cfg.clip_width).into());
    args.push("-r".into());
    args.push(cfg.frame_rate.to_string().into());
    args.push(clip.into());
    args
}

/// Encode one group of images into `temp_dir/group_<index>.mp4`.
///
/// The manifest and clip are keyed by `group_index`, so concurrent calls for
/// different groups never touch the same files.
pub fn encode_group(cfg: &GridConfig, group_index: usize, images: &[PathBuf]) -> Result<PathBuf> {
    let manifest = cfg.manifest_path(group_index);
    let clip = cfg.clip_path(group_index);
    ffmpeg_demuxer_create_from_files(&manifest, images)?;

    run_tool(&cfg.ffmpeg, encode_args(cfg, &manifest, &clip))?;
    log::info!("Created video for group {}", group_index + 1);
    Ok(clip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    #[test]
    fn args_select_concat_input_scale_and_rate() {
        let cfg = GridConfig {
            frame_rate: 24,
            ..Default::default()
        };
        let args = encode_args(&cfg, Path::new("temp/group_1.txt"), Path::new("temp/group_1.mp4"));
        let expected: Vec<OsString> = [
            "-y",
            "-f",
            "concat",
            "-safe",
            "0",
            "-i",
            "temp/group_1.txt",
            "-vf",
            "scale=960:-1",
            "-r",
            "24",
            "temp/group_1.mp4",
        ]
        .iter()
        .map(OsString::from)
        .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn failed_spawn_is_reported_after_manifest_written() {
        let dir = TempDir::new().unwrap();
        let cfg = GridConfig {
            ffmpeg: PathBuf::from("/nonexistent/devgrid-ffmpeg"),
            temp_dir: dir.path().to_owned(),
            ..Default::default()
        };
        let images = vec![PathBuf::from("/pics/Dev1_a.png")];

        let res = encode_group(&cfg, 3, &images);
        assert!(matches!(res, Err(Error::Spawn { .. })));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("group_3.txt")).unwrap(),
            "file '/pics/Dev1_a.png'\n"
        );
    }
}

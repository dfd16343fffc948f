//! Runs `grid` end to end against a shell script standing in for ffmpeg.
#![cfg(unix)]

use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

use devgrid::{config::GridConfig, error::Error, gen::grid};
use tempfile::TempDir;

/// Logs its arguments, fails on group 1 while `fail_flag` exists, otherwise creates its output.
fn write_fake_ffmpeg(dir: &Path, log: &Path, fail_flag: &Path) -> PathBuf {
    let script = dir.join("ffmpeg");
    fs::write(
        &script,
        format!(
            "#!/bin/sh\n\
             echo \"$@\" >> '{log}'\n\
             for last; do :; done\n\
             case \"$last\" in\n\
             *group_1.mp4) if [ -e '{flag}' ]; then echo 'group 1 exploded' >&2; exit 1; fi ;;\n\
             esac\n\
             touch \"$last\"\n",
            log = log.display(),
            flag = fail_flag.display(),
        ),
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    script
}

fn logged_calls(log: &Path) -> Vec<String> {
    fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

// One test so the script is written before any process is spawned in this binary.
#[test]
fn grid_with_fake_ffmpeg() {
    let dir = TempDir::new().unwrap();
    let pictures = dir.path().join("pictures");
    fs::create_dir(&pictures).unwrap();
    for name in [
        "Dev1_fn000001.png",
        "Dev1_fn000002.png",
        "Dev1_fn000003.png",
        "Dev2_fn000001.jpg",
        "Dev3_fn000001.png",
        "Dev4_fn000001.webp",
        "Dev5_fn000001.png",
        "developer1_fn000001.png",
        "readme.txt",
    ] {
        fs::write(pictures.join(name), b"").unwrap();
    }
    let log = dir.path().join("calls.log");
    let fail_flag = dir.path().join("fail");
    let ffmpeg = write_fake_ffmpeg(dir.path(), &log, &fail_flag);

    let cfg = GridConfig {
        ffmpeg,
        pictures_dir: pictures.clone(),
        temp_dir: dir.path().join("temp"),
        output: dir.path().join("dev_grouped_video.mp4"),
        group_limit: Some(2),
        sort: true,
        ..Default::default()
    };

    // all groups encode, grid is composed
    let output = grid::run(&cfg, None).unwrap();
    assert_eq!(output, cfg.output);
    assert!(cfg.output.exists());
    for i in 0..4 {
        assert!(cfg.clip_path(i).exists());
    }
    assert!(!cfg.clip_path(4).exists());

    let abs_pictures = fs::canonicalize(&pictures).unwrap();
    assert_eq!(
        fs::read_to_string(cfg.manifest_path(0)).unwrap(),
        format!(
            "file '{0}/Dev1_fn000001.png'\nfile '{0}/Dev1_fn000002.png'\n",
            abs_pictures.display()
        )
    );

    let calls = logged_calls(&log);
    assert_eq!(calls.len(), 5);
    let grid_call = calls.last().unwrap();
    assert!(grid_call.contains("-filter_complex"));
    assert!(grid_call.contains(&format!(
        "-i {} -i {}",
        cfg.clip_path(0).display(),
        cfg.clip_path(1).display()
    )));
    assert!(grid_call.contains("[3:v] setpts=PTS-STARTPTS, scale=960x540 [upperleft]"));

    // one group fails: composition is skipped
    fs::remove_file(&cfg.output).unwrap();
    fs::write(&fail_flag, b"").unwrap();
    let report = dir.path().join("res.csv");

    let res = grid::run(&cfg, Some(&report));
    assert!(matches!(
        res,
        Err(Error::EncodeFailed {
            failed: 1,
            total: 4
        })
    ));
    assert!(!cfg.output.exists());

    let calls = logged_calls(&log);
    assert_eq!(calls.len(), 9);
    assert_eq!(
        calls.iter().filter(|c| c.contains("-filter_complex")).count(),
        1
    );

    let report = fs::read_to_string(&report).unwrap();
    assert!(report.starts_with("tag\timages\tclip\tstatus\n"));
    assert!(report.contains("Dev1\t2\t"));
    assert!(report.contains("group 1 exploded"));
}

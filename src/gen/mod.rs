use std::{
    ffi::{OsStr, OsString},
    io::Write,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};

use crate::error::{Error, Result};

pub mod dispatch;
pub mod encode;
pub mod grid;

/// Write a concat-demuxer input list, one `file '<path>'` line per image.
pub fn ffmpeg_demuxer_create_from_files(demuxerf_path: &Path, input: &[PathBuf]) -> Result<()> {
    let demuxerf = std::fs::File::create(demuxerf_path)?;
    let mut demuxerf = std::io::BufWriter::new(demuxerf);
    for i in input {
        demuxerf.write_all(demuxer_line(i).as_bytes())?;
    }
    demuxerf.flush()?;
    Ok(())
}

fn demuxer_line(path: &Path) -> String {
    // concat demuxer quoting: close the quote, escaped quote, reopen
    let quoted = path.to_string_lossy().replace('\'', r"'\''");
    format!("file '{}'\n", quoted)
}

/// Run an external tool to completion, capturing its output.
///
/// A non-zero exit becomes [`Error::ToolFailed`] carrying the tool's stderr.
pub fn run_tool<I, S>(program: &Path, args: I) -> Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
    log::debug!("{} {}", program.display(), cmdline(&args));

    let output = Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| Error::Spawn {
            program: program.to_owned(),
            source,
        })?;

    if output.status.success() {
        Ok(output)
    } else {
        Err(Error::ToolFailed {
            program: program.to_owned(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn cmdline(args: &[OsString]) -> String {
    args.iter()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn demuxer_lists_every_image_in_order() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("group_0.txt");
        let images = vec![
            PathBuf::from("/pics/Dev1_b.png"),
            PathBuf::from("/pics/Dev1_a.png"),
        ];
        ffmpeg_demuxer_create_from_files(&manifest, &images).unwrap();
        assert_eq!(
            std::fs::read_to_string(&manifest).unwrap(),
            "file '/pics/Dev1_b.png'\nfile '/pics/Dev1_a.png'\n"
        );
    }

    #[test]
    fn demuxer_escapes_single_quotes() {
        assert_eq!(
            demuxer_line(Path::new("/pics/Dev1_it's.png")),
            "file '/pics/Dev1_it'\\''s.png'\n"
        );
    }

    #[test]
    fn missing_tool_is_spawn_error() {
        let res = run_tool(Path::new("/nonexistent/devgrid-ffmpeg"), ["-version"]);
        assert!(matches!(res, Err(Error::Spawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn failing_tool_keeps_stderr() {
        let res = run_tool(Path::new("sh"), ["-c", "echo broken pipe >&2; exit 3"]);
        match res {
            Err(Error::ToolFailed { status, stderr, .. }) => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr.trim(), "broken pipe");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}

use std::{
    collections::HashSet,
    ffi::OsStr,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use clap::Args;
use regex::Regex;

use crate::{
    error::{Error, Result},
    utils, BResult,
};

pub const RENAME_FORMATS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "bmp", "tiff", "webp"];

#[derive(Args, Debug, Clone)]
pub struct Opt {
    /// folder with images to rename
    #[arg(default_value = "pictures", display_order = 0)]
    folder: PathBuf,
    /// width of the zero-padded sequence number
    #[arg(short, long, default_value = "6")]
    digits: usize,
    /// only print the renames
    #[arg(short = 'n', long)]
    dry_run: bool,
}

/// Errors are reported here and never leave the subcommand.
pub fn main(opt: Opt) -> BResult<()> {
    match rename_folder(&opt.folder, opt.digits, opt.dry_run) {
        Ok(renamed) => log::info!("{} files renamed", renamed.len()),
        Err(Error::FolderNotFound(folder)) => {
            log::error!("The folder '{}' does not exist.", folder.display())
        }
        Err(e) => log::error!("An error occurred: {}", e),
    }
    Ok(())
}

fn sequence_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.*_fn)([0-9]+)(\..+)$").expect("valid sequence regex"))
}

/// `proj_fn42.png` -> `proj_fn000042.png` for `digits == 6`.
///
/// Same result as formatting the number as an integer: surplus leading zeros
/// go away, longer numbers are kept whole. `None` if there is no `_fn<digits>.<ext>`.
pub fn pad_sequence(file_name: &str, digits: usize) -> Option<String> {
    let caps = sequence_pattern().captures(file_name)?;
    let number = caps[2].trim_start_matches('0');
    let number = if number.is_empty() { "0" } else { number };
    Some(format!(
        "{}{:0>width$}{}",
        &caps[1],
        number,
        &caps[3],
        width = digits
    ))
}

/// Zero-pad the `_fn<digits>` sequence of every image in `folder`.
///
/// Returns the (old, new) path pairs. The first failure stops the pass; a
/// target name that already exists is a failure rather than an overwrite.
pub fn rename_folder(folder: &Path, digits: usize, dry_run: bool) -> Result<Vec<(PathBuf, PathBuf)>> {
    if !folder.is_dir() {
        return Err(Error::FolderNotFound(folder.to_owned()));
    }
    let mut renamed = Vec::new();
    let mut targets: HashSet<PathBuf> = HashSet::new();
    for path in utils::read_dir_paths(folder)? {
        if !path.is_file() || !utils::has_extension(&path, &RENAME_FORMATS) {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(OsStr::to_str) else {
            continue;
        };
        let Some(new_name) = pad_sequence(file_name, digits) else {
            continue;
        };
        if new_name == file_name {
            continue;
        }

        let new_path = folder.join(&new_name);
        // targets planned earlier in this pass count as taken
        if new_path.exists() || !targets.insert(new_path.clone()) {
            return Err(Error::RenameTargetExists(new_path));
        }
        if !dry_run {
            std::fs::rename(&path, &new_path)?;
        }
        log::info!("Renamed: {} -> {}", file_name, new_name);
        renamed.push((path, new_path));
    }
    Ok(renamed)
}

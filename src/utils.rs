use std::{
    io,
    path::{Path, PathBuf},
};

pub fn mkdir(dir: &Path) -> io::Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| {
            io::Error::new(e.kind(), format!("Error creating dir {}: {}", dir.display(), e))
        })?;
    }
    Ok(())
}

/// Entries of `dir` in directory-listing order.
pub fn read_dir_paths(dir: &Path) -> io::Result<Vec<PathBuf>> {
    dir.read_dir()?
        .map(|r| r.map(|d| d.path()))
        .collect::<Result<Vec<PathBuf>, _>>()
}

/// Case-insensitive extension check against an allow-list (`"png"`, not `".png"`).
pub fn has_extension<S: AsRef<str>>(path: &Path, formats: &[S]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| formats.iter().any(|f| f.as_ref().eq_ignore_ascii_case(ext)))
}

pub fn filter_images<S: AsRef<str>>(input: &mut Vec<PathBuf>, formats: &[S]) {
    input.retain(|i| i.is_file() && has_extension(i, formats));
}

/// Image files of `dir` in listing order (optionally sorted).
pub fn list_images<S: AsRef<str>>(dir: &Path, formats: &[S], sort: bool) -> io::Result<Vec<PathBuf>> {
    let mut images = read_dir_paths(dir)?;
    filter_images(&mut images, formats);
    if sort {
        images.sort_unstable();
    }
    Ok(images)
}

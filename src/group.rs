use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

/// Images sharing one developer tag, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeveloperGroup {
    pub tag: String,
    pub images: Vec<PathBuf>,
}

/// First `_`-separated segment of the file name, if it starts with `prefix`.
///
/// `Dev3_0001.png` -> `Dev3`. The prefix match is case-sensitive.
pub fn developer_tag<'a>(path: &'a Path, prefix: &str) -> Option<&'a str> {
    let filename = path.file_name()?.to_str()?;
    let tag = filename.split('_').next()?;
    tag.starts_with(prefix).then_some(tag)
}

/// Bucket `images` by developer tag.
///
/// Groups come back in the order their tag was first seen, each keeping at most
/// `limit` images (the earliest ones). Files without a tag are logged and skipped.
pub fn group_by_developer(
    images: &[PathBuf],
    prefix: &str,
    limit: Option<usize>,
) -> Vec<DeveloperGroup> {
    let mut groups: Vec<DeveloperGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for img in images {
        let Some(tag) = developer_tag(img, prefix) else {
            log::warn!("Skipping invalid file: {}", img.display());
            continue;
        };
        let i = *index.entry(tag.to_string()).or_insert_with(|| {
            groups.push(DeveloperGroup {
                tag: tag.to_string(),
                images: Vec::new(),
            });
            groups.len() - 1
        });
        groups[i].images.push(img.to_owned());
    }

    if let Some(limit) = limit {
        for group in groups.iter_mut() {
            group.images.truncate(limit);
        }
    }
    groups
}

//! `slug` and `slugPath` derived from a document's location.

use std::path::{Component, Path};

/// File name without its extension: `/site/src/content/blog/hello.md` -> `hello`.
pub fn slug(file: &Path) -> String {
    file.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Path below the content root without the extension, with a leading `/`.
///
/// `/site/src/content/blog/hello.md` under `/site/src/content/` gives
/// `/blog/hello`. Files outside the content root fall back to `/<slug>`.
pub fn slug_path(file: &Path, content_root: &Path) -> String {
    let Ok(relative) = file.strip_prefix(content_root) else {
        log::warn!(
            "{} is outside of the content directory {}; using its file name as slugPath",
            file.display(),
            content_root.display()
        );
        return format!("/{}", slug(file));
    };

    let mut segments: Vec<String> = relative
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    segments.push(slug(file));
    format!("/{}", segments.join("/"))
}

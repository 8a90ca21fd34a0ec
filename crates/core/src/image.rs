//! Image reference resolution for image-suffixed keys.

use std::path::{Component, Path, PathBuf};

/// Resolves an image reference found in a document's frontmatter.
///
/// Returns a site-relative path, or `None` when the reference cannot be
/// resolved; the engine then keeps the original suffixed key.
pub trait ImageResolver: Send + Sync {
    /// Resolve `reference` written in `source_file`, against `image_root`.
    fn resolve(&self, reference: &str, source_file: &Path, image_root: &Path) -> Option<String>;
}

impl<F> ImageResolver for F
where
    F: Fn(&str, &Path, &Path) -> Option<String> + Send + Sync,
{
    fn resolve(&self, reference: &str, source_file: &Path, image_root: &Path) -> Option<String> {
        (self)(reference, source_file, image_root)
    }
}

/// Maps references onto files under the static image directory.
///
/// `/uploads/a.jpg` and bare `uploads/a.jpg` are read relative to the image
/// root. Only explicit `./` or `../` references follow the document's
/// directory. The result is the path below the image root with a leading `/`,
/// which is where the static directory is served from.
#[derive(Debug, Clone, Copy)]
pub struct StaticImageResolver {
    require_existing: bool,
}

impl StaticImageResolver {
    /// Resolver that only accepts files present on disk.
    pub fn new() -> Self {
        Self {
            require_existing: true,
        }
    }

    /// Resolver that trusts references without touching the filesystem.
    pub fn lexical() -> Self {
        Self {
            require_existing: false,
        }
    }
}

impl Default for StaticImageResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageResolver for StaticImageResolver {
    fn resolve(&self, reference: &str, source_file: &Path, image_root: &Path) -> Option<String> {
        if is_remote(reference) {
            log::debug!("Not resolving remote image reference {:?}", reference);
            return None;
        }

        let candidate = if is_document_relative(reference) {
            source_file
                .parent()
                .map(|dir| dir.join(reference))
                .unwrap_or_else(|| PathBuf::from(reference))
        } else {
            image_root.join(reference.trim_start_matches('/'))
        };
        let candidate = normalize(&candidate);
        let root = normalize(image_root);

        let Ok(relative) = candidate.strip_prefix(&root) else {
            log::debug!(
                "Image {:?} resolves outside of {}",
                reference,
                root.display()
            );
            return None;
        };

        if self.require_existing && !candidate.is_file() {
            log::debug!("Image {} does not exist", candidate.display());
            return None;
        }

        let segments: Vec<_> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect();
        if segments.is_empty() {
            return None;
        }
        Some(format!("/{}", segments.join("/")))
    }
}

fn is_document_relative(reference: &str) -> bool {
    reference.starts_with("./") || reference.starts_with("../")
}

fn is_remote(reference: &str) -> bool {
    reference.starts_with("//") || reference.contains("://")
}

/// Collapses `.` and `..` without consulting the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexical(reference: &str) -> Option<String> {
        StaticImageResolver::lexical().resolve(
            reference,
            Path::new("/site/static/posts/hello.md"),
            Path::new("/site/static"),
        )
    }

    #[test]
    fn rooted_reference_is_relative_to_image_root() {
        assert_eq!(
            lexical("/uploads/photo.jpg").as_deref(),
            Some("/uploads/photo.jpg")
        );
    }

    #[test]
    fn bare_reference_is_relative_to_image_root() {
        assert_eq!(lexical("photo.jpg").as_deref(), Some("/photo.jpg"));
        assert_eq!(
            lexical("uploads/./photo.jpg").as_deref(),
            Some("/uploads/photo.jpg")
        );
        let from_content = StaticImageResolver::lexical().resolve(
            "photo.jpg",
            Path::new("/site/src/content/post.md"),
            Path::new("/site/static"),
        );
        assert_eq!(from_content.as_deref(), Some("/photo.jpg"));
    }

    #[test]
    fn dotted_reference_follows_document_directory() {
        assert_eq!(lexical("./photo.jpg").as_deref(), Some("/posts/photo.jpg"));
        assert_eq!(
            lexical("../shared/./photo.jpg").as_deref(),
            Some("/shared/photo.jpg")
        );
    }

    #[test]
    fn escaping_the_root_is_a_miss() {
        assert_eq!(lexical("../../etc/photo.jpg"), None);
        assert_eq!(lexical("/../photo.jpg"), None);
        assert_eq!(lexical("../../photo.jpg"), None);
    }

    #[test]
    fn remote_references_are_a_miss() {
        assert_eq!(lexical("https://cdn.example.com/a.jpg"), None);
        assert_eq!(lexical("//cdn.example.com/a.jpg"), None);
    }

    #[test]
    fn missing_file_is_a_miss_when_existence_is_required() {
        let resolved = StaticImageResolver::new().resolve(
            "/definitely/not/here.jpg",
            Path::new("/site/content/a.md"),
            Path::new("/site/static"),
        );
        assert_eq!(resolved, None);
    }

    #[test]
    fn normalize_collapses_dots() {
        assert_eq!(
            normalize(Path::new("/a/./b/../c")),
            PathBuf::from("/a/c")
        );
    }
}

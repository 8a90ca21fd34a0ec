//! Document-level pipeline: extract, seed, transform.

use crate::classify::is_empty_value;
use crate::error::{MatterformError, Result, TransformDiagnostics};
use crate::frontmatter::extract_frontmatter;
use crate::options::TransformOptions;
use crate::permalink::{slug, slug_path};
use crate::transform::{Frontmatter, FrontmatterTransformer, TransformContext};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::path::Path;

/// Key the file-name slug is seeded under.
pub const SLUG_FIELD: &str = "slug";
/// Key the content-relative path is seeded under.
pub const SLUG_PATH_FIELD: &str = "slugPath";

/// A markdown document after its frontmatter went through the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedDocument {
    /// Value of the configured model field, when it is a string.
    pub model: Option<String>,
    /// Transformed frontmatter, exposed to the host as `frontmatter`.
    pub frontmatter: Frontmatter,
    /// Transformed SEO payload, to become its own node.
    pub seo: Option<Frontmatter>,
    /// Byte offset where the markdown body begins.
    pub body_start: usize,
    /// Transform misses.
    #[serde(skip)]
    pub diagnostics: TransformDiagnostics,
}

/// Seeds `slug` and `slugPath` ahead of the raw frontmatter.
///
/// Empty top-level values are left out. Raw keys named `slug` or `slugPath`
/// replace the seeded values but keep their leading position.
pub fn seed_frontmatter(raw: Frontmatter, file: &Path, options: &TransformOptions) -> Frontmatter {
    let mut seeded = Frontmatter::new();
    seeded.insert(SLUG_FIELD.to_string(), JsonValue::String(slug(file)));
    seeded.insert(
        SLUG_PATH_FIELD.to_string(),
        JsonValue::String(slug_path(file, &options.content_root())),
    );
    for (key, value) in raw {
        if !is_empty_value(&value) {
            seeded.insert(key, value);
        }
    }
    seeded
}

/// Model named by the configured model field.
pub fn model_of(frontmatter: &Frontmatter, options: &TransformOptions) -> Option<String> {
    let model = frontmatter.get(&options.model_field)?.as_str()?.to_string();
    if !options.accepts_model(&model) {
        log::warn!(
            "Model {:?} is not one of the configured models {:?}",
            model,
            options.models
        );
    }
    Some(model)
}

/// Runs the full pipeline over a markdown source.
pub fn process_document(
    source: &str,
    file: &Path,
    options: &TransformOptions,
    transformer: &FrontmatterTransformer,
) -> Result<ProcessedDocument> {
    let extraction = extract_frontmatter(source)
        .map_err(|err| MatterformError::frontmatter(file.display().to_string(), err))?;
    Ok(process_frontmatter(
        extraction.data,
        extraction.body_start,
        file,
        options,
        transformer,
    ))
}

/// Runs seeding and transformation over already-extracted frontmatter.
pub fn process_frontmatter(
    raw: Frontmatter,
    body_start: usize,
    file: &Path,
    options: &TransformOptions,
    transformer: &FrontmatterTransformer,
) -> ProcessedDocument {
    let seeded = seed_frontmatter(raw, file, options);
    let model = model_of(&seeded, options);
    let ctx = TransformContext::new(file, options);
    let result = transformer.transform(&seeded, &ctx);

    if result.diagnostics.has_misses() {
        log::debug!(
            "{}: {} frontmatter value(s) kept untransformed",
            file.display(),
            result.diagnostics.count()
        );
    }

    ProcessedDocument {
        model,
        frontmatter: result.tree,
        seo: result.seo,
        body_start,
        diagnostics: result.diagnostics,
    }
}

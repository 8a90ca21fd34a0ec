#![deny(missing_docs)]
//! Matterform core: frontmatter classification, transformation, and extraction.

/// Key classification rules.
pub mod classify;
/// Document-level pipeline (extraction, slug seeding, transformation).
pub mod document;
/// Core error and diagnostic types.
pub mod error;
/// YAML frontmatter extraction helpers.
pub mod frontmatter;
/// Image reference resolution.
pub mod image;
/// Key paths into frontmatter trees.
pub mod key_path;
/// Host options and their resolved form.
pub mod options;
/// Slug and slug path helpers.
pub mod permalink;
/// Markdown rendering.
pub mod render;
/// The transformation engine.
pub mod transform;

pub use classify::{Classification, classify};
pub use document::{ProcessedDocument, process_document, process_frontmatter, seed_frontmatter};
pub use error::{MatterformError, MissKind, Result, TransformDiagnostics, TransformMiss};
pub use frontmatter::{FrontmatterError, FrontmatterExtraction, extract_frontmatter};
pub use image::{ImageResolver, StaticImageResolver};
pub use key_path::{KeyPath, PathSegment};
pub use options::{PluginOptions, TransformOptions};
pub use permalink::{slug, slug_path};
pub use render::{HtmlRenderer, MarkdownRenderer, RenderOptions};
pub use transform::{
    Frontmatter, FrontmatterTransformer, TransformContext, TransformResult, transform,
};

//! NAPI-exposed data structures.

use napi_derive::napi;
use serde_json::Value as JsonValue;

/// Options passed alongside every call.
#[napi(object)]
#[derive(Debug, Clone, Default)]
pub struct ProcessorConfig {
    /// Plugin options (`contentSrc`, `markdownSuffix`, `seoField`, ...). Defaults apply to
    /// anything left out.
    pub options: Option<JsonValue>,
    /// Enables GFM extensions when rendering markdown. Defaults to true.
    pub gfm: Option<bool>,
    /// Passes raw HTML inside markdown values through unescaped. Defaults to false.
    pub allow_raw_html: Option<bool>,
    /// Enables `$math$` constructs. Defaults to false.
    pub math: Option<bool>,
    /// Only resolve images that exist under the image directory. Defaults to true.
    pub require_existing_images: Option<bool>,
}

/// A frontmatter value that was kept because its transform produced nothing.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct TransformMissEntry {
    /// Dotted key path of the kept key.
    pub path: String,
    /// Transform that missed: `markdown` or `image`.
    pub kind: String,
    /// The untransformed value.
    pub value: String,
}

/// Result of `transformFrontmatter()`.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// Transformed frontmatter tree.
    pub frontmatter: JsonValue,
    /// Transformed SEO payload, when the input carried one.
    pub seo: Option<JsonValue>,
    /// Values kept untransformed.
    pub misses: Vec<TransformMissEntry>,
}

/// Result of `processDocument()`.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct DocumentOutput {
    /// Value of the configured model field.
    pub model: Option<String>,
    /// Transformed frontmatter including `slug` and `slugPath`.
    pub frontmatter: JsonValue,
    /// Transformed SEO payload, to become its own node.
    pub seo: Option<JsonValue>,
    /// Byte offset where the markdown body begins.
    pub body_start: u32,
    /// Values kept untransformed.
    pub misses: Vec<TransformMissEntry>,
}

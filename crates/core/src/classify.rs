//! Key classification: decides how the engine treats each visited value.

use crate::key_path::{KeyPath, PathSegment};
use crate::options::TransformOptions;
use serde_json::Value as JsonValue;

/// How the engine handles a value at a given key path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Copied through; containers are recursed into.
    Default,
    /// Rendered to HTML under the suffix-stripped key.
    Markdown,
    /// Resolved to a site path under the suffix-stripped key.
    Image,
    /// Diverted into the SEO payload.
    Seo,
    /// Dropped from the output.
    Ignored,
}

/// Classifies `value` at `path`.
///
/// Only the last path segment is inspected. `seo_allowed` is false while the
/// engine re-processes an SEO payload, which caps diversion to one level.
pub fn classify(
    path: &KeyPath,
    value: &JsonValue,
    options: &TransformOptions,
    seo_allowed: bool,
) -> Classification {
    let key = path.last().and_then(PathSegment::as_key);

    if let Some(key) = key {
        if seo_allowed
            && path.depth() == 1
            && key == options.seo_field
            && value.as_object().is_some_and(|map| !map.is_empty())
        {
            return Classification::Seo;
        }

        if let Some(text) = non_empty_str(value) {
            if strip_suffix(key, &options.markdown_suffix).is_some() {
                return Classification::Markdown;
            }
            if strip_suffix(key, &options.image_suffix).is_some() && options.is_image_path(text)
            {
                return Classification::Image;
            }
        }
    }

    if is_empty_value(value) {
        Classification::Ignored
    } else {
        Classification::Default
    }
}

/// Strips `suffix` from `key`, refusing to leave an empty name behind.
pub fn strip_suffix<'a>(key: &'a str, suffix: &str) -> Option<&'a str> {
    key.strip_suffix(suffix).filter(|stem| !stem.is_empty())
}

/// `null`, `""`, `{}` and `[]` carry no content.
pub fn is_empty_value(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::String(s) => s.is_empty(),
        JsonValue::Array(items) => items.is_empty(),
        JsonValue::Object(map) => map.is_empty(),
        JsonValue::Bool(_) | JsonValue::Number(_) => false,
    }
}

fn non_empty_str(value: &JsonValue) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

//! Host options and their validated, resolved form.
//!
//! Hosts pass a loosely shaped options object (camelCase, every field
//! optional). [`TransformOptions::resolve`] applies the defaults once and
//! rejects values the engine cannot work with, so the engine itself never
//! re-checks configuration.

use crate::error::{MatterformError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

/// Default directory (relative to the project root) holding content files.
pub const DEFAULT_CONTENT_SRC: &str = "src/content/";
/// Default directory (relative to the project root) holding static images.
pub const DEFAULT_IMAGE_SRC: &str = "static";
/// Default suffix marking markdown-valued keys.
pub const DEFAULT_MARKDOWN_SUFFIX: &str = "_md";
/// Default suffix marking image-valued keys.
pub const DEFAULT_IMAGE_SUFFIX: &str = "_src";
/// Default name of the top-level SEO key.
pub const DEFAULT_SEO_FIELD: &str = "seo";
/// Default name of the key carrying the node model.
pub const DEFAULT_MODEL_FIELD: &str = "model";
/// Default image extensions recognised on image-suffixed keys.
pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];

/// Options as supplied by the host, before defaults are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginOptions {
    /// Content directory, relative to the project root.
    #[serde(default)]
    pub content_src: Option<String>,
    /// Extensions accepted on image-suffixed keys.
    #[serde(default)]
    pub image_extensions: Option<Vec<String>>,
    /// Suffix marking image-valued keys.
    #[serde(default)]
    pub image_suffix: Option<String>,
    /// Directory images are resolved against.
    #[serde(default)]
    pub image_src: Option<String>,
    /// Suffix marking markdown-valued keys.
    #[serde(default)]
    pub markdown_suffix: Option<String>,
    /// Key carrying the node model.
    #[serde(default)]
    pub model_field: Option<String>,
    /// Known models; empty accepts any.
    #[serde(default)]
    pub models: Option<Vec<String>>,
    /// Root that relative directories are joined onto.
    #[serde(default)]
    pub project_root: Option<String>,
    /// Name of the top-level SEO key.
    #[serde(default)]
    pub seo_field: Option<String>,
}

impl PluginOptions {
    /// Reads options from a host JSON value; `null` means "all defaults".
    pub fn from_json(value: &JsonValue) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value.clone())
            .map_err(|err| MatterformError::OptionsFormat(err.to_string()))
    }
}

/// Fully resolved configuration threaded through every transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOptions {
    /// Content directory, always ending in `/`.
    pub content_src: String,
    /// Lower-case extensions with a leading dot.
    pub image_extensions: Vec<String>,
    /// Suffix marking image-valued keys.
    pub image_suffix: String,
    /// Directory images are resolved against.
    pub image_src: PathBuf,
    /// Suffix marking markdown-valued keys.
    pub markdown_suffix: String,
    /// Key carrying the node model.
    pub model_field: String,
    /// Known models; empty accepts any.
    pub models: Vec<String>,
    /// Root that relative directories are joined onto.
    pub project_root: PathBuf,
    /// Name of the top-level SEO key.
    pub seo_field: String,
}

impl TransformOptions {
    /// Applies defaults to host options and validates the result.
    pub fn resolve(raw: PluginOptions) -> Result<Self> {
        let project_root = match raw.project_root {
            Some(root) => PathBuf::from(root),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };
        let image_src = match raw.image_src {
            Some(dir) => PathBuf::from(dir),
            None => project_root.join(DEFAULT_IMAGE_SRC),
        };

        let options = Self {
            content_src: with_trailing_slash(
                raw.content_src
                    .unwrap_or_else(|| DEFAULT_CONTENT_SRC.to_string()),
            ),
            image_extensions: raw
                .image_extensions
                .unwrap_or_else(|| {
                    DEFAULT_IMAGE_EXTENSIONS
                        .iter()
                        .map(|ext| ext.to_string())
                        .collect()
                })
                .iter()
                .map(|ext| normalize_extension(ext))
                .collect(),
            image_suffix: raw
                .image_suffix
                .unwrap_or_else(|| DEFAULT_IMAGE_SUFFIX.to_string()),
            image_src,
            markdown_suffix: raw
                .markdown_suffix
                .unwrap_or_else(|| DEFAULT_MARKDOWN_SUFFIX.to_string()),
            model_field: raw
                .model_field
                .unwrap_or_else(|| DEFAULT_MODEL_FIELD.to_string()),
            models: raw.models.unwrap_or_default(),
            project_root,
            seo_field: raw
                .seo_field
                .unwrap_or_else(|| DEFAULT_SEO_FIELD.to_string()),
        };
        options.validate()?;
        Ok(options)
    }

    /// Resolves host options given as JSON.
    pub fn from_json(value: &JsonValue) -> Result<Self> {
        Self::resolve(PluginOptions::from_json(value)?)
    }

    /// Defaults rooted at an explicit project directory.
    pub fn with_project_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            content_src: DEFAULT_CONTENT_SRC.to_string(),
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            image_suffix: DEFAULT_IMAGE_SUFFIX.to_string(),
            image_src: root.join(DEFAULT_IMAGE_SRC),
            markdown_suffix: DEFAULT_MARKDOWN_SUFFIX.to_string(),
            model_field: DEFAULT_MODEL_FIELD.to_string(),
            models: Vec::new(),
            project_root: root.to_path_buf(),
            seo_field: DEFAULT_SEO_FIELD.to_string(),
        }
    }

    /// Absolute content directory.
    pub fn content_root(&self) -> PathBuf {
        self.project_root.join(&self.content_src)
    }

    /// Absolute image directory.
    pub fn image_root(&self) -> PathBuf {
        self.project_root.join(&self.image_src)
    }

    /// Whether `path` carries one of the configured image extensions.
    pub fn is_image_path(&self, path: &str) -> bool {
        Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let dotted = normalize_extension(ext);
                self.image_extensions.iter().any(|known| *known == dotted)
            })
            .unwrap_or(false)
    }

    /// Whether a model name is accepted (any name when `models` is empty).
    pub fn accepts_model(&self, model: &str) -> bool {
        self.models.is_empty() || self.models.iter().any(|m| m == model)
    }

    fn validate(&self) -> Result<()> {
        let required = [
            ("markdownSuffix", &self.markdown_suffix),
            ("imageSuffix", &self.image_suffix),
            ("seoField", &self.seo_field),
            ("modelField", &self.model_field),
        ];
        for (name, value) in required {
            if value.is_empty() {
                return Err(MatterformError::invalid_option(name, "must not be empty"));
            }
        }
        if self.markdown_suffix == self.image_suffix {
            return Err(MatterformError::invalid_option(
                "imageSuffix",
                format!(
                    "must differ from markdownSuffix (both are {:?})",
                    self.markdown_suffix
                ),
            ));
        }
        if self.image_extensions.iter().any(|ext| ext == ".") {
            return Err(MatterformError::invalid_option(
                "imageExtensions",
                "extensions must not be empty",
            ));
        }
        Ok(())
    }
}

fn with_trailing_slash(mut dir: String) -> String {
    if !dir.ends_with('/') {
        dir.push('/');
    }
    dir
}

fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim().trim_start_matches('.');
    format!(".{}", trimmed.to_ascii_lowercase())
}

//! Conversions between core types and their NAPI counterparts.

use crate::types::{DocumentOutput, ProcessorConfig, TransformMissEntry, TransformOutput};
use matterform_core::{
    Frontmatter, FrontmatterTransformer, HtmlRenderer, MatterformError, ProcessedDocument,
    RenderOptions, StaticImageResolver, TransformDiagnostics, TransformOptions, TransformResult,
};
use napi::bindgen_prelude::*;
use serde_json::Value as JsonValue;

/// Resolved options plus the engine configured for them.
pub(crate) struct Processor {
    pub options: TransformOptions,
    pub transformer: FrontmatterTransformer,
}

impl Processor {
    pub fn from_config(config: Option<ProcessorConfig>) -> Result<Self> {
        let config = config.unwrap_or_default();
        let options = match &config.options {
            Some(raw) => TransformOptions::from_json(raw),
            None => TransformOptions::from_json(&JsonValue::Null),
        }
        .map_err(convert_error)?;

        let renderer = HtmlRenderer::new(RenderOptions {
            gfm: config.gfm.unwrap_or(true),
            raw_html: config.allow_raw_html.unwrap_or(false),
            math: config.math.unwrap_or(false),
        });
        let images = if config.require_existing_images.unwrap_or(true) {
            StaticImageResolver::new()
        } else {
            StaticImageResolver::lexical()
        };

        Ok(Self {
            options,
            transformer: FrontmatterTransformer::new(renderer, images),
        })
    }
}

/// Reads a JS object into a frontmatter mapping; `null` is an empty mapping.
pub(crate) fn to_frontmatter(value: JsonValue) -> Result<Frontmatter> {
    match value {
        JsonValue::Object(map) => Ok(map),
        JsonValue::Null => Ok(Frontmatter::new()),
        other => Err(Error::new(
            Status::InvalidArg,
            format!("Frontmatter must be an object, got {}", type_name(&other)),
        )),
    }
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn convert_misses(diagnostics: TransformDiagnostics) -> Vec<TransformMissEntry> {
    diagnostics
        .misses
        .into_iter()
        .map(|miss| TransformMissEntry {
            path: miss.path,
            kind: miss.kind.to_string(),
            value: miss.value,
        })
        .collect()
}

pub(crate) fn convert_transform_result(result: TransformResult) -> TransformOutput {
    TransformOutput {
        frontmatter: JsonValue::Object(result.tree),
        seo: result.seo.map(JsonValue::Object),
        misses: convert_misses(result.diagnostics),
    }
}

pub(crate) fn convert_document(doc: ProcessedDocument) -> DocumentOutput {
    DocumentOutput {
        model: doc.model,
        frontmatter: JsonValue::Object(doc.frontmatter),
        seo: doc.seo.map(JsonValue::Object),
        body_start: doc.body_start as u32,
        misses: convert_misses(doc.diagnostics),
    }
}

/// Maps core errors onto NAPI statuses.
pub(crate) fn convert_error(err: MatterformError) -> Error {
    match err {
        MatterformError::Frontmatter { file, source } => Error::new(
            Status::InvalidArg,
            format!("Frontmatter error in {}: {}", file, source),
        ),
        MatterformError::InvalidOption { option, reason } => Error::new(
            Status::InvalidArg,
            format!("Invalid option `{}`: {}", option, reason),
        ),
        MatterformError::OptionsFormat(msg) => Error::new(
            Status::InvalidArg,
            format!("Options could not be read: {}", msg),
        ),
    }
}

#![deny(missing_docs)]
//! Node.js bindings that surface matterform's frontmatter pipeline.

use napi::bindgen_prelude::*;
use napi_derive::napi;
use serde_json::Value as JsonValue;
use std::path::Path;

/// Batch processing types.
pub mod batch;
/// Conversions between core and NAPI types.
mod convert;
/// NAPI-exposed data structures.
pub mod types;

pub use batch::*;
pub use types::*;

use convert::{
    Processor, convert_document, convert_error, convert_transform_result, to_frontmatter,
};
use matterform_core::{TransformContext, process_document as run_document};

/// Resolves plugin options, applying defaults, and returns them as JSON.
///
/// # Example (JavaScript)
///
/// ```javascript
/// const { resolveOptions } = require('matterform-napi');
///
/// resolveOptions({ contentSrc: './content' }).contentSrc; // './content/'
/// ```
#[napi(js_name = "resolveOptions")]
pub fn resolve_options(options: Option<JsonValue>) -> napi::Result<JsonValue> {
    let processor = Processor::from_config(Some(ProcessorConfig {
        options,
        ..Default::default()
    }))?;
    serde_json::to_value(&processor.options)
        .map_err(|e| Error::from_reason(format!("Failed to serialize options: {}", e)))
}

/// Transforms an already-extracted frontmatter object.
///
/// Markdown-suffixed keys are rendered to HTML, image-suffixed keys resolved
/// to site paths, empty values dropped, and the SEO key split off into `seo`.
///
/// # Example (JavaScript)
///
/// ```javascript
/// const { transformFrontmatter } = require('matterform-napi');
///
/// const { frontmatter, seo } = transformFrontmatter(
///   { title: 'T', body_md: '# Hi', seo: { description_md: 'hi' } },
///   '/site/src/content/post.md',
/// );
/// // frontmatter = { title: 'T', body: '<h1>Hi</h1>' }
/// // seo = { description: '<p>hi</p>' }
/// ```
#[napi(js_name = "transformFrontmatter")]
pub fn transform_frontmatter(
    frontmatter: JsonValue,
    file_path: String,
    config: Option<ProcessorConfig>,
) -> napi::Result<TransformOutput> {
    let processor = Processor::from_config(config)?;
    let tree = to_frontmatter(frontmatter)?;
    let ctx = TransformContext::new(Path::new(&file_path), &processor.options);
    let result = processor.transformer.transform(&tree, &ctx);
    Ok(convert_transform_result(result))
}

/// Extracts, seeds (`slug`, `slugPath`) and transforms a markdown document's frontmatter.
#[napi(js_name = "processDocument")]
pub fn process_document(
    source: String,
    file_path: String,
    config: Option<ProcessorConfig>,
) -> napi::Result<DocumentOutput> {
    let processor = Processor::from_config(config)?;
    process_with(&processor, &source, &file_path)
}

fn process_with(
    processor: &Processor,
    source: &str,
    file_path: &str,
) -> napi::Result<DocumentOutput> {
    run_document(
        source,
        Path::new(file_path),
        &processor.options,
        &processor.transformer,
    )
    .map(convert_document)
    .map_err(convert_error)
}

/// Processes multiple documents in parallel using Rayon.
///
/// # Example (JavaScript)
///
/// ```javascript
/// const { processBatch } = require('matterform-napi');
///
/// const result = processBatch(
///   [{ id: '/site/src/content/a.md', source: '---\ntitle: A\n---\n' }],
///   { continueOnError: true },
/// );
/// console.log(`Processed ${result.stats.total} files in ${result.stats.processingTimeMs}ms`);
/// ```
#[napi(js_name = "processBatch")]
pub fn process_batch(
    inputs: Vec<BatchInput>,
    options: Option<BatchOptions>,
) -> napi::Result<BatchProcessingResult> {
    use rayon::prelude::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Instant;

    let start = Instant::now();
    let opts = options.unwrap_or_default();
    let continue_on_error = opts.continue_on_error.unwrap_or(true);
    let processor = Processor::from_config(opts.config)?;

    // Configure thread pool if max_threads is specified
    let pool = match opts.max_threads {
        Some(max_threads) => match rayon::ThreadPoolBuilder::new()
            .num_threads(max_threads as usize)
            .build()
        {
            Ok(pool) => Some(pool),
            Err(e) => {
                log::warn!("Falling back to the global thread pool: {}", e);
                None
            }
        },
        None => None,
    };

    let total = inputs.len() as u32;
    let succeeded = AtomicU32::new(0);
    let failed = AtomicU32::new(0);

    let process_input = |input: BatchInput| -> BatchResult {
        let file_path = input.file_path.clone().unwrap_or_else(|| input.id.clone());
        match process_with(&processor, &input.source, &file_path) {
            Ok(result) => {
                succeeded.fetch_add(1, Ordering::Relaxed);
                BatchResult {
                    id: input.id,
                    result: Some(result),
                    error: None,
                }
            }
            Err(e) => {
                failed.fetch_add(1, Ordering::Relaxed);
                BatchResult {
                    id: input.id,
                    result: None,
                    error: Some(e.reason.clone()),
                }
            }
        }
    };

    let results: Vec<BatchResult> = if continue_on_error {
        match pool {
            Some(pool) => pool.install(|| inputs.into_par_iter().map(process_input).collect()),
            None => inputs.into_par_iter().map(process_input).collect(),
        }
    } else {
        // Stop on first error, in input order
        let mut results = Vec::with_capacity(inputs.len());
        for input in inputs {
            let result = process_input(input);
            let had_error = result.error.is_some();
            results.push(result);
            if had_error {
                break;
            }
        }
        results
    };

    let elapsed = start.elapsed();

    Ok(BatchProcessingResult {
        results,
        stats: BatchStats {
            total,
            succeeded: succeeded.load(Ordering::Relaxed),
            failed: failed.load(Ordering::Relaxed),
            processing_time_ms: elapsed.as_secs_f64() * 1000.0,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> Option<ProcessorConfig> {
        Some(ProcessorConfig {
            options: Some(json!({ "projectRoot": "/site" })),
            require_existing_images: Some(false),
            ..Default::default()
        })
    }

    #[test]
    fn resolves_default_options() {
        let resolved = resolve_options(Some(json!({ "contentSrc": "./content" }))).unwrap();
        assert_eq!(resolved["contentSrc"], "./content/");
        assert_eq!(resolved["markdownSuffix"], "_md");
        assert_eq!(resolved["seoField"], "seo");
    }

    #[test]
    fn rejects_invalid_options() {
        let err = resolve_options(Some(json!({ "imageSuffix": "" }))).unwrap_err();
        assert_eq!(err.status, Status::InvalidArg);
        assert!(err.reason.contains("imageSuffix"), "{}", err.reason);
    }

    #[test]
    fn transforms_frontmatter_object() {
        let output = transform_frontmatter(
            json!({
                "title": "T",
                "body_md": "# Hi",
                "hero_src": "/uploads/a.jpg",
                "seo": { "description_md": "hi" }
            }),
            "/site/src/content/post.md".into(),
            config(),
        )
        .unwrap();
        assert_eq!(
            output.frontmatter,
            json!({ "title": "T", "body": "<h1>Hi</h1>", "hero": "/uploads/a.jpg" })
        );
        assert_eq!(output.seo, Some(json!({ "description": "<p>hi</p>" })));
        assert!(output.misses.is_empty());
    }

    #[test]
    fn rejects_non_object_frontmatter() {
        let err = transform_frontmatter(json!([1, 2]), "/site/a.md".into(), config()).unwrap_err();
        assert_eq!(err.status, Status::InvalidArg);
    }

    #[test]
    fn reports_misses() {
        let output = transform_frontmatter(
            json!({ "hero_src": "https://cdn.example.com/a.jpg" }),
            "/site/src/content/post.md".into(),
            config(),
        )
        .unwrap();
        assert_eq!(
            output.frontmatter,
            json!({ "hero_src": "https://cdn.example.com/a.jpg" })
        );
        assert_eq!(output.misses.len(), 1);
        assert_eq!(output.misses[0].kind, "image");
        assert_eq!(output.misses[0].path, "hero_src");
    }

    #[test]
    fn processes_document_source() {
        let output = process_document(
            "---\nmodel: Page\ntitle: About\n---\nBody".into(),
            "/site/src/content/pages/about.md".into(),
            config(),
        )
        .unwrap();
        assert_eq!(output.model.as_deref(), Some("Page"));
        assert_eq!(
            output.frontmatter,
            json!({ "slug": "about", "slugPath": "/pages/about", "model": "Page", "title": "About" })
        );
        assert_eq!(output.body_start, 33);
        assert!(output.seo.is_none());
    }

    #[test]
    fn batch_collects_successes_and_failures() {
        let inputs = vec![
            BatchInput {
                id: "/site/src/content/a.md".into(),
                source: "---\ntitle: A\n---\n".into(),
                file_path: None,
            },
            BatchInput {
                id: "broken".into(),
                source: "---\ntitle: B\n".into(),
                file_path: Some("/site/src/content/b.md".into()),
            },
        ];
        let result = process_batch(
            inputs,
            Some(BatchOptions {
                max_threads: Some(2),
                continue_on_error: Some(true),
                config: config(),
            }),
        )
        .unwrap();
        assert_eq!(result.stats.total, 2);
        assert_eq!(result.stats.succeeded, 1);
        assert_eq!(result.stats.failed, 1);
        assert_eq!(result.results[0].id, "/site/src/content/a.md");
        assert!(result.results[0].result.is_some());
        assert!(result.results[1].error.as_deref().unwrap().contains("b.md"));
    }

    #[test]
    fn batch_stops_on_first_error_when_asked() {
        let inputs = vec![
            BatchInput {
                id: "/site/src/content/bad.md".into(),
                source: "---\nunterminated: true\n".into(),
                file_path: None,
            },
            BatchInput {
                id: "/site/src/content/good.md".into(),
                source: "---\ntitle: G\n---\n".into(),
                file_path: None,
            },
        ];
        let result = process_batch(
            inputs,
            Some(BatchOptions {
                continue_on_error: Some(false),
                config: config(),
                ..Default::default()
            }),
        )
        .unwrap();
        assert_eq!(result.results.len(), 1);
        assert_eq!(result.stats.failed, 1);
        assert_eq!(result.stats.succeeded, 0);
    }
}

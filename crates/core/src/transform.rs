//! The frontmatter transformation engine.
//!
//! A transformation is a single depth-first rebuild of the input tree. Every
//! visited value is classified (see [`classify`]) and either copied, rendered,
//! resolved, dropped, or diverted into the SEO payload. The input is never
//! mutated; the output is assembled bottom-up so that sibling order follows the
//! input and renamed keys take the position of the key they replace.
//!
//! The SEO payload is re-processed by the same engine after the main walk with
//! SEO diversion switched off, so an `seo` key nested inside it is treated like
//! any other key and diversion never recurses.

use crate::classify::{Classification, classify, strip_suffix};
use crate::error::{MissKind, TransformDiagnostics};
use crate::image::{ImageResolver, StaticImageResolver};
use crate::key_path::KeyPath;
use crate::options::TransformOptions;
use crate::render::{HtmlRenderer, MarkdownRenderer};
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::path::Path;

/// A frontmatter tree: an ordered mapping of keys to JSON values.
pub type Frontmatter = serde_json::Map<String, JsonValue>;

/// Immutable per-document context shared by the whole walk.
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    /// Absolute path of the document the frontmatter came from.
    pub source_file: &'a Path,
    /// Resolved options (suffixes, SEO field, roots).
    pub options: &'a TransformOptions,
}

impl<'a> TransformContext<'a> {
    /// Create a context for one document.
    pub fn new(source_file: &'a Path, options: &'a TransformOptions) -> Self {
        Self {
            source_file,
            options,
        }
    }
}

/// Output of one transformation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformResult {
    /// Transformed tree, without the SEO key once it has been diverted.
    pub tree: Frontmatter,
    /// Transformed SEO payload, when the input carried one.
    pub seo: Option<Frontmatter>,
    /// Transform misses, in visiting order.
    pub diagnostics: TransformDiagnostics,
}

/// The engine, parameterised over its two leaf collaborators.
pub struct FrontmatterTransformer {
    markdown: Box<dyn MarkdownRenderer>,
    images: Box<dyn ImageResolver>,
}

impl FrontmatterTransformer {
    /// Create an engine from a renderer and an image resolver.
    pub fn new<M, I>(markdown: M, images: I) -> Self
    where
        M: MarkdownRenderer + 'static,
        I: ImageResolver + 'static,
    {
        Self {
            markdown: Box::new(markdown),
            images: Box::new(images),
        }
    }

    /// Transforms `tree` for the document described by `ctx`.
    pub fn transform(&self, tree: &Frontmatter, ctx: &TransformContext<'_>) -> TransformResult {
        let mut walk = Walk::new(self, ctx, true);
        let main = walk.rebuild_map(tree, &KeyPath::root());
        let mut diagnostics = walk.diagnostics;

        let seo = walk.seo.and_then(|captured| {
            let mut seo_walk = Walk::new(self, ctx, false);
            let base = KeyPath::from_keys([ctx.options.seo_field.as_str()]);
            let payload = seo_walk.rebuild_map(&captured, &base);
            diagnostics.extend(seo_walk.diagnostics);
            (!payload.is_empty()).then_some(payload)
        });

        TransformResult {
            tree: main,
            seo,
            diagnostics,
        }
    }
}

impl Default for FrontmatterTransformer {
    fn default() -> Self {
        Self::new(HtmlRenderer::default(), StaticImageResolver::default())
    }
}

/// Transforms `tree` with the default renderer and image resolver.
pub fn transform(tree: &Frontmatter, ctx: &TransformContext<'_>) -> TransformResult {
    FrontmatterTransformer::default().transform(tree, ctx)
}

/// State of one walk: captured SEO subtree and collected misses.
struct Walk<'w> {
    transformer: &'w FrontmatterTransformer,
    ctx: &'w TransformContext<'w>,
    seo_allowed: bool,
    seo: Option<Frontmatter>,
    diagnostics: TransformDiagnostics,
}

impl<'w> Walk<'w> {
    fn new(
        transformer: &'w FrontmatterTransformer,
        ctx: &'w TransformContext<'w>,
        seo_allowed: bool,
    ) -> Self {
        Self {
            transformer,
            ctx,
            seo_allowed,
            seo: None,
            diagnostics: TransformDiagnostics::new(),
        }
    }

    fn rebuild_map(&mut self, map: &Frontmatter, path: &KeyPath) -> Frontmatter {
        let options = self.ctx.options;
        let mut out = Output::default();

        for (key, value) in map {
            let child = path.child_key(key);
            match classify(&child, value, options, self.seo_allowed) {
                Classification::Seo => {
                    log::debug!("Diverting `{}` into the SEO payload", child);
                    self.seo = value.as_object().cloned();
                }
                Classification::Ignored => {}
                Classification::Markdown => {
                    let leaf = leaf_parts(key, &options.markdown_suffix, value);
                    let rendered = leaf.and_then(|(stem, text)| {
                        non_empty(self.transformer.markdown.render(text)).map(|html| (stem, html))
                    });
                    match rendered {
                        Some((stem, html)) => out.derived(stem, JsonValue::String(html)),
                        None => {
                            self.miss(&child, MissKind::Markdown, value);
                            out.literal(key, value.clone());
                        }
                    }
                }
                Classification::Image => {
                    let leaf = leaf_parts(key, &options.image_suffix, value);
                    let resolved = leaf.and_then(|(stem, reference)| {
                        non_empty(self.transformer.images.resolve(
                            reference,
                            self.ctx.source_file,
                            &options.image_root(),
                        ))
                        .map(|site_path| (stem, site_path))
                    });
                    match resolved {
                        Some((stem, site_path)) => out.derived(stem, JsonValue::String(site_path)),
                        None => {
                            self.miss(&child, MissKind::Image, value);
                            out.literal(key, value.clone());
                        }
                    }
                }
                Classification::Default => {
                    if let Some(rebuilt) = self.rebuild_value(value, &child) {
                        out.literal(key, rebuilt);
                    }
                }
            }
        }

        out.map
    }

    fn rebuild_sequence(&mut self, items: &[JsonValue], path: &KeyPath) -> Vec<JsonValue> {
        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let child = path.child_index(index);
            if classify(&child, item, self.ctx.options, self.seo_allowed)
                == Classification::Ignored
            {
                continue;
            }
            if let Some(rebuilt) = self.rebuild_value(item, &child) {
                out.push(rebuilt);
            }
        }
        out
    }

    /// Rebuilds a default-classified value; `None` when nothing is left of it.
    fn rebuild_value(&mut self, value: &JsonValue, path: &KeyPath) -> Option<JsonValue> {
        match value {
            JsonValue::Object(map) => {
                let rebuilt = self.rebuild_map(map, path);
                (!rebuilt.is_empty()).then_some(JsonValue::Object(rebuilt))
            }
            JsonValue::Array(items) => {
                let rebuilt = self.rebuild_sequence(items, path);
                (!rebuilt.is_empty()).then_some(JsonValue::Array(rebuilt))
            }
            scalar => Some(scalar.clone()),
        }
    }

    fn miss(&mut self, path: &KeyPath, kind: MissKind, value: &JsonValue) {
        let text = value.as_str().unwrap_or_default();
        log::debug!("No {} output for `{}`, keeping original key", kind, path);
        self.diagnostics.add_miss(path.to_string(), kind, text);
    }
}

/// Output mapping under construction.
///
/// A value derived from a suffixed key wins over a literal sibling with the
/// same name, whichever comes first in the input.
#[derive(Default)]
struct Output {
    map: Frontmatter,
    derived: HashSet<String>,
}

impl Output {
    fn literal(&mut self, key: &str, value: JsonValue) {
        if !self.derived.contains(key) {
            self.map.insert(key.to_string(), value);
        }
    }

    fn derived(&mut self, key: &str, value: JsonValue) {
        self.derived.insert(key.to_string());
        self.map.insert(key.to_string(), value);
    }
}

fn leaf_parts<'v>(key: &'v str, suffix: &str, value: &'v JsonValue) -> Option<(&'v str, &'v str)> {
    Some((strip_suffix(key, suffix)?, value.as_str()?))
}

fn non_empty(output: Option<String>) -> Option<String> {
    output.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options() -> TransformOptions {
        TransformOptions::with_project_root("/site")
    }

    fn wrap(input: &str) -> Option<String> {
        Some(format!("<p>{input}</p>"))
    }

    fn engine() -> FrontmatterTransformer {
        FrontmatterTransformer::new(
            wrap,
            |reference: &str, _: &Path, _: &Path| Some(format!("/images/{reference}")),
        )
    }

    fn tree(value: JsonValue) -> Frontmatter {
        value.as_object().cloned().expect("test tree must be an object")
    }

    fn run(engine: &FrontmatterTransformer, value: JsonValue) -> TransformResult {
        let options = options();
        let ctx = TransformContext::new(Path::new("/site/src/content/post.md"), &options);
        engine.transform(&tree(value), &ctx)
    }

    fn keys(map: &Frontmatter) -> Vec<&str> {
        map.keys().map(String::as_str).collect()
    }

    #[test]
    fn strips_markdown_suffix_in_place() {
        let result = run(&engine(), json!({ "a": 1, "b_md": "x", "c": 3 }));
        assert_eq!(keys(&result.tree), vec!["a", "b", "c"]);
        assert_eq!(result.tree["b"], json!("<p>x</p>"));
        assert!(result.seo.is_none());
    }

    #[test]
    fn resolves_images_in_place() {
        let result = run(&engine(), json!({ "hero_src": "photo.jpg", "title": "T" }));
        assert_eq!(keys(&result.tree), vec!["hero", "title"]);
        assert_eq!(result.tree["hero"], json!("/images/photo.jpg"));
    }

    #[test]
    fn image_miss_keeps_original_key() {
        let engine = FrontmatterTransformer::new(wrap, |_: &str, _: &Path, _: &Path| None);
        let result = run(&engine, json!({ "hero_src": "photo.jpg" }));
        assert_eq!(result.tree, tree(json!({ "hero_src": "photo.jpg" })));
        assert_eq!(result.diagnostics.count(), 1);
        assert_eq!(result.diagnostics.misses[0].path, "hero_src");
        assert_eq!(result.diagnostics.misses[0].kind, MissKind::Image);
    }

    #[test]
    fn empty_render_counts_as_miss() {
        let engine = FrontmatterTransformer::new(
            |_: &str| Some(String::new()),
            |_: &str, _: &Path, _: &Path| None,
        );
        let result = run(&engine, json!({ "body_md": "# Hi" }));
        assert_eq!(result.tree, tree(json!({ "body_md": "# Hi" })));
        assert_eq!(result.diagnostics.misses[0].kind, MissKind::Markdown);
    }

    #[test]
    fn prunes_empty_values() {
        let result = run(
            &engine(),
            json!({ "a": null, "b": "", "c": {}, "d": [], "e": "kept" }),
        );
        assert_eq!(result.tree, tree(json!({ "e": "kept" })));
    }

    #[test]
    fn prunes_containers_emptied_by_pruning() {
        let result = run(&engine(), json!({ "meta": { "x": null }, "list": [null, ""] }));
        assert!(result.tree.is_empty());
    }

    #[test]
    fn diverts_seo_and_transforms_it() {
        let result = run(
            &engine(),
            json!({ "title": "T", "seo": { "description_md": "hi" } }),
        );
        assert_eq!(result.tree, tree(json!({ "title": "T" })));
        assert_eq!(result.seo, Some(tree(json!({ "description": "<p>hi</p>" }))));
    }

    #[test]
    fn nested_seo_inside_payload_is_not_diverted_again() {
        let result = run(
            &engine(),
            json!({ "seo": { "title": "T", "seo": { "note_md": "n" } } }),
        );
        assert!(result.tree.is_empty());
        assert_eq!(
            result.seo,
            Some(tree(json!({ "title": "T", "seo": { "note": "<p>n</p>" } })))
        );
    }

    #[test]
    fn seo_below_top_level_stays_in_tree() {
        let result = run(&engine(), json!({ "page": { "seo": { "title": "T" } } }));
        assert_eq!(result.tree, tree(json!({ "page": { "seo": { "title": "T" } } })));
        assert!(result.seo.is_none());
    }

    #[test]
    fn seo_payload_misses_are_reported_with_full_path() {
        let engine = FrontmatterTransformer::new(wrap, |_: &str, _: &Path, _: &Path| None);
        let result = run(&engine, json!({ "seo": { "og_src": "card.png" } }));
        assert_eq!(result.seo, Some(tree(json!({ "og_src": "card.png" }))));
        assert_eq!(result.diagnostics.misses[0].path, "seo.og_src");
    }

    #[test]
    fn walks_into_sequences() {
        let result = run(
            &engine(),
            json!({ "sections": [ { "body_md": "one" }, { "image_src": "a.png", "alt": "A" } ] }),
        );
        assert_eq!(
            result.tree,
            tree(json!({
                "sections": [
                    { "body": "<p>one</p>" },
                    { "image": "/images/a.png", "alt": "A" }
                ]
            }))
        );
    }

    #[test]
    fn suffixed_non_string_passes_through() {
        let result = run(&engine(), json!({ "count_md": 3, "flags_src": [true] }));
        assert_eq!(result.tree, tree(json!({ "count_md": 3, "flags_src": [true] })));
    }

    #[test]
    fn derived_key_wins_over_literal_sibling() {
        let result = run(&engine(), json!({ "body": "old", "x": 1, "body_md": "new" }));
        assert_eq!(keys(&result.tree), vec!["body", "x"]);
        assert_eq!(result.tree["body"], json!("<p>new</p>"));

        let result = run(&engine(), json!({ "body_md": "new", "body": "old" }));
        assert_eq!(keys(&result.tree), vec!["body"]);
        assert_eq!(result.tree["body"], json!("<p>new</p>"));
    }

    #[test]
    fn transformed_tree_is_a_fixed_point() {
        let first = run(
            &engine(),
            json!({ "slug": "post", "body_md": "b", "tags": ["a", null], "seo": { "t_md": "x" } }),
        );
        let second = run(&engine(), JsonValue::Object(first.tree.clone()));
        assert_eq!(second.tree, first.tree);
        assert!(second.seo.is_none());
        assert!(!second.diagnostics.has_misses());
    }

    #[test]
    fn input_is_not_mutated() {
        let input = tree(json!({ "body_md": "x", "seo": { "a": "b" } }));
        let snapshot = input.clone();
        let options = options();
        let ctx = TransformContext::new(Path::new("/site/src/content/post.md"), &options);
        let _ = engine().transform(&input, &ctx);
        assert_eq!(input, snapshot);
    }
}

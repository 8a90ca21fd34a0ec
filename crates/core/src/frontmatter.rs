use crate::transform::Frontmatter;
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Frontmatter extracted from the head of a markdown document.
#[derive(Debug)]
pub struct FrontmatterExtraction {
    /// Parsed frontmatter, in declaration order.
    pub data: Frontmatter,
    /// Byte offset inside the original document where Markdown content begins.
    pub body_start: usize,
}

impl FrontmatterExtraction {
    fn empty() -> Self {
        Self {
            data: Frontmatter::new(),
            body_start: 0,
        }
    }
}

/// Why the head of a document could not be read as frontmatter.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// The opening `---` line has no matching closing line.
    #[error("frontmatter opened with `---` is never closed")]
    MissingClosingFence,
    /// The block between the fences is not YAML.
    #[error("frontmatter is not valid YAML: {0}")]
    InvalidYaml(String),
    /// The block holds a YAML value other than a mapping of keys.
    #[error("frontmatter must be a mapping of keys, found {0}")]
    NotAMapping(&'static str),
}

/// Extracts the `---` fenced YAML block at the top of `input`.
///
/// Leading blank lines and a byte-order mark are skipped. A document without a
/// block yields an empty mapping and a body starting at offset 0.
pub fn extract_frontmatter(input: &str) -> Result<FrontmatterExtraction, FrontmatterError> {
    match find_yaml_block(input)? {
        Some((block, body_start)) => Ok(FrontmatterExtraction {
            data: parse_yaml_block(block)?,
            body_start,
        }),
        None => Ok(FrontmatterExtraction::empty()),
    }
}

fn parse_yaml_block(block: &str) -> Result<Frontmatter, FrontmatterError> {
    let yaml = match serde_yaml::from_str::<serde_yaml::Value>(block) {
        Ok(yaml) => yaml,
        Err(_) if block.trim().is_empty() => return Ok(Frontmatter::new()),
        Err(err) => return Err(FrontmatterError::InvalidYaml(err.to_string())),
    };

    match yaml {
        serde_yaml::Value::Null => Ok(Frontmatter::new()),
        serde_yaml::Value::Mapping(_) => match serde_json::to_value(yaml) {
            Ok(JsonValue::Object(map)) => Ok(map),
            Ok(_) => Err(FrontmatterError::NotAMapping("a non-mapping value")),
            Err(err) => Err(FrontmatterError::InvalidYaml(err.to_string())),
        },
        serde_yaml::Value::Sequence(_) => Err(FrontmatterError::NotAMapping("a sequence")),
        serde_yaml::Value::Tagged(_) => Err(FrontmatterError::NotAMapping("a tagged value")),
        _ => Err(FrontmatterError::NotAMapping("a scalar")),
    }
}

/// Returns the raw block (fences excluded) and the offset of the body.
fn find_yaml_block(input: &str) -> Result<Option<(&str, usize)>, FrontmatterError> {
    let (text, bom_len) = match input.strip_prefix('\u{feff}') {
        Some(stripped) => (stripped, '\u{feff}'.len_utf8()),
        None => (input, 0),
    };

    let mut lines = Lines::new(text);
    let block_start = loop {
        match lines.next() {
            Some((line, _)) if line.trim().is_empty() => continue,
            Some((line, next)) if is_fence(line) => break next,
            _ => return Ok(None),
        }
    };

    let mut block_end = block_start;
    for (line, next) in lines {
        if is_fence(line) {
            let block = text[block_start..block_end].trim_end_matches(['\r', '\n']);
            return Ok(Some((block, bom_len + next)));
        }
        block_end = next;
    }
    Err(FrontmatterError::MissingClosingFence)
}

fn is_fence(line: &str) -> bool {
    line.trim_end_matches('\r') == "---"
}

/// Iterates lines together with the offset just past each line's newline.
struct Lines<'a> {
    text: &'a str,
    cursor: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, cursor: 0 }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = (&'a str, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.text.len() {
            return None;
        }
        let rest = &self.text[self.cursor..];
        let (line, consumed) = match rest.find('\n') {
            Some(pos) => (&rest[..pos], pos + 1),
            None => (rest, rest.len()),
        };
        self.cursor += consumed;
        Some((line, self.cursor))
    }
}

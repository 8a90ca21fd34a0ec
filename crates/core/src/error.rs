use crate::frontmatter::FrontmatterError;
use thiserror::Error;

/// Errors that can occur while configuring or running the pipeline.
#[derive(Debug, Error)]
pub enum MatterformError {
    /// Frontmatter could not be extracted from the document.
    #[error("Frontmatter error in {file}: {source}")]
    Frontmatter {
        /// Document the frontmatter belongs to
        file: String,
        /// Underlying extraction error
        #[source]
        source: FrontmatterError,
    },
    /// A configuration value failed validation.
    #[error("Invalid option `{option}`: {reason}")]
    InvalidOption {
        /// Option name as the host spells it (camelCase)
        option: String,
        /// Why the value was rejected
        reason: String,
    },
    /// Host options were not shaped like an options object.
    #[error("Options could not be read: {0}")]
    OptionsFormat(String),
}

impl MatterformError {
    /// Create an invalid option error
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }

    /// Create a frontmatter error attributed to a file
    pub fn frontmatter(file: impl Into<String>, source: FrontmatterError) -> Self {
        Self::Frontmatter {
            file: file.into(),
            source,
        }
    }
}

/// Result alias for fallible matterform operations.
pub type Result<T> = std::result::Result<T, MatterformError>;

/// Which leaf transform failed to produce a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissKind {
    /// The markdown renderer returned nothing
    Markdown,
    /// The image resolver returned nothing
    Image,
}

impl std::fmt::Display for MissKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissKind::Markdown => write!(f, "markdown"),
            MissKind::Image => write!(f, "image"),
        }
    }
}

/// A leaf whose transform produced no output; the original key was kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformMiss {
    /// Dotted key path of the kept key, e.g. `sections[0].hero_src`
    pub path: String,
    /// Which transform missed
    pub kind: MissKind,
    /// The value that could not be transformed
    pub value: String,
}

impl std::fmt::Display for TransformMiss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} transform produced no output for `{}` ({:?})",
            self.kind, self.path, self.value
        )
    }
}

/// Non-fatal diagnostics collected during one transformation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformDiagnostics {
    /// Leaves kept verbatim because their transform missed
    pub misses: Vec<TransformMiss>,
}

impl TransformDiagnostics {
    /// Create an empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a miss
    pub fn add_miss(&mut self, path: String, kind: MissKind, value: &str) {
        self.misses.push(TransformMiss {
            path,
            kind,
            value: value.to_string(),
        });
    }

    /// Append another collection (used when folding the SEO pass back in)
    pub fn extend(&mut self, other: TransformDiagnostics) {
        self.misses.extend(other.misses);
    }

    /// Check if there are any misses
    pub fn has_misses(&self) -> bool {
        !self.misses.is_empty()
    }

    /// Total count of diagnostics
    pub fn count(&self) -> usize {
        self.misses.len()
    }
}

// Artifact domain model - files produced by the analysis pipeline
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    DelimitedText,
    Spreadsheet,
    Image,
}

impl ArtifactFormat {
    /// Map a file extension (without the dot) to its format
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "tsv" => Some(Self::DelimitedText),
            "xlsx" | "xlsm" | "xls" | "ods" => Some(Self::Spreadsheet),
            "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" => Some(Self::Image),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,
    #[error("pattern '{0}' has more than one '*' wildcard")]
    TooManyWildcards(String),
    #[error("pattern '{0}' must be a file name, not a path")]
    ContainsSeparator(String),
    #[error("pattern '{0}' has no recognised file extension")]
    UnknownExtension(String),
}

/// Filename glob with at most one `*` wildcard, e.g. `daily_summary_data_*.xlsx`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPattern {
    raw: String,
    prefix: String,
    suffix: Option<String>,
    format: ArtifactFormat,
}

impl ArtifactPattern {
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        if raw.is_empty() {
            return Err(PatternError::Empty);
        }
        if raw.contains('/') || raw.contains('\\') {
            return Err(PatternError::ContainsSeparator(raw.to_string()));
        }

        let (prefix, suffix) = match raw.split_once('*') {
            Some((_, rest)) if rest.contains('*') => {
                return Err(PatternError::TooManyWildcards(raw.to_string()));
            }
            Some((prefix, rest)) => (prefix.to_string(), Some(rest.to_string())),
            None => (raw.to_string(), None),
        };

        let format = Path::new(raw)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ArtifactFormat::from_extension)
            .ok_or_else(|| PatternError::UnknownExtension(raw.to_string()))?;

        Ok(Self {
            raw: raw.to_string(),
            prefix,
            suffix,
            format,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn format(&self) -> ArtifactFormat {
        self.format
    }

    /// Check whether a bare file name matches this pattern
    pub fn matches(&self, file_name: &str) -> bool {
        match &self.suffix {
            None => file_name == self.prefix,
            Some(suffix) => {
                file_name.len() >= self.prefix.len() + suffix.len()
                    && file_name.starts_with(&self.prefix)
                    && file_name.ends_with(suffix.as_str())
            }
        }
    }
}

impl std::fmt::Display for ArtifactPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// One physical file realizing a logical name at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub logical_name: String,
    pub path: PathBuf,
    pub modified: DateTime<Utc>,
    pub format: ArtifactFormat,
}

impl Artifact {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
    }

    /// MIME type used when serving image artifacts
    pub fn content_type(&self) -> &'static str {
        match self.extension().as_deref() {
            Some("png") => "image/png",
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("svg") => "image/svg+xml",
            Some("webp") => "image/webp",
            _ => "application/octet-stream",
        }
    }
}

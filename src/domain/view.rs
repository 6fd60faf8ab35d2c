// Render results handed to the presentation layer
use serde::Serialize;

use super::error::RenderError;

/// Terminal state of one section's render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionOutcome {
    Rendered,
    FilteredRendered,
    StaleData,
    NotFound,
    ParseFailure,
    SchemaMismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub caption: String,
    pub count: usize,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Shown instead of the grid when no row matched
    pub empty_notice: Option<Notice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionBody {
    Image { src: String, file_name: String },
    Tables { tables: Vec<TableView> },
    Notice(Notice),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub artifact: Option<String>,
    pub outcome: SectionOutcome,
    pub body: SectionBody,
}

impl SectionView {
    /// Turn a render failure into the placeholder shown in place of the section
    pub fn failed(
        id: String,
        title: String,
        description: Option<String>,
        artifact: Option<String>,
        error: &RenderError,
    ) -> Self {
        let (outcome, notice) = match error {
            RenderError::NotFound { pattern } => (
                SectionOutcome::NotFound,
                Notice::new(
                    NoticeLevel::Warning,
                    format!("{title}: no artifact matching '{pattern}' found."),
                ),
            ),
            RenderError::ParseFailure { .. } => (
                SectionOutcome::ParseFailure,
                Notice::new(NoticeLevel::Error, format!("Error loading file: {error}")),
            ),
            RenderError::SchemaMismatch { .. } => (
                SectionOutcome::SchemaMismatch,
                Notice::new(NoticeLevel::Error, format!("Unexpected file layout: {error}")),
            ),
            RenderError::StaleData { .. } => (
                SectionOutcome::StaleData,
                Notice::new(NoticeLevel::Info, "There is no data for today yet."),
            ),
        };

        Self {
            id,
            title,
            description,
            artifact,
            outcome,
            body: SectionBody::Notice(notice),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabSummary {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabView {
    pub id: String,
    pub title: String,
    pub sections: Vec<SectionView>,
}

// Dashboard service - Use case for rendering dashboard tabs
use crate::application::artifact_store::ArtifactStore;
use crate::application::freshness::FreshnessGate;
use crate::domain::artifact::{Artifact, ArtifactFormat};
use crate::domain::error::RenderError;
use crate::domain::table::{Cell, Table};
use crate::domain::view::{
    Notice, NoticeLevel, SectionBody, SectionOutcome, SectionView, TabSummary, TabView, TableView,
};
use crate::infrastructure::config::{expand_template, DashboardConfig, SectionConfig};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;

const DEFAULT_TABLE_CAPTION: &str = "${title} — Count: ${count}";
const DEFAULT_SUBVIEW_CAPTION: &str = "${value} — Count: ${count}";
const DEFAULT_EMPTY_MESSAGE: &str = "No rows found where ${column} is '${value}'.";

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn ArtifactStore>,
    dashboard: Arc<DashboardConfig>,
    gate: FreshnessGate,
}

impl DashboardService {
    pub fn new(
        store: Arc<dyn ArtifactStore>,
        dashboard: Arc<DashboardConfig>,
        gate: FreshnessGate,
    ) -> Self {
        Self {
            store,
            dashboard,
            gate,
        }
    }

    pub fn tabs(&self) -> Vec<TabSummary> {
        self.dashboard
            .tabs
            .iter()
            .map(|t| TabSummary {
                id: t.id.clone(),
                title: t.title.clone(),
            })
            .collect()
    }

    pub fn default_tab_id(&self) -> Option<&str> {
        self.dashboard.tabs.first().map(|t| t.id.as_str())
    }

    /// Render every section of a tab; `None` for an unknown tab
    pub async fn render_tab(&self, tab_id: &str, today: NaiveDate) -> Option<TabView> {
        let tab = self.dashboard.tabs.iter().find(|t| t.id == tab_id)?;

        let mut sections = Vec::with_capacity(tab.sections.len());
        for section in &tab.sections {
            sections.push(self.render_section(section, today).await);
        }

        Some(TabView {
            id: tab.id.clone(),
            title: tab.title.clone(),
            sections,
        })
    }

    /// Run resolve -> load -> gate -> filter for one section; never fails
    pub async fn render_section(&self, section: &SectionConfig, today: NaiveDate) -> SectionView {
        let mut artifact_name = None;
        match self.try_render(section, today, &mut artifact_name).await {
            Ok((outcome, body)) => {
                tracing::debug!(section = %section.id, ?outcome, "section rendered");
                SectionView {
                    id: section.id.clone(),
                    title: section.title.clone(),
                    description: section.description.clone(),
                    artifact: artifact_name,
                    outcome,
                    body,
                }
            }
            Err(e) => {
                match &e {
                    RenderError::NotFound { .. } | RenderError::StaleData { .. } => {
                        tracing::info!(section = %section.id, "{}", e)
                    }
                    _ => tracing::warn!(section = %section.id, "{}", e),
                }
                SectionView::failed(
                    section.id.clone(),
                    section.title.clone(),
                    section.description.clone(),
                    artifact_name,
                    &e,
                )
            }
        }
    }

    async fn try_render(
        &self,
        section: &SectionConfig,
        today: NaiveDate,
        artifact_name: &mut Option<String>,
    ) -> Result<(SectionOutcome, SectionBody), RenderError> {
        let artifact = self.resolve(section).await?;
        *artifact_name = Some(artifact.file_name());
        tracing::debug!(
            section = %section.id,
            artifact = %artifact.logical_name,
            file = %artifact.file_name(),
            modified = %artifact.modified,
            "using artifact"
        );

        if artifact.format == ArtifactFormat::Image {
            let body = SectionBody::Image {
                src: format!("/artifacts/{}", section.id),
                file_name: artifact.file_name(),
            };
            return Ok((SectionOutcome::Rendered, body));
        }

        let table = self.store.load_table(&artifact).await?;
        table.require_columns(section.required_columns.as_slice())?;

        if let Some(freshness) = &section.freshness {
            self.gate.check(&table, &freshness.date_column, today)?;
        }

        match &section.filter {
            None => {
                let mut vars = HashMap::new();
                vars.insert("title", section.title.clone());
                vars.insert("count", table.len().to_string());
                let caption = expand_template(
                    section.caption.as_deref().unwrap_or(DEFAULT_TABLE_CAPTION),
                    &vars,
                );
                let empty_notice = table
                    .is_empty()
                    .then(|| Notice::new(NoticeLevel::Info, format!("No rows found in {}.", table.source)));
                let rows = table.rows.iter().map(|r| to_strings(r)).collect();
                let view = table_view(caption, &table, rows, empty_notice);
                Ok((SectionOutcome::Rendered, SectionBody::Tables { tables: vec![view] }))
            }
            Some(filter) => {
                let mut tables = Vec::with_capacity(filter.values.len());
                for value in &filter.values {
                    let subview = table.filter_exact(&filter.column, value)?;

                    let mut vars = HashMap::new();
                    vars.insert("value", subview.value.to_string());
                    vars.insert("column", subview.column.to_string());
                    vars.insert("count", subview.count().to_string());
                    vars.insert("title", section.title.clone());

                    let caption = expand_template(
                        filter.caption.as_deref().unwrap_or(DEFAULT_SUBVIEW_CAPTION),
                        &vars,
                    );
                    let empty_notice = (subview.count() == 0).then(|| {
                        Notice::new(
                            NoticeLevel::Info,
                            expand_template(
                                filter.empty_message.as_deref().unwrap_or(DEFAULT_EMPTY_MESSAGE),
                                &vars,
                            ),
                        )
                    });
                    let rows = subview.rows.iter().map(|r| to_strings(r)).collect();
                    tables.push(table_view(caption, &table, rows, empty_notice));
                }
                Ok((SectionOutcome::FilteredRendered, SectionBody::Tables { tables }))
            }
        }
    }

    async fn resolve(&self, section: &SectionConfig) -> Result<Artifact, RenderError> {
        let pattern = section
            .artifact_pattern()
            .map_err(|e| RenderError::parse_failure(section.pattern_str(), format!("{e:#}")))?;

        self.store
            .resolve(&section.artifact, &pattern)
            .await
            .ok_or_else(|| RenderError::NotFound {
                pattern: pattern.to_string(),
            })
    }

    /// Latest image for an image section, re-resolved on every call
    pub async fn image(&self, section_id: &str) -> Option<(Artifact, Vec<u8>)> {
        let section = self.dashboard.find_section(section_id)?;
        let artifact = self.resolve(section).await.ok()?;
        if artifact.format != ArtifactFormat::Image {
            return None;
        }

        match self.store.read_bytes(&artifact).await {
            Ok(bytes) => Some((artifact, bytes)),
            Err(e) => {
                tracing::error!(section = %section_id, path = %artifact.path.display(), "failed to read image: {}", e);
                None
            }
        }
    }
}

fn to_strings(row: &[Cell]) -> Vec<String> {
    row.iter().map(Cell::to_string).collect()
}

fn table_view(
    caption: String,
    table: &Table,
    rows: Vec<Vec<String>>,
    empty_notice: Option<Notice>,
) -> TableView {
    TableView {
        caption,
        count: rows.len(),
        columns: table.columns.clone(),
        rows,
        empty_notice,
    }
}

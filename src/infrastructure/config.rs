use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crate::domain::artifact::{ArtifactFormat, ArtifactPattern};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,
    #[serde(default = "default_title")]
    pub title: String,
    /// Calendar days between "today" and the date hourly artifacts must carry
    #[serde(default = "default_freshness_lag_days")]
    pub freshness_lag_days: u32,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            uploads_dir: default_uploads_dir(),
            title: default_title(),
            freshness_lag_days: default_freshness_lag_days(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_title() -> String {
    "Stock Market Dashboard".to_string()
}

fn default_freshness_lag_days() -> u32 {
    1
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default)]
    pub tabs: Vec<TabConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TabConfig {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub sections: Vec<SectionConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SectionConfig {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Logical name, e.g. `daily_summary_data`
    pub artifact: String,
    /// File extension, e.g. `xlsx`; used to build the default pattern
    pub format: String,
    /// Overrides `<artifact>_*.<format>`
    pub pattern: Option<String>,
    /// Caption for an unfiltered table; supports `${title}` and `${count}`
    pub caption: Option<String>,
    #[serde(default)]
    pub required_columns: Vec<String>,
    pub filter: Option<FilterConfig>,
    pub freshness: Option<FreshnessConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FilterConfig {
    pub column: String,
    pub values: Vec<String>,
    /// Supports `${value}`, `${count}` and `${column}`
    pub caption: Option<String>,
    pub empty_message: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FreshnessConfig {
    pub date_column: String,
}

impl SectionConfig {
    pub fn pattern_str(&self) -> String {
        self.pattern
            .clone()
            .unwrap_or_else(|| format!("{}_*.{}", self.artifact, self.format))
    }

    pub fn artifact_pattern(&self) -> anyhow::Result<ArtifactPattern> {
        ArtifactPattern::parse(&self.pattern_str())
            .with_context(|| format!("section '{}' has an invalid pattern", self.id))
    }
}

impl DashboardConfig {
    pub fn find_section(&self, section_id: &str) -> Option<&SectionConfig> {
        self.tabs
            .iter()
            .flat_map(|t| t.sections.iter())
            .find(|s| s.id == section_id)
    }

    /// Reject layouts that would only fail later, at render time
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tabs.is_empty() {
            bail!("dashboard config defines no tabs");
        }

        let mut tab_ids = HashSet::new();
        let mut section_ids = HashSet::new();
        for tab in &self.tabs {
            if !tab_ids.insert(tab.id.as_str()) {
                bail!("duplicate tab id '{}'", tab.id);
            }
            for section in &tab.sections {
                if !section_ids.insert(section.id.as_str()) {
                    bail!("duplicate section id '{}'", section.id);
                }
                let declared = ArtifactFormat::from_extension(&section.format).with_context(
                    || format!("section '{}' has unknown format '{}'", section.id, section.format),
                )?;
                let pattern = section.artifact_pattern()?;
                if pattern.format() != declared {
                    bail!(
                        "section '{}': pattern '{}' does not match format '{}'",
                        section.id,
                        pattern,
                        section.format
                    );
                }
                if declared == ArtifactFormat::Image
                    && (section.filter.is_some() || section.freshness.is_some())
                {
                    bail!("image section '{}' cannot filter rows", section.id);
                }
                if let Some(filter) = &section.filter {
                    if filter.values.is_empty() {
                        bail!("section '{}' filter has no values", section.id);
                    }
                }
            }
        }
        Ok(())
    }
}

pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/server").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard"))
        .build()?;

    let dashboard: DashboardConfig = settings.try_deserialize()?;
    dashboard.validate()?;
    Ok(dashboard)
}

/// Replace `${name}` placeholders in a caption template
pub fn expand_template(template: &str, vars: &HashMap<&str, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}

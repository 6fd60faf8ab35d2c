// Store trait for artifact access
use crate::domain::artifact::{Artifact, ArtifactPattern};
use crate::domain::error::RenderError;
use crate::domain::table::Table;
use async_trait::async_trait;

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Most recently modified artifact matching the pattern; `None` when nothing matches
    async fn resolve(&self, logical_name: &str, pattern: &ArtifactPattern) -> Option<Artifact>;

    /// Parse a tabular artifact (delimited text or spreadsheet) into a table
    async fn load_table(&self, artifact: &Artifact) -> Result<Table, RenderError>;

    /// Raw bytes, used to serve image artifacts
    async fn read_bytes(&self, artifact: &Artifact) -> std::io::Result<Vec<u8>>;
}

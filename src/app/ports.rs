use crate::error::Result;
use crate::grafana::dashboard::{DashboardFull, SearchHit, SearchQuery};
use crate::grafana::folder::FolderList;
use async_trait::async_trait;
use std::path::Path;

/// Read side: where folders and dashboards come from.
#[async_trait]
pub trait DashboardCatalogPort: Send + Sync {
    async fn folders(&self) -> Result<FolderList>;
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>>;
    async fn dashboard(&self, uid: &str) -> Result<DashboardFull>;
}

/// Write side: where exported dashboard documents go.
#[async_trait]
pub trait DashboardSinkPort: Send + Sync {
    /// Writes `contents` to `path`, creating missing parent directories.
    async fn write_dashboard(&self, path: &Path, contents: &[u8]) -> Result<()>;
}

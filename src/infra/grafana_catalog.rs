use crate::app::ports::DashboardCatalogPort;
use crate::error::Result;
use crate::grafana::dashboard::{DashboardFull, SearchHit, SearchQuery};
use crate::grafana::folder::FolderList;
use crate::grafana::GrafanaClient;
use async_trait::async_trait;

#[async_trait]
impl DashboardCatalogPort for GrafanaClient {
    async fn folders(&self) -> Result<FolderList> {
        self.get_folders().await
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        self.search_dashboards(query).await
    }

    async fn dashboard(&self, uid: &str) -> Result<DashboardFull> {
        self.get_dashboard_by_uid(uid).await
    }
}

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::app::ports::{DashboardCatalogPort, DashboardSinkPort};
use crate::constants::{DASHBOARD_FILE_SUFFIX, UNTITLED};
use crate::error::Result;
use crate::grafana::dashboard::{Dashboard, SearchQuery};

#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub output_dir: PathBuf,
    /// Restrict the export to the folder with this exact title.
    pub folder: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub written: Vec<PathBuf>,
}

/// Where a dashboard lands under `output_dir`:
/// `<first word>/<file title>_dashboard.json`.
pub fn dashboard_path(output_dir: &Path, dashboard: &Dashboard) -> PathBuf {
    let mut file_title = dashboard.title_for_file();
    let mut first_word = dashboard.title_first_word();
    if file_title.is_empty() {
        file_title = UNTITLED.to_string();
        first_word = UNTITLED.to_string();
    }
    output_dir
        .join(first_word)
        .join(format!("{}{}", file_title, DASHBOARD_FILE_SUFFIX))
}

/// Resolves an optional folder title to its numeric id.
pub async fn resolve_folder_id(
    catalog: &dyn DashboardCatalogPort,
    folder: Option<&str>,
) -> Result<Option<i64>> {
    match folder {
        Some(title) => {
            let folders = catalog.folders().await?;
            let folder = folders.find_by_title(title)?;
            info!(folder_id = folder.id, "Resolved folder '{}'", title);
            Ok(Some(folder.id))
        }
        None => Ok(None),
    }
}

/// Use case for exporting every dashboard (optionally of one folder) to disk.
/// The first failure aborts the run.
pub struct ExportDashboardsUseCase {
    catalog: Box<dyn DashboardCatalogPort>,
    sink: Box<dyn DashboardSinkPort>,
}

impl ExportDashboardsUseCase {
    pub fn new(catalog: Box<dyn DashboardCatalogPort>, sink: Box<dyn DashboardSinkPort>) -> Self {
        Self { catalog, sink }
    }

    #[instrument(skip(self, request), fields(output_dir = %request.output_dir.display()))]
    pub async fn run(&self, request: &ExportRequest) -> Result<ExportReport> {
        let folder_id = resolve_folder_id(self.catalog.as_ref(), request.folder.as_deref()).await?;

        let hits = self
            .catalog
            .search(&SearchQuery::dashboards().in_folder(folder_id))
            .await?;
        info!("Exporting {} dashboards", hits.len());

        let mut report = ExportReport::default();
        let mut seen = HashSet::new();

        for hit in &hits {
            let full = self.catalog.dashboard(&hit.uid).await?;
            let contents = full.dashboard.to_pretty_json()?;
            let path = dashboard_path(&request.output_dir, &full.dashboard);

            if !seen.insert(path.clone()) {
                warn!(uid = %hit.uid, "Overwriting {} written earlier in this run", path.display());
            }

            info!("Writing dashboard to: {}", path.display());
            self.sink.write_dashboard(&path, &contents).await?;
            report.written.push(path);
        }

        Ok(report)
    }
}

//! Thin client for the parts of the Grafana HTTP API used by the exporter.
//! More info: https://grafana.com/docs/grafana/latest/developers/http_api/

pub mod dashboard;
pub mod folder;
pub mod request;

pub use dashboard::{Dashboard, DashboardFull, SearchHit, SearchQuery, SearchType};
pub use folder::{Folder, FolderList};
pub use request::{ApiResponse, Auth, GrafanaClient};

use serde::{Deserialize, Deserializer};

/// Reads a JSON `null` as the type's default, the way Grafana's own Go
/// client treats it.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

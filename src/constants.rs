/// Grafana HTTP API paths used by the client
pub const FOLDERS_PATH: &str = "/api/folders";
pub const SEARCH_PATH: &str = "/api/search";
pub const DASHBOARD_BY_UID_PATH: &str = "/api/dashboards/uid";

// Search `type` values understood by /api/search
pub const SEARCH_TYPE_DASHBOARD: &str = "dash-db";
pub const SEARCH_TYPE_FOLDER: &str = "dash-folder";

pub const USER_AGENT: &str = "grafana-tool";

/// Suffix appended to the sanitized title of every exported file
pub const DASHBOARD_FILE_SUFFIX: &str = "_dashboard.json";

/// Used when a title sanitizes down to nothing
pub const UNTITLED: &str = "untitled";

// Environment variables read by the CLI (also picked up from .env)
pub const ENV_URL: &str = "GRAFANA_URL";
pub const ENV_API_TOKEN: &str = "GRAFANA_API_TOKEN";
pub const ENV_USERNAME: &str = "GRAFANA_USERNAME";
pub const ENV_PASSWORD: &str = "GRAFANA_PASSWORD";

pub const DEFAULT_CONFIG_FILE: &str = "grafana-tool.toml";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

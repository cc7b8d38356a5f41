use super::null_as_default;
use super::request::GrafanaClient;
use crate::constants::{
    DASHBOARD_BY_UID_PATH, SEARCH_PATH, SEARCH_TYPE_DASHBOARD, SEARCH_TYPE_FOLDER,
};
use crate::error::Result;
use crate::sanitize;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// Dashboard export with its metadata, as returned by
/// `GET /api/dashboards/uid/:uid`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardFull {
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: DashboardMeta,
    pub dashboard: Dashboard,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMeta {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub can_save: Option<bool>,
    pub can_edit: Option<bool>,
    pub can_admin: Option<bool>,
    pub can_star: Option<bool>,
    pub slug: Option<String>,
    pub url: Option<String>,
    pub expires: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
    pub created_by: Option<String>,
    pub version: Option<i64>,
    pub has_acl: Option<bool>,
    pub is_folder: Option<bool>,
    pub folder_id: Option<i64>,
    pub folder_uid: Option<String>,
    pub folder_title: Option<String>,
    pub folder_url: Option<String>,
    pub provisioned: Option<bool>,
}

/// The dashboard model exactly as the server sent it. Exports serialize the
/// stored document, so nothing is added, dropped or rewritten; the accessors
/// and typed sections below only read from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dashboard(Map<String, Value>);

impl From<Map<String, Value>> for Dashboard {
    fn from(model: Map<String, Value>) -> Self {
        Dashboard(model)
    }
}

impl Dashboard {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    fn str_field(&self, key: &str) -> &str {
        self.get(key).and_then(Value::as_str).unwrap_or_default()
    }

    /// Decodes one top-level section; a missing, null or unexpected value
    /// reads as the empty section.
    fn section<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.get(key)
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }

    pub fn title(&self) -> &str {
        self.str_field("title")
    }

    pub fn uid(&self) -> &str {
        self.str_field("uid")
    }

    pub fn id(&self) -> Option<i64> {
        self.get("id").and_then(Value::as_i64)
    }

    pub fn version(&self) -> Option<i64> {
        self.get("version").and_then(Value::as_i64)
    }

    pub fn schema_version(&self) -> Option<i64> {
        self.get("schemaVersion").and_then(Value::as_i64)
    }

    pub fn tags(&self) -> Vec<&str> {
        self.get("tags")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Panel shapes vary by plugin; they are handed out untouched.
    pub fn panels(&self) -> &[Value] {
        self.get("panels")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn annotations(&self) -> Annotations {
        self.section("annotations")
    }

    pub fn links(&self) -> Vec<DashboardLink> {
        self.section("links")
    }

    pub fn templating(&self) -> Templating {
        self.section("templating")
    }

    pub fn time(&self) -> Option<TimeRange> {
        self.section("time")
    }

    pub fn timepicker(&self) -> Timepicker {
        self.section("timepicker")
    }

    /// File-friendly title, e.g. `telegraf_workshop_system_dashboard_windows`.
    pub fn title_for_file(&self) -> String {
        sanitize::title_for_file(self.title())
    }

    /// First word of the file-friendly title.
    pub fn title_first_word(&self) -> String {
        sanitize::title_first_word(self.title())
    }

    /// Pretty JSON with two-space indentation.
    pub fn to_pretty_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}

// Typed sections of the dashboard model. Every field is optional and only
// serialized when present, so a section round-trips as received.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<Annotation>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub built_in: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasource: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardLink {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_vars: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_time: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_blank: Option<bool>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_dropdown: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Templating {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<TemplateVariable>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVariable {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide: Option<i64>,
    /// String for most variable types, an object for some datasources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

// Grafana spells these keys in snake_case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timepicker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_intervals: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_options: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of `GET /api/search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchHit {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub uid: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub uri: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_starred: bool,
    pub folder_id: Option<i64>,
    pub folder_uid: Option<String>,
    pub folder_title: Option<String>,
    pub folder_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    Dashboard,
    Folder,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Dashboard => SEARCH_TYPE_DASHBOARD,
            SearchType::Folder => SEARCH_TYPE_FOLDER,
        }
    }
}

/// Filters for `GET /api/search`. Unset filters are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub folder_id: Option<i64>,
    pub search_type: Option<SearchType>,
}

impl SearchQuery {
    pub fn dashboards() -> Self {
        Self {
            search_type: Some(SearchType::Dashboard),
            ..Default::default()
        }
    }

    pub fn in_folder(mut self, folder_id: Option<i64>) -> Self {
        self.folder_id = folder_id;
        self
    }

    pub fn matching(mut self, query: Option<String>) -> Self {
        self.query = query;
        self
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(query) = self.query.as_deref().filter(|q| !q.is_empty()) {
            params.push(("query", query.to_string()));
        }
        if let Some(folder_id) = self.folder_id {
            params.push(("folderIds", folder_id.to_string()));
        }
        if let Some(search_type) = self.search_type {
            params.push(("type", search_type.as_str().to_string()));
        }
        params
    }
}

impl GrafanaClient {
    #[instrument(skip(self))]
    pub async fn search_dashboards(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        let hits: Vec<SearchHit> = self
            .get(SEARCH_PATH, &query.to_params())
            .await?
            .ensure_ok()?
            .json()?;
        debug!("Search returned {} results", hits.len());
        Ok(hits)
    }

    #[instrument(skip(self))]
    pub async fn get_dashboard_by_uid(&self, uid: &str) -> Result<DashboardFull> {
        let path = format!("{}/{}", DASHBOARD_BY_UID_PATH, uid);
        self.get(&path, &[]).await?.ensure_ok()?.json()
    }
}

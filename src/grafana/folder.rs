use super::null_as_default;
use super::request::GrafanaClient;
use crate::constants::FOLDERS_PATH;
use crate::error::{GrafanaError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// A folder as returned by `GET /api/folders`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub uid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderList(pub Vec<Folder>);

impl FolderList {
    /// First folder whose title matches exactly.
    pub fn find_by_title(&self, title: &str) -> Result<&Folder> {
        self.0
            .iter()
            .find(|folder| folder.title == title)
            .ok_or_else(|| GrafanaError::FolderNotFound(title.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Folder> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl GrafanaClient {
    /// All folders the user is allowed to view.
    #[instrument(skip(self))]
    pub async fn get_folders(&self) -> Result<FolderList> {
        let folders: FolderList = self.get(FOLDERS_PATH, &[]).await?.ensure_ok()?.json()?;
        debug!("Fetched {} folders", folders.len());
        Ok(folders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOLDERS: &str = r#"[{"id":98,"uid":"HeZIp-Qmk","title":"bank-now"},{"id":83,"uid":"5_oQ-G8mk","title":"Fun"},{"id":22,"uid":"p0S7PPezk","title":"newbit"},{"id":50,"uid":"DOqaFO2mk","title":"sql-dev-dashboard"},{"id":76,"uid":"1CaRYRymz","title":"vmware"},{"id":37,"uid":"J09uHF4iz","title":"Workshop"}]"#;

    #[test]
    fn test_find_folder_by_title() {
        let folders: FolderList = serde_json::from_str(FOLDERS).unwrap();
        assert_eq!(folders.len(), 6);

        let folder = folders.find_by_title("Fun").unwrap();
        assert_eq!(folder.id, 83);
        assert_eq!(folder.uid, "5_oQ-G8mk");
    }

    #[test]
    fn test_find_folder_is_exact_match() {
        let folders: FolderList = serde_json::from_str(FOLDERS).unwrap();
        assert!(matches!(
            folders.find_by_title("fun"),
            Err(GrafanaError::FolderNotFound(name)) if name == "fun"
        ));
        assert!(folders.find_by_title("Work").is_err());
    }

    #[test]
    fn test_folder_null_fields() {
        let folders: FolderList =
            serde_json::from_str(r#"[{"id":5,"uid":null,"title":"Ops","url":null}]"#).unwrap();
        assert_eq!(folders.find_by_title("Ops").unwrap().uid, "");
    }

    #[test]
    fn test_find_returns_first_duplicate() {
        let folders = FolderList(vec![
            Folder { id: 1, uid: "a".into(), title: "Ops".into(), url: None },
            Folder { id: 2, uid: "b".into(), title: "Ops".into(), url: None },
        ]);
        assert_eq!(folders.find_by_title("Ops").unwrap().id, 1);
    }
}

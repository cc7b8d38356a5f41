use crate::app::ports::DashboardSinkPort;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;
use tokio::fs;

/// Writes exported dashboards to the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsDashboardSink;

#[async_trait]
impl DashboardSinkPort for FsDashboardSink {
    async fn write_dashboard(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, contents).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("linux").join("linux_memory_dashboard.json");

        FsDashboardSink.write_dashboard(&target, b"{}").await.unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"{}");
    }

    #[tokio::test]
    async fn test_write_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("cpu_dashboard.json");
        std::fs::write(&target, b"old").unwrap();

        FsDashboardSink.write_dashboard(&target, b"new").await.unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_write_into_file_path_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("linux");
        std::fs::write(&blocker, b"not a dir").unwrap();

        let result = FsDashboardSink
            .write_dashboard(&blocker.join("linux_dashboard.json"), b"{}")
            .await;
        assert!(matches!(result, Err(crate::error::GrafanaError::Io(_))));
    }
}

//! Real file system service implementation

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

use crate::error::{BootstrapError, BootstrapResult};
use crate::traits::FileSystem;
use shared::{process_debug, ProcessId};

/// Real file system implementation on tokio::fs
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSystem for RealFileSystem {
    async fn exists(&self, path: &Path) -> BootstrapResult<bool> {
        fs::try_exists(path)
            .await
            .map_err(|e| BootstrapError::file_system("try_exists", path, e))
    }

    async fn create_dir_all(&self, path: &Path) -> BootstrapResult<()> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| BootstrapError::file_system("create_dir_all", path, e))?;
        process_debug!(ProcessId::current(), "📁 Ensured directory {}", path.display());
        Ok(())
    }

    async fn remove_dir_all(&self, path: &Path) -> BootstrapResult<()> {
        match fs::remove_dir_all(path).await {
            Ok(()) => {
                process_debug!(ProcessId::current(), "🧹 Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BootstrapError::file_system("remove_dir_all", path, e)),
        }
    }
}

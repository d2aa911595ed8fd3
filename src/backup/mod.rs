pub(crate) mod archive; // gzip of finished dumps
pub(crate) mod db_dump; // mysqldump invocation

use async_trait::async_trait;
use std::path::PathBuf;

use crate::errors::Result;

/// Snapshot of a single table taken before it is modified.
#[async_trait]
pub trait TableBackup: Send + Sync {
    /// Returns the path of the written dump. A missing dump file is an error.
    async fn backup(&self, table: &str) -> Result<PathBuf>;
}

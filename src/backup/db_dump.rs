// tabletranslator/src/backup/db_dump.rs
use async_trait::async_trait;
use chrono::Local;
use percent_encoding::percent_decode_str;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;
use url::Url;

use super::{TableBackup, archive};
use crate::config::BackupConfig;
use crate::errors::{AppError, Result};
use crate::utils::{find_executable, validate_identifier};

/// Connection parameters handed to mysqldump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpTarget {
    pub host: String,
    pub port: Option<u16>,
    pub user: String,
    pub password: Option<String>,
    pub database: String,
}

impl DumpTarget {
    pub fn from_db_url(db_url: &str) -> Result<Self> {
        let parsed = Url::parse(db_url)?;
        let database = decode_url_part(parsed.path().trim_start_matches('/'))?;
        if database.is_empty() {
            return Err(AppError::Config(
                "Database URL does not name a database".to_string(),
            ));
        }

        Ok(Self {
            host: parsed.host_str().unwrap_or("localhost").to_string(),
            port: parsed.port(),
            user: decode_url_part(parsed.username())?,
            password: parsed.password().map(decode_url_part).transpose()?,
            database,
        })
    }
}

/// URL components come back percent-encoded; mysqldump needs the plain text.
fn decode_url_part(part: &str) -> Result<String> {
    percent_decode_str(part)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| AppError::Config(format!("Database URL is not valid UTF-8 after decoding: {}", e)))
}

/// Backs up single tables with `mysqldump`.
pub struct MysqlDumpBackup {
    executable: PathBuf,
    target: DumpTarget,
    backup_dir: PathBuf,
    compress: bool,
}

impl MysqlDumpBackup {
    pub fn new(backup_config: &BackupConfig, db_url: &str) -> Result<Self> {
        let executable = match &backup_config.mysqldump_path {
            Some(path) => path.clone(),
            None => find_executable("mysqldump").map_err(|e| AppError::Config(format!("{:#}", e)))?,
        };
        info!("Using mysqldump executable at: {}", executable.display());

        Ok(Self {
            executable,
            target: DumpTarget::from_db_url(db_url)?,
            backup_dir: backup_config.backup_dir.clone(),
            compress: backup_config.compress,
        })
    }

    fn backup_file_path(&self, table: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.backup_dir)?;
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        Ok(self.backup_dir.join(format!("{}_{}.sql", table, timestamp)))
    }

    fn run_dump(&self, table: &str, backup_file: &Path) -> Result<()> {
        let mut command = Command::new(&self.executable);
        command
            .arg("--hex-blob")
            .arg("--single-transaction")
            .arg(format!("--host={}", self.target.host))
            .arg(format!("--user={}", self.target.user))
            .arg(format!("--result-file={}", backup_file.display()));
        if let Some(port) = self.target.port {
            command.arg(format!("--port={}", port));
        }
        if let Some(password) = &self.target.password {
            // keeps the password out of the process list
            command.env("MYSQL_PWD", password);
        }
        command.arg(&self.target.database).arg(table);

        let output = command.output().map_err(|e| AppError::Backup {
            table: table.to_string(),
            reason: format!("failed to execute {}: {}", self.executable.display(), e),
        })?;

        if !output.status.success() {
            return Err(AppError::Backup {
                table: table.to_string(),
                reason: format!(
                    "mysqldump failed with status: {}\nStdout: {}\nStderr: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stdout),
                    String::from_utf8_lossy(&output.stderr)
                ),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TableBackup for MysqlDumpBackup {
    async fn backup(&self, table: &str) -> Result<PathBuf> {
        validate_identifier(table)?;
        let backup_file = self.backup_file_path(table)?;
        info!("💾 Backing up table: {} to {}", table, backup_file.display());

        self.run_dump(table, &backup_file)?;

        if !backup_file.is_file() {
            return Err(AppError::Backup {
                table: table.to_string(),
                reason: format!("backup file was not created: {}", backup_file.display()),
            });
        }

        let backup_file = if self.compress {
            archive::gzip_file(&backup_file).map_err(|e| AppError::Backup {
                table: table.to_string(),
                reason: format!("{:#}", e),
            })?
        } else {
            backup_file
        };

        info!("✓ Table {} backed up to {}", table, backup_file.display());
        Ok(backup_file)
    }
}

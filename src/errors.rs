use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("No language found for locale code '{0}'")]
    UnknownLocale(String),

    #[error("Source and target locale resolve to the same language ({0})")]
    SameLanguage(String),

    #[error("Invalid translation table name '{0}': expected a name ending in '_translation'")]
    InvalidTableName(String),

    #[error("Invalid identifier '{0}': only ASCII letters, digits and '_' are allowed")]
    InvalidIdentifier(String),

    #[error("Invalid table selection: {0}")]
    InvalidSelection(String),

    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error("Backup of table {table} failed: {reason}")]
    Backup { table: String, reason: String },

    #[error("Persisting row {parent} of {table} failed: {reason}")]
    Persistence {
        table: String,
        parent: String,
        reason: String,
    },
}

impl AppError {
    /// Setup and backup errors stop the run; a failed row write is reported and skipped.
    /// Column translation failures never become an `AppError`.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, AppError::Persistence { .. })
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

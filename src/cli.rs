use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "tabletranslator")]
#[command(version, about = "Machine-translate *_translation tables of a shop database with DeepL")]
pub struct Cli {
    /// Only translate these tables (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub tables: Vec<String>,

    /// Source locale code [default: de-DE]
    #[arg(short, long)]
    pub from: Option<String>,

    /// Target locale code, e.g. en-GB
    #[arg(short = 'T', long)]
    pub to: Option<String>,

    /// Do not back up tables before writing to them
    #[arg(long)]
    pub no_backup: bool,

    /// Translate all translation tables without asking
    #[arg(short, long)]
    pub yes: bool,

    /// JSON configuration file [default: config.json, if present]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for table dumps [default: /tmp/database-backups]
    #[arg(long)]
    pub backup_dir: Option<PathBuf>,

    /// Gzip table dumps
    #[arg(long)]
    pub compress_backup: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

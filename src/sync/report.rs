// tabletranslator/src/sync/report.rs
use std::fmt;

/// What happened to the rows of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableReport {
    pub table: String,
    pub rows: usize,
    pub updated: usize,
    pub inserted: usize,
    pub skipped: usize,
    pub row_failures: usize,
    pub columns_translated: usize,
    pub columns_already_translated: usize,
    pub column_failures: usize,
}

impl TableReport {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Self::default()
        }
    }

    pub fn writes(&self) -> usize {
        self.updated + self.inserted
    }
}

impl fmt::Display for TableReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} rows, {} updated, {} inserted, {} skipped, {} row errors; {} columns translated, {} already translated, {} column errors",
            self.table,
            self.rows,
            self.updated,
            self.inserted,
            self.skipped,
            self.row_failures,
            self.columns_translated,
            self.columns_already_translated,
            self.column_failures
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub tables: Vec<TableReport>,
}

impl RunReport {
    pub fn writes(&self) -> usize {
        self.tables.iter().map(TableReport::writes).sum()
    }

    pub fn failures(&self) -> usize {
        self.tables
            .iter()
            .map(|t| t.row_failures + t.column_failures)
            .sum()
    }
}

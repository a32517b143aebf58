// ============================================================
// Layer 4 — CSV Corpus Loader
// ============================================================
// Loads the question/SQL pairs from a headed CSV file:
//
//   question,sql
//   how many users,SELECT COUNT(*) FROM users
//   "list names, please",SELECT name FROM people
//
// Only the two configured columns are read; any others are
// ignored. Every cell becomes a String: a missing trailing
// field becomes "" rather than an error, and quoting is handled
// by the csv crate.
//
// A missing file, a missing column, or a malformed record is an
// error with context. The loader never drops rows, so the two
// corpora it returns always line up.

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

use crate::domain::corpus::ParallelCorpus;
use crate::domain::traits::CorpusSource;

pub const DEFAULT_QUESTION_COLUMN: &str = "question";
pub const DEFAULT_SQL_COLUMN: &str = "sql";

pub struct CsvLoader {
    path:            PathBuf,
    question_column: String,
    sql_column:      String,
}

impl CsvLoader {
    /// Loader for `path` using the default `question` / `sql` columns
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path:            path.into(),
            question_column: DEFAULT_QUESTION_COLUMN.to_string(),
            sql_column:      DEFAULT_SQL_COLUMN.to_string(),
        }
    }

    pub fn with_columns(mut self, question: impl Into<String>, sql: impl Into<String>) -> Self {
        self.question_column = question.into();
        self.sql_column      = sql.into();
        self
    }
}

impl CorpusSource for CsvLoader {
    fn load_corpus(&self) -> Result<ParallelCorpus> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("Cannot open CSV '{}'", self.path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("Cannot read header row of '{}'", self.path.display()))?
            .clone();

        let column = |name: &str| -> Result<usize> {
            headers.iter().position(|h| h.trim() == name).ok_or_else(|| {
                anyhow!(
                    "Column '{}' not found in '{}' (columns: {})",
                    name,
                    self.path.display(),
                    headers.iter().collect::<Vec<_>>().join(", ")
                )
            })
        };
        let q_col = column(&self.question_column)?;
        let s_col = column(&self.sql_column)?;

        let mut questions = Vec::new();
        let mut queries   = Vec::new();

        for (line, record) in reader.records().enumerate() {
            // +2: one for the header, one for 1-based numbering
            let record = record
                .with_context(|| format!("Bad CSV record at line {} of '{}'", line + 2, self.path.display()))?;

            questions.push(record.get(q_col).unwrap_or_default().to_string());
            queries.push(record.get(s_col).unwrap_or_default().to_string());
        }

        tracing::info!(
            "Loaded {} samples from '{}'",
            questions.len(),
            self.path.display()
        );

        Ok(ParallelCorpus::new(questions, queries)?)
    }
}

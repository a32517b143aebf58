// ============================================================
// Layer 3 — Pipeline Errors
// ============================================================
// The failures the preprocessing core can report. Everything
// here is detected before or during composition and aborts the
// whole run; there is no partial output.
//
// Outer layers (loader, store, CLI) use anyhow and wrap these
// with context, the same way they wrap I/O errors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// The question and query corpora must be positionally paired
    #[error("corpus length mismatch: {questions} questions but {queries} SQL queries")]
    CorpusLengthMismatch { questions: usize, queries: usize },

    #[error("validation fraction must lie strictly between 0 and 1, got {0}")]
    InvalidSplitFraction(f64),

    #[error("max length must be at least 1")]
    ZeroMaxLength,
}

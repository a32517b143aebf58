// ============================================================
// Layer 3 — ParallelCorpus Domain Type
// ============================================================
// Two positionally paired lists of raw strings:
//   questions[i]  — the natural language question
//   queries[i]    — the SQL query that answers it
//
// The only invariant is equal length. It is checked once, here,
// so nothing downstream has to re-check it or guess how to
// repair a mismatch.

use serde::{Deserialize, Serialize};

use crate::domain::error::PipelineError;

/// Which half of the pair a vocabulary or tensor belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorpusSide {
    /// Natural language questions (encoder input)
    Question,
    /// SQL queries (decoder input)
    Query,
}

impl CorpusSide {
    /// File name prefix used for this side's artifacts
    pub fn artifact_prefix(self) -> &'static str {
        match self {
            CorpusSide::Question => "input",
            CorpusSide::Query    => "output",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParallelCorpus {
    questions: Vec<String>,
    queries:   Vec<String>,
}

impl ParallelCorpus {
    /// Pair up the two corpora.
    /// Fails if their lengths differ; never truncates or pads.
    pub fn new(questions: Vec<String>, queries: Vec<String>) -> Result<Self, PipelineError> {
        if questions.len() != queries.len() {
            return Err(PipelineError::CorpusLengthMismatch {
                questions: questions.len(),
                queries:   queries.len(),
            });
        }
        Ok(Self { questions, queries })
    }

    /// An empty corpus is a valid degenerate input
    pub fn empty() -> Self {
        Self { questions: Vec::new(), queries: Vec::new() }
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

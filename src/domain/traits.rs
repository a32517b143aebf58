// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between the preprocessing core and its collaborators:
//   - CorpusSource      → where paired text comes from
//                         (CsvLoader today)
//   - PipelineObserver  → who hears about stage progress
//                         (RunReport, or nobody)
//   - Persistable       → what can be written to and read
//                         back from disk (Vocabulary)
//
// The pipeline itself only ever sees these traits.

use anyhow::Result;
use std::path::Path;

use crate::domain::corpus::ParallelCorpus;

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Any component that can supply a question/query corpus.
pub trait CorpusSource {
    /// Load the full paired corpus. Values are already coerced to strings.
    fn load_corpus(&self) -> Result<ParallelCorpus>;
}

// ─── PipelineObserver ─────────────────────────────────────────────────────────
/// Summary statistics emitted after each pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub enum StageReport {
    /// The corpus was accepted
    Loaded { examples: usize },

    /// Both vocabularies are built.
    /// Sizes count real tokens only, excluding padding and OOV.
    VocabulariesBuilt { input_size: usize, output_size: usize },

    /// Both sides are encoded and normalized to (rows, width)
    Normalized { question_shape: (usize, usize), query_shape: (usize, usize) },

    /// The train/validation partition is applied
    Split { train_shape: (usize, usize), val_shape: (usize, usize) },
}

impl StageReport {
    /// Short stable name, used as the first CSV column
    pub fn stage_name(&self) -> &'static str {
        match self {
            StageReport::Loaded { .. }            => "loaded",
            StageReport::VocabulariesBuilt { .. } => "vocabularies",
            StageReport::Normalized { .. }        => "normalized",
            StageReport::Split { .. }             => "split",
        }
    }
}

/// Receives a StageReport after every stage.
/// Observers cannot fail the run; they only watch it.
pub trait PipelineObserver {
    fn on_stage(&self, report: &StageReport);
}

/// Observer that ignores every report
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {
    fn on_stage(&self, _report: &StageReport) {}
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// Any component whose state can be saved and restored from disk.
pub trait Persistable: Sized {
    fn save(&self, path: &Path) -> Result<()>;

    fn load(path: &Path) -> Result<Self>;
}

// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Partitions N paired rows into a training set and a
// validation set:
//   - Training set:   used to fit the seq2seq model
//   - Validation set: held out to measure generalisation
//
// The partition must be identical on every run and platform,
// so it never touches thread_rng or any other unseeded source.
// Instead:
//
//   1. Seed a ChaCha8 generator from the u64 seed
//      (ChaCha output is value-stable across platforms)
//   2. Fisher-Yates shuffle the indices 0..N, drawing each
//      swap position as next_u64() % (i + 1)
//   3. The first round(N * fraction) shuffled indices go to
//      validation, the rest to training
//
// Rounding is f64::round (halves round away from zero), so
// N = 2 at 0.2 gives 0 validation rows and N = 5 at 0.5 gives 3.
//
// Both tensors are indexed with the same plan, so the question
// row and the query row of an example always land together.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::domain::error::PipelineError;
use crate::domain::tensor::SequenceTensor;

/// Default share of examples held out for validation
pub const DEFAULT_VAL_FRACTION: f64 = 0.2;

/// Default shuffle seed
pub const DEFAULT_SPLIT_SEED: u64 = 42;

/// Reject fractions outside the open interval (0, 1), including NaN
pub fn validate_fraction(val_fraction: f64) -> Result<(), PipelineError> {
    if val_fraction > 0.0 && val_fraction < 1.0 {
        Ok(())
    } else {
        Err(PipelineError::InvalidSplitFraction(val_fraction))
    }
}

/// How many of `n` examples go to validation
pub fn validation_count(n: usize, val_fraction: f64) -> usize {
    let count = ((n as f64) * val_fraction).round() as usize;
    count.min(n)
}

/// Seeded Fisher-Yates permutation of 0..n
pub fn seeded_permutation(n: usize, seed: u64) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut indices: Vec<usize> = (0..n).collect();

    for i in (1..n).rev() {
        let j = (rng.next_u64() % (i as u64 + 1)) as usize;
        indices.swap(i, j);
    }

    indices
}

// ─── SplitPlan ────────────────────────────────────────────────────────────────
/// Which corpus row indices go where.
/// Both lists are in shuffled order; together they cover 0..n exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPlan {
    pub train: Vec<usize>,
    pub val:   Vec<usize>,
}

impl SplitPlan {
    pub fn new(n: usize, val_fraction: f64, seed: u64) -> Result<Self, PipelineError> {
        validate_fraction(val_fraction)?;

        let mut permutation = seeded_permutation(n, seed);
        let n_val = validation_count(n, val_fraction);

        // split_off(k) leaves [0..k] in place and returns [k..]
        let train = permutation.split_off(n_val);
        let val   = permutation;

        tracing::debug!(
            "Dataset split: {} training, {} validation (seed {})",
            train.len(),
            val.len(),
            seed,
        );

        Ok(Self { train, val })
    }

    pub fn total(&self) -> usize {
        self.train.len() + self.val.len()
    }
}

// ─── DatasetSplit ─────────────────────────────────────────────────────────────
/// The four output tensors plus the plan that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSplit {
    pub question_train: SequenceTensor,
    pub question_val:   SequenceTensor,
    pub query_train:    SequenceTensor,
    pub query_val:      SequenceTensor,
    pub plan:           SplitPlan,
}

/// Split paired question/query tensors with one shared plan.
/// Both tensors must have the same number of rows.
pub fn split_pairs(
    questions:    &SequenceTensor,
    queries:      &SequenceTensor,
    val_fraction: f64,
    seed:         u64,
) -> Result<DatasetSplit, PipelineError> {
    if questions.rows() != queries.rows() {
        return Err(PipelineError::CorpusLengthMismatch {
            questions: questions.rows(),
            queries:   queries.rows(),
        });
    }

    let plan = SplitPlan::new(questions.rows(), val_fraction, seed)?;

    Ok(DatasetSplit {
        question_train: questions.select_rows(&plan.train),
        question_val:   questions.select_rows(&plan.val),
        query_train:    queries.select_rows(&plan.train),
        query_val:      queries.select_rows(&plan.val),
        plan,
    })
}

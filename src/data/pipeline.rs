// ============================================================
// Layer 4 — Pipeline Coordinator
// ============================================================
// Composes the preprocessing stages over a ParallelCorpus:
//
//   questions ──► VocabularyBuilder ──► SequenceEncoder ──► normalize ─┐
//                 (question rule)                                     ├─► split_pairs
//   queries   ──► VocabularyBuilder ──► SequenceEncoder ──► normalize ─┘
//                 (query rule)
//
// The two sides share nothing, so they run under rayon::join.
// The splitter waits for both (the join point) and then applies
// one plan to both tensors.
//
// The configuration is validated before any tokenization work,
// and any error aborts the whole run.

use serde::{Deserialize, Serialize};

use crate::data::{
    encoder::SequenceEncoder,
    padding::normalize_all,
    splitter::{split_pairs, validate_fraction, DatasetSplit, DEFAULT_SPLIT_SEED, DEFAULT_VAL_FRACTION},
    tokenizer::TokenRule,
    vocabulary::{VocabOrder, Vocabulary, VocabularyBuilder},
};
use crate::domain::{
    corpus::ParallelCorpus,
    error::PipelineError,
    tensor::SequenceTensor,
    traits::{PipelineObserver, StageReport},
};

/// Default fixed sequence length
pub const DEFAULT_MAX_LENGTH: usize = 30;

// ─── Pipeline Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub max_length:    usize,
    pub val_fraction:  f64,
    pub split_seed:    u64,
    pub question_rule: TokenRule,
    pub query_rule:    TokenRule,
    pub vocab_order:   VocabOrder,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_length:    DEFAULT_MAX_LENGTH,
            val_fraction:  DEFAULT_VAL_FRACTION,
            split_seed:    DEFAULT_SPLIT_SEED,
            question_rule: TokenRule::question(),
            query_rule:    TokenRule::query(),
            vocab_order:   VocabOrder::Encounter,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        validate_fraction(self.val_fraction)?;
        if self.max_length == 0 {
            return Err(PipelineError::ZeroMaxLength);
        }
        Ok(())
    }
}

/// Everything one run produces
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Vocabulary of the question side
    pub input_vocab:  Vocabulary,
    /// Vocabulary of the SQL side
    pub output_vocab: Vocabulary,
    pub split:        DatasetSplit,
}

// ─── Pipeline ─────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run every stage over `corpus`, reporting to `observer` after each one
    pub fn run(
        &self,
        corpus:   &ParallelCorpus,
        observer: &dyn PipelineObserver,
    ) -> Result<PipelineOutput, PipelineError> {
        let cfg = &self.config;
        cfg.validate()?;

        observer.on_stage(&StageReport::Loaded { examples: corpus.len() });

        let ((input_vocab, questions), (output_vocab, queries)) = rayon::join(
            || self.prepare_side(corpus.questions(), &cfg.question_rule),
            || self.prepare_side(corpus.queries(), &cfg.query_rule),
        );

        observer.on_stage(&StageReport::VocabulariesBuilt {
            input_size:  input_vocab.len(),
            output_size: output_vocab.len(),
        });
        observer.on_stage(&StageReport::Normalized {
            question_shape: questions.shape(),
            query_shape:    queries.shape(),
        });

        let split = split_pairs(&questions, &queries, cfg.val_fraction, cfg.split_seed)?;

        observer.on_stage(&StageReport::Split {
            train_shape: split.question_train.shape(),
            val_shape:   split.question_val.shape(),
        });

        Ok(PipelineOutput { input_vocab, output_vocab, split })
    }

    /// Build, encode and normalize one corpus side
    fn prepare_side(&self, texts: &[String], rule: &TokenRule) -> (Vocabulary, SequenceTensor) {
        let vocab   = VocabularyBuilder::new(rule.clone(), self.config.vocab_order).build(texts);
        let encoded = SequenceEncoder::new(&vocab).encode_all(texts);
        let tensor  = normalize_all(&encoded, self.config.max_length);
        (vocab, tensor)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::NoopObserver;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<StageReport>>,
    }

    impl PipelineObserver for Recorder {
        fn on_stage(&self, report: &StageReport) {
            self.seen.borrow_mut().push(report.clone());
        }
    }

    fn corpus(questions: &[&str], queries: &[&str]) -> ParallelCorpus {
        ParallelCorpus::new(
            questions.iter().map(|s| s.to_string()).collect(),
            queries.iter().map(|s| s.to_string()).collect(),
        )
        .unwrap()
    }

    fn sample_corpus(n: usize) -> ParallelCorpus {
        let questions: Vec<String> = (0..n).map(|i| format!("how many rows in table{i}?")).collect();
        let queries:   Vec<String> = (0..n).map(|i| format!("SELECT COUNT(*) FROM table{i}")).collect();
        ParallelCorpus::new(questions, queries).unwrap()
    }

    #[test]
    fn test_two_example_scenario() {
        let c = corpus(
            &["how many users", "select * from t"],
            &["SELECT COUNT(*) FROM users", "SELECT * FROM t"],
        );
        let out = Pipeline::default().run(&c, &NoopObserver).unwrap();

        assert_eq!(out.split.question_train.shape(), (2, 30));
        assert_eq!(out.split.query_train.shape(), (2, 30));
        assert_eq!(out.split.question_val.shape(), (0, 30));
        assert_eq!(out.split.query_val.shape(), (0, 30));

        assert!(out.split.question_train.max_value() <= out.input_vocab.max_index());
        assert!(out.split.query_train.max_value() <= out.output_vocab.max_index());
    }

    #[test]
    fn test_every_row_is_padding_or_valid_index() {
        let c   = sample_corpus(40);
        let out = Pipeline::default().run(&c, &NoopObserver).unwrap();

        for tensor in [&out.split.question_train, &out.split.question_val] {
            assert_eq!(tensor.width(), 30);
            assert!(tensor.as_slice().iter().all(|&x| x <= out.input_vocab.oov_index()));
        }
        for tensor in [&out.split.query_train, &out.split.query_val] {
            assert!(tensor.as_slice().iter().all(|&x| x <= out.output_vocab.oov_index()));
        }
        assert_eq!(out.split.question_train.rows() + out.split.question_val.rows(), 40);
        assert_eq!(out.split.question_val.rows(), 8);
    }

    #[test]
    fn test_run_is_deterministic() {
        let c = sample_corpus(30);
        let p = Pipeline::default();
        assert_eq!(p.run(&c, &NoopObserver).unwrap(), p.run(&c, &NoopObserver).unwrap());
    }

    #[test]
    fn test_matches_stage_by_stage_composition() {
        let c   = sample_corpus(12);
        let cfg = PipelineConfig::default();
        let out = Pipeline::new(cfg.clone()).run(&c, &NoopObserver).unwrap();

        let vocab = VocabularyBuilder::new(cfg.question_rule.clone(), cfg.vocab_order).build(c.questions());
        let rows  = normalize_all(&SequenceEncoder::new(&vocab).encode_all(c.questions()), cfg.max_length);
        let plan  = out.split.plan.clone();

        assert_eq!(out.input_vocab, vocab);
        assert_eq!(out.split.question_train, rows.select_rows(&plan.train));
    }

    #[test]
    fn test_empty_corpus_propagates_empty_tensors() {
        let out = Pipeline::default().run(&ParallelCorpus::empty(), &NoopObserver).unwrap();
        assert!(out.input_vocab.is_empty());
        assert_eq!(out.input_vocab.oov_index(), 1);
        assert_eq!(out.split.question_train.shape(), (0, 30));
        assert_eq!(out.split.query_val.shape(), (0, 30));
    }

    #[test]
    fn test_bad_fraction_fails_before_any_stage() {
        let cfg = PipelineConfig { val_fraction: 1.0, ..Default::default() };
        let rec = Recorder::default();
        let err = Pipeline::new(cfg).run(&sample_corpus(5), &rec).unwrap_err();
        assert_eq!(err, PipelineError::InvalidSplitFraction(1.0));
        assert!(rec.seen.borrow().is_empty());
    }

    #[test]
    fn test_zero_max_length_rejected() {
        let cfg = PipelineConfig { max_length: 0, ..Default::default() };
        assert_eq!(cfg.validate(), Err(PipelineError::ZeroMaxLength));
    }

    #[test]
    fn test_observer_sees_every_stage() {
        let rec = Recorder::default();
        Pipeline::default().run(&sample_corpus(10), &rec).unwrap();

        let seen  = rec.seen.borrow();
        let names: Vec<&str> = seen.iter().map(|r| r.stage_name()).collect();
        assert_eq!(names, vec!["loaded", "vocabularies", "normalized", "split"]);
        assert_eq!(seen[0], StageReport::Loaded { examples: 10 });
        assert_eq!(
            seen[3],
            StageReport::Split { train_shape: (8, 30), val_shape: (2, 30) }
        );
    }

    #[test]
    fn test_all_punctuation_question_is_all_padding() {
        let c   = corpus(&["???"], &["SELECT 1"]);
        let out = Pipeline::default().run(&c, &NoopObserver).unwrap();
        assert_eq!(out.split.question_train.row(0).unwrap(), &[0u32; 30][..]);
    }

    #[test]
    fn test_config_serde_fills_defaults() {
        let cfg: PipelineConfig = serde_json::from_str(r#"{"max_length": 12}"#).unwrap();
        assert_eq!(cfg.max_length, 12);
        assert_eq!(cfg.split_seed, 42);
        assert_eq!(cfg.query_rule, TokenRule::query());
    }
}

// ============================================================
// Layer 2 — PreprocessUseCase
// ============================================================
// Runs one full preprocessing job in order:
//
//   Step 1: Validate configuration     (Layer 4 - data)
//   Step 2: Load question/SQL pairs    (Layer 4 - data)
//   Step 3: Run the pipeline           (Layer 4 - data)
//   Step 4: Check tokenizer export     (Layer 6 - infra)
//   Step 5: Save split tensors         (Layer 6 - infra)
//   Step 6: Save vocabularies          (Layer 6 - infra)
//   Step 7: Save config                (Layer 6 - infra)
//
// Nothing is written until the pipeline has succeeded and both
// vocabularies are known to export, so a failed run leaves no
// partial artifacts behind (the report CSV is the one exception:
// it logs progress as it goes).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    loader::{CsvLoader, DEFAULT_QUESTION_COLUMN, DEFAULT_SQL_COLUMN},
    pipeline::{Pipeline, PipelineConfig, PipelineOutput},
};
use crate::domain::{corpus::CorpusSide, traits::CorpusSource};
use crate::infra::{
    artifact_store::ArtifactStore,
    report::RunReport,
    vocab_store::{tokenizer_json, VocabularyStore},
};

// ─── Preprocess Configuration ────────────────────────────────────────────────
// Everything a run needs. Serialisable so it can be saved beside
// the artifacts and reloaded by `encode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    pub data_path:       String,
    pub out_dir:         String,
    pub question_column: String,
    pub sql_column:      String,
    pub pipeline:        PipelineConfig,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            data_path:       "data/train.csv".to_string(),
            out_dir:         "processed_data".to_string(),
            question_column: DEFAULT_QUESTION_COLUMN.to_string(),
            sql_column:      DEFAULT_SQL_COLUMN.to_string(),
            pipeline:        PipelineConfig::default(),
        }
    }
}

impl PreprocessConfig {
    /// Read a config previously written by ArtifactStore::save_config (or by hand)
    pub fn from_json_file(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config '{}'", path))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Cannot parse config '{}'", path))
    }
}

// ─── PreprocessUseCase ────────────────────────────────────────────────────────
pub struct PreprocessUseCase {
    config: PreprocessConfig,
}

impl PreprocessUseCase {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Execute the full preprocessing job end to end
    pub fn execute(&self) -> Result<PipelineOutput> {
        let cfg = &self.config;

        // ── Step 1: Fail fast on bad settings ─────────────────────────────────
        cfg.pipeline.validate()?;

        // ── Step 2: Load the corpus ───────────────────────────────────────────
        tracing::info!("Loading data from '{}'", cfg.data_path);
        let loader = CsvLoader::new(&cfg.data_path)
            .with_columns(&cfg.question_column, &cfg.sql_column);
        let corpus = loader.load_corpus()?;

        // ── Step 3: Tokenize, pad, split ──────────────────────────────────────
        let report = RunReport::new(&cfg.out_dir)?;
        let output = Pipeline::new(cfg.pipeline.clone())
            .run(&corpus, &report)
            .context("Preprocessing pipeline failed")?;

        // ── Step 4: Reserved-token collisions fail before any file ────────────
        tokenizer_json(&output.input_vocab).context("Question vocabulary cannot be exported")?;
        tokenizer_json(&output.output_vocab).context("SQL vocabulary cannot be exported")?;

        // ── Step 5–7: Persist ─────────────────────────────────────────────────
        let artifacts = ArtifactStore::create(&cfg.out_dir)?;
        artifacts.save_split(&output.split)?;

        let vocabs = VocabularyStore::new(&cfg.out_dir);
        vocabs.save(CorpusSide::Question, &output.input_vocab)?;
        vocabs.save(CorpusSide::Query, &output.output_vocab)?;

        artifacts.save_config(cfg)?;

        tracing::info!("All preprocessing stages complete. Data saved to '{}'", cfg.out_dir);
        Ok(output)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tokenizer::TokenRule;
    use std::{fs, path::PathBuf};

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("nl2sql_prep_usecase_{}_{}", name, std::process::id()));
        fs::remove_dir_all(&dir).ok();
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_corpus(dir: &PathBuf, rows: usize) -> String {
        let mut csv = String::from("question,sql\n");
        for i in 0..rows {
            csv.push_str(&format!("how many rows in t{i}?,SELECT COUNT(*) FROM t{i}\n"));
        }
        let path = dir.join("train.csv");
        fs::write(&path, csv).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_execute_writes_every_artifact() {
        let dir = scratch("full");
        let cfg = PreprocessConfig {
            data_path: write_corpus(&dir, 10),
            out_dir:   dir.join("out").to_string_lossy().into_owned(),
            ..Default::default()
        };

        let output = PreprocessUseCase::new(cfg.clone()).execute().unwrap();
        assert_eq!(output.split.question_train.shape(), (8, 30));
        assert_eq!(output.split.query_val.shape(), (2, 30));

        let out = dir.join("out");
        for file in [
            "encoder_input_train.json",
            "encoder_input_val.json",
            "decoder_input_train.json",
            "decoder_input_val.json",
            "input_vocab.json",
            "output_vocab.json",
            "input_tokenizer.json",
            "output_tokenizer.json",
            "preprocess_config.json",
            "preprocess_report.csv",
        ] {
            assert!(out.join(file).exists(), "missing {file}");
        }

        let store = ArtifactStore::open(&out);
        assert_eq!(store.load_config().unwrap(), cfg);
        assert_eq!(store.load_split().unwrap().query_train, output.split.query_train);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_reserved_token_leaves_no_tensors() {
        let dir = scratch("reserved");
        let csv = dir.join("train.csv");
        fs::write(&csv, "question,sql\nwhat is missing,SELECT <OOV> FROM t\n").unwrap();

        let mut cfg = PreprocessConfig {
            data_path: csv.to_string_lossy().into_owned(),
            out_dir:   dir.join("out").to_string_lossy().into_owned(),
            ..Default::default()
        };
        cfg.pipeline.query_rule = TokenRule::new("", false);

        let err = PreprocessUseCase::new(cfg).execute().unwrap_err();
        assert!(format!("{err:#}").contains("reserved"));

        let out = dir.join("out");
        for file in ["encoder_input_train.json", "output_vocab.json", "preprocess_config.json"] {
            assert!(!out.join(file).exists(), "unexpected {file}");
        }

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_bad_fraction_fails_before_loading() {
        let mut cfg = PreprocessConfig::default();
        cfg.data_path = "no/such/file.csv".to_string();
        cfg.pipeline.val_fraction = 0.0;

        let err = PreprocessUseCase::new(cfg).execute().unwrap_err();
        assert!(err.to_string().contains("validation fraction"));
    }

    #[test]
    fn test_config_json_partial_override() {
        let dir  = scratch("cfg");
        let path = dir.join("cfg.json");
        fs::write(&path, r#"{"out_dir": "elsewhere", "pipeline": {"split_seed": 7}}"#).unwrap();

        let cfg = PreprocessConfig::from_json_file(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.out_dir, "elsewhere");
        assert_eq!(cfg.pipeline.split_seed, 7);
        assert_eq!(cfg.pipeline.max_length, 30);
        assert_eq!(cfg.data_path, "data/train.csv");

        fs::remove_dir_all(&dir).ok();
    }
}

// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Saves and restores the tensors and run configuration that a
// preprocessing run produces.
//
// File layout:
//   processed_data/
//     encoder_input_train.json   ← question rows, training split
//     encoder_input_val.json     ← question rows, validation split
//     decoder_input_train.json   ← SQL rows, training split
//     decoder_input_val.json     ← SQL rows, validation split
//     preprocess_config.json     ← the PreprocessConfig used
//
// Each tensor file is {"rows": R, "width": W, "data": [...]},
// row-major. The config is saved so a later `encode` call can
// rebuild the exact same tokenization and length settings.
//
// Vocabularies are written by VocabularyStore into the same dir.

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{fs, path::PathBuf};

use crate::application::preprocess_use_case::PreprocessConfig;
use crate::data::splitter::DatasetSplit;
use crate::domain::tensor::SequenceTensor;

pub const ENCODER_INPUT_TRAIN: &str = "encoder_input_train.json";
pub const ENCODER_INPUT_VAL:   &str = "encoder_input_val.json";
pub const DECODER_INPUT_TRAIN: &str = "decoder_input_train.json";
pub const DECODER_INPUT_VAL:   &str = "decoder_input_val.json";
pub const CONFIG_FILE:         &str = "preprocess_config.json";

/// The four split tensors read back from disk
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSplit {
    pub question_train: SequenceTensor,
    pub question_val:   SequenceTensor,
    pub query_train:    SequenceTensor,
    pub query_val:      SequenceTensor,
}

pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Point at `dir` without touching the filesystem (for reading)
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Point at `dir`, creating it (and parents) if needed
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Write all four tensors of a split
    pub fn save_split(&self, split: &DatasetSplit) -> Result<()> {
        self.save_tensor(ENCODER_INPUT_TRAIN, &split.question_train)?;
        self.save_tensor(ENCODER_INPUT_VAL,   &split.question_val)?;
        self.save_tensor(DECODER_INPUT_TRAIN, &split.query_train)?;
        self.save_tensor(DECODER_INPUT_VAL,   &split.query_val)?;

        tracing::info!(
            "Saved tensors to '{}' (train {:?}, val {:?})",
            self.dir.display(),
            split.question_train.shape(),
            split.question_val.shape(),
        );
        Ok(())
    }

    /// Read all four tensors back
    pub fn load_split(&self) -> Result<StoredSplit> {
        Ok(StoredSplit {
            question_train: self.load_tensor(ENCODER_INPUT_TRAIN)?,
            question_val:   self.load_tensor(ENCODER_INPUT_VAL)?,
            query_train:    self.load_tensor(DECODER_INPUT_TRAIN)?,
            query_val:      self.load_tensor(DECODER_INPUT_VAL)?,
        })
    }

    pub fn save_tensor(&self, name: &str, tensor: &SequenceTensor) -> Result<()> {
        self.write_json(name, tensor)
    }

    pub fn load_tensor(&self, name: &str) -> Result<SequenceTensor> {
        self.read_json(name)
    }

    /// Save the run configuration next to the artifacts
    pub fn save_config(&self, cfg: &PreprocessConfig) -> Result<()> {
        self.write_json(CONFIG_FILE, cfg)?;
        tracing::debug!("Saved preprocess config to '{}'", self.dir.join(CONFIG_FILE).display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<PreprocessConfig> {
        self.read_json(CONFIG_FILE).with_context(|| {
            format!(
                "Cannot load config from '{}'. Have you run 'preprocess' first?",
                self.dir.display()
            )
        })
    }

    fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.dir.join(name);
        let json = serde_json::to_string(value)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Cannot parse '{}'", path.display()))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::splitter::split_pairs;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("nl2sql_prep_artifacts_{}_{}", name, std::process::id()));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        dir
    }

    #[test]
    fn test_split_survives_save_and_load() {
        let dir   = test_dir("split");
        let store = ArtifactStore::create(&dir).unwrap();

        let q     = SequenceTensor::from_rows(3, (0..6).map(|i| vec![i, 0, 0]));
        let s     = SequenceTensor::from_rows(3, (0..6).map(|i| vec![100 + i, 1, 0]));
        let split = split_pairs(&q, &s, 0.2, 42).unwrap();

        store.save_split(&split).unwrap();
        let back = store.load_split().unwrap();

        assert_eq!(back.question_train, split.question_train);
        assert_eq!(back.query_val, split.query_val);
        assert!(dir.join(ENCODER_INPUT_VAL).exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_config_survives_save_and_load() {
        let dir   = test_dir("config");
        let store = ArtifactStore::create(&dir).unwrap();
        let mut cfg = PreprocessConfig::default();
        cfg.pipeline.max_length = 12;

        store.save_config(&cfg).unwrap();
        assert_eq!(store.load_config().unwrap(), cfg);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_config_mentions_preprocess() {
        let store = ArtifactStore::open(test_dir("missing"));
        let err   = store.load_config().unwrap_err();
        assert!(format!("{err:#}").contains("preprocess"));
    }
}

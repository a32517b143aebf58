// ============================================================
// Layer 6 — Vocabulary Store
// ============================================================
// Persists the two vocabularies in two formats:
//
//   input_vocab.json / output_vocab.json
//     The native Vocabulary (rule, tokens in index order,
//     counts). This is what `encode` reloads.
//
//   input_tokenizer.json / output_tokenizer.json
//     A HuggingFace `tokenizers` WordLevel tokenizer built from
//     the same vocabulary. Its normalizer replays the TokenRule
//     (Lowercase, then one Replace → " " per stripped char) and
//     its pre-tokenizer is WhitespaceSplit, so
//     Tokenizer::encode gives the same ids as SequenceEncoder.
//     Unknown words map to <OOV>; <PAD> holds index 0.

use anyhow::{anyhow, Context, Result};
use std::{fs, path::{Path, PathBuf}};
use tokenizers::Tokenizer;

use crate::data::vocabulary::{Vocabulary, OOV_TOKEN, PAD_INDEX, PAD_TOKEN};
use crate::domain::corpus::CorpusSide;
use crate::domain::traits::Persistable;

impl Persistable for Vocabulary {
    fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write vocabulary '{}'", path.display()))
    }

    fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read vocabulary '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Cannot parse vocabulary '{}'", path.display()))
    }
}

pub struct VocabularyStore {
    dir: PathBuf,
}

impl VocabularyStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn vocab_path(&self, side: CorpusSide) -> PathBuf {
        self.dir.join(format!("{}_vocab.json", side.artifact_prefix()))
    }

    pub fn tokenizer_path(&self, side: CorpusSide) -> PathBuf {
        self.dir.join(format!("{}_tokenizer.json", side.artifact_prefix()))
    }

    /// Write both the native vocabulary and the HuggingFace export
    pub fn save(&self, side: CorpusSide, vocab: &Vocabulary) -> Result<()> {
        vocab.save(&self.vocab_path(side))?;

        let tok_path = self.tokenizer_path(side);
        let json     = tokenizer_json(vocab)?;
        fs::write(&tok_path, serde_json::to_string_pretty(&json)?)
            .with_context(|| format!("Cannot write tokenizer '{}'", tok_path.display()))?;

        tracing::info!(
            "{:?} vocabulary: {} tokens (oov index {}) saved to '{}'",
            side,
            vocab.len(),
            vocab.oov_index(),
            self.dir.display()
        );
        Ok(())
    }

    pub fn load(&self, side: CorpusSide) -> Result<Vocabulary> {
        Vocabulary::load(&self.vocab_path(side))
    }

    /// Load the exported HuggingFace tokenizer for one side
    pub fn load_tokenizer(&self, side: CorpusSide) -> Result<Tokenizer> {
        let path = self.tokenizer_path(side);
        Tokenizer::from_file(&path)
            .map_err(|e| anyhow!("Cannot load tokenizer from '{}': {}", path.display(), e))
    }
}

/// Build a HuggingFace WordLevel tokenizer JSON that reproduces `vocab`.
/// Fails if a real token collides with the <PAD> or <OOV> names.
pub fn tokenizer_json(vocab: &Vocabulary) -> Result<serde_json::Value> {
    for reserved in [PAD_TOKEN, OOV_TOKEN] {
        if vocab.index_of(reserved).is_some() {
            return Err(anyhow!(
                "Token '{}' is reserved and cannot be exported as a real token",
                reserved
            ));
        }
    }

    let mut model_vocab = serde_json::Map::new();
    model_vocab.insert(PAD_TOKEN.to_string(), PAD_INDEX.into());
    for (token, index) in vocab.iter() {
        model_vocab.insert(token.to_string(), index.into());
    }
    model_vocab.insert(OOV_TOKEN.to_string(), vocab.oov_index().into());

    let rule = vocab.rule();
    let mut normalizers = Vec::new();
    if rule.lowercase {
        normalizers.push(serde_json::json!({ "type": "Lowercase" }));
    }
    for c in rule.strip.chars() {
        normalizers.push(serde_json::json!({
            "type":    "Replace",
            "pattern": { "String": c.to_string() },
            "content": " "
        }));
    }
    let normalizer = if normalizers.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::json!({ "type": "Sequence", "normalizers": normalizers })
    };

    Ok(serde_json::json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": normalizer,
        "pre_tokenizer": { "type": "WhitespaceSplit" },
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": model_vocab,
            "unk_token": OOV_TOKEN
        }
    }))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::encoder::SequenceEncoder;
    use crate::data::tokenizer::TokenRule;
    use crate::data::vocabulary::{VocabOrder, VocabularyBuilder};

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("nl2sql_prep_vocab_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_vocabulary_survives_save_and_load() {
        let dir   = test_dir("native");
        let store = VocabularyStore::new(&dir);
        let vocab = VocabularyBuilder::new(TokenRule::query(), VocabOrder::Frequency)
            .build(&["SELECT * FROM t", "SELECT a FROM b"]);

        store.save(CorpusSide::Query, &vocab).unwrap();
        assert!(dir.join("output_vocab.json").exists());
        assert!(dir.join("output_tokenizer.json").exists());
        assert_eq!(store.load(CorpusSide::Query).unwrap(), vocab);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_exported_tokenizer_matches_encoder() {
        let dir   = test_dir("hf");
        let store = VocabularyStore::new(&dir);
        let vocab = VocabularyBuilder::new(TokenRule::question(), VocabOrder::Encounter)
            .build(&["How many users?", "list the users, by name", "ΟΔΟΣ users"]);
        store.save(CorpusSide::Question, &vocab).unwrap();

        let tokenizer = store.load_tokenizer(CorpusSide::Question).unwrap();
        let encoder   = SequenceEncoder::new(&vocab);

        for text in ["how many users", "List ZEBRAS, by name!", "first-name?", "ΟΔΟΣ users"] {
            let hf = tokenizer.encode(text, false).unwrap();
            assert_eq!(hf.get_ids(), encoder.encode(text).as_slice(), "text: {text}");
        }
        assert!(!encoder.encode("ΟΔΟΣ users").contains(&vocab.oov_index()));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_export_has_pad_and_oov() {
        let vocab = VocabularyBuilder::new(TokenRule::query(), VocabOrder::Encounter)
            .build(&["SELECT 1"]);
        let json  = tokenizer_json(&vocab).unwrap();
        assert_eq!(json["model"]["vocab"]["<PAD>"], 0);
        assert_eq!(json["model"]["vocab"]["<OOV>"], 3);
        assert_eq!(json["model"]["vocab"]["select"], 1);
    }

    #[test]
    fn test_reserved_token_collision_rejected() {
        let vocab = VocabularyBuilder::new(TokenRule::new("", false), VocabOrder::Encounter)
            .build(&["<OOV> x"]);
        assert!(tokenizer_json(&vocab).is_err());
    }
}

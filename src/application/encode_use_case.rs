// ============================================================
// Layer 2 — EncodeUseCase
// ============================================================
// Encodes new text with the artifacts of an earlier
// `preprocess` run, e.g. a question typed into a chatbot:
//
//   1. Load preprocess_config.json  → max_length
//   2. Load the side's vocabulary   → rule + indices
//   3. Encode, then pad / truncate
//
// The result matches what the same text would have become
// inside the training tensors.

use anyhow::Result;

use crate::data::{encoder::SequenceEncoder, padding::normalize, vocabulary::Vocabulary};
use crate::domain::corpus::CorpusSide;
use crate::infra::{artifact_store::ArtifactStore, vocab_store::VocabularyStore};

pub struct EncodeUseCase {
    max_length:   usize,
    input_vocab:  Vocabulary,
    output_vocab: Vocabulary,
}

impl EncodeUseCase {
    pub fn new(artifacts_dir: &str) -> Result<Self> {
        let config = ArtifactStore::open(artifacts_dir).load_config()?;
        let vocabs = VocabularyStore::new(artifacts_dir);

        Ok(Self {
            max_length:   config.pipeline.max_length,
            input_vocab:  vocabs.load(CorpusSide::Question)?,
            output_vocab: vocabs.load(CorpusSide::Query)?,
        })
    }

    pub fn vocabulary(&self, side: CorpusSide) -> &Vocabulary {
        match side {
            CorpusSide::Question => &self.input_vocab,
            CorpusSide::Query    => &self.output_vocab,
        }
    }

    /// Encode and normalize `text` for the given side
    pub fn encode(&self, side: CorpusSide, text: &str) -> Vec<u32> {
        let ids = SequenceEncoder::new(self.vocabulary(side)).encode(text);
        normalize(&ids, self.max_length)
    }

    /// Tokens an index row stands for (padding dropped)
    pub fn decode(&self, side: CorpusSide, ids: &[u32]) -> Vec<String> {
        self.vocabulary(side).decode(ids)
    }
}

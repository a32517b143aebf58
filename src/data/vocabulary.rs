// ============================================================
// Layer 4 — Vocabulary Builder
// ============================================================
// Scans a corpus and gives every distinct token an index.
//
// Index layout for a vocabulary with K real tokens:
//
//   0        padding, never a real token
//   1..=K    real tokens
//   K + 1    OOV sentinel, for tokens never seen while building
//
// Two orderings are supported:
//   Encounter  — index follows first appearance in corpus order
//   Frequency  — most frequent token first, ties broken by
//                first appearance
//
// Both are deterministic: the same corpus in the same order
// always yields the same indices. Nothing else is guaranteed
// between different corpora.
//
// A built Vocabulary is immutable and carries the TokenRule it
// was built with.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::data::tokenizer::TokenRule;

/// Value used to fill unused positions of a normalized sequence
pub const PAD_INDEX: u32 = 0;

/// How the OOV index is rendered when decoding or exporting
pub const OOV_TOKEN: &str = "<OOV>";

/// How the padding index is rendered when exporting
pub const PAD_TOKEN: &str = "<PAD>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabOrder {
    #[default]
    Encounter,
    Frequency,
}

// ─── Vocabulary ───────────────────────────────────────────────────────────────
/// Token ↔ index mapping for one corpus side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VocabularyRecord", into = "VocabularyRecord")]
pub struct Vocabulary {
    rule:   TokenRule,
    /// tokens[i] has index i + 1
    tokens: Vec<String>,
    /// counts[i] is how often tokens[i] occurred in the corpus
    counts: Vec<u64>,
    index:  HashMap<String, u32>,
}

impl Vocabulary {
    fn from_parts(rule: TokenRule, tokens: Vec<String>, counts: Vec<u64>) -> Result<Self, String> {
        if tokens.len() != counts.len() {
            return Err(format!(
                "vocabulary has {} tokens but {} counts",
                tokens.len(),
                counts.len()
            ));
        }

        let mut index = HashMap::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            if index.insert(token.clone(), i as u32 + 1).is_some() {
                return Err(format!("duplicate token '{}' in vocabulary", token));
            }
        }

        Ok(Self { rule, tokens, counts, index })
    }

    /// The rule every string must be tokenized with for this vocabulary
    pub fn rule(&self) -> &TokenRule {
        &self.rule
    }

    /// Number of real tokens (padding and OOV not included)
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when the vocabulary holds only the OOV sentinel
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Index reserved for unseen tokens: highest real index + 1
    pub fn oov_index(&self) -> u32 {
        self.tokens.len() as u32 + 1
    }

    /// Largest index this vocabulary can produce (the OOV sentinel)
    pub fn max_index(&self) -> u32 {
        self.oov_index()
    }

    /// Index of a known token
    pub fn index_of(&self, token: &str) -> Option<u32> {
        self.index.get(token).copied()
    }

    /// Index of a token, falling back to the OOV sentinel
    pub fn lookup(&self, token: &str) -> u32 {
        self.index_of(token).unwrap_or_else(|| self.oov_index())
    }

    /// The real token stored at `index`, if any
    pub fn token(&self, index: u32) -> Option<&str> {
        if index == PAD_INDEX {
            return None;
        }
        self.tokens.get(index as usize - 1).map(String::as_str)
    }

    /// How many times `token` occurred while building
    pub fn count(&self, token: &str) -> Option<u64> {
        self.index_of(token).map(|i| self.counts[i as usize - 1])
    }

    /// (token, index) pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i as u32 + 1))
    }

    /// Turn indices back into tokens.
    /// Padding and out-of-range indices are skipped; OOV renders as `<OOV>`.
    pub fn decode(&self, ids: &[u32]) -> Vec<String> {
        ids.iter()
            .filter_map(|&id| {
                if id == self.oov_index() {
                    Some(OOV_TOKEN.to_string())
                } else {
                    self.token(id).map(str::to_string)
                }
            })
            .collect()
    }
}

/// On-disk shape of a Vocabulary: the lookup map is rebuilt on load.
#[derive(Serialize, Deserialize)]
struct VocabularyRecord {
    rule:   TokenRule,
    tokens: Vec<String>,
    counts: Vec<u64>,
}

impl From<Vocabulary> for VocabularyRecord {
    fn from(v: Vocabulary) -> Self {
        Self { rule: v.rule, tokens: v.tokens, counts: v.counts }
    }
}

impl TryFrom<VocabularyRecord> for Vocabulary {
    type Error = String;

    fn try_from(r: VocabularyRecord) -> Result<Self, Self::Error> {
        Vocabulary::from_parts(r.rule, r.tokens, r.counts)
    }
}

// ─── VocabularyBuilder ────────────────────────────────────────────────────────
/// Builds a Vocabulary from a corpus with a fixed rule and ordering.
#[derive(Debug, Clone)]
pub struct VocabularyBuilder {
    rule:  TokenRule,
    order: VocabOrder,
}

impl VocabularyBuilder {
    pub fn new(rule: TokenRule, order: VocabOrder) -> Self {
        Self { rule, order }
    }

    /// Tokenize every string in corpus order and assign indices.
    pub fn build<S: AsRef<str>>(&self, corpus: &[S]) -> Vocabulary {
        let mut slots:  HashMap<String, usize> = HashMap::new();
        let mut tokens: Vec<String>            = Vec::new();
        let mut counts: Vec<u64>               = Vec::new();

        for text in corpus {
            for token in self.rule.tokenize(text.as_ref()) {
                match slots.get(&token) {
                    Some(&slot) => counts[slot] += 1,
                    None => {
                        slots.insert(token.clone(), tokens.len());
                        tokens.push(token);
                        counts.push(1);
                    }
                }
            }
        }

        if self.order == VocabOrder::Frequency {
            // sort_by is stable, so equal counts keep first-seen order
            let mut order: Vec<usize> = (0..tokens.len()).collect();
            order.sort_by(|&a, &b| counts[b].cmp(&counts[a]));

            let reordered_tokens = order.iter().map(|&i| tokens[i].clone()).collect();
            let reordered_counts = order.iter().map(|&i| counts[i]).collect();
            tokens = reordered_tokens;
            counts = reordered_counts;
        }

        tracing::debug!(
            "Built vocabulary: {} tokens, oov index {}",
            tokens.len(),
            tokens.len() + 1
        );

        Self::assemble(self.rule.clone(), tokens, counts)
    }

    fn assemble(rule: TokenRule, tokens: Vec<String>, counts: Vec<u64>) -> Vocabulary {
        let index = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i as u32 + 1))
            .collect();
        Vocabulary { rule, tokens, counts, index }
    }
}

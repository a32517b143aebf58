// ============================================================
// Layer 4 — Sequence Encoder
// ============================================================
// Maps a string to the indices of its tokens:
//
//   "how many zebras"  →  ["how", "many", "zebras"]  →  [1, 2, OOV]
//
// Tokenization uses the rule stored in the vocabulary, so the
// encoder can never disagree with the builder that produced it.
// The output has one index per token, in token order; it is not
// padded here (see padding.rs).

use crate::data::vocabulary::Vocabulary;

pub struct SequenceEncoder<'a> {
    vocab: &'a Vocabulary,
}

impl<'a> SequenceEncoder<'a> {
    pub fn new(vocab: &'a Vocabulary) -> Self {
        Self { vocab }
    }

    /// Encode one string. Unknown tokens map to the OOV index.
    pub fn encode(&self, text: &str) -> Vec<u32> {
        self.vocab
            .rule()
            .tokenize(text)
            .iter()
            .map(|token| self.vocab.lookup(token))
            .collect()
    }

    /// Encode every string of a corpus, preserving order
    pub fn encode_all<S: AsRef<str>>(&self, corpus: &[S]) -> Vec<Vec<u32>> {
        corpus.iter().map(|text| self.encode(text.as_ref())).collect()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tokenizer::TokenRule;
    use crate::data::vocabulary::{VocabOrder, VocabularyBuilder};

    fn question_vocab() -> Vocabulary {
        VocabularyBuilder::new(TokenRule::question(), VocabOrder::Encounter)
            .build(&["how many users", "select * from t"])
    }

    #[test]
    fn test_known_tokens_in_order() {
        let vocab   = question_vocab();
        let encoder = SequenceEncoder::new(&vocab);
        // how=1 many=2 users=3 select=4 from=5 t=6
        assert_eq!(encoder.encode("users from t"), vec![3, 5, 6]);
    }

    #[test]
    fn test_unknown_tokens_map_to_oov() {
        let vocab   = question_vocab();
        let encoder = SequenceEncoder::new(&vocab);
        let ids     = encoder.encode("how many zebras");
        assert_eq!(ids, vec![1, 2, vocab.oov_index()]);
        assert_eq!(vocab.oov_index(), 7);
    }

    #[test]
    fn test_length_equals_token_count() {
        let vocab   = question_vocab();
        let encoder = SequenceEncoder::new(&vocab);
        let text    = "How, many... USERS?";
        assert_eq!(encoder.encode(text).len(), vocab.rule().tokenize(text).len());
        assert_eq!(encoder.encode(text), vec![1, 2, 3]);
    }

    #[test]
    fn test_zero_tokens_gives_empty_sequence() {
        let vocab   = question_vocab();
        let encoder = SequenceEncoder::new(&vocab);
        assert!(encoder.encode("?!?").is_empty());
    }

    #[test]
    fn test_encode_all_keeps_corpus_order() {
        let vocab   = question_vocab();
        let encoder = SequenceEncoder::new(&vocab);
        let out     = encoder.encode_all(&["t", "how"]);
        assert_eq!(out, vec![vec![6], vec![1]]);
    }
}

// ============================================================
// Layer 4 — Tokenization Rule
// ============================================================
// Turns a raw string into word tokens. A rule has two knobs:
//
//   strip      — characters that are removed from the text.
//                Each one is replaced by a space, so it also
//                acts as a delimiter: "users?" → "users",
//                "first-name" → "first", "name".
//   lowercase  — fold case before splitting, one char at a
//                time (no context rules such as final sigma),
//                so "ΟΔΟΣ" → "οδοσ".
//
// After stripping, the text is split on whitespace and empty
// pieces are dropped.
//
// Two presets exist, one per corpus side:
//
//   question()  strips ASCII punctuation except the apostrophe,
//               plus tab and newline.
//               "How many users?" → ["how", "many", "users"]
//
//   query()     strips nothing, so SQL punctuation stays inside
//               the tokens.
//               "SELECT COUNT(*) FROM t" → ["select", "count(*)", "from", "t"]
//
// A rule is a plain immutable value. Each Vocabulary keeps the
// rule it was built with, so encoding later uses the same one.

use serde::{Deserialize, Serialize};

/// Characters stripped from the question side.
/// The apostrophe is intentionally absent so "don't" stays one token.
pub const QUESTION_STRIP_CHARS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRule {
    /// Every char in this string is treated as a delimiter
    pub strip: String,

    /// Lowercase the text before splitting
    pub lowercase: bool,
}

impl TokenRule {
    pub fn new(strip: impl Into<String>, lowercase: bool) -> Self {
        Self { strip: strip.into(), lowercase }
    }

    /// Natural language side: drop punctuation
    pub fn question() -> Self {
        Self::new(QUESTION_STRIP_CHARS, true)
    }

    /// SQL side: keep every character
    pub fn query() -> Self {
        Self::new("", true)
    }

    /// Split `text` into tokens according to this rule
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let folded: String = if self.lowercase {
            text.chars().flat_map(char::to_lowercase).collect()
        } else {
            text.to_string()
        };

        let cleaned: String = if self.strip.is_empty() {
            folded
        } else {
            folded
                .chars()
                .map(|c| if self.strip.contains(c) { ' ' } else { c })
                .collect()
        };

        cleaned.split_whitespace().map(str::to_string).collect()
    }
}

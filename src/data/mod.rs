// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from raw question/SQL text to index tensors.
//
//   train.csv
//       │
//       ▼
//   CsvLoader          → reads the question and sql columns
//       │
//       ▼
//   TokenRule          → splits text into tokens (per side)
//       │
//       ▼
//   VocabularyBuilder  → assigns token indices, reserves OOV
//       │
//       ▼
//   SequenceEncoder    → text → index sequence
//       │
//       ▼
//   normalize          → pad / truncate to MAX_LENGTH
//       │
//       ▼
//   split_pairs        → seeded 80/20 train / validation split
//       │
//       ▼
//   SqlPairDataset     → Burn Dataset over a split
//       │
//       ▼
//   SqlPairBatcher     → stacks samples into tensor batches
//
// Pipeline (pipeline.rs) wires the middle stages together.

/// Reads paired corpora from CSV
pub mod loader;

/// Per-side tokenization rules
pub mod tokenizer;

/// Vocabulary type and builder
pub mod vocabulary;

/// Text → index sequence
pub mod encoder;

/// Fixed-length padding and truncation
pub mod padding;

/// Deterministic train/validation split
pub mod splitter;

/// Stage composition over both corpus sides
pub mod pipeline;

/// Implements Burn's Dataset trait for question/SQL pairs
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the output directory:
//
//   artifact_store.rs  — Split tensors and run config as JSON.
//                        The config is reloaded by `encode` so it
//                        tokenizes exactly as `preprocess` did.
//
//   vocab_store.rs     — Vocabulary persistence, plus a HuggingFace
//                        WordLevel tokenizer export of each side
//                        for downstream consumers.
//
//   report.rs          — PipelineObserver that logs each stage and
//                        appends it to preprocess_report.csv.

/// Tensor and config persistence
pub mod artifact_store;

/// Vocabulary saving, loading, and tokenizer export
pub mod vocab_store;

/// Stage statistics logger
pub mod report;

// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflow coordination only: load, run the pipeline, persist.
// No tokenization logic here (Layer 4) and no printing (Layer 1).

// The full preprocessing job
pub mod preprocess_use_case;

// Encoding new text with saved artifacts
pub mod encode_use_case;

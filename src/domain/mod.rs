// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums, and traits that define what the
// preprocessing pipeline works with.
//
// Rules for this layer:
//   - NO burn or tokenizers types
//   - NO file I/O
//   - Only data types, errors, and the traits other layers implement

// Positionally paired question / SQL corpora
pub mod corpus;

// Row-major fixed-width index tensor
pub mod tensor;

// Typed failures of the preprocessing core
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;

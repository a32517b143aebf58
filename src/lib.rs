// ============================================================
// nl2sql-prep
// ============================================================
// Preprocessing for natural-language → SQL translation:
// tokenize both sides, build vocabularies, encode, pad or
// truncate to a fixed width, and split into train/validation.
//
//   cli          — Layer 1: argument parsing, printing
//   application  — Layer 2: preprocess / encode workflows
//   domain       — Layer 3: corpus, tensors, errors, traits
//   data         — Layer 4: the preprocessing core + burn dataset
//   infra        — Layer 6: artifact files and run report

pub mod cli;
pub mod application;
pub mod domain;
pub mod data;
pub mod infra;

// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `preprocess` and `encode`
// and all their configurable flags.
//
// clap's derive macros generate --help, missing-argument
// errors, and string → number conversion for every field.

use clap::{Args, Subcommand, ValueEnum};

use crate::application::preprocess_use_case::PreprocessConfig;
use crate::data::{
    pipeline::{PipelineConfig, DEFAULT_MAX_LENGTH},
    splitter::{DEFAULT_SPLIT_SEED, DEFAULT_VAL_FRACTION},
    vocabulary::VocabOrder,
};
use crate::domain::corpus::CorpusSide;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Turn a question/SQL CSV into padded index tensors and vocabularies
    Preprocess(PreprocessArgs),

    /// Encode one piece of text with the artifacts of a previous run
    Encode(EncodeArgs),
}

/// All arguments for the `preprocess` command
#[derive(Args, Debug)]
pub struct PreprocessArgs {
    /// CSV file with one question/SQL pair per row
    #[arg(long, default_value = "data/train.csv")]
    pub data: String,

    /// Directory to write tensors, vocabularies and the run report
    #[arg(long, default_value = "processed_data")]
    pub out_dir: String,

    /// Header of the natural-language column
    #[arg(long, default_value = "question")]
    pub question_column: String,

    /// Header of the SQL column
    #[arg(long, default_value = "sql")]
    pub sql_column: String,

    /// Every sequence is padded or truncated to exactly this many indices
    #[arg(long, default_value_t = DEFAULT_MAX_LENGTH)]
    pub max_length: usize,

    /// Share of examples held out for validation, strictly between 0 and 1
    #[arg(long, default_value_t = DEFAULT_VAL_FRACTION)]
    pub val_fraction: f64,

    /// Seed for the train/validation shuffle
    #[arg(long, default_value_t = DEFAULT_SPLIT_SEED)]
    pub seed: u64,

    /// Number vocabulary entries by descending frequency
    /// instead of first appearance
    #[arg(long)]
    pub frequency_order: bool,

    /// Read the whole configuration from a JSON file instead of flags.
    /// Missing keys fall back to the defaults.
    #[arg(
        long,
        conflicts_with_all = [
            "data", "out_dir", "question_column", "sql_column",
            "max_length", "val_fraction", "seed", "frequency_order",
        ]
    )]
    pub config: Option<String>,
}

/// Convert CLI PreprocessArgs into the application-layer config.
/// The application layer never sees clap types.
impl From<PreprocessArgs> for PreprocessConfig {
    fn from(a: PreprocessArgs) -> Self {
        let vocab_order = if a.frequency_order {
            VocabOrder::Frequency
        } else {
            VocabOrder::Encounter
        };

        PreprocessConfig {
            data_path:       a.data,
            out_dir:         a.out_dir,
            question_column: a.question_column,
            sql_column:      a.sql_column,
            pipeline: PipelineConfig {
                max_length:   a.max_length,
                val_fraction: a.val_fraction,
                split_seed:   a.seed,
                vocab_order,
                ..PipelineConfig::default()
            },
        }
    }
}

/// Which vocabulary `encode` should use
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SideArg {
    Question,
    Query,
}

impl From<SideArg> for CorpusSide {
    fn from(s: SideArg) -> Self {
        match s {
            SideArg::Question => CorpusSide::Question,
            SideArg::Query    => CorpusSide::Query,
        }
    }
}

/// All arguments for the `encode` command
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Text to encode
    #[arg(long)]
    pub text: String,

    /// Encode as a question or as a SQL query
    #[arg(long, value_enum, default_value_t = SideArg::Question)]
    pub side: SideArg,

    /// Output directory of an earlier `preprocess` run
    #[arg(long, default_value = "processed_data")]
    pub artifacts_dir: String,
}

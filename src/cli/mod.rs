// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Arguments are parsed
// with clap; all work is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `preprocess` — CSV → padded tensors, vocabularies, report
//   2. `encode`     — encodes new text with saved artifacts

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EncodeArgs, PreprocessArgs};

use crate::application::preprocess_use_case::PreprocessConfig;

#[derive(Parser, Debug)]
#[command(
    name = "nl2sql-prep",
    version,
    about = "Prepare natural-language/SQL pairs for sequence-to-sequence training."
)]
pub struct Cli {
    /// The subcommand to run (preprocess or encode)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Preprocess(args) => run_preprocess(args),
            Commands::Encode(args)     => run_encode(args),
        }
    }
}

fn run_preprocess(args: PreprocessArgs) -> Result<()> {
    use crate::application::preprocess_use_case::PreprocessUseCase;

    let config = match args.config.clone() {
        Some(path) => {
            tracing::info!("Reading configuration from '{}'", path);
            PreprocessConfig::from_json_file(&path)?
        }
        None => args.into(),
    };

    let output = PreprocessUseCase::new(config.clone()).execute()?;

    println!("Preprocessing complete. Artifacts saved to '{}'.", config.out_dir);
    println!("  input vocab:  {}", output.input_vocab.len());
    println!("  output vocab: {}", output.output_vocab.len());
    println!("  train shape:  {:?}", output.split.question_train.shape());
    println!("  val shape:    {:?}", output.split.question_val.shape());
    Ok(())
}

fn run_encode(args: EncodeArgs) -> Result<()> {
    use crate::application::encode_use_case::EncodeUseCase;

    let use_case = EncodeUseCase::new(&args.artifacts_dir)?;
    let side     = args.side.into();

    let ids = use_case.encode(side, &args.text);
    println!("{:?}", ids);
    println!("{}", use_case.decode(side, &ids).join(" "));
    Ok(())
}

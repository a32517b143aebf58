// ============================================================
// Layer 6 — Run Report
// ============================================================
// A PipelineObserver that records stage statistics in two places:
//   - the tracing log (info level)
//   - preprocess_report.csv in the output directory, one row
//     per stage, appended across runs
//
// Example CSV output:
//   stage,examples,input_vocab,output_vocab,train_rows,val_rows,width
//   loaded,8000,,,,,
//   vocabularies,,7311,9120,,,
//   normalized,8000,,,,,30
//   split,,,,6400,1600,30
//
// Observers must never fail the pipeline, so a failed write is
// logged as a warning and otherwise ignored.

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};

use crate::domain::traits::{PipelineObserver, StageReport};

pub const REPORT_FILE: &str = "preprocess_report.csv";

const HEADER: [&str; 7] = [
    "stage", "examples", "input_vocab", "output_vocab", "train_rows", "val_rows", "width",
];

pub struct RunReport {
    csv_path: PathBuf,
}

impl RunReport {
    /// Create the report in `dir`, writing the CSV header if the file is new
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let csv_path = dir.join(REPORT_FILE);
        if !csv_path.exists() {
            let mut writer = csv::Writer::from_path(&csv_path)?;
            writer.write_record(HEADER)?;
            writer.flush()?;
            tracing::debug!("Created report CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    fn append(&self, record: &[String; 7]) -> Result<()> {
        let file = OpenOptions::new().append(true).open(&self.csv_path)?;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record(record)?;
        writer.flush()?;
        Ok(())
    }
}

/// One CSV record for a report; unused columns stay empty
pub fn csv_record(report: &StageReport) -> [String; 7] {
    let mut record: [String; 7] = Default::default();
    record[0] = report.stage_name().to_string();

    match report {
        StageReport::Loaded { examples } => {
            record[1] = examples.to_string();
        }
        StageReport::VocabulariesBuilt { input_size, output_size } => {
            record[2] = input_size.to_string();
            record[3] = output_size.to_string();
        }
        StageReport::Normalized { question_shape, .. } => {
            record[1] = question_shape.0.to_string();
            record[6] = question_shape.1.to_string();
        }
        StageReport::Split { train_shape, val_shape } => {
            record[4] = train_shape.0.to_string();
            record[5] = val_shape.0.to_string();
            record[6] = train_shape.1.to_string();
        }
    }
    record
}

impl PipelineObserver for RunReport {
    fn on_stage(&self, report: &StageReport) {
        match report {
            StageReport::Loaded { examples } => {
                tracing::info!("Loaded {} samples", examples);
            }
            StageReport::VocabulariesBuilt { input_size, output_size } => {
                tracing::info!("Input vocab size: {}", input_size);
                tracing::info!("Output vocab size: {}", output_size);
            }
            StageReport::Normalized { question_shape, query_shape } => {
                tracing::info!(
                    "Padded to length {}: questions {:?}, queries {:?}",
                    question_shape.1,
                    question_shape,
                    query_shape
                );
            }
            StageReport::Split { train_shape, val_shape } => {
                tracing::info!("Training set shape: {:?}", train_shape);
                tracing::info!("Validation set shape: {:?}", val_shape);
            }
        }

        if let Err(e) = self.append(&csv_record(report)) {
            tracing::warn!("Could not write '{}': {}", self.csv_path.display(), e);
        }
    }
}

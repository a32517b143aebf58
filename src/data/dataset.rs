use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::vocabulary::PAD_INDEX;
use crate::domain::tensor::SequenceTensor;

/// One normalized question/SQL pair.
/// Both rows have the fixed pipeline length; trailing zeros are padding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlPairSample {
    pub question_ids: Vec<u32>,
    pub query_ids:    Vec<u32>,
}

impl SqlPairSample {
    /// Non-padding tokens in the question row
    pub fn question_len(&self) -> usize {
        self.question_ids.iter().filter(|&&id| id != PAD_INDEX).count()
    }

    /// Non-padding tokens in the query row
    pub fn query_len(&self) -> usize {
        self.query_ids.iter().filter(|&&id| id != PAD_INDEX).count()
    }
}

/// Row-paired view over a question tensor and a query tensor,
/// e.g. the train (or validation) half of a DatasetSplit.
pub struct SqlPairDataset {
    questions: SequenceTensor,
    queries:   SequenceTensor,
}

impl SqlPairDataset {
    /// Returns None when the tensors do not have the same number of rows
    pub fn new(questions: SequenceTensor, queries: SequenceTensor) -> Option<Self> {
        if questions.rows() != queries.rows() {
            return None;
        }
        Some(Self { questions, queries })
    }
}

impl Dataset<SqlPairSample> for SqlPairDataset {
    fn get(&self, index: usize) -> Option<SqlPairSample> {
        Some(SqlPairSample {
            question_ids: self.questions.row(index)?.to_vec(),
            query_ids:    self.queries.row(index)?.to_vec(),
        })
    }

    fn len(&self) -> usize {
        self.questions.rows()
    }
}

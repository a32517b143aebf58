// ============================================================
// Layer 4 — Question/SQL Batcher
// ============================================================
// Implements Burn's Batcher trait so the split tensors can feed
// a seq2seq training loop directly.
//
//   Input:  Vec of N SqlPairSamples, each row of length L
//   Output: SqlPairBatch with four [N, L] Int tensors
//
// Every row is already normalized to the same length, so
// batching is a flatten + reshape:
//   [s1_t1, ..., s1_tL, s2_t1, ..., sN_tL] → [N, L]
//
// The masks mark real tokens with 1 and padding with 0.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::SqlPairSample;
use crate::data::vocabulary::PAD_INDEX;

// ─── SqlPairBatch ─────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct SqlPairBatch<B: Backend> {
    /// Encoder input — shape: [batch_size, seq_len]
    pub question_ids: Tensor<B, 2, Int>,

    /// 1 = question token, 0 = padding
    pub question_mask: Tensor<B, 2, Int>,

    /// Decoder input — shape: [batch_size, seq_len]
    pub query_ids: Tensor<B, 2, Int>,

    /// 1 = query token, 0 = padding
    pub query_mask: Tensor<B, 2, Int>,
}

// ─── SqlPairBatcher ───────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct SqlPairBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> SqlPairBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    /// Flatten rows into one [rows, width] Int tensor
    fn stack<'a, I>(&self, rows: I, batch_size: usize, seq_len: usize) -> Tensor<B, 2, Int>
    where
        I: Iterator<Item = &'a Vec<u32>>,
    {
        let flat: Vec<i32> = rows.flat_map(|r| r.iter().map(|&x| x as i32)).collect();
        Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len])
    }

    fn mask<'a, I>(&self, rows: I, batch_size: usize, seq_len: usize) -> Tensor<B, 2, Int>
    where
        I: Iterator<Item = &'a Vec<u32>>,
    {
        let flat: Vec<i32> = rows
            .flat_map(|r| r.iter().map(|&x| i32::from(x != PAD_INDEX)))
            .collect();
        Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len])
    }
}

impl<B: Backend> Batcher<SqlPairSample, SqlPairBatch<B>> for SqlPairBatcher<B> {
    fn batch(&self, items: Vec<SqlPairSample>) -> SqlPairBatch<B> {
        let batch_size = items.len();
        // Rows must be pre-normalized; the first row's length holds for all
        let q_len = items.first().map_or(0, |s| s.question_ids.len());
        let s_len = items.first().map_or(0, |s| s.query_ids.len());
        assert!(
            items.iter().all(|s| s.question_ids.len() == q_len && s.query_ids.len() == s_len),
            "SqlPairBatcher needs equal-length rows ({q_len} question / {s_len} query ids); \
             normalize samples before batching"
        );

        SqlPairBatch {
            question_ids:  self.stack(items.iter().map(|s| &s.question_ids), batch_size, q_len),
            question_mask: self.mask(items.iter().map(|s| &s.question_ids), batch_size, q_len),
            query_ids:     self.stack(items.iter().map(|s| &s.query_ids), batch_size, s_len),
            query_mask:    self.mask(items.iter().map(|s| &s.query_ids), batch_size, s_len),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn samples() -> Vec<SqlPairSample> {
        vec![
            SqlPairSample { question_ids: vec![1, 2, 0], query_ids: vec![4, 5, 6] },
            SqlPairSample { question_ids: vec![3, 0, 0], query_ids: vec![7, 0, 0] },
        ]
    }

    #[test]
    fn test_batch_shapes() {
        let batcher = SqlPairBatcher::<TestBackend>::new(Default::default());
        let batch   = batcher.batch(samples());
        assert_eq!(batch.question_ids.dims(), [2, 3]);
        assert_eq!(batch.question_mask.dims(), [2, 3]);
        assert_eq!(batch.query_ids.dims(), [2, 3]);
        assert_eq!(batch.query_mask.dims(), [2, 3]);
    }

    #[test]
    fn test_mask_counts_real_tokens() {
        let batcher = SqlPairBatcher::<TestBackend>::new(Default::default());
        let batch   = batcher.batch(samples());
        // 3 question tokens and 4 query tokens across both rows
        assert_eq!(batch.question_mask.sum().into_scalar() as i64, 3);
        assert_eq!(batch.query_mask.sum().into_scalar() as i64, 4);
    }

    #[test]
    #[should_panic(expected = "equal-length rows")]
    fn test_ragged_rows_rejected() {
        let batcher = SqlPairBatcher::<TestBackend>::new(Default::default());
        let mut items = samples();
        items[1].query_ids.pop();
        batcher.batch(items);
    }
}

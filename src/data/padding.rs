// ============================================================
// Layer 4 — Length Normalizer
// ============================================================
// Forces every encoded sequence to exactly `max_length` entries.
//
//   longer  → keep the first max_length entries (drop the tail)
//   shorter → append PAD_INDEX (0) until it fits
//   equal   → unchanged
//
// Example with max_length = 5:
//   [4, 8, 1]             → [4, 8, 1, 0, 0]
//   [4, 8, 1, 9, 2, 7, 3] → [4, 8, 1, 9, 2]

use crate::data::vocabulary::PAD_INDEX;
use crate::domain::tensor::SequenceTensor;

/// Pad or truncate one sequence to `max_length`
pub fn normalize(sequence: &[u32], max_length: usize) -> Vec<u32> {
    let mut out = sequence.to_vec();
    out.resize(max_length, PAD_INDEX);
    out
}

/// Normalize every sequence and stack the results into a (rows, max_length) tensor
pub fn normalize_all(sequences: &[Vec<u32>], max_length: usize) -> SequenceTensor {
    SequenceTensor::from_rows(
        max_length,
        sequences.iter().map(|s| normalize(s, max_length)),
    )
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_length_unchanged() {
        let seq: Vec<u32> = (1..=30).collect();
        assert_eq!(normalize(&seq, 30), seq);
    }

    #[test]
    fn test_one_over_is_truncated_from_end() {
        let seq: Vec<u32> = (1..=31).collect();
        let out = normalize(&seq, 30);
        assert_eq!(out.len(), 30);
        assert_eq!(out, (1..=30).collect::<Vec<u32>>());
    }

    #[test]
    fn test_short_sequence_is_post_padded() {
        let out = normalize(&[5, 4, 3, 2, 1], 30);
        assert_eq!(out.len(), 30);
        assert_eq!(&out[..5], &[5, 4, 3, 2, 1]);
        assert!(out[5..].iter().all(|&x| x == PAD_INDEX));
        assert_eq!(out[5..].len(), 25);
    }

    #[test]
    fn test_empty_sequence_is_all_padding() {
        assert_eq!(normalize(&[], 4), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_normalize_all_shape() {
        let t = normalize_all(&[vec![1, 2], vec![], vec![3, 4, 5, 6]], 3);
        assert_eq!(t.shape(), (3, 3));
        assert_eq!(t.as_slice(), &[1, 2, 0, 0, 0, 0, 3, 4, 5]);
    }
}

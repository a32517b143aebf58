// ============================================================
// Layer 3 — SequenceTensor Domain Type
// ============================================================
// A rectangular block of token indices, stored row-major:
//
//   rows  = number of examples
//   width = fixed sequence length (MAX_LENGTH)
//   data  = rows * width indices
//
//   [r0_t0, r0_t1, ..., r0_tW, r1_t0, ..., rN_tW]
//
// A tensor with zero rows still remembers its width, so an
// empty validation split has shape (0, 30), not (0, 0).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TensorRecord")]
pub struct SequenceTensor {
    rows:  usize,
    width: usize,
    data:  Vec<u32>,
}

impl SequenceTensor {
    /// An empty tensor of the given width
    pub fn empty(width: usize) -> Self {
        Self { rows: 0, width, data: Vec::new() }
    }

    /// Stack equal-length rows into one tensor.
    ///
    /// # Panics
    /// Panics if any row's length differs from `width`.
    /// Rows come from the length normalizer, so a mismatch is a bug.
    pub fn from_rows<I>(width: usize, rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<u32>>,
    {
        let mut tensor = Self::empty(width);
        for row in rows {
            tensor.push_row(&row);
        }
        tensor
    }

    fn push_row(&mut self, row: &[u32]) {
        assert_eq!(
            row.len(),
            self.width,
            "row length {} does not match tensor width {}",
            row.len(),
            self.width
        );
        self.data.extend_from_slice(row);
        self.rows += 1;
    }

    /// (rows, width)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.width)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Borrow row `i`, or None if out of range
    pub fn row(&self, i: usize) -> Option<&[u32]> {
        if i >= self.rows {
            return None;
        }
        let start = i * self.width;
        Some(&self.data[start..start + self.width])
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[u32]> + '_ {
        // chunks_exact(0) panics, and a zero-width tensor has no data anyway
        self.data.chunks_exact(self.width.max(1)).take(self.rows)
    }

    /// Flat row-major view of every index
    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }

    /// Copy the listed rows, in the listed order, into a new tensor.
    ///
    /// # Panics
    /// Panics if any index is out of range.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let mut out = Self::empty(self.width);
        out.data.reserve(indices.len() * self.width);
        for &i in indices {
            let row = self
                .row(i)
                .unwrap_or_else(|| panic!("row {} out of range for {} rows", i, self.rows));
            out.data.extend_from_slice(row);
            out.rows += 1;
        }
        out
    }

    /// Largest index anywhere in the tensor (0 for an empty tensor)
    pub fn max_value(&self) -> u32 {
        self.data.iter().copied().max().unwrap_or(0)
    }
}

/// Unchecked on-disk shape; converted with a length check
#[derive(Deserialize)]
struct TensorRecord {
    rows:  usize,
    width: usize,
    data:  Vec<u32>,
}

impl TryFrom<TensorRecord> for SequenceTensor {
    type Error = String;

    fn try_from(r: TensorRecord) -> Result<Self, Self::Error> {
        if r.rows.checked_mul(r.width) != Some(r.data.len()) {
            return Err(format!(
                "tensor shape ({}, {}) does not match {} stored values",
                r.rows,
                r.width,
                r.data.len()
            ));
        }
        Ok(Self { rows: r.rows, width: r.width, data: r.data })
    }
}

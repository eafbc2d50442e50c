// ============================================================
// Data Layer — Sequence Batcher
// ============================================================
// Converts host-side token-id rows into the rectangular
// [batch_size, max_len] Int tensor the model consumes.
//
// How batching works here:
//   Input:  N rows of token ids, each of length ≤ max_len
//   Output: one tensor of shape [N, max_len]
//
//   Short rows are right-padded with the pad token, then all
//   rows are flattened into one long Vec and reshaped:
//   [r1_t1, ..., r1_tL, r2_t1, ..., rN_tL] → [N, L]
//
// This is also the crate's validation boundary. The model trusts
// its input tensors, so every malformed input is rejected here,
// before any tensor exists:
//   - empty batches
//   - rows longer than the fixed max_len horizon
//   - token ids outside [0, vocab_size)
//
// Reference: Burn Book §4 (Batcher)
//            Rust Book §8 (Vectors)

use burn::prelude::*;

use crate::error::Seq2SeqError;

// ─── SequenceBatcher ──────────────────────────────────────────────────────────
/// Builds model-ready input (and target) tensors from raw token-id
/// rows. Holds the target device so tensors land on the right
/// GPU/CPU, plus the vocabulary bounds it validates against.
#[derive(Clone, Debug)]
pub struct SequenceBatcher<B: Backend> {
    /// The device to create tensors on (e.g. GPU index 0)
    device: B::Device,
    /// Size of the vocabulary — every id must be below this
    vocab_size: usize,
    /// Fixed sequence length rows are padded to
    max_len: usize,
    /// Reserved pad token id used as right-padding filler
    padding_idx: u32,
}

impl<B: Backend> SequenceBatcher<B> {
    pub fn new(device: B::Device, vocab_size: usize, max_len: usize, padding_idx: u32) -> Self {
        Self {
            device,
            vocab_size,
            max_len,
            padding_idx,
        }
    }

    /// Validate `rows` and stack them into a [batch, max_len] Int
    /// tensor, right-padding short rows with the pad token.
    ///
    /// Fails fast on the first malformed row rather than silently
    /// truncating or wrapping ids around.
    pub fn batch(&self, rows: &[Vec<u32>]) -> Result<Tensor<B, 2, Int>, Seq2SeqError> {
        if rows.is_empty() {
            return Err(Seq2SeqError::EmptyBatch);
        }

        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() > self.max_len {
                return Err(Seq2SeqError::RowTooLong {
                    row: row_idx,
                    len: row.len(),
                    max_len: self.max_len,
                });
            }
            for (pos, &id) in row.iter().enumerate() {
                if id as usize >= self.vocab_size {
                    return Err(Seq2SeqError::TokenOutOfVocab {
                        row: row_idx,
                        pos,
                        id,
                        vocab_size: self.vocab_size,
                    });
                }
            }
        }

        let batch_size = rows.len();

        // Flatten all rows into one Vec<i32> (Burn uses i32-friendly
        // ints for Int tensors), padding each row out to max_len.
        let flat: Vec<i32> = rows
            .iter()
            .flat_map(|row| {
                row.iter()
                    .copied()
                    .chain(std::iter::repeat(self.padding_idx).take(self.max_len - row.len()))
                    .map(|id| id as i32)
            })
            .collect();

        tracing::debug!("Batched {} rows to [{}x{}]", batch_size, batch_size, self.max_len);

        Ok(
            Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
                .reshape([batch_size, self.max_len]),
        )
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;
    type TestDevice = burn::backend::ndarray::NdArrayDevice;

    fn batcher() -> SequenceBatcher<TestBackend> {
        SequenceBatcher::new(TestDevice::default(), 10, 5, 0)
    }

    #[test]
    fn test_pads_short_rows_with_pad_token() {
        let batch = batcher()
            .batch(&[vec![2, 3, 4], vec![5, 6]])
            .unwrap();

        assert_eq!(batch.dims(), [2, 5]);
        let ids: Vec<i64> = batch.into_data().iter::<i64>().collect();
        assert_eq!(ids, vec![2, 3, 4, 0, 0, 5, 6, 0, 0, 0]);
    }

    #[test]
    fn test_full_row_needs_no_padding() {
        let batch = batcher().batch(&[vec![2, 3, 4, 5, 6]]).unwrap();
        let ids: Vec<i64> = batch.into_data().iter::<i64>().collect();
        assert_eq!(ids, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_rejects_empty_batch() {
        assert_eq!(batcher().batch(&[]).unwrap_err(), Seq2SeqError::EmptyBatch);
    }

    #[test]
    fn test_rejects_over_long_row() {
        let err = batcher()
            .batch(&[vec![2, 3], vec![2, 3, 4, 5, 6, 7]])
            .unwrap_err();
        assert_eq!(
            err,
            Seq2SeqError::RowTooLong {
                row: 1,
                len: 6,
                max_len: 5
            }
        );
    }

    #[test]
    fn test_rejects_out_of_vocab_id() {
        let err = batcher().batch(&[vec![2, 10, 3]]).unwrap_err();
        assert_eq!(
            err,
            Seq2SeqError::TokenOutOfVocab {
                row: 0,
                pos: 1,
                id: 10,
                vocab_size: 10
            }
        );
    }

    #[test]
    fn test_empty_row_becomes_all_padding() {
        // A zero-length sequence is representable; whether the
        // model accepts it is the encoder's decision (it does,
        // producing a zero summary).
        let batch = batcher().batch(&[vec![]]).unwrap();
        let ids: Vec<i64> = batch.into_data().iter::<i64>().collect();
        assert_eq!(ids, vec![0, 0, 0, 0, 0]);
    }
}

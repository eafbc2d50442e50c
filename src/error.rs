// ============================================================
// Crate Errors
// ============================================================
// All precondition violations the model surface can report.
//
// The model itself is a pure computation — the only ways a call
// can fail are malformed inputs:
//   - a token sequence longer than the fixed horizon
//   - a token id outside the vocabulary
//   - an empty batch (no rows to encode)
//   - a targets tensor whose batch dimension disagrees with the
//     inputs it is supposed to teach against
//
// All of these fail fast with a descriptive variant rather than
// silently truncating or wrapping indices around.
//
// Reference: Rust Book §9 (Error Handling)

use thiserror::Error;

/// Everything that can go wrong when batching inputs or running
/// the model forward pass.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Seq2SeqError {
    /// The caller handed over zero sequences.
    #[error("input batch is empty")]
    EmptyBatch,

    /// A sequence does not fit into the fixed max_len horizon.
    #[error("row {row} has {len} tokens but max_len is {max_len}")]
    RowTooLong { row: usize, len: usize, max_len: usize },

    /// A token id falls outside [0, vocab_size).
    #[error("token id {id} at row {row}, position {pos} is outside the vocabulary of size {vocab_size}")]
    TokenOutOfVocab {
        row: usize,
        pos: usize,
        id: u32,
        vocab_size: usize,
    },

    /// Teacher-forcing targets cover a different number of
    /// sequences than the inputs being decoded.
    #[error("targets cover {targets} sequences but inputs cover {inputs}")]
    BatchSizeMismatch { inputs: usize, targets: usize },
}

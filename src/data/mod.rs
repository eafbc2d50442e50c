// ============================================================
// Data Layer
// ============================================================
// Everything between raw host-side token ids and the tensors
// the model consumes. Tokenization, file loading and dataset
// management are deliberately out of scope — the surrounding
// harness owns those; this layer only turns already-tokenized
// rows into validated, rectangular, padded batches.
//
//   batcher.rs — validated Vec<Vec<u32>> → [batch, max_len]
//                Int tensor construction (the crate's input
//                validation boundary)
//
// Reference: Burn Book §4 (Batcher)

/// Validated, padded batch construction
pub mod batcher;

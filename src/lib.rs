// ============================================================
// seq2seq-lstm — LSTM encoder-decoder for token sequences
// ============================================================
// A sequence-to-sequence recurrent model over the Burn tensor
// framework: embed a padded batch of token-id rows, reduce each
// row to one summary vector with an LSTM encoder, then generate
// a fixed-horizon output distribution sequence with a stepwise
// LSTM decoder — teacher-forced during training with configured
// probability, free-running (multinomial sampling) otherwise.
//
// Layers:
//   data  — validated tensor construction from raw token rows
//   ml    — the model and its sampling policies (all Burn code)
//   error — the precondition-violation taxonomy
//
// The crate is a library: training loops, data loading,
// tokenization and checkpointing belong to the harness.
//
// Reference: Sutskever et al. (2014) Sequence to Sequence Learning

#![recursion_limit = "256"]

pub mod data;
pub mod error;
pub mod ml;

pub use data::batcher::SequenceBatcher;
pub use error::Seq2SeqError;
pub use ml::model::{RunMode, Seq2Seq, Seq2SeqConfig};
pub use ml::sampling::{GreedySampler, MultinomialSampler, Sampler};

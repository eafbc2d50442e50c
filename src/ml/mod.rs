// ============================================================
// ML Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly — only this one
// (and the data layer's batcher, which builds the tensors the
// model consumes).
//
// What's in this layer:
//
//   model.rs     — The LSTM encoder-decoder architecture
//                  Implements the full seq2seq forward pass:
//                  • Token embedding table
//                  • LSTM encoder over packed-equivalent masked
//                    recurrence (summary vector per sequence)
//                  • Stepwise LSTM decoder with teacher forcing
//                  • Output projection to vocabulary logits
//
//   sampling.rs  — The injectable randomness seam
//                  Teacher-forcing coin flip and multinomial
//                  next-token draws go through the Sampler
//                  trait so tests can replay a pass exactly
//
// Reference: Burn Book §3 (Building Blocks)
//            Sutskever et al. (2014) Sequence to Sequence Learning

/// LSTM encoder-decoder model architecture
pub mod model;

/// Sampling policies — stochastic decisions behind a trait
pub mod sampling;

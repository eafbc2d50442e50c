// ============================================================
// ML Layer — Seq2Seq Encoder-Decoder (Burn)
// ============================================================
// The model itself: four learned sub-modules wired into one
// encode-then-decode forward pass.
//
//   emb      — token embedding table, id → dense vector
//   encoder  — LSTM run over the whole (padded) input batch,
//              reduced to one summary vector z per sequence
//   decoder  — LSTM driven one timestep at a time, seeded with z
//   output   — linear projection, hidden state → vocab logits
//
// Control flow:
//   ids [B, L] → emb → encoder → z [B, H]
//   → decode loop (max_len steps, emb + output each step)
//   → logits [B, max_len, vocab]
//
// Burn has no packed-sequence primitive, so padding is handled
// by causality instead of packing: the encoder runs over the
// full padded batch and each row's summary is gathered at its
// last real position. An LSTM output at step t depends only on
// tokens 0..=t, so whatever sits in the padding tail can never
// leak into the summary. This also means no sort/unsort pass —
// rows keep their original batch order throughout.
//
// Reference: Burn Book §3 (Building Blocks)
//            Sutskever et al. (2014) Sequence to Sequence Learning
//            Hochreiter & Schmidhuber (1997) LSTM

use burn::{
    nn::{Embedding, EmbeddingConfig, Linear, LinearConfig, Lstm, LstmConfig, LstmState},
    prelude::*,
};

use crate::error::Seq2SeqError;
use crate::ml::sampling::Sampler;

// ─── RunMode ──────────────────────────────────────────────────────────────────
/// Train/eval switch the harness toggles per call. Teacher forcing
/// can only trigger in [`RunMode::Train`]; in [`RunMode::Eval`] the
/// forcing coin is never even flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Train,
    Eval,
}

// ─── Config ───────────────────────────────────────────────────────────────────
/// All hyperparameters of the model in one place. Every field is
/// required — there are no sensible task-independent defaults.
#[derive(Config, Debug)]
pub struct Seq2SeqConfig {
    /// Number of tokens in the vocabulary.
    pub vocab_size: usize,
    /// Width of the embedding vectors.
    pub embedding_dim: usize,
    /// Width of the encoder and decoder recurrent state.
    pub hidden_size: usize,
    /// Reserved pad token id, in [0, vocab_size).
    pub padding_idx: usize,
    /// Reserved sequence-start token id, in [0, vocab_size).
    pub init_idx: usize,
    /// Fixed decode horizon and maximum encode length, in tokens.
    pub max_len: usize,
    /// Probability of teacher forcing during training, in [0, 1].
    pub teacher_forcing: f64,
}

impl Seq2SeqConfig {
    /// Initialise the model with fresh weights on the given device.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Seq2Seq<B> {
        // Burn's Embedding has no padding_idx option, so the pad
        // row's embedding trains like any other; padding positions
        // never reach the summary, so this cannot change outputs.
        let emb = EmbeddingConfig::new(self.vocab_size, self.embedding_dim).init(device);
        let encoder = LstmConfig::new(self.embedding_dim, self.hidden_size, true).init(device);
        let decoder = LstmConfig::new(self.embedding_dim, self.hidden_size, true).init(device);
        let output = LinearConfig::new(self.hidden_size, self.vocab_size).init(device);

        Seq2Seq {
            emb,
            encoder,
            decoder,
            output,
            vocab_size: self.vocab_size,
            hidden_size: self.hidden_size,
            padding_idx: self.padding_idx,
            init_idx: self.init_idx,
            max_len: self.max_len,
            teacher_forcing: self.teacher_forcing,
        }
    }
}

// ─── Model ────────────────────────────────────────────────────────────────────
/// LSTM encoder-decoder over token-id sequences.
///
/// Only the four sub-modules hold learned state; every tensor of a
/// forward pass is transient, so `&self` calls are safe to run
/// side by side while the parameters stay untouched.
#[derive(Module, Debug)]
pub struct Seq2Seq<B: Backend> {
    pub emb: Embedding<B>,
    pub encoder: Lstm<B>,
    pub decoder: Lstm<B>,
    pub output: Linear<B>,
    pub vocab_size: usize,
    pub hidden_size: usize,
    pub padding_idx: usize,
    pub init_idx: usize,
    pub max_len: usize,
    pub teacher_forcing: f64,
}

impl<B: Backend> Seq2Seq<B> {
    /// All-zero (cell, hidden) state for the encoder, shaped for one
    /// recurrent layer: both tensors are [batch_size, hidden_size].
    pub fn zero_state(&self, batch_size: usize, device: &B::Device) -> LstmState<B, 2> {
        LstmState::new(
            Tensor::zeros([batch_size, self.hidden_size], device),
            Tensor::zeros([batch_size, self.hidden_size], device),
        )
    }

    /// Real length of each row, found by scanning for the first
    /// occurrence of the pad token. A row with no pad token has
    /// length max_len; a row starting with pad has length 0.
    /// Whatever follows the first pad is ignored.
    pub fn sequence_lengths(&self, inputs: &Tensor<B, 2, Int>) -> Vec<usize> {
        let [_, max_len] = inputs.dims();
        let pad = self.padding_idx as i64;
        let ids: Vec<i64> = inputs.clone().into_data().iter::<i64>().collect();

        ids.chunks(max_len)
            .map(|row| row.iter().position(|&id| id == pad).unwrap_or(max_len))
            .collect()
    }

    /// Encode a batch of padded token-id rows [batch, max_len] into
    /// one summary vector z per row, [batch, hidden_size].
    ///
    /// A row of length 0 (all padding) gets a defined all-zero
    /// summary rather than being an error.
    pub fn encode(&self, inputs: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let [batch_size, _] = inputs.dims();
        let device = inputs.device();
        let lengths = self.sequence_lengths(&inputs);

        // Run the LSTM over the whole padded batch from a zero state.
        // encoded[:, t, :] is the hidden state after consuming token t.
        let embedded = self.emb.forward(inputs);
        let (encoded, _) = self
            .encoder
            .forward(embedded, Some(self.zero_state(batch_size, &device)));
        let [_, _, hidden] = encoded.dims();

        // Pick each row's hidden state at its last real position.
        // Zero-length rows gather position 0 and are masked out below.
        let last_pos: Vec<i32> = lengths
            .iter()
            .map(|&len| len.saturating_sub(1) as i32)
            .collect();
        let gather_idx = Tensor::<B, 1, Int>::from_ints(last_pos.as_slice(), &device)
            .reshape([batch_size, 1, 1])
            .expand([batch_size, 1, hidden]);
        let z = encoded.gather(1, gather_idx).reshape([batch_size, hidden]);

        tracing::debug!(
            "Encoded batch of {} sequences (lengths {:?})",
            batch_size,
            lengths,
        );

        if lengths.contains(&0) {
            // Keep-mask: 1 for rows with at least one real token.
            let keep: Vec<f32> = lengths
                .iter()
                .map(|&len| if len == 0 { 0.0 } else { 1.0 })
                .collect();
            let keep =
                Tensor::<B, 1>::from_floats(keep.as_slice(), &device).reshape([batch_size, 1]);
            z * keep
        } else {
            z
        }
    }

    /// Initial decoder state built from the encoder summary:
    /// hidden = z, cell = zeros of the same shape.
    pub fn decoder_state(&self, z: Tensor<B, 2>) -> LstmState<B, 2> {
        let cell = Tensor::zeros(z.dims(), &z.device());
        LstmState::new(cell, z)
    }

    /// First decoder input: a [batch_size] vector of the reserved
    /// sequence-start token id.
    pub fn decoder_initial_inputs(
        &self,
        batch_size: usize,
        device: &B::Device,
    ) -> Tensor<B, 1, Int> {
        Tensor::full([batch_size], self.init_idx as i32, device)
    }

    /// Autoregressive decode loop: exactly `max_len` steps, one
    /// vocab-logit slice per step, stacked into [batch, max_len,
    /// vocab_size]. Scores are unnormalised — the caller applies
    /// softmax / log-softmax for loss or probabilities.
    ///
    /// Next-input policy per step i:
    ///   - targets given and i inside their time extent → targets[:, i]
    ///     (teacher forcing)
    ///   - otherwise → one token drawn by the sampler from the
    ///     softmaxed scores (multinomial, not argmax)
    pub fn decode<S: Sampler + ?Sized>(
        &self,
        z: Tensor<B, 2>,
        targets: Option<&Tensor<B, 2, Int>>,
        sampler: &mut S,
    ) -> Result<Tensor<B, 3>, Seq2SeqError> {
        let [batch_size, _] = z.dims();
        let device = z.device();

        if let Some(t) = targets {
            let t_batch = t.dims()[0];
            if t_batch != batch_size {
                return Err(Seq2SeqError::BatchSizeMismatch {
                    inputs: batch_size,
                    targets: t_batch,
                });
            }
        }

        let mut state = self.decoder_state(z);
        let mut step_inputs = self.decoder_initial_inputs(batch_size, &device);
        let mut step_scores = Vec::with_capacity(self.max_len);

        for step in 0..self.max_len {
            // One LSTM step: embed the current ids as a length-1
            // sequence and advance the recurrent state.
            let embedded = self.emb.forward(step_inputs.reshape([batch_size, 1]));
            let (_, next_state) = self.decoder.forward(embedded, Some(state));
            state = next_state;

            let scores = self.output.forward(state.hidden.clone()); // [batch, vocab]

            step_inputs = match targets {
                Some(t) if step < t.dims()[1] => t
                    .clone()
                    .slice([0..batch_size, step..step + 1])
                    .reshape([batch_size]),
                _ => self.sample_next(&scores, sampler, &device),
            };

            step_scores.push(scores);
        }

        Ok(Tensor::stack::<3>(step_scores, 1))
    }

    /// Draw each row's next input token from the categorical
    /// distribution given by softmaxing its scores.
    fn sample_next<S: Sampler + ?Sized>(
        &self,
        scores: &Tensor<B, 2>,
        sampler: &mut S,
        device: &B::Device,
    ) -> Tensor<B, 1, Int> {
        let probs: Vec<f32> = burn::tensor::activation::softmax(scores.clone(), 1)
            .into_data()
            .iter::<f32>()
            .collect();

        let next: Vec<i32> = probs
            .chunks(self.vocab_size)
            .map(|row| sampler.sample(row) as i32)
            .collect();

        Tensor::from_ints(next.as_slice(), device)
    }

    /// Full forward pass: encode, decide teacher forcing, decode.
    ///
    /// In [`RunMode::Train`] the sampler's coin decides, with the
    /// configured probability, whether this pass teacher-forces —
    /// and when it does, the decode targets are the inputs
    /// themselves (this model trains by reconstructing its input).
    /// In [`RunMode::Eval`] teacher forcing never applies.
    ///
    /// A caller-supplied `targets` tensor is validated against the
    /// inputs' batch dimension; the forcing decision above still
    /// governs what the decoder is conditioned on.
    pub fn forward<S: Sampler + ?Sized>(
        &self,
        inputs: Tensor<B, 2, Int>,
        targets: Option<&Tensor<B, 2, Int>>,
        mode: RunMode,
        sampler: &mut S,
    ) -> Result<Tensor<B, 3>, Seq2SeqError> {
        let batch_size = inputs.dims()[0];
        if let Some(t) = targets {
            let t_batch = t.dims()[0];
            if t_batch != batch_size {
                return Err(Seq2SeqError::BatchSizeMismatch {
                    inputs: batch_size,
                    targets: t_batch,
                });
            }
        }

        let force = mode == RunMode::Train && sampler.use_teacher_forcing(self.teacher_forcing);
        tracing::debug!("Forward pass: mode={:?} teacher_forcing={}", mode, force);

        let z = self.encode(inputs.clone());
        let decode_targets = if force { Some(&inputs) } else { None };
        self.decode(z, decode_targets, sampler)
    }
}

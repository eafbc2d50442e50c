// ============================================================
// ML Layer — Sampling Policies
// ============================================================
// The decode loop makes two kinds of random decisions:
//   1. Once per forward pass (training only): flip a biased coin
//      to decide whether to teacher-force this pass.
//   2. Once per decode step (when not forced): draw the next
//      input token from the categorical distribution given by
//      the softmaxed output scores.
//
// Both decisions go through the Sampler trait instead of a
// process-global generator, so tests can substitute a
// deterministic policy and replay a forward pass exactly.
//
// Implementations:
//   - MultinomialSampler — the real thing, backed by rand's
//     StdRng (seedable for reproducible runs)
//   - GreedySampler      — no randomness at all: never forces,
//     always picks the highest-scoring token
//
// Reference: rand crate documentation
//            Bengio et al. (2015) Scheduled Sampling

use rand::{rngs::StdRng, Rng, SeedableRng};

// ─── Sampler ──────────────────────────────────────────────────────────────────
/// Source of the stochastic decisions made during decoding.
///
/// `probs` handed to [`Sampler::sample`] is a softmax output: one
/// non-negative weight per vocabulary entry, summing to one.
pub trait Sampler {
    /// Decide whether this forward pass uses teacher forcing.
    /// `probability` is the configured forcing probability in [0, 1].
    fn use_teacher_forcing(&mut self, probability: f64) -> bool;

    /// Draw one token id from a categorical distribution over the
    /// vocabulary. Must return an index in [0, probs.len()).
    fn sample(&mut self, probs: &[f32]) -> usize;
}

// ─── MultinomialSampler ───────────────────────────────────────────────────────
/// The stochastic policy used for real training and free-running
/// generation: coin flip for teacher forcing, multinomial draw
/// (not argmax) for the next token.
pub struct MultinomialSampler {
    rng: StdRng,
}

impl MultinomialSampler {
    /// Sampler seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Sampler with a fixed seed, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for MultinomialSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler for MultinomialSampler {
    fn use_teacher_forcing(&mut self, probability: f64) -> bool {
        self.rng.gen::<f64>() < probability
    }

    fn sample(&mut self, probs: &[f32]) -> usize {
        // Inverse-CDF draw: walk the cumulative mass until it
        // passes a uniform point in [0, total).
        let total: f32 = probs.iter().sum();
        let draw = self.rng.gen::<f32>() * total;

        let mut cumulative = 0.0f32;
        for (idx, &p) in probs.iter().enumerate() {
            cumulative += p;
            if draw < cumulative {
                return idx;
            }
        }

        // Degenerate distribution (all-zero or non-finite weights)
        // falls through; the last index keeps the result in range.
        probs.len().saturating_sub(1)
    }
}

// ─── GreedySampler ────────────────────────────────────────────────────────────
/// Deterministic policy: never teacher-forces, always takes the
/// highest-scoring token. Used for evaluation and in tests that
/// need repeatable decodes.
pub struct GreedySampler;

impl Sampler for GreedySampler {
    fn use_teacher_forcing(&mut self, _probability: f64) -> bool {
        false
    }

    fn sample(&mut self, probs: &[f32]) -> usize {
        let mut best_idx = 0;
        let mut best_p = f32::NEG_INFINITY;
        for (idx, &p) in probs.iter().enumerate() {
            if p > best_p {
                best_p = p;
                best_idx = idx;
            }
        }
        best_idx
    }
}

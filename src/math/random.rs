//! Sine-based pseudo-random stream used for reproducible layouts
//!
//! The generator is deliberately simple: every draw feeds the previous value
//! back through `sin`, so a seed fully determines the sequence on any platform
//! with IEEE-754 `sin`. It is not suitable for anything security related.

/// Multiplier applied to the state before taking its sine
const STATE_MULTIPLIER: f64 = 9999.0;
/// Amplification applied to the sine before keeping its fractional part
const SINE_AMPLITUDE: f64 = 10_000.0;

/// Deterministic stream of values in `[0, 1)` derived from a numeric seed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeededRandomStream {
    state: f64,
}

impl SeededRandomStream {
    /// Start a stream at the given seed
    pub const fn new(seed: f64) -> Self {
        Self { state: seed }
    }

    /// Current internal state (the last value returned, or the seed)
    pub const fn state(&self) -> f64 {
        self.state
    }

    /// Advance the stream and return the next value in `[0, 1)`
    pub fn next_value(&mut self) -> f64 {
        self.state = seeded_random(self.state * STATE_MULTIPLIER);
        self.state
    }

    /// Draw an index in `0..len`
    ///
    /// Returns 0 for an empty range so callers can treat the result as a
    /// fallback slot without a separate branch.
    pub fn next_index(&mut self, len: usize) -> usize {
        let draw = self.next_value();
        if len == 0 {
            return 0;
        }
        ((draw * len as f64).floor() as usize).min(len - 1)
    }
}

impl Iterator for SeededRandomStream {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_value())
    }
}

/// Map an arbitrary value into `[0, 1)` through the fractional part of a scaled sine
pub fn seeded_random(value: f64) -> f64 {
    let x = value.sin() * SINE_AMPLITUDE;
    let fraction = x - x.floor();
    // Guard the half-open interval against rounding up to exactly one
    if fraction >= 1.0 { 0.0 } else { fraction }
}

//! Synthetic stream source.
//!
//! Produces a seasonal signal with Gaussian noise and randomly injected
//! spikes, one value per logical time step:
//!
//! ```text
//! x[i] = sin(2*pi*i / period) + N(0, noise_std)
//!        + N(spike_mean, spike_std)    with probability anomaly_prob
//! ```
//!
//! The source is a plain [`Iterator`]: lazy, finite (`length` items) and not
//! restartable. Build a new [`SyntheticStream`] with the same seed to replay.

use crate::config::StreamConfig;
use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;
use std::f64::consts::PI;

/// Seeded synthetic data stream.
#[derive(Debug, Clone)]
pub struct SyntheticStream {
    rng: StdRng,
    noise: Normal<f64>,
    spike: Normal<f64>,
    config: StreamConfig,
    step: usize,
    injected: Vec<usize>,
}

impl SyntheticStream {
    /// Creates a stream from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfig`] if `config` is out of range.
    pub fn new(config: &StreamConfig) -> Result<Self> {
        config.validate()?;
        let noise = Normal::new(0.0, config.noise_std)
            .map_err(|e| Error::invalid("noise_std", e.to_string()))?;
        let spike = Normal::new(config.spike_mean, config.spike_std)
            .map_err(|e| Error::invalid("spike_std", e.to_string()))?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            rng,
            noise,
            spike,
            config: config.clone(),
            step: 0,
            injected: Vec::new(),
        })
    }

    /// Index of the next value to be produced.
    #[must_use]
    pub fn position(&self) -> usize {
        self.step
    }

    /// Indices at which a spike was injected so far.
    #[must_use]
    pub fn injected_spikes(&self) -> &[usize] {
        &self.injected
    }

    /// Seasonal component at step `i`.
    fn seasonal(&self, i: usize) -> f64 {
        (2.0 * PI * i as f64 / self.config.period).sin()
    }
}

impl Iterator for SyntheticStream {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.step >= self.config.length {
            return None;
        }
        let i = self.step;
        self.step += 1;

        let mut value = self.seasonal(i) + self.rng.sample(self.noise);

        if self.config.anomaly_prob > 0.0 && self.rng.gen::<f64>() < self.config.anomaly_prob {
            value += self.rng.sample(self.spike);
            self.injected.push(i);
        }

        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.config.length - self.step;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SyntheticStream {}

//! Z-score anomaly classification.
//!
//! The detector measures the newest value in a window against a baseline
//! that *includes* that value: mean and population standard deviation are
//! taken over the whole window, then
//!
//! ```text
//! z = (last - mean) / std_dev        anomalous  <=>  |z| > threshold
//! ```
//!
//! Guards keep the verdict total:
//!
//! - a window that is still filling is never evaluated (early-stream
//!   observations are always [`Verdict::Normal`]);
//! - a window with zero spread has no z-score and is [`Verdict::Normal`];
//! - a window whose capacity differs from the configured `window_size` is
//!   not evaluated against that configuration.

use crate::config::DetectionConfig;
use crate::stats::WindowStats;
use crate::window::SlidingWindow;
use std::fmt;

/// Binary classification of one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Verdict {
    /// Within the threshold, or not evaluable.
    #[default]
    Normal,
    /// Further than `threshold` standard deviations from the window mean.
    Anomalous,
}

impl Verdict {
    /// Returns true for [`Verdict::Anomalous`].
    #[must_use]
    pub const fn is_anomalous(self) -> bool {
        matches!(self, Self::Anomalous)
    }
}

impl From<bool> for Verdict {
    fn from(anomalous: bool) -> Self {
        if anomalous {
            Self::Anomalous
        } else {
            Self::Normal
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::Anomalous => f.write_str("anomalous"),
        }
    }
}

/// Stateless sliding-window z-score detector.
///
/// All state lives in the [`SlidingWindow`]; the detector only reads it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnomalyDetector;

impl AnomalyDetector {
    /// Z-score of the newest value against the full window.
    ///
    /// Returns `None` when the window is not full, is empty, or has zero
    /// spread; [`classify`](Self::classify) treats all of these as normal.
    #[must_use]
    pub fn score(window: &SlidingWindow) -> Option<f64> {
        if !window.is_full() {
            return None;
        }
        let last = window.last().ok()?;
        WindowStats::from_values(window.iter()).z_score(last)
    }

    /// Classifies the newest value in `window`.
    ///
    /// A NaN anywhere in the window makes the z-score NaN, which never
    /// exceeds the threshold. A window sized for a different `window_size`
    /// is [`Verdict::Normal`].
    #[must_use]
    pub fn classify(window: &SlidingWindow, config: &DetectionConfig) -> Verdict {
        if window.capacity() != config.window_size() {
            return Verdict::Normal;
        }
        Self::verdict_for(Self::score(window), config)
    }

    /// Applies the threshold test to a score produced by [`score`](Self::score).
    #[must_use]
    pub fn verdict_for(z_score: Option<f64>, config: &DetectionConfig) -> Verdict {
        z_score.is_some_and(|z| z.abs() > config.threshold()).into()
    }
}

//! # Trueno-Anomaly
//!
//! Sliding-window z-score anomaly detection for streaming numeric data.
//!
//! Observations arrive one at a time. Each one is pushed into a bounded
//! [`SlidingWindow`](window::SlidingWindow); once the window is full, the
//! newest value is classified by its z-score against the mean and population
//! standard deviation of the window (the value itself included).
//!
//! ## Quick Start
//!
//! ```rust
//! use trueno_anomaly::prelude::*;
//!
//! let config = DetectionConfig::new(30, 3.0)?;
//! let mut monitor = StreamMonitor::new(config);
//!
//! let mut values = vec![0.0; 29];
//! values.push(100.0);
//!
//! let mut recorder = Recorder::new();
//! let summary = monitor.run(values, &mut recorder)?;
//! assert_eq!(summary.anomalies, vec![29]);
//! # Ok::<(), trueno_anomaly::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): the `trueno-anomaly` command line binary

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Bounded sliding window over a numeric stream.
pub mod window;

/// Mean and population standard deviation over a window.
pub mod stats;

/// Z-score anomaly classification.
pub mod detector;

/// Detection, stream and file configuration.
pub mod config;

// ============================================================================
// Stream Modules
// ============================================================================

/// Synthetic seasonal stream with injected spikes.
pub mod stream;

/// Ingestion loop and observation consumers.
pub mod monitor;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for trueno-anomaly operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use trueno_anomaly::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{Config, DetectionConfig, StreamConfig};
    pub use crate::detector::{AnomalyDetector, Verdict};
    pub use crate::error::{Error, Result};
    pub use crate::monitor::{
        sink_fn, AnomalyLog, Observation, ObservationSink, Recorder, RunSummary, StreamMonitor,
    };
    pub use crate::stats::WindowStats;
    pub use crate::stream::SyntheticStream;
    pub use crate::window::SlidingWindow;
}

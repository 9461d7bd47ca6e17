//! Streaming ingestion loop.
//!
//! [`StreamMonitor`] owns the window of one stream. For every incoming value
//! it assigns the next sequence index, pushes the value (evicting if full),
//! classifies it against the current window, and hands the resulting
//! [`Observation`] to an [`ObservationSink`]. One observation is fully
//! processed before the next is accepted.

use crate::config::DetectionConfig;
use crate::detector::{AnomalyDetector, Verdict};
use crate::error::Result;
use crate::window::SlidingWindow;
use std::io::Write;

/// One accepted observation and its verdict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Position in the stream, starting at 0.
    pub index: u64,
    /// Observed value.
    pub value: f64,
    /// Verdict at the time the value was evaluated.
    pub verdict: Verdict,
    /// Z-score, if the window was full and had non-zero spread.
    pub z_score: Option<f64>,
}

impl Observation {
    /// Returns true if the observation was flagged.
    #[must_use]
    pub fn is_anomalous(&self) -> bool {
        self.verdict.is_anomalous()
    }
}

// ============================================================================
// Consumers
// ============================================================================

/// Consumer of observations (logger, alerting, renderer).
pub trait ObservationSink {
    /// Receives one observation. An error stops the run.
    fn accept(&mut self, observation: &Observation) -> Result<()>;
}

impl<S: ObservationSink + ?Sized> ObservationSink for &mut S {
    fn accept(&mut self, observation: &Observation) -> Result<()> {
        (**self).accept(observation)
    }
}

/// Adapts a closure into an [`ObservationSink`].
pub fn sink_fn<F>(f: F) -> FnSink<F>
where
    F: FnMut(&Observation) -> Result<()>,
{
    FnSink(f)
}

/// Closure-backed sink returned by [`sink_fn`].
#[derive(Debug)]
pub struct FnSink<F>(F);

impl<F> ObservationSink for FnSink<F>
where
    F: FnMut(&Observation) -> Result<()>,
{
    fn accept(&mut self, observation: &Observation) -> Result<()> {
        (self.0)(observation)
    }
}

/// Keeps every observation in memory.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    observations: Vec<Observation>,
}

impl Recorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded observations, in stream order.
    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Indices of the flagged observations.
    #[must_use]
    pub fn anomaly_indices(&self) -> Vec<u64> {
        self.observations
            .iter()
            .filter(|o| o.is_anomalous())
            .map(|o| o.index)
            .collect()
    }
}

impl ObservationSink for Recorder {
    fn accept(&mut self, observation: &Observation) -> Result<()> {
        self.observations.push(*observation);
        Ok(())
    }
}

/// Writes one line per anomaly: `Anomaly detected at index 412: 5.87`.
#[derive(Debug)]
pub struct AnomalyLog<W: Write> {
    writer: W,
}

impl<W: Write> AnomalyLog<W> {
    /// Creates a log writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ObservationSink for AnomalyLog<W> {
    fn accept(&mut self, observation: &Observation) -> Result<()> {
        if observation.is_anomalous() {
            writeln!(
                self.writer,
                "Anomaly detected at index {}: {:.2}",
                observation.index, observation.value
            )?;
        }
        Ok(())
    }
}

// ============================================================================
// Monitor
// ============================================================================

/// Outcome of [`StreamMonitor::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Observations consumed from the source.
    pub observations: u64,
    /// Observations classified against a full window.
    pub evaluated: u64,
    /// Indices of the flagged observations.
    pub anomalies: Vec<u64>,
}

/// Single-stream ingestion loop.
#[derive(Debug, Clone)]
pub struct StreamMonitor {
    config: DetectionConfig,
    window: SlidingWindow,
    next_index: u64,
}

impl StreamMonitor {
    /// Creates a monitor with an empty window of `config.window_size()`.
    #[must_use]
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            window: SlidingWindow::from_config(&config),
            config,
            next_index: 0,
        }
    }

    /// Detection parameters.
    #[must_use]
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Current window contents.
    #[must_use]
    pub fn window(&self) -> &SlidingWindow {
        &self.window
    }

    /// Number of observations accepted so far.
    #[must_use]
    pub fn observed(&self) -> u64 {
        self.next_index
    }

    /// Pushes `value` and classifies it against the updated window.
    pub fn observe(&mut self, value: f64) -> Observation {
        let index = self.next_index;
        self.next_index += 1;

        self.window.push(value);
        let z_score = AnomalyDetector::score(&self.window);
        let verdict = AnomalyDetector::verdict_for(z_score, &self.config);

        if verdict.is_anomalous() {
            tracing::info!(
                index,
                value,
                z_score = z_score.unwrap_or_default(),
                "anomaly detected"
            );
        } else if index + 1 == self.config.window_size() as u64 {
            tracing::debug!(index, "window full, evaluation starts");
        }

        Observation {
            index,
            value,
            verdict,
            z_score,
        }
    }

    /// Drains `source` in order, forwarding every observation to `sink`.
    ///
    /// Indices continue from any earlier [`observe`](Self::observe) calls.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first sink error.
    pub fn run<I, S>(&mut self, source: I, mut sink: S) -> Result<RunSummary>
    where
        I: IntoIterator<Item = f64>,
        S: ObservationSink,
    {
        let mut summary = RunSummary::default();

        for value in source {
            let observation = self.observe(value);

            summary.observations += 1;
            if self.window.is_full() {
                summary.evaluated += 1;
            }
            if observation.is_anomalous() {
                summary.anomalies.push(observation.index);
            }

            sink.accept(&observation)?;
        }

        tracing::debug!(
            observations = summary.observations,
            evaluated = summary.evaluated,
            anomalies = summary.anomalies.len(),
            "stream finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io;

    fn monitor(window_size: usize) -> StreamMonitor {
        StreamMonitor::new(DetectionConfig::new(window_size, 3.0).unwrap())
    }

    #[test]
    fn test_indices_are_sequential() {
        let mut m = monitor(3);

        let indices: Vec<u64> = (0..5).map(|i| m.observe(f64::from(i)).index).collect();

        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(m.observed(), 5);
    }

    #[test]
    fn test_no_score_while_filling() {
        let mut m = monitor(4);

        for v in [0.0, 0.0, 100.0] {
            let obs = m.observe(v);
            assert_eq!(obs.verdict, Verdict::Normal);
            assert_eq!(obs.z_score, None);
        }
        assert!(m.observe(1.0).z_score.is_some());
    }

    #[test]
    fn test_flags_spike_once_window_full() {
        let mut m = monitor(30);
        for _ in 0..29 {
            m.observe(0.0);
        }

        let obs = m.observe(100.0);
        assert!(obs.is_anomalous());
        assert_eq!(obs.index, 29);
    }

    #[test]
    fn test_verdict_not_recomputed() {
        let mut recorder = Recorder::new();
        let mut m = monitor(20);
        let mut values = vec![0.0; 19];
        values.push(50.0);
        values.extend([0.0; 20]);

        m.run(values, &mut recorder).unwrap();

        // Later pushes change the window but not the recorded verdict
        assert_eq!(recorder.anomaly_indices(), vec![19]);
        assert!(recorder.observations()[19].is_anomalous());
        assert_eq!(recorder.observations().len(), 40);
    }

    #[test]
    fn test_run_summary() {
        let mut m = monitor(5);
        let mut values = vec![1.0, 2.0, 1.0, 2.0, 1.0, 2.0, 1.0, 2.0, 1.0];
        values.push(100.0);

        let summary = m.run(values, Recorder::new()).unwrap();

        assert_eq!(summary.observations, 10);
        assert_eq!(summary.evaluated, 6);
        // |z| <= sqrt(4) = 2 for a window of 5, so threshold 3 never fires
        assert_eq!(summary.anomalies, Vec::<u64>::new());
    }

    #[test]
    fn test_anomaly_log_format() {
        let mut log = AnomalyLog::new(Vec::new());
        let mut m = monitor(30);
        let mut values = vec![0.0; 29];
        values.push(100.0);

        m.run(values, &mut log).unwrap();

        let output = String::from_utf8(log.into_inner()).unwrap();
        assert_eq!(output, "Anomaly detected at index 29: 100.00\n");
    }

    #[test]
    fn test_sink_error_stops_run() {
        let mut seen = 0;
        let sink = sink_fn(|obs: &Observation| {
            seen += 1;
            if obs.index == 2 {
                let err = io::Error::new(io::ErrorKind::BrokenPipe, "closed");
                return Err(Error::Io(err));
            }
            Ok(())
        });

        let mut m = monitor(3);
        let result = m.run([1.0, 2.0, 3.0, 4.0, 5.0], sink);

        assert!(matches!(result, Err(Error::Io(_))));
        assert_eq!(seen, 3);
        assert_eq!(m.observed(), 3);
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StreamMonitor>();
        assert_send_sync::<Observation>();
    }
}

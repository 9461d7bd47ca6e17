//! Bounded sliding window over a single numeric stream.
//!
//! A fixed-capacity circular buffer holding the most recent observations,
//! oldest first. Key properties:
//!
//! - **Bounded capacity**: `len() <= capacity()` after every operation
//! - **FIFO eviction**: pushing into a full window discards the oldest value
//! - **Zero allocations after construction**: storage is a fixed boxed slice
//!   addressed by head/length indices
//!
//! # Example
//!
//! ```rust
//! use trueno_anomaly::window::SlidingWindow;
//!
//! let mut window = SlidingWindow::new(3)?;
//! for v in [1.0, 2.0, 3.0, 4.0] {
//!     window.push(v);
//! }
//! assert!(window.is_full());
//! assert_eq!(window.values(), vec![2.0, 3.0, 4.0]);
//! assert_eq!(window.last()?, 4.0);
//! # Ok::<(), trueno_anomaly::Error>(())
//! ```

use crate::config::DetectionConfig;
use crate::error::{Error, Result};

/// A fixed-capacity ring buffer of `f64` observations.
///
/// The window has two logical states: *filling* (`len < capacity`) and
/// *full* (`len == capacity`). Once full, `push` keeps it full.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    /// Fixed storage, `capacity` slots.
    data: Box<[f64]>,
    /// Slot the next push writes to.
    head: usize,
    /// Number of valid elements.
    len: usize,
}

impl SlidingWindow {
    /// Creates an empty window holding at most `capacity` observations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::invalid("window_size", "must be greater than 0"));
        }
        Ok(Self::with_capacity(capacity))
    }

    /// Creates a window sized by a validated detection configuration.
    #[must_use]
    pub fn from_config(config: &DetectionConfig) -> Self {
        Self::with_capacity(config.window_size())
    }

    fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            data: vec![0.0; capacity].into_boxed_slice(),
            head: 0,
            len: 0,
        }
    }

    /// Pushes a value as the newest element.
    ///
    /// If the window is at capacity, the oldest value is overwritten. O(1).
    #[inline]
    pub fn push(&mut self, value: f64) {
        let capacity = self.capacity();
        self.data[self.head] = value;
        self.head = (self.head + 1) % capacity;
        if self.len < capacity {
            self.len += 1;
        }
    }

    /// Returns the most recently pushed value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyWindow`] if nothing has been pushed.
    pub fn last(&self) -> Result<f64> {
        if self.len == 0 {
            return Err(Error::EmptyWindow);
        }
        let capacity = self.capacity();
        Ok(self.data[(self.head + capacity - 1) % capacity])
    }

    /// Returns the oldest value still in the window, if any.
    #[must_use]
    pub fn oldest(&self) -> Option<f64> {
        if self.len == 0 {
            None
        } else {
            Some(self.data[self.start()])
        }
    }

    /// Returns a snapshot of the window contents, oldest first.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.iter().collect()
    }

    /// Returns an iterator over the values from oldest to newest.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            window: self,
            index: 0,
        }
    }

    /// Returns the current number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if nothing has been pushed since creation or `clear()`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if the window holds exactly `capacity` elements.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Returns the fixed capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Discards all elements, returning the window to the filling state.
    ///
    /// Capacity is unchanged.
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Slot index of the oldest element.
    fn start(&self) -> usize {
        let capacity = self.capacity();
        (self.head + capacity - self.len) % capacity
    }
}

impl<'a> IntoIterator for &'a SlidingWindow {
    type Item = f64;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over [`SlidingWindow`] values, oldest first.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    window: &'a SlidingWindow,
    index: usize,
}

impl Iterator for Iter<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.window.len {
            return None;
        }
        let idx = (self.window.start() + self.index) % self.window.capacity();
        self.index += 1;
        Some(self.window.data[idx])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.window.len - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_empty_window() {
        let window = SlidingWindow::new(10).unwrap();

        assert!(window.is_empty());
        assert!(!window.is_full());
        assert_eq!(window.len(), 0);
        assert_eq!(window.capacity(), 10);
        assert!(window.values().is_empty());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = SlidingWindow::new(0).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { key: "window_size", .. }));
    }

    #[test]
    fn test_from_config() {
        let config = DetectionConfig::new(30, 3.0).unwrap();
        let window = SlidingWindow::from_config(&config);
        assert_eq!(window.capacity(), 30);
    }

    #[test]
    fn test_last_on_empty_window() {
        let window = SlidingWindow::new(5).unwrap();
        assert!(matches!(window.last(), Err(Error::EmptyWindow)));
        assert_eq!(window.oldest(), None);
    }

    #[test]
    fn test_last_returns_most_recent() {
        let mut window = SlidingWindow::new(3).unwrap();

        window.push(1.0);
        assert_eq!(window.last().unwrap(), 1.0);

        window.push(2.0);
        window.push(3.0);
        window.push(4.0);
        assert_eq!(window.last().unwrap(), 4.0);
    }

    #[test]
    fn test_is_full_transition() {
        let mut window = SlidingWindow::new(3).unwrap();

        window.push(1.0);
        window.push(2.0);
        assert!(!window.is_full());

        window.push(3.0);
        assert!(window.is_full());

        // Full is a one-way state while pushing
        for i in 0..10 {
            window.push(f64::from(i));
            assert!(window.is_full());
        }
    }

    #[test]
    fn test_fifo_eviction_order() {
        let mut window = SlidingWindow::new(5).unwrap();

        for i in 1..=5 {
            window.push(f64::from(i));
        }
        assert_eq!(window.values(), vec![1.0, 2.0, 3.0, 4.0, 5.0]);

        window.push(6.0); // Evicts 1
        window.push(7.0); // Evicts 2

        assert_eq!(window.values(), vec![3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(window.oldest(), Some(3.0));
    }

    #[test]
    fn test_capacity_one() {
        let mut window = SlidingWindow::new(1).unwrap();

        window.push(1.0);
        assert!(window.is_full());
        assert_eq!(window.values(), vec![1.0]);

        window.push(2.0);
        assert_eq!(window.len(), 1);
        assert_eq!(window.last().unwrap(), 2.0);
        assert_eq!(window.oldest(), Some(2.0));
    }

    #[test]
    fn test_reads_are_idempotent() {
        let mut window = SlidingWindow::new(4).unwrap();
        for v in [0.5, -1.5, 2.25, 8.0, 3.0] {
            window.push(v);
        }

        assert_eq!(window.values(), window.values());
        assert_eq!(window.last().unwrap(), window.last().unwrap());
    }

    #[test]
    fn test_iter_is_exact_size() {
        let mut window = SlidingWindow::new(4).unwrap();
        window.push(1.0);
        window.push(2.0);

        let iter = window.iter();
        assert_eq!(iter.len(), 2);

        let summed: f64 = (&window).into_iter().sum();
        assert_eq!(summed, 3.0);
    }

    #[test]
    fn test_clear_returns_to_filling() {
        let mut window = SlidingWindow::new(3).unwrap();
        for v in [1.0, 2.0, 3.0, 4.0] {
            window.push(v);
        }

        window.clear();

        assert!(window.is_empty());
        assert!(!window.is_full());
        assert_eq!(window.capacity(), 3);

        window.push(9.0);
        assert_eq!(window.values(), vec![9.0]);
    }

    #[test]
    fn test_no_reallocation_after_construction() {
        let mut window = SlidingWindow::new(100).unwrap();
        let ptr_before = window.data.as_ptr();

        for i in 0..1000 {
            window.push(f64::from(i));
        }

        assert_eq!(window.data.as_ptr(), ptr_before);
        assert_eq!(window.oldest(), Some(900.0));
        assert_eq!(window.last().unwrap(), 999.0);
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SlidingWindow>();
    }
}

// ============================================================================
// Property-based tests with proptest
// ============================================================================

//! Fixed-capacity evicting buffer for scalar sensor streams
//!
//! The buffer keeps the last `N` samples pushed into it, maintaining a
//! running sum so that the average is O(1). The median is computed on demand
//! by sorting a copy of the contents, which is fine for the small capacities
//! used to smooth vision measurements.

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An evicting buffer over the last `capacity` scalar samples.
#[derive(Debug, Clone)]
pub struct RingBuffer {
    buffer: Vec<f64>,

    /// Index of the oldest sample, only meaningful when the buffer is full
    head: usize,

    capacity: usize,

    /// Running sum of the current contents
    sum: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl RingBuffer {
    /// Create a new empty buffer holding at most `capacity` samples.
    ///
    /// # Panics
    /// - Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RingBuffer capacity must be nonzero");

        Self {
            buffer: Vec::with_capacity(capacity),
            head: 0,
            capacity,
            sum: 0.0,
        }
    }

    /// Add a sample, evicting the oldest one if the buffer is at capacity.
    pub fn add(&mut self, value: f64) {
        if self.buffer.len() < self.capacity {
            self.buffer.push(value);
        }
        else {
            self.sum -= self.buffer[self.head];
            self.buffer[self.head] = value;
            self.head = (self.head + 1) % self.capacity;
        }

        self.sum += value;
    }

    /// The number of samples currently held.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True if no samples are held. An empty buffer means "no valid
    /// measurement" and must not be read as zero by callers.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The average of the held samples, or `None` if the buffer is empty.
    pub fn average(&self) -> Option<f64> {
        if self.buffer.is_empty() {
            None
        }
        else {
            Some(self.sum / self.buffer.len() as f64)
        }
    }

    /// The median of the held samples, or `None` if the buffer is empty.
    ///
    /// For an even number of samples the average of the two central values is
    /// returned.
    pub fn median(&self) -> Option<f64> {
        if self.buffer.is_empty() {
            return None;
        }

        let mut sorted = self.buffer.clone();
        sorted.sort_by(|a, b| {
            a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)
        });

        let n = sorted.len();
        if n % 2 == 0 {
            Some((sorted[n / 2] + sorted[n / 2 - 1]) / 2.0)
        }
        else {
            Some(sorted[(n - 1) / 2])
        }
    }

    /// Discard all held samples.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.head = 0;
        self.sum = 0.0;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

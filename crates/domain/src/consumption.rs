//! Consumption series: rolling window of aggregate power samples.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::time::{Timestamp, now};

/// Number of samples kept by default.
pub const DEFAULT_CAPACITY: usize = 10;

/// One point of the consumption chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionSample {
    /// Axis label, e.g. `"12s"`.
    pub label: String,
    /// Total power drawn at sampling time.
    pub watts: u64,
    pub recorded_at: Timestamp,
}

/// Fixed-capacity buffer that drops the oldest sample when full.
#[derive(Debug, Clone, Serialize)]
pub struct ConsumptionSeries {
    capacity: usize,
    samples: VecDeque<ConsumptionSample>,
}

impl Default for ConsumptionSeries {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ConsumptionSeries {
    /// Create a series holding at most `capacity` samples, seeded with a
    /// `"0s"` point at zero watts. A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut samples = VecDeque::with_capacity(capacity + 1);
        samples.push_back(ConsumptionSample {
            label: "0s".to_string(),
            watts: 0,
            recorded_at: now(),
        });
        Self { capacity, samples }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a sample, evicting the oldest one when the window is full.
    pub fn push(&mut self, sample: ConsumptionSample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&ConsumptionSample> {
        self.samples.back()
    }

    /// Highest value in the window, used to scale the chart.
    #[must_use]
    pub fn peak(&self) -> u64 {
        self.samples.iter().map(|s| s.watts).max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConsumptionSample> {
        self.samples.iter()
    }

    /// Copy the samples out, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<ConsumptionSample> {
        self.samples.iter().cloned().collect()
    }
}

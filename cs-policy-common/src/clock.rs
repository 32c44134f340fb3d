// Copyright 2026 cs-policy Project Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{
    fmt::Debug,
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::Mutex;

/// A monotonic time source.
///
/// Only differences between two readings of the same clock are meaningful.
pub trait Clock: Send + Sync + Debug + 'static {
    /// Time elapsed since the origin of the clock. Never decreases.
    fn now(&self) -> Duration;
}

/// [`Clock`] backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Create a clock whose origin is the current instant.
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// [`Clock`] that only moves when told to.
///
/// Clones share the same reading, so a test or a simulator can keep one clone and hand another to a
/// policy.
///
/// ```
/// use std::time::Duration;
///
/// use cs_policy_common::clock::{Clock, ManualClock};
///
/// let clock = ManualClock::default();
/// let policy_view = clock.clone();
/// clock.advance(Duration::from_secs(10));
/// assert_eq!(policy_view.now(), Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    elapsed: Arc<Mutex<Duration>>,
}

impl ManualClock {
    /// Move the clock forward.
    pub fn advance(&self, duration: Duration) {
        *self.elapsed.lock() += duration;
    }

    /// Move the clock to `elapsed`.
    ///
    /// # Panics
    ///
    /// Panics if `elapsed` is earlier than the current reading.
    pub fn set(&self, elapsed: Duration) {
        let mut current = self.elapsed.lock();
        assert!(
            elapsed >= *current,
            "manual clock must not go backwards, current: {current:?}, given: {elapsed:?}"
        );
        *current = elapsed;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.elapsed.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_clock() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::default();
        let other = clock.clone();
        assert_eq!(other.now(), Duration::ZERO);

        clock.advance(Duration::from_millis(1500));
        assert_eq!(other.now(), Duration::from_millis(1500));

        other.set(Duration::from_secs(3));
        assert_eq!(clock.now(), Duration::from_secs(3));
    }

    #[test]
    #[should_panic(expected = "must not go backwards")]
    fn test_manual_clock_backwards() {
        let clock = ManualClock::default();
        clock.advance(Duration::from_secs(2));
        clock.set(Duration::from_secs(1));
    }
}

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

use std::time::Duration;

/// Combined recency and frequency value of an entry.
///
/// Every reference discounts the previous value by `decay ^ (rate * Δt)`, with `Δt` the seconds since
/// the previous reference, and adds one for the new reference. A fresh entry starts at `1.0` and the
/// value never drops below it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crf {
    score: f64,
    last_update: Duration,
}

impl Crf {
    /// Value of an entry referenced for the first time at `now`.
    pub fn new(now: Duration) -> Self {
        Self {
            score: 1.0,
            last_update: now,
        }
    }

    /// Record a reference at `now`.
    ///
    /// A reading earlier than the previous one counts as no elapsed time.
    pub fn reference(&mut self, now: Duration, decay: f64, rate: f64) {
        let elapsed = now.saturating_sub(self.last_update).as_secs_f64();
        self.score = 1.0 + decay.powf(rate * elapsed) * self.score;
        self.last_update = now;
    }

    /// Current score.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Time of the last reference.
    pub fn last_update(&self) -> Duration {
        self.last_update
    }
}

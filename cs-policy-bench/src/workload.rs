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

use anyhow::ensure;
use itertools::Itertools;
use rand::Rng;

/// Zipf-Mandelbrot popularity over content ranks `1..=n`: `p(k) ∝ 1 / (k + q)^s`.
#[derive(Debug, Clone)]
pub struct ZipfMandelbrot {
    cdf: Vec<f64>,
}

impl ZipfMandelbrot {
    pub fn new(contents: u64, q: f64, s: f64) -> anyhow::Result<Self> {
        ensure!(contents > 0, "contents must be positive");
        ensure!(q.is_finite() && q >= 0.0, "q must be finite and non-negative, given: {q}");
        ensure!(s.is_finite() && s > 0.0, "s must be finite and positive, given: {s}");

        let weights = (1..=contents).map(|k| 1.0 / (k as f64 + q).powf(s)).collect_vec();
        let total: f64 = weights.iter().sum();
        let mut acc = 0.0;
        let cdf = weights
            .into_iter()
            .map(|w| {
                acc += w / total;
                acc
            })
            .collect();
        Ok(Self { cdf })
    }

    pub fn contents(&self) -> u64 {
        self.cdf.len() as u64
    }

    /// Draw a content rank, starting from 1.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> u64 {
        let x: f64 = rng.random();
        let index = self.cdf.partition_point(|c| *c < x).min(self.cdf.len() - 1);
        index as u64 + 1
    }
}

/// A consumer request for a content rank at a point of simulated time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Request {
    pub at: Duration,
    pub consumer: usize,
    pub content: u64,
}

/// Requests of consumers that each ask at a constant rate for `duration`, merged in time order.
///
/// Requests at the same instant are ordered by consumer index.
pub fn requests<R: Rng>(
    frequencies: &[f64],
    duration: Duration,
    popularity: &ZipfMandelbrot,
    rng: &mut R,
) -> anyhow::Result<Vec<Request>> {
    let mut consumers = Vec::with_capacity(frequencies.len());
    for (consumer, &frequency) in frequencies.iter().enumerate() {
        ensure!(
            frequency.is_finite() && frequency > 0.0,
            "frequency must be finite and positive, given: {frequency}"
        );
        let count = (frequency * duration.as_secs_f64()).ceil() as u64;
        let stream = (0..count)
            .map(|k| Duration::from_secs_f64(k as f64 / frequency))
            .take_while(|at| *at < duration)
            .map(|at| Request {
                at,
                consumer,
                content: popularity.sample(rng),
            })
            .collect_vec();
        consumers.push(stream);
    }
    Ok(consumers
        .into_iter()
        .kmerge_by(|a, b| (a.at, a.consumer) < (b.at, b.consumer))
        .collect())
}

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

//! Replays Zipf-Mandelbrot consumer traffic against a single content store with each policy and
//! reports the hit ratio.

mod workload;

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;
use cs_policy::prelude::*;
use itertools::Itertools;
use rand::{rngs::SmallRng, SeedableRng};
use serde::Serialize;

use crate::workload::{requests, Request, ZipfMandelbrot};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
struct Args {
    /// Content store capacity. (entries)
    #[arg(long, default_value_t = 25)]
    capacity: usize,

    /// Distinct contents under the prefix.
    #[arg(long, default_value_t = 1000)]
    contents: u64,

    /// Zipf-Mandelbrot plateau.
    #[arg(long, default_value_t = 2.5)]
    q: f64,

    /// Zipf-Mandelbrot exponent.
    #[arg(long, default_value_t = 2.5)]
    s: f64,

    /// Request rate of each consumer, comma separated. (requests/s)
    #[arg(long, value_delimiter = ',', default_values_t = vec![100.0, 10.0, 1.0])]
    frequencies: Vec<f64>,

    /// Simulated time. (s)
    #[arg(long, default_value_t = 20)]
    duration: u64,

    /// Policies to compare, by registered name.
    #[arg(long, value_delimiter = ',', default_values_t = vec!["lru".to_string(), "lrfu".to_string()])]
    policies: Vec<String>,

    /// Lrfu window capacity.
    #[arg(long, default_value_t = 7)]
    window_capacity: usize,

    /// Lrfu score decay.
    #[arg(long, default_value_t = 0.5)]
    decay: f64,

    /// Lrfu decay exponent per second.
    #[arg(long, default_value_t = 0.1)]
    rate: f64,

    /// Workload random seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Print the reports as json.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Debug, Default)]
struct EvictionCounter(AtomicU64);

impl StoreEventListener<u64, ()> for EvictionCounter {
    fn on_evict(&self, _: u64, _: ()) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Debug, Serialize)]
struct Report {
    policy: String,
    requests: u64,
    hits: u64,
    hit_ratio: f64,
    evictions: u64,
    /// Per consumer hit ratio, in the order of `--frequencies`.
    consumers: Vec<f64>,
    elapsed_ms: u128,
}

fn setup() {
    use tracing_subscriber::{prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_line_number(true))
        .with(EnvFilter::from_default_env())
        .init();
}

fn build(name: &str, args: &Args, clock: &ManualClock) -> anyhow::Result<Box<dyn Policy<u64>>> {
    let registry = PolicyRegistry::with_defaults(Arc::new(clock.clone()));
    let policy = match name {
        "lrfu" => registry.build_with_config(&PolicyConfig::Lrfu(LrfuConfig {
            window_capacity: args.window_capacity,
            decay: args.decay,
            rate: args.rate,
        }))?,
        name => registry.build(name)?,
    };
    Ok(policy)
}

fn replay(name: &str, args: &Args, requests: &[Request]) -> anyhow::Result<Report> {
    let clock = ManualClock::default();
    let policy = build(name, args, &clock).with_context(|| format!("build policy {name}"))?;
    let evictions = Arc::new(EvictionCounter::default());
    let mut store = ContentStore::new(args.capacity, policy).with_listener(evictions.clone());

    let start = Instant::now();
    let mut hits = 0;
    let mut consumers = vec![(0u64, 0u64); args.frequencies.len()];
    for request in requests {
        clock.set(request.at);
        let (consumer_hits, consumer_requests) = &mut consumers[request.consumer];
        *consumer_requests += 1;
        if store.get(&request.content).is_some() {
            hits += 1;
            *consumer_hits += 1;
        } else {
            store.insert(request.content, ());
        }
    }

    let report = Report {
        policy: name.to_string(),
        requests: requests.len() as u64,
        hits,
        hit_ratio: ratio(hits, requests.len() as u64),
        evictions: evictions.0.load(Ordering::Relaxed),
        consumers: consumers.into_iter().map(|(h, r)| ratio(h, r)).collect(),
        elapsed_ms: start.elapsed().as_millis(),
    };
    tracing::info!(policy = name, hit_ratio = report.hit_ratio, "replay finished");
    Ok(report)
}

fn ratio(hits: u64, requests: u64) -> f64 {
    if requests == 0 {
        return 0.0;
    }
    hits as f64 / requests as f64
}

fn main() -> anyhow::Result<()> {
    setup();

    let args = Args::parse();
    tracing::info!("{args:#?}");
    anyhow::ensure!(args.duration > 0, "duration must be positive");

    let popularity = ZipfMandelbrot::new(args.contents, args.q, args.s)?;
    let mut rng = SmallRng::seed_from_u64(args.seed);
    let requests = requests(
        &args.frequencies,
        Duration::from_secs(args.duration),
        &popularity,
        &mut rng,
    )?;
    tracing::info!(requests = requests.len(), contents = popularity.contents(), "workload generated");

    let reports: Vec<Report> = std::thread::scope(|s| {
        let handles = args
            .policies
            .iter()
            .map(|name| s.spawn(|| replay(name, &args, &requests)))
            .collect_vec();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(report) => report,
                Err(e) => std::panic::resume_unwind(e),
            })
            .collect::<anyhow::Result<_>>()
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    let consumers = args.frequencies.iter().map(|f| format!("{f}/s")).join(" ");
    println!(
        "{:<8} {:>10} {:>10} {:>10} {:>10}   per consumer ({consumers})",
        "policy", "requests", "hits", "hit ratio", "evictions"
    );
    for report in reports {
        println!(
            "{:<8} {:>10} {:>10} {:>9.2}% {:>10}   {}",
            report.policy,
            report.requests,
            report.hits,
            report.hit_ratio * 100.0,
            report.evictions,
            report.consumers.iter().map(|r| format!("{:.2}%", r * 100.0)).join(" "),
        );
    }
    Ok(())
}

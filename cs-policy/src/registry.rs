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

//! Explicit name-to-constructor registry for policies.

use std::{collections::BTreeMap, fmt::Debug, sync::Arc};

use cs_policy_common::{
    clock::{Clock, MonotonicClock},
    code::EntryHandle,
    error::{Error, Result},
};
use serde::{Deserialize, Serialize};

use crate::{
    lrfu::{Lrfu, LrfuConfig},
    lru::{Lru, LruConfig},
    policy::Policy,
    sanity::SanityPolicy,
};

/// Policy selection and its tunables, tagged by the policy name.
///
/// ```
/// use cs_policy::registry::PolicyConfig;
///
/// let config: PolicyConfig = serde_json::from_str(r#"{ "policy": "lrfu", "window_capacity": 16 }"#).unwrap();
/// assert_eq!(config.name(), "lrfu");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum PolicyConfig {
    /// Least-recently-used.
    Lru(LruConfig),
    /// Combined recency and frequency.
    Lrfu(LrfuConfig),
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::Lrfu(LrfuConfig::default())
    }
}

impl From<LruConfig> for PolicyConfig {
    fn from(value: LruConfig) -> Self {
        Self::Lru(value)
    }
}

impl From<LrfuConfig> for PolicyConfig {
    fn from(value: LrfuConfig) -> Self {
        Self::Lrfu(value)
    }
}

impl PolicyConfig {
    /// Name of the selected policy.
    pub fn name(&self) -> &'static str {
        match self {
            PolicyConfig::Lru(_) => "lru",
            PolicyConfig::Lrfu(_) => "lrfu",
        }
    }

    /// Check the tunables of the selected policy.
    pub fn validate(&self) -> Result<()> {
        match self {
            PolicyConfig::Lru(_) => Ok(()),
            PolicyConfig::Lrfu(config) => config.validate(),
        }
    }
}

/// Constructor of a registered policy. Receives the clock of the registry.
pub type PolicyFactory<H> = Box<dyn Fn(Arc<dyn Clock>) -> Box<dyn Policy<H>> + Send + Sync + 'static>;

/// Maps stable policy names to constructors.
///
/// Nothing is registered implicitly: [`PolicyRegistry::new`] starts empty, and
/// [`PolicyRegistry::with_defaults`] registers the built-in policies with their default configs.
pub struct PolicyRegistry<H>
where
    H: EntryHandle,
{
    clock: Arc<dyn Clock>,
    factories: BTreeMap<&'static str, PolicyFactory<H>>,
}

impl<H> Debug for PolicyRegistry<H>
where
    H: EntryHandle,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyRegistry")
            .field("clock", &self.clock)
            .field("policies", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<H> Default for PolicyRegistry<H>
where
    H: EntryHandle,
{
    fn default() -> Self {
        Self::with_defaults(Arc::new(MonotonicClock::new()))
    }
}

impl<H> PolicyRegistry<H>
where
    H: EntryHandle,
{
    /// Create an empty registry whose policies are scored against `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            factories: BTreeMap::new(),
        }
    }

    /// Create a registry with `lru` and `lrfu` registered with their default configs.
    pub fn with_defaults(clock: Arc<dyn Clock>) -> Self {
        let mut registry = Self::new(clock);
        registry.factories.insert(
            Lru::<H>::NAME,
            Box::new(|_: Arc<dyn Clock>| -> Box<dyn Policy<H>> { Box::new(SanityPolicy::new(Lru::<H>::default())) }),
        );
        registry.factories.insert(
            Lrfu::<H>::NAME,
            Box::new(|clock: Arc<dyn Clock>| -> Box<dyn Policy<H>> {
                Box::new(SanityPolicy::new(Lrfu::<H>::with_clock(&LrfuConfig::default(), clock)))
            }),
        );
        registry
    }

    /// Register a constructor under `name`.
    ///
    /// Returns an [`ErrorKind::Duplicated`](cs_policy_common::error::ErrorKind::Duplicated) error if the
    /// name is taken.
    pub fn register<F>(&mut self, name: &'static str, factory: F) -> Result<()>
    where
        F: Fn(Arc<dyn Clock>) -> Box<dyn Policy<H>> + Send + Sync + 'static,
    {
        if self.factories.contains_key(name) {
            return Err(Error::duplicated_policy(name));
        }
        tracing::debug!(name, "[registry]: register policy");
        self.factories.insert(name, Box::new(factory));
        Ok(())
    }

    /// Build the policy registered under `name`.
    ///
    /// Returns an [`ErrorKind::NotFound`](cs_policy_common::error::ErrorKind::NotFound) error if nothing
    /// is registered under the name.
    pub fn build(&self, name: &str) -> Result<Box<dyn Policy<H>>> {
        let factory = self.factories.get(name).ok_or_else(|| Error::unknown_policy(name))?;
        Ok(factory(self.clock.clone()))
    }

    /// Build a built-in policy with explicit tunables.
    pub fn build_with_config(&self, config: &PolicyConfig) -> Result<Box<dyn Policy<H>>> {
        let policy: Box<dyn Policy<H>> = match config {
            PolicyConfig::Lru(config) => Box::new(SanityPolicy::new(Lru::<H>::new(config))),
            PolicyConfig::Lrfu(config) => {
                Box::new(SanityPolicy::new(Lrfu::<H>::try_new(config, self.clock.clone())?))
            }
        };
        Ok(policy)
    }

    /// Registered names, in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }
}

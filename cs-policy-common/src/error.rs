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

use std::fmt::Display;

/// Kind of a recoverable [`Error`].
///
/// Host/policy protocol violations are not listed here: they are programming defects and panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid policy configuration.
    Config,
    /// No policy is registered under the requested name.
    NotFound,
    /// A policy is already registered under the given name.
    Duplicated,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::Config => "Config error",
            ErrorKind::NotFound => "Not found",
            ErrorKind::Duplicated => "Duplicated",
        };
        f.write_str(s)
    }
}

/// Error returned by configuring or selecting a policy.
///
/// Displays as a single line, e.g. `Config error, context: { decay: 1.5 } => decay must be in (0, 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.context.is_empty() {
            let context = self
                .context
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, ", context: {{ {context} }}")?;
        }
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Create a new error.
    ///
    /// ```rust
    /// # use cs_policy_common::error::{Error, ErrorKind};
    /// let err = Error::new(ErrorKind::NotFound, "unknown policy").with_context("name", "arc");
    /// assert_eq!(err.to_string(), "Not found, context: { name: arc } => unknown policy");
    /// ```
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: vec![],
        }
    }

    /// Attach a key/value pair describing the failed request.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Key/value pairs attached to the error, in order.
    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    /// An [`ErrorKind::Config`] error naming the offending field.
    pub fn config(field: &'static str, value: impl ToString, expected: &str) -> Self {
        Error::new(ErrorKind::Config, format!("{field} must be {expected}")).with_context(field, value)
    }

    /// An [`ErrorKind::NotFound`] error for an unregistered policy name.
    pub fn unknown_policy(name: &str) -> Self {
        Error::new(ErrorKind::NotFound, "no policy registered under the name").with_context("name", name)
    }

    /// An [`ErrorKind::Duplicated`] error for a policy name registered twice.
    pub fn duplicated_policy(name: &str) -> Self {
        Error::new(ErrorKind::Duplicated, "a policy is already registered under the name")
            .with_context("name", name)
    }
}

/// Result type for cs-policy.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn is_send_sync_static<T: Send + Sync + 'static>() {}

    #[test]
    fn test_send_sync_static() {
        is_send_sync_static::<Error>();
    }

    #[test]
    fn test_error_display() {
        let err = Error::config("decay", 1.5, "in (0, 1]").with_context("policy", "lrfu");
        assert_eq!(
            "Config error, context: { decay: 1.5, policy: lrfu } => decay must be in (0, 1]",
            err.to_string()
        );
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = Error::new(ErrorKind::Duplicated, "");
        assert_eq!(err.to_string(), "Duplicated");
    }

    #[test]
    fn test_error_policy_names() {
        let err = Error::unknown_policy("arc");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.context(), &[("name", "arc".to_string())]);

        let err = Error::duplicated_policy("lru");
        assert_eq!(err.kind(), ErrorKind::Duplicated);
        assert_eq!(
            err.to_string(),
            "Duplicated, context: { name: lru } => a policy is already registered under the name"
        );
    }
}

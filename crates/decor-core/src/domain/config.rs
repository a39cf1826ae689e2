//! Run configuration.
//!
//! Values arrive already resolved (env, hosted-runner inputs, flags); nothing
//! in the core looks at the process environment.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::decoration::DEFAULT_ICON;
use super::errors::DecorError;
use super::ids::DatabaseId;
use super::retry::RetryPolicy;
use super::schema::AttributeNames;

/// The two required credentials.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub database_id: DatabaseId,
}

impl Credentials {
    /// Both values must be present and non-blank.
    pub fn new(
        api_key: Option<String>,
        database_id: Option<String>,
    ) -> Result<Self, DecorError> {
        match (non_blank(api_key), non_blank(database_id)) {
            (Some(api_key), Some(database_id)) => Ok(Self {
                api_key,
                database_id: DatabaseId::new(database_id),
            }),
            _ => Err(DecorError::configuration(
                "Notion API key or Database ID is missing",
            )),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("database_id", &self.database_id)
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Where the "both attributes empty" predicate is evaluated.
///
/// The client-side pass always runs; `ServerSide` additionally asks the source
/// to narrow the query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterStrategy {
    #[default]
    ClientSide,
    ServerSide,
}

impl FromStr for FilterStrategy {
    type Err = DecorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "client" | "client_side" | "client-side" => Ok(Self::ClientSide),
            "server" | "server_side" | "server-side" => Ok(Self::ServerSide),
            other => Err(DecorError::configuration(format!(
                "unknown filter strategy: {other}"
            ))),
        }
    }
}

/// Everything one run needs besides the source itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub database_id: DatabaseId,

    #[serde(default)]
    pub attributes: AttributeNames,

    #[serde(default)]
    pub strategy: FilterStrategy,

    #[serde(default)]
    pub retry: RetryPolicy,

    #[serde(default = "default_icon")]
    pub icon: String,
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

impl RunConfig {
    pub fn new(database_id: impl Into<DatabaseId>) -> Self {
        Self {
            database_id: database_id.into(),
            attributes: AttributeNames::default(),
            strategy: FilterStrategy::default(),
            retry: RetryPolicy::default(),
            icon: default_icon(),
        }
    }

    pub fn with_attributes(mut self, attributes: AttributeNames) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_strategy(mut self, strategy: FilterStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Checks values that would otherwise fail only once the run is underway.
    pub fn validate(&self) -> Result<(), DecorError> {
        if self.database_id.is_blank() {
            return Err(DecorError::configuration("Database ID is missing"));
        }
        if self.attributes.icon.trim().is_empty() || self.attributes.cover.trim().is_empty() {
            return Err(DecorError::configuration(
                "decoration attribute names must not be empty",
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(DecorError::configuration(
                "max attempts must be at least 1",
            ));
        }
        if self.icon.trim().is_empty() {
            return Err(DecorError::configuration("icon must not be empty"));
        }
        Ok(())
    }
}

//! Command-line / environment configuration.
//!
//! Credentials come from flags or `NOTION_API_KEY` / `NOTION_DATABASE_ID`.
//! On a hosted runner the action inputs (`INPUT_NOTION_API_KEY`,
//! `INPUT_NOTION_DATABASE_ID`) take precedence.

use std::time::Duration;

use clap::Parser;
use decor_core::domain::{
    AttributeNames, Credentials, DEFAULT_ICON, DatabaseId, DecorError, FilterStrategy,
    MAX_RETRIES, RetryPolicy, RunConfig,
};
use decor_core::impls::notion::NOTION_API_BASE;

use crate::hosted::HostedContext;

#[derive(Debug, Parser)]
#[command(
    name = "decor",
    version,
    about = "Give every Notion page without icon and cover a random cover"
)]
pub struct Cli {
    /// Notion integration token
    #[arg(long, env = "NOTION_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Database whose pages are decorated
    #[arg(long, env = "NOTION_DATABASE_ID")]
    pub database_id: Option<String>,

    /// Update attempts per page (including the first)
    #[arg(long, default_value_t = MAX_RETRIES)]
    pub max_retries: u32,

    /// Base delay of the linear backoff, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub retry_delay_ms: u64,

    /// Where "icon and cover empty" is evaluated: client or server
    #[arg(long, default_value = "client")]
    pub strategy: FilterStrategy,

    /// Emoji used as the page icon
    #[arg(long, default_value = DEFAULT_ICON)]
    pub icon: String,

    #[arg(long, default_value = "icon")]
    pub icon_attribute: String,

    #[arg(long, default_value = "cover")]
    pub cover_attribute: String,

    #[arg(long, env = "NOTION_API_BASE", default_value = NOTION_API_BASE)]
    pub api_base: String,
}

impl Cli {
    pub fn credentials(&self, hosted: &HostedContext) -> Result<Credentials, DecorError> {
        let pick = |input: &str, fallback: &Option<String>| {
            hosted
                .input(input)
                .or_else(|| fallback.clone())
        };
        Credentials::new(
            pick("notion_api_key", &self.api_key),
            pick("notion_database_id", &self.database_id),
        )
    }

    pub fn run_config(&self, database_id: DatabaseId) -> RunConfig {
        RunConfig::new(database_id)
            .with_attributes(AttributeNames::new(
                self.icon_attribute.clone(),
                self.cover_attribute.clone(),
            ))
            .with_strategy(self.strategy)
            .with_retry(RetryPolicy::new(
                self.max_retries,
                Duration::from_millis(self.retry_delay_ms),
            ))
            .with_icon(self.icon.clone())
    }
}

//! DecoratorBuilder - オーケストレータの構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - 差し替え可能なポート（EventSink, RandomSource）にデフォルトを用意

use std::sync::Arc;

use crate::domain::{DecorError, RunConfig};
use crate::impls::TracingEventSink;
use crate::ports::{EventSink, RandomSource, RecordSource, ThreadRandom};

use super::orchestrator::BatchOrchestrator;
use super::selector::DecorationSelector;

/// DecoratorBuilder は BatchOrchestrator を構築
///
/// # 使用例
/// ```ignore
/// let orchestrator = DecoratorBuilder::new(Arc::new(NotionRecordSource::new(key)), config)
///     .event_sink(Arc::new(TracingEventSink))
///     .build()?;
/// let summary = orchestrator.run().await?;
/// ```
///
/// # Fail-fast 設計
/// - build() 時に RunConfig を検証し、不備があれば Configuration エラー
/// - Record Source には何も送らない
pub struct DecoratorBuilder {
    source: Arc<dyn RecordSource>,
    config: RunConfig,
    events: Option<Arc<dyn EventSink>>,
    random: Option<Arc<dyn RandomSource>>,
}

impl DecoratorBuilder {
    pub fn new(source: Arc<dyn RecordSource>, config: RunConfig) -> Self {
        Self {
            source,
            config,
            events: None,
            random: None,
        }
    }

    /// 省略時は TracingEventSink
    pub fn event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    /// 省略時は ThreadRandom
    pub fn random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = Some(random);
        self
    }

    pub fn build(self) -> Result<BatchOrchestrator, DecorError> {
        self.config.validate()?;

        let events = self
            .events
            .unwrap_or_else(|| Arc::new(TracingEventSink) as Arc<dyn EventSink>);
        let random = self
            .random
            .unwrap_or_else(|| Arc::new(ThreadRandom) as Arc<dyn RandomSource>);

        Ok(BatchOrchestrator::new(
            self.source,
            events,
            DecorationSelector::new(random),
            self.config,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AttributeNames, RetryPolicy};
    use crate::impls::InMemoryRecordSource;
    use std::time::Duration;

    fn source() -> Arc<dyn RecordSource> {
        Arc::new(InMemoryRecordSource::with_page_schema())
    }

    #[test]
    fn test_build_success() {
        let orchestrator = DecoratorBuilder::new(source(), RunConfig::new("db")).build();
        assert!(orchestrator.is_ok());
    }

    #[test]
    fn test_build_blank_database_id() {
        let err = DecoratorBuilder::new(source(), RunConfig::new("  "))
            .build()
            .err()
            .unwrap();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_build_empty_attribute_name() {
        let config = RunConfig::new("db").with_attributes(AttributeNames::new("icon", ""));
        assert!(DecoratorBuilder::new(source(), config).build().is_err());
    }

    #[test]
    fn test_build_keeps_retry_policy() {
        let policy = RetryPolicy::new(5, Duration::from_millis(250));
        let orchestrator = DecoratorBuilder::new(source(), RunConfig::new("db").with_retry(policy))
            .build()
            .unwrap();
        assert_eq!(orchestrator.config().retry, policy);
    }
}

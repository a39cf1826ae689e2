//! EventSink の実装
//!
//! - **TracingEventSink**: tracing の構造化ログ（本番用）
//! - **RecordingEventSink**: イベントを貯める（テスト用）

use std::sync::Mutex;

use tracing::{debug, error, info, warn};

use crate::domain::DomainEvent;
use crate::ports::EventSink;

/// TracingEventSink はイベントの種類ごとにログレベルを決める
///
/// 成功・集計は info、リトライ待ちは warn、失敗は error（`kind` 付き）。
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: DomainEvent) {
        let message = event.message();
        match &event {
            DomainEvent::RecordUpdated {
                record_id,
                decoration,
            } => info!(record_id = %record_id, cover = %decoration, "{message}"),
            DomainEvent::UpdateRetried {
                record_id,
                attempt,
                delay,
            } => warn!(
                record_id = %record_id,
                attempt,
                delay_ms = delay.as_millis() as u64,
                "{message}"
            ),
            DomainEvent::UpdateFailed {
                record_id, kind, ..
            } => error!(record_id = %record_id, kind = kind.as_str(), "{message}"),
            DomainEvent::RecordSkipped { record_id, .. } => {
                debug!(record_id = %record_id, "{message}")
            }
            DomainEvent::QueryFailed {
                database_id, kind, ..
            } => error!(database_id = %database_id, kind = kind.as_str(), "{message}"),
            DomainEvent::SchemaRejected { database_id, .. } => {
                error!(database_id = %database_id, "{message}")
            }
            DomainEvent::BatchSummary { succeeded, failed } => {
                info!(succeeded, failed, "{message}")
            }
        }
    }
}

/// RecordingEventSink は受け取ったイベントを順番に保持する
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// 条件に合うイベントの数
    pub fn count(&self, pred: impl Fn(&DomainEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }

    pub fn retries(&self) -> usize {
        self.count(|e| matches!(e, DomainEvent::UpdateRetried { .. }))
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: DomainEvent) {
        // ロックが poison していても記録は続ける
        let mut events = match self.events.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorKind, RecordId};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn recording_sink_keeps_order() {
        let sink = Arc::new(RecordingEventSink::new());
        sink.emit(DomainEvent::UpdateRetried {
            record_id: RecordId::new("a"),
            attempt: 1,
            delay: Duration::from_secs(1),
        });
        sink.emit(DomainEvent::BatchSummary {
            succeeded: 1,
            failed: 0,
        });

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], DomainEvent::UpdateRetried { .. }));
        assert_eq!(sink.retries(), 1);
    }

    #[test]
    fn tracing_sink_accepts_every_event() {
        // subscriber なしでも panic しないこと
        let sink = TracingEventSink;
        sink.emit(DomainEvent::UpdateFailed {
            record_id: RecordId::new("a"),
            reason: "nope".into(),
            kind: ErrorKind::Permanent,
        });
        sink.emit(DomainEvent::BatchSummary {
            succeeded: 0,
            failed: 1,
        });
    }
}

//! RetryingUpdater - 1 レコードに装飾を適用する
//!
//! # 状態遷移
//! `Pending → Attempting → { Success | BackingOff → Attempting | Exhausted }`
//!
//! - 成功: `RecordUpdated` を出して Success
//! - レート制限: `RetryPolicy` の線形バックオフで待って再試行（最大 `max_attempts` 回）
//! - 回数切れ: Failure("max retries exceeded")
//! - それ以外のエラー: 再試行せず、元のエラーメッセージで Failure

use std::sync::Arc;

use crate::domain::{
    Decoration, DomainEvent, ErrorKind, RecordId, RetryDecision, RetryPolicy, RetryState,
    UpdateOutcome,
};
use crate::ports::{EventSink, RecordSource};

#[derive(Clone)]
pub struct RetryingUpdater {
    source: Arc<dyn RecordSource>,
    events: Arc<dyn EventSink>,
    policy: RetryPolicy,
}

impl RetryingUpdater {
    pub fn new(
        source: Arc<dyn RecordSource>,
        events: Arc<dyn EventSink>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            source,
            events,
            policy,
        }
    }

    /// 結果は常に `UpdateOutcome` で返し、エラーとして伝播させない
    pub async fn update(&self, record_id: &RecordId, decoration: &Decoration) -> UpdateOutcome {
        let mut state = RetryState::new(self.policy);
        loop {
            state.begin_attempt();
            let err = match self.source.update_record(record_id, decoration).await {
                Ok(()) => {
                    self.events.emit(DomainEvent::RecordUpdated {
                        record_id: record_id.clone(),
                        decoration: decoration.cover,
                    });
                    return UpdateOutcome::success(decoration.cover);
                }
                Err(err) => err,
            };

            if !err.is_rate_limited() {
                return self.fail(record_id, UpdateOutcome::failure(err.to_string()), err.kind());
            }

            match state.on_rate_limited() {
                RetryDecision::BackOff { attempt, delay } => {
                    self.events.emit(DomainEvent::UpdateRetried {
                        record_id: record_id.clone(),
                        attempt,
                        delay,
                    });
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::Exhausted => {
                    return self.fail(
                        record_id,
                        UpdateOutcome::max_retries_exceeded(),
                        ErrorKind::Transient,
                    );
                }
            }
        }
    }

    fn fail(&self, record_id: &RecordId, outcome: UpdateOutcome, kind: ErrorKind) -> UpdateOutcome {
        self.events.emit(DomainEvent::UpdateFailed {
            record_id: record_id.clone(),
            reason: outcome.reason().unwrap_or_default().to_string(),
            kind,
        });
        outcome
    }
}

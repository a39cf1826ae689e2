//! BatchOrchestrator - 1 回の実行（スキーマ確認 → クエリ → 絞り込み → 並行更新 → 集計）
//!
//! # フロー
//! 1. `retrieve_schema` で必須属性（icon / cover）の存在を確認。なければクエリ前に中断
//! 2. `query_records`（戦略が ServerSide ならフィルタ付き）
//! 3. クライアント側で「両方とも未設定」のレコードに絞る
//! 4. 全レコードの更新を同時に発行し、全部が決着するまで待つ（fail-fast しない）
//! 5. 成功数・失敗数を集計して `BatchSummary` を出す
//!
//! 更新は同じタスク内で `join_all` するだけなので、スレッドは増えない。
//! レコードごとのリトライ状態は各 future が個別に持つ。

use std::sync::Arc;

use futures::future::join_all;

use crate::domain::{
    BatchSummary, DecorError, Decoration, DomainEvent, Record, RecordOutcome, RunConfig,
    SourceError,
};
use crate::ports::{EventSink, RecordSource};

use super::eligibility::{Eligibility, select_eligible, server_filter};
use super::selector::DecorationSelector;
use super::updater::RetryingUpdater;

pub struct BatchOrchestrator {
    source: Arc<dyn RecordSource>,
    events: Arc<dyn EventSink>,
    selector: DecorationSelector,
    updater: RetryingUpdater,
    config: RunConfig,
}

impl BatchOrchestrator {
    pub(crate) fn new(
        source: Arc<dyn RecordSource>,
        events: Arc<dyn EventSink>,
        selector: DecorationSelector,
        config: RunConfig,
    ) -> Self {
        let updater = RetryingUpdater::new(source.clone(), events.clone(), config.retry);
        Self {
            source,
            events,
            selector,
            updater,
            config,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// 1 回分の実行
    ///
    /// レコード単位の失敗は `BatchSummary` に集計され、`Err` になるのは
    /// スキーマ・クエリ段階の失敗だけ。
    pub async fn run(&self) -> Result<BatchSummary, DecorError> {
        let Eligibility { eligible, skipped } = self.find_eligible().await?;

        for (record_id, reason) in &skipped {
            self.events.emit(DomainEvent::RecordSkipped {
                record_id: record_id.clone(),
                reason: reason.as_str().to_string(),
            });
        }

        let mut summary: BatchSummary = self.update_all(&eligible).await.into_iter().collect();
        summary.skipped = skipped.len();

        self.events.emit(DomainEvent::BatchSummary {
            succeeded: summary.succeeded,
            failed: summary.failed,
        });
        Ok(summary)
    }

    /// スキーマ確認 + クエリ + クライアント側の絞り込み
    pub async fn find_eligible(&self) -> Result<Eligibility, DecorError> {
        let database_id = &self.config.database_id;

        let schema = self
            .source
            .retrieve_schema(database_id)
            .await
            .map_err(|err| self.query_failed(err))?;
        self.config
            .attributes
            .require_in(&schema)
            .map_err(|err| self.schema_rejected(err))?;

        let filter = server_filter(self.config.strategy, &self.config.attributes);
        let views = self
            .source
            .query_records(database_id, filter.as_ref())
            .await
            .map_err(|err| self.query_failed(err))?;

        Ok(select_eligible(views))
    }

    /// 全レコードを並行に更新して、全部の結果を返す（順序は入力順）
    pub async fn update_all(&self, records: &[Record]) -> Vec<RecordOutcome> {
        join_all(records.iter().map(|record| async move {
            let decoration = Decoration::new(self.config.icon.clone(), self.selector.select());
            let outcome = self.updater.update(&record.id, &decoration).await;
            RecordOutcome {
                record_id: record.id.clone(),
                outcome,
            }
        }))
        .await
    }

    fn query_failed(&self, err: SourceError) -> DecorError {
        self.events.emit(DomainEvent::QueryFailed {
            database_id: self.config.database_id.clone(),
            message: err.to_string(),
            kind: err.kind(),
        });
        DecorError::Query(err)
    }

    fn schema_rejected(&self, err: DecorError) -> DecorError {
        self.events.emit(DomainEvent::SchemaRejected {
            database_id: self.config.database_id.clone(),
            message: err.to_string(),
        });
        err
    }
}

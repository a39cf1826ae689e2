//! RecordSource port - リモートのドキュメント DB（Notion など）
//!
//! RecordSource はスキーマ取得・クエリ・レコード単位の更新を提供します。
//!
//! # 実装
//! - **NotionRecordSource**: Notion REST API（本番用）
//! - **InMemoryRecordSource**: テスト・開発用

use async_trait::async_trait;

use crate::domain::{DatabaseId, Decoration, RecordFilter, RecordId, RecordView, Schema, SourceError};

/// RecordSource はレコードの読み出しと装飾の書き込みを担う
///
/// # 設計原則
/// - 1 つの接続（認証情報）を並行する更新呼び出しで共有する（`&self` のみ）
/// - `update_record` はレート制限（`SourceError::RateLimited`）とそれ以外を区別して返す
/// - リトライはしない（リトライ判断は updater の責務）
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// 属性名 → 属性定義
    async fn retrieve_schema(&self, database_id: &DatabaseId) -> Result<Schema, SourceError>;

    /// 1 回のクエリ呼び出しで返るレコード（ページングはしない）
    ///
    /// `filter` はヒントです。実装が絞り込めない場合は全件を返してよい。
    async fn query_records(
        &self,
        database_id: &DatabaseId,
        filter: Option<&RecordFilter>,
    ) -> Result<Vec<RecordView>, SourceError>;

    /// icon と cover を 1 回の呼び出しでまとめて設定
    async fn update_record(
        &self,
        record_id: &RecordId,
        decoration: &Decoration,
    ) -> Result<(), SourceError>;
}

//! EventSink port - イベント記録の抽象化
//!
//! # 実装
//! - TracingEventSink: tracing へ構造化ログとして出力（本番用）
//! - RecordingEventSink: メモリに貯める（テスト用）

use crate::domain::DomainEvent;

/// EventSink はドメインイベントを記録
///
/// 並行する更新から同時に呼ばれるため `Send + Sync`。
/// 記録の成否はバッチの結果に影響しない。
pub trait EventSink: Send + Sync {
    fn emit(&self, event: DomainEvent);
}

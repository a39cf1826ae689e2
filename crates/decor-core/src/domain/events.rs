//! Events - ドメインイベント
//!
//! コアはログを直接出さず、EventSink にイベントを渡します。
//! どう表示するか（tracing, GitHub Actions のコマンド, テスト用の記録）は sink 側の責務です。

use std::time::Duration;

use serde::Serialize;

use super::decoration::DecorationSpec;
use super::errors::ErrorKind;
use super::ids::{DatabaseId, RecordId};

/// DomainEvent はドメインで発生したイベント
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    /// 更新成功
    RecordUpdated {
        record_id: RecordId,
        decoration: DecorationSpec,
    },

    /// レート制限を受けたので待ってから再試行する
    UpdateRetried {
        record_id: RecordId,
        attempt: u32,
        #[serde(with = "millis")]
        delay: Duration,
    },

    /// レコード単位の失敗（バッチは継続）
    UpdateFailed {
        record_id: RecordId,
        reason: String,
        kind: ErrorKind,
    },

    /// クエリ結果に含まれていたが対象外（部分的なレコードなど）
    RecordSkipped { record_id: RecordId, reason: String },

    /// スキーマ取得またはクエリの失敗
    QueryFailed {
        database_id: DatabaseId,
        message: String,
        kind: ErrorKind,
    },

    /// スキーマが装飾属性の要件を満たさない（クエリ前に中断）
    SchemaRejected {
        database_id: DatabaseId,
        message: String,
    },

    /// バッチ全体の集計
    BatchSummary { succeeded: usize, failed: usize },
}

impl DomainEvent {
    /// Human-readable line for sinks that emit plain text.
    pub fn message(&self) -> String {
        match self {
            Self::RecordUpdated {
                record_id,
                decoration,
            } => format!("Updated page {record_id} with icon and {decoration} cover"),
            Self::UpdateRetried {
                record_id, delay, ..
            } => format!(
                "Rate limited on page {record_id}, retrying in {}ms",
                delay.as_millis()
            ),
            Self::UpdateFailed {
                record_id, reason, ..
            } => format!("Error updating page {record_id}: {reason}"),
            Self::RecordSkipped { record_id, reason } => {
                format!("Skipped page {record_id}: {reason}")
            }
            Self::QueryFailed { message, .. } => format!("Error querying database: {message}"),
            Self::SchemaRejected { message, .. } => format!("Configuration error: {message}"),
            Self::BatchSummary { succeeded, failed } => format!(
                "Updated {succeeded} pages successfully. Failed to update {failed} pages."
            ),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::UpdateFailed { .. } | Self::QueryFailed { .. } | Self::SchemaRejected { .. }
        )
    }
}

mod millis {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(delay.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decoration::SolidColor;

    #[test]
    fn messages_match_log_lines() {
        let e = DomainEvent::RecordUpdated {
            record_id: RecordId::new("p1"),
            decoration: DecorationSpec::Solid {
                color: SolidColor::Blue,
            },
        };
        assert_eq!(e.message(), "Updated page p1 with icon and solid blue cover");

        let e = DomainEvent::UpdateRetried {
            record_id: RecordId::new("p1"),
            attempt: 2,
            delay: Duration::from_millis(2000),
        };
        assert_eq!(e.message(), "Rate limited on page p1, retrying in 2000ms");

        let e = DomainEvent::BatchSummary {
            succeeded: 4,
            failed: 1,
        };
        assert_eq!(
            e.message(),
            "Updated 4 pages successfully. Failed to update 1 pages."
        );
    }

    #[test]
    fn serializes_with_event_tag() {
        let e = DomainEvent::UpdateRetried {
            record_id: RecordId::new("p1"),
            attempt: 1,
            delay: Duration::from_secs(1),
        };
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["event"], "update_retried");
        assert_eq!(v["record_id"], "p1");
        assert_eq!(v["delay"], 1000);
    }

    #[test]
    fn error_events() {
        let e = DomainEvent::QueryFailed {
            database_id: DatabaseId::new("db"),
            message: "boom".into(),
            kind: ErrorKind::Infrastructure,
        };
        assert!(e.is_error());
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["kind"], "infrastructure");

        let e = DomainEvent::SchemaRejected {
            database_id: DatabaseId::new("db"),
            message: "missing icon".into(),
        };
        assert!(e.is_error());
        assert_eq!(e.message(), "Configuration error: missing icon");
        assert!(
            !DomainEvent::BatchSummary {
                succeeded: 0,
                failed: 0
            }
            .is_error()
        );
    }
}

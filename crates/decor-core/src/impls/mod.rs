//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **NotionRecordSource**: Notion REST API（本番用）
//! - **InMemoryRecordSource**: テスト・開発用の Record Source
//! - **TracingEventSink / RecordingEventSink**: EventSink

pub mod inmem_source;
pub mod notion;
pub mod sinks;

// 主要な型を再エクスポート
pub use self::inmem_source::{CallCounts, InMemoryRecordSource};
pub use self::notion::NotionRecordSource;
pub use self::sinks::{RecordingEventSink, TracingEventSink};

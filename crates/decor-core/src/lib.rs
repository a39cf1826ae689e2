//! decor-core
//!
//! Notion データベースのページのうち、icon と cover がどちらも未設定のものに
//! ランダムなカバーとアイコンを付けるためのコア。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, record, schema, decoration, outcome, retry, events, errors, config）
//! - **ports**: 抽象化レイヤー（RecordSource, EventSink, RandomSource）
//! - **app**: アプリケーションロジック（builder, eligibility, selector, updater, orchestrator）
//! - **impls**: 実装（NotionRecordSource, InMemoryRecordSource, EventSink 各種）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{BatchOrchestrator, DecoratorBuilder};
pub use domain::{BatchSummary, Credentials, DecorError, RunConfig};

//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部システム（Notion API、ログ出力、乱数）への
//! インターフェースを提供し、実装の詳細を隠蔽します。

pub mod event_sink;
pub mod random;
pub mod record_source;

// 主要な trait を再エクスポート
pub use self::event_sink::EventSink;
pub use self::random::{RandomSource, SequenceRandom, ThreadRandom};
pub use self::record_source::RecordSource;

//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせてアプリケーションロジックを実装します。
//!
//! # 主要コンポーネント
//! - **DecoratorBuilder**: 構築とワイヤリング（起動時検証）
//! - **Eligibility**: 装飾が未設定のレコードへの絞り込み
//! - **DecorationSelector**: カタログからの抽選
//! - **RetryingUpdater**: レート制限時の線形バックオフ付き更新
//! - **BatchOrchestrator**: 並行更新と集計

pub mod builder;
pub mod eligibility;
pub mod orchestrator;
pub mod selector;
pub mod updater;

// 主要な型を再エクスポート
pub use self::builder::DecoratorBuilder;
pub use self::eligibility::{Eligibility, SkipReason, select_eligible, server_filter};
pub use self::orchestrator::BatchOrchestrator;
pub use self::selector::DecorationSelector;
pub use self::updater::RetryingUpdater;

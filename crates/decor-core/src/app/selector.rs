//! DecorationSelector - カタログから 1 つ選ぶ
//!
//! レコードごとに独立して抽選します（キャッシュなし、重複の回避もしない）。

use std::sync::Arc;

use crate::domain::{CATALOG, DecorationSpec};
use crate::ports::RandomSource;

#[derive(Clone)]
pub struct DecorationSelector {
    random: Arc<dyn RandomSource>,
}

impl DecorationSelector {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }

    /// 一様に 1 つ選ぶ
    ///
    /// 範囲外の添字を返す RandomSource でも panic しないよう剰余を取る。
    pub fn select(&self) -> DecorationSpec {
        CATALOG[self.random.pick(CATALOG.len()) % CATALOG.len()]
    }
}

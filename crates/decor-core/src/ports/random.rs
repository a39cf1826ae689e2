//! RandomSource port - 乱数の抽象化
//!
//! テスト容易性のために、装飾の抽選に使う乱数を差し替え可能にしています。
//!
//! # 実装
//! - **ThreadRandom**: `rand::thread_rng()`（本番用）
//! - **SequenceRandom**: 決められた添字を順番に返す（テスト用）

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng as _;

/// RandomSource は `0..len` の一様な添字を返す
pub trait RandomSource: Send + Sync {
    /// `len` は 1 以上であること
    fn pick(&self, len: usize) -> usize;
}

/// ThreadRandom はスレッドローカルの乱数生成器を使う
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// SequenceRandom は与えられた添字を循環して返す
///
/// 添字は `len` で剰余を取るので、範囲外の値を渡しても panic しない。
#[derive(Debug)]
pub struct SequenceRandom {
    draws: Vec<usize>,
    cursor: AtomicUsize,
}

impl SequenceRandom {
    pub fn new(draws: impl Into<Vec<usize>>) -> Self {
        let draws = draws.into();
        Self {
            draws: if draws.is_empty() { vec![0] } else { draws },
            cursor: AtomicUsize::new(0),
        }
    }

    /// 常に同じ添字を返す
    pub fn fixed(index: usize) -> Self {
        Self::new(vec![index])
    }
}

impl RandomSource for SequenceRandom {
    fn pick(&self, len: usize) -> usize {
        let n = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.draws[n % self.draws.len()] % len
    }
}

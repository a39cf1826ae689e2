//! Domain identifiers (strongly-typed IDs).
//!
//! Record Source が払い出す ID は不透明な文字列です（Notion なら UUID 文字列）。
//! 中身は解釈せず、そのまま API に渡します。
//!
//! ## Phantom Type パターン
//! `Id<T>` というジェネリック型で共通実装を提供しつつ、
//! `T` はマーカー型としてコンパイル時の型安全性だけを提供します。
//! RecordId と DatabaseId を取り違えて API に渡すことはできません。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// IdMarker は各 ID 型のマーカー trait
///
/// ログやエラーメッセージで使う種別名を提供します。
pub trait IdMarker: Send + Sync + 'static {
    /// 種別名（例: "record", "database"）
    fn kind() -> &'static str;
}

/// ジェネリック ID 型
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    value: String,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// 空文字列（または空白のみ）の ID は無効
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn kind(&self) -> &'static str {
        T::kind()
    }
}

// derive だと `T: Clone` などの境界が付いてしまうので手書きする
impl<T: IdMarker> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T: IdMarker> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: IdMarker> Eq for Id<T> {}

impl<T: IdMarker> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T: IdMarker> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: IdMarker> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T: IdMarker> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", T::kind(), self.value)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T: IdMarker> From<&str> for Id<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<T: IdMarker> From<String> for Id<T> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ========================================
// マーカー型の定義
// ========================================

/// Record のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordMarker {}

impl IdMarker for RecordMarker {
    fn kind() -> &'static str {
        "record"
    }
}

/// Database のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatabaseMarker {}

impl IdMarker for DatabaseMarker {
    fn kind() -> &'static str {
        "database"
    }
}

/// Identifier of one record (a page) inside the remote database.
pub type RecordId = Id<RecordMarker>;

/// Identifier of the remote database that is scanned.
pub type DatabaseId = Id<DatabaseMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_raw_value() {
        let id = RecordId::new("5c6a2821-6bb1-4a7e-b6e1-c50111515c3d");
        assert_eq!(id.to_string(), "5c6a2821-6bb1-4a7e-b6e1-c50111515c3d");
        assert_eq!(format!("{id:?}"), "record(5c6a2821-6bb1-4a7e-b6e1-c50111515c3d)");
    }

    #[test]
    fn blank_ids_are_detected() {
        assert!(DatabaseId::new("").is_blank());
        assert!(DatabaseId::new("   ").is_blank());
        assert!(!DatabaseId::new("db").is_blank());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = RecordId::new("abc");
        let s = serde_json::to_string(&id).unwrap();
        assert_eq!(s, "\"abc\"");

        let back: RecordId = serde_json::from_str(&s).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn kind_comes_from_marker() {
        assert_eq!(RecordId::new("a").kind(), "record");
        assert_eq!(DatabaseId::new("a").kind(), "database");
    }
}

//! Errors - エラー型と分類
//!
//! - `SourceError`: Record Source の 1 回の呼び出しが返すエラー（レコード単位）
//! - `DecorError`: 実行全体を止めるエラー（設定不備・クエリ失敗）

use serde::Serialize;
use thiserror::Error;

/// ErrorKind は実行エラーの分類
///
/// - Transient: 一時的なエラー（リトライ推奨）
/// - Permanent: 恒久的なエラー（リトライ無意味）
/// - Infrastructure: 通信・デコードの障害
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Transient,
    Permanent,
    Infrastructure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transient => "transient",
            Self::Permanent => "permanent",
            Self::Infrastructure => "infrastructure",
        }
    }
}

/// Error reported by a Record Source call.
///
/// Only `RateLimited` is retried by the updater; every other variant is final
/// for the record it concerns.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("rate limited: {message}")]
    RateLimited { message: String },

    #[error("API response error: {message} (status: {status}, code: {code})")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("connection error: {0}")]
    Transport(String),

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl SourceError {
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    pub fn api(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// The retry classifier.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RateLimited { .. } => ErrorKind::Transient,
            Self::Api { .. } => ErrorKind::Permanent,
            Self::Transport(_) | Self::Decode(_) => ErrorKind::Infrastructure,
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Run-level failure. Any of these aborts the run before updates are issued.
#[derive(Debug, Error)]
pub enum DecorError {
    #[error("{0}")]
    Configuration(String),

    #[error("database schema is missing required attributes: {}", .0.join(", "))]
    MissingAttributes(Vec<String>),

    #[error("attribute `{name}` is a {found} attribute, expected {expected}")]
    AttributeKind {
        name: String,
        expected: String,
        found: String,
    },

    #[error("Error querying database: {0}")]
    Query(#[source] SourceError),
}

impl DecorError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Configuration errors are raised before anything is sent to the source.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::MissingAttributes(_) | Self::AttributeKind { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::rate_limited(SourceError::rate_limited("slow down"), ErrorKind::Transient, true)]
    #[case::not_found(SourceError::api(404, "object_not_found", "no page"), ErrorKind::Permanent, false)]
    #[case::transport(SourceError::Transport("reset".into()), ErrorKind::Infrastructure, false)]
    #[case::decode(SourceError::Decode("eof".into()), ErrorKind::Infrastructure, false)]
    fn classification(#[case] err: SourceError, #[case] kind: ErrorKind, #[case] retry: bool) {
        assert_eq!(err.kind(), kind);
        assert_eq!(err.is_rate_limited(), retry);
    }

    #[test]
    fn missing_attributes_lists_names() {
        let err = DecorError::MissingAttributes(vec!["icon".into(), "cover".into()]);
        assert_eq!(
            err.to_string(),
            "database schema is missing required attributes: icon, cover"
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn query_error_keeps_source_message() {
        let err = DecorError::Query(SourceError::api(401, "unauthorized", "API token is invalid."));
        assert!(err.to_string().starts_with("Error querying database: "));
        assert!(err.to_string().contains("API token is invalid."));
        assert!(!err.is_configuration());
    }
}

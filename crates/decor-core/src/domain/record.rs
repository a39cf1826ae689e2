//! Records as reported by the Record Source.
//!
//! The core never mutates a record; it only reads the two decoration
//! attributes to decide eligibility and then asks the source for an update.

use serde::{Deserialize, Serialize};

use super::ids::RecordId;

/// A fully introspectable record.
///
/// `icon` / `cover` carry a short rendering of the attribute when it is set
/// (emoji, URL, ...). An empty string counts as unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}

impl Record {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            icon: None,
            cover: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.cover = Some(cover.into());
        self
    }

    pub fn has_icon(&self) -> bool {
        is_set(self.icon.as_deref())
    }

    pub fn has_cover(&self) -> bool {
        is_set(self.cover.as_deref())
    }

    /// Both decoration attributes are unset.
    pub fn is_undecorated(&self) -> bool {
        !self.has_icon() && !self.has_cover()
    }
}

fn is_set(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// What a query returns for one entry.
///
/// A `Partial` entry is a bare reference (id only) whose attributes could not
/// be read; it is never eligible for an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordView {
    Full(Record),
    Partial { id: RecordId },
}

impl RecordView {
    pub fn id(&self) -> &RecordId {
        match self {
            Self::Full(record) => &record.id,
            Self::Partial { id } => id,
        }
    }

    pub fn as_full(&self) -> Option<&Record> {
        match self {
            Self::Full(record) => Some(record),
            Self::Partial { .. } => None,
        }
    }
}

impl From<Record> for RecordView {
    fn from(record: Record) -> Self {
        Self::Full(record)
    }
}

/// Optional server-side predicate passed along with a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordFilter {
    /// Only records whose two named attributes are both empty.
    BothEmpty { icon: String, cover: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::both_empty(Record::new("a"), true)]
    #[case::icon_set(Record::new("a").with_icon("🚀"), false)]
    #[case::cover_set(Record::new("a").with_cover("https://x/y.png"), false)]
    #[case::both_set(Record::new("a").with_icon("🚀").with_cover("https://x/y.png"), false)]
    #[case::blank_strings(Record::new("a").with_icon("").with_cover("  "), true)]
    fn undecorated(#[case] record: Record, #[case] expected: bool) {
        assert_eq!(record.is_undecorated(), expected);
    }

    #[test]
    fn partial_view_has_no_record() {
        let view = RecordView::Partial {
            id: RecordId::new("p"),
        };
        assert_eq!(view.id().as_str(), "p");
        assert!(view.as_full().is_none());
    }
}

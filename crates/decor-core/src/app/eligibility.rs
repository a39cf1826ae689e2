//! Eligibility filter: narrows a query result to records lacking both
//! decoration attributes.

use crate::domain::{
    AttributeNames, FilterStrategy, Record, RecordFilter, RecordId, RecordView,
};

/// Why an entry returned by the query was not selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The source returned a bare reference whose attributes are unknown.
    Partial,
    /// Icon or cover is already set.
    Decorated,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Partial => "record could not be fully read",
            Self::Decorated => "icon or cover already set",
        }
    }
}

/// Result of the client-side pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Eligibility {
    pub eligible: Vec<Record>,
    pub skipped: Vec<(RecordId, SkipReason)>,
}

/// The predicate pushed to the source, if the strategy asks for one.
pub fn server_filter(strategy: FilterStrategy, names: &AttributeNames) -> Option<RecordFilter> {
    match strategy {
        FilterStrategy::ClientSide => None,
        FilterStrategy::ServerSide => Some(RecordFilter::BothEmpty {
            icon: names.icon.clone(),
            cover: names.cover.clone(),
        }),
    }
}

/// Keeps full records whose icon and cover are both unset.
///
/// Runs regardless of strategy, so a source that ignores the server-side
/// predicate cannot make a decorated record eligible.
pub fn select_eligible(views: impl IntoIterator<Item = RecordView>) -> Eligibility {
    let mut result = Eligibility::default();
    for view in views {
        match view {
            RecordView::Full(record) if record.is_undecorated() => result.eligible.push(record),
            RecordView::Full(record) => result.skipped.push((record.id, SkipReason::Decorated)),
            RecordView::Partial { id } => result.skipped.push((id, SkipReason::Partial)),
        }
    }
    result
}

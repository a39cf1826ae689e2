//! Domain model (ids, records, schema, decorations, outcomes, events, ...).

pub mod config;
pub mod decoration;
pub mod errors;
pub mod events;
pub mod ids;
pub mod outcome;
pub mod record;
pub mod retry;
pub mod schema;

pub use config::{Credentials, FilterStrategy, RunConfig};
pub use decoration::{CATALOG, DEFAULT_ICON, Decoration, DecorationSpec, SolidColor};
pub use errors::{DecorError, ErrorKind, SourceError};
pub use events::DomainEvent;
pub use ids::{DatabaseId, RecordId};
pub use outcome::{BatchSummary, MAX_RETRIES_EXCEEDED, OutcomeKind, RecordOutcome, UpdateOutcome};
pub use record::{Record, RecordFilter, RecordView};
pub use retry::{MAX_RETRIES, RETRY_DELAY, RetryDecision, RetryPolicy, RetryState};
pub use schema::{AttributeNames, COVER_KIND, ICON_KIND, PropertyDescriptor, Schema};

//! Hosted runner (GitHub Actions) support.
//!
//! On a runner, action inputs arrive as `INPUT_<NAME>` variables and errors are
//! surfaced through `::error::` workflow commands on stdout, in addition to
//! the regular log output.

use std::collections::HashMap;
use std::sync::Arc;

use decor_core::domain::DomainEvent;
use decor_core::ports::EventSink;

const INPUT_NAMES: [&str; 2] = ["notion_api_key", "notion_database_id"];

#[derive(Debug, Clone, Default)]
pub struct HostedContext {
    active: bool,
    inputs: HashMap<String, String>,
}

impl HostedContext {
    pub fn detect() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let active = lookup("GITHUB_ACTIONS").is_some_and(|v| v == "true");
        let inputs = INPUT_NAMES
            .iter()
            .filter_map(|name| {
                let value = lookup(&format!("INPUT_{}", name.to_uppercase()))?;
                let value = value.trim();
                (!value.is_empty()).then(|| (name.to_string(), value.to_string()))
            })
            .collect();
        Self { active, inputs }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Action input by name; always `None` outside a runner.
    pub fn input(&self, name: &str) -> Option<String> {
        if !self.active {
            return None;
        }
        self.inputs.get(name).cloned()
    }

    /// Marks the job step as failed. No-op outside a runner.
    pub fn set_failed(&self, message: &str) {
        if self.active {
            println!("{}", error_command(message));
        }
    }
}

/// `::error::` workflow command with the data escaped.
pub fn error_command(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{escaped}")
}

/// Forwards every event to `inner` and also annotates error events on the runner.
pub struct ActionsEventSink {
    inner: Arc<dyn EventSink>,
}

impl ActionsEventSink {
    pub fn new(inner: Arc<dyn EventSink>) -> Self {
        Self { inner }
    }
}

impl EventSink for ActionsEventSink {
    fn emit(&self, event: DomainEvent) {
        if event.is_error() {
            println!("{}", error_command(&event.message()));
        }
        self.inner.emit(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decor_core::domain::{ErrorKind, RecordId};
    use decor_core::impls::RecordingEventSink;
    use rstest::rstest;

    fn context(vars: &'static [(&'static str, &'static str)]) -> HostedContext {
        HostedContext::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
    }

    #[rstest]
    #[case::runner(&[("GITHUB_ACTIONS", "true")], true)]
    #[case::other_value(&[("GITHUB_ACTIONS", "1")], false)]
    #[case::absent(&[], false)]
    fn detects_runner(#[case] vars: &'static [(&'static str, &'static str)], #[case] active: bool) {
        assert_eq!(context(vars).is_active(), active);
    }

    #[test]
    fn blank_inputs_are_dropped() {
        let ctx = context(&[
            ("GITHUB_ACTIONS", "true"),
            ("INPUT_NOTION_API_KEY", "  "),
            ("INPUT_NOTION_DATABASE_ID", " db "),
        ]);
        assert_eq!(ctx.input("notion_api_key"), None);
        assert_eq!(ctx.input("notion_database_id").as_deref(), Some("db"));
    }

    #[test]
    fn error_command_escapes_newlines() {
        assert_eq!(
            error_command("100% broken\nsecond line"),
            "::error::100%25 broken%0Asecond line"
        );
    }

    #[test]
    fn actions_sink_forwards_everything() {
        let recorded = Arc::new(RecordingEventSink::new());
        let sink = ActionsEventSink::new(recorded.clone());

        sink.emit(DomainEvent::UpdateFailed {
            record_id: RecordId::new("a"),
            reason: "nope".into(),
            kind: ErrorKind::Permanent,
        });
        sink.emit(DomainEvent::BatchSummary {
            succeeded: 0,
            failed: 1,
        });

        assert_eq!(recorded.events().len(), 2);
    }
}

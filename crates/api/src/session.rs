use crate::error::EditorError;
use recurrence_editor_api_structs::codec::{decode_any, encode, CodecError};
use recurrence_editor_domain::{RecurrenceEditor, RecurrenceRule};
use recurrence_editor_infra::RecurrenceContext;
use tracing::{debug, warn};

/// The serialized form of a rule at the moment a request to the occurrence
/// service was fired
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleSnapshot(String);

impl RuleSnapshot {
    pub fn new(rule: &RecurrenceRule) -> Result<Self, CodecError> {
        Ok(Self(encode(rule)?))
    }

    pub fn serialized(&self) -> &str {
        &self.0
    }
}

/// A response of the occurrence service together with the snapshot of the
/// rule it was computed for
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged<T> {
    pub snapshot: RuleSnapshot,
    pub value: T,
}

/// One user editing one rule. Owns the `RecurrenceEditor` and decides which
/// occurrence service responses still apply to the rule being edited.
#[derive(Debug)]
pub struct RuleSession {
    editor: RecurrenceEditor,
}

impl RuleSession {
    /// Session for a new event starting now
    pub fn new(ctx: &RecurrenceContext) -> Self {
        let now = ctx.sys.get_timestamp_millis();
        Self::with_rule(RecurrenceRule::new(now), ctx)
    }

    /// Session for a rule stored by the server, in either encoding
    pub fn from_serialized(serialized: &str, ctx: &RecurrenceContext) -> Self {
        let now = ctx.sys.get_timestamp_millis();
        Self::with_rule(decode_any(serialized, now), ctx)
    }

    pub fn with_rule(mut rule: RecurrenceRule, ctx: &RecurrenceContext) -> Self {
        if rule.normalize() {
            debug!("Normalized the rule of a new session");
        }
        Self {
            editor: RecurrenceEditor::new(rule, ctx.config.editor_settings()),
        }
    }

    pub fn editor(&self) -> &RecurrenceEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut RecurrenceEditor {
        &mut self.editor
    }

    pub fn rule(&self) -> &RecurrenceRule {
        self.editor.rule()
    }

    pub fn serialize(&self) -> Result<String, EditorError> {
        Ok(encode(self.rule())?)
    }

    pub fn snapshot(&self) -> Result<RuleSnapshot, EditorError> {
        Ok(RuleSnapshot::new(self.rule())?)
    }

    pub fn is_current(&self, snapshot: &RuleSnapshot) -> bool {
        match self.serialize() {
            Ok(serialized) => serialized == snapshot.serialized(),
            Err(_) => false,
        }
    }

    /// Unwraps a response, unless the rule was edited after the request was fired
    pub fn accept<T>(&self, tagged: Tagged<T>) -> Result<T, EditorError> {
        if self.is_current(&tagged.snapshot) {
            Ok(tagged.value)
        } else {
            warn!("Discarding occurrence service response for an outdated rule");
            Err(EditorError::StaleResponse)
        }
    }
}

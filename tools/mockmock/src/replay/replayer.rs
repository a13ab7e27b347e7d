//! Handing recorded entries back in recording order.

use crate::errors::MockmockError;
use crate::logging::append_run_log;
use crate::replay::fixture::{entries_for, Mock};
use crate::store::MockStore;
use crate::types::{KindMap, MockKind};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::collections::BTreeMap;

/// Context -> kind -> id -> number of successful replays.
pub type MockTracker = BTreeMap<String, KindMap<BTreeMap<String, usize>>>;

impl MockStore {
    /// The next entry for `(current context, kind, id)`.
    ///
    /// The call counter only advances when an entry is returned, so a failed
    /// call can be retried after loading the right fixture.
    pub fn replay(&mut self, id: &str, kind: MockKind) -> Result<&Mock, MockmockError> {
        self.ensure_ready("replay")?;
        let context = self.context_id.clone();
        let fixture = self.fixture_label();

        let entries = match entries_for(&self.fixture, &context, kind, id) {
            Some(entries) if !entries.is_empty() => entries,
            _ => {
                let message = format!(
                    "your test expected \"{id}\" of kind \"{kind}\" in context \"{context}\" inside {fixture}, but nothing was recorded there"
                );
                append_run_log(
                    "warn",
                    "mock.replay.failed",
                    json!({ "context": context, "kind": kind, "id": id, "error": message }),
                );
                return Err(MockmockError::NotFound(message));
            }
        };

        let counter = self
            .tracker
            .entry(context.clone())
            .or_default()
            .get_mut(kind)
            .entry(id.to_string())
            .or_insert(0);
        let index = *counter;
        if index >= entries.len() {
            let message = format!(
                "call {} for \"{id}\" of kind \"{kind}\" in context \"{context}\" inside {fixture}, but only {} entr{} recorded",
                index + 1,
                entries.len(),
                if entries.len() == 1 { "y was" } else { "ies were" }
            );
            append_run_log(
                "warn",
                "mock.replay.failed",
                json!({ "context": context, "kind": kind, "id": id, "error": message }),
            );
            return Err(MockmockError::OutOfBounds(message));
        }
        *counter += 1;

        append_run_log(
            "debug",
            "mock.replayed",
            json!({ "context": context, "kind": kind, "id": id, "index": index }),
        );
        Ok(&entries[index])
    }

    /// [`MockStore::replay`], deserialized into `T`.
    pub fn replay_as<T: DeserializeOwned>(
        &mut self,
        id: &str,
        kind: MockKind,
    ) -> Result<T, MockmockError> {
        let value = self.replay(id, kind)?.to_value();
        serde_json::from_value(value).map_err(|e| {
            MockmockError::InvalidFixture(format!(
                "entry for \"{id}\" of kind \"{kind}\" does not have the requested shape: {e}"
            ))
        })
    }

    /// Restart replay of every id in the current context from its first entry.
    pub fn reset_playback(&mut self) {
        self.tracker
            .insert(self.context_id.clone(), KindMap::default());
        append_run_log(
            "debug",
            "mock.playback.reset",
            json!({ "context": self.context_id }),
        );
    }

    /// Replays consumed so far for `(current context, kind, id)`.
    pub fn replay_position(&self, id: &str, kind: MockKind) -> usize {
        self.tracker
            .get(&self.context_id)
            .and_then(|kinds| kinds.get(kind).get(id))
            .copied()
            .unwrap_or(0)
    }
}

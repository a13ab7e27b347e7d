//! Appending entries to the recording buffer.

use crate::classify::classify;
use crate::errors::MockmockError;
use crate::logging::append_run_log;
use crate::replay::fixture::Mock;
use crate::store::MockStore;
use crate::types::MockKind;
use serde::Serialize;
use serde_json::{json, Value};
use std::future::Future;

impl MockStore {
    /// Record a data payload under `id` in the current context.
    pub fn record(&mut self, id: &str, data: Value) -> Result<(), MockmockError> {
        self.add_entry(id, MockKind::Data, data)
    }

    pub fn record_value<T>(&mut self, id: &str, data: &T) -> Result<(), MockmockError>
    where
        T: Serialize + ?Sized,
    {
        let value = to_recordable(id, MockKind::Data, data)?;
        self.add_entry(id, MockKind::Data, value)
    }

    /// Run `call`, record what it returned as a sync entry, and hand it back.
    pub fn record_sync_result<T, F>(&mut self, id: &str, call: F) -> Result<T, MockmockError>
    where
        T: Serialize,
        F: FnOnce() -> T,
    {
        let result = call();
        let value = to_recordable(id, MockKind::Sync, &result)?;
        self.add_entry(id, MockKind::Sync, value)?;
        Ok(result)
    }

    /// Await `pending`, record the resolved value as an async entry, and hand
    /// it back. Nothing is recorded when the future never resolves.
    pub async fn record_async_result<T, Fut>(
        &mut self,
        id: &str,
        pending: Fut,
    ) -> Result<T, MockmockError>
    where
        T: Serialize,
        Fut: Future<Output = T>,
    {
        let result = pending.await;
        let value = to_recordable(id, MockKind::Async, &result)?;
        self.add_entry(id, MockKind::Async, value)?;
        Ok(result)
    }

    pub(crate) fn add_entry(
        &mut self,
        id: &str,
        kind: MockKind,
        data: Value,
    ) -> Result<(), MockmockError> {
        let context = self.context_id.clone();
        let map = match data {
            Value::Object(map) => map,
            other => {
                return Err(MockmockError::InvalidInput(format!(
                    "cannot record \"{id}\" of kind \"{kind}\" in context \"{context}\": expected a JSON object, got {}",
                    classify(&other).as_str()
                )))
            }
        };

        let entries = self
            .recording
            .entry(context.clone())
            .or_default()
            .get_mut(kind)
            .entry(id.to_string())
            .or_default();
        entries.push(Mock::new(map));
        let index = entries.len() - 1;

        append_run_log(
            "debug",
            "mock.recorded",
            json!({ "context": context, "kind": kind, "id": id, "index": index }),
        );
        Ok(())
    }
}

fn to_recordable<T>(id: &str, kind: MockKind, data: &T) -> Result<Value, MockmockError>
where
    T: Serialize + ?Sized,
{
    serde_json::to_value(data).map_err(|e| {
        MockmockError::InvalidInput(format!("cannot serialize \"{id}\" of kind \"{kind}\": {e}"))
    })
}

//! The fixture/recording store.
//!
//! A [`MockStore`] owns two buffers. Recording appends to the *recording*
//! buffer and `save` writes that buffer out. `load` replaces the *fixture*
//! buffer, which is what `replay`, `search` and `frame_count` read. The two
//! are never merged: saving does not make recorded data replayable until it
//! is loaded back.
//!
//! A successful `save` also moves the store to `Ready`. When nothing was
//! loaded first, `replay` and `search` then fail with `NotFound` against the
//! empty fixture buffer rather than `NotReady`.

use crate::classify::{classify, is_structured};
use crate::config::MockmockConfig;
use crate::count::frame_count;
use crate::errors::MockmockError;
use crate::fsm::{validate_transition, StoreState};
use crate::logging::append_run_log;
use crate::matcher::{Matcher, StubMatcher};
use crate::replay::fixture::{fixture_file_name, parse_fixture, render_fixture, Mock, MockFixture};
use crate::replay::replayer::MockTracker;
use crate::runtime::FileSystem;
use crate::search::{search, SearchHit};
use crate::stub::stub;
use crate::types::{MockKind, DEFAULT_CONTEXT};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub fixture_dir: PathBuf,
    pub default_context: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            fixture_dir: PathBuf::new(),
            default_context: DEFAULT_CONTEXT.to_string(),
        }
    }
}

impl From<&MockmockConfig> for StoreSettings {
    fn from(cfg: &MockmockConfig) -> Self {
        Self {
            fixture_dir: cfg.fixtures.dir.clone(),
            default_context: cfg.context.default.clone(),
        }
    }
}

pub struct MockStore {
    pub(crate) file_system: Arc<dyn FileSystem>,
    pub(crate) fixture_dir: PathBuf,
    pub(crate) recording: MockFixture,
    pub(crate) fixture: MockFixture,
    pub(crate) tracker: MockTracker,
    pub(crate) context_id: String,
    pub(crate) fixture_name: Option<String>,
    pub(crate) state: StoreState,
}

impl MockStore {
    pub fn new(file_system: Arc<dyn FileSystem>, settings: StoreSettings) -> Self {
        Self {
            file_system,
            fixture_dir: settings.fixture_dir,
            recording: MockFixture::new(),
            fixture: MockFixture::new(),
            tracker: MockTracker::new(),
            context_id: settings.default_context,
            fixture_name: None,
            state: StoreState::Uninitialized,
        }
    }

    pub fn from_config(cfg: &MockmockConfig, file_system: Arc<dyn FileSystem>) -> Self {
        Self::new(file_system, StoreSettings::from(cfg))
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn state(&self) -> StoreState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn current_context(&self) -> &str {
        &self.context_id
    }

    /// The buffer `replay`, `search` and `frame_count` read.
    pub fn fixture(&self) -> &MockFixture {
        &self.fixture
    }

    /// The buffer `record*` appends to and `save` writes.
    pub fn recording(&self) -> &MockFixture {
        &self.recording
    }

    pub fn fixture_name(&self) -> Option<&str> {
        self.fixture_name.as_deref()
    }

    pub fn fixture_dir(&self) -> &Path {
        &self.fixture_dir
    }

    pub fn set_fixture_dir(&mut self, dir: impl Into<PathBuf>) {
        self.fixture_dir = dir.into();
    }

    pub fn fixture_path(&self, name: &str) -> PathBuf {
        self.fixture_dir.join(fixture_file_name(name))
    }

    pub(crate) fn fixture_label(&self) -> String {
        match &self.fixture_name {
            Some(name) => fixture_file_name(name),
            None => "<no fixture loaded>".to_string(),
        }
    }

    // ── Contexts ──────────────────────────────────────────────────────────────

    /// Switch to `context_id` unless it is absent, empty, or already current.
    /// Returns the current context either way.
    pub fn context(&mut self, context_id: Option<&str>) -> &str {
        if let Some(next) = context_id {
            if !next.is_empty() && next != self.context_id {
                self.init_context(next);
            }
        }
        &self.context_id
    }

    fn init_context(&mut self, context_id: &str) {
        append_run_log(
            "info",
            "context.switched",
            json!({ "from": self.context_id, "to": context_id }),
        );
        self.context_id = context_id.to_string();
        self.recording.entry(context_id.to_string()).or_default();
        self.tracker.entry(context_id.to_string()).or_default();
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    fn transition(&mut self, next: StoreState) -> Result<(), MockmockError> {
        validate_transition(self.state, next)?;
        self.state = next;
        Ok(())
    }

    pub(crate) fn ensure_ready(&self, operation: &str) -> Result<(), MockmockError> {
        if self.state == StoreState::Ready {
            return Ok(());
        }
        Err(MockmockError::NotReady(format!(
            "cannot {operation} while the store is {}; load a fixture and wait for it to finish first",
            self.state.as_str()
        )))
    }

    /// Replace the fixture buffer with `<fixture_dir>/<name>.fixture.json`,
    /// then switch to `context_id` when given. Loading the active fixture
    /// again only switches context. On failure nothing changes.
    pub fn load(&mut self, name: &str, context_id: Option<&str>) -> Result<(), MockmockError> {
        if self.fixture_name.as_deref() == Some(name) {
            append_run_log(
                "debug",
                "fixture.load.skipped",
                json!({ "fixture": name, "context": context_id }),
            );
            self.context(context_id);
            return Ok(());
        }

        let previous = self.state;
        self.transition(StoreState::Loading)?;
        let path = self.fixture_path(name);
        append_run_log(
            "info",
            "fixture.load.started",
            json!({ "fixture": name, "path": path.display().to_string() }),
        );

        match self.read_fixture(&path) {
            Ok(fixture) => {
                let contexts = fixture.len();
                self.fixture = fixture;
                self.fixture_name = Some(name.to_string());
                self.context(context_id);
                self.transition(StoreState::Ready)?;
                append_run_log(
                    "info",
                    "fixture.load.completed",
                    json!({ "fixture": name, "contexts": contexts, "context": self.context_id }),
                );
                Ok(())
            }
            Err(error) => {
                self.transition(previous)?;
                append_run_log(
                    "error",
                    "fixture.load.failed",
                    json!({ "fixture": name, "error": error.to_string() }),
                );
                Err(error)
            }
        }
    }

    fn read_fixture(&self, path: &Path) -> Result<MockFixture, MockmockError> {
        let text = self.file_system.read_to_string(path)?;
        parse_fixture(&text, &path.display().to_string())
    }

    /// Write the recording buffer to `<fixture_dir>/<name>.fixture.json`.
    pub fn save(&mut self, name: &str) -> Result<(), MockmockError> {
        let previous = self.state;
        self.transition(StoreState::Saving)?;
        let path = self.fixture_path(name);
        append_run_log(
            "info",
            "fixture.save.started",
            json!({ "fixture": name, "path": path.display().to_string() }),
        );

        match self.write_recording(&path) {
            Ok(()) => {
                // The file on disk no longer matches the loaded buffer.
                if self.fixture_name.as_deref() == Some(name) {
                    self.fixture_name = None;
                }
                self.transition(StoreState::Ready)?;
                append_run_log(
                    "info",
                    "fixture.save.completed",
                    json!({ "fixture": name, "contexts": self.recording.len() }),
                );
                Ok(())
            }
            Err(error) => {
                self.transition(previous)?;
                append_run_log(
                    "error",
                    "fixture.save.failed",
                    json!({ "fixture": name, "error": error.to_string() }),
                );
                Err(error)
            }
        }
    }

    fn write_recording(&self, path: &Path) -> Result<(), MockmockError> {
        let text = render_fixture(&self.recording)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.file_system.create_dir_all(parent)?;
            }
        }
        self.file_system.write_string(path, &text)
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    /// Greedy deep search of the fixture buffer. `kinds` defaults to every
    /// kind, `contexts` to the current context.
    pub fn search(
        &self,
        terms: &[Matcher],
        kinds: Option<&[MockKind]>,
        contexts: Option<&[String]>,
    ) -> Result<&Mock, MockmockError> {
        self.search_hit(terms, kinds, contexts).map(|hit| hit.mock)
    }

    pub fn search_hit(
        &self,
        terms: &[Matcher],
        kinds: Option<&[MockKind]>,
        contexts: Option<&[String]>,
    ) -> Result<SearchHit<'_>, MockmockError> {
        self.ensure_ready("search")?;
        let current = [self.context_id.clone()];
        let kinds = kinds.unwrap_or(&MockKind::ALL);
        let contexts = contexts.unwrap_or(&current);
        let hit = search(terms, &self.fixture, kinds, contexts)?;
        append_run_log(
            "debug",
            "search.completed",
            json!({
                "terms": terms.len(),
                "context": hit.context,
                "kind": hit.kind,
                "id": hit.id,
                "index": hit.index
            }),
        );
        Ok(hit)
    }

    /// Stubbed copy of a structured `value`; the input is left untouched.
    pub fn stub(&self, matchers: &[StubMatcher], value: &Value) -> Result<Value, MockmockError> {
        if !is_structured(value) {
            return Err(MockmockError::InvalidInput(format!(
                "only objects and arrays can be stubbed, got {}",
                classify(value).as_str()
            )));
        }
        Ok(stub(matchers, value))
    }

    /// Entries in the fixture buffer for `id`. `kinds` defaults to every
    /// kind, `contexts` to the current context.
    pub fn frame_count(
        &self,
        id: &str,
        kinds: Option<&[MockKind]>,
        contexts: Option<&[String]>,
    ) -> usize {
        let current = [self.context_id.clone()];
        frame_count(
            id,
            &self.fixture,
            kinds.unwrap_or(&MockKind::ALL),
            contexts.unwrap_or(&current),
        )
    }
}

pub mod classify;
pub mod config;
pub mod count;
pub mod errors;
pub mod fsm;
pub mod logging;
pub mod matcher;
pub mod replay;
pub mod runtime;
pub mod search;
pub mod store;
pub mod stub;
pub mod types;

use clap::{error::ErrorKind, Parser, Subcommand, ValueEnum};
use config::{load_config, CliOverrides};
use errors::MockmockError;
use logging::{init_run_logger, JsonlLogger};
use matcher::{Matcher, StubMatcher};
use runtime::{ProductionRuntime, Terminal};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::PathBuf;
use store::MockStore;
use types::MockKind;

#[derive(Debug, Clone, Parser)]
#[command(name = "mockmock", version)]
#[command(about = "Inspect, search and replay mockmock fixture files")]
pub struct Cli {
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(long, global = true)]
    pub fixture_dir: Option<PathBuf>,
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List every recorded id as `context kind id count`.
    Contexts { fixture: String },
    /// Count the entries recorded for an id.
    Count {
        fixture: String,
        #[arg(long)]
        id: String,
        #[arg(long = "kind", value_enum)]
        kinds: Vec<CliKind>,
        #[arg(long = "context")]
        contexts: Vec<String>,
    },
    /// Print the first entry satisfying every search term.
    Search {
        fixture: String,
        /// JSON array of matchers, e.g. `[{"keys":["sessionId"]}]`.
        #[arg(long)]
        terms: String,
        #[arg(long = "kind", value_enum)]
        kinds: Vec<CliKind>,
        #[arg(long = "context")]
        contexts: Vec<String>,
    },
    /// Print the entry a test would receive on a given call.
    Replay {
        fixture: String,
        #[arg(long)]
        id: String,
        #[arg(long, value_enum)]
        kind: CliKind,
        #[arg(long)]
        context: Option<String>,
        /// Zero-based call number.
        #[arg(long, default_value_t = 0)]
        call: usize,
    },
    /// Print a JSON document with matching primitives replaced.
    Stub {
        input: PathBuf,
        /// JSON array of stub matchers, e.g. `[{"keys":["date"],"stub":"<date>"}]`.
        #[arg(long)]
        matchers: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliKind {
    Data,
    Sync,
    Async,
}

impl From<CliKind> for MockKind {
    fn from(value: CliKind) -> Self {
        match value {
            CliKind::Data => MockKind::Data,
            CliKind::Sync => MockKind::Sync,
            CliKind::Async => MockKind::Async,
        }
    }
}

pub fn run() -> Result<i32, MockmockError> {
    let args = std::env::args_os().collect::<Vec<_>>();
    let cwd = std::env::current_dir().map_err(|e| MockmockError::Io(e.to_string()))?;
    let runtime = ProductionRuntime::new();
    run_with_runtime(&args, &cwd, &runtime)
}

pub fn run_with_runtime(
    args: &[std::ffi::OsString],
    cwd: &std::path::Path,
    runtime: &ProductionRuntime,
) -> Result<i32, MockmockError> {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => match error.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{error}");
                return Ok(0);
            }
            _ => return Err(MockmockError::Cli(error.to_string())),
        },
    };

    let overrides = CliOverrides {
        config_path: cli.config.clone(),
        fixture_dir: cli.fixture_dir.clone(),
        log_file: cli.log_file.clone(),
    };
    let cfg = load_config(&overrides, cwd, runtime.file_system.as_ref())?;

    if let Some(path) = &cfg.logging.path {
        let mut logger = JsonlLogger::new(path);
        logger.max_payload_bytes = cfg.logging.max_payload_bytes;
        init_run_logger(logger);
    }

    let mut store = MockStore::from_config(&cfg, runtime.file_system.clone());
    let terminal = runtime.terminal.as_ref();

    match cli.command {
        Command::Contexts { fixture } => {
            store.load(&fixture, None)?;
            for (context, groups) in store.fixture() {
                for kind in MockKind::ALL {
                    for (id, entries) in groups.get(kind) {
                        terminal.write_line(&format!("{context} {kind} {id} {}", entries.len()))?;
                    }
                }
            }
        }
        Command::Count {
            fixture,
            id,
            kinds,
            contexts,
        } => {
            store.load(&fixture, None)?;
            let kinds = kind_filter(&kinds);
            let count = store.frame_count(&id, kinds.as_deref(), context_filter(&contexts));
            terminal.write_line(&count.to_string())?;
        }
        Command::Search {
            fixture,
            terms,
            kinds,
            contexts,
        } => {
            let terms: Vec<Matcher> = parse_flag_json("--terms", &terms)?;
            store.load(&fixture, None)?;
            let kinds = kind_filter(&kinds);
            let hit = store.search_hit(&terms, kinds.as_deref(), context_filter(&contexts))?;
            write_pretty(terminal, &hit.mock.to_value())?;
        }
        Command::Replay {
            fixture,
            id,
            kind,
            context,
            call,
        } => {
            store.load(&fixture, context.as_deref())?;
            let kind = MockKind::from(kind);
            for _ in 0..call {
                store.replay(&id, kind)?;
            }
            let mock = store.replay(&id, kind)?.to_value();
            write_pretty(terminal, &mock)?;
        }
        Command::Stub { input, matchers } => {
            let matchers: Vec<StubMatcher> = parse_flag_json("--matchers", &matchers)?;
            let path = cwd.join(input);
            let text = runtime.file_system.read_to_string(&path)?;
            let value: Value = serde_json::from_str(&text).map_err(|e| {
                MockmockError::InvalidInput(format!("{}: {e}", path.display()))
            })?;
            let stubbed = store.stub(&matchers, &value)?;
            write_pretty(terminal, &stubbed)?;
        }
    }

    Ok(0)
}

fn kind_filter(kinds: &[CliKind]) -> Option<Vec<MockKind>> {
    if kinds.is_empty() {
        None
    } else {
        Some(kinds.iter().copied().map(MockKind::from).collect())
    }
}

fn context_filter(contexts: &[String]) -> Option<&[String]> {
    if contexts.is_empty() {
        None
    } else {
        Some(contexts)
    }
}

fn parse_flag_json<T: DeserializeOwned>(flag: &str, raw: &str) -> Result<T, MockmockError> {
    serde_json::from_str(raw).map_err(|e| MockmockError::Cli(format!("{flag}: {e}")))
}

fn write_pretty(terminal: &dyn Terminal, value: &Value) -> Result<(), MockmockError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| MockmockError::Io(e.to_string()))?;
    terminal.write_line(&text)
}

#[cfg(test)]
mod tests {
    use super::run_with_runtime;
    use crate::errors::MockmockError;
    use crate::runtime::{FakeFileSystem, FakeTerminal, ProductionRuntime};
    use serde_json::json;
    use std::ffi::OsString;
    use std::path::Path;
    use std::sync::Arc;

    fn fake_runtime() -> (FakeFileSystem, FakeTerminal, ProductionRuntime) {
        let fs = FakeFileSystem::with_file(
            "/work/fixtures/shop.fixture.json",
            json!({
                "default": {
                    "data": {"cart": [{"mock": {"count": 1}}, {"mock": {"count": 2}}]},
                    "sync": {},
                    "async": {"getUser": [{"mock": {"name": "ada"}}]}
                },
                "admin": {"data": {"cart": [{"mock": {"count": 3}}]}, "sync": {}, "async": {}}
            })
            .to_string(),
        );
        let terminal = FakeTerminal::default();
        let runtime = ProductionRuntime {
            file_system: Arc::new(fs.clone()),
            terminal: Arc::new(terminal.clone()),
        };
        (fs, terminal, runtime)
    }

    fn args(items: &[&str]) -> Vec<OsString> {
        std::iter::once("mockmock")
            .chain(items.iter().copied())
            .map(OsString::from)
            .collect()
    }

    #[test]
    fn contexts_lists_every_id_with_its_count() {
        let (_fs, terminal, runtime) = fake_runtime();
        let code = run_with_runtime(&args(&["contexts", "shop"]), Path::new("/work"), &runtime)
            .expect("run");
        assert_eq!(code, 0);
        assert_eq!(
            terminal.written_lines(),
            vec!["admin data cart 1", "default data cart 2", "default async getUser 1"]
        );
    }

    #[test]
    fn count_defaults_to_the_configured_context() {
        let (_fs, terminal, runtime) = fake_runtime();
        run_with_runtime(&args(&["count", "shop", "--id", "cart"]), Path::new("/work"), &runtime)
            .expect("default context");
        run_with_runtime(
            &args(&["count", "shop", "--id", "cart", "--context", "default", "--context", "admin", "--kind", "data"]),
            Path::new("/work"),
            &runtime,
        )
        .expect("explicit scope");
        assert_eq!(terminal.written_lines(), vec!["2", "3"]);
    }

    #[test]
    fn replay_prints_the_requested_call() {
        let (_fs, terminal, runtime) = fake_runtime();
        run_with_runtime(
            &args(&["replay", "shop", "--id", "cart", "--kind", "data", "--call", "1"]),
            Path::new("/work"),
            &runtime,
        )
        .expect("run");
        let printed: serde_json::Value =
            serde_json::from_str(&terminal.written_lines()[0]).expect("json");
        assert_eq!(printed, json!({"count": 2}));

        let err = run_with_runtime(
            &args(&["replay", "shop", "--id", "cart", "--kind", "data", "--call", "2"]),
            Path::new("/work"),
            &runtime,
        )
        .expect_err("only two calls recorded");
        assert!(matches!(err, MockmockError::OutOfBounds(_)));
    }

    #[test]
    fn stub_reads_input_relative_to_cwd() {
        let (fs, terminal, runtime) = fake_runtime();
        fs.insert("/work/page.json", r#"{"title": "Home", "meta": {"date": "2019-01-01"}}"#);
        run_with_runtime(
            &args(&["stub", "page.json", "--matchers", r#"[{"keys": ["date"], "stub": "<date>"}]"#]),
            Path::new("/work"),
            &runtime,
        )
        .expect("run");
        let printed: serde_json::Value =
            serde_json::from_str(&terminal.written_lines()[0]).expect("json");
        assert_eq!(printed, json!({"title": "Home", "meta": {"date": "<date>"}}));
    }

    #[test]
    fn malformed_flag_json_is_a_cli_error() {
        let (_fs, _terminal, runtime) = fake_runtime();
        let err = run_with_runtime(
            &args(&["search", "shop", "--terms", "not json"]),
            Path::new("/work"),
            &runtime,
        )
        .expect_err("bad terms");
        assert!(matches!(err, MockmockError::Cli(message) if message.starts_with("--terms")));

        let err = run_with_runtime(&args(&["count", "shop"]), Path::new("/work"), &runtime)
            .expect_err("missing --id");
        assert!(matches!(err, MockmockError::Cli(_)));
    }

    #[test]
    fn misspelled_stub_facet_fails_instead_of_redacting_everything() {
        let (fs, terminal, runtime) = fake_runtime();
        fs.insert("/work/page.json", r#"{"title": "Home", "meta": {"date": "2019", "n": 3}}"#);
        let err = run_with_runtime(
            &args(&["stub", "page.json", "--matchers", r#"[{"stub": "X", "key": ["date"]}]"#]),
            Path::new("/work"),
            &runtime,
        )
        .expect_err("unknown facet");
        assert!(matches!(err, MockmockError::Cli(message) if message.starts_with("--matchers")));
        assert!(terminal.written_lines().is_empty());
    }
}

use crate::errors::MockmockError;
use crate::logging::DEFAULT_MAX_PAYLOAD_BYTES;
use crate::runtime::FileSystem;
use crate::types::DEFAULT_CONTEXT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "mockmock.toml";

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub fixture_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MockmockConfig {
    pub fixtures: FixturesConfig,
    pub context: ContextConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FixturesConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContextConfig {
    pub default: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    pub path: Option<PathBuf>,
    pub max_payload_bytes: usize,
}

impl Default for MockmockConfig {
    fn default() -> Self {
        Self {
            fixtures: FixturesConfig {
                dir: PathBuf::from("fixtures"),
            },
            context: ContextConfig {
                default: DEFAULT_CONTEXT.to_string(),
            },
            logging: LoggingConfig {
                path: None,
                max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialMockmockConfig {
    fixtures: Option<PartialFixturesConfig>,
    context: Option<PartialContextConfig>,
    logging: Option<PartialLoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialFixturesConfig {
    dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialContextConfig {
    default: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialLoggingConfig {
    path: Option<PathBuf>,
    max_payload_bytes: Option<usize>,
}

/// Defaults, then the TOML file (explicit path or `./mockmock.toml`), then
/// CLI overrides. Relative paths resolve against `process_cwd`.
pub fn load_config(
    overrides: &CliOverrides,
    process_cwd: &Path,
    fs: &dyn FileSystem,
) -> Result<MockmockConfig, MockmockError> {
    let mut cfg = MockmockConfig::default();

    let discovered = process_cwd.join(CONFIG_FILE_NAME);
    let config_path = match &overrides.config_path {
        Some(path) => Some(absolutize_path(process_cwd, path)),
        None if fs.exists(&discovered) => Some(discovered),
        None => None,
    };

    if let Some(path) = config_path {
        let file_contents = fs.read_to_string(&path)?;
        let partial: PartialMockmockConfig = toml::from_str(&file_contents)
            .map_err(|e| MockmockError::ConfigParse(format!("{}: {e}", path.display())))?;
        merge_partial_config(&mut cfg, partial);
    }

    apply_cli_overrides(&mut cfg, overrides);

    cfg.fixtures.dir = absolutize_path(process_cwd, &cfg.fixtures.dir);
    if let Some(path) = &cfg.logging.path {
        cfg.logging.path = Some(absolutize_path(process_cwd, path));
    }

    validate_config(&cfg)?;
    Ok(cfg)
}

fn merge_partial_config(cfg: &mut MockmockConfig, partial: PartialMockmockConfig) {
    if let Some(fixtures) = partial.fixtures {
        if let Some(dir) = fixtures.dir {
            cfg.fixtures.dir = dir;
        }
    }

    if let Some(context) = partial.context {
        if let Some(default) = context.default {
            cfg.context.default = default;
        }
    }

    if let Some(logging) = partial.logging {
        if let Some(path) = logging.path {
            cfg.logging.path = Some(path);
        }
        if let Some(value) = logging.max_payload_bytes {
            cfg.logging.max_payload_bytes = value;
        }
    }
}

fn apply_cli_overrides(cfg: &mut MockmockConfig, overrides: &CliOverrides) {
    if let Some(dir) = &overrides.fixture_dir {
        cfg.fixtures.dir = dir.clone();
    }
    if let Some(path) = &overrides.log_file {
        cfg.logging.path = Some(path.clone());
    }
}

fn absolutize_path(base: &Path, value: &Path) -> PathBuf {
    if value.is_absolute() {
        value.to_path_buf()
    } else {
        base.join(value)
    }
}

fn validate_config(cfg: &MockmockConfig) -> Result<(), MockmockError> {
    if cfg.context.default.trim().is_empty() {
        return Err(MockmockError::InvalidConfig(
            "context.default must not be empty".to_string(),
        ));
    }

    if cfg.logging.max_payload_bytes == 0 {
        return Err(MockmockError::InvalidConfig(
            "logging.max_payload_bytes must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

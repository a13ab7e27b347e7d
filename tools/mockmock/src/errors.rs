use thiserror::Error;

#[derive(Debug, Error)]
pub enum MockmockError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid fixture: {0}")]
    InvalidFixture(String),
    #[error("not ready: {0}")]
    NotReady(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("out of bounds: {0}")]
    OutOfBounds(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("config parse error: {0}")]
    ConfigParse(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("cli error: {0}")]
    Cli(String),
}

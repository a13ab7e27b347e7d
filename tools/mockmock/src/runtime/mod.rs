use crate::errors::MockmockError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> Result<String, MockmockError>;
    fn write_string(&self, path: &Path, contents: &str) -> Result<(), MockmockError>;
    fn create_dir_all(&self, path: &Path) -> Result<(), MockmockError>;
    fn exists(&self, path: &Path) -> bool;
}

pub trait Terminal: Send + Sync {
    fn write_line(&self, line: &str) -> Result<(), MockmockError>;
}

fn io_error(action: &str, path: &Path, error: std::io::Error) -> MockmockError {
    MockmockError::Io(format!("failed to {action} {}: {error}", path.display()))
}

pub struct ProductionFileSystem;

impl FileSystem for ProductionFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, MockmockError> {
        std::fs::read_to_string(path).map_err(|e| io_error("read", path, e))
    }

    fn write_string(&self, path: &Path, contents: &str) -> Result<(), MockmockError> {
        std::fs::write(path, contents).map_err(|e| io_error("write", path, e))
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), MockmockError> {
        std::fs::create_dir_all(path).map_err(|e| io_error("create directory", path, e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

pub struct ProductionTerminal;

impl Terminal for ProductionTerminal {
    fn write_line(&self, line: &str) -> Result<(), MockmockError> {
        use std::io::Write;
        let mut out = std::io::stdout();
        writeln!(out, "{line}").map_err(|e| MockmockError::Io(e.to_string()))
    }
}

pub struct ProductionRuntime {
    pub file_system: Arc<dyn FileSystem>,
    pub terminal: Arc<dyn Terminal>,
}

impl ProductionRuntime {
    pub fn new() -> Self {
        Self {
            file_system: Arc::new(ProductionFileSystem),
            terminal: Arc::new(ProductionTerminal),
        }
    }
}

impl Default for ProductionRuntime {
    fn default() -> Self {
        Self::new()
    }
}

// ── Fakes ─────────────────────────────────────────────────────────────────────

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// In-memory file system. Clones share the same files.
#[derive(Default, Clone)]
pub struct FakeFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
    dirs: Arc<Mutex<Vec<PathBuf>>>,
    reads: Arc<Mutex<Vec<PathBuf>>>,
    fail_next: Arc<Mutex<Option<MockmockError>>>,
}

impl FakeFileSystem {
    pub fn with_file(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        let fs = Self::default();
        fs.insert(path, contents);
        fs
    }

    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        lock(&self.files).insert(path.into(), contents.into());
    }

    pub fn contents(&self, path: &Path) -> Option<String> {
        lock(&self.files).get(path).cloned()
    }

    pub fn created_dirs(&self) -> Vec<PathBuf> {
        lock(&self.dirs).clone()
    }

    /// Every path passed to `read_to_string`, in call order.
    pub fn reads(&self) -> Vec<PathBuf> {
        lock(&self.reads).clone()
    }

    pub fn set_fail_next(&self, error: MockmockError) {
        *lock(&self.fail_next) = Some(error);
    }

    fn maybe_fail(&self) -> Result<(), MockmockError> {
        if let Some(err) = lock(&self.fail_next).take() {
            return Err(err);
        }
        Ok(())
    }
}

impl FileSystem for FakeFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, MockmockError> {
        lock(&self.reads).push(path.to_path_buf());
        self.maybe_fail()?;
        lock(&self.files)
            .get(path)
            .cloned()
            .ok_or_else(|| MockmockError::Io(format!("missing file {}", path.display())))
    }

    fn write_string(&self, path: &Path, contents: &str) -> Result<(), MockmockError> {
        self.maybe_fail()?;
        lock(&self.files).insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), MockmockError> {
        self.maybe_fail()?;
        lock(&self.dirs).push(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        lock(&self.files).contains_key(path)
    }
}

#[derive(Default, Clone)]
pub struct FakeTerminal {
    writes: Arc<Mutex<Vec<String>>>,
}

impl FakeTerminal {
    pub fn written_lines(&self) -> Vec<String> {
        lock(&self.writes).clone()
    }
}

impl Terminal for FakeTerminal {
    fn write_line(&self, line: &str) -> Result<(), MockmockError> {
        lock(&self.writes).push(line.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FakeFileSystem, FileSystem, ProductionFileSystem};
    use crate::errors::MockmockError;
    use std::path::Path;

    #[test]
    fn fake_file_system_round_trips_and_fails_once() {
        let fs = FakeFileSystem::with_file("/f/a.json", "{}");
        assert!(fs.exists(Path::new("/f/a.json")));
        fs.set_fail_next(MockmockError::Io("disk full".to_string()));
        assert!(fs.write_string(Path::new("/f/b.json"), "[]").is_err());
        fs.write_string(Path::new("/f/b.json"), "[]").expect("second write");
        assert_eq!(fs.contents(Path::new("/f/b.json")).as_deref(), Some("[]"));
        assert!(fs.read_to_string(Path::new("/f/missing.json")).is_err());
        assert_eq!(fs.reads().len(), 1);
    }

    #[test]
    fn production_errors_name_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.fixture.json");
        let err = ProductionFileSystem
            .read_to_string(&missing)
            .expect_err("missing file");
        assert!(err.to_string().contains("nope.fixture.json"));
    }
}

//! Test utilities shared by unit and integration tests.
//!
//! Enabled for `cfg(test)` and through the `test-utils` feature, which the
//! integration suite turns on via the dev-dependency on this crate.
//!
//! ```rust,ignore
//! use strata_cli::test_utils::TestProject;
//!
//! let project = TestProject::new();
//! project.write_block("db", "db:\n  image: postgres\n");
//! project.write_stack("web", "services:\n  # @include db\n");
//! ```

use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests, once per process.
///
/// Uses `level` when given, else `RUST_LOG`; with neither, nothing is logged.
///
/// ```bash
/// RUST_LOG=strata_cli=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

/// A temporary project with a `strata/` directory and an empty user root.
///
/// ```text
/// <temp>/
/// ├── project/
/// │   └── strata/{blocks,vars}/
/// └── home/.strata/blocks/
/// ```
pub struct TestProject {
    _temp: TempDir,
    root: PathBuf,
    user_root: PathBuf,
}

impl TestProject {
    /// # Panics
    ///
    /// If the temporary directories cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let temp = TempDir::new().expect("create temp dir");
        let root = temp.path().join("project");
        let user_root = temp.path().join("home").join(".strata");
        for dir in [root.join("strata/blocks"), root.join("strata/vars"), user_root.join("blocks")] {
            std::fs::create_dir_all(&dir).expect("create test directories");
        }

        Self {
            _temp: temp,
            root,
            user_root,
        }
    }

    /// Project root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// User root (an installed, but empty, library)
    #[must_use]
    pub fn user_root(&self) -> &Path {
        &self.user_root
    }

    /// Write `content` to `relative` under the project root.
    ///
    /// # Panics
    ///
    /// If the file cannot be written.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, content).expect("write test file");
        path
    }

    /// Write `strata/blocks/<name>.yml.tpl`.
    pub fn write_block(&self, name: &str, content: &str) -> PathBuf {
        self.write(&format!("strata/blocks/{name}.yml.tpl"), content)
    }

    /// Write `strata/vars/<file>`.
    pub fn write_env(&self, file: &str, content: &str) -> PathBuf {
        self.write(&format!("strata/vars/{file}"), content)
    }

    /// Write the stack template `<name>.yml.tpl` at the project root.
    pub fn write_stack(&self, name: &str, content: &str) -> PathBuf {
        self.write(&format!("{name}.yml.tpl"), content)
    }

    /// Read a file under the project root.
    ///
    /// # Panics
    ///
    /// If the file cannot be read.
    #[must_use]
    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.root.join(relative)).expect("read test file")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

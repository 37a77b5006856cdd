//! Shared harness for integration tests: stages a temp project with
//! fixture artifacts and drives the fabp binary through its subcommands.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const ENV: &str = "prd";
pub const WORKSPACE: &str = "PF_002_Live";
pub const WORKSPACE_PATH: &str = "PF_002_Live/Engineering";

pub struct Project {
    root: TempDir,
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

impl Project {
    pub fn new() -> Self {
        Project {
            root: TempDir::new().expect("tempdir"),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.path().join("config.json")
    }

    /// Copy a fixture from `tests/data/` into the project's workspace
    /// directory under the artifact-relative path.
    pub fn stage(&self, fixture: &str, rel: &str) -> PathBuf {
        let source = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/data")
            .join(fixture);
        let dest = self.root.path().join(WORKSPACE_PATH).join(rel);
        fs::create_dir_all(dest.parent().expect("artifact dir")).expect("create dirs");
        fs::copy(&source, &dest).expect("copy fixture");
        dest
    }

    pub fn run(&self, op: &str, name: &str, kind: &str) -> Output {
        Command::new(env!("CARGO_BIN_EXE_fabp"))
            .arg(op)
            .arg("--project")
            .arg(self.root.path())
            .args(["--workspace-path", WORKSPACE_PATH])
            .args(["--name", name])
            .args(["--kind", kind])
            .arg("--config")
            .arg(self.config_path())
            .args(["--env", ENV])
            .args(["--workspace", WORKSPACE])
            .output()
            .expect("run fabp")
    }

    /// Run an operation that must succeed; returns its stdout.
    pub fn run_ok(&self, op: &str, name: &str, kind: &str) -> String {
        let output = self.run(op, name, kind);
        assert!(
            output.status.success(),
            "fabp {op} {name} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_show(&self, name: &str, kind: &str) -> Output {
        Command::new(env!("CARGO_BIN_EXE_fabp"))
            .arg("show")
            .arg("--config")
            .arg(self.config_path())
            .args(["--env", ENV])
            .args(["--workspace", WORKSPACE])
            .args(["--name", name])
            .args(["--kind", kind])
            .output()
            .expect("run fabp show")
    }

    /// Parse the persisted config store document.
    pub fn store(&self) -> serde_json::Value {
        let content = fs::read_to_string(self.config_path()).expect("read config store");
        serde_json::from_str(&content).expect("parse config store")
    }
}

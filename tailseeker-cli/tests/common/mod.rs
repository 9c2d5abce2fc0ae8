//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Configuration file fixtures

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Read geometry shared by the fixtures.
pub const GEOMETRY: &str = "\
[read_format]
total-cycles = 100
fivep-start = 1
fivep-length = 25
threep-start = 53
threep-length = 48
";

/// Test environment with a temporary directory for configuration files.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();

        Self {
            temp_dir,
            temp_path,
        }
    }

    /// Get a command builder for the tailseeker binary.
    ///
    /// The log mode variable is cleared so the caller's environment cannot
    /// change what ends up on stderr.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("tailseeker").expect("Failed to find tailseeker binary");
        cmd.env_remove("TAILSEEKER_LOG_MODE");
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Write a configuration file into the test environment.
    pub fn write_config(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        std::fs::write(&path, content).expect("Failed to write config file");
        path
    }

    /// Write a valid configuration with the given samples appended.
    pub fn valid_config(&self, samples: &[(&str, &str)]) -> PathBuf {
        let mut content = String::from(GEOMETRY);
        for (name, index) in samples {
            content.push_str(&format!("\n[sample:{name}]\nindex = {index}\n"));
        }
        self.write_config("tailseeker.conf", &content)
    }
}

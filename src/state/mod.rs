//! Terraform State Loading
//!
//! Supplies the raw state document, either from a local snapshot file or by
//! running `terraform state pull` against the configured backend.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Default local state snapshot
pub const DEFAULT_STATE_FILE: &str = "terraform.tfstate";

/// Default command used when no local snapshot exists
pub const DEFAULT_STATE_COMMAND: &[&str] = &["terraform", "state", "pull", "-no-color"];

/// Something that can produce a parsed state document
pub trait StateSource {
    fn load(&self) -> Result<Value>;

    /// Short description for logs and error messages
    fn describe(&self) -> String;
}

/// State read from a file on disk
#[derive(Debug, Clone)]
pub struct LocalStateFile {
    pub path: PathBuf,
}

impl LocalStateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

impl StateSource for LocalStateFile {
    fn load(&self) -> Result<Value> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file {}", self.path.display()))
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// State printed to stdout by an external command
#[derive(Debug, Clone)]
pub struct StateCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl StateCommand {
    /// Build from a full argv; the first element is the program
    pub fn from_argv(argv: &[String]) -> Result<Self> {
        let Some((program, args)) = argv.split_first() else {
            bail!("State command must not be empty");
        };
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(|s| s.as_str()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for StateCommand {
    fn default() -> Self {
        Self {
            program: DEFAULT_STATE_COMMAND[0].to_string(),
            args: DEFAULT_STATE_COMMAND[1..].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl StateSource for StateCommand {
    fn load(&self) -> Result<Value> {
        tracing::info!("Executing: {}", self.command_line());

        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to execute {}", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "`{}` failed ({}): {}",
                self.command_line(),
                output.status,
                stderr.trim()
            );
        }

        serde_json::from_slice(&output.stdout)
            .with_context(|| format!("Failed to parse output of `{}`", self.command_line()))
    }

    fn describe(&self) -> String {
        format!("command `{}`", self.command_line())
    }
}

/// Prefers the local snapshot, falls back to the state command
#[derive(Debug, Clone)]
pub struct StateLoader {
    pub file: LocalStateFile,
    pub command: StateCommand,
}

impl StateLoader {
    pub fn new(state_file: &Path, command: StateCommand) -> Self {
        Self {
            file: LocalStateFile::new(state_file),
            command,
        }
    }

    fn source(&self) -> &dyn StateSource {
        if self.file.exists() {
            &self.file
        } else {
            &self.command
        }
    }
}

impl Default for StateLoader {
    fn default() -> Self {
        Self::new(Path::new(DEFAULT_STATE_FILE), StateCommand::default())
    }
}

impl StateSource for StateLoader {
    fn load(&self) -> Result<Value> {
        let source = self.source();
        tracing::info!("Loading state from {}", source.describe());
        source.load()
    }

    fn describe(&self) -> String {
        self.source().describe()
    }
}

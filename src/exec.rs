//! The execution collaborator: feeds generated Java text to the host
//! toolchain and captures what it prints. The driver depends on the
//! [`Evaluator`] trait, never on the concrete toolchain, so the rest of the
//! crate is testable by asserting on generated text alone.

use anyhow::Context;
use std::path::PathBuf;
use std::process::Command;

pub trait Evaluator {
    /// Compiles and runs one Java compilation unit, returning its stdout.
    fn evaluate(&self, java_source: &str) -> anyhow::Result<String>;
}

/// Runs the text through `javac` and `java` in a scratch directory.
pub struct JavaToolchain {
    scratch_dir: PathBuf,
}

impl JavaToolchain {
    pub fn new() -> Self {
        Self {
            scratch_dir: std::env::temp_dir().join(format!("tilc-{}", std::process::id())),
        }
    }
}

impl Default for JavaToolchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for JavaToolchain {
    fn evaluate(&self, java_source: &str) -> anyhow::Result<String> {
        let class_name = crate::javagen::CLASS_NAME;
        std::fs::create_dir_all(&self.scratch_dir)
            .context("creating the scratch directory for the generated code")?;
        let source_file = self.scratch_dir.join(format!("{}.java", class_name));
        std::fs::write(&source_file, java_source).context("writing the generated code")?;

        tracing::debug!(target: "exec", "compiling {}", source_file.display());
        let compile = Command::new("javac")
            .arg(&source_file)
            .current_dir(&self.scratch_dir)
            .output()
            .context("invoking javac")?;
        if !compile.status.success() {
            anyhow::bail!(
                "javac rejected the generated code:\n{}",
                String::from_utf8_lossy(&compile.stderr)
            );
        }

        let run = Command::new("java")
            .arg(class_name)
            .current_dir(&self.scratch_dir)
            .output()
            .context("invoking java")?;
        if !run.status.success() {
            anyhow::bail!(
                "the generated program failed:\n{}",
                String::from_utf8_lossy(&run.stderr)
            );
        }
        Ok(String::from_utf8_lossy(&run.stdout).into_owned())
    }
}

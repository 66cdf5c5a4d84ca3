//! Optional post-processing of emitted code through `prettier`

use std::{
    ffi::OsString,
    io::{self, Write},
    process::{Command, Stdio},
};

use anyhow::{Context, Result, bail};

/// Options passed to every `prettier` invocation, after `--stdin-filepath`
const PRETTIER_OPTIONS: &[&str] = &[
    "--no-semi",
    "--single-quote",
    "--jsx-single-quote",
    "--trailing-comma",
    "none",
];

/// The external `prettier` executable
#[derive(Debug, Clone)]
pub struct Prettier {
    program: OsString,
}

impl Default for Prettier {
    fn default() -> Self {
        Self {
            program: "prettier".into(),
        }
    }
}

impl Prettier {
    /// Use a specific executable instead of `prettier` from `PATH`
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Format `code`; `file_name` tells prettier which parser to use
    pub fn format(&self, code: &str, file_name: &str) -> Result<String> {
        let mut child = Command::new(&self.program)
            .arg("--stdin-filepath")
            .arg(file_name)
            .args(PRETTIER_OPTIONS)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to run {}", self.program.to_string_lossy()))?;

        {
            let mut stdin = child.stdin.take().context("prettier stdin is not piped")?;
            // A formatter that exits early closes the pipe; its exit status says why
            if let Err(err) = stdin.write_all(code.as_bytes())
                && err.kind() != io::ErrorKind::BrokenPipe
            {
                return Err(err).with_context(|| format!("Failed to send {file_name} to prettier"));
            }
        }

        let output = child
            .wait_with_output()
            .with_context(|| format!("Failed to read prettier output for {file_name}"))?;
        if !output.status.success() {
            bail!(
                "prettier failed on {file_name} ({}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        String::from_utf8(output.stdout).context("prettier produced invalid UTF-8")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_executable_is_an_error() {
        let prettier = Prettier::with_program("demin-test-no-such-prettier");
        let err = prettier.format("let a = 1", "a.js").unwrap_err();
        assert!(
            err.to_string()
                .starts_with("Failed to run demin-test-no-such-prettier"),
            "{err}"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_an_error() {
        let prettier = Prettier::with_program("false");
        let err = prettier.format("let a = 1", "a.js").unwrap_err();
        assert!(err.to_string().starts_with("prettier failed on a.js"), "{err}");
    }
}

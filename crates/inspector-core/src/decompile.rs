//! Decompilation and disassembly of bytecode through external tools.
//!
//! The tools are opaque collaborators: each is run with one argument, the
//! path of a temporary file holding the bytecode. Their stdout and stderr
//! are returned as text behind a provenance header.

use std::io::Write;
use std::path::Path;
use std::process::Stdio;

use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::debug;
use tracing::warn;

use crate::InspectError;
use crate::Result;
use crate::config::ToolConfig;

/// Header prepended to decompiler output.
pub const DECOMPILE_HEADER: &str = "\"\"\"\n\
This file was decompiled from bytecode by Inspector using pycdc.\n\
The code below may be incomplete or syntactically incorrect.\n\
\"\"\"\n\n";

/// Header prepended to disassembler output.
pub const DISASSEMBLE_HEADER: &str =
    "This file was disassembled from bytecode by Inspector using pycdas.\n\n";

/// Runs the configured decompiler and disassembler.
#[derive(Debug, Clone, Default)]
pub struct Decompiler {
    config: ToolConfig,
}

impl Decompiler {
    /// Creates a decompiler with the given tool settings.
    #[must_use]
    pub const fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    /// Decompiles bytecode back to source.
    ///
    /// The result is the header, then the tool's stdout, then its stderr.
    /// The two streams are appended, not interleaved.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::ToolFailed`] if the tool cannot be started or
    /// exceeds the configured timeout, and `Io` if the temporary input file
    /// cannot be written.
    pub async fn decompile(&self, bytecode: &[u8]) -> Result<String> {
        let output = self.run(&self.config.decompiler, bytecode).await?;
        Ok(format!("{DECOMPILE_HEADER}{output}"))
    }

    /// Disassembles bytecode.
    ///
    /// Output is assembled as for [`Decompiler::decompile`].
    ///
    /// # Errors
    ///
    /// Same as [`Decompiler::decompile`].
    pub async fn disassemble(&self, bytecode: &[u8]) -> Result<String> {
        let output = self.run(&self.config.disassembler, bytecode).await?;
        Ok(format!("{DISASSEMBLE_HEADER}{output}"))
    }

    async fn run(&self, tool: &Path, bytecode: &[u8]) -> Result<String> {
        // removed on drop, whichever way this returns
        let mut input = NamedTempFile::new()?;
        input.write_all(bytecode)?;
        input.flush()?;

        let tool_name = tool.display().to_string();
        debug!(tool = %tool_name, bytes = bytecode.len(), "running external tool");

        let mut cmd = Command::new(tool);
        cmd.arg(input.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.config.timeout, cmd.output())
            .await
            .map_err(|_| {
                warn!(tool = %tool_name, timeout = ?self.config.timeout, "external tool timed out");
                InspectError::ToolFailed {
                    tool: tool_name.clone(),
                    reason: format!("timed out after {}s", self.config.timeout.as_secs_f64()),
                }
            })?
            .map_err(|e| InspectError::ToolFailed {
                tool: tool_name.clone(),
                reason: format!("failed to start: {e}"),
            })?;

        if !output.status.success() {
            debug!(tool = %tool_name, status = %output.status, "external tool exited unsuccessfully");
        }

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);
        Ok(String::from_utf8_lossy(&combined).into_owned())
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;

    // `sh <file>` runs the temporary input as a script, which stands in for
    // the real tools.
    fn shell_tools(timeout: Duration) -> Decompiler {
        Decompiler::new(ToolConfig {
            decompiler: PathBuf::from("sh"),
            disassembler: PathBuf::from("sh"),
            timeout,
        })
    }

    #[tokio::test]
    async fn test_decompile_header_and_output() {
        let tools = shell_tools(Duration::from_secs(10));
        let text = tools.decompile(b"echo 'x = 1'").await.unwrap();
        assert!(text.starts_with("\"\"\"\nThis file was decompiled"));
        assert!(text.ends_with("\"\"\"\n\nx = 1\n"));
    }

    #[tokio::test]
    async fn test_disassemble_header() {
        let tools = shell_tools(Duration::from_secs(10));
        let text = tools.disassemble(b"echo LOAD_CONST").await.unwrap();
        assert_eq!(
            text,
            "This file was disassembled from bytecode by Inspector using pycdas.\n\nLOAD_CONST\n"
        );
    }

    #[tokio::test]
    async fn test_captures_stderr() {
        let tools = shell_tools(Duration::from_secs(10));
        let text = tools.disassemble(b"echo out; echo err 1>&2").await.unwrap();
        assert!(text.ends_with("out\nerr\n"));
    }

    #[tokio::test]
    async fn test_stderr_follows_stdout() {
        let tools = shell_tools(Duration::from_secs(10));
        let text = tools.disassemble(b"echo err 1>&2; echo out").await.unwrap();
        assert!(text.ends_with("out\nerr\n"));
    }

    #[tokio::test]
    async fn test_failing_tool_output_still_returned() {
        let tools = shell_tools(Duration::from_secs(10));
        let text = tools.decompile(b"echo partial; exit 3").await.unwrap();
        assert!(text.ends_with("partial\n"));
    }

    #[tokio::test]
    async fn test_timeout_is_tool_failure() {
        let tools = shell_tools(Duration::from_millis(200));
        let err = tools.decompile(b"sleep 5").await.unwrap_err();
        assert!(matches!(err, InspectError::ToolFailed { tool, .. } if tool == "sh"));
    }

    #[tokio::test]
    async fn test_missing_tool() {
        let tools = Decompiler::new(ToolConfig {
            decompiler: PathBuf::from("/nonexistent/pycdc"),
            ..ToolConfig::default()
        });
        let err = tools.decompile(b"\0").await.unwrap_err();
        assert!(matches!(err, InspectError::ToolFailed { reason, .. } if reason.contains("failed to start")));
    }
}

//! Decompile and disassemble command implementations.

use super::Session;
use super::release_id;
use crate::cli::FileArgs;
use crate::error::add_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use inspector_core::formats::ArchiveSource;

/// Which external tool to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Decompile,
    Disassemble,
}

impl Mode {
    const fn operation(self) -> &'static str {
        match self {
            Self::Decompile => "decompile",
            Self::Disassemble => "disassemble",
        }
    }
}

pub async fn execute(
    args: &FileArgs,
    mode: Mode,
    session: &Session,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let id = release_id(&args.release);
    let filename = id.filename();
    let distribution = session.open(&id).await?;
    let bytecode = add_context(distribution.read(&args.path), &filename)?;

    let decompiler = session.decompiler();
    let output = match mode {
        Mode::Decompile => decompiler.decompile(&bytecode).await,
        Mode::Disassemble => decompiler.disassemble(&bytecode).await,
    };
    let output = add_context(output, &args.path)?;

    formatter.format_tool_output(mode.operation(), &args.path, &output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_operation() {
        assert_eq!(Mode::Decompile.operation(), "decompile");
        assert_eq!(Mode::Disassemble.operation(), "disassemble");
    }
}

//! Shell completion generation command.

use crate::cli::Cli;
use clap::CommandFactory;
use clap_complete::Shell;
use std::io;

/// Generates shell completions for the specified shell.
pub fn execute(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "inspector", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_mentions_subcommands() {
        let mut cmd = Cli::command();
        let mut output = Vec::new();
        clap_complete::generate(Shell::Bash, &mut cmd, "inspector", &mut output);
        let script = String::from_utf8_lossy(&output);
        assert!(script.contains("inspect-file"));
        assert!(script.contains("disassemble"));
    }

    #[test]
    fn test_completion_generation() {
        for shell in [
            Shell::Bash,
            Shell::Zsh,
            Shell::Fish,
            Shell::PowerShell,
            Shell::Elvish,
        ] {
            let mut cmd = Cli::command();
            let mut output = Vec::new();
            clap_complete::generate(shell, &mut cmd, "inspector", &mut output);
            assert!(!output.is_empty(), "empty completion for {shell:?}");
        }
    }
}

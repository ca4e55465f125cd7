use anyhow::{Context, Result};
use log::debug;
use std::io::{self, BufRead, Write};

/// Asks the user a yes/no question before a destructive change.
pub trait Prompt {
    fn confirm(&mut self, title: &str, text: &str) -> Result<bool>;
}

/// Answers yes without asking, for `--yes`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Prompt for AssumeYes {
    fn confirm(&mut self, title: &str, _text: &str) -> Result<bool> {
        debug!("Auto-confirming '{}'", title);
        Ok(true)
    }
}

/// `[y/N]` question on a line-oriented terminal.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        TerminalPrompt::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        TerminalPrompt { input, output }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "e" | "evet"
    )
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn confirm(&mut self, title: &str, text: &str) -> Result<bool> {
        write!(self.output, "{} {} [y/N] ", title, text)?;
        self.output.flush()?;
        let mut answer = String::new();
        let read = self
            .input
            .read_line(&mut answer)
            .with_context(|| "Error reading confirmation answer")?;
        // EOF counts as no
        Ok(read > 0 && is_yes(&answer))
    }
}

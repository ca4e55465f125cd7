use anyhow::{Context, Result};
use log::warn;
use std::io::Write;
use std::process::{Command, Stdio};

use crate::prompt::Prompt;

const YES: &str = "Evet, Sil";
const NO: &str = "İptal";

/// Confirmation through a dmenu picker, for use from a window manager binding.
#[derive(Debug, Default, Clone)]
pub struct DmenuPrompt;

impl Prompt for DmenuPrompt {
    fn confirm(&mut self, title: &str, text: &str) -> Result<bool> {
        let question = format!("{} {}", title, text);
        let choice = select(&format!("{}\n{}\n", NO, YES), &question)?;
        Ok(choice.as_deref() == Some(YES))
    }
}

pub fn select(input: &str, prompt: &str) -> Result<Option<String>> {
    dmenu(input, vec!["-b", "-i", "-p", prompt])
}

fn dmenu(input: &str, args: Vec<&str>) -> Result<Option<String>> {
    let mut dmenu = Command::new("dmenu")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| "Unable to start dmenu")?;
    let mut stdin = dmenu
        .stdin
        .take()
        .with_context(|| "dmenu stdin was not captured")?;
    stdin.write_all(input.as_bytes())?;
    drop(stdin);

    let output = dmenu.wait_with_output()?;
    if !output.status.success() {
        warn!("Dmenu process cancelled with exit code {:?}", output.status.code());
        return Ok(None);
    }
    let choice = String::from_utf8_lossy(&output.stdout);
    let choice = choice.trim().to_owned();
    Ok(Some(choice))
}

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::io::Write;

use progtrack::{Paid, Period, Program, Prompt};

/// Prompt that answers from a fixed script and records the questions.
pub struct Scripted {
    pub answers: VecDeque<bool>,
    pub asked: usize,
}

impl Scripted {
    pub fn new(answers: &[bool]) -> Self {
        Scripted {
            answers: answers.iter().copied().collect(),
            asked: 0,
        }
    }
}

impl Prompt for Scripted {
    fn confirm(&mut self, _title: &str, _text: &str) -> anyhow::Result<bool> {
        self.asked += 1;
        Ok(self.answers.pop_front().unwrap_or(false))
    }
}

pub fn program(name: &str) -> Program {
    Program {
        name: name.to_owned(),
        link: format!("https://{}.example", name.to_lowercase()),
        email: format!("{}@example.com", name.to_lowercase()),
        secret: "s3cret".to_owned(),
        account_kind: "Personal".to_owned(),
        is_paid: Paid::Flag(true),
        expiry_date: "01.02.2027".to_owned(),
        card_number: Some("4111 1111".to_owned()),
        period: Some(Period::Yearly),
    }
}

/// Run the CLI binary against an isolated data directory.
pub fn run_cli(data_dir: &Path, args: &[&str]) -> Output {
    run_cli_with_input(data_dir, args, "")
}

pub fn run_cli_with_input(data_dir: &Path, args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_progtrack"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .current_dir(data_dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write CLI input");
    child.wait_with_output().expect("Failed to wait for CLI")
}

/// Run the CLI and expect success.
pub fn run_cli_success(data_dir: &Path, args: &[&str]) -> String {
    let output = run_cli(data_dir, args);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

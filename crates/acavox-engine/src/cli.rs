//! Shared REPL and script drivers around the console executor.

use crate::backend::CommandBackend;
use crate::console::Console;
use std::error::Error;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Clone, Copy)]
pub struct OutputHandlers {
    pub out: fn(&str),
    pub err: fn(&str),
}

pub struct FileOptions {
    pub stop_on_error: bool,
}

pub struct ReplOptions<'a> {
    pub banner_lines: &'a [&'a str],
    pub prompt: &'a str,
    pub exit_commands: &'a [&'a str],
}

async fn execute_line<B: CommandBackend + ?Sized>(
    console: &mut Console,
    backend: &mut B,
    line: &str,
) -> Result<String, String> {
    match console.execute_line(backend, line).await {
        Ok(result) => Ok(result.output),
        Err(e) => Err(format!("{}", e)),
    }
}

pub async fn run_file<B: CommandBackend + ?Sized>(
    console: &mut Console,
    backend: &mut B,
    output: OutputHandlers,
    path: &str,
    options: FileOptions,
) -> Result<(), Box<dyn Error>> {
    let content = std::fs::read_to_string(path)?;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match execute_line(console, backend, trimmed).await {
            Ok(result) => {
                if !result.is_empty() {
                    (output.out)(&result)
                }
            }
            Err(err) => {
                (output.err)(&format!("Error executing line '{}': {}", trimmed, err));
                if options.stop_on_error {
                    return Err(io::Error::other(err).into());
                }
            }
        }
    }
    Ok(())
}

/// Possible outcomes from reading a single REPL line.
enum ReadLineResult {
    /// A non-empty input line to process.
    Input(String),
    /// Empty line or no input yet -- skip and re-prompt.
    Skip,
    /// EOF or exit command -- terminate the loop.
    Exit,
    /// I/O error while reading.
    Error(io::Error),
}

fn classify_line(
    result: Result<Option<String>, io::Error>,
    exit_commands: &[&str],
) -> ReadLineResult {
    match result {
        Ok(Some(input)) => {
            let trimmed = input.trim().to_string();
            if trimmed.is_empty() {
                ReadLineResult::Skip
            } else if exit_commands.contains(&trimmed.as_str()) {
                ReadLineResult::Exit
            } else {
                ReadLineResult::Input(trimmed)
            }
        }
        Ok(None) => ReadLineResult::Exit,
        Err(e) => ReadLineResult::Error(e),
    }
}

pub async fn run_repl<B: CommandBackend + ?Sized>(
    console: &mut Console,
    backend: &mut B,
    output: OutputHandlers,
    options: ReplOptions<'_>,
) -> Result<(), Box<dyn Error>> {
    for line in options.banner_lines {
        (output.out)(line);
    }

    let stdin = tokio::io::stdin();
    let mut reader = BufReader::new(stdin).lines();
    let mut stdout = io::stdout();

    loop {
        print!("{}", options.prompt);
        stdout.flush()?;

        match classify_line(reader.next_line().await, options.exit_commands) {
            ReadLineResult::Input(line) => match execute_line(console, backend, &line).await {
                Ok(result) => {
                    if !result.is_empty() {
                        (output.out)(&result)
                    }
                }
                Err(err) => (output.err)(&format!("Error: {}", err)),
            },
            ReadLineResult::Skip => continue,
            ReadLineResult::Exit => break,
            ReadLineResult::Error(e) => return Err(e.into()),
        }
    }
    Ok(())
}

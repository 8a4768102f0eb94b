//! ui::prompts
//!
//! Interactive prompts and confirmations.
//!
//! # Design
//!
//! Prompts are only shown in interactive mode. In non-interactive mode,
//! operations requiring user input fail with a clear error instead of
//! hanging on a closed stdin.

use std::io::{BufRead, Write};

use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn read_line() -> Result<String, PromptError> {
    let mut line = String::new();
    let read = std::io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        // EOF on stdin mid-prompt
        return Err(PromptError::Cancelled);
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn show(message: &str) -> Result<(), PromptError> {
    print!("{message}");
    std::io::stdout().flush()?;
    Ok(())
}

/// Prompt for confirmation (yes/no).
///
/// An empty answer takes the default; any prefix of "yes"/"no" is accepted,
/// anything else re-asks.
pub fn confirm(message: &str, default: bool, interactive: bool) -> Result<bool, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }

    let hint = if default { "(Y/n)" } else { "(y/N)" };
    loop {
        show(&format!("{message} {hint}? "))?;
        let answer = read_line()?.to_lowercase();

        if answer.is_empty() {
            return Ok(default);
        }
        if "yes".starts_with(&answer) {
            return Ok(true);
        }
        if "no".starts_with(&answer) {
            return Ok(false);
        }
    }
}

/// Prompt for a line of text input.
pub fn input(message: &str, interactive: bool) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    show(message)?;
    read_line()
}

/// Prompt to select from a numbered list of options.
///
/// Returns the index of the selected option. An empty answer takes the
/// default when one is given.
pub fn select<T: AsRef<str>>(
    message: &str,
    options: &[T],
    default: Option<usize>,
    interactive: bool,
) -> Result<usize, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }

    println!("{message}");
    for (i, option) in options.iter().enumerate() {
        println!(" [{}] {}", i + 1, option.as_ref());
    }

    loop {
        show("Select an entry: ")?;
        let answer = read_line()?;

        if answer.is_empty() {
            if let Some(default) = default {
                return Ok(default);
            }
            continue;
        }

        match answer.parse::<usize>() {
            Ok(n) if n >= 1 && n <= options.len() => return Ok(n - 1),
            _ => continue,
        }
    }
}

/// Read multiline text until EOF (Ctrl-D, or Ctrl-Z on Windows).
pub fn multiline(message: &str, interactive: bool) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }

    println!("{message}");
    let mut lines: Vec<String> = Vec::new();
    loop {
        match read_line() {
            Ok(line) => lines.push(line),
            Err(PromptError::Cancelled) => break,
            Err(other) => return Err(other),
        }
    }
    Ok(lines.join("\n"))
}

/// Prompt for masked input (e.g., tokens).
///
/// The input is not echoed to the terminal.
pub fn password(message: &str, interactive: bool) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    Ok(rpassword::prompt_password(message)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_interactive_mode_fails_every_prompt() {
        assert!(matches!(
            confirm("ok", true, false),
            Err(PromptError::NotInteractive)
        ));
        assert!(matches!(
            input("name: ", false),
            Err(PromptError::NotInteractive)
        ));
        assert!(matches!(
            select("pick", &["a", "b"], None, false),
            Err(PromptError::NotInteractive)
        ));
        assert!(matches!(
            multiline("notes", false),
            Err(PromptError::NotInteractive)
        ));
        assert!(matches!(
            password("token: ", false),
            Err(PromptError::NotInteractive)
        ));
    }
}

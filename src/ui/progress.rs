//! ui::progress
//!
//! Terminal spinner for long-running external operations.
//!
//! # Design
//!
//! The spinner runs on its own thread and redraws a single line while a
//! fetch, hook, or push is in flight. It shares nothing with the operation
//! it decorates beyond the stop flag; it is purely cosmetic and is disabled
//! entirely in quiet mode or when stderr is not a terminal-friendly target.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use super::output::Verbosity;

const FRAMES: [&str; 4] = ["-", "\\", "|", "/"];
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Outcome shown when a spinner finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Failed,
}

impl Outcome {
    fn label(self) -> &'static str {
        match self {
            Outcome::Done => "DONE",
            Outcome::Failed => "FAILED",
        }
    }
}

/// A running spinner. Call [`Spinner::finish`] to stop it and print the
/// outcome; dropping it without finishing stops the thread silently.
#[derive(Debug)]
pub struct Spinner {
    label: String,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    verbosity: Verbosity,
}

impl Spinner {
    /// Start a spinner labelled with the operation in flight.
    ///
    /// In quiet mode no thread is spawned and nothing is printed.
    pub fn start(label: impl Into<String>, verbosity: Verbosity) -> Self {
        let label = label.into();
        let running = Arc::new(AtomicBool::new(true));

        let handle = if verbosity == Verbosity::Quiet {
            None
        } else {
            let running = Arc::clone(&running);
            let label = label.clone();
            Some(std::thread::spawn(move || {
                let mut frame = 0usize;
                while running.load(Ordering::Relaxed) {
                    eprint!("\r{label} {}", FRAMES[frame % FRAMES.len()]);
                    let _ = std::io::stderr().flush();
                    frame += 1;
                    std::thread::sleep(FRAME_INTERVAL);
                }
            }))
        };

        Self {
            label,
            running,
            handle,
            verbosity,
        }
    }

    /// Stop the spinner and print the outcome on the same line.
    pub fn finish(mut self, outcome: Outcome) {
        self.stop();
        if self.verbosity != Verbosity::Quiet {
            eprintln!("\r{} {}", self.label, outcome.label());
        }
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Run `operation` under a spinner, finishing with DONE or FAILED based on
/// the result.
pub fn with_spinner<T, E>(
    label: impl Into<String>,
    verbosity: Verbosity,
    operation: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    let spinner = Spinner::start(label, verbosity);
    let result = operation();
    spinner.finish(match result {
        Ok(_) => Outcome::Done,
        Err(_) => Outcome::Failed,
    });
    result
}

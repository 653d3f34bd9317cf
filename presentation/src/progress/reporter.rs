//! Progress reporting for a streaming exchange

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use relay_application::ExchangeObserver;
use relay_domain::ExchangeState;
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

/// Prints assistant fragments as they arrive, with a spinner while waiting
/// for the first one
pub struct ExchangeReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ExchangeReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn start_spinner(&self) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_message("Thinking...");
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut spinner) = self.spinner.lock() {
            *spinner = Some(pb);
        }
    }

    fn clear_spinner(&self) {
        if let Some(pb) = self.spinner.lock().ok().and_then(|mut s| s.take()) {
            pb.finish_and_clear();
        }
    }
}

impl Default for ExchangeReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExchangeObserver for ExchangeReporter {
    fn on_state(&self, state: &ExchangeState) {
        match state {
            ExchangeState::Sending => self.start_spinner(),
            ExchangeState::Streaming => {
                self.clear_spinner();
                print!("{} ", "Assistant:".green().bold());
                let _ = std::io::stdout().flush();
            }
            ExchangeState::Completed => println!("\n"),
            ExchangeState::Cancelled => {
                self.clear_spinner();
                println!("\n{}\n", "[stopped]".yellow());
            }
            ExchangeState::Failed(_) => self.clear_spinner(),
            ExchangeState::Idle => {}
        }
    }

    fn on_fragment(&self, fragment: &str) {
        print!("{}", fragment);
        let _ = std::io::stdout().flush();
    }
}

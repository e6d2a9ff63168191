//! Colorized run output on stdout. Diagnostics go through `tracing` instead.

use crate::report::RunStatistics;
use console::{StyledObject, Term, style};
use std::fmt::Display;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Always = 0,
    Verbose = 1,
}

#[derive(Debug, Clone)]
pub struct Console {
    term: Term,
    pub silent: bool,
    pub verbose: bool,
    pub color: bool,
}

impl Console {
    pub fn new(silent: bool, verbose: bool, color: bool) -> Self {
        Self {
            term: Term::stdout(),
            silent,
            verbose,
            color,
        }
    }

    /// Prints nothing at all.
    pub fn silent() -> Self {
        Self::new(true, false, false)
    }

    fn enabled(&self, level: Level) -> bool {
        let threshold = if self.verbose {
            Level::Verbose
        } else {
            Level::Always
        };
        !self.silent && level <= threshold
    }

    fn line(&self, level: Level, msg: &str) {
        if self.enabled(level) {
            let _ = self.term.write_line(msg);
        }
    }

    fn inline(&self, level: Level, msg: &str) {
        if self.enabled(level) {
            let _ = self.term.write_str(msg);
            let _ = self.term.flush();
        }
    }

    fn paint<D: Display>(&self, d: D) -> StyledObject<D> {
        let s = style(d);
        if self.color { s } else { s.force_styling(false) }
    }

    pub fn banner(&self, requests: u32, timeout: Duration, country: &str, speed_profile: u32) {
        self.line(
            Level::Verbose,
            &format!("Performing {} tests.", self.paint(requests).magenta()),
        );
        self.line(
            Level::Verbose,
            &self
                .paint(format!("Timeout set to {} seconds.", timeout.as_secs()))
                .yellow()
                .to_string(),
        );
        self.line(
            Level::Verbose,
            &format!(
                "Selected {} as country, {} km/h profile.",
                self.paint(country).cyan(),
                self.paint(speed_profile).yellow()
            ),
        );
    }

    pub fn matrix_generated(&self, dim: usize, elapsed: Duration) {
        self.line(
            Level::Verbose,
            &self
                .paint(format!(
                    "{dim}x{dim} matrix created in {:.6}s.",
                    elapsed.as_secs_f64()
                ))
                .cyan()
                .to_string(),
        );
    }

    pub fn show_matrix(&self, wire: &str) {
        self.line(Level::Always, &format!(">>> {wire}"));
    }

    pub fn progress_start(&self) {
        self.inline(Level::Verbose, "Polling... ");
    }

    pub fn progress(&self, progress: &str) {
        self.inline(Level::Verbose, &format!("{progress}... "));
    }

    pub fn progress_malformed(&self, err: &str) {
        self.line(Level::Always, err);
    }

    pub fn progress_done(&self) {
        self.line(Level::Verbose, " done.");
    }

    pub fn server_down(&self) {
        self.line(
            Level::Always,
            &format!("ACHTUNG! Server down... {}", self.paint("HALT!").red()),
        );
    }

    pub fn success(&self, dim: usize, country: &str, speed_profile: u32, elapsed: Duration) {
        self.line(
            Level::Always,
            &format!(
                "{} {} {} {} {}",
                self.paint("HTTP 200").green(),
                self.paint(format!("{dim}x{dim}")).magenta(),
                self.paint(country.to_uppercase()).red().bright().bold(),
                self.paint(format!("{speed_profile} km/h")).yellow(),
                self.paint(format!("{:.3} sec", elapsed.as_secs_f64())).cyan(),
            ),
        );
    }

    pub fn result_body(&self, body: &str) {
        self.line(Level::Always, &format!("<<< {body}"));
    }

    pub fn failure(&self, what: &str, snippet: &str, elapsed: Duration, label: &str) {
        self.line(
            Level::Always,
            &format!(
                "{} {}",
                self.paint(format!("{what} {snippet} [...]")).magenta(),
                self.paint(format!("{:.3}s. {label}.", elapsed.as_secs_f64())).yellow(),
            ),
        );
    }

    pub fn summary(&self, elapsed: Duration, requests: u32, stats: &RunStatistics) {
        self.line(
            Level::Verbose,
            &self
                .paint(format!("Finished in {:.3}s", elapsed.as_secs_f64()))
                .cyan()
                .to_string(),
        );
        self.line(
            Level::Verbose,
            &format!(
                "{}, {}, {}",
                self.paint(format!("{}/{requests} succeeded", stats.succeeded)).green(),
                self.paint(format!("{}/{requests} failed.", stats.failed)).red(),
                self.paint(format!("{} timeouts", stats.timed_out)).yellow(),
            ),
        );
    }
}

use serde::{Deserialize, Serialize};

/// Outcome counters for one profile's iterations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub succeeded: u32,
    pub failed: u32,
    pub timed_out: u32,
}

impl RunStatistics {
    pub fn record(&mut self, outcome: &IterationOutcome) {
        match outcome {
            IterationOutcome::Succeeded { .. } => self.succeeded += 1,
            IterationOutcome::Failed { .. } => self.failed += 1,
            IterationOutcome::TimedOut { .. } => self.timed_out += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.succeeded + self.failed + self.timed_out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IterationOutcome {
    Succeeded { elapsed_secs: f64 },
    Failed { reason: String },
    TimedOut { reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileReport {
    pub speed_profile: u32,
    pub requests: u32,
    pub stats: RunStatistics,
    pub elapsed_secs: f64,
    /// Matrix fingerprints in send order, repeats collapsed.
    pub matrix_fingerprints: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub country: String,
    pub matrix_dim: usize,
    pub started: String,
    pub finished: String,
    pub matrices_generated: u32,
    pub profiles: Vec<ProfileReport>,
}

impl RunReport {
    pub fn totals(&self) -> RunStatistics {
        self.profiles
            .iter()
            .fold(RunStatistics::default(), |mut acc, p| {
                acc.succeeded += p.stats.succeeded;
                acc.failed += p.stats.failed;
                acc.timed_out += p.stats.timed_out;
                acc
            })
    }
}

use crate::{
    backend::{Backend, HttpReply},
    console::Console,
    error::DriverError,
};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    Reported(String),
    Malformed(String),
}

/// What a single status response means for the job.
#[derive(Debug, Clone, PartialEq)]
pub enum PollStep {
    Pending(Progress),
    Done { result_location: String },
    ServerDown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Done { result_location: String },
    DeadlineExceeded { attempts: u32 },
}

#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub interval: Duration,
    pub request_timeout: Duration,
    /// `None` polls until the server reports a terminal state.
    pub deadline: Option<Duration>,
}

#[derive(Deserialize)]
struct ProgressBody {
    progress: serde_json::Value,
}

pub fn classify(reply: &HttpReply) -> Result<PollStep, DriverError> {
    match reply.status {
        303 => {
            let result_location =
                reply
                    .location
                    .clone()
                    .ok_or(DriverError::MissingLocation {
                        status: reply.status,
                    })?;
            Ok(PollStep::Done { result_location })
        }
        502 => Ok(PollStep::ServerDown),
        _ => Ok(PollStep::Pending(parse_progress(&reply.body))),
    }
}

fn parse_progress(body: &str) -> Progress {
    match serde_json::from_str::<ProgressBody>(body) {
        Ok(ProgressBody {
            progress: serde_json::Value::String(s),
        }) => Progress::Reported(s),
        Ok(ProgressBody { progress }) => Progress::Reported(progress.to_string()),
        Err(e) => Progress::Malformed(e.to_string()),
    }
}

/// Polls `location` until the job redirects to its result, the server goes
/// down, or the optional deadline passes.
pub fn poll_until_terminal<B: Backend + ?Sized>(
    backend: &B,
    location: &str,
    settings: &PollSettings,
    console: &Console,
) -> Result<PollOutcome, DriverError> {
    let started = Instant::now();
    let mut attempts = 0u32;

    console.progress_start();
    loop {
        attempts += 1;
        let reply = backend
            .poll(location, settings.request_timeout)
            .map_err(|source| DriverError::Transport {
                location: location.to_string(),
                source,
            })?;

        match classify(&reply)? {
            PollStep::Done { result_location } => {
                debug!("job {location} done after {attempts} polls -> {result_location}");
                console.progress_done();
                return Ok(PollOutcome::Done { result_location });
            }
            PollStep::ServerDown => {
                console.server_down();
                return Err(DriverError::BackendDown {
                    location: location.to_string(),
                });
            }
            PollStep::Pending(Progress::Reported(p)) => console.progress(&p),
            PollStep::Pending(Progress::Malformed(e)) => {
                warn!("unparseable progress body from {location} (HTTP {}): {e}", reply.status);
                console.progress_malformed(&e);
            }
        }

        let pause = match settings.deadline {
            Some(deadline) => {
                let elapsed = started.elapsed();
                if elapsed >= deadline {
                    console.progress_done();
                    warn!("polling {location} gave up after {attempts} attempts ({deadline:?})");
                    return Ok(PollOutcome::DeadlineExceeded { attempts });
                }
                // last attempt lands on the deadline
                settings.interval.min(deadline - elapsed)
            }
            None => settings.interval,
        };
        std::thread::sleep(pause);
    }
}

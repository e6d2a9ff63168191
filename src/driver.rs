use crate::{
    backend::{Backend, JobRequest, TransportError},
    config::Config,
    console::Console,
    error::DriverError,
    matrix::{CoordinateMatrix, MatrixSource},
    poll::{self, PollOutcome, PollSettings},
    profile::ProfileSelection,
    region::BoundingBox,
    report::{IterationOutcome, ProfileReport, RunReport, RunStatistics},
    util::{now_rfc3339, sha256_hex, snippet},
};
use rand::{SeedableRng, rngs::StdRng};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const SNIPPET_CHARS: usize = 30;

/// Everything one invocation of the driver needs to know.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub country: String,
    pub bbox: BoundingBox,
    pub dim: usize,
    pub requests: u32,
    pub request_timeout: Duration,
    pub grace_period: Duration,
    pub poll_interval: Duration,
    pub poll_deadline: Option<Duration>,
    pub constant: bool,
    pub show_matrix: bool,
    pub print_result: bool,
    pub seed: Option<u64>,
}

impl RunContext {
    pub fn from_config(cfg: &Config, country: &str, bbox: BoundingBox) -> Self {
        Self {
            country: country.to_string(),
            bbox,
            dim: cfg.run.dim,
            requests: cfg.run.requests,
            request_timeout: Duration::from_secs(cfg.run.timeout_seconds),
            grace_period: Duration::from_millis(cfg.run.grace_period_ms),
            poll_interval: Duration::from_millis(cfg.run.poll_interval_ms),
            poll_deadline: match cfg.run.poll_deadline_seconds {
                0 => None,
                s => Some(Duration::from_secs(s)),
            },
            constant: cfg.run.constant,
            show_matrix: cfg.output.show_matrix,
            print_result: cfg.output.print_result,
            seed: cfg.run.seed,
        }
    }

    fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: self.poll_interval,
            request_timeout: self.request_timeout,
            deadline: self.poll_deadline,
        }
    }
}

pub struct Driver<B: Backend> {
    ctx: RunContext,
    backend: B,
    console: Console,
    rng: StdRng,
    matrices_generated: u32,
}

impl<B: Backend> Driver<B> {
    pub fn new(ctx: RunContext, backend: B, console: Console) -> Self {
        let rng = match ctx.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            ctx,
            backend,
            console,
            rng,
            matrices_generated: 0,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn matrices_generated(&self) -> u32 {
        self.matrices_generated
    }

    /// Runs every selected profile. With constant mode and a sweep, one
    /// matrix is generated up front and shared by all profiles.
    pub fn run(&mut self, selection: ProfileSelection) -> Result<RunReport, DriverError> {
        let started = now_rfc3339();
        let shared = match selection {
            ProfileSelection::All if self.ctx.constant => {
                let mut source = MatrixSource::for_run(true, None);
                Some(self.next_matrix(&mut source))
            }
            _ => None,
        };

        let mut profiles = Vec::new();
        for speed_profile in selection.profiles() {
            profiles.push(self.run_profile(speed_profile, shared.clone())?);
        }

        Ok(RunReport {
            country: self.ctx.country.clone(),
            matrix_dim: self.ctx.dim,
            started,
            finished: now_rfc3339(),
            matrices_generated: self.matrices_generated,
            profiles,
        })
    }

    /// Runs the configured number of iterations for one speed profile.
    pub fn run_profile(
        &mut self,
        speed_profile: u32,
        provided: Option<CoordinateMatrix>,
    ) -> Result<ProfileReport, DriverError> {
        self.console.banner(
            self.ctx.requests,
            self.ctx.request_timeout,
            &self.ctx.country,
            speed_profile,
        );

        let started = Instant::now();
        let mut stats = RunStatistics::default();
        let mut source = MatrixSource::for_run(self.ctx.constant, provided);
        let mut matrix_fingerprints: Vec<String> = Vec::new();

        for i in 0..self.ctx.requests {
            let matrix = self.next_matrix(&mut source);
            let wire = matrix.to_wire();
            if self.ctx.show_matrix {
                self.console.show_matrix(&wire);
            }
            let fingerprint = sha256_hex(wire.as_bytes());
            if matrix_fingerprints.last() != Some(&fingerprint) {
                matrix_fingerprints.push(fingerprint);
            }

            let job = JobRequest {
                matrix: wire,
                country: self.ctx.country.clone(),
                speed_profile,
            };
            let outcome = self.run_iteration(&job)?;
            info!(iteration = i, speed_profile, ?outcome, "iteration finished");
            stats.record(&outcome);
        }

        let elapsed = started.elapsed();
        self.console.summary(elapsed, self.ctx.requests, &stats);

        Ok(ProfileReport {
            speed_profile,
            requests: self.ctx.requests,
            stats,
            elapsed_secs: elapsed.as_secs_f64(),
            matrix_fingerprints,
        })
    }

    fn next_matrix(&mut self, source: &mut MatrixSource) -> CoordinateMatrix {
        let started = Instant::now();
        let (matrix, fresh) = source.next(&self.ctx.bbox, self.ctx.dim, &mut self.rng);
        if fresh {
            self.matrices_generated += 1;
            self.console.matrix_generated(self.ctx.dim, started.elapsed());
            debug!("matrix fingerprint {}", matrix.fingerprint());
        }
        matrix
    }

    fn run_iteration(&mut self, job: &JobRequest) -> Result<IterationOutcome, DriverError> {
        let submitted = Instant::now();

        let reply = match self.backend.submit(job, self.ctx.request_timeout) {
            Ok(reply) => reply,
            Err(TransportError::Timeout) => {
                let reason = format!(
                    "no response within {}s",
                    self.ctx.request_timeout.as_secs()
                );
                warn!("job submission timed out: {reason}");
                self.console
                    .failure("NO RESPONSE", &reason, submitted.elapsed(), "TIMEOUT");
                return Ok(IterationOutcome::TimedOut { reason });
            }
            Err(e) => {
                warn!("job submission failed: {e}");
                let reason = e.to_string();
                self.console.failure(
                    "REQUEST ERROR",
                    &snippet(&reason, SNIPPET_CHARS),
                    submitted.elapsed(),
                    "FAILED",
                );
                return Ok(IterationOutcome::Failed { reason });
            }
        };

        if reply.status != 201 {
            warn!("job creation returned HTTP {}", reply.status);
            self.console.failure(
                &format!("HTTP {}", reply.status),
                &snippet(&reply.body, SNIPPET_CHARS),
                submitted.elapsed(),
                "FAILED",
            );
            return Ok(IterationOutcome::Failed {
                reason: format!("HTTP {}", reply.status),
            });
        }

        std::thread::sleep(self.ctx.grace_period);

        let status_location = reply
            .location
            .ok_or(DriverError::MissingLocation { status: reply.status })?;
        debug!("job accepted at {status_location}");

        let outcome = poll::poll_until_terminal(
            &self.backend,
            &status_location,
            &self.ctx.poll_settings(),
            &self.console,
        )?;

        let result_location = match outcome {
            PollOutcome::Done { result_location } => result_location,
            PollOutcome::DeadlineExceeded { attempts } => {
                let reason = format!("job still running after {attempts} polls");
                self.console.failure(
                    "POLL DEADLINE",
                    &status_location,
                    submitted.elapsed(),
                    "TIMEOUT",
                );
                return Ok(IterationOutcome::TimedOut { reason });
            }
        };

        let result = self
            .backend
            .fetch_result(&result_location, self.ctx.request_timeout)
            .map_err(|source| DriverError::Transport {
                location: result_location.clone(),
                source,
            })?;

        if result.status != 200 {
            return Err(DriverError::ResultFetch {
                location: result_location,
                status: result.status,
                snippet: snippet(&result.body, SNIPPET_CHARS),
            });
        }

        let elapsed = submitted.elapsed();
        self.console
            .success(self.ctx.dim, &self.ctx.country, job.speed_profile, elapsed);
        if self.ctx.print_result {
            self.console.result_body(&result.body);
        }

        Ok(IterationOutcome::Succeeded {
            elapsed_secs: elapsed.as_secs_f64(),
        })
    }
}

#![allow(dead_code)]

use spp_loadtest::{
    backend::{Backend, HttpReply, JobRequest, TransportError},
    config::Config,
    driver::RunContext,
    region::BoundingBox,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Submit(JobRequest),
    Poll(String),
    Fetch(String),
}

/// Replays canned replies in order and records every call.
#[derive(Default)]
pub struct ScriptedBackend {
    submits: RefCell<VecDeque<Result<HttpReply, TransportError>>>,
    polls: RefCell<VecDeque<Result<HttpReply, TransportError>>>,
    fetches: RefCell<VecDeque<Result<HttpReply, TransportError>>>,
    pub calls: RefCell<Vec<Call>>,
}

impl ScriptedBackend {
    pub fn on_submit(self, reply: Result<HttpReply, TransportError>) -> Self {
        self.submits.borrow_mut().push_back(reply);
        self
    }

    pub fn on_poll(self, reply: Result<HttpReply, TransportError>) -> Self {
        self.polls.borrow_mut().push_back(reply);
        self
    }

    pub fn on_fetch(self, reply: Result<HttpReply, TransportError>) -> Self {
        self.fetches.borrow_mut().push_back(reply);
        self
    }

    /// One job that is accepted, finishes on the first poll and returns a result.
    pub fn happy_job(self, id: &str) -> Self {
        self.on_submit(Ok(HttpReply::new(201).with_location(format!("/spp/{id}"))))
            .on_poll(Ok(HttpReply::new(303).with_location(format!("/spp/{id}/result"))))
            .on_fetch(Ok(HttpReply::new(200).with_body("{ \"Matrix\": [[0]] }")))
    }

    pub fn submitted(&self) -> Vec<JobRequest> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Submit(job) => Some(job.clone()),
                _ => None,
            })
            .collect()
    }
}

fn pop(
    queue: &RefCell<VecDeque<Result<HttpReply, TransportError>>>,
    what: &str,
) -> Result<HttpReply, TransportError> {
    queue
        .borrow_mut()
        .pop_front()
        .unwrap_or_else(|| Err(TransportError::Other(format!("unscripted {what}"))))
}

impl Backend for ScriptedBackend {
    fn submit(&self, job: &JobRequest, _timeout: Duration) -> Result<HttpReply, TransportError> {
        self.calls.borrow_mut().push(Call::Submit(job.clone()));
        pop(&self.submits, "submit")
    }

    fn poll(&self, location: &str, _timeout: Duration) -> Result<HttpReply, TransportError> {
        self.calls.borrow_mut().push(Call::Poll(location.to_string()));
        pop(&self.polls, "poll")
    }

    fn fetch_result(
        &self,
        location: &str,
        _timeout: Duration,
    ) -> Result<HttpReply, TransportError> {
        self.calls.borrow_mut().push(Call::Fetch(location.to_string()));
        pop(&self.fetches, "fetch")
    }
}

/// Context with no sleeping and a small matrix.
pub fn fast_ctx(requests: u32, constant: bool) -> RunContext {
    let mut cfg = Config::default();
    cfg.run.requests = requests;
    cfg.run.dim = 3;
    cfg.run.grace_period_ms = 0;
    cfg.run.poll_interval_ms = 0;
    cfg.run.constant = constant;
    cfg.run.seed = Some(1234);
    RunContext::from_config(&cfg, "finland", BoundingBox::FINLAND)
}

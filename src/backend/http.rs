use super::{Backend, types::*};
use crate::config::Target;
use anyhow::{Context, Result};
use reqwest::blocking::{Client, Response};
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use std::time::Duration;
use tracing::debug;

/// `Backend` over blocking HTTP.
pub struct HttpBackend {
    client: Client,
    poller: Client,
    origin: String,
    endpoint: String,
}

impl HttpBackend {
    pub fn new(target: &Target) -> Result<Self> {
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .with_context(|| "building HTTP client")?;
        let poller = Client::builder()
            .timeout(None::<Duration>)
            .redirect(Policy::none())
            .build()
            .with_context(|| "building polling HTTP client")?;
        Ok(Self {
            client,
            poller,
            origin: format!("{}://{}:{}", target.scheme, target.host, target.port),
            endpoint: target.endpoint.clone(),
        })
    }

    pub fn create_url(&self) -> String {
        self.resolve(&self.endpoint)
    }

    /// Resolves a server-issued location against the target origin.
    pub fn resolve(&self, location: &str) -> String {
        if location.starts_with("http://") || location.starts_with("https://") {
            location.to_string()
        } else if location.starts_with('/') {
            format!("{}{}", self.origin, location)
        } else {
            format!("{}/{}", self.origin, location)
        }
    }
}

impl Backend for HttpBackend {
    fn submit(&self, job: &JobRequest, timeout: Duration) -> Result<HttpReply, TransportError> {
        let url = self.create_url();
        debug!(
            "POST {url} country={} speed_profile={} matrix_bytes={}",
            job.country,
            job.speed_profile,
            job.matrix.len()
        );
        let resp = self.client.post(&url).json(job).timeout(timeout).send()?;
        into_reply(resp)
    }

    fn poll(&self, location: &str, timeout: Duration) -> Result<HttpReply, TransportError> {
        let url = self.resolve(location);
        debug!("GET {url} (no redirects)");
        let resp = self.poller.get(&url).timeout(timeout).send()?;
        into_reply(resp)
    }

    fn fetch_result(&self, location: &str, timeout: Duration) -> Result<HttpReply, TransportError> {
        let url = self.resolve(location);
        debug!("GET {url}");
        let resp = self.client.get(&url).timeout(timeout).send()?;
        into_reply(resp)
    }
}

fn into_reply(resp: Response) -> Result<HttpReply, TransportError> {
    let status = resp.status().as_u16();
    let location = resp
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = resp.text()?;
    Ok(HttpReply {
        status,
        location,
        body,
    })
}

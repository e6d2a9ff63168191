pub mod http;
pub mod types;

use std::time::Duration;

pub use types::{HttpReply, JobRequest, TransportError};

/// Client side of the SPP job protocol.
pub trait Backend {
    /// `POST` a job to the creation endpoint.
    fn submit(&self, job: &JobRequest, timeout: Duration) -> Result<HttpReply, TransportError>;
    /// `GET` a status location without following redirects.
    fn poll(&self, location: &str, timeout: Duration) -> Result<HttpReply, TransportError>;
    /// `GET` the result location a finished job redirected to.
    fn fetch_result(&self, location: &str, timeout: Duration) -> Result<HttpReply, TransportError>;
}

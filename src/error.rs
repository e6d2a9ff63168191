use crate::backend::TransportError;
use thiserror::Error;

/// Conditions that abort the whole run rather than a single iteration.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("server down (HTTP 502 while polling {location}), halting")]
    BackendDown { location: String },

    #[error("HTTP {status} response carried no location header")]
    MissingLocation { status: u16 },

    #[error("result fetch from {location} returned HTTP {status}: {snippet}")]
    ResultFetch {
        location: String,
        status: u16,
        snippet: String,
    },

    #[error("transport error while talking to {location}: {source}")]
    Transport {
        location: String,
        #[source]
        source: TransportError,
    },
}

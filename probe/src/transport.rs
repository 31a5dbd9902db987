//! Executes core `HttpRequest`s over the network.
//!
//! # Design
//! `Transport` is the seam between the pure core client and real I/O. The
//! batch runner shares one transport across all of its threads, hence the
//! `Sync` bound. Tests substitute fakes that count, fail or panic.
//!
//! `UreqTransport` wraps a single `ureq::Agent`; the agent is internally
//! reference counted and pools connections across threads.

use std::time::Duration;

use probe_core::{HttpMethod, HttpRequest, HttpResponse};

use crate::error::TransportError;

pub trait Transport: Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Status codes are returned as data, never as errors. `timeout` bounds
    /// the whole call; `None` waits forever.
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(request.url.as_str());
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(request.url.as_str());
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(classify)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        // ureq caps bodies at 10 MB by default; bodies are printed whole.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(classify)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn classify(e: ureq::Error) -> TransportError {
    match e {
        e @ (ureq::Error::Http(_) | ureq::Error::BadUri(_)) => {
            TransportError::InvalidRequest(e.to_string())
        }
        other => TransportError::Io(other.to_string()),
    }
}

//! Fires one request N times in parallel and waits for every copy.
//!
//! # Design
//! Each unit runs on its own OS thread and makes one blocking call through
//! the shared `Transport`. The threads are spawned inside `thread::scope`, so
//! the join handles are an ordinary local `Vec` and nothing outlives `run`.
//! Every handle is joined explicitly: a unit that fails or panics becomes a
//! `UnitOutcome` holding an error and does not stop its siblings.
//!
//! Bodies go to the `OutputSink` as soon as each unit has its response.
//! Status codes are not judged here; a 500 body is printed like a 200 body.

use std::any::Any;
use std::io::Write;
use std::thread;

use probe_core::{HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::error::{ProbeError, UnitError};
use crate::output::OutputSink;
use crate::transport::Transport;

/// Units fired by the smoke run.
pub const DEFAULT_BATCH_COUNT: usize = 10;

#[derive(Debug, Clone)]
pub struct ConcurrentRequestBatch {
    request: HttpRequest,
    count: usize,
}

#[derive(Debug)]
pub struct UnitOutcome {
    pub index: usize,
    pub result: Result<HttpResponse, UnitError>,
}

impl UnitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(&self.result, Ok(response) if response.is_success())
    }
}

#[derive(Debug)]
pub struct BatchReport {
    pub id: Uuid,
    /// One entry per unit, ordered by unit index.
    pub outcomes: Vec<UnitOutcome>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Units that got any response back, whatever the status.
    pub fn responded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.responded()
    }

    /// Units that responded with a status outside 2xx.
    pub fn non_success(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(&o.result, Ok(response) if !response.is_success()))
            .count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(UnitOutcome::is_success)
    }
}

impl ConcurrentRequestBatch {
    pub fn new(request: HttpRequest, count: usize) -> Result<Self, ProbeError> {
        if count == 0 {
            return Err(ProbeError::EmptyBatch);
        }
        Ok(Self { request, count })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    /// Blocks until all units have been joined.
    pub fn run<T, W>(&self, transport: &T, sink: &OutputSink<W>) -> BatchReport
    where
        T: Transport + ?Sized,
        W: Write + Send,
    {
        let id = Uuid::new_v4();
        info!(
            "[batch={}] firing {} x {} {}",
            id,
            self.count,
            self.request.method.as_str(),
            self.request.url
        );

        let outcomes = thread::scope(|scope| {
            let handles: Vec<_> = (0..self.count)
                .map(|index| {
                    let request = &self.request;
                    thread::Builder::new()
                        .name(format!("probe-unit-{index}"))
                        .spawn_scoped(scope, move || run_unit(id, index, request, transport, sink))
                })
                .collect();

            handles
                .into_iter()
                .enumerate()
                .map(|(index, handle)| {
                    let result = match handle {
                        Ok(handle) => handle
                            .join()
                            .unwrap_or_else(|payload| Err(UnitError::Panicked(panic_message(payload)))),
                        Err(e) => Err(UnitError::Spawn(e.to_string())),
                    };
                    if let Err(e) = &result {
                        error!("[batch={}] unit {} failed: {}", id, index, e);
                    }
                    UnitOutcome { index, result }
                })
                .collect::<Vec<_>>()
        });

        let report = BatchReport { id, outcomes };
        info!(
            "[batch={}] done: {} responded ({} non-2xx), {} failed",
            id,
            report.responded(),
            report.non_success(),
            report.failed()
        );
        report
    }
}

fn run_unit<T, W>(
    batch: Uuid,
    index: usize,
    request: &HttpRequest,
    transport: &T,
    sink: &OutputSink<W>,
) -> Result<HttpResponse, UnitError>
where
    T: Transport + ?Sized,
    W: Write + Send,
{
    debug!("[batch={}] unit {} sending", batch, index);
    let response = transport.execute(request)?;
    debug!(
        "[batch={}] unit {} got HTTP {} ({} bytes)",
        batch,
        index,
        response.status,
        response.body.len()
    );
    if let Err(e) = sink.write_body(&response.body) {
        warn!("[batch={}] unit {} could not write body: {}", batch, index, e);
    }
    Ok(response)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        return (*msg).to_string();
    }
    if let Some(msg) = payload.downcast_ref::<String>() {
        return msg.clone();
    }
    "non-string panic payload".to_string()
}

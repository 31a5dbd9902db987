//! Turns a parsed `Command` into requests, prints what comes back.
//!
//! Single probes print the body whatever the status and pass; only a
//! transport failure ends them with an error. The batch never errors once
//! started, its report decides the status under `--strict`.

use std::fs;
use std::io::Write;
use std::path::Path;

use probe_core::{
    single_cart, triple_cart, unknown_categories, CommunicationClient, HttpRequest, HttpResponse,
    Product,
};

use crate::batch::{ConcurrentRequestBatch, DEFAULT_BATCH_COUNT};
use crate::cli::{CartArgs, CartPreset, Command};
use crate::error::ProbeError;
use crate::output::OutputSink;
use crate::transport::Transport;

const MODULE: &str = "RUNNER";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Passed,
    /// A batch unit failed or answered outside 2xx.
    Degraded,
}

impl RunStatus {
    fn and(self, other: RunStatus) -> RunStatus {
        match (self, other) {
            (RunStatus::Passed, RunStatus::Passed) => RunStatus::Passed,
            _ => RunStatus::Degraded,
        }
    }

    /// Process exit code; degraded runs only fail under `strict`.
    pub fn exit_code(self, strict: bool) -> i32 {
        match self {
            RunStatus::Degraded if strict => 1,
            _ => 0,
        }
    }
}

pub struct Runner<'a, T: ?Sized, W> {
    client: CommunicationClient,
    transport: &'a T,
    sink: &'a OutputSink<W>,
}

impl<'a, T, W> Runner<'a, T, W>
where
    T: Transport + ?Sized,
    W: Write + Send,
{
    pub fn new(client: CommunicationClient, transport: &'a T, sink: &'a OutputSink<W>) -> Self {
        Self {
            client,
            transport,
            sink,
        }
    }

    pub fn run(&self, command: &Command) -> Result<RunStatus, ProbeError> {
        match command {
            Command::Smoke => {
                let cluster = self.cluster(0)?;
                let batch = self.batch(DEFAULT_BATCH_COUNT, &triple_cart())?;
                Ok(cluster.and(batch))
            }
            Command::Cluster { partition_id } => self.cluster(*partition_id),
            Command::Node { category } => {
                let response = self.probe_once(&self.client.build_node_from_category(category))?;
                match self.client.parse_node_from_category(response) {
                    Ok(node) => info!("[{}] category {} -> {}", MODULE, category, node),
                    Err(e) => warn!("[{}] category lookup failed: {}", MODULE, e),
                }
                Ok(RunStatus::Passed)
            }
            Command::Categories => {
                let response = self.probe_once(&self.client.build_all_categories())?;
                match self.client.parse_all_categories(response) {
                    Ok(categories) => {
                        info!("[{}] {} categories: {}", MODULE, categories.len(), categories.join(", "))
                    }
                    Err(e) => warn!("[{}] category listing unusable: {}", MODULE, e),
                }
                Ok(RunStatus::Passed)
            }
            Command::VerifyStock(args) => {
                let cart = load_cart(args, CartPreset::Single)?;
                warn_unknown_categories(&cart);
                let response = self.probe_once(&self.client.build_verify_stock(&cart)?)?;
                match self.client.parse_verify_stock(response) {
                    Ok(enough) => info!("[{}] stock sufficient: {}", MODULE, enough),
                    Err(e) => warn!("[{}] stock check unusable: {}", MODULE, e),
                }
                Ok(RunStatus::Passed)
            }
            Command::Purchase(args) => {
                let cart = load_cart(args, CartPreset::Single)?;
                warn_unknown_categories(&cart);
                let response = self.probe_once(&self.client.build_process_purchase(&cart)?)?;
                match self.client.parse_process_purchase(response) {
                    Ok(processed) => info!("[{}] purchase processed: {}", MODULE, processed),
                    Err(e) => warn!("[{}] purchase result unusable: {}", MODULE, e),
                }
                Ok(RunStatus::Passed)
            }
            Command::Batch { count, cart } => {
                let cart = load_cart(cart, CartPreset::Triple)?;
                self.batch(*count, &cart)
            }
        }
    }

    fn cluster(&self, partition_id: i64) -> Result<RunStatus, ProbeError> {
        let response = self.probe_once(&self.client.build_backend_cluster(partition_id))?;
        match self.client.parse_backend_cluster(response) {
            Ok(details) => info!("[{}] partition {}: {}", MODULE, partition_id, details),
            Err(e) => warn!("[{}] partition {} probe: {}", MODULE, partition_id, e),
        }
        Ok(RunStatus::Passed)
    }

    fn batch(&self, count: usize, cart: &[Product]) -> Result<RunStatus, ProbeError> {
        warn_unknown_categories(cart);
        let request = self.client.build_process_purchase(cart)?;
        let report = ConcurrentRequestBatch::new(request, count)?.run(self.transport, self.sink);
        Ok(if report.all_succeeded() {
            RunStatus::Passed
        } else {
            RunStatus::Degraded
        })
    }

    fn probe_once(&self, request: &HttpRequest) -> Result<HttpResponse, ProbeError> {
        info!("[{}] {} {}", MODULE, request.method.as_str(), request.url);
        let response = self.transport.execute(request).map_err(|e| {
            error!("[{}] {} {} failed: {}", MODULE, request.method.as_str(), request.url, e);
            e
        })?;
        info!(
            "[{}] HTTP {} ({} bytes)",
            MODULE,
            response.status,
            response.body.len()
        );
        self.sink.write_body(&response.body)?;
        Ok(response)
    }
}

fn warn_unknown_categories(cart: &[Product]) {
    let unknown = unknown_categories(cart);
    if !unknown.is_empty() {
        warn!(
            "[{}] cart has categories with no partition, the backend will reject it: {}",
            MODULE,
            unknown.join(", ")
        );
    }
}

pub fn load_cart(args: &CartArgs, default: CartPreset) -> Result<Vec<Product>, ProbeError> {
    if let Some(path) = &args.cart_file {
        return read_cart_file(path);
    }
    Ok(match args.cart.unwrap_or(default) {
        CartPreset::Single => single_cart(),
        CartPreset::Triple => triple_cart(),
    })
}

fn read_cart_file(path: &Path) -> Result<Vec<Product>, ProbeError> {
    let cart_error = |reason: String| ProbeError::Cart {
        path: path.display().to_string(),
        reason,
    };
    let raw = fs::read_to_string(path).map_err(|e| cart_error(e.to_string()))?;
    serde_json::from_str(&raw).map_err(|e| cart_error(e.to_string()))
}

//! Synchronous API client core for the supermarket Communication service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The probe binary owns the
//! transport; this crate stays deterministic and testable.
//!
//! # Design
//! - `CommunicationClient` is stateless, it holds only `base_url`.
//! - Each route is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - Response bodies are raw bytes; typed parsing is opt-in.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::{CommunicationClient, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{partition_of, single_cart, triple_cart, unknown_categories, Product, CATEGORIES};

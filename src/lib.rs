//! # printavo-core
//!
//! The request resilience and caching core for the Printavo GraphQL API:
//! a rate-limited execution pipeline with bounded exponential-backoff
//! retries, a FIFO request queue that pauses while the upstream rate-limit
//! window is open, a TTL cache over API responses, and a tiered resolver
//! that finds orders by their human-facing visual ID.
//!
//! ## Quick start
//!
//! ```no_run
//! use printavo_core::PrintavoService;
//!
//! # async fn run() -> printavo_core::PrintavoResult<()> {
//! let service = PrintavoService::from_env()?;
//! let order = service.order_by_visual_id("9435").await?;
//! println!("{:?}", order.nickname);
//! # Ok(())
//! # }
//! ```
//!
//! Every outbound request flows through the same [`RequestQueue`] and shares
//! one [`client::rate_limit::RateLimitState`], so the 100ms pacing gap and
//! the rate-limit hold apply across all callers of a service instance.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod operations;
pub mod queue;
pub mod resolver;
pub mod service;

pub use cache::TtlCache;
pub use client::transport::{GraphQlTransport, HttpTransport, WireResponse};
pub use client::PrintavoClient;
pub use config::PrintavoConfig;
pub use error::{PrintavoError, PrintavoResult};
pub use logging::init_structured_logging;
pub use models::{Account, Connection, Edge, Order};
pub use operations::{extract_visual_ids, is_visual_id, SearchParams};
pub use queue::RequestQueue;
pub use resolver::VisualIdResolver;
pub use service::PrintavoService;

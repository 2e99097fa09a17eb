//! Foglio Content Cache
//!
//! In-process cache for the Foglio blogging platform. Shields the
//! database-backed content layer from redundant reads:
//!
//! - **Store**: TTL key/value storage for JSON-shaped query results
//! - **Key registry**: namespace-prefixed, deterministic cache keys
//! - **Invalidation**: write-side mutations publish events that are
//!   consumed synchronously into exact-key and prefix purges
//!
//! ## Configuration
//!
//! Cache behavior is controlled via `foglio.toml` (or `FOGLIO_*`
//! environment variables):
//!
//! ```toml
//! enabled = true
//! default_ttl_secs = 600
//! sweep_interval_secs = 120
//! # ... see config.rs for all options
//! ```

pub mod clock;
mod config;
mod consumer;
mod events;
pub mod keys;
mod lock;
mod planner;
mod store;
mod sweep;
pub mod telemetry;
mod trigger;

pub use clock::{Clock, ManualClock, SystemClock};
pub use self::config::{CacheConfig, LoadError};
pub use consumer::CacheConsumer;
pub use events::{CacheEvent, Epoch, EventKind, EventQueue};
pub use keys::Namespace;
pub use planner::InvalidationPlan;
pub use store::Store;
pub use sweep::spawn_sweeper;
pub use trigger::CacheTrigger;

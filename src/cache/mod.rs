//! Folio cache layer
//!
//! A process-wide expiring key-value store that short-circuits repeated list
//! reads. The store knows nothing about entities; the entity facade decides
//! what is cached under which key and which writes invalidate it
//! (see [`CachePolicy`]).
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! list_ttl_seconds = 60
//! capacity = 64
//! sweep_interval_seconds = 30   # 0 disables the background sweeper
//! ```

mod config;
mod lock;
mod policy;
mod store;

pub use config::CacheConfig;
pub use policy::{CachePolicy, DEFAULT_LIST_TTL, PROJECTS_KEY, REVIEWS_KEY, SKILLS_KEY};
pub use store::{CachedValue, ExpiringCache, SharedCache};

//! Parcel shared: concurrency and allocation layers over the core model
//!
//! Built on `parcel-core`, this crate adds the pieces multi-threaded
//! consumers need:
//!
//! - `shared`: a container behind a reader-writer lock with a clone-out
//!   discipline (no reference outlives the lock)
//! - `variant`: values as a decoded-scalar sum type for pattern matching
//! - `bridge`: total, invertible conversion between the two value shapes,
//!   with migration statistics
//! - `pool`: per-tag value reuse pools with hit/miss statistics,
//!   transparent to semantics
//!
//! The core exposes blocking operations only; callers bring their own
//! threads. Nothing here installs a tracing subscriber or spawns anything.

pub mod bridge;
pub mod pool;
pub mod shared;
pub mod variant;

// Re-export the types nearly every caller needs
pub use bridge::{BridgeStats, stats as bridge_stats, to_value, to_variant, verify_round_trip};
pub use pool::{PoolConfig, PoolStats, Pooled, ValuePools, init_pools, pools};
pub use shared::SharedContainer;
pub use variant::{Variant, VariantValue};

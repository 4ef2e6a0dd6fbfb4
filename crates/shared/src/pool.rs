//! Value pool: allocation reuse, transparent to semantics
//!
//! One free list per tag, guarded by a mutex, with a lock-free available
//! count consulted before the mutex is ever touched: the empty-pool fast
//! path is a single relaxed load. Hit and miss counters follow the same
//! relaxed-atomic pattern as the rest of the statistics in this crate.
//!
//! Recycled values are [`reset`](Value::reset) on acquire, so a pooled
//! value is observably identical to a freshly constructed one: enabling
//! or disabling pooling never changes the result of any operation, only
//! the allocation profile.
//!
//! The process-wide registry holds sixteen pools (one per tag) and is
//! initialized lazily on first use; [`init_pools`] can install a custom
//! capacity before that happens.

use parcel_core::{CodecError, Value, ValueTag};
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock};

/// Free-list capacity per tag unless [`init_pools`] overrides it.
pub const DEFAULT_POOL_CAPACITY: usize = 256;

/// Pool configuration: free-list capacity per tag.
#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            capacity: DEFAULT_POOL_CAPACITY,
        }
    }
}

impl PoolConfig {
    pub fn with_capacity(capacity: usize) -> PoolConfig {
        PoolConfig { capacity }
    }
}

/// Counters for one tag's pool.
#[derive(Debug, Clone, Copy)]
pub struct PoolStats {
    /// Acquires served from the free list
    pub hits: u64,
    /// Acquires that fell back to allocation
    pub misses: u64,
    /// Values currently parked in the free list
    pub available: usize,
}

impl PoolStats {
    /// Every acquire is either a hit or a miss.
    pub fn total_allocations(&self) -> u64 {
        self.hits + self.misses
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.total_allocations();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug)]
struct TagPool {
    free: Mutex<Vec<Value>>,
    available: AtomicUsize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TagPool {
    fn new() -> TagPool {
        TagPool {
            free: Mutex::new(Vec::new()),
            available: AtomicUsize::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Value>> {
        self.free
            .lock()
            .expect("value pool lock poisoned: a holder panicked")
    }
}

/// The sixteen per-tag pools.
#[derive(Debug)]
pub struct ValuePools {
    pools: [TagPool; 16],
    capacity: usize,
}

impl ValuePools {
    pub fn new(config: PoolConfig) -> ValuePools {
        ValuePools {
            pools: std::array::from_fn(|_| TagPool::new()),
            capacity: config.capacity,
        }
    }

    fn pool(&self, tag: ValueTag) -> &TagPool {
        &self.pools[tag.as_u8() as usize]
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// A newly-constructed default value for the tag, recycled from the
    /// free list when possible.
    pub fn acquire(&self, tag: ValueTag) -> Value {
        let pool = self.pool(tag);
        // Fast path: skip the mutex entirely when the list is empty
        if pool.available.load(Ordering::Relaxed) > 0
            && let Some(mut value) = pool.lock().pop()
        {
            pool.available.fetch_sub(1, Ordering::Relaxed);
            pool.hits.fetch_add(1, Ordering::Relaxed);
            value.reset(tag);
            return value;
        }
        pool.misses.fetch_add(1, Ordering::Relaxed);
        Value::default_for(tag)
    }

    /// Acquire with fallback allocation declined: fails with
    /// pool-exhausted when the free list is empty.
    pub fn try_acquire(&self, tag: ValueTag) -> Result<Value, CodecError> {
        let pool = self.pool(tag);
        if pool.available.load(Ordering::Relaxed) > 0
            && let Some(mut value) = pool.lock().pop()
        {
            pool.available.fetch_sub(1, Ordering::Relaxed);
            pool.hits.fetch_add(1, Ordering::Relaxed);
            value.reset(tag);
            return Ok(value);
        }
        Err(CodecError::PoolExhausted { tag })
    }

    /// Retire a value. Parked below capacity, dropped above it.
    pub fn release(&self, value: Value) {
        let tag = value.tag();
        let pool = self.pool(tag);
        let mut free = pool.lock();
        if free.len() < self.capacity {
            free.push(value);
            pool.available.fetch_add(1, Ordering::Relaxed);
        } else {
            tracing::trace!(tag = %tag, "pool at capacity, dropping retired value");
        }
    }

    pub fn stats(&self, tag: ValueTag) -> PoolStats {
        let pool = self.pool(tag);
        PoolStats {
            hits: pool.hits.load(Ordering::Relaxed),
            misses: pool.misses.load(Ordering::Relaxed),
            available: pool.available.load(Ordering::Relaxed),
        }
    }

    /// Aggregate across all sixteen tags.
    pub fn aggregate_stats(&self) -> PoolStats {
        let mut total = PoolStats {
            hits: 0,
            misses: 0,
            available: 0,
        };
        for pool in &self.pools {
            total.hits += pool.hits.load(Ordering::Relaxed);
            total.misses += pool.misses.load(Ordering::Relaxed);
            total.available += pool.available.load(Ordering::Relaxed);
        }
        total
    }
}

static POOLS: OnceLock<ValuePools> = OnceLock::new();

/// Install the global pools with a custom configuration. Returns false if
/// the pools were already initialized (first caller wins).
pub fn init_pools(config: PoolConfig) -> bool {
    POOLS.set(ValuePools::new(config)).is_ok()
}

/// The process-wide pool registry, default-configured on first use.
pub fn pools() -> &'static ValuePools {
    POOLS.get_or_init(|| ValuePools::new(PoolConfig::default()))
}

/// RAII handle: the destructor returns the value to the global pool
/// instead of freeing it.
#[derive(Debug)]
pub struct Pooled {
    value: Option<Value>,
}

impl Pooled {
    pub fn acquire(tag: ValueTag) -> Pooled {
        Pooled {
            value: Some(pools().acquire(tag)),
        }
    }

    /// Detach the value from the pool lifecycle.
    pub fn into_inner(mut self) -> Value {
        self.value.take().unwrap_or_else(|| Value::null(""))
    }
}

impl Deref for Pooled {
    type Target = Value;

    fn deref(&self) -> &Value {
        self.value.as_ref().expect("pooled value already detached")
    }
}

impl DerefMut for Pooled {
    fn deref_mut(&mut self) -> &mut Value {
        self.value.as_mut().expect("pooled value already detached")
    }
}

impl Drop for Pooled {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            pools().release(value);
        }
    }
}

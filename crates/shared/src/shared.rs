//! Thread-safe container access
//!
//! [`SharedContainer`] wraps a container in a single reader-writer lock.
//! Readers take shared access and may run concurrently; writers take
//! exclusive access. Every getter returns an owned clone: no reference
//! handed out ever outlives the lock, and no lock is held across caller
//! code. Iteration goes through [`SharedContainer::snapshot`], which
//! copies the value list under shared access and is then iterated
//! lock-free.
//!
//! Parsing and bridge conversions happen before the lock is taken, so
//! failures never leave a guard held and writers keep their critical
//! sections short.

use crate::bridge;
use crate::variant::VariantValue;
use parcel_core::{CodecError, Container, Value, WireFormat};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A container behind a reader-writer lock.
#[derive(Debug, Default)]
pub struct SharedContainer {
    inner: RwLock<Container>,
}

impl SharedContainer {
    pub fn new() -> SharedContainer {
        SharedContainer {
            inner: RwLock::new(Container::new()),
        }
    }

    pub fn from_container(c: Container) -> SharedContainer {
        SharedContainer {
            inner: RwLock::new(c),
        }
    }

    /// Unwrap the inner container. Consumes the wrapper, so no lock is
    /// needed or possible.
    pub fn into_inner(self) -> Container {
        self.inner
            .into_inner()
            .expect("container lock poisoned: a writer panicked")
    }

    fn read(&self) -> RwLockReadGuard<'_, Container> {
        self.inner
            .read()
            .expect("container lock poisoned: a writer panicked")
    }

    fn write(&self) -> RwLockWriteGuard<'_, Container> {
        self.inner
            .write()
            .expect("container lock poisoned: a writer panicked")
    }

    // ------------------------------------------------------------------
    // Readers (shared access, clone out)
    // ------------------------------------------------------------------

    pub fn source_id(&self) -> String {
        self.read().source_id().to_string()
    }

    pub fn source_sub_id(&self) -> String {
        self.read().source_sub_id().to_string()
    }

    pub fn target_id(&self) -> String {
        self.read().target_id().to_string()
    }

    pub fn target_sub_id(&self) -> String {
        self.read().target_sub_id().to_string()
    }

    pub fn message_type(&self) -> String {
        self.read().message_type().to_string()
    }

    /// First value with the name, or the null sentinel. Cloned.
    pub fn get_value(&self, name: &str) -> Value {
        self.read().get_value(name)
    }

    /// All values with the name, in insertion order. Cloned.
    pub fn value_array(&self, name: &str) -> Vec<Value> {
        self.read().value_array(name)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy of the full value list, taken under shared access. Iterate
    /// the snapshot outside the lock.
    pub fn snapshot(&self) -> Vec<Value> {
        self.read().values().to_vec()
    }

    /// Deep clone of the whole container.
    pub fn to_container(&self) -> Container {
        self.read().clone()
    }

    pub fn serialize(&self) -> Result<Vec<u8>, CodecError> {
        self.read().serialize()
    }

    pub fn serialize_array(&self) -> Vec<u8> {
        self.read().serialize_array()
    }

    /// First value with the name, converted to its variant form. The
    /// clone is taken under the read lock; the bridge runs after release.
    pub fn get_variant(&self, name: &str) -> Result<VariantValue, CodecError> {
        let value = self.get_value(name);
        bridge::to_variant(&value)
    }

    // ------------------------------------------------------------------
    // Writers (exclusive access)
    // ------------------------------------------------------------------

    pub fn set_source(&self, id: impl Into<String>, sub_id: impl Into<String>) {
        self.write().set_source(id, sub_id);
    }

    pub fn set_target(&self, id: impl Into<String>, sub_id: impl Into<String>) {
        self.write().set_target(id, sub_id);
    }

    pub fn set_message_type(&self, message_type: impl Into<String>) {
        self.write().set_message_type(message_type);
    }

    pub fn set_format(&self, format: WireFormat) {
        self.write().set_format(format);
    }

    pub fn add(&self, value: Value) -> Result<(), CodecError> {
        self.write().add(value)
    }

    /// Convert a variant and append it. Conversion happens before the
    /// lock is taken; on conversion failure the container is untouched.
    pub fn add_variant(&self, variant: &VariantValue) -> Result<(), CodecError> {
        let value = bridge::to_value(variant)?;
        self.write().add(value)
    }

    pub fn remove(&self, name: &str) -> usize {
        self.write().remove(name)
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn merge(&self, other: &Container) {
        self.write().merge(other);
    }

    /// Parse outside the lock, then swap in under exclusive access. On
    /// error the container is untouched and the lock was never taken.
    pub fn deserialize(&self, bytes: &[u8]) -> Result<(), CodecError> {
        let parsed = Container::parse(bytes)?;
        let mut guard = self.write();
        let format = guard.format();
        *guard = parsed;
        guard.set_format(format);
        Ok(())
    }
}

impl From<Container> for SharedContainer {
    fn from(c: Container) -> SharedContainer {
        SharedContainer::from_container(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_reader_ops_clone_out() {
        let shared = SharedContainer::new();
        shared.set_source("A", "a");
        shared.add(Value::int("n", 42)).unwrap();

        assert_eq!(shared.source_id(), "A");
        assert_eq!(shared.get_value("n").as_i32().unwrap(), 42);
        assert_eq!(shared.len(), 1);

        // Mutating the snapshot does not touch the container
        let mut snap = shared.snapshot();
        snap.clear();
        assert_eq!(shared.len(), 1);
    }

    #[test]
    fn test_writer_ops() {
        let shared = SharedContainer::new();
        shared.add(Value::string("k", "1")).unwrap();
        shared.add(Value::string("k", "2")).unwrap();
        assert_eq!(shared.remove("k"), 2);
        shared.set_message_type("ping");
        shared.clear();
        assert_eq!(shared.message_type(), "ping");
        assert!(shared.is_empty());
    }

    #[test]
    fn test_deserialize_failure_leaves_state() {
        let shared = SharedContainer::new();
        shared.add(Value::int("n", 7)).unwrap();
        assert!(shared.deserialize(&[0x7f, 0, 0, 0, 0]).is_err());
        assert_eq!(shared.get_value("n").as_i32().unwrap(), 7);
    }

    #[test]
    fn test_serialize_roundtrip_through_wrapper() {
        let shared = SharedContainer::new();
        shared.set_target("B", "b");
        shared.add(Value::double("d", 2.5)).unwrap();
        let bytes = shared.serialize().unwrap();

        let sink = SharedContainer::new();
        sink.deserialize(&bytes).unwrap();
        assert_eq!(sink.target_id(), "B");
        assert_eq!(sink.get_value("d").as_f64().unwrap(), 2.5);
    }

    #[test]
    #[serial]
    fn test_variant_access_through_bridge() {
        let shared = SharedContainer::new();
        shared
            .add_variant(&VariantValue::string("k", "hello"))
            .unwrap();
        let back = shared.get_variant("k").unwrap();
        assert_eq!(back, VariantValue::string("k", "hello"));

        // Missing names surface as the null sentinel, like get_value
        let missing = shared.get_variant("absent").unwrap();
        assert_eq!(missing, VariantValue::null("absent"));
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        let shared = Arc::new(SharedContainer::new());
        let writers: Vec<_> = (0..4)
            .map(|w| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for i in 0..50 {
                        shared.add(Value::int("n", w * 1000 + i)).unwrap();
                    }
                })
            })
            .collect();
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for _ in 0..50 {
                        // Values are never torn: every read parses cleanly
                        for v in shared.snapshot() {
                            assert_eq!(v.payload().len(), 4);
                            let _ = v.as_i32().unwrap();
                        }
                        let bytes = shared.serialize().unwrap();
                        assert!(Container::parse(&bytes).is_ok());
                    }
                })
            })
            .collect();

        for h in writers {
            h.join().expect("writer panicked");
        }
        for h in readers {
            h.join().expect("reader panicked");
        }

        // Drained state is a serial interleaving of the adds
        assert_eq!(shared.len(), 200);
        let all = shared.value_array("n");
        assert_eq!(all.len(), 200);
        // Per-writer program order is preserved in the final list
        for w in 0..4 {
            let mine: Vec<i32> = all
                .iter()
                .map(|v| v.as_i32().unwrap())
                .filter(|v| v / 1000 == w)
                .collect();
            let mut sorted = mine.clone();
            sorted.sort_unstable();
            assert_eq!(mine, sorted, "writer {} order preserved", w);
        }
    }
}

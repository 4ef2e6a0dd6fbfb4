//! Bridge between payload-byte values and decoded variants
//!
//! `to_variant` and `to_value` are total over the sixteen tags and
//! mutually inverse for every legal input; round-tripping a value through
//! the bridge reproduces it exactly, including wire bytes. Conversion
//! never returns a partial result: any failure (for instance a
//! hand-built `Variant::Long` outside the 32-bit wire range) surfaces as
//! an error and is recorded in the migration statistics.
//!
//! Statistics live in a dedicated mutex-guarded global so concurrent
//! converters can share them; counter reads are a snapshot copy.

use crate::variant::{Variant, VariantValue};
use parcel_core::{CodecError, Value, ValueTag};
use std::sync::Mutex;

/// Lifetime counters for bridge conversions.
#[derive(Debug, Clone, Copy, Default)]
pub struct BridgeStats {
    /// Successful value-to-variant conversions (top-level calls)
    pub to_variant_ok: u64,
    /// Successful variant-to-value conversions (top-level calls)
    pub to_value_ok: u64,
    /// Failed conversions in either direction
    pub failures: u64,
}

impl BridgeStats {
    pub fn conversions(&self) -> u64 {
        self.to_variant_ok + self.to_value_ok + self.failures
    }
}

static STATS: Mutex<BridgeStats> = Mutex::new(BridgeStats {
    to_variant_ok: 0,
    to_value_ok: 0,
    failures: 0,
});

fn stats_lock() -> std::sync::MutexGuard<'static, BridgeStats> {
    STATS.lock().expect("bridge stats lock poisoned: a converter panicked")
}

/// Snapshot of the migration statistics.
pub fn stats() -> BridgeStats {
    *stats_lock()
}

/// Zero the migration statistics. Intended for tests and diagnostics.
pub fn reset_stats() {
    *stats_lock() = BridgeStats::default();
}

/// Convert a value into its decoded-scalar twin.
pub fn to_variant(value: &Value) -> Result<VariantValue, CodecError> {
    match convert_to_variant(value) {
        Ok(v) => {
            stats_lock().to_variant_ok += 1;
            Ok(v)
        }
        Err(e) => {
            stats_lock().failures += 1;
            tracing::warn!(tag = %value.tag(), error = %e, "value-to-variant conversion failed");
            Err(e)
        }
    }
}

/// Convert a variant back into a payload-byte value.
pub fn to_value(variant: &VariantValue) -> Result<Value, CodecError> {
    match convert_to_value(variant) {
        Ok(v) => {
            stats_lock().to_value_ok += 1;
            Ok(v)
        }
        Err(e) => {
            stats_lock().failures += 1;
            tracing::warn!(tag = %variant.tag(), error = %e, "variant-to-value conversion failed");
            Err(e)
        }
    }
}

/// Diagnostic: does the value survive a bridge round-trip unchanged?
pub fn verify_round_trip(value: &Value) -> bool {
    match to_variant(value).and_then(|v| to_value(&v)) {
        Ok(back) => back == *value,
        Err(_) => false,
    }
}

fn convert_to_variant(value: &Value) -> Result<VariantValue, CodecError> {
    let name = value.name().to_string();
    let data = match value.tag() {
        ValueTag::Null => Variant::Null,
        ValueTag::Bool => Variant::Bool(value.as_bool()?),
        ValueTag::Short => Variant::Short(value.as_i16()?),
        ValueTag::UShort => Variant::UShort(value.as_u16()?),
        ValueTag::Int => Variant::Int(value.as_i32()?),
        ValueTag::UInt => Variant::UInt(value.as_u32()?),
        ValueTag::Long => Variant::Long(value.as_i64()?),
        ValueTag::ULong => Variant::ULong(value.as_u64()?),
        ValueTag::LLong => Variant::LLong(value.as_i64()?),
        ValueTag::ULLong => Variant::ULLong(value.as_u64()?),
        ValueTag::Float => Variant::Float(value.as_f32()?),
        ValueTag::Double => Variant::Double(value.as_f64()?),
        ValueTag::Bytes => Variant::Bytes(value.payload().to_vec()),
        ValueTag::Str => Variant::Str(value.as_string()?),
        ValueTag::Container => Variant::Container(Box::new(value.as_container()?)),
        ValueTag::Array => {
            let mut children = Vec::new();
            for child in value.children()? {
                children.push(convert_to_variant(&child)?);
            }
            Variant::Array(children)
        }
    };
    Ok(VariantValue { name, data })
}

fn convert_to_value(variant: &VariantValue) -> Result<Value, CodecError> {
    let name = variant.name.clone();
    Ok(match &variant.data {
        Variant::Null => Value::null(name),
        Variant::Bool(v) => Value::boolean(name, *v),
        Variant::Short(v) => Value::short(name, *v),
        Variant::UShort(v) => Value::ushort(name, *v),
        Variant::Int(v) => Value::int(name, *v),
        Variant::UInt(v) => Value::uint(name, *v),
        Variant::Long(v) => Value::long(name, *v)?,
        Variant::ULong(v) => Value::ulong(name, *v)?,
        Variant::LLong(v) => Value::llong(name, *v),
        Variant::ULLong(v) => Value::ullong(name, *v),
        Variant::Float(v) => Value::float(name, *v),
        Variant::Double(v) => Value::double(name, *v),
        Variant::Bytes(v) => Value::bytes(name, v.clone()),
        Variant::Str(v) => Value::string(name, v.clone()),
        Variant::Container(c) => Value::container(name, c)?,
        Variant::Array(children) => {
            let mut values = Vec::with_capacity(children.len());
            for child in children {
                values.push(convert_to_value(child)?);
            }
            Value::array(name, values)?
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_core::Container;
    use serial_test::serial;

    fn sample_values() -> Vec<Value> {
        let mut inner = Container::new();
        inner.set_source("A", "a");
        inner.add(Value::boolean("ok", true)).unwrap();
        vec![
            Value::null("n"),
            Value::boolean("b", false),
            Value::short("s", -1),
            Value::ushort("us", 1),
            Value::int("i", i32::MIN),
            Value::uint("ui", u32::MAX),
            Value::long("l", -123).unwrap(),
            Value::ulong("ul", 123).unwrap(),
            Value::llong("ll", i64::MAX),
            Value::ullong("ull", u64::MAX),
            Value::float("f", 0.5),
            Value::double("d", -0.25),
            Value::bytes("raw", vec![9, 8, 7]),
            Value::string("t", "text"),
            Value::container("sub", &inner).unwrap(),
            Value::array("a", vec![Value::int("e", 1), Value::null("z")]).unwrap(),
        ]
    }

    #[test]
    #[serial]
    fn test_round_trip_all_tags() {
        for value in sample_values() {
            let variant = to_variant(&value).unwrap();
            assert_eq!(variant.tag(), value.tag());
            let back = to_value(&variant).unwrap();
            assert_eq!(back, value, "{} must round-trip", value.tag());
        }
    }

    #[test]
    #[serial]
    fn test_variant_round_trip_all_tags() {
        let variants: Vec<VariantValue> = sample_values()
            .iter()
            .map(|v| to_variant(v).unwrap())
            .collect();
        for variant in variants {
            let value = to_value(&variant).unwrap();
            let back = to_variant(&value).unwrap();
            assert_eq!(back, variant);
        }
    }

    #[test]
    #[serial]
    fn test_long_tags_stay_distinct() {
        let long = to_variant(&Value::long("n", 5).unwrap()).unwrap();
        let llong = to_variant(&Value::llong("n", 5)).unwrap();
        assert_ne!(long, llong, "wire tag is part of identity");
        assert_eq!(to_value(&long).unwrap().tag(), ValueTag::Long);
        assert_eq!(to_value(&llong).unwrap().tag(), ValueTag::LLong);
    }

    #[test]
    #[serial]
    fn test_out_of_range_long_fails_and_is_counted() {
        reset_stats();
        let bad = VariantValue {
            name: "n".to_string(),
            data: Variant::Long(3_000_000_000),
        };
        let err = to_value(&bad).unwrap_err();
        assert!(matches!(err, CodecError::RangeOverflow { .. }));
        let s = stats();
        assert_eq!(s.failures, 1);
        assert_eq!(s.to_value_ok, 0);
    }

    #[test]
    #[serial]
    fn test_stats_count_conversions() {
        reset_stats();
        let value = Value::int("n", 1);
        let variant = to_variant(&value).unwrap();
        let _ = to_value(&variant).unwrap();
        let s = stats();
        assert_eq!(s.to_variant_ok, 1);
        assert_eq!(s.to_value_ok, 1);
        assert_eq!(s.conversions(), 2);
    }

    #[test]
    #[serial]
    fn test_verify_round_trip() {
        for value in sample_values() {
            assert!(verify_round_trip(&value));
        }
    }

    #[test]
    #[serial]
    fn test_no_partial_result_on_nested_failure() {
        // An array whose second element is out of range: the whole
        // conversion fails, nothing is returned
        let bad = VariantValue::array(
            "a",
            vec![
                VariantValue::int("ok", 1),
                VariantValue {
                    name: "bad".to_string(),
                    data: Variant::ULong(u64::MAX),
                },
            ],
        );
        assert!(to_value(&bad).is_err());
    }
}

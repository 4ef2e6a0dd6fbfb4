//! Randomized round-trip coverage for the codec and the projections.
//!
//! Structured cases live next to the modules; these tests throw randomly
//! shaped containers at every format and require structural equality
//! back. Depth and width are bounded so the generator stays well inside
//! the nesting limit.

use parcel_core::text;
use parcel_core::{Container, Value, from_json_str, from_xml_str, to_json_string, to_xml_string};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MAX_GEN_DEPTH: usize = 4;

fn random_name(rng: &mut StdRng) -> String {
    let len = rng.gen_range(0..8);
    (0..len)
        .map(|_| {
            // Mix in delimiter and non-ASCII characters so escaping is
            // exercised, not just the happy path
            const POOL: &[char] = &[
                'a', 'b', 'k', '7', '_', ',', ';', ':', '{', '}', '\\', '<', '&', '"', 'é', '∆',
            ];
            POOL[rng.gen_range(0..POOL.len())]
        })
        .collect()
}

fn random_value(rng: &mut StdRng, depth: usize) -> Value {
    let name = random_name(rng);
    let composite_allowed = depth < MAX_GEN_DEPTH;
    let pick = rng.gen_range(0..if composite_allowed { 16 } else { 14 });
    match pick {
        0 => Value::null(name),
        1 => Value::boolean(name, rng.r#gen()),
        2 => Value::short(name, rng.r#gen()),
        3 => Value::ushort(name, rng.r#gen()),
        4 => Value::int(name, rng.r#gen()),
        5 => Value::uint(name, rng.r#gen()),
        6 => Value::long(name, i64::from(rng.r#gen::<i32>())).expect("in range"),
        7 => Value::ulong(name, u64::from(rng.r#gen::<u32>())).expect("in range"),
        8 => Value::llong(name, rng.r#gen()),
        9 => Value::ullong(name, rng.r#gen()),
        10 => Value::float(name, rng.r#gen::<f32>()),
        11 => Value::double(name, rng.r#gen::<f64>()),
        12 => {
            let len = rng.gen_range(0..32);
            let bytes: Vec<u8> = (0..len).map(|_| rng.r#gen()).collect();
            Value::bytes(name, bytes)
        }
        13 => {
            let text = random_name(rng);
            Value::string(name, text)
        }
        14 => {
            let nested = random_container(rng, depth + 1);
            Value::container(name, &nested).expect("depth bounded by generator")
        }
        _ => {
            let len = rng.gen_range(0..4);
            let children = (0..len).map(|_| random_value(rng, depth + 1)).collect();
            Value::array(name, children).expect("depth bounded by generator")
        }
    }
}

fn random_container(rng: &mut StdRng, depth: usize) -> Container {
    let mut c = Container::new();
    c.set_source(random_name(rng), random_name(rng));
    c.set_target(random_name(rng), random_name(rng));
    c.set_message_type(random_name(rng));
    let count = rng.gen_range(0..6);
    for _ in 0..count {
        c.add(random_value(rng, depth)).expect("depth bounded by generator");
    }
    c
}

#[test]
fn test_random_values_roundtrip_binary() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..200 {
        let value = random_value(&mut rng, 1);
        let bytes = value.encode();
        let (back, consumed) = parcel_core::decode_one(&bytes).expect("frame should decode");
        assert_eq!(consumed, bytes.len());
        assert_eq!(back, value);
    }
}

#[test]
fn test_random_containers_roundtrip_binary() {
    let mut rng = StdRng::seed_from_u64(0xc0de);
    for _ in 0..100 {
        let c = random_container(&mut rng, 1);
        let bytes = c.serialize().expect("binary serialize");
        let back = Container::parse(&bytes).expect("binary parse");
        assert_eq!(back, c);
    }
}

#[test]
fn test_random_containers_roundtrip_text() {
    let mut rng = StdRng::seed_from_u64(0x7e47);
    for _ in 0..100 {
        let c = random_container(&mut rng, 1);
        let encoded = text::encode(&c);
        let back = text::decode(&encoded).expect("text parse");
        assert_eq!(back, c, "text must be lossless: {}", encoded);
    }
}

#[test]
fn test_random_containers_roundtrip_json() {
    let mut rng = StdRng::seed_from_u64(0x150_d);
    for _ in 0..100 {
        let c = random_container(&mut rng, 1);
        let json = to_json_string(&c).expect("projection serialize");
        let back = from_json_str(&json).expect("projection parse");
        assert_eq!(back, c, "JSON projection must preserve structure");
    }
}

#[test]
fn test_random_containers_roundtrip_xml() {
    let mut rng = StdRng::seed_from_u64(0x31_13);
    for _ in 0..100 {
        let c = random_container(&mut rng, 1);
        let xml = to_xml_string(&c);
        let back = from_xml_str(&xml).expect("projection parse");
        assert_eq!(back, c, "XML projection must preserve structure");
    }
}

#[test]
fn test_text_and_binary_autodetect() {
    let mut rng = StdRng::seed_from_u64(0xde7ec7);
    for _ in 0..50 {
        let c = random_container(&mut rng, 1);

        let binary = c.serialize_binary();
        assert!(binary[0] <= 0x0f);
        let mut sink = Container::new();
        sink.deserialize(&binary).expect("auto-detect binary");
        assert_eq!(sink, c);

        let text = text::encode(&c);
        let mut sink = Container::new();
        sink.deserialize(text.as_bytes()).expect("auto-detect text");
        assert_eq!(sink, c);
    }
}

#[test]
fn test_truncated_binary_never_panics() {
    let mut rng = StdRng::seed_from_u64(0x7a11);
    let c = random_container(&mut rng, 1);
    let bytes = c.serialize_binary();
    for cut in 0..bytes.len() {
        // Every truncation must fail cleanly, never panic
        assert!(
            Container::parse(&bytes[..cut]).is_err(),
            "truncation at {} must be detected",
            cut
        );
    }
}

#[test]
fn test_tag_coverage_of_generator() {
    // Guard against the generator silently dropping kinds
    let mut rng = StdRng::seed_from_u64(0xab5);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..500 {
        seen.insert(random_value(&mut rng, 1).tag());
    }
    for tag in parcel_core::ALL_TAGS {
        assert!(seen.contains(&tag), "{} never generated", tag);
    }
}

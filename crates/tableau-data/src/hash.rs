// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Content hashing shared by stages, props, and components.
//!
//! The hasher is seeded with fixed keys so that two structurally identical
//! stages always produce the same value within a process.

use ahash::RandomState;
use serde_json::{Number, Value};
use std::hash::{BuildHasher, Hash, Hasher};

const SEEDS: (u64, u64, u64, u64) = (
    0x7461_626c_6561_7531,
    0x9e37_79b9_7f4a_7c15,
    0xc2b2_ae3d_27d4_eb4f,
    0x1656_67b1_9e37_79f9,
);

/// Contribution of a `null` payload.
const NULL_PAYLOAD: u64 = 0x6e75_6c6c;

pub(crate) fn content_hasher() -> impl Hasher {
    RandomState::with_seeds(SEEDS.0, SEEDS.1, SEEDS.2, SEEDS.3).build_hasher()
}

/// Hashes a value with the content hasher.
#[cfg(test)]
pub(crate) fn content_hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = content_hasher();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Feeds an opaque JSON payload into `state`.
///
/// Agrees with `Value`'s equality: object entries are visited in sorted key
/// order, since two objects with the same entries compare equal whatever
/// order their keys were inserted in.
pub(crate) fn hash_payload<H: Hasher>(payload: &Value, state: &mut H) {
    match payload {
        Value::Null => state.write_u64(NULL_PAYLOAD),
        Value::Bool(b) => {
            state.write_u8(1);
            b.hash(state);
        }
        Value::Number(n) => {
            state.write_u8(2);
            hash_number(n, state);
        }
        Value::String(s) => {
            state.write_u8(3);
            s.hash(state);
        }
        Value::Array(items) => {
            state.write_u8(4);
            state.write_usize(items.len());
            for item in items {
                hash_payload(item, state);
            }
        }
        Value::Object(entries) => {
            state.write_u8(5);
            state.write_usize(entries.len());
            let mut sorted: Vec<_> = entries.iter().collect();
            sorted.sort_unstable_by(|a, b| a.0.cmp(b.0));
            for (key, value) in sorted {
                key.hash(state);
                hash_payload(value, state);
            }
        }
    }
}

fn hash_number<H: Hasher>(n: &Number, state: &mut H) {
    // Integers and floats never compare equal, so each keeps its own tag.
    if let Some(u) = n.as_u64() {
        state.write_u8(0);
        state.write_u64(u);
    } else if let Some(i) = n.as_i64() {
        state.write_u8(1);
        state.write_i64(i);
    } else if let Some(f) = n.as_f64() {
        state.write_u8(2);
        // 0.0 == -0.0
        let f = if f == 0.0 { 0.0 } else { f };
        state.write_u64(f.to_bits());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload_hash(payload: &Value) -> u64 {
        let mut hasher = content_hasher();
        hash_payload(payload, &mut hasher);
        hasher.finish()
    }

    #[test]
    fn hashing_is_stable_within_a_process() {
        assert_eq!(content_hash_of("castle"), content_hash_of("castle"));
        assert_ne!(content_hash_of("castle"), content_hash_of("keep"));
    }

    #[test]
    fn null_payload_uses_sentinel() {
        assert_eq!(payload_hash(&Value::Null), payload_hash(&Value::Null));
        assert_ne!(payload_hash(&Value::Null), payload_hash(&json!("null")));
    }

    #[test]
    fn payload_content_drives_hash() {
        assert_eq!(payload_hash(&json!({"x": 1})), payload_hash(&json!({"x": 1})));
        assert_ne!(payload_hash(&json!({"x": 1})), payload_hash(&json!({"x": 2})));
    }

    #[test]
    fn key_order_does_not_change_hash() {
        let ab = json!({"a": 1, "b": {"c": [1, 2], "d": true}});
        let ba = json!({"b": {"d": true, "c": [1, 2]}, "a": 1});
        assert_eq!(ab, ba);
        assert_eq!(payload_hash(&ab), payload_hash(&ba));
    }

    #[test]
    fn kinds_are_told_apart() {
        assert_ne!(payload_hash(&json!(1)), payload_hash(&json!("1")));
        assert_ne!(payload_hash(&json!(1)), payload_hash(&json!(1.0)));
        assert_ne!(payload_hash(&json!([1, 2])), payload_hash(&json!([2, 1])));
        assert_eq!(payload_hash(&json!(0.0)), payload_hash(&json!(-0.0)));
    }
}

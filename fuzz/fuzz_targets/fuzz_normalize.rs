//! Normalization must accept any JSON and be idempotent.

#![no_main]

use libfuzzer_sys::fuzz_target;
use serde_json::Value;
use tourismdb::normalize;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<Value>(data) else {
        return;
    };

    let once = normalize(value);
    let serialized = serde_json::to_value(&once).expect("documents always serialize");
    assert_eq!(serialized["experiences"], serialized["featured_experiences"]);
    assert_eq!(normalize(serialized), once);
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use tracekit::ds::KeyInterner;

// Fuzz property-based tests for KeyInterner
//
// Tests specific invariants and properties:
// - Handle/resolve round-trip consistency
// - Dense handles in first-observation order
// - Idempotency of intern and intern_owned
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let test_type = data[0] % 3;

    match test_type {
        0 => test_roundtrip(&data[1..]),
        1 => test_dense_first_seen_order(&data[1..]),
        2 => test_owned_matches_by_ref(&data[1..]),
        _ => unreachable!(),
    }
});

// Property: every interned key resolves back to itself
fn test_roundtrip(data: &[u8]) {
    let mut interner: KeyInterner<String> = KeyInterner::new();

    for chunk in data.chunks(3) {
        let key = format!("0x{:02x?}", chunk);
        let handle = interner.intern_owned(key.clone());

        assert_eq!(interner.get_handle(&key), Some(handle));
        assert_eq!(interner.resolve(handle), Some(&key));
    }

    // Every handle below len resolves; the next one does not.
    for handle in 0..interner.len() as u64 {
        assert!(interner.resolve(handle).is_some());
    }
    assert_eq!(interner.resolve(interner.len() as u64), None);
}

// Property: new keys get handles 0, 1, 2, ... in first-seen order
fn test_dense_first_seen_order(data: &[u8]) {
    let mut interner: KeyInterner<u32> = KeyInterner::new();
    let mut next_expected = 0u64;

    for &byte in data {
        let key = u32::from(byte);
        let was_new = interner.get_handle(&key).is_none();
        let handle = interner.intern(&key);

        if was_new {
            assert_eq!(handle, next_expected);
            next_expected += 1;
        } else {
            assert!(handle < next_expected);
        }
    }

    assert_eq!(interner.len() as u64, next_expected);
}

// Property: intern_owned and intern assign identical handles
fn test_owned_matches_by_ref(data: &[u8]) {
    let mut by_ref: KeyInterner<String> = KeyInterner::new();
    let mut by_val: KeyInterner<String> = KeyInterner::new();

    for chunk in data.chunks(2) {
        let key = format!("{chunk:?}");
        let r = by_ref.intern(&key);
        let v = by_val.intern_owned(key);
        assert_eq!(r, v);
    }

    assert_eq!(by_ref.len(), by_val.len());
    assert_eq!(by_ref.is_empty(), by_val.is_empty());
}

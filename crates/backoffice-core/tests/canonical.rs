use backoffice_core::canonical;
use proptest::prelude::*;
use serde_json::json;

#[test]
fn stable_json_bytes_are_key_order_deterministic() {
    let a = json!({"statusCode": "ACTIVE", "actorName": "ops"});
    let b = json!({"actorName": "ops", "statusCode": "ACTIVE"});
    let ba = canonical::stable_json_bytes(&a).expect("stable json a");
    let bb = canonical::stable_json_bytes(&b).expect("stable json b");
    assert_eq!(ba, bb);
}

#[test]
fn stable_hash_is_lowercase_sha256_hex() {
    let hash = canonical::stable_hash_hex(b"backoffice-core-determinism");
    assert_eq!(hash.len(), 64);
    assert!(hash.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
}

proptest! {
    #[test]
    fn stable_json_hash_is_independent_of_key_order(
        a in "[a-z_]{1,12}",
        b in "[a-z_]{1,12}",
        av in any::<u32>(),
        bv in any::<bool>()
    ) {
        prop_assume!(a != b);
        let left = json!({a.clone(): av, b.clone(): bv});
        let right = json!({b: bv, a: av});
        let hl = canonical::stable_json_hash_hex(&left).expect("hash left");
        let hr = canonical::stable_json_hash_hex(&right).expect("hash right");
        prop_assert_eq!(hl, hr);
    }
}

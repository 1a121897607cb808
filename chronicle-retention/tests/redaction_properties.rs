//! Property tests for the redaction walk.

use chronicle_retention::redaction::{is_sensitive_field, redact, SENTINEL};
use proptest::prelude::*;
use serde_json::Value;

fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("email".to_string()),
        Just("username".to_string()),
        Just("ip_address".to_string()),
        Just("amount".to_string()),
        Just("plan".to_string()),
        "[a-z]{1,8}",
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[a-zA-Z0-9@. ]{0,16}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(arb_key(), inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

/// Same keys and array lengths, recursively.
fn same_shape(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(ma), Value::Object(mb)) => {
            ma.len() == mb.len()
                && ma
                    .iter()
                    .all(|(k, va)| mb.get(k).is_some_and(|vb| same_shape(va, vb)))
        }
        (Value::Array(xa), Value::Array(xb)) => {
            xa.len() == xb.len() && xa.iter().zip(xb).all(|(va, vb)| same_shape(va, vb))
        }
        (Value::Object(_) | Value::Array(_), _) | (_, Value::Object(_) | Value::Array(_)) => false,
        _ => true,
    }
}

proptest! {
    #[test]
    fn redaction_is_idempotent(value in arb_value()) {
        let once = redact(&value);
        let twice = redact(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn redaction_preserves_structure(value in arb_value()) {
        let redacted = redact(&value);
        prop_assert!(same_shape(&value, &redacted));
    }

    #[test]
    fn scalars_under_non_sensitive_keys_are_untouched(value in arb_value()) {
        let redacted = redact(&value);
        check_untouched(&value, &redacted);
    }
}

fn check_untouched(original: &Value, redacted: &Value) {
    match (original, redacted) {
        (Value::Object(ma), Value::Object(mb)) => {
            for (key, va) in ma {
                let vb = &mb[key.as_str()];
                match va {
                    Value::Object(_) | Value::Array(_) => check_untouched(va, vb),
                    _ if is_sensitive_field(key) => {
                        assert_eq!(vb, &Value::String(SENTINEL.to_string()));
                    }
                    _ => assert_eq!(va, vb),
                }
            }
        }
        (Value::Array(xa), Value::Array(xb)) => {
            for (va, vb) in xa.iter().zip(xb) {
                check_untouched(va, vb);
            }
        }
        _ => assert_eq!(original, redacted),
    }
}

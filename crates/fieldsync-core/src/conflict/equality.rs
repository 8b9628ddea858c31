//! Structural equality over JSON values

use serde_json::Value;

/// Compare two JSON values structurally.
///
/// Numbers compare by numeric value so `1` and `1.0` are equal, objects by
/// key set plus pairwise values, arrays pairwise in order.
#[allow(clippy::float_cmp)]
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => {
            a == b || matches!((a.as_f64(), b.as_f64()), (Some(x), Some(y)) if x == y)
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| deep_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| deep_equal(x, y)))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn primitives() {
        assert!(deep_equal(&json!("done"), &json!("done")));
        assert!(!deep_equal(&json!("done"), &json!("working")));
        assert!(deep_equal(&json!(3), &json!(3.0)));
        assert!(!deep_equal(&json!(3), &json!("3")));
        assert!(!deep_equal(&json!(false), &json!(0)));
    }

    #[test]
    fn null_only_equals_null() {
        assert!(deep_equal(&Value::Null, &Value::Null));
        assert!(!deep_equal(&Value::Null, &json!({})));
        assert!(!deep_equal(&json!(0), &Value::Null));
    }

    #[test]
    fn nested_structures() {
        let a = json!({"items": [{"qty": 2, "desc": "2x4"}], "notes": null});
        let b = json!({"notes": null, "items": [{"desc": "2x4", "qty": 2}]});
        assert!(deep_equal(&a, &b));

        let reordered = json!({"items": [1, 2]});
        assert!(!deep_equal(&reordered, &json!({"items": [2, 1]})));
    }

    #[test]
    fn objects_need_matching_key_sets() {
        assert!(!deep_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
        assert!(!deep_equal(&json!({"a": 1, "b": 2}), &json!({"a": 1, "c": 2})));
    }

    #[test]
    fn arrays_and_objects_are_distinct() {
        assert!(!deep_equal(&json!([]), &json!({})));
    }
}

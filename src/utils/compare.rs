use serde_json::Value;

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// 遞迴比較兩個 JSON 值，回傳所有差異訊息
pub fn diff_values(a: &Value, name_a: &str, b: &Value, name_b: &str) -> Vec<String> {
    let mut mismatches = Vec::new();
    check_value(a, name_a, b, name_b, &mut mismatches);
    mismatches
}

fn check_value(a: &Value, name_a: &str, b: &Value, name_b: &str, out: &mut Vec<String>) {
    match (a, b) {
        (Value::Object(_), Value::Object(_)) => check_dict(a, name_a, b, name_b, out),
        (Value::Array(la), Value::Array(lb)) => {
            if la.len() == lb.len() {
                for (i, (va, vb)) in la.iter().zip(lb.iter()).enumerate() {
                    check_value(
                        va,
                        &format!("{}[{}]", name_a, i),
                        vb,
                        &format!("{}[{}]", name_b, i),
                        out,
                    );
                }
            } else {
                out.push(format!(
                    "Mismatch: lists {} and {} have different sizes: {} and {}",
                    name_a,
                    name_b,
                    la.len(),
                    lb.len()
                ));
            }
        }
        _ if kind_of(a) != kind_of(b) => out.push(format!(
            "Mismatch: {} has type {}, but has type {} in {}",
            name_a,
            kind_of(a),
            kind_of(b),
            name_b
        )),
        _ if a != b => out.push(format!("Mismatch: {}={} != {}={}", name_a, a, b, name_b)),
        _ => {}
    }
}

fn check_dict(a: &Value, name_a: &str, b: &Value, name_b: &str, out: &mut Vec<String>) {
    let (Some(da), Some(db)) = (a.as_object(), b.as_object()) else {
        return;
    };
    for (key, va) in da {
        match db.get(key) {
            Some(vb) => check_value(
                va,
                &format!("{}[{}]", name_a, key),
                vb,
                &format!("{}[{}]", name_b, key),
                out,
            ),
            None => out.push(format!("Mismatch: Key {} from {} not in {}", key, name_a, name_b)),
        }
    }
    for key in db.keys() {
        if !da.contains_key(key) {
            out.push(format!("Mismatch: Key {} from {} not in {}", key, name_b, name_a));
        }
    }
}

/// 將文字轉成布林值 (不分大小寫)
///
/// * true: `true`, `truthy`, `yes`, `y`
/// * false: `false`, `falsy`, `no`, `n`, `none`
///
/// 其他非空字串皆為 true。
pub fn str_to_bool(text: &str) -> bool {
    match text.trim().to_lowercase().as_str() {
        "false" | "falsy" | "no" | "n" | "none" => false,
        "true" | "truthy" | "yes" | "y" => true,
        other => !other.is_empty(),
    }
}

/// clap value parser wrapper around [`str_to_bool`]
pub fn parse_bool_flag(text: &str) -> std::result::Result<bool, String> {
    Ok(str_to_bool(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equal_values_have_no_mismatch() {
        let a = json!({"a": [1, 2, {"b": "c"}]});
        assert!(diff_values(&a, "A", &a.clone(), "B").is_empty());
    }

    #[test]
    fn test_dict_key_mismatches() {
        let a = json!({"only_a": 1, "shared": 2});
        let b = json!({"only_b": 1, "shared": 3});
        let diff = diff_values(&a, "A", &b, "B");
        assert_eq!(
            diff,
            vec![
                "Mismatch: Key only_a from A not in B".to_string(),
                "Mismatch: A[shared]=2 != 3=B[shared]".to_string(),
                "Mismatch: Key only_b from B not in A".to_string(),
            ]
        );
    }

    #[test]
    fn test_list_and_type_mismatches() {
        let diff = diff_values(&json!([1, 2]), "A", &json!([1]), "B");
        assert_eq!(diff.len(), 1);
        assert!(diff[0].contains("different sizes: 2 and 1"));

        let diff = diff_values(&json!({"x": "1"}), "A", &json!({"x": 1}), "B");
        assert_eq!(diff, vec!["Mismatch: A[x] has type string, but has type number in B[x]".to_string()]);
    }

    #[test]
    fn test_str_to_bool() {
        assert!(str_to_bool("YES"));
        assert!(str_to_bool("y"));
        assert!(str_to_bool("anything"));
        assert!(!str_to_bool("None"));
        assert!(!str_to_bool("falsy"));
        assert!(!str_to_bool(""));
    }
}

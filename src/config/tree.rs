use serde_json::{Map, Value};

/// Nested configuration mapping: string keys to scalars, maps or lists.
pub type ConfigTree = Map<String, Value>;

/// Loose truthiness used for presence checks: `null`, `false`, `0`, `""`, `"0"`,
/// empty lists and empty maps are false.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Boolean switch semantics: `true`, non-zero numbers and the strings
/// `1`/`true`/`on`/`yes` (any case) are on; everything else is off.
#[must_use]
pub fn as_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        ),
        _ => false,
    }
}

/// Walk nested maps by key. Any non-map on the way yields `None`.
#[must_use]
pub fn get_path<'a>(tree: &'a ConfigTree, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut current = tree.get(*first)?;
    for key in rest {
        current = current.as_object()?.get(*key)?;
    }
    Some(current)
}

/// String form of a scalar leaf; `None` for maps, lists and `null`.
#[must_use]
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(if *b { "1".to_string() } else { String::new() }),
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Deep merge `overlay` onto `base`; maps merge recursively, everything else is replaced.
pub(crate) fn deep_merge(base: &mut ConfigTree, overlay: ConfigTree) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                deep_merge(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

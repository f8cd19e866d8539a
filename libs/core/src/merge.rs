use serde_json::Value;

/// Recursively merges `overlay` into `base`.
///
/// Objects are merged key by key; any other value in `overlay` replaces the one in
/// `base`.
///
/// ```
/// use gsm_core::deep_merge;
/// use serde_json::json;
///
/// let mut base = json!({"recipient": {"id": "1"}, "message": {"text": "hi"}});
/// deep_merge(&mut base, &json!({"message": {"metadata": "m"}, "tag": "t"}));
/// assert_eq!(base, json!({
///     "recipient": {"id": "1"},
///     "message": {"text": "hi", "metadata": "m"},
///     "tag": "t"
/// }));
/// ```
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

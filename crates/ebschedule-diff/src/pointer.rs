//! Path-addressed edits on a [`Document`].
//!
//! Paths are JSON-Pointer strings: `""` is the root, `/Target/Input` names
//! the `Input` key inside `Target`, `/Tags/0` the first element of a list.
//! `~1` and `~0` escape `/` and `~` inside a token.
//!
//! A path that does not resolve is never an error for reads and removals;
//! only malformed paths, writes through scalars, and failed type assertions
//! are.

use serde_json::{Map, Number, Value};

use crate::error::{DiffError, DiffResult};
use crate::Document;

/// Split a path into unescaped tokens.
pub fn parse_path(path: &str) -> DiffResult<Vec<String>> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    let rest = path.strip_prefix('/').ok_or_else(|| DiffError::InvalidPath {
        path: path.to_string(),
    })?;
    Ok(rest.split('/').map(unescape_token).collect())
}

/// Join tokens back into a path string.
pub fn format_path(tokens: &[String]) -> String {
    let mut out = String::new();
    for token in tokens {
        out.push('/');
        out.push_str(&escape_token(token));
    }
    out
}

fn unescape_token(token: &str) -> String {
    if !token.contains('~') {
        return token.to_string();
    }
    token.replace("~1", "/").replace("~0", "~")
}

fn escape_token(token: &str) -> String {
    if !token.contains('/') && !token.contains('~') {
        return token.to_string();
    }
    token.replace('~', "~0").replace('/', "~1")
}

/// A list index token: ASCII digits without leading zeros.
fn array_index(token: &str) -> Option<usize> {
    let bytes = token.as_bytes();
    if bytes.is_empty() || (bytes.len() > 1 && bytes[0] == b'0') {
        return None;
    }
    if !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    token.parse().ok()
}

/// Name of a document's variant, for error messages.
pub fn kind_name(value: &Document) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

fn lookup<'a>(doc: &'a Document, tokens: &[String]) -> Option<&'a Document> {
    tokens.iter().try_fold(doc, |current, token| match current {
        Value::Object(map) => map.get(token),
        Value::Array(items) => array_index(token).and_then(|i| items.get(i)),
        _ => None,
    })
}

fn lookup_mut<'a>(doc: &'a mut Document, tokens: &[String]) -> Option<&'a mut Document> {
    let mut current = doc;
    for token in tokens {
        current = match current {
            Value::Object(map) => map.get_mut(token)?,
            Value::Array(items) => items.get_mut(array_index(token)?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Returns `true` if `path` resolves in `doc`.
///
/// Malformed paths never resolve.
pub fn has(doc: &Document, path: &str) -> bool {
    parse_path(path)
        .map(|tokens| lookup(doc, &tokens).is_some())
        .unwrap_or(false)
}

/// The value at `path`, or `None` when the path does not resolve.
pub fn get<'a>(doc: &'a Document, path: &str) -> DiffResult<Option<&'a Document>> {
    let tokens = parse_path(path)?;
    Ok(lookup(doc, &tokens))
}

/// A scalar type that a resolved value can be asserted to have.
pub trait Scalar: Sized {
    /// Human-readable type name used in mismatch errors.
    const EXPECTED: &'static str;

    /// Extract the scalar, or `None` if `value` has another type.
    fn from_document(value: &Document) -> Option<Self>;
}

impl Scalar for String {
    const EXPECTED: &'static str = "string";

    fn from_document(value: &Document) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl Scalar for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_document(value: &Document) -> Option<Self> {
        value.as_bool()
    }
}

impl Scalar for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_document(value: &Document) -> Option<Self> {
        value.as_i64()
    }
}

impl Scalar for u64 {
    const EXPECTED: &'static str = "unsigned integer";

    fn from_document(value: &Document) -> Option<Self> {
        value.as_u64()
    }
}

impl Scalar for f64 {
    const EXPECTED: &'static str = "number";

    fn from_document(value: &Document) -> Option<Self> {
        value.as_f64()
    }
}

impl Scalar for Number {
    const EXPECTED: &'static str = "number";

    fn from_document(value: &Document) -> Option<Self> {
        match value {
            Value::Number(n) => Some(n.clone()),
            _ => None,
        }
    }
}

/// `Option<T>` accepts `null` as well as `T`.
impl<T: Scalar> Scalar for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_document(value: &Document) -> Option<Self> {
        if value.is_null() {
            return Some(None);
        }
        T::from_document(value).map(Some)
    }
}

/// The value at `path`, asserted to be of scalar type `T`.
///
/// Returns `Ok(None)` when the path does not resolve and
/// [`DiffError::TypeMismatch`] when it resolves to another type.
pub fn get_as<T: Scalar>(doc: &Document, path: &str) -> DiffResult<Option<T>> {
    let Some(value) = get(doc, path)? else {
        return Ok(None);
    };
    T::from_document(value)
        .map(Some)
        .ok_or_else(|| DiffError::TypeMismatch {
            path: path.to_string(),
            expected: T::EXPECTED,
            actual: kind_name(value),
        })
}

/// Remove the value at `path`, returning the edited document and whether
/// anything was removed.
///
/// Mapping siblings keep their order. When the path does not resolve the
/// document comes back unchanged with `false`. Removing the root replaces
/// the document with `null`; a `null` root counts as already removed.
pub fn remove(mut doc: Document, path: &str) -> DiffResult<(Document, bool)> {
    let tokens = parse_path(path)?;
    let Some((last, parents)) = tokens.split_last() else {
        let removed = !doc.is_null();
        return Ok((Document::Null, removed));
    };

    let removed = match lookup_mut(&mut doc, parents) {
        Some(Value::Object(map)) => map.shift_remove(last.as_str()).is_some(),
        Some(Value::Array(items)) => match array_index(last) {
            Some(i) if i < items.len() => {
                items.remove(i);
                true
            }
            _ => false,
        },
        _ => false,
    };
    Ok((doc, removed))
}

/// Insert or overwrite the value at `path`.
///
/// Missing intermediate keys are created as empty mappings, appended after
/// their existing siblings. Descending through a scalar or `null`, or through
/// a list index that does not exist, is a [`DiffError::Structural`] error.
/// The final token of a list path may be an existing index, the list length,
/// or `-`; the latter two append.
pub fn set(doc: &mut Document, path: &str, value: Document) -> DiffResult<()> {
    let tokens = parse_path(path)?;
    let Some((last, parents)) = tokens.split_last() else {
        *doc = value;
        return Ok(());
    };

    let mut current = doc;
    for (depth, token) in parents.iter().enumerate() {
        current = match current {
            Value::Object(map) => map
                .entry(token.clone())
                .or_insert_with(|| Value::Object(Map::new())),
            Value::Array(items) => {
                let len = items.len();
                match array_index(token).filter(|&i| i < len) {
                    Some(i) => &mut items[i],
                    None => {
                        return Err(structural(
                            path,
                            format!(
                                "no index {token:?} in list at {:?} of length {len}",
                                format_path(&tokens[..depth])
                            ),
                        ))
                    }
                }
            }
            other => {
                return Err(structural(
                    path,
                    format!(
                        "{:?} holds a {}, not a container",
                        format_path(&tokens[..depth]),
                        kind_name(other)
                    ),
                ))
            }
        };
    }

    match current {
        Value::Object(map) => {
            map.insert(last.clone(), value);
            Ok(())
        }
        Value::Array(items) => {
            let len = items.len();
            match array_index(last) {
                Some(i) if i < len => items[i] = value,
                Some(i) if i == len => items.push(value),
                _ if last == "-" => items.push(value),
                _ => {
                    return Err(structural(
                        path,
                        format!("no index {last:?} in list of length {len}"),
                    ))
                }
            }
            Ok(())
        }
        other => Err(structural(
            path,
            format!(
                "{:?} holds a {}, not a container",
                format_path(parents),
                kind_name(other)
            ),
        )),
    }
}

fn structural(path: &str, reason: String) -> DiffError {
    DiffError::Structural {
        path: path.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn parse_and_format_paths() {
        assert!(parse_path("").unwrap().is_empty());
        assert_eq!(parse_path("/Target/Input").unwrap(), vec!["Target", "Input"]);
        assert_eq!(parse_path("/a~1b/c~0d").unwrap(), vec!["a/b", "c~d"]);
        assert_eq!(parse_path("/").unwrap(), vec![""]);
        assert_eq!(format_path(&["a/b".into(), "c~d".into()]), "/a~1b/c~0d");
        assert!(matches!(
            parse_path("Target"),
            Err(DiffError::InvalidPath { .. })
        ));
    }

    #[test]
    fn has_follows_keys_and_indices() {
        let doc = json!({"a": {"b": [10, {"c": null}]}});
        assert!(has(&doc, ""));
        assert!(has(&doc, "/a/b/1/c"));
        assert!(!has(&doc, "/a/b/2"));
        assert!(!has(&doc, "/a/b/01"));
        assert!(!has(&doc, "/a/b/0/x"));
        assert!(!has(&doc, "/a/b/1/c/d"));
        assert!(!has(&doc, "no-slash"));
    }

    #[test]
    fn get_returns_value_or_none() {
        let doc = json!({"key": "val"});
        assert_eq!(get(&doc, "/key").unwrap(), Some(&json!("val")));
        assert_eq!(get(&doc, "/notexist").unwrap(), None);
        assert_eq!(get(&doc, "").unwrap(), Some(&doc));
    }

    #[test]
    fn get_as_checks_the_type() {
        let doc = json!({"key": "val", "count": 11, "gone": null});
        assert_eq!(get_as::<String>(&doc, "/key").unwrap(), Some("val".to_string()));
        assert_eq!(get_as::<i64>(&doc, "/count").unwrap(), Some(11));
        assert_eq!(get_as::<String>(&doc, "/missing").unwrap(), None);
        assert_eq!(get_as::<Option<String>>(&doc, "/gone").unwrap(), Some(None));

        let err = get_as::<i64>(&doc, "/key").unwrap_err();
        assert_eq!(
            err.to_string(),
            "type mismatch at \"/key\": expected integer, found string"
        );
        assert!(matches!(
            get_as::<String>(&doc, "/gone"),
            Err(DiffError::TypeMismatch { actual: "null", .. })
        ));
    }

    #[test]
    fn remove_keeps_sibling_order() {
        let doc = json!({"c": 1, "a": 2, "b": 3});
        let (doc, removed) = remove(doc, "/c").unwrap();
        assert!(removed);
        let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn remove_missing_path_is_a_no_op() {
        let doc = json!({"key": "val", "key2": "val2"});
        let (after, removed) = remove(doc.clone(), "/notexist").unwrap();
        assert!(!removed);
        assert_eq!(after, doc);

        let (after, removed) = remove(doc.clone(), "/key/deeper").unwrap();
        assert!(!removed);
        assert_eq!(after, doc);
    }

    #[test]
    fn remove_last_key_leaves_empty_mapping() {
        let (doc, removed) = remove(json!({"only": true}), "/only").unwrap();
        assert!(removed);
        assert_eq!(doc, json!({}));
    }

    #[test]
    fn remove_list_items() {
        let (doc, removed) = remove(json!({"l": [1, 2, 3]}), "/l/1").unwrap();
        assert!(removed);
        assert_eq!(doc, json!({"l": [1, 3]}));

        let (doc, removed) = remove(doc, "/l/5").unwrap();
        assert!(!removed);
        assert_eq!(doc, json!({"l": [1, 3]}));
    }

    #[test]
    fn remove_root() {
        let (doc, removed) = remove(json!({"a": 1}), "").unwrap();
        assert!(removed);
        assert!(doc.is_null());
        let (doc, removed) = remove(doc, "").unwrap();
        assert!(!removed);
        assert!(doc.is_null());
    }

    #[test]
    fn set_overwrites_in_place() {
        let mut doc = json!({"a": 1, "b": 2, "c": 3});
        set(&mut doc, "/b", json!("two")).unwrap();
        assert_eq!(doc.to_string(), r#"{"a":1,"b":"two","c":3}"#);
    }

    #[test]
    fn set_creates_missing_mappings_at_the_end() {
        let mut doc = json!({"z": 0});
        set(&mut doc, "/Target/Input", json!("{}")).unwrap();
        assert_eq!(doc.to_string(), r#"{"z":0,"Target":{"Input":"{}"}}"#);
    }

    #[test]
    fn set_through_scalar_fails() {
        let mut doc = json!({"a": "scalar"});
        let err = set(&mut doc, "/a/b/c", json!(1)).unwrap_err();
        assert!(matches!(err, DiffError::Structural { .. }));
        assert_eq!(doc, json!({"a": "scalar"}));

        let mut doc = json!({"a": null});
        assert!(set(&mut doc, "/a/b", json!(1)).is_err());
    }

    #[test]
    fn set_on_lists() {
        let mut doc = json!([1, 2]);
        set(&mut doc, "/0", json!(9)).unwrap();
        set(&mut doc, "/2", json!(3)).unwrap();
        set(&mut doc, "/-", json!(4)).unwrap();
        assert_eq!(doc, json!([9, 2, 3, 4]));
        assert!(set(&mut doc, "/9", json!(0)).is_err());
        assert!(set(&mut doc, "/7/x", json!(0)).is_err());
    }

    #[test]
    fn set_root_replaces_document() {
        let mut doc = json!({"a": 1});
        set(&mut doc, "", json!([true])).unwrap();
        assert_eq!(doc, json!([true]));
    }

    #[test]
    fn numbers_keep_their_literal() {
        let source = r#"{"n": 1.50, "big": 123456789012345678901234567890}"#;
        let doc: Document = serde_json::from_str(source).unwrap();
        let n = get_as::<Number>(&doc, "/n").unwrap().unwrap();
        assert_eq!(n.to_string(), "1.50");
        let big = get(&doc, "/big").unwrap().unwrap();
        assert_eq!(big.to_string(), "123456789012345678901234567890");
    }

    fn arb_leaf() -> impl Strategy<Value = Document> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            "[a-z]{0,6}".prop_map(Value::String),
        ]
    }

    fn arb_document() -> impl Strategy<Value = Document> {
        arb_leaf().prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::vec((prop::sample::select(vec!["a", "b", "0", "1"]), inner), 0..4)
                    .prop_map(|entries| {
                        let mut map = Map::new();
                        for (k, v) in entries {
                            map.insert(k.to_string(), v);
                        }
                        Value::Object(map)
                    }),
            ]
        })
    }

    fn arb_path() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(vec!["a", "b", "0", "1", "2"]), 0..4)
            .prop_map(|tokens| tokens.iter().map(|t| format!("/{t}")).collect())
    }

    #[derive(Debug, PartialEq)]
    enum Descent {
        Mappings,
        ThroughList,
        BlockedByScalar,
    }

    /// What `set` meets on the way to the parent of the final token.
    fn descent(doc: &Document, tokens: &[String]) -> Descent {
        let Some((_, parents)) = tokens.split_last() else {
            return Descent::Mappings;
        };
        let mut current = doc;
        for token in parents {
            match current {
                Value::Object(map) => match map.get(token) {
                    Some(next) => current = next,
                    None => return Descent::Mappings,
                },
                Value::Array(_) => return Descent::ThroughList,
                _ => return Descent::BlockedByScalar,
            }
        }
        match current {
            Value::Object(_) => Descent::Mappings,
            Value::Array(_) => Descent::ThroughList,
            _ => Descent::BlockedByScalar,
        }
    }

    proptest! {
        #[test]
        fn set_then_get_round_trips(
            mut doc in arb_document(),
            path in arb_path(),
            value in arb_leaf(),
        ) {
            let tokens = parse_path(&path).unwrap();
            let descent = descent(&doc, &tokens);
            prop_assume!(descent != Descent::ThroughList);

            let result = set(&mut doc, &path, value.clone());
            if descent == Descent::BlockedByScalar {
                prop_assert!(result.is_err());
            } else {
                prop_assert!(result.is_ok());
                prop_assert_eq!(get(&doc, &path).unwrap(), Some(&value));
            }
        }

        #[test]
        fn removing_a_key_twice_is_idempotent(doc in arb_document(), path in arb_path()) {
            let tokens = parse_path(&path).unwrap();
            let parent_is_list = tokens
                .split_last()
                .and_then(|(_, parents)| lookup(&doc, parents))
                .is_some_and(Value::is_array);
            prop_assume!(!parent_is_list);

            let (once, _) = remove(doc, &path).unwrap();
            let (twice, removed) = remove(once.clone(), &path).unwrap();
            prop_assert!(!removed);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn has_agrees_with_get(doc in arb_document(), path in arb_path()) {
            prop_assert_eq!(has(&doc, &path), get(&doc, &path).unwrap().is_some());
        }
    }
}

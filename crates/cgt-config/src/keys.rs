//! Known-key registry and unknown-key guard.
//!
//! Keys are JSON Pointers. A leaf in the merged document is known when it
//! sits at or under a registered pointer, or when it is itself an ancestor of
//! one (a section replaced by a scalar is a type error, reported by the typed
//! layer instead).

use anyhow::{bail, Result};
use serde_json::Value;

/// Every configurable key, sorted.
pub const KNOWN_POINTERS: &[&str] = &[
    "/account/error_streak_limit",
    "/tax/exempt_threshold_cents",
    "/tax/rate_denominator",
    "/tax/rate_numerator",
];

/// Leaf pointers of `config_json` outside the registry (sorted, unique).
pub fn unknown_keys(config_json: &Value) -> Vec<String> {
    let mut leaves: Vec<String> = Vec::new();
    collect_leaf_pointers(config_json, "", &mut leaves);

    let mut unknown: Vec<String> = leaves
        .into_iter()
        .filter(|lp| {
            !KNOWN_POINTERS
                .iter()
                .any(|kp| is_prefix_pointer(kp, lp) || is_prefix_pointer(lp, kp))
        })
        .collect();
    unknown.sort();
    unknown.dedup();
    unknown
}

pub(crate) fn reject_unknown_keys(config_json: &Value) -> Result<()> {
    let unknown = unknown_keys(config_json);
    if !unknown.is_empty() {
        bail!(
            "CONFIG_UNKNOWN_KEYS: {} unknown config key(s). Known keys: {:?}. Found: {}",
            unknown.len(),
            KNOWN_POINTERS,
            preview_list(&unknown, 12)
        );
    }
    Ok(())
}

/// Return true if `prefix` is a JSON-pointer prefix of `leaf`.
///
/// - prefix "/" covers everything
/// - exact match covers
/// - "/a/b" covers "/a/b/c" but NOT "/a/bc"
fn is_prefix_pointer(prefix: &str, leaf: &str) -> bool {
    if prefix == "/" || leaf == prefix {
        return true;
    }
    leaf.starts_with(prefix)
        && leaf
            .get(prefix.len()..prefix.len() + 1)
            .map(|c| c == "/")
            .unwrap_or(false)
}

/// Append the JSON Pointer of every scalar leaf under `v` to `out`.
pub fn collect_leaf_pointers(v: &Value, prefix: &str, out: &mut Vec<String>) {
    match v {
        Value::Object(map) => {
            for (k, vv) in map.iter() {
                let next = format!("{}/{}", prefix, escape_pointer_token(k));
                collect_leaf_pointers(vv, &next, out);
            }
        }
        Value::Array(arr) => {
            for (i, vv) in arr.iter().enumerate() {
                let next = format!("{}/{}", prefix, i);
                collect_leaf_pointers(vv, &next, out);
            }
        }
        _ => {
            let p = if prefix.is_empty() {
                "/".to_string()
            } else {
                prefix.to_string()
            };
            out.push(p);
        }
    }
}

fn escape_pointer_token(s: &str) -> String {
    s.replace('~', "~0").replace('/', "~1")
}

fn preview_list(items: &[String], n: usize) -> String {
    let take = items.iter().take(n).cloned().collect::<Vec<_>>();
    format!("{:?}", take)
}

//! Small helpers for identifiers, slugs, and JSON-shaped maps.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use uuid::Uuid;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace regex"));

static NON_SLUG_CHAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9-]").expect("Failed to compile slug character regex"));

static HYPHEN_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-+").expect("Failed to compile hyphen regex"));

/// Length of the random part of [`generate_id`].
pub const ID_LENGTH: usize = 12;

/// Generate a short random identifier.
///
/// The id is the first 12 hex digits of a v4 UUID, lowercase, with `prefix` in front.
///
/// ```rust
/// use monorepo_core::utils::generate_id;
///
/// let id = generate_id("usr_");
/// assert!(id.starts_with("usr_"));
/// assert_eq!(id.len(), 4 + 12);
/// ```
pub fn generate_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{prefix}{}", &hex[..ID_LENGTH])
}

/// Convert text to a URL-friendly slug.
///
/// ```rust
/// use monorepo_core::utils::slugify;
///
/// assert_eq!(slugify("  Hello, World!  "), "hello-world");
/// ```
pub fn slugify(text: &str) -> String {
    let slug = text.trim().to_lowercase();
    let slug = WHITESPACE_RUN.replace_all(&slug, "-");
    let slug = NON_SLUG_CHAR.replace_all(&slug, "");
    let slug = HYPHEN_RUN.replace_all(&slug, "-");
    slug.trim_matches('-').to_string()
}

/// Merge `overrides` on top of `base`, recursing into keys that hold objects on both sides.
///
/// Any other value in `overrides` replaces the one in `base`. Neither input is modified.
pub fn deep_merge(base: &Map<String, Value>, overrides: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in overrides {
        let combined = match (merged.get(key), value) {
            (Some(Value::Object(inner)), Value::Object(other)) => {
                Value::Object(deep_merge(inner, other))
            }
            _ => value.clone(),
        };
        merged.insert(key.clone(), combined);
    }
    merged
}

/// Split `items` into consecutive chunks of `chunk_size`; the last chunk may be shorter.
///
/// # Panics
///
/// Panics if `chunk_size` is 0.
pub fn chunk_list<T: Clone>(items: &[T], chunk_size: usize) -> Vec<Vec<T>> {
    items.chunks(chunk_size).map(<[T]>::to_vec).collect()
}

/// Flatten nested objects into a single level, joining keys with `separator`.
///
/// Nested empty objects contribute no keys. Arrays are kept as values.
///
/// ```rust
/// use monorepo_core::utils::flatten_dict;
/// use serde_json::json;
///
/// let nested = json!({"a": {"b": 1, "c": {"d": 2}}, "e": 3});
/// let flat = flatten_dict(nested.as_object().unwrap(), ".");
/// assert_eq!(serde_json::Value::Object(flat), json!({"a.b": 1, "a.c.d": 2, "e": 3}));
/// ```
pub fn flatten_dict(map: &Map<String, Value>, separator: &str) -> Map<String, Value> {
    let mut flat = Map::new();
    flatten_into(&mut flat, map, None, separator);
    flat
}

fn flatten_into(
    flat: &mut Map<String, Value>,
    map: &Map<String, Value>,
    parent: Option<&str>,
    separator: &str,
) {
    for (key, value) in map {
        let path = match parent {
            Some(parent) => format!("{parent}{separator}{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(inner) => flatten_into(flat, inner, Some(&path), separator),
            other => {
                flat.insert(path, other.clone());
            }
        }
    }
}

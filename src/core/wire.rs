/*
 * The wire form of a playground: a JSON object mapping file paths to file
 * content plus the reserved `__versions` key mapping package names to
 * version specifiers, passed through the codec and prefixed with `#`.
 *
 * Decoding validates the whole fragment before anything is handed back, so
 * a caller that only mutates state after `decode_fragment` succeeds can never
 * end up half-loaded. Entries of the wrong JSON type are dropped with a
 * warning instead of failing the load.
 */
use crate::core::codec::{self, DecodeError};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const VERSIONS_KEY: &str = "__versions";
pub const FRAGMENT_PREFIX: char = '#';

#[derive(Debug)]
pub enum LoadError {
    Decode(DecodeError),
    Parse(serde_json::Error),
    NotAnObject,
}

impl From<DecodeError> for LoadError {
    fn from(err: DecodeError) -> Self {
        LoadError::Decode(err)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Parse(err)
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Decode(e) => write!(f, "Could not load shared playground: {e}"),
            LoadError::Parse(e) => {
                write!(f, "Could not load shared playground: state is not valid JSON: {e}")
            }
            LoadError::NotAnObject => write!(
                f,
                "Could not load shared playground: state is not a JSON object"
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Decode(e) => Some(e),
            LoadError::Parse(e) => Some(e),
            LoadError::NotAnObject => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;

/*
 * A fully validated wire form. File names are as they appeared on the wire;
 * canonicalizing them is the loader's job.
 */
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireState {
    pub files: Vec<(String, String)>,
    pub versions: Vec<(String, String)>,
}

/*
 * Serializes files (in the given order) followed by the version map. This is
 * a pure projection: identical input always produces the identical fragment.
 */
pub fn encode_state<'a>(
    files: impl IntoIterator<Item = (&'a str, &'a str)>,
    versions: &BTreeMap<String, String>,
) -> String {
    let mut object = Map::new();
    for (path, content) in files {
        object.insert(path.to_string(), Value::String(content.to_string()));
    }
    let versions_object: Map<String, Value> = versions
        .iter()
        .map(|(package, version)| (package.clone(), Value::String(version.clone())))
        .collect();
    object.insert(VERSIONS_KEY.to_string(), Value::Object(versions_object));

    let json = Value::Object(object).to_string();
    format!("{FRAGMENT_PREFIX}{}", codec::encode(&json))
}

/*
 * Returns `Ok(None)` for an empty or whitespace-only fragment, which means
 * there is nothing to load rather than a broken link.
 */
pub fn decode_fragment(fragment: &str) -> Result<Option<WireState>> {
    let token = fragment.strip_prefix(FRAGMENT_PREFIX).unwrap_or(fragment);
    if token.trim().is_empty() {
        return Ok(None);
    }

    let json = codec::decode(token)?;
    let Value::Object(mut object) = serde_json::from_str::<Value>(&json)? else {
        return Err(LoadError::NotAnObject);
    };

    let mut state = WireState::default();
    match object.shift_remove(VERSIONS_KEY) {
        Some(Value::Object(versions)) => {
            for (package, version) in versions {
                match version {
                    Value::String(version) => state.versions.push((package, version)),
                    other => log::warn!(
                        "Wire: Ignoring non-string version for '{package}': {other}"
                    ),
                }
            }
        }
        Some(Value::Null) | None => {}
        Some(other) => log::warn!("Wire: Ignoring malformed {VERSIONS_KEY} entry: {other}"),
    }

    for (name, content) in object {
        match content {
            Value::String(content) => state.files.push((name, content)),
            other => log::warn!(
                "Wire: Ignoring file '{name}' whose content is not a string ({})",
                json_type_name(&other)
            ),
        }
    }

    log::debug!(
        "Wire: Decoded {} files and {} version entries.",
        state.files.len(),
        state.versions.len()
    );
    Ok(Some(state))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment_for(json: &str) -> String {
        format!("#{}", codec::encode(json))
    }

    #[test]
    fn test_encode_state_layout() {
        let versions = BTreeMap::from([("vue".to_string(), "3.3.11".to_string())]);
        let fragment = encode_state([("src/App.vue", "<template/>")], &versions);

        assert!(fragment.starts_with('#'));
        let json = codec::decode(&fragment[1..]).unwrap();
        assert_eq!(
            json,
            r#"{"src/App.vue":"<template/>","__versions":{"vue":"3.3.11"}}"#
        );
    }

    #[test]
    fn test_decode_preserves_order_and_splits_versions() {
        let fragment =
            fragment_for(r#"{"b.vue":"B","__versions":{"vue":"3.2.0"},"a.vue":"A"}"#);

        let state = decode_fragment(&fragment).unwrap().unwrap();

        assert_eq!(
            state.files,
            vec![
                ("b.vue".to_string(), "B".to_string()),
                ("a.vue".to_string(), "A".to_string())
            ]
        );
        assert_eq!(state.versions, vec![("vue".to_string(), "3.2.0".to_string())]);
    }

    #[test]
    fn test_decode_without_hash_prefix() {
        let fragment = fragment_for(r#"{"App.vue":"x"}"#);
        let state = decode_fragment(&fragment[1..]).unwrap().unwrap();
        assert_eq!(state.files.len(), 1);
        assert!(state.versions.is_empty());
    }

    #[test]
    fn test_empty_and_whitespace_fragments_are_nothing_to_load() {
        assert!(decode_fragment("").unwrap().is_none());
        assert!(decode_fragment("#").unwrap().is_none());
        assert!(decode_fragment("#   ").unwrap().is_none());
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            decode_fragment("#%%%not-base64%%%"),
            Err(LoadError::Decode(_))
        ));
        assert!(matches!(
            decode_fragment(&fragment_for("{ broken")),
            Err(LoadError::Parse(_))
        ));
        assert!(matches!(
            decode_fragment(&fragment_for("[1, 2]")),
            Err(LoadError::NotAnObject)
        ));
    }

    #[test]
    fn test_wrongly_typed_entries_are_dropped() {
        let fragment = fragment_for(
            r#"{"App.vue":"ok","bad.vue":42,"__versions":{"vue":"3.2.0","typescript":5}}"#,
        );

        let state = decode_fragment(&fragment).unwrap().unwrap();

        assert_eq!(state.files, vec![("App.vue".to_string(), "ok".to_string())]);
        assert_eq!(state.versions, vec![("vue".to_string(), "3.2.0".to_string())]);
    }

    #[test]
    fn test_malformed_versions_entry_is_ignored() {
        let fragment = fragment_for(r#"{"__versions":"3.2.0"}"#);
        let state = decode_fragment(&fragment).unwrap().unwrap();
        assert!(state.versions.is_empty());
        assert!(state.files.is_empty());
    }
}

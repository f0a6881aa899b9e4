use std::collections::{BTreeMap, BTreeSet};
use std::fs;

use regex::Regex;
use serde_yaml::Value;

const LOCALES: &[&str] = &["en", "ko"];

fn flatten(prefix: &str, value: &Value, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Mapping(map) => {
            for (key, child) in map {
                let Some(key) = key.as_str() else { continue };
                let path = if prefix.is_empty() {
                    key.to_string()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out);
            }
        }
        Value::String(text) => {
            out.insert(prefix.to_string(), text.clone());
        }
        other => {
            out.insert(prefix.to_string(), format!("{other:?}"));
        }
    }
}

fn load(locale: &str) -> BTreeMap<String, String> {
    let path = format!("{}/locales/{locale}.yml", env!("CARGO_MANIFEST_DIR"));
    let content = fs::read_to_string(&path).unwrap_or_else(|e| panic!("{path}: {e}"));
    let value: Value = serde_yaml::from_str(&content).unwrap();
    let mut out = BTreeMap::new();
    flatten("", &value, &mut out);
    out.remove("_version");
    out
}

fn placeholders(text: &str) -> BTreeSet<String> {
    let re = Regex::new(r"%\{(\w+)\}").unwrap();
    re.captures_iter(text).map(|c| c[1].to_string()).collect()
}

#[test]
fn locales_share_keys() {
    let reference = load("en");
    assert!(reference.contains_key("feedback.perfect"));
    for locale in &LOCALES[1..] {
        let other = load(locale);
        let missing: Vec<_> = reference.keys().filter(|k| !other.contains_key(*k)).collect();
        let extra: Vec<_> = other.keys().filter(|k| !reference.contains_key(*k)).collect();
        assert!(missing.is_empty(), "{locale} is missing {missing:?}");
        assert!(extra.is_empty(), "{locale} has unknown keys {extra:?}");
    }
}

#[test]
fn locales_share_placeholders() {
    let reference = load("en");
    for locale in &LOCALES[1..] {
        let other = load(locale);
        for (key, text) in &reference {
            let Some(translated) = other.get(key) else { continue };
            assert_eq!(
                placeholders(text),
                placeholders(translated),
                "placeholder mismatch for {key} in {locale}"
            );
        }
    }
}

#[test]
fn messages_are_not_blank() {
    for locale in LOCALES {
        for (key, text) in load(locale) {
            assert!(!text.trim().is_empty(), "{locale}: {key} is blank");
        }
    }
}

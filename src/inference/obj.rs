use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use super::{unify_all, Classifier};
use crate::ir::{TypeDescriptor, TypeKind};

// ------- Dictionary heuristic -------
//
// An object reads as a map when every key looks machine-generated and the
// member values share one shape. Human-named keys always make a class.

static INTEGER_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[0-9]+$").unwrap());

static GUID_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\{?[0-9a-fA-F]{8}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{12}\}?$",
    )
    .unwrap()
});

/// Hashes, object ids and similar opaque tokens.
static HEX_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{16,}$").unwrap());

pub fn looks_machine_generated(key: &str) -> bool {
    INTEGER_KEY.is_match(key) || GUID_KEY.is_match(key) || HEX_KEY.is_match(key)
}

impl Classifier<'_> {
    pub(super) fn classify_object(&self, map: &Map<String, Value>) -> TypeDescriptor {
        let policy = self.dictionaries;
        if map.is_empty() {
            return TypeDescriptor::new(TypeKind::EmptyObject);
        }
        if policy.enabled
            && map.len() >= policy.min_keys.max(1)
            && map.keys().all(|k| looks_machine_generated(k))
        {
            if let Some(value) = unify_all(map.values().map(|v| self.classify(v))) {
                if value.kind != TypeKind::Anything {
                    return TypeDescriptor::dictionary(value);
                }
            }
        }
        TypeDescriptor::object()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DictionaryPolicy, GeneratorConfig};
    use serde_json::json;
    use test_case::test_case;

    fn classify_with(config: &GeneratorConfig, v: Value) -> TypeDescriptor {
        Classifier::new(config).classify(&v)
    }

    fn classify(v: Value) -> TypeDescriptor {
        classify_with(&GeneratorConfig::default(), v)
    }

    #[test_case("42", true ; "integer")]
    #[test_case("-7", true ; "negative integer")]
    #[test_case("3f2504e0-4f89-11d3-9a0c-0305e82c3301", true ; "guid")]
    #[test_case("{3F2504E0-4F89-11D3-9A0C-0305E82C3301}", true ; "braced guid")]
    #[test_case("507f1f77bcf86cd799439011", true ; "object id")]
    #[test_case("name", false ; "word")]
    #[test_case("abc123", false ; "short mixed")]
    #[test_case("1.5", false ; "decimal")]
    #[test_case("", false ; "empty")]
    fn key_shapes(key: &str, expected: bool) {
        assert_eq!(looks_machine_generated(key), expected);
    }

    #[test]
    fn numeric_keys_with_uniform_values_make_a_dictionary() {
        assert_eq!(
            classify(json!({"1": {"x": 1}, "2": {"x": 2, "y": true}})),
            TypeDescriptor::dictionary(TypeDescriptor::object()),
        );
        assert_eq!(
            classify(json!({"10": 1, "20": 2147483648_i64})),
            TypeDescriptor::dictionary(TypeDescriptor::long()),
        );
    }

    #[test]
    fn guid_keys_make_a_dictionary() {
        let v = json!({
            "3f2504e0-4f89-11d3-9a0c-0305e82c3301": "a",
            "6ba7b810-9dad-11d1-80b4-00c04fd430c8": null,
        });
        assert_eq!(classify(v), TypeDescriptor::dictionary(TypeDescriptor::string().into_nullable()));
    }

    #[test]
    fn mixed_keys_make_an_object() {
        assert_eq!(classify(json!({"1": 1, "name": 2})), TypeDescriptor::object());
    }

    #[test]
    fn mismatched_values_make_an_object() {
        assert_eq!(classify(json!({"1": 1, "2": "two"})), TypeDescriptor::object());
    }

    #[test]
    fn empty_object_has_no_key_evidence() {
        assert_eq!(classify(json!({})), TypeDescriptor::new(TypeKind::EmptyObject));
        assert_eq!(
            classify(json!({"1": {}, "2": {"x": 1}})),
            TypeDescriptor::dictionary(TypeDescriptor::object()),
        );
    }

    #[test]
    fn min_keys_and_switch_are_respected() {
        let config = GeneratorConfig::default()
            .with_dictionaries(DictionaryPolicy { enabled: true, min_keys: 3 });
        assert_eq!(classify_with(&config, json!({"1": 1, "2": 2})), TypeDescriptor::object());
        assert_eq!(
            classify_with(&config, json!({"1": 1, "2": 2, "3": 3})),
            TypeDescriptor::dictionary(TypeDescriptor::integer()),
        );

        let off = GeneratorConfig::default()
            .with_dictionaries(DictionaryPolicy { enabled: false, min_keys: 1 });
        assert_eq!(classify_with(&off, json!({"1": 1})), TypeDescriptor::object());
    }
}

use json_classgen::{
    generate, AbsencePolicy, ClassId, Error, GeneratorConfig, Language, NameRegistry, SchemaBuilder, SchemaGraph,
    TypeDescriptor, TypeKind,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn infer(examples: Vec<Value>) -> SchemaGraph {
    generate(&examples, &GeneratorConfig::default()).unwrap()
}

fn root_field(graph: &SchemaGraph, key: &str) -> TypeDescriptor {
    graph.root.field(key).unwrap_or_else(|| panic!("root has no field {key}")).ty.clone()
}

/// Every reference resolves, and every edge points from a class to one
/// allocated after it, so the graph cannot contain a cycle.
fn assert_closed_and_acyclic(graph: &SchemaGraph) {
    assert_eq!(graph.root.id, ClassId::ROOT);
    assert!(graph.root.is_root);
    for class in graph.classes() {
        for field in &class.fields {
            if let TypeKind::Object(slot) = &field.ty.innermost().kind {
                let child = slot.unwrap_or_else(|| panic!("{}.{} left unlinked", class.name, field.source_key));
                assert!(graph.class(child).is_some(), "dangling reference {child:?}");
                assert!(child > class.id, "{} references earlier class {child:?}", class.name);
            }
        }
    }
}

#[test]
fn scenario_a_numbers_widen_to_float() {
    let graph = infer(vec![json!({"a": 1}), json!({"a": 1.5})]);
    assert_eq!(root_field(&graph, "a"), TypeDescriptor::float());
    assert!(!root_field(&graph, "a").is_nullable());
}

#[test]
fn scenario_b_absent_keys_become_nullable_retroactively() {
    let graph = infer(vec![json!({"a": 1}), json!({"b": 2})]);
    assert_eq!(root_field(&graph, "a"), TypeDescriptor::integer().into_nullable());
    assert_eq!(root_field(&graph, "b"), TypeDescriptor::integer().into_nullable());
}

#[test]
fn scenario_b_forward_only_keeps_early_keys_required() {
    let config = GeneratorConfig::default().with_absence(AbsencePolicy::ForwardOnly);
    let graph = generate(&[json!({"a": 1}), json!({"b": 2})], &config).unwrap();
    assert_eq!(root_field(&graph, "a"), TypeDescriptor::integer());
    assert_eq!(root_field(&graph, "b"), TypeDescriptor::integer().into_nullable());
}

#[test]
fn scenario_c_string_array() {
    let graph = infer(vec![json!({"tags": ["x", "y"]})]);
    assert_eq!(root_field(&graph, "tags"), TypeDescriptor::array(TypeDescriptor::string()));
}

#[test]
fn scenario_d_nested_object_is_pooled() {
    let graph = infer(vec![json!({"user": {"name": "a"}}), json!({"user": {"name": "b", "age": 5}})]);
    assert_eq!(graph.len(), 2);
    let user = graph.class_by_name("User").unwrap();
    assert!(graph.root.has_nested_classes);
    assert_eq!(root_field(&graph, "user").class_ref(), Some(user.id));
    assert_eq!(user.field("name").unwrap().ty, TypeDescriptor::string());
    assert_eq!(user.field("age").unwrap().ty, TypeDescriptor::integer().into_nullable());
    assert_closed_and_acyclic(&graph);
}

#[test]
fn plural_array_key_names_singular_class() {
    let graph = infer(vec![json!({"items": [{"sku": "a"}, {"sku": "b"}]})]);
    let names: Vec<&str> = graph.classes().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Root", "Item"]);
}

#[test]
fn dictionary_values_share_one_class() {
    let graph = infer(vec![json!({
        "accounts": {
            "3f2504e0-4f89-11d3-9a0c-0305e82c3301": {"balance": 10},
            "6ba7b810-9dad-11d1-80b4-00c04fd430c8": {"balance": 12.5, "frozen": true},
        }
    })]);
    let accounts = root_field(&graph, "accounts");
    assert!(matches!(accounts.kind, TypeKind::Dictionary(_)));
    let account = graph.class(accounts.class_ref().unwrap()).unwrap();
    assert_eq!(account.name, "Account");
    assert_eq!(account.field("balance").unwrap().ty, TypeDescriptor::float());
    assert_eq!(account.field("frozen").unwrap().ty, TypeDescriptor::boolean().into_nullable());
}

#[test]
fn deep_documents_stop_at_max_depth() {
    let mut doc = json!({"leaf": 1});
    for _ in 0..10 {
        doc = json!({"next": doc});
    }
    let config = GeneratorConfig::default().with_max_depth(3);
    let graph = generate(&[doc], &config).unwrap();
    assert_eq!(graph.len(), 4);
    let deepest = graph.class_by_name("Next3").unwrap();
    assert_eq!(deepest.field("next").unwrap().ty, TypeDescriptor::anything());
    assert_closed_and_acyclic(&graph);
}

#[test]
fn top_level_non_object_is_rejected() {
    let err = generate(&[json!({"a": 1}), json!("nope")], &GeneratorConfig::default()).unwrap_err();
    assert!(matches!(err, Error::NotAnObject { index: 1, .. }));
    assert_eq!(err.to_string(), "example #1 is a string, expected a JSON object");
}

#[test]
fn empty_input_is_rejected() {
    let err = generate(&[], &GeneratorConfig::default()).unwrap_err();
    assert!(matches!(err, Error::NoExamples));
}

#[test]
fn injected_singularizer_is_used() {
    let config = GeneratorConfig::default();
    let names = NameRegistry::with_singularizer(|w: &str| format!("{w}Entry"));
    let graph = SchemaBuilder::with_names(&config, names)
        .build_graph(&[json!({"items": [{"a": 1}]})])
        .unwrap();
    assert!(graph.class_by_name("ItemsEntry").is_some());
}

#[test]
fn emitter_options_do_not_change_the_graph() {
    let examples = [json!({"orders": [{"id": 1, "lines": [{"sku": "a"}]}]})];
    let graph = generate(&examples, &GeneratorConfig::default()).unwrap();
    for lang in [Language::CSharp, Language::Rust] {
        let src = lang.emitter().render_graph(&graph, &Default::default());
        assert!(src.contains("Order") && src.contains("Line"), "{src}");
    }
    assert_eq!(generate(&examples, &GeneratorConfig::default()).unwrap(), graph);
}

#[test]
fn graph_serializes_in_completion_order() {
    let graph = infer(vec![json!({"a": {"b": {"c": 1}}})]);
    let value = serde_json::to_value(&graph).unwrap();
    let names: Vec<&str> = value["secondary"].as_array().unwrap().iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["B", "A"]);
    assert_eq!(value["root"]["fields"][0]["type"]["kind"], "object");
    assert_eq!(value["root"]["fields"][0]["type"]["of"], 1);
}

// ---- properties over generated documents ----

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e6..1.0e6f64).prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::from),
        Just(Value::from("2024-01-15")),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("(id|name|items|user|[0-9])", inner), 0..4)
                .prop_map(|kvs| Value::Object(kvs.into_iter().collect::<Map<String, Value>>())),
        ]
    })
}

fn json_object() -> impl Strategy<Value = Value> {
    prop::collection::vec(("(id|name|items|user|tags)", json_value()), 0..5)
        .prop_map(|kvs| Value::Object(kvs.into_iter().collect()))
}

proptest! {
    #[test]
    fn generation_is_deterministic(examples in prop::collection::vec(json_object(), 1..4)) {
        let config = GeneratorConfig::default();
        prop_assert_eq!(generate(&examples, &config).unwrap(), generate(&examples, &config).unwrap());
    }

    #[test]
    fn graphs_are_closed_and_acyclic(examples in prop::collection::vec(json_object(), 1..4)) {
        let graph = generate(&examples, &GeneratorConfig::default()).unwrap();
        assert_closed_and_acyclic(&graph);

        let mut names: Vec<String> = graph.classes().map(|c| c.name.to_lowercase()).collect();
        let count = names.len();
        names.sort();
        names.dedup();
        prop_assert_eq!(names.len(), count);
    }
}
